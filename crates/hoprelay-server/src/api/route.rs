//! Node API routing configuration

use actix_web::{Scope, web};

use super::handler;

/// Create the node routes
///
/// Routes:
/// - POST /apply_rule - Apply a chain rule
/// - POST /ping - Ping along a chain
/// - GET /hello - Liveness probe
/// - GET /rules - List rules
/// - GET /rules/{chain_id} - Get a rule
pub fn routes() -> Scope {
    web::scope("")
        .service(handler::apply_rule)
        .service(handler::ping)
        .service(handler::hello)
        .service(handler::list_rules)
        .service(handler::get_rule)
}
