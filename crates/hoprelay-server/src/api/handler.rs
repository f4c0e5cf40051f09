//! Node API handlers
//!
//! - POST /apply_rule - Insert or update this node's rule for a chain
//! - POST /ping - Resolve or relay a ping
//! - GET /hello - Liveness probe
//! - GET /rules - List this node's rules
//! - GET /rules/{chain_id} - Get this node's rule for a chain

use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use hoprelay_core::{ApplyRuleRequest, PingRequest, RoutingError};

use crate::middleware::RequestIdExt;
use crate::model::AppState;
use crate::model::response::{Success, http_routing_error};

use super::model::{ChainPath, Hello, RuleApplied, RuleList, RuleView};

#[post("/apply_rule")]
pub async fn apply_rule(
    data: web::Data<AppState>,
    body: web::Json<ApplyRuleRequest>,
) -> impl Responder {
    let request = body.into_inner();

    match data.engine.apply_rule(request.clone()).await {
        Ok(_) => Success::http_response(RuleApplied {
            rule_applied: request,
        }),
        Err(err) => http_routing_error(&err),
    }
}

/// The body of a successful ping is the destination's answer, unchanged
#[post("/ping")]
pub async fn ping(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<PingRequest>,
) -> impl Responder {
    let request_id = req.request_id();

    match data.engine.ping(&body, request_id.as_deref()).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome.into_body()),
        Err(err) => http_routing_error(&err),
    }
}

#[get("/hello")]
pub async fn hello(data: web::Data<AppState>) -> impl Responder {
    Success::http_response(Hello::from_node(data.node_name()))
}

#[get("/rules")]
pub async fn list_rules(data: web::Data<AppState>) -> impl Responder {
    match data.engine.list_rules().await {
        Ok(rules) => Success::http_response(RuleList {
            node: data.node_name().to_string(),
            rules,
        }),
        Err(err) => http_routing_error(&err),
    }
}

#[get("/rules/{chain_id}")]
pub async fn get_rule(data: web::Data<AppState>, path: web::Path<ChainPath>) -> impl Responder {
    let chain_id = path.chain_id;

    match data.engine.lookup_rule(chain_id).await {
        Ok(Some(rule)) => Success::http_response(RuleView { rule }),
        Ok(None) => http_routing_error(&RoutingError::NoRuleConfigured {
            node: data.node_name().to_string(),
            chain_id,
        }),
        Err(err) => http_routing_error(&err),
    }
}
