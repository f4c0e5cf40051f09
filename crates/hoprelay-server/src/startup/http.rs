//! HTTP server setup for a relay node.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, dev::Server, error::InternalError, web};
use tracing::debug;

use crate::{
    api,
    middleware::RequestTracing,
    model::{AppState, response::http_bad_request},
};

/// Server tuning shared by every listener
#[derive(Clone, Copy, Debug, Default)]
pub struct ServerOptions {
    /// 0 keeps the actix default
    pub workers: usize,
    pub shutdown_timeout: Duration,
}

/// Malformed JSON bodies answer 400 with this node's error body
fn json_config(node: Arc<str>) -> web::JsonConfig {
    web::JsonConfig::default().error_handler(move |err, _req| {
        let detail = err.to_string();
        debug!(node = %node, error = %detail, "rejected request body");
        InternalError::from_response(err, http_bad_request(detail, &node)).into()
    })
}

fn path_config(node: Arc<str>) -> web::PathConfig {
    web::PathConfig::default().error_handler(move |err, _req| {
        let detail = err.to_string();
        InternalError::from_response(err, http_bad_request(detail, &node)).into()
    })
}

/// Register state, extractor configs and routes for one node
pub fn configure_app(app_state: Arc<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let node = app_state.node_name_arc();
        cfg.app_data(web::Data::from(app_state))
            .app_data(json_config(node.clone()))
            .app_data(path_config(node))
            .service(api::routes());
    }
}

/// Where a node's HTTP server accepts connections
pub enum Bind {
    Address(String, u16),
    Listener(TcpListener),
}

/// Creates and binds a node's HTTP server.
pub fn node_server(
    app_state: Arc<AppState>,
    bind: Bind,
    options: ServerOptions,
) -> Result<Server, std::io::Error> {
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(RequestTracing::new(app_state.node_name_arc()))
            .configure(configure_app(app_state.clone()))
    })
    .disable_signals()
    .shutdown_timeout(options.shutdown_timeout.as_secs());

    if options.workers > 0 {
        server = server.workers(options.workers);
    }

    let server = match bind {
        Bind::Address(address, port) => server.bind((address, port))?,
        Bind::Listener(listener) => server.listen(listener)?,
    };
    Ok(server.run())
}
