//! HTTP response types for a relay node
//!
//! Success bodies carry `"status": "success"` (or the ping outcome); every
//! failure is an [`ErrorBody`] naming the node that produced it.

use actix_web::{HttpResponse, http::StatusCode};
use hoprelay_common::error::PARAMETER_VALIDATE_ERROR;
use hoprelay_common::{ErrorBody, ErrorCode, STATUS_SUCCESS};
use hoprelay_core::RoutingError;
use serde::{Deserialize, Serialize};

/// Generic success wrapper: `{"status": "success", ...data}`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Success<T> {
    pub status: String,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> Success<T> {
    pub fn new(data: T) -> Self {
        Success {
            status: STATUS_SUCCESS.to_string(),
            data,
        }
    }

    pub fn http_response(data: T) -> HttpResponse {
        HttpResponse::Ok().json(Success::new(data))
    }
}

/// HTTP status for a routing failure
pub fn status_for(err: &RoutingError) -> StatusCode {
    match err {
        RoutingError::NoRuleConfigured { .. } => StatusCode::NOT_FOUND,
        RoutingError::NoNextHop { .. }
        | RoutingError::ForwardingFailed { .. }
        | RoutingError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn http_error(
    status: StatusCode,
    code: ErrorCode<'_>,
    detail: String,
    node: &str,
) -> HttpResponse {
    HttpResponse::build(status).json(ErrorBody::new(code, detail, node))
}

pub fn http_routing_error(err: &RoutingError) -> HttpResponse {
    http_error(status_for(err), err.error_code(), err.to_string(), err.node())
}

pub fn http_bad_request(detail: String, node: &str) -> HttpResponse {
    http_error(StatusCode::BAD_REQUEST, PARAMETER_VALIDATE_ERROR, detail, node)
}
