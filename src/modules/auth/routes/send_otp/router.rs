use super::handler;
use crate::types::Context;
use axum::routing::{post, Router};
use std::sync::Arc;

/// Send and resend are the same operation: any active code is superseded.
pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/otp/send", post(handler::handler))
        .route("/otp/resend", post(handler::handler))
}
