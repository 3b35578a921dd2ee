mod register;
mod send_otp;
mod verify_otp;

use crate::types::Context;
use axum::routing::Router;
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .merge(send_otp::get_router())
        .merge(verify_otp::get_router())
        .merge(register::get_router())
}
