mod get;
mod types;
mod update;
mod update_avatar;

use crate::types::Context;
use axum::routing::Router;
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .merge(get::get_router())
        .merge(update::get_router())
        .merge(update_avatar::get_router())
}
