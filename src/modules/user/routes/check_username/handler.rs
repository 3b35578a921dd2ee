use super::{service::service, types::request};
use crate::types::Context;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use std::sync::Arc;

pub async fn handler(
    State(ctx): State<Arc<Context>>,
    _: request::Auth,
    Query(query): Query<request::Query>,
) -> impl IntoResponse {
    service(ctx, query).await
}
