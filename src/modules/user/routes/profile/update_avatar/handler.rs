use super::{
    service::service,
    types::{request, response},
};
use crate::types::Context;
use axum::{extract::State, response::IntoResponse};
use axum_typed_multipart::BaseMultipart;
use std::sync::Arc;

pub async fn handler(
    State(ctx): State<Arc<Context>>,
    auth: request::Auth,
    BaseMultipart { data: body, .. }: BaseMultipart<request::Body, response::Error>,
) -> impl IntoResponse {
    service(ctx, request::Payload { auth, body }).await
}
