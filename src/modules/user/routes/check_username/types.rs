pub mod request {
    pub use crate::modules::auth::middleware::Auth;
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct Query {
        pub username: Option<String>,
    }
}

pub mod response {
    use crate::utils::response;
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::json;
    use validator::ValidationError;

    pub enum Success {
        Availability(bool),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Availability(available) => {
                    response::ok(StatusCode::OK, json!({ "available": available }))
                }
            }
        }
    }

    pub enum Error {
        MissingUsername,
        InvalidUsername(ValidationError),
        FailedToCheckUsername,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::MissingUsername => response::err(
                    StatusCode::BAD_REQUEST,
                    "username query parameter is required",
                ),
                Self::InvalidUsername(error) => response::err(
                    StatusCode::BAD_REQUEST,
                    error
                        .message
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| String::from("invalid username")),
                ),
                Self::FailedToCheckUsername => response::internal_error(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
