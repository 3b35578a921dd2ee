pub mod request {
    pub use crate::modules::auth::middleware::Auth;
    use axum_typed_multipart::{FieldData, TryFromMultipart};
    use tempfile::NamedTempFile;

    #[derive(TryFromMultipart)]
    pub struct Body {
        #[form_data(limit = "5MiB")]
        pub avatar: FieldData<NamedTempFile>,
    }

    pub struct Payload {
        pub auth: Auth,
        pub body: Body,
    }
}

pub mod response {
    use crate::utils::response;
    use axum::{http::StatusCode, response::IntoResponse};
    use axum_typed_multipart::TypedMultipartError;
    use serde_json::json;

    pub enum Success {
        AvatarUpdated(String),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::AvatarUpdated(avatar_url) => {
                    response::ok(StatusCode::OK, json!({ "avatarUrl": avatar_url }))
                }
            }
        }
    }

    pub enum Error {
        InvalidMultipart,
        MissingAvatar,
        UnsupportedImageType,
        UserNotFound,
        FailedToUploadAvatar,
    }

    impl From<TypedMultipartError> for Error {
        fn from(err: TypedMultipartError) -> Self {
            tracing::debug!("Rejected avatar upload: {}", err);
            match err {
                TypedMultipartError::MissingField { .. } => Self::MissingAvatar,
                _ => Self::InvalidMultipart,
            }
        }
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::InvalidMultipart => response::err(
                    StatusCode::BAD_REQUEST,
                    "file too large or invalid multipart form (max 5 MB)",
                ),
                Self::MissingAvatar => {
                    response::err(StatusCode::BAD_REQUEST, "field \"avatar\" is required")
                }
                Self::UnsupportedImageType => response::err(
                    StatusCode::BAD_REQUEST,
                    "only JPEG, PNG, WebP, and GIF images are allowed",
                ),
                Self::UserNotFound => response::err(StatusCode::NOT_FOUND, "user not found"),
                Self::FailedToUploadAvatar => response::internal_error(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
