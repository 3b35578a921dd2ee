pub mod request {
    pub use crate::modules::auth::middleware::Auth;

    pub struct Payload {
        pub auth: Auth,
    }
}

pub mod response {
    use super::super::super::types::Profile;
    use crate::utils::response;
    use axum::{http::StatusCode, response::IntoResponse};

    pub enum Success {
        Profile(Profile),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Profile(profile) => response::ok(StatusCode::OK, profile),
            }
        }
    }

    pub enum Error {
        UserNotFound,
        FailedToFetchUser,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::UserNotFound => response::err(StatusCode::NOT_FOUND, "user not found"),
                Self::FailedToFetchUser => response::internal_error(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
