pub mod request {
    pub use crate::modules::auth::middleware::Auth;
    use crate::utils::validation::validate_username;
    use serde::Deserialize;
    use validator::Validate;

    /// Absent fields keep their stored value.
    #[derive(Deserialize, Validate)]
    #[serde(rename_all = "camelCase")]
    pub struct Body {
        #[validate(custom(function = "validate_username"))]
        pub username: Option<String>,
        pub full_name: Option<String>,
        #[validate(length(max = 160, message = "bio must be 160 characters or fewer"))]
        pub bio: Option<String>,
        pub business_phone: Option<String>,
        pub address: Option<String>,
    }

    pub struct Payload {
        pub auth: Auth,
        pub body: Body,
    }
}

pub mod response {
    use super::super::super::types::Profile;
    use crate::utils::{response, validation};
    use axum::{http::StatusCode, response::IntoResponse};
    use validator::ValidationErrors;

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
        FailedToValidate(ValidationErrors),
        UsernameTaken,
        UserNotFound,
        FailedToUpdateUser,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToValidate(errors) => validation::into_response(errors),
                Self::UsernameTaken => {
                    response::err(StatusCode::CONFLICT, "username is already taken")
                }
                Self::UserNotFound => response::err(StatusCode::NOT_FOUND, "user not found"),
                Self::FailedToUpdateUser => response::internal_error(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
