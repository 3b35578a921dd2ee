pub mod request {
    use crate::utils::validation::{validate_otp_code, validate_phone_number};
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    pub struct Payload {
        #[validate(custom(function = "validate_phone_number"))]
        pub phone: String,
        #[validate(custom(function = "validate_otp_code"))]
        pub code: String,
    }
}

pub mod response {
    use crate::utils::{response, validation};
    use axum::{http::StatusCode, response::IntoResponse};
    use serde::Serialize;
    use validator::ValidationErrors;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Verified {
        pub is_new_user: bool,
        /// Only present for accounts that already exist.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub token: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub account_id: Option<String>,
    }

    pub enum Success {
        Verified(Verified),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Verified(verified) => response::ok(StatusCode::OK, verified),
            }
        }
    }

    pub enum Error {
        FailedToValidate(ValidationErrors),
        InvalidCode,
        UnexpectedError,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToValidate(errors) => validation::into_response(errors),
                Self::InvalidCode => {
                    response::err(StatusCode::BAD_REQUEST, "invalid or expired OTP")
                }
                Self::UnexpectedError => response::internal_error(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
