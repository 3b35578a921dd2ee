pub mod request {
    use crate::utils::validation::validate_phone_number;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    pub struct Payload {
        #[validate(custom(function = "validate_phone_number"))]
        pub phone: String,
    }
}

pub mod response {
    use crate::utils::{response, validation};
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::json;
    use validator::ValidationErrors;

    pub enum Success {
        CodeSent,
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::CodeSent => response::ok(StatusCode::OK, json!({ "success": true })),
            }
        }
    }

    pub enum Error {
        FailedToValidate(ValidationErrors),
        FailedToSendOtp,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToValidate(errors) => validation::into_response(errors),
                Self::FailedToSendOtp => response::internal_error(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
