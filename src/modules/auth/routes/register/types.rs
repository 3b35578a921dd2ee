pub mod request {
    use crate::utils::validation::{validate_account_type, validate_phone_number};
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        #[validate(custom(function = "validate_phone_number"))]
        pub phone: String,
        #[validate(custom(function = "validate_account_type"))]
        pub account_type: String,
    }
}

pub mod response {
    use crate::{
        modules::user::repository::User,
        utils::{response, validation},
    };
    use axum::{http::StatusCode, response::IntoResponse};
    use serde::Serialize;
    use validator::ValidationErrors;

    #[derive(Serialize)]
    pub struct Registered {
        pub token: String,
        pub user: User,
    }

    pub enum Success {
        Registered(Registered),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Registered(registered) => response::ok(StatusCode::CREATED, registered),
            }
        }
    }

    pub enum Error {
        FailedToValidate(ValidationErrors),
        InvalidAccountType,
        RegistrationFailed,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToValidate(errors) => validation::into_response(errors),
                Self::InvalidAccountType => response::err(
                    StatusCode::BAD_REQUEST,
                    "accountType must be one of: personal, children, business",
                ),
                Self::RegistrationFailed => response::internal_error(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
