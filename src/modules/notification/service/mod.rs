pub mod sms;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("notification not sent: {0}")]
    NotSent(String),
}

pub type Result<T> = std::result::Result<T, Error>;
