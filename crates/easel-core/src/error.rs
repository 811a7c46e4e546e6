use thiserror::Error;

use crate::api::ApiError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("session runtime is no longer running")]
    SessionClosed,
}
