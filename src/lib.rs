use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;

pub mod event;
pub mod integration;
pub mod message;
pub mod state;
pub mod thread;
pub mod user;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    _Message(#[from] message::Error),
    #[error(transparent)]
    _Thread(#[from] thread::Error),
    #[error(transparent)]
    _User(#[from] user::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!("{self}");

        let message = self.to_string();
        let status: StatusCode = match self {
            Self::_Message(e) => e.into(),
            Self::_Thread(e) => e.into(),
            Self::_User(e) => e.into(),
        };

        if status.is_server_error() {
            return (status, "Internal server error".to_owned()).into_response();
        }

        (status, message).into_response()
    }
}
