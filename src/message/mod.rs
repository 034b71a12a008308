use std::fmt::Display;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};

use repository::MessageRepository;
use service::MessageService;

use crate::{state::AppState, thread};

mod handler;
pub mod model;
pub mod repository;
pub mod service;

type Result<T> = std::result::Result<T, Error>;

pub type Repository = Arc<dyn MessageRepository + Send + Sync>;
pub type Service = Arc<dyn MessageService + Send + Sync>;

#[derive(Clone, Debug, Deserialize, Serialize, Hash, PartialEq, Eq)]
pub struct Id(pub String);

impl Id {
    pub fn random() -> Self {
        Self(mongodb::bson::oid::ObjectId::new().to_hex())
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn api<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/messages", post(handler::api::create))
        .route("/messages", get(handler::api::find_all))
        .route("/messages/{id}/seen", put(handler::api::mark_seen))
        .route("/messages/{id}", delete(handler::api::delete))
        .with_state(state)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("message not found: {0:?}")]
    NotFound(Option<Id>),
    #[error("not the owner of the message")]
    NotOwner,
    #[error("not the recipient of the message")]
    NotRecipient,
    #[error("message text is empty")]
    EmptyText,
    #[error("sender and recipient are the same user")]
    SelfReference,
    #[error("query parameter not present: {0}")]
    QueryParamRequired(String),

    #[error(transparent)]
    _Thread(#[from] thread::Error),

    #[error(transparent)]
    _MongoDB(#[from] mongodb::error::Error),
}

impl From<Error> for StatusCode {
    fn from(e: Error) -> Self {
        match e {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::NotOwner | Error::NotRecipient => StatusCode::FORBIDDEN,
            Error::EmptyText | Error::SelfReference | Error::QueryParamRequired(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::_Thread(e) => e.into(),
            Error::_MongoDB(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
