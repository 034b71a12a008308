use std::fmt::Display;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::{
    Router,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};

use repository::ThreadRepository;
use service::ThreadService;

use crate::{state::AppState, user};

mod handler;
pub mod model;
pub mod repository;
pub mod service;

type Result<T> = std::result::Result<T, Error>;

pub type Repository = Arc<dyn ThreadRepository + Send + Sync>;
pub type Service = Arc<dyn ThreadService + Send + Sync>;

const ID_SEPARATOR: char = ':';

/// Both subs in lexicographic order joined by `:`, so a pair maps to at
/// most one thread document.
#[derive(Clone, Debug, Deserialize, Serialize, Hash, PartialEq, Eq)]
pub struct Id(pub String);

impl Id {
    pub fn of(a: &user::Sub, b: &user::Sub) -> Self {
        assert_ne!(a, b);

        let (first, second) = if a.0 <= b.0 { (a, b) } else { (b, a) };
        Self(format!("{first}{ID_SEPARATOR}{second}"))
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn api<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/threads", get(handler::api::find_all))
        .route("/threads/{id}", get(handler::api::find_one))
        .route("/threads/{id}/read", put(handler::api::mark_read))
        .with_state(s)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("thread not found: {0:?}")]
    NotFound(Id),
    #[error("not a member of the thread")]
    NotMember,

    #[error(transparent)]
    _MongoDB(#[from] mongodb::error::Error),

    #[error(transparent)]
    _Bson(#[from] mongodb::bson::ser::Error),
}

impl From<Error> for StatusCode {
    fn from(e: Error) -> Self {
        match e {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::NotMember => StatusCode::FORBIDDEN,
            Error::_MongoDB(_) | Error::_Bson(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn should_derive_same_id_for_both_orderings() {
        let alice = user::Sub("alice".to_string());
        let bob = user::Sub("bob".to_string());

        let expected = Id("alice:bob".to_string());

        assert_eq!(Id::of(&alice, &bob), expected);
        assert_eq!(Id::of(&bob, &alice), expected);
    }

    #[test]
    #[should_panic]
    fn should_panic_on_identical_members() {
        let alice = user::Sub("alice".to_string());

        Id::of(&alice, &alice);
    }
}
