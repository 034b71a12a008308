use std::fmt::Display;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

pub mod middleware;

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Sub(pub String);

impl Display for Sub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Sub {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Sub {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Sub, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Sub(s))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("missing caller identity")]
    MissingIdentity,
}

impl From<Error> for StatusCode {
    fn from(e: Error) -> Self {
        match e {
            Error::MissingIdentity => StatusCode::UNAUTHORIZED,
        }
    }
}
