use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::message::model::MessageDto;
use crate::{message, user};

pub mod service;

pub type Service = Arc<dyn service::EventService + Send + Sync>;

pub enum Subject<'a> {
    Notifications(&'a user::Sub),
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    NewMessage { message: MessageDto },
    SeenMessage { id: message::Id },
    DeletedMessage { id: message::Id },
}
