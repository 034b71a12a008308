use serde::{Deserialize, Serialize};

use crate::user;

use super::Id;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Message {
    #[serde(rename = "_id")]
    id: Id,
    pub owner: user::Sub,
    pub recipient: user::Sub,
    pub subject: String,
    pub text: String,
    seen: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    read_at: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

impl Message {
    pub fn new(owner: user::Sub, recipient: user::Sub, subject: &str, text: &str) -> Self {
        let now = chrono::Utc::now().timestamp();

        Self {
            id: Id::random(),
            owner,
            recipient,
            subject: subject.to_string(),
            text: text.to_string(),
            seen: false,
            read_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub const fn id(&self) -> &Id {
        &self.id
    }

    pub const fn seen(&self) -> bool {
        self.seen
    }

    pub const fn read_at(&self) -> Option<i64> {
        self.read_at
    }

    pub const fn created_at(&self) -> i64 {
        self.created_at
    }

    // read_at is written once; callers guard against repeat calls
    pub fn mark_seen(&mut self, read_at: i64) {
        self.seen = true;
        self.read_at = Some(read_at);
        self.updated_at = read_at;
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LastMessage {
    pub owner: user::Sub,
    pub text: String,
    pub timestamp: i64,
}

impl From<&Message> for LastMessage {
    fn from(message: &Message) -> Self {
        Self {
            owner: message.owner.clone(),
            text: message.text.clone(),
            timestamp: message.created_at,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct MessageDto {
    pub id: Id,
    pub owner: user::Sub,
    pub recipient: user::Sub,
    pub subject: String,
    pub text: String,
    pub seen: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<i64>,
    pub created_at: i64,
}

impl From<Message> for MessageDto {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            owner: message.owner,
            recipient: message.recipient,
            subject: message.subject,
            text: message.text,
            seen: message.seen,
            read_at: message.read_at,
            created_at: message.created_at,
        }
    }
}
