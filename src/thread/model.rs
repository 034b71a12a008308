use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::message::model::LastMessage;
use crate::user;

use super::Id;

/// `unread_count` is the legacy aggregate older readers still consume; it
/// is recomputed as the sum of `unread_counts` on every mutation, never
/// adjusted on its own.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Thread {
    #[serde(rename = "_id")]
    id: Id,
    members: [user::Sub; 2],
    /// Absent on documents written before per-member counters existed.
    #[serde(default)]
    unread_counts: HashMap<user::Sub, u32>,
    #[serde(default)]
    unread_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_message: Option<LastMessage>,
    created_at: i64,
    updated_at: i64,
}

impl Thread {
    pub fn new(members: [user::Sub; 2]) -> Self {
        let now = chrono::Utc::now().timestamp();
        let unread_counts = members.iter().cloned().map(|m| (m, 0)).collect();

        Self {
            id: Id::of(&members[0], &members[1]),
            members,
            unread_counts,
            unread_count: 0,
            last_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub const fn id(&self) -> &Id {
        &self.id
    }

    pub const fn members(&self) -> &[user::Sub; 2] {
        &self.members
    }

    pub const fn unread_counts(&self) -> &HashMap<user::Sub, u32> {
        &self.unread_counts
    }

    pub const fn unread_count(&self) -> u32 {
        self.unread_count
    }

    pub const fn last_message(&self) -> Option<&LastMessage> {
        self.last_message.as_ref()
    }

    pub const fn updated_at(&self) -> i64 {
        self.updated_at
    }

    pub fn other_member(&self, viewer: &user::Sub) -> &user::Sub {
        assert!(self.members.contains(viewer));

        if self.members[0].eq(viewer) {
            &self.members[1]
        } else {
            &self.members[0]
        }
    }

    pub fn unread_for(&self, sub: &user::Sub) -> u32 {
        self.unread_counts.get(sub).copied().unwrap_or(0)
    }
}

impl Thread {
    /// Sender's counter drops to zero, the recipient's goes up by one.
    /// Tolerates absent or partial counter state on legacy documents.
    pub fn register_sent(&mut self, sender: &user::Sub, recipient: &user::Sub, msg: LastMessage) {
        self.unread_counts.insert(sender.clone(), 0);
        *self.unread_counts.entry(recipient.clone()).or_insert(0) += 1;
        self.last_message = Some(msg);
        self.touch();
    }

    pub fn reset_unread(&mut self, reader: &user::Sub) {
        self.unread_counts.insert(reader.clone(), 0);
        self.touch();
    }

    /// Migration path; does not bump `updated_at`.
    pub fn install_unread_counts(&mut self, counts: HashMap<user::Sub, u32>) {
        self.unread_counts = counts;
        self.unread_count = self.unread_counts.values().sum();
    }

    fn touch(&mut self) {
        self.unread_count = self.unread_counts.values().sum();
        self.updated_at = chrono::Utc::now().timestamp();
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ThreadDto {
    pub id: Id,
    pub recipient: user::Sub,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<LastMessage>,
    pub unread_count: u32,
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn alice() -> user::Sub {
        user::Sub("alice".to_string())
    }

    fn bob() -> user::Sub {
        user::Sub("bob".to_string())
    }

    fn preview(owner: &user::Sub, text: &str) -> LastMessage {
        LastMessage {
            owner: owner.clone(),
            text: text.to_string(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    #[test]
    fn should_start_with_zeroed_counters_for_both_members() {
        let thread = Thread::new([alice(), bob()]);

        assert_eq!(thread.unread_for(&alice()), 0);
        assert_eq!(thread.unread_for(&bob()), 0);
        assert_eq!(thread.unread_count(), 0);
        assert_eq!(thread.unread_counts().len(), 2);
    }

    #[test]
    fn should_charge_recipient_and_clear_sender() {
        let mut thread = Thread::new([alice(), bob()]);

        thread.register_sent(&alice(), &bob(), preview(&alice(), "hello"));
        thread.register_sent(&alice(), &bob(), preview(&alice(), "anyone?"));

        assert_eq!(thread.unread_for(&alice()), 0);
        assert_eq!(thread.unread_for(&bob()), 2);
        assert_eq!(thread.unread_count(), 2);

        thread.register_sent(&bob(), &alice(), preview(&bob(), "here"));

        assert_eq!(thread.unread_for(&alice()), 1);
        assert_eq!(thread.unread_for(&bob()), 0);
        assert_eq!(thread.unread_count(), 1);
        assert_eq!(thread.last_message().unwrap().text, "here");
    }

    #[test]
    fn should_reset_only_the_reader() {
        let raw = json!({
            "_id": "alice:bob",
            "members": ["alice", "bob"],
            "unread_counts": { "alice": 2, "bob": 3 },
            "unread_count": 5,
            "created_at": 1_700_000_000,
            "updated_at": 1_700_000_000,
        });
        let mut thread: Thread = serde_json::from_value(raw).unwrap();

        thread.reset_unread(&alice());

        assert_eq!(thread.unread_for(&alice()), 0);
        assert_eq!(thread.unread_for(&bob()), 3);
        assert_eq!(thread.unread_count(), 3);
    }

    #[test]
    fn should_read_legacy_document_without_counters() {
        let raw = json!({
            "_id": "alice:bob",
            "members": ["alice", "bob"],
            "unread_count": 5,
            "created_at": 1_700_000_000,
            "updated_at": 1_700_000_000,
        });

        let thread: Thread = serde_json::from_value(raw).unwrap();

        assert!(thread.unread_counts().is_empty());
        assert_eq!(thread.unread_count(), 5);
        assert_eq!(thread.unread_for(&alice()), 0);
    }

    #[test]
    fn should_recompute_aggregate_when_legacy_document_is_touched() {
        let raw = json!({
            "_id": "alice:bob",
            "members": ["alice", "bob"],
            "unread_count": 5,
            "created_at": 1_700_000_000,
            "updated_at": 1_700_000_000,
        });
        let mut thread: Thread = serde_json::from_value(raw).unwrap();

        thread.register_sent(&alice(), &bob(), preview(&alice(), "hello"));

        assert_eq!(thread.unread_for(&alice()), 0);
        assert_eq!(thread.unread_for(&bob()), 1);
        // stale aggregate is replaced by the sum of the rebuilt map
        assert_eq!(thread.unread_count(), 1);
    }

    #[test]
    fn should_install_counters_without_reordering_inbox() {
        let raw = json!({
            "_id": "alice:bob",
            "members": ["alice", "bob"],
            "unread_count": 3,
            "created_at": 1_700_000_000,
            "updated_at": 1_700_000_123,
        });
        let mut thread: Thread = serde_json::from_value(raw).unwrap();

        let counts = thread.members().iter().cloned().map(|m| (m, 0)).collect();
        thread.install_unread_counts(counts);

        assert_eq!(thread.unread_for(&alice()), 0);
        assert_eq!(thread.unread_for(&bob()), 0);
        assert_eq!(thread.unread_count(), 0);
        assert_eq!(thread.updated_at(), 1_700_000_123);
    }

    #[test]
    fn should_expose_the_other_member() {
        let thread = Thread::new([alice(), bob()]);

        assert_eq!(thread.other_member(&alice()), &bob());
        assert_eq!(thread.other_member(&bob()), &alice());
    }
}
