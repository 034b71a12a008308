use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::Database;
use mongodb::bson::doc;

use crate::{message, user};

use super::model::Message;

const MESSAGES_COLLECTION: &str = "messages";

#[async_trait]
pub trait MessageRepository {
    async fn insert(&self, message: &Message) -> super::Result<()>;

    async fn find_by_id(&self, id: &message::Id) -> super::Result<Message>;

    /// Both directions, newest first; `before` is an exclusive bound on `created_at`.
    async fn find_by_participants(
        &self,
        a: &user::Sub,
        b: &user::Sub,
        limit: Option<i64>,
        before: Option<i64>,
    ) -> super::Result<Vec<Message>>;

    async fn mark_seen(&self, id: &message::Id, read_at: i64) -> super::Result<()>;

    async fn delete(&self, id: &message::Id) -> super::Result<()>;
}

pub struct MongoMessageRepository {
    col: mongodb::Collection<Message>,
}

impl MongoMessageRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            col: db.collection(MESSAGES_COLLECTION),
        }
    }
}

#[async_trait]
impl MessageRepository for MongoMessageRepository {
    async fn insert(&self, message: &Message) -> super::Result<()> {
        self.col.insert_one(message).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &message::Id) -> super::Result<Message> {
        let message = self.col.find_one(doc! { "_id": id }).await?;
        message.ok_or(message::Error::NotFound(Some(id.to_owned())))
    }

    async fn find_by_participants(
        &self,
        a: &user::Sub,
        b: &user::Sub,
        limit: Option<i64>,
        before: Option<i64>,
    ) -> super::Result<Vec<Message>> {
        let mut filter = doc! {
            "$or": [
                { "owner": a, "recipient": b },
                { "owner": b, "recipient": a },
            ]
        };
        if let Some(before) = before {
            filter.insert("created_at", doc! { "$lt": before });
        }

        let mut find = self.col.find(filter).sort(doc! { "created_at": -1 });
        if let Some(limit) = limit {
            find = find.limit(limit);
        }

        let cursor = find.await?;
        let messages = cursor.try_collect().await?;
        Ok(messages)
    }

    async fn mark_seen(&self, id: &message::Id, read_at: i64) -> super::Result<()> {
        let res = self
            .col
            .update_one(
                doc! { "_id": id },
                doc! { "$set": {
                    "seen": true,
                    "read_at": read_at,
                    "updated_at": read_at,
                }},
            )
            .await?;

        if res.matched_count == 0 {
            return Err(message::Error::NotFound(Some(id.to_owned())));
        }
        Ok(())
    }

    async fn delete(&self, id: &message::Id) -> super::Result<()> {
        self.col.delete_one(doc! { "_id": id }).await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod mem {
    use tokio::sync::Mutex;

    use super::*;

    // insertion order breaks created_at ties so history stays deterministic
    #[derive(Default)]
    pub struct InMemoryMessageRepository {
        messages: Mutex<Vec<Message>>,
    }

    impl InMemoryMessageRepository {
        pub async fn get(&self, id: &message::Id) -> Option<Message> {
            self.messages
                .lock()
                .await
                .iter()
                .find(|m| m.id() == id)
                .cloned()
        }
    }

    #[async_trait]
    impl MessageRepository for InMemoryMessageRepository {
        async fn insert(&self, message: &Message) -> crate::message::Result<()> {
            self.messages.lock().await.push(message.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: &message::Id) -> crate::message::Result<Message> {
            self.get(id)
                .await
                .ok_or(message::Error::NotFound(Some(id.to_owned())))
        }

        async fn find_by_participants(
            &self,
            a: &user::Sub,
            b: &user::Sub,
            limit: Option<i64>,
            before: Option<i64>,
        ) -> crate::message::Result<Vec<Message>> {
            let messages = self.messages.lock().await;

            let mut matched: Vec<Message> = messages
                .iter()
                .filter(|m| {
                    (m.owner.eq(a) && m.recipient.eq(b)) || (m.owner.eq(b) && m.recipient.eq(a))
                })
                .filter(|m| before.is_none_or(|b| m.created_at() < b))
                .cloned()
                .collect();

            matched.reverse();
            matched.sort_by_key(|m| std::cmp::Reverse(m.created_at()));
            if let Some(limit) = limit {
                matched.truncate(limit as usize);
            }

            Ok(matched)
        }

        async fn mark_seen(&self, id: &message::Id, read_at: i64) -> crate::message::Result<()> {
            let mut messages = self.messages.lock().await;
            let message = messages
                .iter_mut()
                .find(|m| m.id() == id)
                .ok_or(message::Error::NotFound(Some(id.to_owned())))?;

            message.mark_seen(read_at);
            Ok(())
        }

        async fn delete(&self, id: &message::Id) -> crate::message::Result<()> {
            self.messages.lock().await.retain(|m| m.id() != id);
            Ok(())
        }
    }
}
