use std::collections::HashMap;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::Database;
use mongodb::bson::{doc, to_bson};

use crate::{thread, user};

use super::model::Thread;

const THREADS_COLLECTION: &str = "threads";

#[async_trait]
pub trait ThreadRepository {
    async fn find_by_id(&self, id: &thread::Id) -> super::Result<Thread>;

    /// Most recent activity first.
    async fn find_by_sub(&self, sub: &user::Sub) -> super::Result<Vec<Thread>>;

    /// Full-document upsert; last write wins.
    async fn save(&self, thread: &Thread) -> super::Result<()>;

    /// Documents written before per-member counters existed.
    async fn find_legacy(&self) -> super::Result<Vec<Thread>>;

    /// Guarded: applies only while the document still has no counter map.
    /// Returns whether the document was modified.
    async fn init_unread_counts(
        &self,
        id: &thread::Id,
        counts: &HashMap<user::Sub, u32>,
    ) -> super::Result<bool>;
}

pub struct MongoThreadRepository {
    col: mongodb::Collection<Thread>,
}

impl MongoThreadRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            col: db.collection(THREADS_COLLECTION),
        }
    }
}

#[async_trait]
impl ThreadRepository for MongoThreadRepository {
    async fn find_by_id(&self, id: &thread::Id) -> super::Result<Thread> {
        let thread = self.col.find_one(doc! { "_id": id }).await?;
        thread.ok_or(thread::Error::NotFound(id.to_owned()))
    }

    async fn find_by_sub(&self, sub: &user::Sub) -> super::Result<Vec<Thread>> {
        let cursor = self
            .col
            .find(doc! { "members": sub })
            .sort(doc! { "last_message.timestamp": -1 })
            .await?;

        let threads = cursor.try_collect().await?;
        Ok(threads)
    }

    async fn save(&self, thread: &Thread) -> super::Result<()> {
        self.col
            .replace_one(doc! { "_id": thread.id() }, thread)
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn find_legacy(&self) -> super::Result<Vec<Thread>> {
        let cursor = self
            .col
            .find(doc! { "unread_counts": { "$exists": false } })
            .await?;

        let threads = cursor.try_collect().await?;
        Ok(threads)
    }

    async fn init_unread_counts(
        &self,
        id: &thread::Id,
        counts: &HashMap<user::Sub, u32>,
    ) -> super::Result<bool> {
        let counts = to_bson(counts)?;

        let res = self
            .col
            .update_one(
                doc! { "_id": id, "unread_counts": { "$exists": false } },
                doc! { "$set": { "unread_counts": counts, "unread_count": 0 } },
            )
            .await?;

        Ok(res.modified_count > 0)
    }
}

#[cfg(test)]
pub(crate) mod mem {
    use std::collections::HashSet;

    use tokio::sync::Mutex;

    use super::*;

    // missing_counts marks documents stored without a counter map
    #[derive(Default)]
    pub struct InMemoryThreadRepository {
        threads: Mutex<HashMap<thread::Id, Thread>>,
        missing_counts: Mutex<HashSet<thread::Id>>,
    }

    impl InMemoryThreadRepository {
        pub async fn seed_legacy(&self, thread: Thread) {
            self.missing_counts.lock().await.insert(thread.id().clone());
            self.threads
                .lock()
                .await
                .insert(thread.id().clone(), thread);
        }
    }

    #[async_trait]
    impl ThreadRepository for InMemoryThreadRepository {
        async fn find_by_id(&self, id: &thread::Id) -> crate::thread::Result<Thread> {
            self.threads
                .lock()
                .await
                .get(id)
                .cloned()
                .ok_or(thread::Error::NotFound(id.to_owned()))
        }

        async fn find_by_sub(&self, sub: &user::Sub) -> crate::thread::Result<Vec<Thread>> {
            let threads = self.threads.lock().await;

            let mut matched: Vec<Thread> = threads
                .values()
                .filter(|t| t.members().contains(sub))
                .cloned()
                .collect();

            matched.sort_by_key(|t| {
                std::cmp::Reverse(t.last_message().map(|m| m.timestamp).unwrap_or_default())
            });

            Ok(matched)
        }

        async fn save(&self, thread: &Thread) -> crate::thread::Result<()> {
            // a full-state write always carries the counter map
            self.missing_counts.lock().await.remove(thread.id());
            self.threads
                .lock()
                .await
                .insert(thread.id().clone(), thread.clone());
            Ok(())
        }

        async fn find_legacy(&self) -> crate::thread::Result<Vec<Thread>> {
            let missing = self.missing_counts.lock().await;
            let threads = self.threads.lock().await;

            Ok(threads
                .values()
                .filter(|t| missing.contains(t.id()))
                .cloned()
                .collect())
        }

        async fn init_unread_counts(
            &self,
            id: &thread::Id,
            counts: &HashMap<user::Sub, u32>,
        ) -> crate::thread::Result<bool> {
            if !self.missing_counts.lock().await.remove(id) {
                return Ok(false);
            }

            let mut threads = self.threads.lock().await;
            let thread = threads
                .get_mut(id)
                .ok_or(thread::Error::NotFound(id.to_owned()))?;

            thread.install_unread_counts(counts.clone());
            Ok(true)
        }
    }
}
