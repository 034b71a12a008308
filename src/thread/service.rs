use async_trait::async_trait;
use log::info;

use crate::message::model::{LastMessage, Message};
use crate::{thread, user};

use super::Repository;
use super::model::{Thread, ThreadDto};

#[async_trait]
pub trait ThreadService {
    /// Creates the pair's thread on first contact.
    async fn record_sent(&self, message: &Message) -> super::Result<()>;

    /// Zeroes the reader's counter and nothing else. Idempotent.
    async fn mark_read(&self, id: &thread::Id, reader: &user::Sub) -> super::Result<()>;

    async fn find_all(&self, sub: &user::Sub) -> super::Result<Vec<ThreadDto>>;

    async fn find_by_id_and_sub(
        &self,
        id: &thread::Id,
        sub: &user::Sub,
    ) -> super::Result<ThreadDto>;

    /// Returns how many documents were updated; a re-run returns 0.
    async fn backfill_unread_counts(&self) -> super::Result<usize>;
}

#[derive(Clone)]
pub struct ThreadServiceImpl {
    repo: Repository,
}

impl ThreadServiceImpl {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl ThreadService for ThreadServiceImpl {
    async fn record_sent(&self, message: &Message) -> super::Result<()> {
        let id = thread::Id::of(&message.owner, &message.recipient);

        let mut thread = match self.repo.find_by_id(&id).await {
            Ok(thread) => thread,
            Err(thread::Error::NotFound(_)) => {
                Thread::new([message.owner.clone(), message.recipient.clone()])
            }
            Err(e) => return Err(e),
        };

        thread.register_sent(&message.owner, &message.recipient, LastMessage::from(message));

        self.repo.save(&thread).await
    }

    async fn mark_read(&self, id: &thread::Id, reader: &user::Sub) -> super::Result<()> {
        let mut thread = self.repo.find_by_id(id).await?;

        if !thread.members().contains(reader) {
            return Err(thread::Error::NotMember);
        }

        if thread.unread_for(reader) == 0 {
            return Ok(());
        }

        thread.reset_unread(reader);
        self.repo.save(&thread).await
    }

    async fn find_all(&self, sub: &user::Sub) -> super::Result<Vec<ThreadDto>> {
        let threads = self.repo.find_by_sub(sub).await?;

        Ok(threads
            .into_iter()
            .map(|thread| thread_to_dto(thread, sub))
            .collect())
    }

    async fn find_by_id_and_sub(
        &self,
        id: &thread::Id,
        sub: &user::Sub,
    ) -> super::Result<ThreadDto> {
        let thread = self.repo.find_by_id(id).await?;

        if !thread.members().contains(sub) {
            return Err(thread::Error::NotMember);
        }

        Ok(thread_to_dto(thread, sub))
    }

    async fn backfill_unread_counts(&self) -> super::Result<usize> {
        let legacy = self.repo.find_legacy().await?;
        info!("found {} thread(s) without unread counters", legacy.len());

        let mut updated = 0;
        for thread in &legacy {
            let counts = thread.members().iter().cloned().map(|m| (m, 0)).collect();

            if self.repo.init_unread_counts(thread.id(), &counts).await? {
                info!("backfilled counters for thread {}", thread.id());
                updated += 1;
            }
        }

        Ok(updated)
    }
}

fn thread_to_dto(thread: Thread, viewer: &user::Sub) -> ThreadDto {
    ThreadDto {
        id: thread.id().clone(),
        recipient: thread.other_member(viewer).clone(),
        unread_count: thread.unread_for(viewer),
        last_message: thread.last_message().cloned(),
    }
}
