use async_trait::async_trait;

use crate::event::{Notification, Subject};
use crate::{event, message, thread, user};

use super::Repository;
use super::model::{Message, MessageDto};

#[async_trait]
pub trait MessageService {
    async fn create(&self, message: Message) -> super::Result<MessageDto>;

    /// Oldest first; `limit` keeps the newest entries of the window.
    async fn find_chat_history(
        &self,
        logged_sub: &user::Sub,
        recipient: &user::Sub,
        limit: Option<i64>,
        before: Option<i64>,
    ) -> super::Result<Vec<MessageDto>>;

    async fn mark_seen(&self, reader: &user::Sub, id: &message::Id) -> super::Result<()>;

    async fn delete(&self, owner: &user::Sub, id: &message::Id) -> super::Result<()>;
}

#[derive(Clone)]
pub struct MessageServiceImpl {
    repo: Repository,
    thread_service: thread::Service,
    event_service: event::Service,
}

impl MessageServiceImpl {
    pub fn new(
        repo: Repository,
        thread_service: thread::Service,
        event_service: event::Service,
    ) -> Self {
        Self {
            repo,
            thread_service,
            event_service,
        }
    }
}

#[async_trait]
impl MessageService for MessageServiceImpl {
    async fn create(&self, message: Message) -> super::Result<MessageDto> {
        if message.text.trim().is_empty() {
            return Err(message::Error::EmptyText);
        }
        if message.owner.eq(&message.recipient) {
            return Err(message::Error::SelfReference);
        }

        self.repo.insert(&message).await?;
        self.thread_service.record_sent(&message).await?;

        let dto = MessageDto::from(message);
        self.event_service
            .publish(
                &Subject::Notifications(&dto.recipient),
                &Notification::NewMessage {
                    message: dto.clone(),
                },
            )
            .await;

        Ok(dto)
    }

    async fn find_chat_history(
        &self,
        logged_sub: &user::Sub,
        recipient: &user::Sub,
        limit: Option<i64>,
        before: Option<i64>,
    ) -> super::Result<Vec<MessageDto>> {
        let mut messages = self
            .repo
            .find_by_participants(logged_sub, recipient, limit, before)
            .await?;

        // newest first in storage order, oldest first on the wire
        messages.reverse();

        Ok(messages.into_iter().map(MessageDto::from).collect())
    }

    async fn mark_seen(&self, reader: &user::Sub, id: &message::Id) -> super::Result<()> {
        let message = self.repo.find_by_id(id).await?;

        if message.recipient.ne(reader) {
            return Err(message::Error::NotRecipient);
        }

        let already_seen = message.seen();
        if !already_seen {
            let read_at = chrono::Utc::now().timestamp();
            self.repo.mark_seen(id, read_at).await?;
        }

        // re-driven even when the flag is already set, so a retry after a
        // partial failure still settles the unread counter
        self.thread_service
            .mark_read(
                &thread::Id::of(&message.owner, &message.recipient),
                reader,
            )
            .await?;

        if !already_seen {
            self.event_service
                .publish(
                    &Subject::Notifications(&message.owner),
                    &Notification::SeenMessage { id: id.to_owned() },
                )
                .await;
        }

        Ok(())
    }

    async fn delete(&self, owner: &user::Sub, id: &message::Id) -> super::Result<()> {
        let message = self.repo.find_by_id(id).await?;

        if message.owner.ne(owner) {
            return Err(message::Error::NotOwner);
        }

        self.repo.delete(id).await?;

        self.event_service
            .publish(
                &Subject::Notifications(&message.recipient),
                &Notification::DeletedMessage { id: id.to_owned() },
            )
            .await;

        Ok(())
    }
}
