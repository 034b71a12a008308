use async_trait::async_trait;
use log::error;

use super::{Notification, Subject};

#[async_trait]
pub trait EventService {
    /// Best-effort; failures are logged and swallowed.
    async fn publish(&self, subject: &Subject<'_>, noti: &Notification);
}

#[derive(Clone)]
pub struct NatsEventService {
    pubsub: async_nats::Client,
}

impl NatsEventService {
    pub fn new(pubsub: async_nats::Client) -> Self {
        Self { pubsub }
    }
}

#[async_trait]
impl EventService for NatsEventService {
    async fn publish(&self, subject: &Subject<'_>, noti: &Notification) {
        if let Err(e) = self.pubsub.publish(subject, noti.into()).await {
            error!("failed to publish notification to {subject}: {e}");
        }
    }
}
