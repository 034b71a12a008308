use std::sync::Arc;

use axum::extract::FromRef;

use crate::event::service::NatsEventService;
use crate::message::repository::MongoMessageRepository;
use crate::message::service::MessageServiceImpl;
use crate::thread::repository::MongoThreadRepository;
use crate::thread::service::ThreadServiceImpl;
use crate::{integration, message, thread};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub message_service: message::Service,
    pub thread_service: thread::Service,
}

impl AppState {
    pub async fn init(config: &integration::Config) -> Self {
        let database = integration::db::init(&config.mongo);
        let pubsub = config.pubsub.connect().await;

        let thread_service: thread::Service = Arc::new(ThreadServiceImpl::new(Arc::new(
            MongoThreadRepository::new(&database),
        )));

        let message_service: message::Service = Arc::new(MessageServiceImpl::new(
            Arc::new(MongoMessageRepository::new(&database)),
            thread_service.clone(),
            Arc::new(NatsEventService::new(pubsub)),
        ));

        Self {
            message_service,
            thread_service,
        }
    }
}
