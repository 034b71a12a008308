use std::sync::Arc;

use log::info;

use huddle_messenger::integration;
use huddle_messenger::thread::repository::MongoThreadRepository;
use huddle_messenger::thread::service::{ThreadService, ThreadServiceImpl};

// One-shot: installs zeroed counter maps on threads that predate them.
// Safe to re-run.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = integration::Config::default();
    let database = integration::db::init(&config.mongo);

    let service = ThreadServiceImpl::new(Arc::new(MongoThreadRepository::new(&database)));

    info!("scanning threads for missing unread counters");
    let updated = service.backfill_unread_counts().await?;

    println!("backfilled {updated} thread(s)");
    Ok(())
}
