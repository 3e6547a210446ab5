mod collection;
mod meta;
mod notifications;
mod status;

pub use collection::CollectionStore;
pub use meta::MetaStore;
pub use notifications::NotificationStore;
pub use status::FetchStatus;

use crate::models::Record;

/// Task list cache: list, create and single-record reads.
pub type TasksStore = CollectionStore<Record>;
