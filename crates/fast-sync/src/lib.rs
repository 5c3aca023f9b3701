//! Fast blocks sync for the Basalt execution client.
//!
//! Historical blocks below the pivot are downloaded in parallel and out of order. The
//! [`SyncStatusList`] hands out non-overlapping batches of heights to download workers and keeps
//! track of the lowest height below which everything has been inserted, which is what the rest
//! of the client watches to know when fast sync is done. [`FastBlocksSyncer`] runs those workers.

mod errors;
mod status;
mod status_list;
mod worker;

pub use errors::{FastSyncError, InsertError, SourceError};
pub use status::FastBlockStatus;
pub use status_list::SyncStatusList;
pub use worker::{BlockSink, BlockSource, FastBlocksSyncer, SyncReport};
