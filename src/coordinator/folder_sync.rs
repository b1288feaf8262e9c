use std::path::Path;
use std::time::Duration;

use tokio::time::{Interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::atoms::storage::file_watcher::{FileEvent, FileWatcherHandle, start_watcher};
use crate::types::WatchConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncTrigger {
    Event(FileEvent),
    /// Fixed-interval re-read; anything changed out of band shows up at most
    /// one interval late.
    Poll,
}

/// Keeps the open folder fresh, through filesystem notifications when
/// available and periodic polling otherwise.
pub enum FolderSync {
    Watch(FileWatcherHandle),
    Poll(Interval),
}

fn poll_interval(poll_interval_ms: u64) -> Interval {
    let period = Duration::from_millis(poll_interval_ms.max(1));
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

impl FolderSync {
    pub fn start(folder: &Path, config: &WatchConfig) -> Self {
        if config.file_watch {
            match start_watcher(folder, config.file_watch_debounce_ms) {
                Ok(handle) => {
                    info!("watching {:?} for changes", folder);
                    return FolderSync::Watch(handle);
                }
                Err(e) => warn!("File watching unavailable, polling instead: {:#}", e),
            }
        }
        FolderSync::poll(config.poll_interval_ms)
    }

    pub fn poll(poll_interval_ms: u64) -> Self {
        FolderSync::Poll(poll_interval(poll_interval_ms))
    }

    pub fn is_polling(&self) -> bool {
        matches!(self, FolderSync::Poll(_))
    }

    /// Waits for the next reason to look at the folder again. A watcher that
    /// dies degrades to polling with `fallback_ms`.
    pub async fn next(&mut self, fallback_ms: u64) -> SyncTrigger {
        loop {
            match self {
                FolderSync::Watch(handle) => match handle.receiver.recv().await {
                    Some(event) => return SyncTrigger::Event(event),
                    None => {
                        warn!("File watcher stopped, polling instead");
                        *self = FolderSync::poll(fallback_ms);
                    }
                },
                FolderSync::Poll(interval) => {
                    interval.tick().await;
                    return SyncTrigger::Poll;
                }
            }
        }
    }
}
