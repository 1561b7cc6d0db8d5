use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::config::PersistenceConfig;
use super::debounce::DebouncedTask;
use super::storage::{KeyValueStore, WriteOutcome, write_with_quota_recovery};

/// Where the restored horizontal offset came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "offset", rename_all = "camelCase")]
pub enum ScrollRestore {
    /// Previously saved offset, clamped to the current canvas.
    Stored(f64),
    /// Nothing valid was saved; the now marker is centered.
    CenteredOnNow(f64),
}

impl ScrollRestore {
    #[must_use]
    pub fn offset(self) -> f64 {
        match self {
            Self::Stored(offset) | Self::CenteredOnNow(offset) => offset,
        }
    }
}

/// Per-timeline horizontal scroll persistence.
///
/// The offset lives under its own key as a plain integer string, independent
/// of the view state payload.
#[derive(Debug)]
pub struct ScrollPositionManager<S: KeyValueStore> {
    store: S,
    key: String,
    config: PersistenceConfig,
    writes: DebouncedTask<u64>,
    torn_down: bool,
}

impl<S: KeyValueStore> ScrollPositionManager<S> {
    #[must_use]
    pub fn new(store: S, timeline_id: &str, config: PersistenceConfig) -> Self {
        Self {
            key: config.scroll_key(timeline_id),
            writes: DebouncedTask::new(config.debounce()),
            store,
            config,
            torn_down: false,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Saved offset, if present and a non-negative integer.
    #[must_use]
    pub fn saved_offset(&self) -> Option<u64> {
        let raw = match self.store.get(&self.key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(key = %self.key, error = %err, "scroll position unreadable");
                return None;
            }
        };
        match raw.trim().parse::<i64>() {
            Ok(offset) if offset >= 0 => u64::try_from(offset).ok(),
            _ => {
                debug!(key = %self.key, raw = %raw, "ignoring invalid saved scroll position");
                None
            }
        }
    }

    /// Offset to apply before the first paint.
    ///
    /// Uses the saved offset when valid, otherwise centers `now_x`. Both are
    /// clamped to `[0, total_width - viewport_width]`.
    #[must_use]
    pub fn restore(&self, viewport_width: f64, now_x: f64, total_width: f64) -> ScrollRestore {
        let viewport_width = finite_or_zero(viewport_width).max(0.0);
        let max_offset = (finite_or_zero(total_width) - viewport_width).max(0.0);

        let restored = match self.saved_offset() {
            Some(offset) => ScrollRestore::Stored((offset as f64).min(max_offset)),
            None => {
                let centered = finite_or_zero(now_x) - viewport_width / 2.0;
                ScrollRestore::CenteredOnNow(centered.clamp(0.0, max_offset))
            }
        };
        debug!(key = %self.key, ?restored, "scroll position restored");
        restored
    }

    /// Records a scroll event; the write happens after the quiet period.
    pub fn on_scroll(&mut self, scroll_left: f64, now: Instant) {
        if self.torn_down {
            return;
        }
        let offset = finite_or_zero(scroll_left).max(0.0).round() as u64;
        self.writes.schedule(offset, now);
    }

    pub fn poll(&mut self, now: Instant) -> Option<WriteOutcome> {
        let offset = self.writes.poll(now)?;
        Some(self.write(offset))
    }

    pub fn flush(&mut self) -> Option<WriteOutcome> {
        let offset = self.writes.take_now()?;
        Some(self.write(offset))
    }

    /// Stops listening and drops any unsaved offset.
    pub fn teardown(&mut self) -> bool {
        self.torn_down = true;
        self.writes.cancel()
    }

    fn write(&mut self, offset: u64) -> WriteOutcome {
        write_with_quota_recovery(
            &mut self.store,
            &self.key,
            &offset.to_string(),
            &self.config.prunable_key_marker,
            self.config.retain_recent_keys,
        )
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{ScrollPositionManager, ScrollRestore};
    use crate::persistence::{KeyValueStore, MemoryStore, PersistenceConfig};

    fn manager(store: MemoryStore) -> ScrollPositionManager<MemoryStore> {
        ScrollPositionManager::new(store, "fest", PersistenceConfig::default())
    }

    #[test]
    fn missing_or_invalid_offset_centers_now_marker() {
        let restored = manager(MemoryStore::new()).restore(400.0, 1000.0, 3000.0);
        assert_eq!(restored, ScrollRestore::CenteredOnNow(800.0));

        for raw in ["-5", "abc", "12.5", ""] {
            let mut store = MemoryStore::new();
            store.set("timeline-scroll-fest", raw).expect("seed");
            let restored = manager(store).restore(400.0, 100.0, 3000.0);
            assert_eq!(restored, ScrollRestore::CenteredOnNow(0.0), "raw {raw:?}");
        }
    }

    #[test]
    fn stored_offset_wins_and_is_clamped() {
        let mut store = MemoryStore::new();
        store.set("timeline-scroll-fest", "900").expect("seed");
        let scroll = manager(store);
        assert_eq!(scroll.restore(400.0, 0.0, 3000.0).offset(), 900.0);
        assert_eq!(scroll.restore(400.0, 0.0, 1000.0), ScrollRestore::Stored(600.0));
    }

    #[test]
    fn scroll_writes_are_throttled_and_cancelled_on_teardown() {
        let start = Instant::now();
        let mut scroll = manager(MemoryStore::new());
        scroll.on_scroll(120.4, start);
        scroll.on_scroll(180.6, start + Duration::from_millis(50));
        assert!(scroll.poll(start + Duration::from_millis(150)).is_none());
        assert!(scroll.poll(start + Duration::from_millis(200)).is_some());
        assert_eq!(scroll.saved_offset(), Some(181));

        scroll.on_scroll(500.0, start + Duration::from_millis(300));
        assert!(scroll.teardown());
        assert!(scroll.poll(start + Duration::from_secs(5)).is_none());
        assert_eq!(scroll.saved_offset(), Some(181));
    }
}
