//! Page cache bypass signal.
//!
//! Header driven language selection is not part of any page cache key, so a response
//! whose language may depend on request headers must not be stored by a shared page
//! cache. Negotiation reports this through a [`CacheKillSwitch`].

use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg_attr(test, mockall::automock)]
pub trait CacheKillSwitch: Send + Sync {
    /// Marks the current response as not cacheable.
    fn trigger(&self);
}

/// A request scoped kill switch remembering whether it was triggered.
#[derive(Debug, Default)]
pub struct PageCacheKillSwitch {
    triggers: AtomicUsize,
}

impl PageCacheKillSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_triggered(&self) -> bool {
        self.trigger_count() > 0
    }

    /// How many times [`CacheKillSwitch::trigger`] was called on this switch.
    pub fn trigger_count(&self) -> usize {
        self.triggers.load(Ordering::Relaxed)
    }
}

impl CacheKillSwitch for PageCacheKillSwitch {
    fn trigger(&self) {
        self.triggers.fetch_add(1, Ordering::Relaxed);
    }
}

/// Response extension marking a response the page cache must not store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheBypass;
