//! Minimum spacing between requests to the same (host, port).
//!
//! The registry is process-wide, read-mostly configuration: policies are
//! registered once at startup ([`register_rate_policy`](super::register_rate_policy))
//! and consulted by the transport before every send. Registering the same
//! pair again overwrites its delay; pairs without a policy are not delayed.
//!
//! Each pair keeps the instant of its next free dispatch slot. Reserving a
//! slot happens under a short lock and the wait itself happens outside it,
//! so one pair never holds up another.

use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// A remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostKey {
    pub host: String,
    pub port: u16,
}

impl HostKey {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl std::fmt::Display for HostKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug)]
struct Slot {
    min_delay: Duration,
    next_dispatch: Option<Instant>,
}

/// Registry of per-endpoint minimum delays.
#[derive(Debug, Default)]
pub struct RateLimiter {
    slots: Mutex<HashMap<HostKey, Slot>>,
}

static GLOBAL: LazyLock<RateLimiter> = LazyLock::new(RateLimiter::new);

/// The process-wide limiter used by [`HttpTransport`](super::HttpTransport).
pub fn global() -> &'static RateLimiter {
    &GLOBAL
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum delay between two dispatches to `host:port`.
    ///
    /// Last writer wins. An already reserved schedule is kept.
    pub fn register(&self, host: &str, port: u16, min_delay: Duration) {
        let mut slots = self.slots.lock();
        slots
            .entry(HostKey::new(host, port))
            .and_modify(|slot| slot.min_delay = min_delay)
            .or_insert(Slot {
                min_delay,
                next_dispatch: None,
            });
    }

    /// Registered delay for `host:port`, if any.
    pub fn min_delay(&self, host: &str, port: u16) -> Option<Duration> {
        self.slots
            .lock()
            .get(&HostKey::new(host, port))
            .map(|slot| slot.min_delay)
    }

    /// Reserve the next dispatch slot for `host:port` and return how long
    /// the caller must wait before sending.
    pub fn reserve(&self, host: &str, port: u16) -> Duration {
        let mut slots = self.slots.lock();
        let Some(slot) = slots.get_mut(&HostKey::new(host, port)) else {
            return Duration::ZERO;
        };

        let now = Instant::now();
        let due = slot.next_dispatch.map_or(now, |next| next.max(now));
        slot.next_dispatch = Some(due + slot.min_delay);
        due - now
    }

    /// Wait until a request to `host:port` may be sent.
    pub async fn acquire(&self, host: &str, port: u16) {
        let wait = self.reserve(host, port);
        if !wait.is_zero() {
            tracing::debug!(
                host,
                port,
                wait_ms = wait.as_millis() as u64,
                "Rate limiting: delaying request"
            );
            tokio::time::sleep(wait).await;
        }
    }
}
