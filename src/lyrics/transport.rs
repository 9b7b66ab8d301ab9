//! reqwest-backed [`Transport`].
//!
//! Requests are queued per (host, port). One drain task per pair pops the
//! next job (high priority first), waits for the rate limiter and spawns
//! the actual GET, so slow responses never hold up the schedule. When the
//! GET settles, the body or the failure goes to
//! [`on_complete`](super::response::on_complete).

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;

use super::domain::{LookupContext, LyricRequest, Priority, TransportError};
use super::ratelimit::{self, HostKey, RateLimiter};
use super::response;
use super::traits::Transport;

/// User agent sent with every request
const USER_AGENT: &str = concat!("LyricsSeeds/", env!("CARGO_PKG_VERSION"));

/// A queued request and the context its completion needs.
struct Job {
    request: LyricRequest,
    context: LookupContext,
}

/// Pending jobs for one (host, port).
#[derive(Default)]
struct HostQueue {
    high: VecDeque<Job>,
    normal: VecDeque<Job>,
    draining: bool,
}

impl HostQueue {
    fn push(&mut self, job: Job) {
        match job.request.priority() {
            Priority::High => self.high.push_back(job),
            Priority::Normal => self.normal.push_back(job),
        }
    }

    fn pop(&mut self) -> Option<Job> {
        self.high.pop_front().or_else(|| self.normal.pop_front())
    }
}

struct Inner {
    client: reqwest::Client,
    limiter: &'static RateLimiter,
    queues: Mutex<HashMap<HostKey, HostQueue>>,
    runtime: Handle,
}

/// Non-blocking HTTP transport on the current tokio runtime.
#[derive(Clone)]
pub struct HttpTransport {
    inner: Arc<Inner>,
}

impl HttpTransport {
    /// Create a transport that paces requests with the process-wide limiter.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_limiter(ratelimit::global())
    }

    /// Create a transport that paces requests with `limiter`.
    pub fn with_limiter(limiter: &'static RateLimiter) -> Result<Self, TransportError> {
        let runtime = Handle::try_current().map_err(|e| TransportError::Setup(e.to_string()))?;
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                limiter,
                queues: Mutex::new(HashMap::new()),
                runtime,
            }),
        })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: LyricRequest, context: LookupContext) {
        let key = HostKey::new(request.host(), request.port());
        let start_drain = {
            let mut queues = self.inner.queues.lock();
            let queue = queues.entry(key.clone()).or_default();
            queue.push(Job { request, context });
            !std::mem::replace(&mut queue.draining, true)
        };

        if start_drain {
            let inner = Arc::clone(&self.inner);
            self.inner.runtime.spawn(drain(inner, key));
        }
    }
}

/// Send queued jobs for `key` one rate-limit slot at a time until the
/// queue is empty.
async fn drain(inner: Arc<Inner>, key: HostKey) {
    loop {
        let job = {
            let mut queues = inner.queues.lock();
            match queues.get_mut(&key).and_then(HostQueue::pop) {
                Some(job) => job,
                None => {
                    queues.remove(&key);
                    return;
                }
            }
        };

        inner.limiter.acquire(&key.host, key.port).await;
        inner.runtime.spawn(execute(inner.client.clone(), job));
    }
}

async fn execute(client: reqwest::Client, job: Job) {
    let payload = fetch(&client, &job.request).await;
    if let Err(e) = &payload {
        tracing::debug!(
            album = %job.context.album().name(),
            host = job.request.host(),
            error = %e,
            "lyrics request failed"
        );
    }
    response::on_complete(job.context, payload);
}

async fn fetch(client: &reqwest::Client, request: &LyricRequest) -> Result<String, TransportError> {
    let response = client
        .get(request.url())
        .send()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status(status.as_u16()));
    }

    response
        .text()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))
}
