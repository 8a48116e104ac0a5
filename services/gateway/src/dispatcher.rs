//! Fill callback dispatcher
//!
//! Receives addressed fill notices from the engine and POSTs them to each
//! user's callback target. A bounded queue separates the two: the engine only
//! enqueues, and a single worker task performs delivery in FIFO order.
//! Delivery is fire-and-forget; failures are counted and logged, never
//! retried.
//!
//! Enqueueing never waits: the engine publishes while holding a book lock, so
//! a full queue sheds a notice under the configured [`OverflowPolicy`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::ValueEnum;
use flume::{Receiver, Sender, TrySendError};
use matching_engine::events::{FillCallback, FillNotice, FillSink};
use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// What to do with a notice when the queue is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    /// Discard the incoming notice
    #[default]
    DropNewest,
    /// Evict the oldest queued notice to make room for the incoming one
    DropOldest,
}

#[derive(Debug, Clone, Copy)]
pub struct DispatcherConfig {
    pub capacity: usize,
    pub policy: OverflowPolicy,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            policy: OverflowPolicy::DropNewest,
        }
    }
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("callback request failed: {0}")]
    Transport(String),

    #[error("callback target responded with status {0}")]
    Status(u16),
}

/// Outbound leg of a delivery
#[async_trait]
pub trait CallbackTransport: Send + Sync + 'static {
    async fn deliver(&self, target: &str, payload: &FillCallback) -> Result<(), DeliveryError>;
}

/// JSON POST over HTTP
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CallbackTransport for HttpTransport {
    async fn deliver(&self, target: &str, payload: &FillCallback) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(target)
            .json(payload)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DeliveryError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Dispatcher counters at a point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    pub enqueued: u64,
    pub delivered: u64,
    pub failed: u64,
    /// Refused at the door: queue full under `DropNewest`, or closed
    pub dropped: u64,
    /// Accepted, then pushed out of the queue under `DropOldest`
    pub evicted: u64,
}

#[derive(Debug, Default)]
struct Counters {
    enqueued: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
    evicted: AtomicU64,
}

enum Job {
    Deliver(FillNotice),
    Stop,
}

pub struct Dispatcher {
    tx: Sender<Job>,
    /// Handle on the queue's front, for eviction
    rx: Receiver<Job>,
    policy: OverflowPolicy,
    /// Held shared while enqueueing and exclusively while closing, so no
    /// notice can land behind the stop sentinel
    closed: RwLock<bool>,
    counters: Arc<Counters>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Dispatcher {
    /// Start the delivery worker on the current tokio runtime
    pub fn spawn(config: DispatcherConfig, transport: Arc<dyn CallbackTransport>) -> Arc<Self> {
        let (tx, rx) = flume::bounded(config.capacity.max(1));
        let counters = Arc::new(Counters::default());
        let worker = tokio::spawn(run_worker(rx.clone(), transport, Arc::clone(&counters)));

        info!(capacity = config.capacity, policy = ?config.policy, "Dispatcher started");
        Arc::new(Self {
            tx,
            rx,
            policy: config.policy,
            closed: RwLock::new(false),
            counters,
            worker: Mutex::new(Some(worker)),
        })
    }

    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            enqueued: self.counters.enqueued.load(Ordering::Relaxed),
            delivered: self.counters.delivered.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
            evicted: self.counters.evicted.load(Ordering::Relaxed),
        }
    }

    /// Notices waiting for the worker
    pub fn queued(&self) -> usize {
        self.tx.len()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.read()
    }

    /// Stop accepting notices and wait for the worker to drain the queue
    pub async fn shutdown(&self) {
        let first = {
            let mut closed = self.closed.write();
            !std::mem::replace(&mut *closed, true)
        };
        if first {
            let running = self.worker.lock().await.as_ref().is_some_and(|w| !w.is_finished());
            if running {
                // Every accepted notice is already ahead of the sentinel
                let _ = self.tx.send_async(Job::Stop).await;
            }
        }

        let worker = self.worker.lock().await.take();
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                warn!(error = %e, "Dispatcher worker ended abnormally");
            }
            let stats = self.stats();
            info!(
                enqueued = stats.enqueued,
                delivered = stats.delivered,
                failed = stats.failed,
                dropped = stats.dropped,
                evicted = stats.evicted,
                "Dispatcher drained"
            );
        }
    }

    fn enqueue(&self, notice: FillNotice) {
        let closed = self.closed.read();
        if *closed {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            debug!(order_id = %notice.payload.order_id, "Dispatcher closed, dropping notice");
            return;
        }

        let mut job = Job::Deliver(notice);
        let sent = loop {
            match self.tx.try_send(job) {
                Ok(()) => break true,
                Err(TrySendError::Full(rejected)) => match self.policy {
                    OverflowPolicy::DropNewest => {
                        if let Job::Deliver(notice) = &rejected {
                            warn!(
                                order_id = %notice.payload.order_id,
                                target = %notice.target,
                                "Dispatch queue full, dropping notice"
                            );
                        }
                        break false;
                    }
                    OverflowPolicy::DropOldest => {
                        if let Ok(Job::Deliver(oldest)) = self.rx.try_recv() {
                            self.counters.evicted.fetch_add(1, Ordering::Relaxed);
                            warn!(
                                order_id = %oldest.payload.order_id,
                                target = %oldest.target,
                                "Dispatch queue full, evicting oldest notice"
                            );
                        }
                        job = rejected;
                    }
                },
                Err(TrySendError::Disconnected(_)) => break false,
            }
        };

        let counter = if sent { &self.counters.enqueued } else { &self.counters.dropped };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl FillSink for Dispatcher {
    fn publish(&self, notices: Vec<FillNotice>) {
        for notice in notices {
            self.enqueue(notice);
        }
    }
}

async fn run_worker(rx: Receiver<Job>, transport: Arc<dyn CallbackTransport>, counters: Arc<Counters>) {
    while let Ok(job) = rx.recv_async().await {
        match job {
            Job::Deliver(notice) => deliver(transport.as_ref(), &counters, notice).await,
            Job::Stop => break,
        }
    }
    debug!("Dispatcher worker stopped");
}

async fn deliver(transport: &dyn CallbackTransport, counters: &Counters, notice: FillNotice) {
    match transport.deliver(&notice.target, &notice.payload).await {
        Ok(()) => {
            counters.delivered.fetch_add(1, Ordering::Relaxed);
            debug!(
                target = %notice.target,
                order_id = %notice.payload.order_id,
                fill_id = %notice.payload.fill_id,
                "Fill callback delivered"
            );
        }
        Err(e) => {
            counters.failed.fetch_add(1, Ordering::Relaxed);
            warn!(
                target = %notice.target,
                order_id = %notice.payload.order_id,
                error = %e,
                "Fill callback failed"
            );
        }
    }
}
