use crate::dispatcher::Dispatcher;
use crate::error::AppError;
use matching_engine::MatchingEngine;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MatchingEngine>,
    pub dispatcher: Arc<Dispatcher>,
    /// Woken by `POST /shutdown`; the server stops once notified
    pub shutdown: Arc<Notify>,
    draining: Arc<AtomicBool>,
}

impl AppState {
    /// Build an engine that publishes its fills to `dispatcher`
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        let engine = Arc::new(MatchingEngine::new(dispatcher.clone()));
        Self {
            engine,
            dispatcher,
            shutdown: Arc::new(Notify::new()),
            draining: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Refuse new work and wake the server's shutdown future
    pub fn begin_shutdown(&self) {
        if !self.draining.swap(true, Ordering::AcqRel) {
            tracing::info!("Shutdown requested");
            self.shutdown.notify_one();
        }
    }

    pub fn ensure_accepting(&self) -> Result<(), AppError> {
        if self.draining.load(Ordering::Acquire) {
            return Err(AppError::ServiceUnavailable("server is shutting down".into()));
        }
        Ok(())
    }
}
