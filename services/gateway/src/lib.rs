//! HTTP gateway for the matching engine
//!
//! Thin axum surface over [`matching_engine::MatchingEngine`] plus the
//! [`dispatcher::Dispatcher`] that delivers fill callbacks. No matching logic
//! lives here.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;

pub use config::GatewayConfig;
pub use dispatcher::{CallbackTransport, Dispatcher, DispatcherConfig, HttpTransport};
pub use router::create_router;
pub use state::AppState;
