//! # League Recap Service
//!
//! Composition root for the recap platform: wires the league store,
//! Sleeper ingestor, recap engine, renderer, and GroupMe publisher behind
//! a scheduling loop with graceful shutdown.

pub mod config;
pub mod logging;
pub mod publisher;
pub mod recaps;
pub mod scheduler;
pub mod service;
pub mod signals;

pub use config::ServiceConfig;
pub use logging::initialize_logging;
pub use publisher::{GroupMePublisher, PublishError};
pub use recaps::{RecapService, ServiceError};
pub use scheduler::RecapScheduler;
pub use service::{HealthStatus, ServiceState, SyncReport};
pub use signals::setup_signal_handlers;
