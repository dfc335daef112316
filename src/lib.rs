//! Triage: support-ticket lifecycle engine.
//!
//! Tasks are opened against a cluster of similar problems, advanced from
//! open through in progress to closed, and automatically appointed to the
//! least-loaded active agent. Closing a task records its reaction and
//! resolution times for per-cluster statistics.
//!
//! # Architecture
//!
//! Every bounded context follows hexagonal architecture:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (`PostgreSQL`,
//!   files, HTTP, in-memory)
//! - **Services**: Orchestration over ports
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle engine and appointment
//! - [`catalog`]: Cases and clusters
//! - [`directory`]: Users and running-average load bookkeeping
//! - [`analytics`]: Timing samples and per-cluster summaries
//! - [`notification`]: Appointment notifications
//! - [`config`], [`telemetry`], [`db`], [`app`]: Runtime plumbing
//! - [`error`]: Caller-facing error taxonomy

pub mod analytics;
pub mod app;
pub mod catalog;
pub mod config;
pub mod db;
pub mod directory;
pub mod error;
pub mod notification;
pub mod task;
pub mod telemetry;
