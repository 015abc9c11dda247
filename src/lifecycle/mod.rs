//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Install log sinks → Spawn sampler → Bind listener → Serve
//!
//! Shutdown:
//!     SIGTERM/SIGINT (signals.rs) → Shutdown coordinator broadcast
//!     → sampler loop exits, server drains connections
//!     → log guard dropped, buffered records flushed
//! ```
//!
//! # Design Decisions
//! - Fail fast at startup: config, sink, and bind errors are fatal
//! - Every long-running task subscribes to one broadcast channel
//! - Sink teardown happens last so shutdown itself is logged

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
