//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handling and background tasks produce:
//!     → tracing events (structured, leveled)
//!
//! Sinks (configured once at startup, logging.rs):
//!     → append-only log file (trace and above, non-blocking writer)
//!     → console/stderr (debug and above)
//!
//! sampler.rs:
//!     periodic CPU/memory/disk snapshots → same sinks
//! ```
//!
//! # Design Decisions
//! - Single write-once sink initialization; failure to open the file sink
//!   aborts startup
//! - File writes go through a background worker so a slow disk only costs
//!   channel-buffering latency on the request path
//! - The sampler shares no state with request handling beyond the sinks

pub mod logging;
pub mod sampler;
