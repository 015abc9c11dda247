//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layering)
//!     → middleware/interceptor.rs (entry log, body capture, timing)
//!     → middleware/rate_limit.rs (cart route only)
//!     → handlers.rs (catalog routes, JSON responses)
//!     → middleware/interceptor.rs (exit log, panic capture)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod server;

pub use server::HttpServer;
