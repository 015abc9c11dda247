//! Middleware stages wrapping route handlers.

pub mod interceptor;
pub mod rate_limit;
