//! HTTP middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. `Cache-Control: no-store` on every response
//! 2. Access logger

pub mod audit;
