//! Common utilities and helpers

pub mod rename;

pub use rename::{rename_with_retry, RetryPolicy};
