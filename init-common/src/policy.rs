//! The two failure policies every startup step goes through.
//!
//! `must_succeed` turns a failure into a fatal [`InitError`] that ends startup.
//! `try_best_effort` logs a warning and lets startup continue.

use std::fmt;

use tracing::warn;

use crate::error::{InitError, InitResult};

pub fn must_succeed<T, E: fmt::Display>(operation: &str, result: Result<T, E>) -> InitResult<T> {
    result.map_err(|e| InitError::Operation {
        operation: operation.to_string(),
        detail: e.to_string(),
    })
}

pub fn try_best_effort<T, E: fmt::Display>(operation: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(operation, error = %e, "ignoring failure, continuing startup");
            None
        }
    }
}
