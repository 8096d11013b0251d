//! ID generation utilities for Priorit
//!
//! Provides functions for generating item identifiers and validating
//! caller-assigned ones.

use std::sync::atomic::{AtomicI64, Ordering};

use rand::Rng;

use crate::error::{PrioritError, Result};

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Millisecond timestamp that never repeats within this process
fn unique_ms() -> i64 {
    static LAST_MS: AtomicI64 = AtomicI64::new(0);

    let now = now_ms();
    let mut last = LAST_MS.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_MS.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(current) => last = current,
        }
    }
}

/// Generate a unique item ID
///
/// Format: `{timestamp_ms}_{3-digit random}`
/// Example: `1738300800123_417`
pub fn generate_item_id() -> String {
    let timestamp = unique_ms();
    let random: u16 = rand::rng().random_range(100..=998);
    format!("{}_{}", timestamp, random)
}

/// Check that an id can be used as a record file name.
///
/// Rejects empty ids, `.`/`..`, path separators and NUL.
pub fn validate_item_id(id: &str) -> Result<()> {
    let trimmed = id.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return Err(PrioritError::InvalidId(id.to_string()));
    }
    if id.contains(['/', '\\', '\0']) {
        return Err(PrioritError::InvalidId(id.to_string()));
    }
    Ok(())
}

/// Normalized lookup key for an id (ids are case-insensitive)
pub fn id_key(id: &str) -> String {
    id.to_lowercase()
}
