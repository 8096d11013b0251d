//! Priorit - a personal priority list
//!
//! Items carry a due date, a priority, free text and categories. They are
//! ranked so that the most urgent open item comes first, and each one is
//! persisted as its own record file.

pub mod codec;
pub mod config;
pub mod domain;
pub mod error;
pub mod id;
pub mod store;

pub use error::{PrioritError, Result};
