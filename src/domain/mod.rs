//! Domain types for Priorit
//!
//! - Item: one entry on the priority list, with its ranking order
//! - Priority: five fixed severity levels
//! - Category: case-insensitive tag names

pub mod category;
pub mod item;
pub mod priority;

pub use category::{Category, DEFAULT_CATEGORY};
pub use item::{DEFAULT_DUE_DAYS, Item, today};
pub use priority::Priority;
