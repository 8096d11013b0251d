//! Storage layer for Priorit.
//!
//! Items live in two places kept in sync by `ItemStore`:
//! - **Record files**: one file per item under the store directory (source of truth)
//! - **ItemIndex**: in-memory ranking of every item (rebuilt from the files on open)
//!
//! # Example
//!
//! ```no_run
//! use priorit::domain::{Item, Priority};
//! use priorit::store::ItemStore;
//!
//! let store = ItemStore::open("/tmp/priorit-items")?;
//! store.add_item(&Item::new().with_title("Pay rent").with_priority(Priority::High), false)?;
//!
//! if let Some(next) = store.next_item()? {
//!     println!("next up: {}", next.title());
//! }
//! # Ok::<(), priorit::PrioritError>(())
//! ```

mod index;
mod item_store;

pub use index::ItemIndex;
pub use item_store::ItemStore;
