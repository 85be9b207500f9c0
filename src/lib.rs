//! # slotfile
//!
//! A simulated sequential-file record store with:
//! - Variable-length records sized in UTF-8 bytes
//! - Logical deletion through a tombstone flag
//! - Best-fit reuse of tombstoned slots
//! - Monotonic identifiers that survive slot relocation
//! - A byte layout projection for hex visualizers
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Caller (CLI / UI) + Validation                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Record Store                              │
//! │                  (Single Writer)                             │
//! └──────┬──────────────┬─────────────────────┬─────────────────┘
//!        │              │                     │
//!        ▼              ▼                     ▼
//!  ┌───────────┐  ┌────────────┐      ┌──────────────┐
//!  │  Header   │  │  Allocator │      │ Layout       │
//!  │ (lastId)  │  │ (best fit) │      │ (read-only)  │
//!  └─────┬─────┘  └────────────┘      └──────────────┘
//!        │
//!        ▼
//!  ┌─────────────────────────────┐
//!  │ Medium (memory / file)      │
//!  │ records │ header │ gtin idx │
//!  └─────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod medium;
pub mod record;
pub mod header;
pub mod allocator;
pub mod store;
pub mod layout;
pub mod validation;
pub mod gtin_index;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, SlotError, ValidationError};
pub use config::Config;
pub use record::{compute_size, Record};
pub use header::Header;
pub use allocator::find_best_free_slot;
pub use store::RecordStore;
pub use layout::{layout, Layout};
pub use validation::ProductInput;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of slotfile
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
