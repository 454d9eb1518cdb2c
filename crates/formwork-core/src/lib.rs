//! Formwork Core - form state model
//!
//! This crate provides the synchronous building blocks of a form engine:
//! - Dynamic field values (`Value`, `ValueMap`)
//! - Typed dot-delimited paths (`FieldPath`)
//! - Persistent path-addressed trees with structural sharing (`Tree`)
//! - Per-field metadata (`Meta`, `MetaPatch`) and current/previous pairs
//! - Change events and the pure reducer that applies them
//! - The helper set handed to form logic (`check`, `modify`, `has_errors`)
//!
//! ## Data flow
//!
//! ```text
//! Change ──► reduce ──► FormState { values, metas }
//!                            │ snapshot
//!                            ▼
//!                         Helpers ──► logic ──► FormState::merge
//! ```
//!
//! Scheduling, debouncing and staleness checks live in `formwork-runtime`.

mod change;
mod error;
mod helpers;
mod meta;
mod path;
pub mod reducer;
mod state;
mod tree;
pub mod validators;
mod value;

pub use change::Change;
pub use error::{Error, Result};
pub use helpers::{Helpers, Modify, Validation, Validator};
pub use meta::{ClickHandler, Meta, MetaPatch, Parser};
pub use path::FieldPath;
pub use reducer::{MetasSlice, Slice, Touched, ValuesSlice};
pub use state::{CurPrev, FormState, Metas, Values};
pub use tree::{Branch, Tree};
pub use validators::{min_length, required, MinLength, Required};
pub use value::{Value, ValueMap};
