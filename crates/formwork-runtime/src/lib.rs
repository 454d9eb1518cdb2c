//! Formwork Runtime - debounced recomputation for forms
//!
//! This crate runs forms built from `formwork-core` state. Each form is a
//! tokio task that applies change events in order, waits out a debounce
//! window, runs the user's logic against an isolated snapshot and merges
//! the result only if no newer change arrived meanwhile.
//!
//! ## Architecture
//!
//! ```text
//! FieldBinding ──input──► FormHandle ──Change──► FormActor
//!      ▲                                          │  reduce, gen += 1
//!      │                                          │  debounce
//!      │                                          ▼
//!   Store ◄──────── publish ───────────────── logic run (JoinSet)
//!                                              merge if gen unchanged
//! ```
//!
//! ## Key Components
//!
//! - [`Form`] / [`FormBuilder`]: configure and spawn a form
//! - [`FormHandle`]: submit changes, observe [`Store`]s, wait for settling
//! - [`Pipeline`]: debounce/generation state machine driven by the actor
//! - [`FormRegistry`]: name-to-form directory with late attachment
//! - [`FieldBinding`]: what a field component holds
//! - [`FormScope`]: ancestor walk resolving a field's form name

mod config;
mod error;
mod field;
mod form;
mod logic;
pub mod pipeline;
mod registry;
mod scope;
mod store;

pub use config::{FormConfig, DEFAULT_DEBOUNCE_MS};
pub use error::{Error, LogicError, Result};
pub use field::FieldBinding;
pub use form::{Form, FormBuilder, FormHandle};
pub use logic::{Init, InitFuture, Logic, LogicFuture};
pub use pipeline::{FormStatus, Generation, Phase, Pipeline};
pub use registry::FormRegistry;
pub use scope::{resolve_form_name, FormScope};
pub use store::Store;

pub use formwork_core;
