//! User routines plugged into a form

use crate::{FormHandle, LogicError};
use formwork_core::Helpers;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future returned by a logic routine
pub type LogicFuture = Pin<Box<dyn Future<Output = Result<Helpers, LogicError>> + Send>>;

/// Future returned by an init routine
pub type InitFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// The form's logic routine
///
/// Receives the helper set owning the working snapshot, may await freely,
/// and hands the helpers back when done. Returning an error discards the
/// run.
#[derive(Clone)]
pub struct Logic(Arc<dyn Fn(Helpers) -> LogicFuture + Send + Sync>);

impl Logic {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Helpers) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Helpers, LogicError>> + Send + 'static,
    {
        Self(Arc::new(move |helpers| Box::pin(f(helpers))))
    }

    /// Logic that changes nothing
    pub fn identity() -> Self {
        Self::new(|helpers| async move { Ok(helpers) })
    }

    pub(crate) fn run(&self, helpers: Helpers) -> LogicFuture {
        (self.0)(helpers)
    }
}

impl Default for Logic {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Logic(..)")
    }
}

/// One-shot routine seeding a form's first values and metadata
pub struct Init(Box<dyn FnOnce(FormHandle) -> InitFuture + Send>);

impl Init {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: FnOnce(FormHandle) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self(Box::new(move |handle| Box::pin(f(handle))))
    }

    pub(crate) fn run(self, handle: FormHandle) -> InitFuture {
        (self.0)(handle)
    }
}

impl fmt::Debug for Init {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Init(..)")
    }
}
