//! Read-only observable stores published by a form

use crate::{Error, Result};
use std::sync::Arc;
use tokio::sync::watch;

/// A read-only view of a value the form actor publishes
///
/// Cloning a store is cheap; every clone observes the same publications.
#[derive(Debug, Clone)]
pub struct Store<T> {
    form: Arc<str>,
    rx: watch::Receiver<T>,
}

impl<T: Clone> Store<T> {
    pub(crate) fn new(form: Arc<str>, rx: watch::Receiver<T>) -> Self {
        Self { form, rx }
    }

    /// Latest published value
    pub fn get(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Inspect the latest value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.rx.borrow())
    }

    /// True if a value was published since this store last looked
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Treat the latest value as seen
    pub fn mark_seen(&mut self) {
        self.rx.borrow_and_update();
    }

    /// Wait for the next publication and return it
    pub async fn changed(&mut self) -> Result<T> {
        self.rx.changed().await.map_err(|_| self.closed())?;
        Ok(self.rx.borrow_and_update().clone())
    }

    /// Wait until the published value satisfies `pred`
    pub async fn wait_for(&mut self, pred: impl FnMut(&T) -> bool) -> Result<T> {
        match self.rx.wait_for(pred).await {
            Ok(value) => Ok(value.clone()),
            Err(_) => Err(Error::FormClosed(self.form.to_string())),
        }
    }

    fn closed(&self) -> Error {
        Error::FormClosed(self.form.to_string())
    }
}
