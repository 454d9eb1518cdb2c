//! Name-to-form registry
//!
//! Fields may look a form up before it is registered. Each name owns a
//! slot whose watch channel starts empty and is filled (or overwritten) by
//! [`FormRegistry::register`]; attached fields follow the slot.

use crate::FormHandle;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Shared registry of live forms, keyed by name
#[derive(Debug, Default)]
pub struct FormRegistry {
    slots: Mutex<HashMap<String, watch::Sender<Option<FormHandle>>>>,
}

impl FormRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle` under `name`
    ///
    /// A later registration with the same name replaces the earlier one;
    /// attached fields switch to the new form.
    pub fn register(&self, name: &str, handle: FormHandle) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        match slots.get(name) {
            Some(slot) => {
                if slot.send_replace(Some(handle)).is_some() {
                    warn!(form = name, "form name registered twice, replacing");
                } else {
                    debug!(form = name, "form registered into waiting slot");
                }
            }
            None => {
                let (slot, _) = watch::channel(Some(handle));
                slots.insert(name.to_string(), slot);
                debug!(form = name, "form registered");
            }
        }
    }

    /// Form currently registered under `name`
    pub fn lookup(&self, name: &str) -> Option<FormHandle> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(name).and_then(|slot| slot.borrow().clone())
    }

    /// Follow the slot for `name`, creating it empty if needed
    pub fn attach(&self, name: &str) -> watch::Receiver<Option<FormHandle>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots
            .entry(name.to_string())
            .or_insert_with(|| watch::channel(None).0)
            .subscribe()
    }

    /// Names with a registered form
    pub fn names(&self) -> Vec<String> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = slots
            .iter()
            .filter(|(_, slot)| slot.borrow().is_some())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Form;

    #[tokio::test]
    async fn test_register_and_lookup() {
        let registry = FormRegistry::new();
        assert!(registry.lookup("login").is_none());

        Form::builder("login").spawn_in(&registry);
        let found = registry.lookup("login").unwrap();
        assert_eq!(found.name(), "login");
        assert_eq!(registry.names(), vec!["login".to_string()]);
    }

    #[tokio::test]
    async fn test_attach_before_register() {
        let registry = FormRegistry::new();
        let mut slot = registry.attach("late");
        assert!(slot.borrow().is_none());
        assert!(registry.names().is_empty());

        Form::builder("late").spawn_in(&registry);
        slot.changed().await.unwrap();
        let name = slot.borrow_and_update().as_ref().map(|h| h.name().to_string());
        assert_eq!(name.as_deref(), Some("late"));
    }

    #[tokio::test]
    async fn test_reregister_overwrites() {
        let registry = FormRegistry::new();
        let first = Form::builder("dup").spawn_in(&registry);
        let mut slot = registry.attach("dup");
        slot.borrow_and_update();

        let second = Form::builder("dup").spawn();
        second.set_value("marker", true).unwrap();
        registry.register("dup", second.clone());

        assert!(slot.has_changed().unwrap());
        second.status().wait_for(|s| s.generation.get() == 1).await.unwrap();
        let current = registry.lookup("dup").unwrap();
        assert_eq!(current.status().get().generation.get(), 1);
        assert_eq!(first.status().get().generation.get(), 0);
    }
}
