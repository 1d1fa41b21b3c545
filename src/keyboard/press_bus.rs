//! One shared key listener fanning presses out to per-key subscribers.
//!
//! The main loop owns the only connection to the terminal event stream and
//! calls [`KeyPressBus::dispatch`] once per press. Tiles subscribe by key name
//! and hold a [`Subscription`] guard; dropping the guard unregisters them.
//! Callbacks may subscribe or drop subscriptions while a press is delivered.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Instant;

type Callback = Rc<RefCell<dyn FnMut(Instant)>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    by_key: HashMap<String, Vec<(u64, Callback)>>,
}

impl Registry {
    fn is_registered(&self, key: &str, id: u64) -> bool {
        self.by_key
            .get(key)
            .is_some_and(|entries| entries.iter().any(|(entry_id, _)| *entry_id == id))
    }

    fn remove(&mut self, key: &str, id: u64) {
        if let Some(entries) = self.by_key.get_mut(key) {
            entries.retain(|(entry_id, _)| *entry_id != id);
            if entries.is_empty() {
                self.by_key.remove(key);
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct KeyPressBus {
    inner: Rc<RefCell<Registry>>,
}

impl KeyPressBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for presses of exactly `key_name`.
    #[must_use = "dropping the subscription unregisters the callback"]
    pub fn subscribe(
        &self,
        key_name: &str,
        callback: impl FnMut(Instant) + 'static,
    ) -> Subscription {
        let callback: Callback = Rc::new(RefCell::new(callback));
        let mut registry = self.inner.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry
            .by_key
            .entry(key_name.to_string())
            .or_default()
            .push((id, callback));

        Subscription {
            registry: Rc::downgrade(&self.inner),
            key_name: key_name.to_string(),
            id,
        }
    }

    /// Deliver a press to every subscriber of `key_name`. Returns how many
    /// callbacks ran.
    ///
    /// The registry is not borrowed while callbacks run. Subscribers added
    /// during delivery wait for the next press; subscribers dropped during
    /// delivery are skipped. A callback that dispatches the same press again
    /// is not re-entered.
    pub fn dispatch(&self, key_name: &str, now: Instant) -> usize {
        let pending: Vec<(u64, Callback)> = match self.inner.borrow().by_key.get(key_name) {
            Some(entries) => entries
                .iter()
                .map(|(id, callback)| (*id, Rc::clone(callback)))
                .collect(),
            None => return 0,
        };

        let mut delivered = 0;
        for (id, callback) in pending {
            if !self.inner.borrow().is_registered(key_name, id) {
                continue;
            }
            if let Ok(mut callback) = callback.try_borrow_mut() {
                (&mut *callback)(now);
                delivered += 1;
            }
        }
        delivered
    }

    pub fn subscriber_count(&self, key_name: &str) -> usize {
        self.inner
            .borrow()
            .by_key
            .get(key_name)
            .map_or(0, Vec::len)
    }

    /// Total live subscriptions across all keys.
    pub fn len(&self) -> usize {
        self.inner.borrow().by_key.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps a callback registered for as long as it lives.
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    key_name: String,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove(&self.key_name, self.id);
        }
    }
}
