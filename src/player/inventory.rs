//! Item stock shared between threads.
//!
//! Quantities live in one atomic counter per item kind, so independent
//! kinds can be changed from several threads without a lock. Each update
//! is a single compare-and-swap merge on its own counter; there is no
//! ordering across kinds and no multi-item transaction. A count of zero
//! means the item is absent.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::RwLock;

use super::item::{Item, ItemName};

#[derive(Debug)]
pub struct Inventory {
    counts: [AtomicU32; ItemName::COUNT],
    /// First template seen per kind; never replaced afterwards.
    templates: RwLock<HashMap<ItemName, Item>>,
}

impl Inventory {
    pub fn new() -> Self {
        Self {
            counts: std::array::from_fn(|_| AtomicU32::new(0)),
            templates: RwLock::new(HashMap::new()),
        }
    }

    fn counter(&self, name: ItemName) -> &AtomicU32 {
        &self.counts[name.index()]
    }

    /// Add units of an item. The template is kept only if none is known yet.
    pub fn add(&self, item: Item, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let name = item.name;
        self.templates.write().entry(name).or_insert(item);
        // fetch_update only fails when the closure returns None.
        let _ = self
            .counter(name)
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some(current.saturating_add(quantity))
            });
    }

    /// Add units using the built-in template for `name`.
    pub fn add_named(&self, name: ItemName, quantity: u32) {
        self.add(Item::default_for(name), quantity);
    }

    /// Remove up to `quantity` units; returns how many were actually taken.
    pub fn remove(&self, name: ItemName, quantity: u32) -> u32 {
        let previous = self
            .counter(name)
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some(current - current.min(quantity))
            })
            .unwrap_or(0);
        previous.min(quantity)
    }

    /// Use one unit. Returns the item's use text, or `None` when the item is
    /// missing or cannot be used. Consumable items lose a unit.
    pub fn use_item(&self, name: ItemName) -> Option<String> {
        if !self.has(name) {
            return None;
        }
        let template = self.template(name)?;
        if !template.usable {
            return None;
        }
        if template.consumable && self.remove(name, 1) == 0 {
            return None;
        }
        Some(template.use_text)
    }

    pub fn quantity(&self, name: ItemName) -> u32 {
        self.counter(name).load(Ordering::Acquire)
    }

    pub fn has(&self, name: ItemName) -> bool {
        self.quantity(name) > 0
    }

    pub fn template(&self, name: ItemName) -> Option<Item> {
        self.templates.read().get(&name).cloned()
    }

    /// Items currently held, in declaration order.
    pub fn snapshot(&self) -> Vec<(ItemName, u32)> {
        ItemName::ALL
            .into_iter()
            .map(|name| (name, self.quantity(name)))
            .filter(|(_, qty)| *qty > 0)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        ItemName::ALL.into_iter().all(|name| !self.has(name))
    }

    pub fn total_units(&self) -> u64 {
        ItemName::ALL
            .into_iter()
            .map(|name| self.quantity(name) as u64)
            .sum()
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Inventory {
    fn clone(&self) -> Self {
        let copy = Inventory::new();
        for name in ItemName::ALL {
            copy.counter(name).store(self.quantity(name), Ordering::Release);
        }
        *copy.templates.write() = self.templates.read().clone();
        copy
    }
}
