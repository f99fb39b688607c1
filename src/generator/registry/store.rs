//! Thread-safe two-index store of live generated orders.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::order_data::{OrderData, OrderDataPatch};

/// Per-instrument registry of live generated resting orders.
///
/// Both the owner id and the order id are primary keys: an insert that
/// would duplicate either is rejected. Mutators serialize on a write lock;
/// readers run concurrently under a shared lock.
///
/// Callbacks passed to [`for_each`](Self::for_each) and
/// [`select_by`](Self::select_by) run under the read guard and must not
/// call back into the same registry, otherwise the lock deadlocks.
#[derive(Debug, Default)]
pub struct OrderRegistry {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<u64, OrderData>,
    by_owner: HashMap<String, u64>,
    by_order_id: HashMap<String, u64>,
    next_slot: u64,
}

impl OrderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the order owned by a counterparty.
    pub fn find_by_owner(&self, owner_id: &str) -> Option<OrderData> {
        let inner = self.read();
        let slot = inner.by_owner.get(owner_id)?;
        inner.entries.get(slot).cloned()
    }

    /// Looks up an order by its current order identifier.
    pub fn find_by_identifier(&self, order_id: &str) -> Option<OrderData> {
        let inner = self.read();
        let slot = inner.by_order_id.get(order_id)?;
        inner.entries.get(slot).cloned()
    }

    /// Stores a new order. Fails (returning `false`) when either key is
    /// already present.
    pub fn add(&self, order: OrderData) -> bool {
        let mut inner = self.write();

        if inner.by_owner.contains_key(order.owner_id())
            || inner.by_order_id.contains_key(order.order_id())
        {
            return false;
        }

        let slot = inner.next_slot;
        inner.next_slot += 1;
        inner.by_owner.insert(order.owner_id().to_owned(), slot);
        inner.by_order_id.insert(order.order_id().to_owned(), slot);
        inner.entries.insert(slot, order);
        true
    }

    /// Patches the order owned by a counterparty; re-indexes when the
    /// patch renames the order. Returns `false` for an unknown owner and
    /// for a rename that would collide with another stored order id.
    pub fn update_by_owner(&self, owner_id: &str, patch: OrderDataPatch) -> bool {
        let mut inner = self.write();
        let Some(slot) = inner.by_owner.get(owner_id).copied() else {
            return false;
        };
        inner.update_slot(slot, patch)
    }

    /// Patches the order with the given current identifier; re-indexes
    /// when the patch renames the order. Returns `false` for an unknown
    /// identifier and for a rename that would collide with another
    /// stored order id.
    pub fn update_by_identifier(&self, order_id: &str, patch: OrderDataPatch) -> bool {
        let mut inner = self.write();
        let Some(slot) = inner.by_order_id.get(order_id).copied() else {
            return false;
        };
        inner.update_slot(slot, patch)
    }

    /// Removes the order owned by a counterparty. Returns `false` for an
    /// unknown owner.
    pub fn remove_by_owner(&self, owner_id: &str) -> bool {
        let mut inner = self.write();
        let Some(slot) = inner.by_owner.get(owner_id).copied() else {
            return false;
        };
        inner.remove_slot(slot);
        true
    }

    /// Removes the order with the given current identifier. Returns
    /// `false` for an unknown identifier.
    pub fn remove_by_identifier(&self, order_id: &str) -> bool {
        let mut inner = self.write();
        let Some(slot) = inner.by_order_id.get(order_id).copied() else {
            return false;
        };
        inner.remove_slot(slot);
        true
    }

    /// Applies a visitor to every stored order under the read guard.
    ///
    /// The visitor must not re-enter the registry.
    pub fn for_each(&self, mut visitor: impl FnMut(&OrderData)) {
        let inner = self.read();
        for order in inner.entries.values() {
            visitor(order);
        }
    }

    /// Copies out every stored order matching a predicate.
    ///
    /// The predicate must not re-enter the registry.
    pub fn select_by(&self, predicate: impl Fn(&OrderData) -> bool) -> Vec<OrderData> {
        let inner = self.read();
        inner
            .entries
            .values()
            .filter(|order| predicate(order))
            .cloned()
            .collect()
    }

    /// Number of live orders.
    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    /// Whether the registry holds no orders.
    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Inner {
    /// Both index entries are dropped before the patch mutates the stored
    /// element, then re-created from the element's current keys. A rename
    /// onto an identifier owned by a different entry is refused whole.
    fn update_slot(&mut self, slot: u64, patch: OrderDataPatch) -> bool {
        if let Some(new_id) = patch.new_order_id() {
            if let Some(existing_slot) = self.by_order_id.get(new_id) {
                if *existing_slot != slot {
                    return false;
                }
            }
        }

        let Some(order) = self.entries.get_mut(&slot) else {
            return false;
        };

        self.by_owner.remove(order.owner_id());
        self.by_order_id.remove(order.order_id());

        order.apply(patch);

        self.by_owner.insert(order.owner_id().to_owned(), slot);
        self.by_order_id.insert(order.order_id().to_owned(), slot);
        true
    }

    fn remove_slot(&mut self, slot: u64) {
        if let Some(order) = self.entries.remove(&slot) {
            self.by_order_id.remove(order.order_id());
            self.by_owner.remove(order.owner_id());
        }
    }
}
