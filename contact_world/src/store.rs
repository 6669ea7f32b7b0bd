// Copyright 2025 the Contact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collider slots with free-list reuse.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::types::{Collider, ColliderId};

pub(crate) struct Slot<O: ?Sized> {
    pub(crate) collider: Collider,
    pub(crate) owner: Rc<RefCell<O>>,
}

/// Slot array indexed by [`ColliderId`].
///
/// Freed slots are pushed on `free_list` and handed out again last-in,
/// first-out. A slot is live iff it holds `Some`.
pub(crate) struct ColliderStore<O: ?Sized> {
    slots: Vec<Option<Slot<O>>>,
    free_list: Vec<usize>,
    /// Logical capacity; doubles when every slot is in use.
    capacity: usize,
}

impl<O: ?Sized> core::fmt::Debug for ColliderStore<O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ColliderStore")
            .field("slots_total", &self.slots.len())
            .field("slots_alive", &self.len())
            .field("free_list", &self.free_list.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<O: ?Sized> ColliderStore<O> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self { slots: Vec::with_capacity(capacity), free_list: Vec::new(), capacity }
    }

    /// Store a collider and return its handle.
    ///
    /// The collider's `id` field is overwritten with the assigned handle.
    pub(crate) fn insert(&mut self, mut collider: Collider, owner: Rc<RefCell<O>>) -> ColliderId {
        let idx = if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            if self.slots.len() == self.capacity {
                let grown = (self.capacity * 2).max(1);
                self.slots.reserve_exact(grown - self.slots.len());
                log::debug!("collider store grew from {} to {grown} slots", self.capacity);
                self.capacity = grown;
            }
            self.slots.push(None);
            self.slots.len() - 1
        };
        let id = ColliderId::from_idx(idx);
        collider.id = id;
        self.slots[idx] = Some(Slot { collider, owner });
        id
    }

    /// Free a slot, returning its contents. Stale handles return `None`.
    pub(crate) fn remove(&mut self, id: ColliderId) -> Option<Slot<O>> {
        let slot = self.slots.get_mut(id.idx())?.take()?;
        self.free_list.push(id.idx());
        Some(slot)
    }

    /// Free every slot. Handles issued so far all become stale.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
    }

    #[inline]
    pub(crate) fn is_valid(&self, id: ColliderId) -> bool {
        matches!(self.slots.get(id.idx()), Some(Some(_)))
    }

    #[inline]
    pub(crate) fn get(&self, id: ColliderId) -> Option<&Collider> {
        self.at(id.idx())
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: ColliderId) -> Option<&mut Collider> {
        self.slots.get_mut(id.idx())?.as_mut().map(|slot| &mut slot.collider)
    }

    #[inline]
    pub(crate) fn owner(&self, id: ColliderId) -> Option<&Rc<RefCell<O>>> {
        self.slots.get(id.idx())?.as_ref().map(|slot| &slot.owner)
    }

    /// Collider in slot `idx`, if that slot is live.
    #[inline]
    pub(crate) fn at(&self, idx: usize) -> Option<&Collider> {
        self.slots.get(idx)?.as_ref().map(|slot| &slot.collider)
    }

    /// One past the highest slot index ever issued since the last clear.
    #[inline]
    pub(crate) fn extent(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    pub(crate) fn free_count(&self) -> usize {
        self.free_list.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Collider> + '_ {
        self.slots.iter().filter_map(|slot| slot.as_ref().map(|slot| &slot.collider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contact_shapes::Shape;
    use kurbo::Point;

    use crate::types::Color;

    fn collider() -> Collider {
        Collider {
            id: ColliderId::from_raw(u32::MAX),
            layer: 0,
            center: Point::ORIGIN,
            shape: Shape::circle(1.0),
            active: true,
            color: Color::WHITE,
        }
    }

    fn owner() -> Rc<RefCell<()>> {
        Rc::new(RefCell::new(()))
    }

    #[test]
    fn insert_assigns_sequential_ids() {
        let mut store = ColliderStore::with_capacity(4);
        let a = store.insert(collider(), owner());
        let b = store.insert(collider(), owner());
        assert_eq!((a.raw(), b.raw()), (0, 1));
        assert_eq!(store.get(b).map(|c| c.id), Some(b), "id field is stamped");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn removed_slot_is_reused_lifo() {
        let mut store = ColliderStore::with_capacity(4);
        let a = store.insert(collider(), owner());
        let b = store.insert(collider(), owner());
        let _c = store.insert(collider(), owner());
        assert!(store.remove(a).is_some());
        assert!(store.remove(b).is_some());
        assert!(!store.is_valid(a) && !store.is_valid(b));
        assert_eq!(store.free_count(), 2);
        assert_eq!(store.insert(collider(), owner()), b, "last freed first");
        assert_eq!(store.insert(collider(), owner()), a);
        assert_eq!(store.free_count(), 0);
    }

    #[test]
    fn double_remove_is_ignored() {
        let mut store = ColliderStore::with_capacity(2);
        let a = store.insert(collider(), owner());
        assert!(store.remove(a).is_some());
        assert!(store.remove(a).is_none());
        assert_eq!(store.free_count(), 1, "slot freed only once");
        assert!(store.remove(ColliderId::from_raw(99)).is_none());
    }

    #[test]
    fn growth_doubles_and_keeps_ids() {
        let mut store = ColliderStore::with_capacity(2);
        let ids: Vec<_> = (0..5).map(|_| store.insert(collider(), owner())).collect();
        assert_eq!(store.capacity(), 8);
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(id.raw() as usize, i);
            assert!(store.is_valid(*id));
        }
    }

    #[test]
    fn clear_invalidates_everything() {
        let mut store = ColliderStore::with_capacity(2);
        let a = store.insert(collider(), owner());
        store.clear();
        assert!(!store.is_valid(a));
        assert_eq!(store.len(), 0);
        assert_eq!(store.insert(collider(), owner()), a, "numbering restarts");
    }
}
