use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::core::{BodyHandle, GeomHandle};
use crate::error::PhysicsError;
use crate::Result;

/// A generation-tagged index into an [`Arena`]
pub trait Handle: Copy + Eq + Hash + Ord + Debug {
    /// Builds a handle from its raw parts
    fn from_raw_parts(index: u32, generation: u32) -> Self;

    /// Slot index
    fn index(&self) -> u32;

    /// Generation of the slot when the handle was issued
    fn generation(&self) -> u32;
}

/// Generic storage trait for physics objects
pub trait Storage<T, H> {
    /// Adds an item to the storage and returns its handle
    fn add(&mut self, item: T) -> H;

    /// Gets a reference to an item by its handle
    fn get(&self, handle: H) -> Option<&T>;

    /// Gets a mutable reference to an item by its handle
    fn get_mut(&mut self, handle: H) -> Option<&mut T>;

    /// Removes an item from the storage
    fn remove(&mut self, handle: H) -> Option<T>;

    /// Returns the number of items in the storage
    fn len(&self) -> usize;

    /// Returns whether the storage is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all items from the storage
    fn clear(&mut self);

    /// Returns all live handles in slot order
    fn handles(&self) -> Vec<H>;
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    item: Option<T>,
}

/// Dense slot storage with generation-tagged handles.
///
/// Freed slots are reused by later insertions with a bumped generation, so a
/// handle to a removed item never resolves to its successor.
#[derive(Debug, Clone)]
pub struct Arena<T, H> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
    _handle: PhantomData<H>,
}

impl<T, H: Handle> Default for Arena<T, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, H: Handle> Arena<T, H> {
    /// Creates an empty arena
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
            _handle: PhantomData,
        }
    }

    /// Number of slots ever allocated, live or free
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// True if the handle still refers to a live item
    pub fn contains(&self, handle: H) -> bool {
        self.get(handle).is_some()
    }

    /// Iterates live items in slot order
    pub fn iter(&self) -> impl Iterator<Item = (H, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.item
                .as_ref()
                .map(|item| (H::from_raw_parts(index as u32, slot.generation), item))
        })
    }

    /// Iterates live items mutably in slot order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (H, &mut T)> + '_ {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.item
                .as_mut()
                .map(|item| (H::from_raw_parts(index as u32, generation), item))
        })
    }

    /// Borrows two distinct items mutably at once
    pub fn get2_mut(&mut self, a: H, b: H) -> Option<(&mut T, &mut T)> {
        if a.index() == b.index() || !self.contains(a) || !self.contains(b) {
            return None;
        }

        let (ia, ib) = (a.index() as usize, b.index() as usize);
        let (low, high) = if ia < ib { (ia, ib) } else { (ib, ia) };
        let (left, right) = self.slots.split_at_mut(high);
        let low_item = left[low].item.as_mut()?;
        let high_item = right[0].item.as_mut()?;

        if ia < ib {
            Some((low_item, high_item))
        } else {
            Some((high_item, low_item))
        }
    }
}

impl<T, H: Handle> Storage<T, H> for Arena<T, H> {
    fn add(&mut self, item: T) -> H {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.item = Some(item);
            return H::from_raw_parts(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot { generation: 0, item: Some(item) });
        H::from_raw_parts(index, 0)
    }

    fn get(&self, handle: H) -> Option<&T> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.item.as_ref())
    }

    fn get_mut(&mut self, handle: H) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.item.as_mut())
    }

    fn remove(&mut self, handle: H) -> Option<T> {
        let slot = self.slots.get_mut(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }

        let item = slot.item.take()?;
        self.free.push(handle.index());
        self.len -= 1;
        Some(item)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.item.take().is_some() {
                self.free.push(index as u32);
            }
        }
        self.len = 0;
    }

    fn handles(&self) -> Vec<H> {
        self.iter().map(|(handle, _)| handle).collect()
    }
}

/// Storage for bodies
pub type BodyStorage<T> = Arena<T, BodyHandle>;

/// Storage for geometry
pub type GeomStorage<T> = Arena<T, GeomHandle>;

impl<T> BodyStorage<T> {
    /// Gets a body by its handle, returning an error if not found
    pub fn get_body(&self, handle: BodyHandle) -> Result<&T> {
        self.get(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("Body with handle {:?} not found", handle)))
    }

    /// Gets a mutable reference to a body by its handle, returning an error if not found
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut T> {
        self.get_mut(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("Body with handle {:?} not found", handle)))
    }
}

impl<T> GeomStorage<T> {
    /// Gets a geometry by its handle, returning an error if not found
    pub fn get_geom(&self, handle: GeomHandle) -> Result<&T> {
        self.get(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("Geom with handle {:?} not found", handle)))
    }

    /// Gets a mutable reference to a geometry by its handle, returning an error if not found
    pub fn get_geom_mut(&mut self, handle: GeomHandle) -> Result<&mut T> {
        self.get_mut(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("Geom with handle {:?} not found", handle)))
    }
}
