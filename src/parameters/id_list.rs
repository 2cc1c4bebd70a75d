//! Ordered identifier collection
//!
//! [`IdList`] keeps entities of one kind sorted by ascending id so that lookups
//! are a binary search. It is used for both the parameter and the equation sets
//! of a solve. Sets are small (tens to a few hundred entries per sketch), so an
//! insert is a plain `Vec::insert`.

use crate::error::{Result, SolverError};
use crate::parameters::parameter::{ParamRef, UNASSIGNED_ID};

/// An entity that can be stored in an [`IdList`]
pub trait IdEntity {
    /// Current id of the entity
    fn id(&self) -> i64;

    /// Overwrite the id of the entity
    fn set_id(&mut self, id: i64);

    /// Reset the solver tag to 0
    fn clear_tag(&mut self);
}

impl IdEntity for ParamRef {
    fn id(&self) -> i64 {
        self.as_ref().id()
    }

    fn set_id(&mut self, id: i64) {
        self.as_ref().assign_id(id);
    }

    fn clear_tag(&mut self) {
        self.set_tag(0);
    }
}

/// A collection sorted by id
#[derive(Debug, Clone)]
pub struct IdList<T> {
    elem: Vec<T>,
}

impl<T> Default for IdList<T> {
    fn default() -> Self {
        Self { elem: Vec::new() }
    }
}

impl<T: IdEntity> IdList<T> {
    /// Create a new empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `max existing id + 1` to the item and insert it
    ///
    /// # Returns
    ///
    /// The id assigned to the item.
    ///
    /// # Examples
    ///
    /// ```
    /// use geosolve_rs::parameters::{IdList, Param};
    ///
    /// let mut params = IdList::new();
    /// let a = params.add_and_assign_id(Param::shared(1.0, "a")).unwrap();
    /// let b = params.add_and_assign_id(Param::shared(2.0, "b")).unwrap();
    /// assert_eq!((a, b), (1, 2));
    /// assert_eq!(params.find_by_id(2).unwrap().value(), 2.0);
    /// ```
    pub fn add_and_assign_id(&mut self, mut item: T) -> Result<i64> {
        let id = self.max_id() + 1;
        item.set_id(id);
        self.add(item)?;
        Ok(id)
    }

    /// Insert an item that already carries an id, keeping the list sorted
    ///
    /// # Errors
    ///
    /// `SolverError::DuplicateId` if an item with the same id is present.
    pub fn add(&mut self, item: T) -> Result<()> {
        match self.position(item.id()) {
            Ok(_) => Err(SolverError::DuplicateId(item.id())),
            Err(index) => {
                self.elem.insert(index, item);
                Ok(())
            }
        }
    }

    /// Look up the stored item carrying the same id as `item`
    pub fn find(&self, item: &T) -> Option<&T> {
        self.find_by_id(item.id())
    }

    /// Binary search by id
    pub fn find_by_id(&self, id: i64) -> Option<&T> {
        self.position(id).ok().map(|index| &self.elem[index])
    }

    /// Binary search by id, mutable
    pub fn find_by_id_mut(&mut self, id: i64) -> Option<&mut T> {
        match self.position(id) {
            Ok(index) => Some(&mut self.elem[index]),
            Err(_) => None,
        }
    }

    /// Whether an item with the id of `item` is present
    ///
    /// Items that were never assigned an id are never present.
    pub fn has(&self, item: &T) -> bool {
        item.id() != UNASSIGNED_ID && self.find(item).is_some()
    }

    /// Remove and return the item with the given id
    pub fn remove_by_id(&mut self, id: i64) -> Option<T> {
        match self.position(id) {
            Ok(index) => Some(self.elem.remove(index)),
            Err(_) => None,
        }
    }

    /// Largest id in the list, or 0 when empty
    pub fn max_id(&self) -> i64 {
        // sorted, so the last element carries the largest id
        self.elem.last().map_or(0, |item| item.id().max(0))
    }

    /// Reset the solver tag of every item
    pub fn clear_tags(&mut self) {
        for item in &mut self.elem {
            item.clear_tag();
        }
    }

    fn position(&self, id: i64) -> std::result::Result<usize, usize> {
        self.elem.binary_search_by_key(&id, |item| item.id())
    }
}

impl<T> IdList<T> {
    /// Remove every item
    pub fn clear(&mut self) {
        self.elem.clear();
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.elem.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.elem.is_empty()
    }

    /// Iterate in ascending id order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elem.iter()
    }

    /// Iterate mutably in ascending id order
    ///
    /// Changing an id through this iterator breaks the sort order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.elem.iter_mut()
    }
}

impl<'a, T> IntoIterator for &'a IdList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elem.iter()
    }
}
