//! Bounded working list of DIMM references.

use crate::error::{InterleaveError, Result};

/// Largest DIMM population a single grouping request accepts by default.
pub const MAX_DIMMS: usize = 24;

/// Working copy of a DIMM list that shrinks as interleave sets are carved out.
///
/// Entries are references; membership is decided by identity, not by value,
/// so two equal DIMM records at different addresses are distinct entries.
/// The list never grows past its capacity.
#[derive(Debug, Clone)]
pub struct DimmList<'a, D: ?Sized> {
    dimms: Vec<&'a D>,
    capacity: usize,
}

impl<'a, D: ?Sized> DimmList<'a, D> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            dimms: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Copies `dimms` into a new list bounded by `capacity`.
    ///
    /// # Errors
    ///
    /// [`InterleaveError::InvalidParameter`] if there are more DIMMs than
    /// `capacity`. Nothing is kept in that case.
    pub fn from_dimms<I>(dimms: I, capacity: usize) -> Result<Self>
    where
        I: IntoIterator<Item = &'a D>,
    {
        let mut list = Self::with_capacity(capacity);
        for dimm in dimms {
            list.push(dimm)?;
        }
        Ok(list)
    }

    pub fn push(&mut self, dimm: &'a D) -> Result<()> {
        if self.dimms.len() >= self.capacity {
            return Err(InterleaveError::InvalidParameter(format!(
                "DIMM list is limited to {} entries",
                self.capacity
            )));
        }
        self.dimms.push(dimm);
        Ok(())
    }

    /// Removes the first entry that is `dimm` itself, shifting later entries
    /// left. Returns false, leaving the list untouched, if it is absent.
    pub fn remove(&mut self, dimm: &D) -> bool {
        match self.dimms.iter().position(|&entry| std::ptr::eq(entry, dimm)) {
            Some(index) => {
                self.dimms.remove(index);
                true
            }
            None => false,
        }
    }

    /// Removes each of `dimms` in order; returns how many were found.
    pub fn remove_all(&mut self, dimms: &[&D]) -> usize {
        dimms.iter().filter(|&&dimm| self.remove(dimm)).count()
    }

    pub fn contains(&self, dimm: &D) -> bool {
        self.dimms.iter().any(|&entry| std::ptr::eq(entry, dimm))
    }

    pub fn as_slice(&self) -> &[&'a D] {
        &self.dimms
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a D> + '_ {
        self.dimms.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.dimms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimms.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
