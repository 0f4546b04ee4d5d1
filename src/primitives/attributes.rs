//! Named collections of attribute arrays.
//!
//! An [`AttributeSet`] is the boundary with the dataset layer: an ordered
//! list of arrays attached to the points (or cells) of a dataset, looked up by
//! name. The coordinator reads input sets, uses output sets as templates, and
//! hands finished outputs back as a new set.

use crate::primitives::array::AnyArray;

/// Ordered, name-addressable collection of attribute arrays.
#[derive(Debug, Clone, Default)]
pub struct AttributeSet {
    arrays: Vec<AnyArray>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an array, replacing any existing array with the same name.
    /// Returns the array's position.
    pub fn add_array(&mut self, array: impl Into<AnyArray>) -> usize {
        let array = array.into();
        if let Some(pos) = self.position(array.name()) {
            self.arrays[pos] = array;
            pos
        } else {
            self.arrays.push(array);
            self.arrays.len() - 1
        }
    }

    pub fn get(&self, name: &str) -> Option<&AnyArray> {
        self.arrays.iter().find(|a| a.name() == name)
    }

    pub fn get_index(&self, index: usize) -> Option<&AnyArray> {
        self.arrays.get(index)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.arrays.iter().position(|a| a.name() == name)
    }

    pub fn remove(&mut self, name: &str) -> Option<AnyArray> {
        self.position(name).map(|pos| self.arrays.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnyArray> {
        self.arrays.iter()
    }
}

impl FromIterator<AnyArray> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = AnyArray>>(iter: I) -> Self {
        let mut set = AttributeSet::new();
        for array in iter {
            set.add_array(array);
        }
        set
    }
}
