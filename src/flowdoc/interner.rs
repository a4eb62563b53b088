//! Structural de-duplication of trailer values.

use std::collections::HashMap;
use std::hash::Hash;

/// Assigns `prefix-N` ids to structurally distinct values.
///
/// Ids are allocated in first-seen order, so equal input always produces
/// equal ids.
#[derive(Debug)]
pub(crate) struct Interner<T> {
    prefix: &'static str,
    ids: HashMap<T, usize>,
    values: Vec<T>,
}

impl<T: Clone + Eq + Hash> Interner<T> {
    pub(crate) fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            ids: HashMap::new(),
            values: Vec::new(),
        }
    }

    /// Id of `value`, allocating one when the value is new.
    pub(crate) fn intern(&mut self, value: &T) -> String {
        if let Some(&index) = self.ids.get(value) {
            return self.id(index);
        }
        let index = self.values.len();
        self.values.push(value.clone());
        self.ids.insert(value.clone(), index);
        let id = self.id(index);
        tracing::debug!(id = %id, "Allocated trailer id");
        id
    }

    fn id(&self, index: usize) -> String {
        format!("{}-{}", self.prefix, index + 1)
    }

    /// Take the interned values in allocation order, leaving the interner empty.
    pub(crate) fn drain(&mut self) -> Vec<(String, T)> {
        self.ids.clear();
        let values = std::mem::take(&mut self.values);
        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| (self.id(index), value))
            .collect()
    }
}
