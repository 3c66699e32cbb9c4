use std::collections::BTreeSet;

use crate::models::StudentId;

/// Selected student ids. Membership does not depend on the current view, so a
/// student hidden by a filter stays selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<StudentId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: StudentId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = StudentId> + '_ {
        self.ids.iter().copied()
    }

    /// Returns `true` when `id` is selected afterwards.
    pub fn toggle(&mut self, id: StudentId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn toggled(mut self, id: StudentId) -> Self {
        self.toggle(id);
        self
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn cleared(self) -> Self {
        Self::default()
    }
}

impl FromIterator<StudentId> for Selection {
    fn from_iter<I: IntoIterator<Item = StudentId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
