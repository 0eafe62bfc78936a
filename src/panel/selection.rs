use std::collections::BTreeSet;

/// Which actions the current selection allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionAffordances {
    pub all_checked: bool,
    pub edit_enabled: bool,
    pub delete_enabled: bool,
}

/// A set of selected item keys. The owner is responsible for clearing it on
/// every reload so that it never outlives the collection it was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<K: Ord> {
    keys: BTreeSet<K>,
}

impl<K: Ord> Default for Selection<K> {
    fn default() -> Self {
        Self {
            keys: BTreeSet::new(),
        }
    }
}

impl<K: Ord + Clone> Selection<K> {
    /// Replaces the selection with every loaded key, or with nothing.
    pub fn toggle_all<I>(&mut self, checked: bool, all_keys: I)
    where
        I: IntoIterator<Item = K>,
    {
        self.keys = if checked {
            all_keys.into_iter().collect()
        } else {
            BTreeSet::new()
        };
    }

    pub fn toggle_one(&mut self, key: K, checked: bool) {
        if checked {
            self.keys.insert(key);
        } else {
            self.keys.remove(&key);
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.keys.iter()
    }

    /// The selected key when exactly one is selected.
    pub fn single(&self) -> Option<&K> {
        if self.keys.len() == 1 {
            self.keys.iter().next()
        } else {
            None
        }
    }

    pub fn is_subset_of(&self, loaded: &BTreeSet<K>) -> bool {
        self.keys.is_subset(loaded)
    }

    pub fn affordances(&self, collection_len: usize) -> SelectionAffordances {
        let size = self.keys.len();
        SelectionAffordances {
            all_checked: collection_len > 0 && size == collection_len,
            edit_enabled: size == 1,
            delete_enabled: size >= 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> Vec<String> {
        vec!["m::U1".to_string(), "m::U2".to_string(), "m::U3".to_string()]
    }

    #[test]
    fn toggle_all_is_idempotent_and_reversible() {
        let mut selection = Selection::default();
        selection.toggle_all(true, keys());
        let first = selection.clone();
        selection.toggle_all(true, keys());
        assert_eq!(selection, first);
        assert_eq!(selection.len(), 3);

        selection.toggle_all(false, keys());
        assert!(selection.is_empty());
    }

    #[test]
    fn toggle_one_leaves_other_keys_alone() {
        let mut selection = Selection::default();
        selection.toggle_all(true, keys());
        selection.toggle_one("m::U2".to_string(), false);
        assert!(selection.contains(&"m::U1".to_string()));
        assert!(!selection.contains(&"m::U2".to_string()));
        assert!(selection.contains(&"m::U3".to_string()));
    }

    #[test]
    fn affordances_follow_cardinality_boundaries() {
        let mut selection: Selection<String> = Selection::default();
        let none = selection.affordances(3);
        assert!(!none.edit_enabled && !none.delete_enabled && !none.all_checked);

        selection.toggle_one("m::U1".to_string(), true);
        let one = selection.affordances(3);
        assert!(one.edit_enabled && one.delete_enabled);
        assert_eq!(selection.single(), Some(&"m::U1".to_string()));

        selection.toggle_one("m::U2".to_string(), true);
        let two = selection.affordances(3);
        assert!(!two.edit_enabled && two.delete_enabled);
        assert_eq!(selection.single(), None);

        selection.toggle_one("m::U3".to_string(), true);
        assert!(selection.affordances(3).all_checked);
    }

    #[test]
    fn empty_collection_never_reports_all_checked() {
        let selection: Selection<String> = Selection::default();
        assert!(!selection.affordances(0).all_checked);
    }
}
