use super::data::PhotoId;

/// Photos marked for sharing, in the order they were selected.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<PhotoId>,
}

impl SelectionSet {
    pub fn contains(&self, id: &PhotoId) -> bool {
        self.ids.contains(id)
    }

    /// Add the photo if absent, remove it otherwise.
    /// Returns whether the photo is selected afterwards.
    pub fn toggle(&mut self, id: &PhotoId) -> bool {
        if let Some(position) = self.ids.iter().position(|s| s == id) {
            self.ids.remove(position);
            false
        } else {
            self.ids.push(id.clone());
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[PhotoId] {
        &self.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> PhotoId {
        PhotoId(s.to_string())
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = SelectionSet::default();
        assert!(selection.toggle(&id("a")));
        assert!(selection.toggle(&id("b")));
        assert_eq!(selection.len(), 2);

        assert!(!selection.toggle(&id("a")));
        assert_eq!(selection.ids(), &[id("b")]);
    }

    #[test]
    fn keeps_selection_order() {
        let mut selection = SelectionSet::default();
        for s in ["c", "a", "b"] {
            selection.toggle(&id(s));
        }
        assert_eq!(selection.ids(), &[id("c"), id("a"), id("b")]);
        selection.clear();
        assert!(selection.is_empty());
    }
}
