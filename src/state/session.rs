use super::data::{ItemIndex, Photo, PhotoId, PhotoImage, SearchResult};

/// The SearchSession holds every completed search, newest first.
/// Each search is one section of the grid. Nothing is persisted.
#[derive(Debug, Default)]
pub struct SearchSession {
    searches: Vec<SearchResult>,
}

impl SearchSession {
    /// Insert a completed search at the front (section 0).
    /// Every existing section moves down by one.
    pub fn insert(&mut self, result: SearchResult) {
        self.searches.insert(0, result);
    }

    pub fn is_empty(&self) -> bool {
        self.searches.is_empty()
    }

    /// Number of sections (completed searches)
    pub fn section_count(&self) -> usize {
        self.searches.len()
    }

    /// Number of photos in a section (0 for unknown sections)
    #[cfg(test)]
    pub fn item_count(&self, section: usize) -> usize {
        self.searches.get(section).map_or(0, |s| s.items.len())
    }

    pub fn sections(&self) -> &[SearchResult] {
        &self.searches
    }

    pub fn section(&self, section: usize) -> Option<&SearchResult> {
        self.searches.get(section)
    }

    /// Get the photo at a grid position
    pub fn photo(&self, index: ItemIndex) -> Option<&Photo> {
        self.searches.get(index.section)?.items.get(index.item)
    }

    /// Every position in grid order
    pub fn indices(&self) -> impl Iterator<Item = ItemIndex> + '_ {
        self.searches.iter().enumerate().flat_map(|(section, search)| {
            (0..search.items.len()).map(move |item| ItemIndex::new(section, item))
        })
    }

    /// Cache a large image on every photo with this id.
    /// The same photo can show up in several searches.
    /// Returns the number of photos updated.
    pub fn cache_large_image(&mut self, id: &PhotoId, image: &PhotoImage) -> usize {
        let mut updated = 0;
        for photo in self
            .searches
            .iter_mut()
            .flat_map(|s| s.items.iter_mut())
            .filter(|p| &p.id == id)
        {
            photo.large_image = Some(image.clone());
            updated += 1;
        }
        updated
    }

    /// Find photos by id, in grid order
    pub fn photos_by_id<'a>(&'a self, ids: &'a [PhotoId]) -> Vec<&'a Photo> {
        ids.iter()
            .filter_map(|id| {
                self.searches
                    .iter()
                    .flat_map(|s| s.items.iter())
                    .find(|p| &p.id == id)
            })
            .collect()
    }
}
