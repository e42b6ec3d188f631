//! Grid controller
//!
//! Owns the search session, the expanded index, sharing mode and the
//! selection, and keeps the cell arena in sync with them. It never draws
//! or performs I/O itself: re-renders, scrolling, searches and image loads
//! are requested through the `GridSurface` and `PhotoSource` seams, and
//! async completions come back through `search_completed` and
//! `large_image_loaded` on the same update loop.

use std::fmt::Display;

use tracing::{debug, info, warn};

use super::cells::CellArena;
use super::data::{ItemIndex, Photo, PhotoId, PhotoImage, SearchResult};
use super::selection::SelectionSet;
use super::session::SearchSession;

/// Render primitives of the grid view
pub trait GridSurface {
    /// Every cell was rebound
    fn reload_all(&mut self);
    /// Only these cells were rebound
    fn reload_items(&mut self, items: &[ItemIndex]);
    /// Bring an item to the vertical center of the viewport
    fn scroll_to(&mut self, item: ItemIndex);
}

/// Async collaborators. Both calls return immediately; the result is
/// delivered later to the controller's completion methods.
pub trait PhotoSource {
    fn search_for_term(&mut self, term: &str);
    /// `index` is the position the load was requested for
    fn load_large_image(&mut self, index: ItemIndex, photo: &Photo);
}

/// What a call to `share` decided
#[derive(Debug, Clone, PartialEq)]
pub enum ShareOutcome {
    /// Nothing to do
    Nothing,
    /// Sharing mode was turned on so the user can pick photos
    EnteredSharing,
    /// These photos should be handed to the share action
    Share(Vec<Photo>),
}

/// Requests captured in the order the controller issued them
#[derive(Debug, Clone, PartialEq)]
pub enum HostRequest {
    ReloadAll,
    ReloadItems(Vec<ItemIndex>),
    ScrollTo(ItemIndex),
    Search(String),
    LoadLargeImage { index: ItemIndex, photo: Photo },
}

/// A host that queues every request for the caller to act on
#[derive(Debug, Default)]
pub struct RequestQueue {
    pub requests: Vec<HostRequest>,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, HostRequest> {
        self.requests.drain(..)
    }
}

impl GridSurface for RequestQueue {
    fn reload_all(&mut self) {
        self.requests.push(HostRequest::ReloadAll);
    }

    fn reload_items(&mut self, items: &[ItemIndex]) {
        self.requests.push(HostRequest::ReloadItems(items.to_vec()));
    }

    fn scroll_to(&mut self, item: ItemIndex) {
        self.requests.push(HostRequest::ScrollTo(item));
    }
}

impl PhotoSource for RequestQueue {
    fn search_for_term(&mut self, term: &str) {
        self.requests.push(HostRequest::Search(term.to_string()));
    }

    fn load_large_image(&mut self, index: ItemIndex, photo: &Photo) {
        self.requests.push(HostRequest::LoadLargeImage {
            index,
            photo: photo.clone(),
        });
    }
}

/// Selection, expansion and image-load state of the photo grid
#[derive(Debug, Default)]
pub struct GridController {
    session: SearchSession,
    cells: CellArena,
    expanded: Option<ItemIndex>,
    sharing: bool,
    selection: SelectionSet,
    searches_in_flight: usize,
}

impl GridController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn cells(&self) -> &CellArena {
        &self.cells
    }

    pub fn expanded(&self) -> Option<ItemIndex> {
        self.expanded
    }

    pub fn is_sharing(&self) -> bool {
        self.sharing
    }

    #[cfg(test)]
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Whether the grid accepts more than one selected item
    pub fn allows_multiple_selection(&self) -> bool {
        self.sharing
    }

    /// Whether the search box spinner should run
    pub fn is_searching(&self) -> bool {
        self.searches_in_flight > 0
    }

    /// Live indicator shown next to the share button in sharing mode
    pub fn share_status(&self) -> Option<String> {
        self.sharing
            .then(|| format!("{} photos selected", self.selection.len()))
    }

    // ========== Search ==========

    /// Start a search for the text typed in the search box
    pub fn submit_search<H: PhotoSource>(&mut self, term: &str, host: &mut H) {
        let term = term.trim();
        if term.is_empty() {
            debug!("Ignoring empty search");
            return;
        }

        self.searches_in_flight += 1;
        host.search_for_term(term);
    }

    /// Completion of a search started by `submit_search`
    pub fn search_completed<H, E>(&mut self, result: Result<SearchResult, E>, host: &mut H)
    where
        H: GridSurface + PhotoSource,
        E: Display,
    {
        self.searches_in_flight = self.searches_in_flight.saturating_sub(1);

        let result = match result {
            Ok(result) => result,
            Err(e) => {
                warn!("Error searching: {}", e);
                return;
            }
        };

        info!("Found {} matching {}", result.items.len(), result.search_term);
        self.session.insert(result);

        // Existing sections moved down one, keep pointing at the same photo
        if let Some(expanded) = self.expanded.as_mut() {
            expanded.section += 1;
        }

        self.reload_all(host);
    }

    // ========== Expansion ==========

    /// Change the expanded item, reloading only the affected cells and then
    /// scrolling the new expanded item into the center of the view.
    pub fn set_expanded<H>(&mut self, index: Option<ItemIndex>, host: &mut H)
    where
        H: GridSurface + PhotoSource,
    {
        let old = std::mem::replace(&mut self.expanded, index);

        let mut affected = Vec::with_capacity(2);
        if let Some(new) = index {
            affected.push(new);
        }
        if let Some(old) = old {
            if Some(old) != index {
                affected.push(old);
            }
        }

        for &item in &affected {
            self.bind_cell(item, host);
        }
        host.reload_items(&affected);

        if let Some(expanded) = self.expanded {
            host.scroll_to(expanded);
        }
    }

    // ========== Sharing ==========

    /// Enter or leave sharing mode. Either way the selection is cleared;
    /// entering also collapses the expanded item.
    pub fn set_sharing_mode<H>(&mut self, enabled: bool, host: &mut H)
    where
        H: GridSurface + PhotoSource,
    {
        self.sharing = enabled;
        self.selection.clear();
        self.cells.deselect_all();

        if enabled && self.expanded.is_some() {
            self.set_expanded(None, host);
        }
    }

    /// The user tapped an item
    pub fn on_item_activated<H>(&mut self, index: ItemIndex, host: &mut H)
    where
        H: GridSurface + PhotoSource,
    {
        if !self.sharing {
            let next = if self.expanded == Some(index) {
                None
            } else {
                Some(index)
            };
            self.set_expanded(next, host);
            return;
        }

        let Some(photo) = self.session.photo(index) else {
            return;
        };
        let selected = self.selection.toggle(&photo.id);
        // Every position showing this photo reflects the shared selection state
        self.cells.set_selected_for(&photo.id, selected);
    }

    /// The share button was pressed
    pub fn share<H>(&mut self, host: &mut H) -> ShareOutcome
    where
        H: GridSurface + PhotoSource,
    {
        if self.session.is_empty() {
            return ShareOutcome::Nothing;
        }

        if self.selection.is_empty() {
            if self.sharing {
                return ShareOutcome::Nothing;
            }
            self.set_sharing_mode(true, host);
            return ShareOutcome::EnteredSharing;
        }

        if !self.sharing {
            return ShareOutcome::Nothing;
        }

        let photos = self
            .session
            .photos_by_id(self.selection.ids())
            .into_iter()
            .cloned()
            .collect();
        ShareOutcome::Share(photos)
    }

    // ========== Large image loading ==========

    /// Completion of a large image load requested for `index`
    pub fn large_image_loaded<E: Display>(
        &mut self,
        index: ItemIndex,
        photo_id: &PhotoId,
        result: Result<PhotoImage, E>,
    ) {
        // Whatever cell holds this position now, its spinner was ours
        if let Some(cell) = self.cells.cell_at_mut(index) {
            cell.stop_spinner();
        }

        let image = match result {
            Ok(image) if !image.is_empty() => image,
            Ok(_) => {
                warn!("Large image for {} was empty", photo_id);
                return;
            }
            Err(e) => {
                warn!("Error loading large image for {}: {}", photo_id, e);
                return;
            }
        };

        self.session.cache_large_image(photo_id, &image);

        if self.expanded != Some(index) {
            debug!("Discarding stale large image for {} at {}", photo_id, index);
            return;
        }

        // The position is expanded again, but possibly for a different photo
        match self.cells.cell_at_mut(index) {
            Some(cell) if cell.photo_id.as_ref() == Some(photo_id) => cell.image = Some(image),
            _ => debug!("Discarding large image for {}, {} now shows another photo", photo_id, index),
        }
    }

    // ========== Cell binding ==========

    fn reload_all<H>(&mut self, host: &mut H)
    where
        H: GridSurface + PhotoSource,
    {
        self.cells.recycle_all();
        let indices: Vec<ItemIndex> = self.session.indices().collect();
        for index in indices {
            self.bind_cell(index, host);
        }
        host.reload_all();
    }

    /// Configure the cell for a position, issuing a large image load when
    /// the expanded photo has none cached yet.
    fn bind_cell<H: PhotoSource>(&mut self, index: ItemIndex, host: &mut H) {
        let Some(photo) = self.session.photo(index) else {
            return;
        };
        let expanded = self.expanded == Some(index);
        let selected = self.sharing && self.selection.contains(&photo.id);

        let cell = self.cells.dequeue(index);
        // A reused cell may still be spinning for its previous position
        cell.stop_spinner();
        cell.photo_id = Some(photo.id.clone());
        cell.expanded = expanded;
        cell.selected = selected;

        if !expanded {
            cell.image = photo.thumbnail.clone();
            return;
        }

        if let Some(large) = &photo.large_image {
            cell.image = Some(large.clone());
            return;
        }

        cell.image = photo.thumbnail.clone();
        cell.start_spinner();
        host.load_large_image(index, photo);
    }
}
