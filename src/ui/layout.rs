//! Flow layout of the photo grid
//!
//! Computed up front (instead of letting iced wrap items) so that the
//! controller's scroll requests can be turned into exact offsets.
//!
//! Per section:
//! - header row showing the search term
//! - `inset_top` gap
//! - rows of `items_per_row` square thumbnails, `inset_side` apart
//! - `inset_bottom` gap
//!
//! The expanded item always sits on a row of its own.

use iced::Size;

use crate::settings::Settings;
use crate::state::session::SearchSession;
use crate::state::ItemIndex;

/// Spacing values of the grid, in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub items_per_row: usize,
    pub inset_top: f32,
    pub inset_side: f32,
    pub inset_bottom: f32,
    pub header_height: f32,
}

impl GridMetrics {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            items_per_row: settings.items_per_row.max(1) as usize,
            inset_top: settings.inset_top,
            inset_side: settings.inset_side,
            inset_bottom: settings.inset_bottom,
            header_height: settings.header_height,
        }
    }

    /// Side of a square thumbnail cell
    pub fn item_side(&self, width: f32) -> f32 {
        let per_row = self.items_per_row as f32;
        let padding = self.inset_side * (per_row + 1.0);
        ((width - padding) / per_row).max(1.0)
    }

    /// Largest box the expanded photo may fill
    pub fn large_bounds(&self, viewport: Size) -> (f32, f32) {
        (
            (viewport.width - 2.0 * self.inset_side).max(1.0),
            (viewport.height - self.inset_top - self.inset_side).max(1.0),
        )
    }
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// One laid out row of cells
#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    /// (position, width, height) of every cell, left to right
    pub cells: Vec<(ItemIndex, f32, f32)>,
    /// Distance from the top of the grid
    pub top: f32,
    pub height: f32,
}

/// One laid out search section
#[derive(Debug, Clone, PartialEq)]
pub struct SectionLayout {
    pub section: usize,
    pub rows: Vec<RowLayout>,
}

/// Geometry of the whole grid for one viewport size
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub metrics: GridMetrics,
    pub viewport: Size,
    pub sections: Vec<SectionLayout>,
    pub total_height: f32,
}

impl GridLayout {
    pub fn compute(
        session: &SearchSession,
        expanded: Option<ItemIndex>,
        metrics: GridMetrics,
        viewport: Size,
    ) -> Self {
        let side = metrics.item_side(viewport.width);
        let large_bounds = metrics.large_bounds(viewport);

        let mut sections = Vec::with_capacity(session.section_count());
        let mut y = 0.0;

        for (section, search) in session.sections().iter().enumerate() {
            y += metrics.header_height + metrics.inset_top;

            // Group positions into rows, the expanded one alone
            let mut groups: Vec<Vec<(ItemIndex, f32, f32)>> = Vec::new();
            let mut current = Vec::new();
            for (item, photo) in search.items.iter().enumerate() {
                let index = ItemIndex::new(section, item);
                if expanded == Some(index) {
                    if !current.is_empty() {
                        groups.push(std::mem::take(&mut current));
                    }
                    let (width, height) = photo.size_to_fill_width(large_bounds);
                    groups.push(vec![(index, width, height)]);
                    continue;
                }

                current.push((index, side, side));
                if current.len() == metrics.items_per_row {
                    groups.push(std::mem::take(&mut current));
                }
            }
            if !current.is_empty() {
                groups.push(current);
            }

            let mut rows = Vec::with_capacity(groups.len());
            for (n, cells) in groups.into_iter().enumerate() {
                if n > 0 {
                    y += metrics.inset_side;
                }
                let height = cells.iter().map(|&(_, _, h)| h).fold(0.0, f32::max);
                rows.push(RowLayout { cells, top: y, height });
                y += height;
            }

            y += metrics.inset_bottom;
            sections.push(SectionLayout { section, rows });
        }

        Self {
            metrics,
            viewport,
            sections,
            total_height: y,
        }
    }

    /// Row holding a position
    pub fn row_of(&self, index: ItemIndex) -> Option<&RowLayout> {
        self.sections
            .get(index.section)?
            .rows
            .iter()
            .find(|row| row.cells.iter().any(|&(i, _, _)| i == index))
    }

    /// Vertical scroll offset that centers a position in the viewport
    pub fn center_offset(&self, index: ItemIndex) -> Option<f32> {
        let row = self.row_of(index)?;
        let max_offset = (self.total_height - self.viewport.height).max(0.0);
        let offset = row.top + row.height / 2.0 - self.viewport.height / 2.0;
        Some(offset.clamp(0.0, max_offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures::search;

    fn metrics() -> GridMetrics {
        GridMetrics::default()
    }

    fn session(sizes: &[(&str, usize)]) -> SearchSession {
        let mut session = SearchSession::default();
        for &(term, count) in sizes {
            session.insert(search(term, count));
        }
        session
    }

    #[test]
    fn three_items_per_row_with_side_insets() {
        // (400 - 20 * 4) / 3
        assert!((metrics().item_side(400.0) - 106.666_67).abs() < 0.001);
    }

    #[test]
    fn rows_fill_left_to_right() {
        let layout = GridLayout::compute(&session(&[("cats", 7)]), None, metrics(), Size::new(400.0, 800.0));
        let rows = &layout.sections[0].rows;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].cells.len(), 3);
        assert_eq!(rows[2].cells.len(), 1);
        assert_eq!(rows[0].top, 100.0);
    }

    #[test]
    fn expanded_item_gets_its_own_row() {
        let layout = GridLayout::compute(
            &session(&[("cats", 6)]),
            Some(ItemIndex::new(0, 1)),
            metrics(),
            Size::new(400.0, 800.0),
        );
        let rows = &layout.sections[0].rows;
        let shapes: Vec<usize> = rows.iter().map(|r| r.cells.len()).collect();
        assert_eq!(shapes, vec![1, 1, 3, 1]);

        // 4:3 thumbnail filling 360px of width
        let (_, width, height) = rows[1].cells[0];
        assert!((width - 360.0).abs() < 0.01);
        assert!((height - 270.0).abs() < 0.01);
    }

    #[test]
    fn sections_stack_newest_first() {
        let layout = GridLayout::compute(&session(&[("cats", 3), ("dogs", 3)]), None, metrics(), Size::new(400.0, 800.0));
        assert_eq!(layout.sections.len(), 2);
        let section_height = 50.0 + 50.0 + metrics().item_side(400.0) + 50.0;
        // Header and top inset of the older section come after the newer one
        assert!((layout.sections[1].rows[0].top - (section_height + 100.0)).abs() < 0.001);
        assert!((layout.total_height - 2.0 * section_height).abs() < 0.001);
    }

    #[test]
    fn center_offset_is_clamped() {
        let session = session(&[("cats", 30)]);
        let viewport = Size::new(400.0, 300.0);
        let layout = GridLayout::compute(&session, None, metrics(), viewport);

        let tall = GridLayout::compute(&session, None, metrics(), Size::new(400.0, 600.0));
        assert_eq!(tall.center_offset(ItemIndex::new(0, 0)), Some(0.0));

        let last = layout.center_offset(ItemIndex::new(0, 29)).unwrap();
        assert!((last - (layout.total_height - viewport.height)).abs() < 0.001);

        let middle = layout.center_offset(ItemIndex::new(0, 15)).unwrap();
        let row = layout.row_of(ItemIndex::new(0, 15)).unwrap();
        assert!((middle - (row.top + row.height / 2.0 - 150.0)).abs() < 0.001);

        assert_eq!(layout.center_offset(ItemIndex::new(3, 0)), None);
    }
}
