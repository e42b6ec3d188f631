use iced::widget::{
    button, center, column, container, image, row, scrollable, stack, text, text_input, tooltip,
    Column, Space,
};
use iced::{Alignment, Border, ContentFit, Element, Length, Padding, Theme};

use super::layout::{GridLayout, RowLayout};
use super::TOOLBAR_HEIGHT;
use crate::state::cells::CellSlot;
use crate::state::{GridController, ItemIndex, SearchResult};
use crate::Message;

/// Border drawn around photos selected for sharing
const SELECTED_BORDER: f32 = 10.0;

/// Id of the grid's scrollable, target of scroll requests
pub fn grid_id() -> scrollable::Id {
    scrollable::Id::new("photo-grid")
}

/// Search box, sharing controls and live selection count
pub fn toolbar<'a>(query: &'a str, controller: &'a GridController, exporting: bool) -> Element<'a, Message> {
    let search = text_input("Search Flickr", query)
        .on_input(Message::QueryChanged)
        .on_submit(Message::SubmitSearch)
        .padding(8)
        .width(Length::Fill);

    let mut bar = row![search].spacing(12).align_y(Alignment::Center);

    if controller.is_searching() {
        bar = bar.push(text("Searching...").size(14));
    }

    if let Some(status) = controller.share_status() {
        bar = bar.push(text(status).size(14));
    }

    let toggle_label = if controller.allows_multiple_selection() {
        "Cancel"
    } else {
        "Select"
    };
    bar = bar.push(
        button(text(toggle_label))
            .on_press(Message::ToggleSharing)
            .padding(8),
    );

    let mut share = button(text("Share")).padding(8);
    if !exporting {
        share = share.on_press(Message::Share);
    }
    bar = bar.push(share);

    container(bar)
        .padding(12)
        .width(Length::Fill)
        .height(Length::Fixed(TOOLBAR_HEIGHT))
        .into()
}

/// The scrollable grid of search sections
pub fn grid<'a>(controller: &'a GridController, layout: &GridLayout) -> Element<'a, Message> {
    let session = controller.session();
    if session.is_empty() {
        return center(text("Search Flickr to fill the grid").size(20)).into();
    }

    let metrics = layout.metrics;
    let mut content = Column::new();

    for section in &layout.sections {
        let Some(search) = session.section(section.section) else {
            continue;
        };

        let rows = Column::with_children(
            section
                .rows
                .iter()
                .map(|row_layout| grid_row(controller, row_layout, metrics.inset_side)),
        )
        .spacing(metrics.inset_side);

        content = content
            .push(section_header(search, metrics.header_height, metrics.inset_side))
            .push(Space::with_height(Length::Fixed(metrics.inset_top)))
            .push(rows)
            .push(Space::with_height(Length::Fixed(metrics.inset_bottom)));
    }

    scrollable(content)
        .id(grid_id())
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Header showing the search term of a section
fn section_header(search: &SearchResult, height: f32, inset: f32) -> Element<'_, Message> {
    let searched_at = search.searched_at.format("%H:%M").to_string();

    container(
        column![
            text(search.search_term.as_str()).size(28),
            text(format!("{} photos, searched at {}", search.items.len(), searched_at)).size(12),
        ]
        .spacing(2),
    )
    .padding(Padding::from([0.0, inset]))
    .width(Length::Fill)
    .center_y(Length::Fixed(height))
    .into()
}

fn grid_row<'a>(controller: &'a GridController, layout: &RowLayout, inset: f32) -> Element<'a, Message> {
    let cells = layout.cells.iter().map(|&(index, width, height)| {
        let title = controller.session().photo(index).map_or("", |p| p.title.as_str());
        photo_cell(controller.cells().cell_at(index), title, index, width, height)
    });
    let cells = iced::widget::Row::with_children(cells).spacing(inset);

    // The expanded photo is alone on its row and centered
    let expanded = layout
        .cells
        .first()
        .is_some_and(|&(index, _, _)| controller.expanded() == Some(index));

    let row = container(cells).padding(Padding::from([0.0, inset]));
    if expanded {
        row.center_x(Length::Fill).into()
    } else {
        row.width(Length::Fill).into()
    }
}

/// One cell: its image, a spinner while the large photo loads, the
/// selection border in sharing mode and the photo title on hover
fn photo_cell<'a>(
    cell: Option<&'a CellSlot>,
    title: &'a str,
    index: ItemIndex,
    width: f32,
    height: f32,
) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match cell.and_then(|c| c.image.as_ref()) {
        Some(photo) => image(photo.handle.clone())
            .width(Length::Fixed(width))
            .height(Length::Fixed(height))
            .content_fit(ContentFit::Cover)
            .into(),
        None => Space::new(Length::Fixed(width), Length::Fixed(height)).into(),
    };

    let content: Element<'a, Message> = if cell.is_some_and(|c| c.spinning) {
        stack![picture, center(text("Loading...").size(14))].into()
    } else {
        picture
    };

    let selected = cell.is_some_and(|c| c.selected);
    let framed = container(content).style(move |theme: &Theme| {
        let palette = theme.extended_palette();
        container::Style {
            border: Border {
                color: palette.primary.strong.color,
                width: if selected { SELECTED_BORDER } else { 0.0 },
                radius: 0.0.into(),
            },
            ..container::Style::default()
        }
    });

    let cell = button(framed)
        .padding(0)
        .style(button::text)
        .on_press(Message::ItemActivated(index));

    if title.is_empty() {
        return cell.into();
    }

    tooltip(
        cell,
        container(text(title).size(12))
            .padding(6)
            .style(container::rounded_box),
        tooltip::Position::FollowCursor,
    )
    .into()
}
