use iced::widget::{column, container, scrollable, text};
use iced::{Element, Length, Size, Subscription, Task, Theme};
use rfd::FileDialog;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod error;
mod export;
mod flickr;
mod settings;
mod state;
mod ui;

use error::{ImageLoadError, SearchError, ShareError};
use export::ExportSummary;
use flickr::FlickrClient;
use settings::{Settings, ThemeChoice, API_KEY_ENV};
use state::{GridController, HostRequest, ItemIndex, PhotoId, PhotoImage, RequestQueue, SearchResult, ShareOutcome};
use ui::layout::{GridLayout, GridMetrics};

/// Window size at startup
const INITIAL_WINDOW: Size = Size::new(900.0, 800.0);

/// Main application state
struct PhotoGrid {
    settings: Settings,
    client: FlickrClient,
    /// Searches, expansion, sharing and cell state
    controller: GridController,
    metrics: GridMetrics,
    /// Text currently typed in the search box
    query: String,
    /// Current window size, used to lay out the grid
    window: Size,
    /// An export is running
    exporting: bool,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// The search box text changed
    QueryChanged(String),
    /// Enter was pressed in the search box
    SubmitSearch,
    /// Background search completed
    SearchComplete(Result<SearchResult, Arc<SearchError>>),
    /// A grid cell was clicked
    ItemActivated(ItemIndex),
    /// Background large image load completed for the position it was requested for
    LargeImageLoaded {
        index: ItemIndex,
        photo_id: PhotoId,
        result: Result<PhotoImage, Arc<ImageLoadError>>,
    },
    /// The Select/Cancel button was clicked
    ToggleSharing,
    /// The Share button was clicked
    Share,
    /// Background export completed
    ShareComplete(Result<ExportSummary, Arc<ShareError>>),
    WindowResized(Size),
}

impl PhotoGrid {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let settings = Settings::load().unwrap_or_else(|e| {
            warn!("{}; using default settings", e);
            Settings::default()
        });

        if settings.api_key.is_empty() {
            warn!(
                "No Flickr API key configured. Set {} or add it to {}",
                API_KEY_ENV,
                Settings::settings_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "settings.json".to_string())
            );
        }

        info!("Photo grid initialized ({} photos per search)", settings.per_page);

        let app = PhotoGrid {
            client: FlickrClient::new(settings.api_key.clone(), settings.per_page),
            metrics: GridMetrics::from_settings(&settings),
            settings,
            controller: GridController::new(),
            query: String::new(),
            window: INITIAL_WINDOW,
            exporting: false,
            status: "Type a search term and press Enter.".to_string(),
        };

        (app, Task::none())
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let mut host = RequestQueue::new();

        match message {
            Message::QueryChanged(query) => {
                self.query = query;
            }
            Message::SubmitSearch => {
                let term = std::mem::take(&mut self.query);
                self.controller.submit_search(&term, &mut host);
            }
            Message::SearchComplete(result) => {
                let succeeded = result.is_ok();
                self.controller.search_completed(result, &mut host);
                if let Some(latest) = self.controller.session().section(0).filter(|_| succeeded) {
                    self.status = format!(
                        "Found {} photos matching \"{}\".",
                        latest.items.len(),
                        latest.search_term
                    );
                }
            }
            Message::ItemActivated(index) => {
                self.controller.on_item_activated(index, &mut host);
            }
            Message::LargeImageLoaded {
                index,
                photo_id,
                result,
            } => {
                self.controller.large_image_loaded(index, &photo_id, result);
            }
            Message::ToggleSharing => {
                let enabled = !self.controller.is_sharing();
                self.controller.set_sharing_mode(enabled, &mut host);
            }
            Message::Share => {
                if let ShareOutcome::Share(photos) = self.controller.share(&mut host) {
                    let mut dialog = FileDialog::new().set_title("Export Selected Photos");
                    if let Some(dir) = export::default_export_dir() {
                        dialog = dialog.set_directory(dir);
                    }

                    if let Some(folder) = dialog.pick_folder() {
                        self.exporting = true;
                        self.status = format!("Exporting {} photos...", photos.len());
                        return Task::batch([
                            self.perform(host),
                            Task::perform(
                                async move { export::export_photos(photos, folder).await.map_err(Arc::new) },
                                Message::ShareComplete,
                            ),
                        ]);
                    }
                }
            }
            Message::ShareComplete(result) => {
                self.exporting = false;
                match result {
                    Ok(summary) => {
                        self.status = format!(
                            "Exported {} photos to {}.",
                            summary.written,
                            summary.folder.display()
                        );
                        self.controller.set_sharing_mode(false, &mut host);
                    }
                    Err(e) => {
                        warn!("Export failed: {}", e);
                        self.status.clear();
                    }
                }
            }
            Message::WindowResized(size) => {
                self.window = size;
            }
        }

        self.perform(host)
    }

    /// Turn the controller's requests into tasks, in the order they were issued
    fn perform(&self, mut host: RequestQueue) -> Task<Message> {
        let mut tasks = Vec::new();

        for request in host.drain() {
            match request {
                // The view is rebuilt from the cell arena after every update
                HostRequest::ReloadAll | HostRequest::ReloadItems(_) => {}
                HostRequest::ScrollTo(index) => {
                    if let Some(y) = self.layout().center_offset(index) {
                        tasks.push(scrollable::scroll_to(
                            ui::grid::grid_id(),
                            scrollable::AbsoluteOffset { x: 0.0, y },
                        ));
                    }
                }
                HostRequest::Search(term) => {
                    let client = self.client.clone();
                    tasks.push(Task::perform(
                        async move { client.search(term).await.map_err(Arc::new) },
                        Message::SearchComplete,
                    ));
                }
                HostRequest::LoadLargeImage { index, photo } => {
                    let client = self.client.clone();
                    let photo_id = photo.id.clone();
                    tasks.push(Task::perform(
                        async move { client.load_large_image(photo).await.map_err(Arc::new) },
                        move |result| Message::LargeImageLoaded {
                            index,
                            photo_id: photo_id.clone(),
                            result,
                        },
                    ));
                }
            }
        }

        Task::batch(tasks)
    }

    /// Grid geometry for the current window
    fn layout(&self) -> GridLayout {
        let viewport = Size::new(
            self.window.width - ui::SCROLLBAR_WIDTH,
            (self.window.height - ui::TOOLBAR_HEIGHT).max(1.0),
        );
        GridLayout::compute(
            self.controller.session(),
            self.controller.expanded(),
            self.metrics,
            viewport,
        )
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let layout = self.layout();

        column![
            ui::grid::toolbar(&self.query, &self.controller, self.exporting),
            container(ui::grid::grid(&self.controller, &layout)).height(Length::Fill),
            container(text(&self.status).size(14)).padding([4, 12]),
        ]
        .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        iced::window::resize_events().map(|(_id, size)| Message::WindowResized(size))
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        match self.settings.theme {
            ThemeChoice::Dark => Theme::Dark,
            ThemeChoice::Light => Theme::Light,
        }
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("photo_grid=info")),
        )
        .init();

    iced::application("Flickr Search", PhotoGrid::update, PhotoGrid::view)
        .subscription(PhotoGrid::subscription)
        .theme(PhotoGrid::theme)
        .window_size(INITIAL_WINDOW)
        .centered()
        .run_with(PhotoGrid::new)
}
