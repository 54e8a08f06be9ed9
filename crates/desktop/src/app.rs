use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, TryRecvError};
use iced::widget::{button, column, container, image, pick_list, row, text, Space};
use iced::{Alignment, Element, Length, Subscription, Task};

use glasses_core::capture::domain::frame_reader::FrameReader;
use glasses_core::capture::domain::image_writer::ImageWriter;
use glasses_core::capture::infrastructure::ffmpeg_camera_reader::FfmpegCameraReader;
use glasses_core::capture::infrastructure::image_file_reader::ImageFileReader;
use glasses_core::capture::infrastructure::image_file_writer::ImageFileWriter;
use glasses_core::detection::infrastructure::blazeface_face_locator::DEFAULT_CONFIDENCE;
use glasses_core::detection::infrastructure::model_factory::ModelSources;
use glasses_core::overlay::infrastructure::filter_directory::FilterDirectory;
use glasses_core::pipeline::input_router::{select_input, InputSource};
use glasses_core::shared::constants::{FILTERS_DIR, IMAGE_EXTENSIONS};
use glasses_core::shared::frame::Frame;

use crate::settings::Settings;
use crate::workers::overlay_worker::{self, OverlayParams};
use crate::workers::provider_cache::ProviderCache;
use crate::workers::{capture_worker, WorkerMessage};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingState {
    Idle,
    Capturing,
    Downloading(u64, u64),
    Applying,
    Error(String),
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Message {
    SourceChanged(InputSource),
    FilterChanged(String),
    ChooseImage,
    ImageChosen(Option<PathBuf>),
    Capture,
    Apply,
    Save,
    SaveSelected(Option<PathBuf>),
    PollWorker,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    settings: Settings,
    filters_dir: PathBuf,
    filters: Vec<String>,
    /// Preview handles, one per entry in `filters`.
    thumbnails: Vec<image::Handle>,
    upload: Option<Frame>,
    webcam: Option<Frame>,
    result: Option<Frame>,
    display: Option<image::Handle>,
    state: ProcessingState,
    worker: Option<Receiver<WorkerMessage>>,
    providers: Arc<ProviderCache>,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let providers = ProviderCache::new(ModelSources::from_env(None), DEFAULT_CONFIDENCE);
        (
            Self::with_settings(Settings::load(), PathBuf::from(FILTERS_DIR), providers),
            Task::none(),
        )
    }

    fn with_settings(
        settings: Settings,
        filters_dir: PathBuf,
        providers: Arc<ProviderCache>,
    ) -> Self {
        let filters = FilterDirectory::new(&filters_dir).available();
        if filters.is_empty() {
            log::warn!("No filters found in {}", filters_dir.display());
        }
        let thumbnails = filters
            .iter()
            .map(|name| image::Handle::from_path(filters_dir.join(name)))
            .collect();
        Self {
            settings,
            filters_dir,
            filters,
            thumbnails,
            upload: None,
            webcam: None,
            result: None,
            display: None,
            state: ProcessingState::Idle,
            worker: None,
            providers,
        }
    }

    fn is_busy(&self) -> bool {
        self.worker.is_some()
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SourceChanged(source) => {
                self.settings.source = source;
                self.settings.save();
                self.result = None;
                self.refresh_display();
            }
            Message::FilterChanged(filter) => {
                self.settings.filter = filter;
                self.settings.save();
            }
            Message::ChooseImage => {
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Choose image")
                            .add_filter("Images", IMAGE_EXTENSIONS)
                            .pick_file()
                            .await
                            .map(|h| h.path().to_path_buf())
                    },
                    Message::ImageChosen,
                );
            }
            Message::ImageChosen(Some(path)) => match ImageFileReader::new(&path).read() {
                Ok(frame) => {
                    self.upload = Some(frame);
                    self.result = None;
                    self.state = ProcessingState::Idle;
                    self.refresh_display();
                }
                Err(e) => self.state = ProcessingState::Error(e.to_string()),
            },
            Message::ImageChosen(None) => {}
            Message::Capture => {
                if !self.is_busy() {
                    let reader: Box<dyn FrameReader> = Box::new(FfmpegCameraReader::default());
                    self.worker = Some(capture_worker::spawn(reader));
                    self.state = ProcessingState::Capturing;
                }
            }
            Message::Apply => {
                if !self.is_busy() {
                    self.worker = Some(overlay_worker::spawn(OverlayParams {
                        source: self.settings.source,
                        upload: self.upload.clone(),
                        webcam: self.webcam.clone(),
                        filter_id: self.settings.filter.clone(),
                        filters_dir: self.filters_dir.clone(),
                        providers: self.providers.clone(),
                    }));
                    self.state = ProcessingState::Applying;
                }
            }
            Message::Save => {
                if self.result.is_some() {
                    return Task::perform(
                        async {
                            rfd::AsyncFileDialog::new()
                                .set_title("Save result as")
                                .add_filter("Images", IMAGE_EXTENSIONS)
                                .set_file_name("glasses.png")
                                .save_file()
                                .await
                                .map(|h| h.path().to_path_buf())
                        },
                        Message::SaveSelected,
                    );
                }
            }
            Message::SaveSelected(Some(path)) => {
                if let Some(frame) = &self.result {
                    match ImageFileWriter::new().write(&path, frame) {
                        Ok(()) => log::info!("Saved result to {}", path.display()),
                        Err(e) => self.state = ProcessingState::Error(e.to_string()),
                    }
                }
            }
            Message::SaveSelected(None) => {}
            Message::PollWorker => self.poll_worker(),
        }
        Task::none()
    }

    fn poll_worker(&mut self) {
        let Some(rx) = self.worker.take() else {
            return;
        };
        loop {
            match rx.try_recv() {
                Ok(message) => {
                    if self.handle_worker_message(message) {
                        return;
                    }
                }
                Err(TryRecvError::Empty) => {
                    self.worker = Some(rx);
                    return;
                }
                Err(TryRecvError::Disconnected) => {
                    self.state = ProcessingState::Error("Worker stopped unexpectedly".into());
                    return;
                }
            }
        }
    }

    /// Applies one worker message; returns `true` once the job is finished.
    fn handle_worker_message(&mut self, message: WorkerMessage) -> bool {
        match message {
            WorkerMessage::DownloadProgress(downloaded, total) => {
                self.state = ProcessingState::Downloading(downloaded, total);
                false
            }
            WorkerMessage::Captured(frame) => {
                self.webcam = Some(frame);
                self.result = None;
                self.state = ProcessingState::Idle;
                self.refresh_display();
                true
            }
            WorkerMessage::Applied(Some(frame)) => {
                self.result = Some(frame);
                self.state = ProcessingState::Idle;
                self.refresh_display();
                true
            }
            WorkerMessage::Applied(None) => {
                let hint = match self.settings.source {
                    InputSource::Upload => "Choose an image first",
                    InputSource::WebCam => "Capture a frame first",
                };
                self.state = ProcessingState::Error(hint.into());
                true
            }
            WorkerMessage::Error(e) => {
                log::error!("{e}");
                self.state = ProcessingState::Error(e);
                true
            }
        }
    }

    /// The frame on screen: the last result, else the active source's input.
    fn displayed_frame(&self) -> Option<&Frame> {
        self.result.as_ref().or_else(|| {
            select_input(self.settings.source, self.upload.as_ref(), self.webcam.as_ref())
        })
    }

    fn refresh_display(&mut self) {
        self.display = self.displayed_frame().map(|frame| {
            image::Handle::from_rgba(frame.width(), frame.height(), to_rgba(frame))
        });
    }

    pub fn view(&self) -> Element<'_, Message> {
        let busy = self.is_busy();
        let has_filters = !self.filters.is_empty();

        let input_button = match self.settings.source {
            InputSource::Upload => button(text("Choose image"))
                .on_press_maybe((!busy).then_some(Message::ChooseImage)),
            InputSource::WebCam => {
                button(text("Capture")).on_press_maybe((!busy).then_some(Message::Capture))
            }
        };

        let controls = row![
            text("Source"),
            pick_list(InputSource::ALL, Some(self.settings.source), Message::SourceChanged),
            input_button,
            Space::new().width(16),
            text("Filter"),
            pick_list(
                self.filters.as_slice(),
                has_filters.then(|| self.settings.filter.clone()),
                Message::FilterChanged,
            )
            .placeholder("No filters found"),
            button(text("Apply glasses"))
                .style(button::primary)
                .on_press_maybe((!busy && has_filters).then_some(Message::Apply)),
            button(text("Save"))
                .on_press_maybe((self.result.is_some() && !busy).then_some(Message::Save)),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let preview: Element<'_, Message> = match &self.display {
            Some(handle) => image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => container(text("No image yet"))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
        };

        column![
            controls,
            text("Choose your glasses model").size(16),
            self.filter_gallery(),
            preview,
            text(status_text(&self.state)).size(12),
        ]
        .spacing(12)
        .padding(16)
        .height(Length::Fill)
        .into()
    }

    /// A clickable preview per filter, or a hint when the directory is empty.
    fn filter_gallery(&self) -> Element<'_, Message> {
        if self.filters.is_empty() {
            return text(format!(
                "No filters found in {}. Add PNG files with transparency to use them here.",
                self.filters_dir.display()
            ))
            .size(12)
            .into();
        }

        row(self
            .filters
            .iter()
            .zip(&self.thumbnails)
            .map(|(name, handle)| {
                let card = column![
                    image(handle.clone()).width(100).height(80),
                    text(filter_label(name)).size(12),
                ]
                .spacing(4)
                .align_x(Alignment::Center);
                let btn = button(card)
                    .on_press(Message::FilterChanged(name.clone()))
                    .padding(4);
                if *name == self.settings.filter {
                    Element::from(btn.style(button::primary))
                } else {
                    Element::from(btn.style(button::text))
                }
            }))
        .spacing(8)
        .into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        if self.is_busy() {
            iced::time::every(POLL_INTERVAL).map(|_| Message::PollWorker)
        } else {
            Subscription::none()
        }
    }
}

fn status_text(state: &ProcessingState) -> String {
    match state {
        ProcessingState::Idle => String::new(),
        ProcessingState::Capturing => "Capturing...".into(),
        ProcessingState::Downloading(downloaded, total) if *total > 0 => {
            format!("Downloading models... {}%", downloaded * 100 / total)
        }
        ProcessingState::Downloading(downloaded, _) => {
            format!("Downloading models... {downloaded} bytes")
        }
        ProcessingState::Applying => "Applying glasses...".into(),
        ProcessingState::Error(e) => format!("Error: {e}"),
    }
}

/// Display name for a filter file: `carey.png` becomes `Carey`.
fn filter_label(filter_id: &str) -> String {
    let stem = filter_id.rsplit_once('.').map_or(filter_id, |(stem, _)| stem);
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// RGB frame bytes expanded to opaque RGBA for display.
fn to_rgba(frame: &Frame) -> Vec<u8> {
    frame
        .data()
        .chunks_exact(3)
        .flat_map(|p| [p[0], p[1], p[2], 255])
        .collect()
}
