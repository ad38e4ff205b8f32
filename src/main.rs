use iced::widget::image::Handle;
use iced::widget::{column, container, row, text};
use iced::{Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::time::Duration;

mod camera;
mod imaging;
mod net;
mod state;
mod ui;

use camera::feed::CameraFeed;
use camera::Frame;
use imaging::{transcode, upload};
use state::capture::{CaptureState, CapturedImage};
use state::config::{AspectRatio, ImageConfig, OutputFormat};
use state::send::{SendConfig, SendMethod, TransmissionResult};

/// How often the UI pulls the latest frame from the capture thread.
const VIEWFINDER_INTERVAL: Duration = Duration::from_millis(66);

/// Main application state
struct FaceCapture {
    /// Handle to the capture thread; None after a source-mode switch,
    /// camera failure, or denial
    camera: Option<CameraFeed>,
    /// Set once the camera has failed, so close does not retry the device
    camera_failed: bool,
    /// Latest raw frame, kept at native resolution for capture
    live: Option<Frame>,
    /// The same frame as a renderable handle for the viewfinder
    viewfinder: Option<Handle>,
    /// The held still image, if any
    capture: CaptureState,
    /// Decoded render handle for the held still
    still: Option<Handle>,
    config: ImageConfig,
    send_config: SendConfig,
    result: TransmissionResult,
    /// Raw text of the width field; committed once it parses
    width_input: String,
    /// Raw text of the height field; committed once it parses
    height_input: String,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Viewfinder timer fired; pull the latest frame
    Tick,
    /// User clicked "Capture"
    CaptureStill,
    /// User clicked "Upload..."
    UploadImage,
    /// Background file load completed
    FileLoaded(Result<CapturedImage, String>),
    WidthChanged(String),
    HeightChanged(String),
    AspectChanged(AspectRatio),
    FormatChanged(OutputFormat),
    QualityChanged(f32),
    MethodChanged(SendMethod),
    FieldNameChanged(String),
    EndpointChanged(String),
    /// User clicked the transform button
    Transform,
    /// Background transcode completed
    TransformComplete(Result<CapturedImage, String>),
    /// User clicked "Send"
    Send,
    /// The POST completed
    SendComplete(Result<String, String>),
    /// User clicked "Download"
    Download,
    /// User clicked "Close"; discard the still and return to the feed
    CloseImage,
}

impl FaceCapture {
    /// Create a new instance of the application and start the camera.
    fn new() -> (Self, Task<Message>) {
        let config = ImageConfig::default();
        let mut send_config = SendConfig::default();
        if let Ok(endpoint) = std::env::var("FACE_CAPTURE_ENDPOINT") {
            if !endpoint.is_empty() {
                send_config.endpoint = endpoint;
            }
        }

        log::info!("face-capture starting; endpoint {}", send_config.endpoint);

        let app = FaceCapture {
            camera: Some(CameraFeed::start(config.width, config.height)),
            camera_failed: false,
            live: None,
            viewfinder: None,
            capture: CaptureState::default(),
            still: None,
            width_input: config.width.to_string(),
            height_input: config.height.to_string(),
            config,
            send_config,
            result: TransmissionResult::Idle,
            status: "Starting camera...".to_string(),
        };

        (app, Task::none())
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                self.poll_camera();
                Task::none()
            }

            Message::CaptureStill => {
                if let Some(frame) = &self.live {
                    match transcode::still_from_frame(frame, self.config.format, self.config.quality)
                    {
                        Ok(image) => {
                            self.status = format!(
                                "Captured {} \u{00D7} {} still",
                                image.width, image.height
                            );
                            self.install_image(image);
                        }
                        Err(error) => {
                            log::error!("capture failed: {}", error);
                            self.status = format!("Capture failed: {}", error);
                        }
                    }
                }
                Task::none()
            }

            Message::UploadImage => {
                let picked = FileDialog::new()
                    .set_title("Select an image")
                    .add_filter("Images", &["jpg", "jpeg", "png", "webp", "gif", "bmp"])
                    .pick_file();

                if let Some(path) = picked {
                    self.capture.loading = true;
                    return Task::perform(upload::load_from_file(path), Message::FileLoaded);
                }
                Task::none()
            }

            Message::FileLoaded(result) => {
                self.capture.loading = false;
                match result {
                    Ok(image) => {
                        self.status =
                            format!("Loaded {} \u{00D7} {} file", image.width, image.height);
                        self.install_image(image);
                        // Source-mode switch: release the device
                        self.camera = None;
                        self.live = None;
                        self.viewfinder = None;
                    }
                    Err(error) => {
                        // Validation failure; prior capture state is untouched
                        self.status = error;
                    }
                }
                Task::none()
            }

            Message::WidthChanged(value) => {
                if value.is_empty() {
                    self.width_input = value;
                } else if let Ok(width) = value.parse::<u32>() {
                    if width > 0 {
                        self.config.set_width(width);
                        self.width_input = value;
                        self.height_input = self.config.height.to_string();
                    }
                }
                Task::none()
            }

            Message::HeightChanged(value) => {
                if value.is_empty() {
                    self.height_input = value;
                } else if let Ok(height) = value.parse::<u32>() {
                    if height > 0 {
                        self.config.set_height(height);
                        self.height_input = value;
                        self.width_input = self.config.width.to_string();
                    }
                }
                Task::none()
            }

            Message::AspectChanged(aspect) => {
                self.config.set_aspect(aspect);
                self.width_input = self.config.width.to_string();
                self.height_input = self.config.height.to_string();
                Task::none()
            }

            Message::FormatChanged(format) => {
                self.config.format = format;
                Task::none()
            }

            Message::QualityChanged(quality) => {
                self.config.quality = quality;
                Task::none()
            }

            Message::MethodChanged(method) => {
                self.send_config.method = method;
                Task::none()
            }

            Message::FieldNameChanged(name) => {
                self.send_config.field_name = name;
                Task::none()
            }

            Message::EndpointChanged(endpoint) => {
                self.send_config.endpoint = endpoint;
                Task::none()
            }

            Message::Transform => {
                if let Some(image) = self.capture.image.clone() {
                    self.capture.loading = true;
                    self.status = format!(
                        "Transforming to {} \u{00D7} {}...",
                        self.config.width, self.config.height
                    );
                    return Task::perform(
                        transcode::transcode(image, self.config),
                        Message::TransformComplete,
                    );
                }
                Task::none()
            }

            Message::TransformComplete(result) => {
                self.capture.loading = false;
                match result {
                    Ok(image) => {
                        self.status = format!(
                            "Transformed to {} \u{00D7} {}",
                            image.width, image.height
                        );
                        self.install_image(image);
                    }
                    Err(error) => {
                        log::error!("transform failed: {}", error);
                        self.status = format!("Transform failed: {}", error);
                    }
                }
                Task::none()
            }

            Message::Send => {
                if self.result.is_pending() {
                    return Task::none();
                }
                if !self.capture.has_image() {
                    self.result = TransmissionResult::Failure("No image to send".to_string());
                    return Task::none();
                }
                if self.send_config.endpoint.trim().is_empty() {
                    self.result =
                        TransmissionResult::Failure("No endpoint configured".to_string());
                    return Task::none();
                }

                self.result = TransmissionResult::Pending;
                Task::perform(
                    net::client::send(
                        self.capture.image.clone(),
                        self.config,
                        self.send_config.clone(),
                    ),
                    Message::SendComplete,
                )
            }

            Message::SendComplete(result) => {
                self.result = match result {
                    Ok(message) => TransmissionResult::Success(message),
                    Err(error) => {
                        log::warn!("send failed: {}", error);
                        TransmissionResult::Failure(error)
                    }
                };
                Task::none()
            }

            Message::Download => {
                self.download_image();
                Task::none()
            }

            Message::CloseImage => {
                self.capture.clear();
                self.still = None;
                self.result = TransmissionResult::Idle;
                if self.camera.is_none() && !self.camera_failed {
                    self.camera = Some(CameraFeed::start(self.config.width, self.config.height));
                    self.status = "Restarting camera...".to_string();
                }
                Task::none()
            }
        }
    }

    /// Pull the latest frame and any failure out of the capture thread.
    fn poll_camera(&mut self) {
        let Some(feed) = &self.camera else {
            return;
        };

        if let Some(failure) = feed.take_failure() {
            log::error!("camera unavailable: {}", failure);
            self.status = "Camera unavailable".to_string();
            self.camera_failed = true;
            // Dropping the handle joins the capture thread
            self.camera = None;
            self.live = None;
            self.viewfinder = None;
            return;
        }

        if let Some(frame) = feed.latest_frame() {
            if self.live.is_none() {
                self.status = format!("Camera ready at {} \u{00D7} {}", frame.width, frame.height);
            }
            self.viewfinder = Some(Handle::from_rgba(
                frame.width,
                frame.height,
                frame.rgba.clone(),
            ));
            self.live = Some(frame);
        }
    }

    /// Make a newly captured, loaded, or transcoded still the current image.
    fn install_image(&mut self, image: CapturedImage) {
        match image.url.decode() {
            Ok(bytes) => self.still = Some(Handle::from_bytes(bytes)),
            Err(error) => {
                log::error!("still preview decode failed: {}", error);
                self.still = None;
            }
        }
        self.capture.image = Some(image);
    }

    /// Save the current still's decoded bytes through the native dialog.
    fn download_image(&mut self) {
        let Some(image) = &self.capture.image else {
            return;
        };

        let extension = upload::extension_for_mime(image.url.mime());
        let default_name = format!(
            "capture-{}.{}",
            chrono::Local::now().format("%Y%m%d-%H%M%S"),
            extension
        );

        let mut dialog = FileDialog::new().set_file_name(&default_name);
        if let Some(downloads) = dirs::download_dir() {
            dialog = dialog.set_directory(downloads);
        }

        let Some(path) = dialog.save_file() else {
            return;
        };

        match image.url.decode().map(|bytes| std::fs::write(&path, bytes)) {
            Ok(Ok(())) => {
                self.status = format!("Saved to {}", path.display());
            }
            Ok(Err(error)) => {
                log::error!("save failed: {}", error);
                self.status = format!("Save failed: {}", error);
            }
            Err(error) => {
                log::error!("save failed: {}", error);
                self.status = format!("Save failed: {}", error);
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let left = column![
            text("Face Capture").size(26),
            ui::preview::capture_pane(self),
            ui::controls::action_row(self),
            ui::preview::result_panel(self),
        ]
        .spacing(12)
        .width(Length::FillPortion(3));

        let right = column![
            ui::controls::settings_panel(self),
            ui::preview::request_preview(self),
        ]
        .spacing(16)
        .width(Length::FillPortion(2));

        container(row![left, right].spacing(24))
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(24)
            .into()
    }

    /// Poll the capture thread only while a camera is active
    fn subscription(&self) -> Subscription<Message> {
        if self.camera.is_some() {
            iced::time::every(VIEWFINDER_INTERVAL).map(|_| Message::Tick)
        } else {
            Subscription::none()
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    env_logger::init();

    iced::application("Face Capture", FaceCapture::update, FaceCapture::view)
        .subscription(FaceCapture::subscription)
        .theme(FaceCapture::theme)
        .window_size((1080.0, 680.0))
        .centered()
        .run_with(FaceCapture::new)
}
