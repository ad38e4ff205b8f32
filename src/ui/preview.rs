/// Capture pane, result panel, and the live request preview

use iced::widget::{container, image, scrollable, text, Column};
use iced::{Element, Font, Length};
use serde_json::Value;

use crate::net::client;
use crate::state::capture::CapturedImage;
use crate::state::config::ImageConfig;
use crate::state::send::{SendConfig, SendMethod, TransmissionResult};
use crate::{FaceCapture, Message};

/// How much of the base64 payload the preview shows before eliding.
const PREVIEW_PAYLOAD_CHARS: usize = 72;

/// The viewfinder or the captured still, whichever is current.
pub fn capture_pane(app: &FaceCapture) -> Element<'_, Message> {
    let content: Element<'_, Message> = if let Some(handle) = &app.still {
        let caption = app
            .capture
            .image
            .as_ref()
            .map(|image| {
                format!(
                    "{} \u{00D7} {} ({})",
                    image.width,
                    image.height,
                    image.url.mime()
                )
            })
            .unwrap_or_default();
        Column::new()
            .push(image(handle.clone()).width(Length::Fill))
            .push(text(caption).size(14))
            .spacing(8)
            .into()
    } else if let Some(handle) = &app.viewfinder {
        Column::new()
            .push(image(handle.clone()).width(Length::Fill))
            .push(text("Live feed").size(14))
            .spacing(8)
            .into()
    } else if app.camera_failed {
        text("Camera unavailable").size(16).into()
    } else {
        text("Starting camera...").size(16).into()
    };

    container(content)
        .width(Length::Fill)
        .padding(4)
        .into()
}

/// Status line plus the outcome of the most recent send.
pub fn result_panel(app: &FaceCapture) -> Element<'_, Message> {
    let mut panel = Column::new()
        .push(text(app.status.as_str()).size(13))
        .spacing(4);

    panel = match &app.result {
        TransmissionResult::Idle => panel,
        TransmissionResult::Pending => {
            panel.push(text("Sending...").size(14).style(text::secondary))
        }
        TransmissionResult::Success(message) => {
            panel.push(text(message.as_str()).size(14).style(text::success))
        }
        TransmissionResult::Failure(message) => {
            panel.push(text(message.as_str()).size(14).style(text::danger))
        }
    };

    panel.into()
}

/// Live rendering of the outgoing request body.
pub fn request_preview(app: &FaceCapture) -> Element<'_, Message> {
    let rendered = match &app.capture.image {
        Some(captured) => body_preview(captured, &app.config, &app.send_config),
        None => "Capture or upload an image to preview the request body.".to_string(),
    };

    Column::new()
        .push(text("Request preview").size(18))
        .push(
            container(scrollable(
                text(rendered).size(12).font(Font::MONOSPACE),
            ))
            .height(Length::Fixed(190.0))
            .width(Length::Fill),
        )
        .spacing(8)
        .into()
}

/// The body as it will go over the wire, with the payload elided so the
/// panel stays readable.
fn body_preview(image: &CapturedImage, config: &ImageConfig, delivery: &SendConfig) -> String {
    match delivery.method {
        SendMethod::Json => {
            let mut body = client::json_body(image, config, delivery);
            if let Some(Value::String(url)) = body.get_mut(&delivery.field_name) {
                if url.len() > PREVIEW_PAYLOAD_CHARS {
                    // Base64 is ASCII, truncation cannot split a character
                    url.truncate(PREVIEW_PAYLOAD_CHARS);
                    url.push_str("...");
                }
            }
            serde_json::to_string_pretty(&body).unwrap_or_default()
        }
        SendMethod::Multipart => format!(
            "multipart/form-data\n{}: capture.{} ({}, {} bytes)\nwidth: {}\nheight: {}\nformat: {}\nquality: {:.2}",
            delivery.field_name,
            config.format.extension(),
            config.format.mime(),
            image.url.estimated_bytes(),
            config.width,
            config.height,
            config.format.as_str(),
            config.quality,
        ),
    }
}
