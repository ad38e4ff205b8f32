/// Settings panel and action buttons

use iced::widget::{
    horizontal_rule, pick_list, radio, row, slider, text, text_input, Column, Row, TextInput,
};
use iced::{Alignment, Element};

use crate::imaging::data_url::format_size;
use crate::state::config::{AspectRatio, OutputFormat};
use crate::state::send::{SendMethod, DEFAULT_ENDPOINT};
use crate::{FaceCapture, Message};

/// The right-hand settings column: output parameters and delivery settings.
pub fn settings_panel(app: &FaceCapture) -> Element<'_, Message> {
    let dimensions = row![
        text_input("width", &app.width_input)
            .on_input(Message::WidthChanged)
            .width(72),
        text("\u{00D7}").size(16),
        text_input("height", &app.height_input)
            .on_input(Message::HeightChanged)
            .width(72),
        pick_list(
            AspectRatio::ALL,
            Some(app.config.aspect),
            Message::AspectChanged
        )
        .width(96),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let encoding = row![
        pick_list(
            OutputFormat::ALL,
            Some(app.config.format),
            Message::FormatChanged
        )
        .width(96),
        slider(0.10..=1.00, app.config.quality, Message::QualityChanged).step(0.01),
        text(format!("{:.0}%", app.config.quality * 100.0)).size(14),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let method = row![
        radio(
            "JSON body",
            SendMethod::Json,
            Some(app.send_config.method),
            Message::MethodChanged
        ),
        radio(
            "Multipart",
            SendMethod::Multipart,
            Some(app.send_config.method),
            Message::MethodChanged
        ),
    ]
    .spacing(16);

    Column::new()
        .push(text("Output").size(18))
        .push(labeled(
            "Dimensions",
            dimensions.into(),
        ))
        .push(labeled("Format and quality", encoding.into()))
        .push_maybe(app.capture.image.as_ref().map(|image| {
            text(format!(
                "Estimated payload: {}",
                format_size(image.url.estimated_bytes())
            ))
            .size(14)
        }))
        .push(horizontal_rule(1))
        .push(text("Delivery").size(18))
        .push(method)
        .push(labeled(
            "Field name",
            text_field("image", &app.send_config.field_name, Message::FieldNameChanged),
        ))
        .push(labeled(
            "Endpoint",
            text_field(
                DEFAULT_ENDPOINT,
                &app.send_config.endpoint,
                Message::EndpointChanged,
            ),
        ))
        .spacing(12)
        .into()
}

/// The action row under the capture pane.
pub fn action_row(app: &FaceCapture) -> Element<'_, Message> {
    let can_capture = app.live.is_some() && !app.capture.loading;
    let has_image = app.capture.has_image();
    let transform_target = app
        .capture
        .image
        .as_ref()
        .filter(|image| !image.matches(app.config.width, app.config.height))
        .map(|_| (app.config.width, app.config.height));
    let can_send = has_image
        && !app.result.is_pending()
        && !app.send_config.endpoint.trim().is_empty();

    let send_label = if app.result.is_pending() {
        "Sending..."
    } else {
        "Send"
    };

    Row::new()
        .push(action("Capture", can_capture.then_some(Message::CaptureStill)))
        .push(action(
            "Upload...",
            (!app.capture.loading).then_some(Message::UploadImage),
        ))
        .push_maybe(transform_target.map(|(width, height)| {
            iced::widget::button(
                text(format!("Transform to {}\u{00D7}{}", width, height)).size(14),
            )
            .on_press_maybe((!app.capture.loading).then_some(Message::Transform))
            .padding(8)
        }))
        .push(action(send_label, can_send.then_some(Message::Send)))
        .push(action("Download", has_image.then_some(Message::Download)))
        .push(action("Close", has_image.then_some(Message::CloseImage)))
        .spacing(8)
        .into()
}

fn action(label: &str, on_press: Option<Message>) -> iced::widget::Button<'_, Message> {
    iced::widget::button(text(label).size(14))
        .on_press_maybe(on_press)
        .padding(8)
}

fn labeled<'a>(label: &'a str, content: Element<'a, Message>) -> Element<'a, Message> {
    Column::new()
        .push(text(label).size(13))
        .push(content)
        .spacing(4)
        .into()
}

fn text_field<'a>(
    placeholder: &'a str,
    value: &'a str,
    on_input: fn(String) -> Message,
) -> Element<'a, Message> {
    TextInput::new(placeholder, value).on_input(on_input).into()
}
