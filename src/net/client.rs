/// Transmission client
///
/// Builds the request body in either delivery shape and issues a single
/// POST. A parsable JSON response surfaces its `message` field; anything
/// else that goes wrong becomes a failure string for the result panel.
/// No retries, no timeout, no cancellation.

use serde::Deserialize;
use serde_json::Value;

use crate::state::capture::CapturedImage;
use crate::state::config::ImageConfig;
use crate::state::send::{SendConfig, SendMethod};

/// Shown when the endpoint answers without a `message` field.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Verification complete";

/// Expected response shape; everything beyond `message` is tolerated.
#[derive(Debug, Deserialize)]
struct VerifyResponse {
    message: Option<String>,
}

/// JSON delivery body: the data URL under the configured field name plus
/// the four output settings. Exactly five keys.
pub fn json_body(image: &CapturedImage, config: &ImageConfig, delivery: &SendConfig) -> Value {
    let mut body = serde_json::Map::new();
    body.insert(
        delivery.field_name.clone(),
        Value::String(image.url.to_string()),
    );
    body.insert("width".to_string(), Value::from(config.width));
    body.insert("height".to_string(), Value::from(config.height));
    body.insert("format".to_string(), Value::from(config.format.as_str()));
    body.insert("quality".to_string(), Value::from(config.quality));
    Value::Object(body)
}

/// Multipart delivery body: decoded bytes as a file part under the field
/// name, settings as string fields. The boundary header is left to reqwest.
fn multipart_form(
    image: &CapturedImage,
    config: &ImageConfig,
    delivery: &SendConfig,
) -> Result<reqwest::multipart::Form, String> {
    let bytes = image
        .url
        .decode()
        .map_err(|e| format!("Corrupt image payload: {}", e))?;

    let part = reqwest::multipart::Part::bytes(bytes)
        .file_name(format!("capture.{}", config.format.extension()))
        .mime_str(config.format.mime())
        .map_err(|e| e.to_string())?;

    Ok(reqwest::multipart::Form::new()
        .part(delivery.field_name.clone(), part)
        .text("width", config.width.to_string())
        .text("height", config.height.to_string())
        .text("format", config.format.as_str())
        .text("quality", format!("{:.2}", config.quality)))
}

/// POST the current still to the configured endpoint.
///
/// Short-circuits locally (no network call) when there is no image or no
/// endpoint. Returns the message to show in the result panel.
pub async fn send(
    image: Option<CapturedImage>,
    config: ImageConfig,
    delivery: SendConfig,
) -> Result<String, String> {
    let image = image.ok_or_else(|| "No image to send".to_string())?;
    if delivery.endpoint.trim().is_empty() {
        return Err("No endpoint configured".to_string());
    }

    log::info!(
        "sending {}x{} {} as {:?} to {}",
        image.width,
        image.height,
        config.format.as_str(),
        delivery.method,
        delivery.endpoint
    );

    let client = reqwest::Client::new();
    let request = match delivery.method {
        SendMethod::Json => client
            .post(&delivery.endpoint)
            .json(&json_body(&image, &config, &delivery)),
        SendMethod::Multipart => client
            .post(&delivery.endpoint)
            .multipart(multipart_form(&image, &config, &delivery)?),
    };

    let response = request
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    let parsed: VerifyResponse = response
        .json()
        .await
        .map_err(|e| format!("Unexpected response: {}", e))?;

    Ok(parsed
        .message
        .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Frame;
    use crate::imaging::transcode::still_from_frame;
    use crate::state::config::OutputFormat;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn test_image() -> CapturedImage {
        let frame = Frame {
            width: 4,
            height: 4,
            rgba: vec![200; 64],
        };
        still_from_frame(&frame, OutputFormat::Jpeg, 0.92).unwrap()
    }

    /// One-shot HTTP responder on a random port; reads the full request,
    /// answers with the given JSON body, and closes.
    async fn spawn_one_shot(body: &'static str) -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let mut header_end = None;
            let mut content_length = 0usize;
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);

                if header_end.is_none() {
                    if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                        header_end = Some(pos + 4);
                        let headers = String::from_utf8_lossy(&buf[..pos]).to_string();
                        for line in headers.lines() {
                            if let Some((name, value)) = line.split_once(':') {
                                if name.eq_ignore_ascii_case("content-length") {
                                    content_length = value.trim().parse().unwrap_or(0);
                                }
                            }
                        }
                    }
                }
                if let Some(end) = header_end {
                    if buf.len() >= end + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        addr
    }

    #[test]
    fn json_body_has_exactly_five_keys() {
        let image = test_image();
        let config = ImageConfig::default();
        let delivery = SendConfig::default();

        let body = json_body(&image, &config, &delivery);
        let object = body.as_object().unwrap();

        assert_eq!(object.len(), 5);
        assert_eq!(
            object.get("image").and_then(Value::as_str),
            Some(image.url.to_string().as_str())
        );
        assert_eq!(object.get("width").and_then(Value::as_u64), Some(640));
        assert_eq!(object.get("height").and_then(Value::as_u64), Some(480));
        assert_eq!(object.get("format").and_then(Value::as_str), Some("jpeg"));
        assert!(object.get("quality").and_then(Value::as_f64).is_some());
    }

    #[test]
    fn json_body_honors_a_custom_field_name() {
        let image = test_image();
        let delivery = SendConfig {
            field_name: "face".to_string(),
            ..SendConfig::default()
        };

        let body = json_body(&image, &ImageConfig::default(), &delivery);
        assert!(body.get("face").is_some());
        assert!(body.get("image").is_none());
    }

    #[tokio::test]
    async fn sending_without_an_image_never_touches_the_network() {
        let delivery = SendConfig {
            // Nothing listens here; a short circuit must not care
            endpoint: "http://127.0.0.1:9/verify".to_string(),
            ..SendConfig::default()
        };

        let result = send(None, ImageConfig::default(), delivery).await;
        assert_eq!(result, Err("No image to send".to_string()));
    }

    #[tokio::test]
    async fn sending_with_an_empty_endpoint_short_circuits() {
        let delivery = SendConfig {
            endpoint: "  ".to_string(),
            ..SendConfig::default()
        };

        let result = send(Some(test_image()), ImageConfig::default(), delivery).await;
        assert_eq!(result, Err("No endpoint configured".to_string()));
    }

    #[tokio::test]
    async fn json_send_surfaces_the_response_message() {
        let addr = spawn_one_shot(r#"{"message":"ok"}"#).await;
        let delivery = SendConfig {
            endpoint: format!("http://{}/verify", addr),
            ..SendConfig::default()
        };

        let result = send(Some(test_image()), ImageConfig::default(), delivery).await;
        assert_eq!(result, Ok("ok".to_string()));
    }

    #[tokio::test]
    async fn multipart_send_surfaces_the_response_message() {
        let addr = spawn_one_shot(r#"{"message":"face matched"}"#).await;
        let delivery = SendConfig {
            method: SendMethod::Multipart,
            endpoint: format!("http://{}/verify", addr),
            ..SendConfig::default()
        };

        let result = send(Some(test_image()), ImageConfig::default(), delivery).await;
        assert_eq!(result, Ok("face matched".to_string()));
    }

    #[tokio::test]
    async fn response_without_a_message_falls_back_to_the_default() {
        let addr = spawn_one_shot(r#"{"match": true}"#).await;
        let delivery = SendConfig {
            endpoint: format!("http://{}/verify", addr),
            ..SendConfig::default()
        };

        let result = send(Some(test_image()), ImageConfig::default(), delivery).await;
        assert_eq!(result, Ok(DEFAULT_SUCCESS_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn non_json_response_is_a_failure() {
        let addr = spawn_one_shot("<html>teapot</html>").await;
        let delivery = SendConfig {
            endpoint: format!("http://{}/verify", addr),
            ..SendConfig::default()
        };

        let result = send(Some(test_image()), ImageConfig::default(), delivery).await;
        assert!(result.unwrap_err().starts_with("Unexpected response:"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_failure() {
        // Bind then drop to get a port with nothing listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let delivery = SendConfig {
            endpoint: format!("http://127.0.0.1:{}/verify", port),
            ..SendConfig::default()
        };

        let result = send(Some(test_image()), ImageConfig::default(), delivery).await;
        assert!(result.unwrap_err().starts_with("Request failed:"));
    }
}
