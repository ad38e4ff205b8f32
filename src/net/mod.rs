/// Network module
///
/// One responsibility: POST the current still plus its settings to the
/// configured verification endpoint and surface the response message.

pub mod client;
