//! Adapter implementations for the notifier port.

mod http;
mod recording;

pub use http::HttpNotifier;
pub use recording::RecordingNotifier;
