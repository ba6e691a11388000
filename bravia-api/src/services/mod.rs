//! Typed handles for the display's API service groups

pub mod app_control;
pub mod audio;
pub mod av_content;
pub mod encryption;
pub mod remote;
pub mod system;
pub mod video_screen;

use crate::{Error, Result};
use serde_json::Value;

/// Unwrap a response payload that an operation requires to be present
pub(crate) fn required(response: Option<Value>, method: &str) -> Result<Value> {
    response.ok_or_else(|| Error::UnexpectedResponse(format!("empty result for {}", method)))
}
