//! VideoScreen service - scene configuration

use crate::client::BraviaClient;
use crate::error::{Error, ErrorCode, Result};
use crate::service::Service;
use serde_json::json;

/// The scene mode of the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneMode {
    /// Automatically set the scene based on content
    Auto,
    /// Automatically select "Cinema" mode for 24Hz content, otherwise the
    /// same as `Auto`
    Auto24pSync,
    /// Turn off scene select
    General,
}

impl SceneMode {
    pub(crate) fn as_api(&self) -> &'static str {
        match self {
            SceneMode::Auto => "auto",
            SceneMode::Auto24pSync => "auto24pSync",
            SceneMode::General => "general",
        }
    }
}

/// Provides functionality for configuring the display's screen
pub struct VideoScreen<'a> {
    client: &'a BraviaClient,
}

impl<'a> VideoScreen<'a> {
    pub(crate) fn new(client: &'a BraviaClient) -> Self {
        Self { client }
    }

    /// Set the scene mode of the display
    ///
    /// # Errors
    /// Returns `Error::InvalidState` if the display is powered off or does
    /// not support the requested mode for the current input.
    pub fn set_scene_setting(&self, setting: SceneMode) -> Result<()> {
        match self.client.request(
            Service::VideoScreen,
            "setSceneSetting",
            Some(json!({ "value": setting.as_api() })),
            "1.0",
        ) {
            Err(e) if e.code() == Some(ErrorCode::IllegalArgument) => Err(Error::Internal(
                "the device rejected the scene value".to_string(),
            )),
            Err(e) if e.code() == Some(ErrorCode::IllegalState) => Err(Error::InvalidState(
                "the display is powered off or does not support this scene mode for the current input"
                    .to_string(),
            )),
            other => {
                other?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SceneMode::Auto, "auto")]
    #[case(SceneMode::Auto24pSync, "auto24pSync")]
    #[case(SceneMode::General, "general")]
    fn test_scene_mode_wire_names(#[case] mode: SceneMode, #[case] wire: &str) {
        assert_eq!(mode.as_api(), wire);
    }
}
