//! Remote service - IRCC remote control button presses

use crate::client::BraviaClient;
use crate::error::Result;

// Default button codes specified by Sony. Device-specific codes are
// available from System::get_remote_control_info.
/// A remote control button understood by the IRCC interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonCode {
    /// Power on/off
    Power,
    /// Change input source
    Input,
    /// Open the Bravia Sync menu
    SyncMenu,
    /// Switch to HDMI 1 source
    Hdmi1,
    /// Switch to HDMI 2 source
    Hdmi2,
    /// Switch to HDMI 3 source
    Hdmi3,
    /// Switch to HDMI 4 source
    Hdmi4,
    /// '1' key
    Num1,
    /// '2' key
    Num2,
    /// '3' key
    Num3,
    /// '4' key
    Num4,
    /// '5' key
    Num5,
    /// '6' key
    Num6,
    /// '7' key
    Num7,
    /// '8' key
    Num8,
    /// '9' key
    Num9,
    /// '0' key
    Num0,
    /// '.' or '-' key used for tuner subchannels
    Dot,
    /// Set closed captioning mode
    Caption,
    /// Red favorite key
    Red,
    /// Green favorite key
    Green,
    /// Yellow favorite key
    Yellow,
    /// Blue favorite key
    Blue,
    /// Up directional key
    Up,
    /// Down directional key
    Down,
    /// Right directional key
    Right,
    /// Left directional key
    Left,
    /// Confirm/OK key
    Confirm,
    /// Open system help
    Help,
    /// Open display options
    Display,
    /// Open the options menu (Action Menu)
    Options,
    /// Return to the previous screen
    Back,
    /// Go to the home screen
    Home,
    /// Increase volume by one unit
    VolumeUp,
    /// Decrease volume by one unit
    VolumeDown,
    /// Mute audio
    Mute,
    /// Switch audio mode
    Audio,
    /// Go to the next TV channel
    ChannelUp,
    /// Go to the previous TV channel
    ChannelDown,
    /// Play content
    Play,
    /// Pause content
    Pause,
    /// Stop content
    Stop,
    /// Fast forward
    FlashPlus,
    /// Rewind
    FlashMinus,
    /// Go to the previous track
    Prev,
    /// Go to the next track
    Next,
}

impl ButtonCode {
    /// The IRCC code sent over the wire for this button
    pub fn code(&self) -> &'static str {
        match self {
            ButtonCode::Power => "AAAAAQAAAAEAAAAVAw==",
            ButtonCode::Input => "AAAAAQAAAAEAAAAlAw==",
            ButtonCode::SyncMenu => "AAAAAgAAABoAAABYAw==",
            ButtonCode::Hdmi1 => "AAAAAgAAABoAAABaAw==",
            ButtonCode::Hdmi2 => "AAAAAgAAABoAAABbAw==",
            ButtonCode::Hdmi3 => "AAAAAgAAABoAAABcAw==",
            ButtonCode::Hdmi4 => "AAAAAgAAABoAAABdAw==",
            ButtonCode::Num1 => "AAAAAQAAAAEAAAAAAw==",
            ButtonCode::Num2 => "AAAAAQAAAAEAAAABAw==",
            ButtonCode::Num3 => "AAAAAQAAAAEAAAACAw==",
            ButtonCode::Num4 => "AAAAAQAAAAEAAAADAw==",
            ButtonCode::Num5 => "AAAAAQAAAAEAAAAEAw==",
            ButtonCode::Num6 => "AAAAAQAAAAEAAAAFAw==",
            ButtonCode::Num7 => "AAAAAQAAAAEAAAAGAw==",
            ButtonCode::Num8 => "AAAAAQAAAAEAAAAHAw==",
            ButtonCode::Num9 => "AAAAAQAAAAEAAAAIAw==",
            ButtonCode::Num0 => "AAAAAQAAAAEAAAAJAw==",
            ButtonCode::Dot => "AAAAAgAAAJcAAAAdAw==",
            ButtonCode::Caption => "AAAAAgAAAJcAAAAoAw==",
            ButtonCode::Red => "AAAAAgAAAJcAAAAlAw==",
            ButtonCode::Green => "AAAAAgAAAJcAAAAmAw==",
            ButtonCode::Yellow => "AAAAAgAAAJcAAAAnAw==",
            ButtonCode::Blue => "AAAAAgAAAJcAAAAkAw==",
            ButtonCode::Up => "AAAAAQAAAAEAAAB0Aw==",
            ButtonCode::Down => "AAAAAQAAAAEAAAB1Aw==",
            ButtonCode::Right => "AAAAAQAAAAEAAAAzAw==",
            ButtonCode::Left => "AAAAAQAAAAEAAAA0Aw==",
            ButtonCode::Confirm => "AAAAAQAAAAEAAABlAw==",
            ButtonCode::Help => "AAAAAgAAAMQAAABNAw==",
            ButtonCode::Display => "AAAAAQAAAAEAAAA6Aw==",
            ButtonCode::Options => "AAAAAgAAAJcAAAA2Aw==",
            ButtonCode::Back => "AAAAAgAAAJcAAAAjAw==",
            ButtonCode::Home => "AAAAAQAAAAEAAABgAw==",
            ButtonCode::VolumeUp => "AAAAAQAAAAEAAAASAw==",
            ButtonCode::VolumeDown => "AAAAAQAAAAEAAAATAw==",
            ButtonCode::Mute => "AAAAAQAAAAEAAAAUAw==",
            ButtonCode::Audio => "AAAAAQAAAAEAAAAXAw==",
            ButtonCode::ChannelUp => "AAAAAQAAAAEAAAAQAw==",
            ButtonCode::ChannelDown => "AAAAAQAAAAEAAAARAw==",
            ButtonCode::Play => "AAAAAgAAAJcAAAAaAw==",
            ButtonCode::Pause => "AAAAAgAAAJcAAAAZAw==",
            ButtonCode::Stop => "AAAAAgAAAJcAAAAYAw==",
            ButtonCode::FlashPlus => "AAAAAgAAAJcAAAB4Aw==",
            ButtonCode::FlashMinus => "AAAAAgAAAJcAAAB5Aw==",
            ButtonCode::Prev => "AAAAAgAAAJcAAAA8Aw==",
            ButtonCode::Next => "AAAAAgAAAJcAAAA9Aw==",
        }
    }
}

/// Provides remote control functionality for the display
pub struct Remote<'a> {
    client: &'a BraviaClient,
}

impl<'a> Remote<'a> {
    pub(crate) fn new(client: &'a BraviaClient) -> Self {
        Self { client }
    }

    /// Send a remote control button press to the display
    pub fn send_button(&self, button: ButtonCode) -> Result<()> {
        self.send_code(button.code())
    }

    /// Send a raw IRCC code to the display
    ///
    /// Device-specific codes beyond the [`ButtonCode`] defaults come from
    /// [`System::get_remote_control_info`](crate::System::get_remote_control_info).
    pub fn send_code(&self, code: &str) -> Result<()> {
        self.client.send_ircc(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ButtonCode::Power, "AAAAAQAAAAEAAAAVAw==")]
    #[case(ButtonCode::Num5, "AAAAAQAAAAEAAAAEAw==")]
    #[case(ButtonCode::Home, "AAAAAQAAAAEAAABgAw==")]
    #[case(ButtonCode::Next, "AAAAAgAAAJcAAAA9Aw==")]
    fn test_button_ircc_codes(#[case] button: ButtonCode, #[case] code: &str) {
        assert_eq!(button.code(), code);
    }
}
