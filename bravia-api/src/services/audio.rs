//! Audio service - volume, mute and speaker configuration

use crate::client::BraviaClient;
use crate::error::{Error, ErrorCode, Result};
use crate::service::Service;
use crate::services::required;
use serde::Deserialize;
use serde_json::{json, Value};

/// The audio output device used by the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioOutput {
    /// An external speaker
    Speaker,
    /// An external HDMI-connected speaker
    SpeakerHdmi,
    /// HDMI audio output
    Hdmi,
    /// Internal speakers
    AudioSystem,
}

impl AudioOutput {
    pub(crate) fn as_api(&self) -> &'static str {
        match self {
            AudioOutput::Speaker => "speaker",
            AudioOutput::SpeakerHdmi => "speaker_hdmi",
            AudioOutput::Hdmi => "hdmi",
            AudioOutput::AudioSystem => "audioSystem",
        }
    }

    pub(crate) fn from_api(value: &str) -> Option<Self> {
        match value {
            "speaker" => Some(AudioOutput::Speaker),
            "speaker_hdmi" => Some(AudioOutput::SpeakerHdmi),
            "hdmi" => Some(AudioOutput::Hdmi),
            "audioSystem" => Some(AudioOutput::AudioSystem),
            _ => None,
        }
    }
}

/// The mounting position of the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TvPosition {
    /// The display is standing on a table
    TableTop,
    /// The display is mounted on a wall
    WallMount,
}

impl TvPosition {
    pub(crate) fn as_api(&self) -> &'static str {
        match self {
            TvPosition::TableTop => "tableTop",
            TvPosition::WallMount => "wallMount",
        }
    }

    pub(crate) fn from_api(value: &str) -> Option<Self> {
        match value {
            "tableTop" => Some(TvPosition::TableTop),
            "wallMount" => Some(TvPosition::WallMount),
            _ => None,
        }
    }
}

/// The phase polarity setting of the wireless subwoofer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubwooferPhase {
    /// The subwoofer is using normal polarity
    Normal,
    /// The subwoofer is using reverse polarity
    Reverse,
}

impl SubwooferPhase {
    pub(crate) fn as_api(&self) -> &'static str {
        match self {
            SubwooferPhase::Normal => "normal",
            SubwooferPhase::Reverse => "reverse",
        }
    }

    pub(crate) fn from_api(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(SubwooferPhase::Normal),
            "reverse" => Some(SubwooferPhase::Reverse),
            _ => None,
        }
    }
}

/// The output device that a volume level applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeDevice {
    /// The speaker output
    Speakers,
    /// The headphone output
    Headphones,
}

impl VolumeDevice {
    pub(crate) fn as_api(&self) -> &'static str {
        match self {
            VolumeDevice::Speakers => "speaker",
            VolumeDevice::Headphones => "headphone",
        }
    }

    pub(crate) fn from_api(value: &str) -> Option<Self> {
        match value {
            "speaker" => Some(VolumeDevice::Speakers),
            "headphone" => Some(VolumeDevice::Headphones),
            _ => None,
        }
    }
}

/// A volume adjustment to apply to an output device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeChange {
    /// Set the volume to an absolute level
    Absolute(u8),
    /// Raise the volume by the given number of units
    Up(u8),
    /// Lower the volume by the given number of units
    Down(u8),
}

impl VolumeChange {
    fn as_api(&self) -> String {
        match self {
            VolumeChange::Absolute(volume) => volume.to_string(),
            VolumeChange::Up(by) => format!("+{}", by),
            VolumeChange::Down(by) => format!("-{}", by),
        }
    }
}

/// Speaker configuration of the display
///
/// Used both when reading the current configuration and when applying
/// changes; fields left as `None` are not sent to the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeakerSettings {
    /// The physical location of the display
    pub tv_position: Option<TvPosition>,
    /// The configured volume of the subwoofer, generally 0 to 24
    pub subwoofer_level: Option<i32>,
    /// The frequency at which the subwoofer activates, generally 0 to 30
    pub subwoofer_frequency: Option<i32>,
    /// The phase setting of the subwoofer
    pub subwoofer_phase: Option<SubwooferPhase>,
    /// Whether the subwoofer is powered on
    pub subwoofer_power: Option<bool>,
}

/// Volume state of one audio output device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeInformation {
    /// The audio device this entry describes
    pub device: VolumeDevice,
    /// The current volume of the audio device
    pub volume: i32,
    /// Whether the audio device is muted
    pub muted: bool,
    /// The minimum volume setting for the audio device
    pub min_volume: i32,
    /// The maximum volume setting for the audio device
    pub max_volume: i32,
}

#[derive(Debug, Deserialize)]
struct SettingEntryPayload {
    #[serde(default)]
    target: Option<String>,
    #[serde(default, rename = "currentValue")]
    current_value: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct VolumeEntryPayload {
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    volume: i32,
    #[serde(default)]
    mute: bool,
    #[serde(default, rename = "minVolume")]
    min_volume: i32,
    #[serde(default, rename = "maxVolume")]
    max_volume: i32,
}

/// Extract an integer setting value, accepting both numeric and string forms
fn int_value(value: Option<&Value>) -> Option<i32> {
    let value = value?;
    value
        .as_i64()
        .map(|v| v as i32)
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

/// Provides functionality for controlling audio on the display
pub struct Audio<'a> {
    client: &'a BraviaClient,
}

impl<'a> Audio<'a> {
    pub(crate) fn new(client: &'a BraviaClient) -> Self {
        Self { client }
    }

    /// Return the current audio output device
    ///
    /// Returns `None` if the device does not expose an output terminal
    /// setting.
    pub fn get_output_device(&self) -> Result<Option<AudioOutput>> {
        let response = match self.client.request(
            Service::Audio,
            "getSoundSettings",
            Some(json!({ "target": "outputTerminal" })),
            "1.1",
        ) {
            Err(e) if e.code() == Some(ErrorCode::IllegalArgument) => return Ok(None),
            other => required(other?, "getSoundSettings")?,
        };
        let entries: Vec<SettingEntryPayload> = serde_json::from_value(response)?;
        if entries.len() != 1 {
            return Err(Error::UnexpectedResponse(
                "unexpected response format for getSoundSettings".to_string(),
            ));
        }
        let raw = entries[0]
            .current_value
            .as_ref()
            .and_then(Value::as_str)
            .unwrap_or_default();
        let output = AudioOutput::from_api(raw).ok_or_else(|| {
            Error::UnexpectedResponse(format!("API returned unexpected audio output '{}'", raw))
        })?;
        Ok(Some(output))
    }

    /// Set which audio output device the display should use
    pub fn set_output_device(&self, output_device: AudioOutput) -> Result<()> {
        match self.client.request(
            Service::Audio,
            "setSoundSettings",
            Some(json!({
                "settings": [{"target": "outputTerminal", "value": output_device.as_api()}]
            })),
            "1.1",
        ) {
            Err(e) if e.code() == Some(ErrorCode::MultipleSettingsFailed) => {
                Err(Error::Device {
                    code: ErrorCode::MultipleSettingsFailed,
                    message: "Unable to set the sound output device".to_string(),
                })
            }
            other => {
                other?;
                Ok(())
            }
        }
    }

    /// Return the current speaker configuration
    ///
    /// Settings the device does not provide are left as `None`.
    pub fn get_speaker_settings(&self) -> Result<SpeakerSettings> {
        let payload = required(
            self.client.request(
                Service::Audio,
                "getSpeakerSettings",
                Some(json!({ "target": "" })),
                "1.0",
            )?,
            "getSpeakerSettings",
        )?;
        let entries: Vec<SettingEntryPayload> = serde_json::from_value(payload)?;

        let mut settings = SpeakerSettings::default();
        for entry in entries {
            let value = entry.current_value;
            match entry.target.as_deref() {
                Some("tvPosition") => {
                    let raw = value.as_ref().and_then(Value::as_str).unwrap_or_default();
                    settings.tv_position = Some(TvPosition::from_api(raw).ok_or_else(|| {
                        Error::UnexpectedResponse(format!(
                            "API returned unexpected TV position '{}'",
                            raw
                        ))
                    })?);
                }
                Some("subwooferLevel") => settings.subwoofer_level = int_value(value.as_ref()),
                Some("subwooferFreq") => settings.subwoofer_frequency = int_value(value.as_ref()),
                Some("subwooferPhase") => {
                    let raw = value.as_ref().and_then(Value::as_str).unwrap_or_default();
                    settings.subwoofer_phase =
                        Some(SubwooferPhase::from_api(raw).ok_or_else(|| {
                            Error::UnexpectedResponse(format!(
                                "API returned unexpected subwoofer phase '{}'",
                                raw
                            ))
                        })?);
                }
                Some("subwooferPower") => {
                    settings.subwoofer_power =
                        Some(value.as_ref().and_then(Value::as_str) == Some("on"));
                }
                // Skip settings that are unrecognized
                _ => continue,
            }
        }

        Ok(settings)
    }

    /// Apply one or more speaker configuration changes
    ///
    /// # Errors
    /// Returns `Error::InvalidParameter` if every field of `settings` is
    /// `None`.
    pub fn set_speaker_settings(&self, settings: SpeakerSettings) -> Result<()> {
        let mut requested = Vec::new();

        if let Some(position) = settings.tv_position {
            requested.push(json!({"target": "tvPosition", "value": position.as_api()}));
        }
        if let Some(level) = settings.subwoofer_level {
            requested.push(json!({"target": "subwooferLevel", "value": level.to_string()}));
        }
        if let Some(frequency) = settings.subwoofer_frequency {
            requested.push(json!({"target": "subwooferFreq", "value": frequency.to_string()}));
        }
        if let Some(phase) = settings.subwoofer_phase {
            requested.push(json!({"target": "subwooferPhase", "value": phase.as_api()}));
        }
        if let Some(power) = settings.subwoofer_power {
            requested.push(json!({
                "target": "subwooferPower",
                "value": if power { "on" } else { "off" }
            }));
        }

        if requested.is_empty() {
            return Err(Error::InvalidParameter(
                "no speaker settings were specified".to_string(),
            ));
        }

        self.client.request(
            Service::Audio,
            "setSpeakerSettings",
            Some(json!({ "settings": requested })),
            "1.0",
        )?;
        Ok(())
    }

    /// Return the current volume information of each audio output device
    ///
    /// Devices of types the library does not recognize are skipped.
    pub fn get_volume_information(&self) -> Result<Vec<VolumeInformation>> {
        let payload = required(
            self.client
                .request(Service::Audio, "getVolumeInformation", None, "1.0")?,
            "getVolumeInformation",
        )?;
        let entries: Vec<VolumeEntryPayload> = serde_json::from_value(payload)?;

        let mut devices = Vec::new();
        for entry in entries {
            let Some(device) = entry.target.as_deref().and_then(VolumeDevice::from_api) else {
                continue;
            };
            devices.push(VolumeInformation {
                device,
                volume: entry.volume,
                muted: entry.mute,
                min_volume: entry.min_volume,
                max_volume: entry.max_volume,
            });
        }

        Ok(devices)
    }

    /// Mute the current audio output device
    pub fn mute(&self) -> Result<()> {
        self.set_mute(true)
    }

    /// Unmute the current audio output device
    pub fn unmute(&self) -> Result<()> {
        self.set_mute(false)
    }

    /// Mute or unmute the current audio output device
    pub fn set_mute(&self, mute: bool) -> Result<()> {
        self.client.request(
            Service::Audio,
            "setAudioMute",
            Some(json!({ "status": mute })),
            "1.0",
        )?;
        Ok(())
    }

    /// Set the volume level of all audio output devices
    ///
    /// Volume is generally on a scale from 0 to 100, but this may vary by
    /// device.
    pub fn set_volume_level(&self, volume: u8) -> Result<()> {
        self.set_volume(VolumeChange::Absolute(volume), true, None)
    }

    /// Raise the volume of all audio output devices by the given number of
    /// units
    pub fn increase_volume(&self, increase_by: u8) -> Result<()> {
        self.set_volume(VolumeChange::Up(increase_by), true, None)
    }

    /// Lower the volume of all audio output devices by the given number of
    /// units
    pub fn decrease_volume(&self, decrease_by: u8) -> Result<()> {
        self.set_volume(VolumeChange::Down(decrease_by), true, None)
    }

    /// Apply a volume change with full control over target and UI display
    ///
    /// A `device` of `None` affects all audio devices.
    ///
    /// # Errors
    /// Returns `Error::VolumeOutOfRange` if the requested level is outside
    /// the device's range, and `Error::TargetNotSupported` if the device
    /// cannot control the volume of the requested output.
    pub fn set_volume(
        &self,
        change: VolumeChange,
        show_ui: bool,
        device: Option<VolumeDevice>,
    ) -> Result<()> {
        let target = device.map(|device| device.as_api()).unwrap_or("");
        match self.client.request(
            Service::Audio,
            "setAudioVolume",
            Some(json!({
                "target": target,
                "volume": change.as_api(),
                "ui": if show_ui { "on" } else { "off" }
            })),
            "1.2",
        ) {
            Err(e) if e.code() == Some(ErrorCode::TargetNotSupported) => {
                Err(Error::TargetNotSupported)
            }
            Err(e) if e.code() == Some(ErrorCode::VolumeOutOfRange) => {
                Err(Error::VolumeOutOfRange)
            }
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
    #[case(AudioOutput::Speaker, "speaker")]
    #[case(AudioOutput::SpeakerHdmi, "speaker_hdmi")]
    #[case(AudioOutput::Hdmi, "hdmi")]
    #[case(AudioOutput::AudioSystem, "audioSystem")]
    fn test_audio_output_wire_names(#[case] output: AudioOutput, #[case] wire: &str) {
        assert_eq!(output.as_api(), wire);
        assert_eq!(AudioOutput::from_api(wire), Some(output));
    }

    #[rstest]
    #[case(VolumeChange::Absolute(20), "20")]
    #[case(VolumeChange::Up(1), "+1")]
    #[case(VolumeChange::Down(5), "-5")]
    fn test_volume_change_wire_format(#[case] change: VolumeChange, #[case] wire: &str) {
        assert_eq!(change.as_api(), wire);
    }

    #[test]
    fn test_int_value_accepts_numbers_and_strings() {
        assert_eq!(int_value(Some(&json!(12))), Some(12));
        assert_eq!(int_value(Some(&json!("-3"))), Some(-3));
        assert_eq!(int_value(Some(&json!("loud"))), None);
        assert_eq!(int_value(None), None);
    }

    #[test]
    fn test_volume_entry_deserialization() {
        let entries: Vec<VolumeEntryPayload> = serde_json::from_value(json!([
            {"target": "speaker", "volume": 25, "mute": false, "minVolume": 0, "maxVolume": 100},
            {"target": "headphone", "volume": 10, "mute": true, "minVolume": 0, "maxVolume": 100}
        ]))
        .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].target.as_deref(), Some("speaker"));
        assert!(entries[1].mute);
    }
}
