//! AvContent service - input selection and content playback

use crate::client::BraviaClient;
use crate::error::{Error, ErrorCode, Result};
use crate::service::Service;
use crate::services::required;
use crate::util::empty_string_as_none;
use serde::Deserialize;
use serde_json::{json, Value};

/// The icon type associated with an input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputIcon {
    /// The icon type was not recognized
    Unknown,
    /// Composite input
    Composite,
    /// S-Video input
    SVideo,
    /// Japanese D-terminal composite/component input
    CompositeComponentD,
    /// Japanese D-terminal component input
    ComponentD,
    /// Component (YPbPr) input
    Component,
    /// SCART RGB input
    Scart,
    /// HDMI input
    Hdmi,
    /// VGA D-sub input
    Vga,
    /// Coaxial TV tuner input
    Tuner,
    /// Tape input
    Tape,
    /// Disc input
    Disc,
    /// Complex input
    Complex,
    /// Audio amplifier input
    AvAmp,
    /// Home theater system input
    HomeTheater,
    /// Video game input
    Game,
    /// Camcorder input
    Camcorder,
    /// Digital camera input
    DigitalCamera,
    /// Computer input
    Pc,
    /// Television input
    Tv,
    /// Audio system input
    AudioSystem,
    /// Recorder device input
    RecordingDevice,
    /// Player device input
    PlaybackDevice,
    /// Television tuner device input
    TunerDevice,
    /// Wi-Fi display input
    WifiDisplay,
}

impl InputIcon {
    pub(crate) fn from_api(value: &str) -> Self {
        match value {
            "meta:composite" => InputIcon::Composite,
            "meta:svideo" => InputIcon::SVideo,
            "meta:composite_componentd" => InputIcon::CompositeComponentD,
            "meta:componentd" => InputIcon::ComponentD,
            "meta:component" => InputIcon::Component,
            "meta:scart" => InputIcon::Scart,
            "meta:hdmi" => InputIcon::Hdmi,
            "meta:dsub15" => InputIcon::Vga,
            "meta:tuner" => InputIcon::Tuner,
            "meta:tape" => InputIcon::Tape,
            "meta:disc" => InputIcon::Disc,
            "meta:complex" => InputIcon::Complex,
            "meta:avamp" => InputIcon::AvAmp,
            "meta:hometheater" => InputIcon::HomeTheater,
            "meta:game" => InputIcon::Game,
            "meta:camcorder" => InputIcon::Camcorder,
            "meta:digitalcamera" => InputIcon::DigitalCamera,
            "meta:pc" => InputIcon::Pc,
            "meta:tv" => InputIcon::Tv,
            "meta:audiosystem" => InputIcon::AudioSystem,
            "meta:recordingdevice" => InputIcon::RecordingDevice,
            "meta:playbackdevice" => InputIcon::PlaybackDevice,
            "meta:tunerdevice" => InputIcon::TunerDevice,
            "meta:wifidisplay" => InputIcon::WifiDisplay,
            _ => InputIcon::Unknown,
        }
    }
}

/// One item of playable content within a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    /// The position of the content in the list
    pub index: u32,
    /// The title of the content, if applicable
    pub name: Option<String>,
    /// The URI at which the content can be accessed, if applicable
    pub uri: Option<String>,
}

/// An external input of the display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalInput {
    /// The URI at which the input can be accessed, if applicable
    pub uri: Option<String>,
    /// The system title of the input, if applicable
    pub name: Option<String>,
    /// Whether a device is currently connected to the input
    pub connected: bool,
    /// The user-entered title of the input, if set
    pub custom_label: Option<String>,
    /// The icon for the input
    pub icon: InputIcon,
    /// Whether the input is currently sending a signal to the display
    pub has_signal: bool,
}

/// Information about the currently playing content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayingContent {
    /// The URI at which the content can be accessed, if applicable
    pub uri: Option<String>,
    /// The source that the content resides within, if applicable
    pub source: Option<String>,
    /// The title of the playing content, if applicable
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentCountPayload {
    count: u32,
}

#[derive(Debug, Deserialize)]
struct ContentEntryPayload {
    #[serde(default)]
    index: u32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    title: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SchemeEntryPayload {
    #[serde(default)]
    scheme: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SourceEntryPayload {
    #[serde(default)]
    source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExternalInputPayload {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    uri: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    title: Option<String>,
    #[serde(default)]
    connection: Option<Value>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    label: Option<String>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    status: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct PlayingContentPayload {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    uri: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    source: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    title: Option<String>,
}

/// Interpret a status field that devices encode as either a bool or a string
fn as_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        _ => false,
    }
}

/// Provides functionality for controlling what is played on the display
pub struct AvContent<'a> {
    client: &'a BraviaClient,
}

impl<'a> AvContent<'a> {
    pub(crate) fn new(client: &'a BraviaClient) -> Self {
        Self { client }
    }

    /// Return the number of available contents for a source URI
    ///
    /// Returns 0 if the source does not exist on the device.
    pub fn get_content_count(&self, source: &str) -> Result<u32> {
        if source.is_empty() {
            return Err(Error::InvalidParameter(
                "source must be a non-empty source URI".to_string(),
            ));
        }

        let response = match self.client.request(
            Service::AvContent,
            "getContentCount",
            Some(json!({ "source": source })),
            "1.1",
        ) {
            // An illegal argument likely means a source type that does not exist
            Err(e) if e.code() == Some(ErrorCode::IllegalArgument) => return Ok(0),
            other => required(other?, "getContentCount")?,
        };

        let payload: ContentCountPayload = serde_json::from_value(response)?;
        Ok(payload.count)
    }

    /// Return the available content for a source URI
    ///
    /// Returns `None` if the source does not exist or holds no content. The
    /// device pages this list, so several requests may be issued for large
    /// sources.
    pub fn get_content_list(&self, source: &str) -> Result<Option<Vec<Content>>> {
        if source.is_empty() {
            return Err(Error::InvalidParameter(
                "source must be a non-empty source URI".to_string(),
            ));
        }

        let count = self.get_content_count(source)?;
        if count == 0 {
            return Ok(None);
        }

        let mut content = Vec::new();
        let mut start = 0;
        while start < count {
            let response = match self.client.request(
                Service::AvContent,
                "getContentList",
                Some(json!({ "source": source, "stIdx": start, "cnt": 50 })),
                "1.2",
            ) {
                Err(e) if e.code() == Some(ErrorCode::IllegalArgument) => return Ok(None),
                other => required(other?, "getContentList")?,
            };

            let page: Vec<ContentEntryPayload> = serde_json::from_value(response)?;
            for entry in page {
                content.push(Content {
                    index: entry.index,
                    name: entry.title,
                    uri: entry.uri,
                });
            }

            start += 50;
        }

        Ok((!content.is_empty()).then_some(content))
    }

    /// Return the content schemes the display supports
    pub fn get_scheme_list(&self) -> Result<Vec<String>> {
        let payload = required(
            self.client
                .request(Service::AvContent, "getSchemeList", None, "1.0")?,
            "getSchemeList",
        )?;
        let entries: Vec<SchemeEntryPayload> = serde_json::from_value(payload)?;
        Ok(entries.into_iter().filter_map(|entry| entry.scheme).collect())
    }

    /// Return the source URIs available for a content scheme
    ///
    /// Returns `None` if the scheme is not supported by the device.
    pub fn get_source_list(&self, scheme: &str) -> Result<Option<Vec<String>>> {
        if scheme.is_empty() {
            return Err(Error::InvalidParameter(
                "scheme must be a non-empty string".to_string(),
            ));
        }

        let payload = match self.client.request(
            Service::AvContent,
            "getSourceList",
            Some(json!({ "scheme": scheme })),
            "1.0",
        ) {
            // An illegal argument likely means a scheme type that does not exist
            Err(e) if e.code() == Some(ErrorCode::IllegalArgument) => return Ok(None),
            other => required(other?, "getSourceList")?,
        };

        let entries: Vec<SourceEntryPayload> = serde_json::from_value(payload)?;
        Ok(Some(
            entries.into_iter().filter_map(|entry| entry.source).collect(),
        ))
    }

    /// Return the state of each external input of the display
    pub fn get_external_input_status(&self) -> Result<Vec<ExternalInput>> {
        let payload = required(
            self.client.request(
                Service::AvContent,
                "getCurrentExternalInputsStatus",
                None,
                "1.1",
            )?,
            "getCurrentExternalInputsStatus",
        )?;
        let entries: Vec<ExternalInputPayload> = serde_json::from_value(payload)?;

        let inputs = entries
            .into_iter()
            .map(|entry| ExternalInput {
                uri: entry.uri,
                name: entry.title,
                connected: as_flag(entry.connection.as_ref()),
                custom_label: entry.label,
                icon: InputIcon::from_api(entry.icon.as_deref().unwrap_or_default()),
                has_signal: as_flag(entry.status.as_ref()),
            })
            .collect();

        Ok(inputs)
    }

    /// Return information about the currently playing content
    ///
    /// Returns `None` when the display is off or the current content type
    /// does not report playback information.
    pub fn get_playing_content_info(&self) -> Result<Option<PlayingContent>> {
        let payload = match self
            .client
            .request(Service::AvContent, "getPlayingContentInfo", None, "1.0")
        {
            Err(e)
                if e.code() == Some(ErrorCode::DisplayOff)
                    || e.code() == Some(ErrorCode::IllegalState) =>
            {
                return Ok(None)
            }
            other => required(other?, "getPlayingContentInfo")?,
        };

        let content: PlayingContentPayload = serde_json::from_value(payload)?;
        Ok(Some(PlayingContent {
            uri: content.uri,
            source: content.source,
            name: content.title,
        }))
    }

    /// Activate the specified content on the display
    ///
    /// Content URIs come from [`get_content_list`](Self::get_content_list)
    /// or [`get_external_input_status`](Self::get_external_input_status).
    pub fn set_play_content(&self, uri: &str) -> Result<()> {
        if uri.is_empty() {
            return Err(Error::InvalidParameter(
                "uri must be a non-empty string".to_string(),
            ));
        }

        self.client.request(
            Service::AvContent,
            "setPlayContent",
            Some(json!({ "uri": uri })),
            "1.0",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("meta:hdmi", InputIcon::Hdmi)]
    #[case("meta:dsub15", InputIcon::Vga)]
    #[case("meta:composite_componentd", InputIcon::CompositeComponentD)]
    #[case("meta:wifidisplay", InputIcon::WifiDisplay)]
    #[case("meta:somethingelse", InputIcon::Unknown)]
    #[case("", InputIcon::Unknown)]
    fn test_input_icon_mapping(#[case] wire: &str, #[case] icon: InputIcon) {
        assert_eq!(InputIcon::from_api(wire), icon);
    }

    #[test]
    fn test_as_flag_accepts_bools_and_strings() {
        assert!(as_flag(Some(&json!(true))));
        assert!(as_flag(Some(&json!("true"))));
        assert!(!as_flag(Some(&json!(false))));
        assert!(!as_flag(Some(&json!("false"))));
        assert!(!as_flag(None));
    }

    #[test]
    fn test_content_entry_blanks_become_none() {
        let entry: ContentEntryPayload =
            serde_json::from_value(json!({"index": 3, "title": "", "uri": ""})).unwrap();

        assert_eq!(entry.index, 3);
        assert_eq!(entry.title, None);
        assert_eq!(entry.uri, None);
    }

    #[test]
    fn test_external_input_payload_deserialization() {
        let entries: Vec<ExternalInputPayload> = serde_json::from_value(json!([
            {
                "uri": "extInput:hdmi?port=2",
                "title": "HDMI 2",
                "connection": true,
                "label": "Blu-ray",
                "icon": "meta:hdmi",
                "status": "true"
            }
        ]))
        .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].uri.as_deref(), Some("extInput:hdmi?port=2"));
        assert!(as_flag(entries[0].connection.as_ref()));
        assert!(as_flag(entries[0].status.as_ref()));
    }
}
