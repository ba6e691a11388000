//! System service - power, locale, network and device information

use crate::client::BraviaClient;
use crate::error::{Error, ErrorCode, Result};
use crate::service::Service;
use crate::services::required;
use crate::util::empty_string_as_none;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::{json, Value};

/// The mode of the LED indicator on the front of the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedMode {
    /// The LED is in demo mode
    Demo,
    /// The LED adjusts its brightness based on the ambient light
    AutoBrightness,
    /// The LED is dimmed
    Dark,
    /// The LED lights only when responding to a command
    SimpleResponse,
    /// The LED is disabled
    Off,
}

impl LedMode {
    pub(crate) fn as_api(&self) -> &'static str {
        match self {
            LedMode::Demo => "Demo",
            LedMode::AutoBrightness => "AutoBrightnessAdjust",
            LedMode::Dark => "Dark",
            LedMode::SimpleResponse => "SimpleResponse",
            LedMode::Off => "Off",
        }
    }

    pub(crate) fn from_api(value: &str) -> Option<Self> {
        match value {
            "Demo" => Some(LedMode::Demo),
            "AutoBrightnessAdjust" => Some(LedMode::AutoBrightness),
            "Dark" => Some(LedMode::Dark),
            "SimpleResponse" => Some(LedMode::SimpleResponse),
            "Off" => Some(LedMode::Off),
            _ => None,
        }
    }
}

/// The device's power saving mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerSavingMode {
    /// Power saving is disabled
    Off,
    /// Power saving mode is set to low
    Low,
    /// Power saving mode is set to high
    High,
    /// The display is disabled
    PictureOff,
}

impl PowerSavingMode {
    pub(crate) fn as_api(&self) -> &'static str {
        match self {
            PowerSavingMode::Off => "off",
            PowerSavingMode::Low => "low",
            PowerSavingMode::High => "high",
            PowerSavingMode::PictureOff => "pictureOff",
        }
    }

    pub(crate) fn from_api(value: &str) -> Option<Self> {
        match value {
            "off" => Some(PowerSavingMode::Off),
            "low" => Some(PowerSavingMode::Low),
            "high" => Some(PowerSavingMode::High),
            "pictureOff" => Some(PowerSavingMode::PictureOff),
            _ => None,
        }
    }
}

/// Information about the API server on the device
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceInformation {
    /// The device's category name
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub product_category: Option<String>,
    /// The product name of the device
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub product_name: Option<String>,
    /// The model of the device
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub model_name: Option<String>,
    /// The name of the server, if the device supports multiple
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub server_name: Option<String>,
    /// The API version, as an `X.Y.Z` triple
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub interface_version: Option<String>,
}

/// Information about the device itself
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SystemInformation {
    /// The product name
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub product: Option<String>,
    /// The configured UI language
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub language: Option<String>,
    /// The device model
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub model: Option<String>,
    /// The serial number of the device
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub serial: Option<String>,
    /// The device's MAC address
    #[serde(default, deserialize_with = "empty_string_as_none", rename = "macAddr")]
    pub mac: Option<String>,
    /// The name of the device
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub name: Option<String>,
    /// The device's generation, as an `X.Y.Z` triple
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub generation: Option<String>,
}

/// Network configuration of one device interface
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkInterface {
    /// The name of the interface
    #[serde(default, deserialize_with = "empty_string_as_none", rename = "netif")]
    pub name: Option<String>,
    /// The MAC address of the interface
    #[serde(default, deserialize_with = "empty_string_as_none", rename = "hwAddr")]
    pub mac: Option<String>,
    /// The IPv4 address of the interface, if available
    #[serde(default, deserialize_with = "empty_string_as_none", rename = "ipAddrV4")]
    pub ip_v4: Option<String>,
    /// The IPv6 address of the interface, if available
    #[serde(default, deserialize_with = "empty_string_as_none", rename = "ipAddrV6")]
    pub ip_v6: Option<String>,
    /// The network mask for the interface
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub netmask: Option<String>,
    /// The configured gateway address for the interface
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub gateway: Option<String>,
    /// DNS servers configured on the interface
    #[serde(default, rename = "dns")]
    pub dns_servers: Vec<String>,
}

/// State of the device's LED indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedStatus {
    /// Whether the LED is enabled, if the device knows
    pub status: Option<bool>,
    /// Which LED mode the device is currently using
    pub mode: Option<LedMode>,
}

/// An IRCC remote code supported by the device
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteCode {
    /// The button name
    pub name: String,
    /// The base64 IRCC payload for the button
    pub value: String,
}

#[derive(Debug, Deserialize)]
struct PowerStatusPayload {
    status: String,
}

#[derive(Debug, Deserialize)]
struct CurrentTimePayload {
    #[serde(rename = "dateTime")]
    date_time: String,
}

#[derive(Debug, Deserialize)]
struct LedStatusPayload {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    mode: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PowerSavingPayload {
    mode: String,
}

#[derive(Debug, Deserialize)]
struct RemoteDeviceSettingPayload {
    #[serde(default, rename = "currentValue")]
    current_value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SupportedFunctionPayload {
    option: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct WolModePayload {
    enabled: bool,
}

/// Provides system information and configuration functionality
pub struct System<'a> {
    client: &'a BraviaClient,
}

impl<'a> System<'a> {
    pub(crate) fn new(client: &'a BraviaClient) -> Self {
        Self { client }
    }

    /// Wake up the device
    pub fn power_on(&self) -> Result<()> {
        self.set_power_status(true)
    }

    /// Put the device into standby
    pub fn power_off(&self) -> Result<()> {
        self.set_power_status(false)
    }

    /// Wake or sleep the device
    pub fn set_power_status(&self, power_state: bool) -> Result<()> {
        self.client.request(
            Service::System,
            "setPowerStatus",
            Some(json!({ "status": power_state })),
            "1.0",
        )?;
        Ok(())
    }

    /// Return whether the device is awake (true) or in standby (false)
    pub fn get_power_status(&self) -> Result<bool> {
        let payload = required(
            self.client
                .request(Service::System, "getPowerStatus", None, "1.0")?,
            "getPowerStatus",
        )?;
        let payload: PowerStatusPayload = serde_json::from_value(payload)?;
        match payload.status.as_str() {
            "active" => Ok(true),
            "standby" => Ok(false),
            other => Err(Error::UnexpectedResponse(format!(
                "unexpected getPowerStatus response '{}'",
                other
            ))),
        }
    }

    /// Get the current system time
    ///
    /// Returns `None` if the device's clock is not set.
    pub fn get_current_time(&self) -> Result<Option<DateTime<FixedOffset>>> {
        let response = match self
            .client
            .request(Service::System, "getCurrentTime", None, "1.1")
        {
            // Illegal state indicates that the system clock is not set
            Err(e) if e.code() == Some(ErrorCode::IllegalState) => return Ok(None),
            other => required(other?, "getCurrentTime")?,
        };
        let payload: CurrentTimePayload = serde_json::from_value(response)?;
        // The device reports offsets both with and without a colon
        let parsed = DateTime::parse_from_rfc3339(&payload.date_time)
            .or_else(|_| DateTime::parse_from_str(&payload.date_time, "%Y-%m-%dT%H:%M:%S%z"))
            .map_err(|_| {
                Error::UnexpectedResponse(format!(
                    "unparseable dateTime '{}'",
                    payload.date_time
                ))
            })?;
        Ok(Some(parsed))
    }

    /// Return information about the API server on the device
    ///
    /// This call skips the client's compatibility gate: it is the probe the
    /// gate itself relies on.
    pub fn get_interface_information(&self) -> Result<InterfaceInformation> {
        let payload = required(
            self.client
                .request_unchecked(Service::System, "getInterfaceInformation", None, "1.0")?,
            "getInterfaceInformation",
        )?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Return the current mode of the device's LED and whether it is enabled
    ///
    /// Returns `None` if the LED state cannot be determined.
    pub fn get_led_status(&self) -> Result<Option<LedStatus>> {
        let response = match self
            .client
            .request(Service::System, "getLEDIndicatorStatus", None, "1.0")
        {
            Err(e) if e.code() == Some(ErrorCode::IllegalState) => return Ok(None),
            other => required(other?, "getLEDIndicatorStatus")?,
        };
        let payload: LedStatusPayload = serde_json::from_value(response)?;

        // The device reports the LED status as a string, or omits it when unknown
        let status = match payload.status.as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        };
        let mode = match payload.mode.as_deref() {
            Some(raw) => Some(LedMode::from_api(raw).ok_or_else(|| {
                Error::UnexpectedResponse(format!("API returned unexpected LED mode '{}'", raw))
            })?),
            None => None,
        };

        Ok(Some(LedStatus { status, mode }))
    }

    /// Return the network configuration of every interface on the device
    pub fn get_network_settings(&self) -> Result<Vec<NetworkInterface>> {
        Ok(self.network_settings("")?.unwrap_or_default())
    }

    /// Return the network configuration of a single interface
    ///
    /// Returns `None` if the device has no interface with the given name.
    pub fn get_network_interface(&self, interface: &str) -> Result<Option<NetworkInterface>> {
        Ok(self
            .network_settings(interface)?
            .and_then(|interfaces| interfaces.into_iter().next()))
    }

    fn network_settings(&self, interface: &str) -> Result<Option<Vec<NetworkInterface>>> {
        let response = match self.client.request(
            Service::System,
            "getNetworkSettings",
            Some(json!({ "netif": interface })),
            "1.0",
        ) {
            // An illegal argument error indicates the requested interface does not exist
            Err(e) if e.code() == Some(ErrorCode::IllegalArgument) => return Ok(None),
            other => required(other?, "getNetworkSettings")?,
        };
        Ok(Some(serde_json::from_value(response)?))
    }

    /// Return the current power saving mode of the device
    pub fn get_power_saving_mode(&self) -> Result<PowerSavingMode> {
        let payload = required(
            self.client
                .request(Service::System, "getPowerSavingMode", None, "1.0")?,
            "getPowerSavingMode",
        )?;
        let payload: PowerSavingPayload = serde_json::from_value(payload)?;
        PowerSavingMode::from_api(&payload.mode).ok_or_else(|| {
            Error::UnexpectedResponse(format!(
                "API returned unexpected power saving mode '{}'",
                payload.mode
            ))
        })
    }

    /// Return the IRCC remote codes supported by the device
    pub fn get_remote_control_info(&self) -> Result<Vec<RemoteCode>> {
        let payload = required(
            self.client
                .request(Service::System, "getRemoteControllerInfo", None, "1.0")?,
            "getRemoteControllerInfo",
        )?;
        // Two-element result: bounds information followed by the code list
        let (_, codes): (Value, Vec<RemoteCode>) = serde_json::from_value(payload)?;
        Ok(codes)
    }

    /// Return whether remote access is enabled on the device
    pub fn get_remote_access_status(&self) -> Result<bool> {
        let payload = required(
            self.client.request(
                Service::System,
                "getRemoteDeviceSettings",
                Some(json!({ "target": "accessPermission" })),
                "1.0",
            )?,
            "getRemoteDeviceSettings",
        )?;
        let settings: Vec<RemoteDeviceSettingPayload> = serde_json::from_value(payload)?;
        if settings.len() != 1 {
            return Err(Error::UnexpectedResponse(
                "unexpected getRemoteDeviceSettings response format".to_string(),
            ));
        }
        match settings[0].current_value.as_deref() {
            Some("on") => Ok(true),
            Some("off") => Ok(false),
            other => Err(Error::UnexpectedResponse(format!(
                "unexpected getRemoteDeviceSettings value {:?}",
                other
            ))),
        }
    }

    /// Return information about the device
    pub fn get_system_information(&self) -> Result<SystemInformation> {
        let payload = required(
            self.client
                .request(Service::System, "getSystemInformation", None, "1.0")?,
            "getSystemInformation",
        )?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Return the Wake-on-LAN MAC address for the device, if available
    pub fn get_wake_on_lan_mac(&self) -> Result<Option<String>> {
        let payload = required(
            self.client
                .request(Service::System, "getSystemSupportedFunction", None, "1.0")?,
            "getSystemSupportedFunction",
        )?;
        let functions: Vec<SupportedFunctionPayload> = serde_json::from_value(payload)?;
        Ok(functions
            .into_iter()
            .find(|function| function.option == "WOL")
            .map(|function| function.value))
    }

    /// Return whether Wake-on-LAN is enabled on the device
    pub fn get_wake_on_lan_status(&self) -> Result<bool> {
        let payload = required(
            self.client
                .request(Service::System, "getWolMode", None, "1.0")?,
            "getWolMode",
        )?;
        let payload: WolModePayload = serde_json::from_value(payload)?;
        Ok(payload.enabled)
    }

    /// Reboot the device
    pub fn request_reboot(&self) -> Result<()> {
        self.client
            .request(Service::System, "requestReboot", None, "1.0")?;
        Ok(())
    }

    /// Set the LED mode of the device
    pub fn set_led_status(&self, mode: LedMode) -> Result<()> {
        self.client.request(
            Service::System,
            "setLEDIndicatorStatus",
            Some(json!({ "mode": mode.as_api() })),
            "1.1",
        )?;
        Ok(())
    }

    /// Set the UI language of the device
    ///
    /// Takes an ISO-639-3 language code. Availability depends on the
    /// device's region settings.
    ///
    /// # Errors
    /// Returns `Error::LanguageNotSupported` if the device rejects the
    /// language.
    pub fn set_language(&self, language: &str) -> Result<()> {
        match self.client.request(
            Service::System,
            "setLanguage",
            Some(json!({ "language": language })),
            "1.0",
        ) {
            Err(e) if e.code() == Some(ErrorCode::IllegalArgument) => {
                Err(Error::LanguageNotSupported)
            }
            other => {
                other?;
                Ok(())
            }
        }
    }

    /// Set the power saving mode of the device
    pub fn set_power_saving_mode(&self, mode: PowerSavingMode) -> Result<()> {
        self.client.request(
            Service::System,
            "setPowerSavingMode",
            Some(json!({ "mode": mode.as_api() })),
            "1.0",
        )?;
        Ok(())
    }

    /// Enable or disable Wake-on-LAN on the device
    pub fn set_wake_on_lan_status(&self, enabled: bool) -> Result<()> {
        self.client.request(
            Service::System,
            "setWolMode",
            Some(json!({ "enabled": enabled })),
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
    #[case(LedMode::Demo, "Demo")]
    #[case(LedMode::AutoBrightness, "AutoBrightnessAdjust")]
    #[case(LedMode::Dark, "Dark")]
    #[case(LedMode::SimpleResponse, "SimpleResponse")]
    #[case(LedMode::Off, "Off")]
    fn test_led_mode_wire_names(#[case] mode: LedMode, #[case] wire: &str) {
        assert_eq!(mode.as_api(), wire);
        assert_eq!(LedMode::from_api(wire), Some(mode));
    }

    #[rstest]
    #[case(PowerSavingMode::Off, "off")]
    #[case(PowerSavingMode::Low, "low")]
    #[case(PowerSavingMode::High, "high")]
    #[case(PowerSavingMode::PictureOff, "pictureOff")]
    fn test_power_saving_mode_wire_names(#[case] mode: PowerSavingMode, #[case] wire: &str) {
        assert_eq!(mode.as_api(), wire);
        assert_eq!(PowerSavingMode::from_api(wire), Some(mode));
    }

    #[test]
    fn test_unknown_wire_names_are_rejected() {
        assert_eq!(LedMode::from_api("Blinking"), None);
        assert_eq!(PowerSavingMode::from_api("medium"), None);
    }

    #[test]
    fn test_interface_information_deserialization() {
        let info: InterfaceInformation = serde_json::from_value(serde_json::json!({
            "productCategory": "tv",
            "productName": "BRAVIA",
            "modelName": "FW-55BZ35F",
            "serverName": "",
            "interfaceVersion": "3.10.0"
        }))
        .unwrap();

        assert_eq!(info.product_category.as_deref(), Some("tv"));
        assert_eq!(info.model_name.as_deref(), Some("FW-55BZ35F"));
        assert_eq!(info.server_name, None);
        assert_eq!(info.interface_version.as_deref(), Some("3.10.0"));
    }

    #[test]
    fn test_network_interface_deserialization() {
        let interfaces: Vec<NetworkInterface> = serde_json::from_value(serde_json::json!([{
            "netif": "eth0",
            "hwAddr": "00:04:1F:B5:88:A9",
            "ipAddrV4": "192.168.1.128",
            "ipAddrV6": "",
            "netmask": "255.255.255.0",
            "gateway": "192.168.1.1",
            "dns": ["192.168.1.1", "1.1.1.1"]
        }]))
        .unwrap();

        assert_eq!(interfaces.len(), 1);
        let eth0 = &interfaces[0];
        assert_eq!(eth0.name.as_deref(), Some("eth0"));
        assert_eq!(eth0.ip_v6, None);
        assert_eq!(eth0.dns_servers.len(), 2);
    }

    #[test]
    fn test_system_information_mac_rename() {
        let info: SystemInformation = serde_json::from_value(serde_json::json!({
            "product": "TV",
            "language": "eng",
            "model": "FW-55BZ35F",
            "serial": "1234567",
            "macAddr": "00:04:1F:B5:88:A9",
            "name": "BRAVIA",
            "generation": "3.1.0"
        }))
        .unwrap();

        assert_eq!(info.mac.as_deref(), Some("00:04:1F:B5:88:A9"));
        assert_eq!(info.generation.as_deref(), Some("3.1.0"));
    }

    #[test]
    fn test_remote_control_info_shape() {
        let payload = serde_json::json!([
            {"bank": 0, "type": "RM-J1100"},
            [
                {"name": "PowerOff", "value": "AAAAAQAAAAEAAAAvAw=="},
                {"name": "Input", "value": "AAAAAQAAAAEAAAAlAw=="}
            ]
        ]);
        let (_, codes): (Value, Vec<RemoteCode>) = serde_json::from_value(payload).unwrap();
        assert_eq!(codes.len(), 2);
        assert_eq!(codes[0].name, "PowerOff");
    }
}
