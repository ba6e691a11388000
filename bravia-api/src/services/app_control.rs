//! AppControl service - application launching and text input

use crate::client::BraviaClient;
use crate::error::{Error, ErrorCode, Result};
use crate::service::Service;
use crate::services::required;
use crate::util::empty_string_as_none;
use serde::Deserialize;
use serde_json::json;

/// An application installed on the display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    /// The display name of the application
    pub name: Option<String>,
    /// The internal URI at which the application can be accessed, used when
    /// referring to the app from other functions
    pub uri: Option<String>,
    /// A network URL pointing to the application's icon image
    pub icon: Option<String>,
}

/// Features supported by the currently running application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppFeatureStatus {
    /// The application currently has a text input focused
    pub text_input: bool,
    /// The application currently has an interactive cursor
    pub cursor_display: bool,
    /// The application currently has a web browser displayed
    pub web_browse: bool,
}

/// State of the web application currently in use on the display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebAppStatus {
    /// Whether a web application is currently running
    pub active: bool,
    /// The URL of the running application, if any
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApplicationPayload {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    title: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    uri: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FeatureEntryPayload {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextFormPayload {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WebAppStatusPayload {
    #[serde(default)]
    active: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    url: Option<String>,
}

/// Provides functionality for interacting with applications on the display
pub struct AppControl<'a> {
    client: &'a BraviaClient,
}

impl<'a> AppControl<'a> {
    pub(crate) fn new(client: &'a BraviaClient) -> Self {
        Self { client }
    }

    /// Return the applications installed on the display
    ///
    /// When `exclude_builtin` is true, built-in Sony applications which are
    /// not exposed on the home screen are omitted.
    pub fn get_application_list(&self, exclude_builtin: bool) -> Result<Vec<Application>> {
        let response =
            self.client
                .request(Service::AppControl, "getApplicationList", None, "1.0")?;
        let Some(payload) = response else {
            return Ok(Vec::new());
        };
        let entries: Vec<ApplicationPayload> = serde_json::from_value(payload)?;

        let mut apps = Vec::new();
        for entry in entries {
            let app = Application {
                name: entry.title,
                uri: entry.uri,
                icon: entry.icon,
            };

            if exclude_builtin
                && app
                    .uri
                    .as_deref()
                    .is_some_and(|uri| uri.contains("com.sony.dtv.ceb"))
            {
                continue;
            }

            apps.push(app);
        }

        Ok(apps)
    }

    /// Return which features the currently running application supports
    ///
    /// Features the library does not recognize are skipped.
    pub fn get_application_feature_status(&self) -> Result<AppFeatureStatus> {
        let payload = required(
            self.client
                .request(Service::AppControl, "getApplicationStatusList", None, "1.0")?,
            "getApplicationStatusList",
        )?;
        let entries: Vec<FeatureEntryPayload> = serde_json::from_value(payload)?;

        let mut features = AppFeatureStatus::default();
        for entry in entries {
            let enabled = entry.status.as_deref() == Some("on");
            match entry.name.as_deref() {
                Some("textInput") => features.text_input = enabled,
                Some("cursorDisplay") => features.cursor_display = enabled,
                Some("webBrowse") => features.web_browse = enabled,
                _ => continue,
            }
        }

        Ok(features)
    }

    /// Decrypt and return the contents of the focused text field
    ///
    /// Returns `None` if no text field is currently focused.
    ///
    /// # Errors
    /// Returns `Error::Encryption` if the device cannot provide a valid
    /// encryption key, and `Error::Internal` if it rejects the key the
    /// library sent.
    pub fn get_text_form(&self) -> Result<Option<String>> {
        let encryption = self.client.encryption();
        let Some(encrypted_key) = encryption.rsa_encrypted_common_key()? else {
            return Err(Error::Encryption(
                "the device does not support the encryption needed to access text fields"
                    .to_string(),
            ));
        };

        let payload = match self.client.request(
            Service::AppControl,
            "getTextForm",
            Some(json!({ "encKey": encrypted_key })),
            "1.1",
        ) {
            // These errors likely indicate there is no focused text field
            Err(e)
                if e.code() == Some(ErrorCode::RequestDuplicated)
                    || e.code() == Some(ErrorCode::IllegalState) =>
            {
                return Ok(None)
            }
            Err(e) if e.code() == Some(ErrorCode::EncryptionFailed) => {
                return Err(Error::Internal(
                    "the device rejected the encryption key".to_string(),
                ))
            }
            other => required(other?, "getTextForm")?,
        };

        let form: TextFormPayload = serde_json::from_value(payload)?;
        let text = encryption.decrypt(&form.text)?;
        Ok(Some(text))
    }

    /// Return information about the web application currently in use
    pub fn get_web_app_status(&self) -> Result<WebAppStatus> {
        let payload = required(
            self.client
                .request(Service::AppControl, "getWebAppStatus", None, "1.0")?,
            "getWebAppStatus",
        )?;
        let status: WebAppStatusPayload = serde_json::from_value(payload)?;

        Ok(WebAppStatus {
            active: status.active.as_deref() == Some("true"),
            url: status.url,
        })
    }

    /// Open the specified app on the display
    ///
    /// App URIs come from
    /// [`get_application_list`](Self::get_application_list).
    ///
    /// # Errors
    /// Returns `Error::AppLaunch` if the app could not be opened.
    pub fn set_active_app(&self, uri: &str) -> Result<()> {
        match self.client.request(
            Service::AppControl,
            "setActiveApp",
            Some(json!({ "uri": uri })),
            "1.0",
        ) {
            Err(e) if e.code() == Some(ErrorCode::AnotherRequestInProgress) => Err(
                Error::AppLaunch("another app is currently in the process of launching".to_string()),
            ),
            Err(e) if e.code() == Some(ErrorCode::FailedToLaunch) => {
                Err(Error::AppLaunch("the app failed to launch".to_string()))
            }
            // The device reports this when the launch was accepted and is
            // still in progress, so it is a success
            Err(e) if e.code() == Some(ErrorCode::RequestInProgress) => Ok(()),
            other => {
                other?;
                Ok(())
            }
        }
    }

    /// Enter text into the focused text field on the display
    ///
    /// The text is encrypted before being sent to the device.
    ///
    /// # Errors
    /// Returns `Error::NoFocusedTextField` if no writable text field is
    /// focused, `Error::Encryption` if the device cannot provide a valid
    /// encryption key, and `Error::Internal` if it rejects the key the
    /// library sent.
    pub fn set_text_form(&self, text: &str) -> Result<()> {
        let encryption = self.client.encryption();
        let Some(encrypted_key) = encryption.rsa_encrypted_common_key()? else {
            return Err(Error::Encryption(
                "the device does not support the encryption needed to access text fields"
                    .to_string(),
            ));
        };

        let encrypted_text = encryption.encrypt(text);

        match self.client.request(
            Service::AppControl,
            "setTextForm",
            Some(json!({ "encKey": encrypted_key, "text": encrypted_text })),
            "1.1",
        ) {
            Err(e) if e.code() == Some(ErrorCode::IllegalState) => Err(Error::NoFocusedTextField),
            Err(e) if e.code() == Some(ErrorCode::EncryptionFailed) => Err(Error::Internal(
                "the device rejected the encryption key".to_string(),
            )),
            other => {
                other?;
                Ok(())
            }
        }
    }

    /// Ask the display to terminate all running applications
    ///
    /// Apps the device refuses to terminate are left running without error.
    pub fn terminate_all_apps(&self) -> Result<()> {
        match self
            .client
            .request(Service::AppControl, "terminateApps", None, "1.0")
        {
            // Some apps are not allowed to be terminated
            Err(e) if e.code() == Some(ErrorCode::FailedToTerminate) => Ok(()),
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

    #[test]
    fn test_application_payload_blanks_become_none() {
        let entry: ApplicationPayload = serde_json::from_value(json!({
            "title": "Netflix",
            "uri": "com.sony.dtv.com.netflix.ninja",
            "icon": ""
        }))
        .unwrap();

        assert_eq!(entry.title.as_deref(), Some("Netflix"));
        assert_eq!(entry.icon, None);
    }

    #[test]
    fn test_feature_entries_deserialization() {
        let entries: Vec<FeatureEntryPayload> = serde_json::from_value(json!([
            {"name": "textInput", "status": "on"},
            {"name": "cursorDisplay", "status": "off"},
            {"name": "frameFloat", "status": "on"}
        ]))
        .unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name.as_deref(), Some("textInput"));
        assert_eq!(entries[1].status.as_deref(), Some("off"));
    }

    #[test]
    fn test_web_app_status_payload() {
        let status: WebAppStatusPayload =
            serde_json::from_value(json!({"active": "true", "url": "https://example.com"}))
                .unwrap();
        assert_eq!(status.active.as_deref(), Some("true"));
        assert_eq!(status.url.as_deref(), Some("https://example.com"));

        let status: WebAppStatusPayload =
            serde_json::from_value(json!({"active": "false", "url": ""})).unwrap();
        assert_eq!(status.active.as_deref(), Some("false"));
        assert_eq!(status.url, None);
    }
}
