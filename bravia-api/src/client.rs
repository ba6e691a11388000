use crate::services::encryption::CipherState;
use crate::services::{
    app_control::AppControl, audio::Audio, av_content::AvContent, encryption::Encryption,
    remote::Remote, system::System, video_screen::VideoScreen,
};
use crate::{Error, Result, Service};
use jsonrpc_client::RpcClient;
use serde_json::Value;
use std::sync::OnceLock;

/// A client for a single BRAVIA display
///
/// The client holds the connection parameters (host and pre-shared key) and
/// exposes one handle per device service. Constructing a client performs no
/// network I/O; compatibility with the device is verified lazily when the
/// first request is made.
///
/// # Example
/// ```no_run
/// use bravia_api::BraviaClient;
///
/// # fn main() -> bravia_api::Result<()> {
/// let client = BraviaClient::new("192.168.1.128", "0000")?;
///
/// if !client.system().get_power_status()? {
///     client.system().power_on()?;
/// }
/// client.audio().set_volume_level(20)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BraviaClient {
    rpc: RpcClient,
    cipher: CipherState,
    compat: OnceLock<()>,
}

impl BraviaClient {
    /// Create a client for the device at `host`, authenticating with the
    /// pre-shared key `passcode`
    ///
    /// The key is configured on the device under Settings, Network, Home
    /// network, IP control. No connection is attempted here; the first
    /// request verifies that the device speaks a supported API version.
    ///
    /// # Errors
    /// Returns `Error::InvalidParameter` if `host` or `passcode` is empty.
    pub fn new(host: impl Into<String>, passcode: impl Into<String>) -> Result<Self> {
        let host = host.into();
        let passcode = passcode.into();
        if host.is_empty() {
            return Err(Error::InvalidParameter("host must not be empty".to_string()));
        }
        if passcode.is_empty() {
            return Err(Error::InvalidParameter(
                "passcode must not be empty".to_string(),
            ));
        }
        Ok(Self::with_rpc_client(RpcClient::new(host, passcode)))
    }

    /// Create a client from a preconfigured transport (for advanced use
    /// cases such as custom timeouts)
    pub fn with_rpc_client(rpc: RpcClient) -> Self {
        Self {
            rpc,
            cipher: CipherState::generate(),
            compat: OnceLock::new(),
        }
    }

    /// System information and configuration
    pub fn system(&self) -> System<'_> {
        System::new(self)
    }

    /// Volume, mute and speaker configuration
    pub fn audio(&self) -> Audio<'_> {
        Audio::new(self)
    }

    /// Inputs, content listings and playback selection
    pub fn av_content(&self) -> AvContent<'_> {
        AvContent::new(self)
    }

    /// App listing, launching and text-form access
    pub fn app_control(&self) -> AppControl<'_> {
        AppControl::new(self)
    }

    /// Scene selection for the display
    pub fn video_screen(&self) -> VideoScreen<'_> {
        VideoScreen::new(self)
    }

    /// Remote-control button emulation
    pub fn remote(&self) -> Remote<'_> {
        Remote::new(self)
    }

    /// Encrypted text transfer support
    pub fn encryption(&self) -> Encryption<'_> {
        Encryption::new(self)
    }

    /// Send a request to a service, verifying device compatibility first
    pub(crate) fn request(
        &self,
        service: Service,
        method: &str,
        params: Option<Value>,
        version: &str,
    ) -> Result<Option<Value>> {
        self.ensure_compatible()?;
        self.request_unchecked(service, method, params, version)
    }

    /// Send a request without the compatibility gate
    ///
    /// Used by the interface-information query, which is itself the gate's
    /// probe.
    pub(crate) fn request_unchecked(
        &self,
        service: Service,
        method: &str,
        params: Option<Value>,
        version: &str,
    ) -> Result<Option<Value>> {
        Ok(self.rpc.call(service.endpoint(), method, params, version)?)
    }

    /// Send an IRCC remote code, verifying device compatibility first
    pub(crate) fn send_ircc(&self, remote_code: &str) -> Result<()> {
        self.ensure_compatible()?;
        Ok(self.rpc.send_ircc(remote_code)?)
    }

    /// The AES state backing encrypted text transfer
    pub(crate) fn cipher(&self) -> &CipherState {
        &self.cipher
    }

    /// Verify that the device is running a supported API version
    ///
    /// Runs at most once per client. The check is only latched on success,
    /// so a failed probe is retried by the next request.
    fn ensure_compatible(&self) -> Result<()> {
        if self.compat.get().is_some() {
            return Ok(());
        }

        let info = self.system().get_interface_information()?;
        let version = info.interface_version.ok_or_else(|| {
            Error::UnexpectedResponse(
                "the device did not indicate its API version".to_string(),
            )
        })?;
        let major = major_version(&version).ok_or_else(|| {
            Error::UnexpectedResponse(format!("unparseable API version '{}'", version))
        })?;
        // Supported interface versions are 3.x only
        if major != 3 {
            return Err(Error::IncompatibleApiVersion { version });
        }

        tracing::debug!(
            "device at {} passed the compatibility check (version {})",
            self.rpc.host(),
            version
        );
        let _ = self.compat.set(());
        Ok(())
    }
}

/// Extract the major component of an `X.Y.Z` version string
fn major_version(version: &str) -> Option<u64> {
    version.split('.').next()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_validates_parameters() {
        assert!(matches!(
            BraviaClient::new("", "0000"),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            BraviaClient::new("192.168.1.128", ""),
            Err(Error::InvalidParameter(_))
        ));
        assert!(BraviaClient::new("192.168.1.128", "0000").is_ok());
    }

    #[test]
    fn test_major_version_parsing() {
        assert_eq!(major_version("3.10.1"), Some(3));
        assert_eq!(major_version("4.0.0"), Some(4));
        assert_eq!(major_version("3"), Some(3));
        assert_eq!(major_version(""), None);
        assert_eq!(major_version("three.zero"), None);
    }
}
