/// Represents the JSON-RPC service endpoints exposed by the display
///
/// Each service groups a specific set of methods for controlling one aspect
/// of the device. The IRCC remote endpoint is SOAP-based and handled
/// separately by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// System service - power, locale, network and device information
    System,

    /// Audio service - volume, mute and speaker configuration
    Audio,

    /// AvContent service - inputs, content listings and playback selection
    AvContent,

    /// AppControl service - app listing, launching and text-form access
    AppControl,

    /// VideoScreen service - scene selection for the display
    VideoScreen,

    /// Encryption service - key exchange for encrypted text transfer
    Encryption,
}

impl Service {
    /// Get the endpoint path segment for this service
    ///
    /// # Returns
    /// The path segment appended to `/sony/` when building request URLs
    pub fn endpoint(&self) -> &'static str {
        match self {
            Service::System => "system",
            Service::Audio => "audio",
            Service::AvContent => "avContent",
            Service::AppControl => "appControl",
            Service::VideoScreen => "videoScreen",
            Service::Encryption => "encryption",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_endpoints() {
        assert_eq!(Service::System.endpoint(), "system");
        assert_eq!(Service::Audio.endpoint(), "audio");
        assert_eq!(Service::AvContent.endpoint(), "avContent");
        assert_eq!(Service::AppControl.endpoint(), "appControl");
        assert_eq!(Service::VideoScreen.endpoint(), "videoScreen");
        assert_eq!(Service::Encryption.endpoint(), "encryption");
    }
}
