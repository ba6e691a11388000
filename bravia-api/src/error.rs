//! Error types for BRAVIA API operations

use jsonrpc_client::RpcError;
use thiserror::Error;

/// Error codes reported by the device API
///
/// The device reuses a handful of HTTP status codes (401, 403, ...) alongside
/// its own JSON-RPC code space, so both are represented here. Codes the
/// device may emit that are not part of the documented set are preserved in
/// `Other` rather than dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // HTTP
    Unauthorized,
    Forbidden,
    NotFound,
    EntityTooLarge,
    UriTooLong,
    NotImplemented,
    ServiceUnavailable,

    // Common
    Any,
    Timeout,
    IllegalArgument,
    IllegalRequest,
    IllegalState,
    NoSuchMethod,
    UnsupportedVersion,
    UnsupportedOperation,
    RequestRetry,
    ClientOverMaximum,
    EncryptionFailed,
    RequestDuplicated,
    MultipleSettingsFailed,
    DisplayOff,
    ContactSupport,

    // System
    PasswordExpired,
    AcPowerRequired,

    // Video screen
    ScreenChangeInProgress,

    // Audio
    TargetNotSupported,
    VolumeOutOfRange,

    // AV content
    ContentProtected,
    ContentDoesNotExist,
    StorageHasNoContent,
    SomeContentNotDeleted,
    ChannelFixedByUsbRecording,
    ChannelFixedByScartRecording,
    ChapterDoesNotExist,
    ChannelCannotBeDetermined,
    EmptyChannelList,
    StorageDoesNotExist,
    StorageFull,
    ContentAttributeSettingFailed,
    UnknownGroupId,
    ContentNotSupported,

    // App control
    AnotherRequestInProgress,
    FailedToLaunch,
    RequestInProgress,
    FailedToTerminate,

    // Encryption
    KeyDoesNotExist,

    /// A code outside the documented set, carried verbatim
    Other(i32),
}

impl ErrorCode {
    /// Translate a raw code from the device into an `ErrorCode`
    pub fn from_code(code: i32) -> Self {
        match code {
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            404 => ErrorCode::NotFound,
            413 => ErrorCode::EntityTooLarge,
            414 => ErrorCode::UriTooLong,
            501 => ErrorCode::NotImplemented,
            503 => ErrorCode::ServiceUnavailable,
            1 => ErrorCode::Any,
            2 => ErrorCode::Timeout,
            3 => ErrorCode::IllegalArgument,
            5 => ErrorCode::IllegalRequest,
            7 => ErrorCode::IllegalState,
            12 => ErrorCode::NoSuchMethod,
            14 => ErrorCode::UnsupportedVersion,
            15 => ErrorCode::UnsupportedOperation,
            40000 => ErrorCode::RequestRetry,
            40001 => ErrorCode::ClientOverMaximum,
            40002 => ErrorCode::EncryptionFailed,
            40003 => ErrorCode::RequestDuplicated,
            40004 => ErrorCode::MultipleSettingsFailed,
            40005 => ErrorCode::DisplayOff,
            40006 => ErrorCode::ContactSupport,
            40200 => ErrorCode::PasswordExpired,
            40201 => ErrorCode::AcPowerRequired,
            40600 => ErrorCode::ScreenChangeInProgress,
            40800 => ErrorCode::TargetNotSupported,
            40801 => ErrorCode::VolumeOutOfRange,
            41000 => ErrorCode::ContentProtected,
            41001 => ErrorCode::ContentDoesNotExist,
            41002 => ErrorCode::StorageHasNoContent,
            41003 => ErrorCode::SomeContentNotDeleted,
            41011 => ErrorCode::ChannelFixedByUsbRecording,
            41012 => ErrorCode::ChannelFixedByScartRecording,
            41013 => ErrorCode::ChapterDoesNotExist,
            41014 => ErrorCode::ChannelCannotBeDetermined,
            41015 => ErrorCode::EmptyChannelList,
            41020 => ErrorCode::StorageDoesNotExist,
            41021 => ErrorCode::StorageFull,
            41022 => ErrorCode::ContentAttributeSettingFailed,
            41023 => ErrorCode::UnknownGroupId,
            41024 => ErrorCode::ContentNotSupported,
            41400 => ErrorCode::AnotherRequestInProgress,
            41401 => ErrorCode::FailedToLaunch,
            41402 => ErrorCode::RequestInProgress,
            41403 => ErrorCode::FailedToTerminate,
            42400 => ErrorCode::KeyDoesNotExist,
            other => ErrorCode::Other(other),
        }
    }

    /// The raw numeric code as reported by the device
    pub fn code(&self) -> i32 {
        match self {
            ErrorCode::Unauthorized => 401,
            ErrorCode::Forbidden => 403,
            ErrorCode::NotFound => 404,
            ErrorCode::EntityTooLarge => 413,
            ErrorCode::UriTooLong => 414,
            ErrorCode::NotImplemented => 501,
            ErrorCode::ServiceUnavailable => 503,
            ErrorCode::Any => 1,
            ErrorCode::Timeout => 2,
            ErrorCode::IllegalArgument => 3,
            ErrorCode::IllegalRequest => 5,
            ErrorCode::IllegalState => 7,
            ErrorCode::NoSuchMethod => 12,
            ErrorCode::UnsupportedVersion => 14,
            ErrorCode::UnsupportedOperation => 15,
            ErrorCode::RequestRetry => 40000,
            ErrorCode::ClientOverMaximum => 40001,
            ErrorCode::EncryptionFailed => 40002,
            ErrorCode::RequestDuplicated => 40003,
            ErrorCode::MultipleSettingsFailed => 40004,
            ErrorCode::DisplayOff => 40005,
            ErrorCode::ContactSupport => 40006,
            ErrorCode::PasswordExpired => 40200,
            ErrorCode::AcPowerRequired => 40201,
            ErrorCode::ScreenChangeInProgress => 40600,
            ErrorCode::TargetNotSupported => 40800,
            ErrorCode::VolumeOutOfRange => 40801,
            ErrorCode::ContentProtected => 41000,
            ErrorCode::ContentDoesNotExist => 41001,
            ErrorCode::StorageHasNoContent => 41002,
            ErrorCode::SomeContentNotDeleted => 41003,
            ErrorCode::ChannelFixedByUsbRecording => 41011,
            ErrorCode::ChannelFixedByScartRecording => 41012,
            ErrorCode::ChapterDoesNotExist => 41013,
            ErrorCode::ChannelCannotBeDetermined => 41014,
            ErrorCode::EmptyChannelList => 41015,
            ErrorCode::StorageDoesNotExist => 41020,
            ErrorCode::StorageFull => 41021,
            ErrorCode::ContentAttributeSettingFailed => 41022,
            ErrorCode::UnknownGroupId => 41023,
            ErrorCode::ContentNotSupported => 41024,
            ErrorCode::AnotherRequestInProgress => 41400,
            ErrorCode::FailedToLaunch => 41401,
            ErrorCode::RequestInProgress => 41402,
            ErrorCode::FailedToTerminate => 41403,
            ErrorCode::KeyDoesNotExist => 42400,
            ErrorCode::Other(code) => *code,
        }
    }

    /// The canonical human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "This application is not authorized to access the device API",
            ErrorCode::Forbidden => "The requested resource is forbidden",
            ErrorCode::NotFound => "The requested resource was not found",
            ErrorCode::EntityTooLarge => "The content of the request was too large",
            ErrorCode::UriTooLong => "The requested URI was too long",
            ErrorCode::NotImplemented => "The requested resource is not implemented",
            ErrorCode::ServiceUnavailable => "The device API reports that it is not available",
            ErrorCode::Any => "A general error occurred",
            ErrorCode::Timeout => "A timeout occurred on the device",
            ErrorCode::IllegalArgument => "One or more API parameters is invalid",
            ErrorCode::IllegalRequest => "The API request is malformed, empty, or otherwise invalid",
            ErrorCode::IllegalState => "The device is not in the correct state to process this request",
            ErrorCode::NoSuchMethod => "The requested API resource is not available on this device",
            ErrorCode::UnsupportedVersion => {
                "The requested API resource version is not available on this device"
            }
            ErrorCode::UnsupportedOperation => {
                "The device cannot handle the request with the specified parameters"
            }
            ErrorCode::RequestRetry => "A long polling timeout occurred",
            ErrorCode::ClientOverMaximum => "Too many long polling clients are currently connected",
            ErrorCode::EncryptionFailed => {
                "The device was unable to encrypt its response, possibly due to an invalid key"
            }
            ErrorCode::RequestDuplicated => "The previous request is still processing",
            ErrorCode::MultipleSettingsFailed => {
                "One or more settings could not be applied (but some may have been)"
            }
            ErrorCode::DisplayOff => {
                "This request cannot be made while the device's display is off"
            }
            ErrorCode::ContactSupport => "A general error occurred with message",
            ErrorCode::PasswordExpired => "The password has expired",
            ErrorCode::AcPowerRequired => {
                "The request cannot be processed because the device needs to be connected to AC power"
            }
            ErrorCode::ScreenChangeInProgress => "The device is currently changing the screen",
            ErrorCode::TargetNotSupported => {
                "The specified target is not supported or cannot be controlled"
            }
            ErrorCode::VolumeOutOfRange => {
                "The specified volume level is out of range for the device"
            }
            ErrorCode::ContentProtected => {
                "The requested content is DRM protected and cannot be used"
            }
            ErrorCode::ContentDoesNotExist => "The requested content does not exist",
            ErrorCode::StorageHasNoContent => "The requested storage device contains no content",
            ErrorCode::SomeContentNotDeleted => "Some content could not be deleted as requested",
            ErrorCode::ChannelFixedByUsbRecording => {
                "The content cannot be changed because the channel is fixed by a USB recording device"
            }
            ErrorCode::ChannelFixedByScartRecording => {
                "The content cannot be changed because the channel is fixed by a SCART recording device"
            }
            ErrorCode::ChapterDoesNotExist => "The requested chapter does not exist",
            ErrorCode::ChannelCannotBeDetermined => "The channel cannot be determined at this time",
            ErrorCode::EmptyChannelList => "The channel list is empty",
            ErrorCode::StorageDoesNotExist => "The storage device does not exist",
            ErrorCode::StorageFull => "The storage device is full",
            ErrorCode::ContentAttributeSettingFailed => {
                "Setting an attribute on the content failed"
            }
            ErrorCode::UnknownGroupId => "The specified group ID is unknown",
            ErrorCode::ContentNotSupported => "The specified content is not supported",
            ErrorCode::AnotherRequestInProgress => "Another request is already in progress",
            ErrorCode::FailedToLaunch => "The specified app failed to launch",
            ErrorCode::RequestInProgress => {
                "The request was accepted but the app's launch may still be in progress"
            }
            ErrorCode::FailedToTerminate => "One or more apps failed to terminate",
            ErrorCode::KeyDoesNotExist => "The device has not yet generated an encryption key",
            ErrorCode::Other(_) => "An unexpected error occurred",
        }
    }
}

/// High-level errors for BRAVIA API operations
///
/// Most failures carry the device's reported error code and a canonical
/// message. Operations with documented failure modes of their own (volume
/// range, app launch, text input focus, ...) refine those codes into the
/// dedicated variants below so callers can match on them directly.
#[derive(Debug, Error)]
pub enum Error {
    /// Error reported by the device, carrying its code and message
    #[error("{message}")]
    Device {
        /// The translated device error code
        code: ErrorCode,
        /// Human-readable description of the failure
        message: String,
    },

    /// The device is running an API version outside the supported range
    #[error("The target device is running an incompatible API version '{version}'")]
    IncompatibleApiVersion {
        /// The version string the device reported
        version: String,
    },

    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// The device returned a response the library could not interpret
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A parameter passed to the library has an invalid value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The requested app could not be launched
    #[error("App launch failed: {0}")]
    AppLaunch(String),

    /// There is no text field focused on the device
    #[error("No text field is focused on the device")]
    NoFocusedTextField,

    /// The specified UI language is not supported by the device
    #[error("The specified UI language is not supported by the device")]
    LanguageNotSupported,

    /// The specified output target is not supported by the device
    #[error("The specified target is not supported or cannot be controlled")]
    TargetNotSupported,

    /// The specified volume level is out of range
    #[error("The specified volume level is out of range for the device")]
    VolumeOutOfRange,

    /// The device is not in a state where it can accept the request
    #[error("Invalid device state: {0}")]
    InvalidState(String),

    /// An error occurred while encrypting or decrypting a message
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// An internal error occurred
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// The device error code carried by this error, if any
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Error::Device { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Build a `Device` error from a raw code and the device's own message
    ///
    /// The canonical message for the code is preferred; codes without a
    /// specific meaning (and undocumented ones) append the device's text.
    pub(crate) fn device(code: i32, detail: &str) -> Self {
        let code = ErrorCode::from_code(code);
        let message = match code {
            ErrorCode::Any | ErrorCode::ContactSupport | ErrorCode::Other(_) if !detail.is_empty() => {
                format!("{}: {}", code.message(), detail)
            }
            _ => code.message().to_string(),
        };
        Error::Device { code, message }
    }
}

/// Type alias for results that can return an `Error`
pub type Result<T> = std::result::Result<T, Error>;

/// Convert from RpcError to Error
impl From<RpcError> for Error {
    fn from(error: RpcError) -> Self {
        match error {
            RpcError::Network(msg) => Error::Network(msg),
            RpcError::Http(status) => Error::device(i32::from(status), ""),
            RpcError::Device { code, message } => Error::device(code, &message),
            RpcError::Malformed(msg) => Error::UnexpectedResponse(msg),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::UnexpectedResponse(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for code in [
            401, 403, 404, 413, 414, 501, 503, 1, 2, 3, 5, 7, 12, 14, 15, 40000, 40001, 40002,
            40003, 40004, 40005, 40006, 40200, 40201, 40600, 40800, 40801, 41000, 41001, 41002,
            41003, 41011, 41012, 41013, 41014, 41015, 41020, 41021, 41022, 41023, 41024, 41400,
            41401, 41402, 41403, 42400,
        ] {
            assert_eq!(ErrorCode::from_code(code).code(), code);
        }
    }

    #[test]
    fn test_undocumented_code_is_preserved() {
        let code = ErrorCode::from_code(51234);
        assert_eq!(code, ErrorCode::Other(51234));
        assert_eq!(code.code(), 51234);
    }

    #[test]
    fn test_device_error_uses_canonical_message() {
        let error = Error::device(7, "Illegal State");
        match &error {
            Error::Device { code, message } => {
                assert_eq!(*code, ErrorCode::IllegalState);
                assert_eq!(
                    message,
                    "The device is not in the correct state to process this request"
                );
            }
            other => panic!("Expected Error::Device, got {:?}", other),
        }
    }

    #[test]
    fn test_device_error_appends_detail_for_generic_codes() {
        let error = Error::device(1, "something broke");
        match error {
            Error::Device { message, .. } => {
                assert_eq!(message, "A general error occurred: something broke");
            }
            other => panic!("Expected Error::Device, got {:?}", other),
        }

        let error = Error::device(98765, "mystery");
        match error {
            Error::Device { message, .. } => {
                assert_eq!(message, "An unexpected error occurred: mystery");
            }
            other => panic!("Expected Error::Device, got {:?}", other),
        }
    }

    #[test]
    fn test_http_status_conversion() {
        let error: Error = RpcError::Http(403).into();
        assert_eq!(error.code(), Some(ErrorCode::Forbidden));
        assert_eq!(
            format!("{}", error),
            "The requested resource is forbidden"
        );
    }

    #[test]
    fn test_rpc_error_conversion() {
        let error: Error = RpcError::Network("connection refused".to_string()).into();
        assert!(matches!(error, Error::Network(_)));

        let error: Error = RpcError::Malformed("no result member".to_string()).into();
        assert!(matches!(error, Error::UnexpectedResponse(_)));

        let error: Error = RpcError::Device {
            code: 40801,
            message: "out of range".to_string(),
        }
        .into();
        assert_eq!(error.code(), Some(ErrorCode::VolumeOutOfRange));
    }
}
