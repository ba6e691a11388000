//! Type-safe client for Sony BRAVIA Professional Displays
//!
//! This crate drives the IP-control interface of BRAVIA professional
//! displays: JSON-RPC services for power, volume, inputs, apps and screen
//! configuration, plus the SOAP-based IRCC endpoint for remote control
//! button emulation.
//!
//! IP control must be enabled on the display and a pre-shared key
//! configured (Settings, Network, Home network, IP control). All
//! functionality hangs off [`BraviaClient`]:
//!
//! ```no_run
//! use bravia_api::{BraviaClient, ButtonCode};
//!
//! # fn main() -> bravia_api::Result<()> {
//! let client = BraviaClient::new("192.168.1.128", "0000")?;
//!
//! client.system().power_on()?;
//! client.av_content().set_play_content("extInput:hdmi?port=2")?;
//! client.remote().send_button(ButtonCode::VolumeUp)?;
//! # Ok(())
//! # }
//! ```
//!
//! Only displays running interface version 3.x are supported. The first
//! request made through a client verifies this; constructing a client is
//! free of network I/O, and an unsupported device surfaces as
//! [`Error::IncompatibleApiVersion`].

mod client;
mod error;
mod service;
mod util;

pub mod services;

pub use client::BraviaClient;
pub use error::{Error, ErrorCode, Result};
pub use service::Service;

pub use services::app_control::{AppControl, AppFeatureStatus, Application, WebAppStatus};
pub use services::audio::{
    Audio, AudioOutput, SpeakerSettings, SubwooferPhase, TvPosition, VolumeChange, VolumeDevice,
    VolumeInformation,
};
pub use services::av_content::{AvContent, Content, ExternalInput, InputIcon, PlayingContent};
pub use services::encryption::Encryption;
pub use services::remote::{ButtonCode, Remote};
pub use services::system::{
    InterfaceInformation, LedMode, LedStatus, NetworkInterface, PowerSavingMode, RemoteCode,
    System, SystemInformation,
};
pub use services::video_screen::{SceneMode, VideoScreen};
