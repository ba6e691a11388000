//! # BRAVIA API CLI Example
//!
//! A minimal interactive CLI demonstrating the core functionality of the
//! bravia-api crate: power control, volume, input switching, app launching
//! and remote button emulation against a live display.
//!
//! ## Usage
//!
//! Run the example with:
//! ```bash
//! cargo run --example cli_example -- <host> <pre-shared-key>
//! ```
//!
//! The display must have IP control enabled and a pre-shared key configured
//! (Settings, Network, Home network, IP control). Commands are entered at
//! the prompt:
//!
//! - `status` - power, playing content and volume summary
//! - `on` / `off` - power the display on or off
//! - `volume <level>` - set the volume level
//! - `input <port>` - switch to the given HDMI port
//! - `apps` - list installed applications
//! - `launch <uri>` - open an application by URI
//! - `button <name>` - send a remote button (home, back, up, down, ...)
//! - `quit` - exit
//!
//! Set `RUST_LOG=jsonrpc_client=debug` to see the wire traffic.

use bravia_api::{BraviaClient, ButtonCode};
use std::env;
use std::io::{self, BufRead, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let (Some(host), Some(passcode)) = (args.next(), args.next()) else {
        eprintln!("usage: cli_example <host> <pre-shared-key>");
        std::process::exit(2);
    };

    let client = BraviaClient::new(host, passcode)?;

    // The first request verifies the device speaks a supported API version
    let info = client.system().get_interface_information()?;
    println!(
        "Connected to {} (interface version {})",
        info.model_name.as_deref().unwrap_or("unknown model"),
        info.interface_version.as_deref().unwrap_or("unknown"),
    );
    println!("Type 'help' for commands.");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let line = line?;
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or("");
        let argument = parts.next();

        let result = match (command, argument) {
            ("status", _) => show_status(&client),
            ("on", _) => client.system().power_on(),
            ("off", _) => client.system().power_off(),
            ("volume", Some(level)) => match level.parse() {
                Ok(level) => client.audio().set_volume_level(level),
                Err(_) => {
                    eprintln!("volume must be a number");
                    continue;
                }
            },
            ("input", Some(port)) => client
                .av_content()
                .set_play_content(&format!("extInput:hdmi?port={}", port)),
            ("apps", _) => show_apps(&client),
            ("launch", Some(uri)) => client.app_control().set_active_app(uri),
            ("button", Some(name)) => match parse_button(name) {
                Some(button) => client.remote().send_button(button),
                None => {
                    eprintln!("unknown button '{}'", name);
                    continue;
                }
            },
            ("help", _) => {
                println!(
                    "commands: status, on, off, volume <level>, input <port>, \
                     apps, launch <uri>, button <name>, quit"
                );
                continue;
            }
            ("quit", _) | ("exit", _) => break,
            ("", _) => continue,
            _ => {
                eprintln!("unknown command '{}' (try 'help')", command);
                continue;
            }
        };

        // Keep the session alive across failed commands
        if let Err(e) = result {
            eprintln!("error: {}", e);
        }
    }

    Ok(())
}

fn show_status(client: &BraviaClient) -> bravia_api::Result<()> {
    let powered = client.system().get_power_status()?;
    println!("power: {}", if powered { "on" } else { "standby" });

    if powered {
        match client.av_content().get_playing_content_info()? {
            Some(playing) => println!(
                "playing: {} ({})",
                playing.name.as_deref().unwrap_or("unnamed"),
                playing.uri.as_deref().unwrap_or("no uri"),
            ),
            None => println!("playing: nothing"),
        }
    }

    for device in client.audio().get_volume_information()? {
        println!(
            "{:?} volume: {} ({})",
            device.device,
            device.volume,
            if device.muted { "muted" } else { "unmuted" },
        );
    }

    Ok(())
}

fn show_apps(client: &BraviaClient) -> bravia_api::Result<()> {
    for app in client.app_control().get_application_list(true)? {
        println!(
            "{:40} {}",
            app.name.as_deref().unwrap_or("(unnamed)"),
            app.uri.as_deref().unwrap_or("(no uri)"),
        );
    }
    Ok(())
}

fn parse_button(name: &str) -> Option<ButtonCode> {
    match name {
        "home" => Some(ButtonCode::Home),
        "back" => Some(ButtonCode::Back),
        "up" => Some(ButtonCode::Up),
        "down" => Some(ButtonCode::Down),
        "left" => Some(ButtonCode::Left),
        "right" => Some(ButtonCode::Right),
        "confirm" | "ok" => Some(ButtonCode::Confirm),
        "mute" => Some(ButtonCode::Mute),
        "play" => Some(ButtonCode::Play),
        "pause" => Some(ButtonCode::Pause),
        _ => None,
    }
}
