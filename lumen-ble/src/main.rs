//! BLE control tool for Lumen RGB lights
//!
//! Scans for lights and sends power, brightness, color and effect
//! commands over the control characteristic.

use clap::{Parser, Subcommand};

use lumen_ble_controller::discovery;
use lumen_ble_controller::{BleTransport, FrameTransport, Light, TurnOn};
use lumen_proto::{parse_opcode, parse_payload, Frame};

#[derive(Parser)]
#[command(name = "lumen-ble")]
#[command(about = "BLE control tool for Lumen RGB lights")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan for nearby BLE devices
    Scan {
        /// Scan duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Turn a light on, optionally applying brightness, color and effect
    On {
        /// Device name or address fragment to connect to
        #[arg(short, long)]
        device: String,
        /// Brightness level 0-255
        #[arg(short, long)]
        brightness: Option<u8>,
        /// Color as R,G,B (0-255 each)
        #[arg(short, long)]
        color: Option<String>,
        /// Effect id
        #[arg(short, long)]
        effect: Option<u8>,
    },
    /// Turn a light off
    Off {
        /// Device name or address fragment to connect to
        #[arg(short, long)]
        device: String,
    },
    /// Set brightness
    Brightness {
        /// Device name or address fragment to connect to
        #[arg(short, long)]
        device: String,
        /// Brightness level 0-255
        level: u8,
    },
    /// Set a solid RGB color
    Color {
        /// Device name or address fragment to connect to
        #[arg(short, long)]
        device: String,
        /// Color as R,G,B (0-255 each)
        color: String,
    },
    /// Select a built-in effect
    Effect {
        /// Device name or address fragment to connect to
        #[arg(short, long)]
        device: String,
        /// Effect id
        effect: u8,
    },
    /// Send a raw command frame (for undocumented opcodes)
    Raw {
        /// Device name or address fragment to connect to
        #[arg(short, long)]
        device: String,
        /// Opcode, decimal or 0x-prefixed hex
        opcode: String,
        /// Payload bytes, comma separated (decimal or 0x hex)
        #[arg(default_value = "")]
        payload: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { duration, json } => {
            println!("Scanning for {duration} seconds...");
            let devices = discovery::scan(duration).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&devices)?);
            } else {
                println!("\nFound {} devices:", devices.len());
                for device in devices {
                    let rssi = device
                        .rssi
                        .map(|r| format!("{} dBm", r))
                        .unwrap_or_else(|| "N/A".to_string());
                    println!("  {} ({}) RSSI: {}", device.name, device.address, rssi);
                }
            }
        }
        Commands::On { device, brightness, color, effect } => {
            let color = color.as_deref().map(parse_rgb).transpose()?;
            let mut light = connect_light(&device).await?;
            light.turn_on(TurnOn { brightness, color, effect }).await?;
            println!("Light is on");
        }
        Commands::Off { device } => {
            let mut light = connect_light(&device).await?;
            light.turn_off().await?;
            println!("Light is off");
        }
        Commands::Brightness { device, level } => {
            let mut light = connect_light(&device).await?;
            light.set_brightness(level).await?;
            println!("Brightness set to {level}");
        }
        Commands::Color { device, color } => {
            let (red, green, blue) = parse_rgb(&color)?;
            let mut light = connect_light(&device).await?;
            light.set_color(red, green, blue).await?;
            println!("Color set to {red},{green},{blue}");
        }
        Commands::Effect { device, effect } => {
            let mut light = connect_light(&device).await?;
            light.set_effect(effect).await?;
            println!("Effect {effect} selected");
        }
        Commands::Raw { device, opcode, payload } => {
            // Validation happens before any BLE I/O is attempted.
            let opcode = parse_opcode(&opcode)?;
            let payload = parse_payload(&payload)?;
            let frame = Frame::encode(opcode, &payload)?;

            let peripheral = discovery::find_light(&device).await?;
            let transport = BleTransport::new(peripheral);
            transport.send_frame(&frame).await?;
            println!(
                "Sent opcode 0x{opcode:02x} with {} payload bytes",
                payload.len()
            );
        }
    }

    Ok(())
}

async fn connect_light(target: &str) -> Result<Light<BleTransport>, Box<dyn std::error::Error>> {
    let peripheral = discovery::find_light(target).await?;
    Ok(Light::new(BleTransport::new(peripheral)))
}

/// Parse "R,G,B" into a color triple.
fn parse_rgb(s: &str) -> Result<(u8, u8, u8), Box<dyn std::error::Error>> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected R,G,B, got {s:?}").into());
    }
    let red = parts[0].trim().parse()?;
    let green = parts[1].trim().parse()?;
    let blue = parts[2].trim().parse()?;
    Ok((red, green, blue))
}
