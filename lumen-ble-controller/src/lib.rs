//! Lumen BLE Controller
//!
//! BLE client for controlling Lumen RGB lights: resolves a light by name
//! or address fragment, establishes a connection with bounded retry, and
//! delivers encoded control frames over a single GATT write
//! characteristic.
//!
//! # Example
//!
//! ```ignore
//! use lumen_ble_controller::{discovery, BleTransport, Light, TurnOn};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let peripheral = discovery::find_light("A4:C1:38").await?;
//!     let mut light = Light::new(BleTransport::new(peripheral));
//!
//!     light.turn_on(TurnOn {
//!         brightness: Some(200),
//!         color: Some((10, 20, 30)),
//!         effect: None,
//!     }).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod connect;
pub mod discovery;
pub mod light;
pub mod transport;

pub use connect::ConnectError;
pub use discovery::{DiscoveredLight, DiscoveryError};
pub use light::{Light, LightState, TurnOn};
pub use transport::{BleTransport, FrameTransport, TransportError};
