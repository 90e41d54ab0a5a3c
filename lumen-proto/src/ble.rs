//! BLE GATT constants for the light's control service.
//!
//! Lights of this family expose a single write characteristic; every
//! control frame is written to it without response.

/// Control characteristic UUID (write without response)
pub const CONTROL_CHARACTERISTIC_UUID: &str = "00010203-0405-0607-0809-0a0b0c0d2b11";
