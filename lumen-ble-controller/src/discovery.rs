//! Scan and resolve lights on the local adapter.
//!
//! The control core never discovers devices itself; it only consumes a
//! connectable peripheral. This module is the collaborator that supplies
//! one, resolving a user-supplied name or address fragment.

use std::time::Duration;

use btleplug::api::{Central, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral};

/// How long `find_light` scans before giving up.
const FIND_SCAN_SECS: u64 = 5;

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("no Bluetooth adapter found")]
    NoAdapter,
    #[error("no light matching {target:?} found")]
    DeviceNotFound { target: String },
    #[error(transparent)]
    Ble(#[from] btleplug::Error),
}

/// A device seen during a scan.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DiscoveredLight {
    pub name: String,
    pub address: String,
    pub rssi: Option<i16>,
}

/// Get the default Bluetooth adapter
pub async fn get_adapter() -> Result<Adapter, DiscoveryError> {
    let manager = Manager::new().await?;
    let adapters = manager.adapters().await?;
    adapters.into_iter().next().ok_or(DiscoveryError::NoAdapter)
}

/// Scan for BLE devices and report everything seen.
pub async fn scan(duration_secs: u64) -> Result<Vec<DiscoveredLight>, DiscoveryError> {
    let adapter = get_adapter().await?;

    adapter.start_scan(ScanFilter::default()).await?;
    tokio::time::sleep(Duration::from_secs(duration_secs)).await;

    let mut devices = Vec::new();
    for peripheral in adapter.peripherals().await? {
        if let Some(props) = peripheral.properties().await? {
            let name = props.local_name.unwrap_or_else(|| "Unknown".to_string());
            let address = peripheral.address().to_string();
            devices.push(DiscoveredLight {
                name,
                address,
                rssi: props.rssi,
            });
        }
    }

    adapter.stop_scan().await?;
    Ok(devices)
}

/// Find a light whose local name or address contains `target`.
pub async fn find_light(target: &str) -> Result<Peripheral, DiscoveryError> {
    let adapter = get_adapter().await?;

    adapter.start_scan(ScanFilter::default()).await?;
    tokio::time::sleep(Duration::from_secs(FIND_SCAN_SECS)).await;

    for peripheral in adapter.peripherals().await? {
        if let Some(props) = peripheral.properties().await? {
            let name = props.local_name.unwrap_or_default();
            let address = peripheral.address().to_string();

            if name.contains(target) || address.contains(target) {
                adapter.stop_scan().await?;
                log::debug!("resolved {target:?} to {name} ({address})");
                return Ok(peripheral);
            }
        }
    }

    adapter.stop_scan().await?;
    Err(DiscoveryError::DeviceNotFound {
        target: target.to_string(),
    })
}
