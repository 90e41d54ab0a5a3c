//! Frame delivery over the light's GATT write characteristic.

use btleplug::api::{Peripheral as _, WriteType};
use btleplug::platform::Peripheral;
use uuid::Uuid;

use lumen_proto::Frame;
use lumen_proto::ble::CONTROL_CHARACTERISTIC_UUID;

use crate::connect::{self, ConnectError};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Connection(#[from] ConnectError),
    #[error("control characteristic {uuid} not found on device")]
    CharacteristicNotFound { uuid: Uuid },
    #[error("GATT write failed: {source}")]
    WriteFailed { source: btleplug::Error },
    #[error(transparent)]
    Ble(btleplug::Error),
}

/// Capability to deliver one encoded frame to a light.
///
/// Separates how a frame gets delivered from what a frame contains, and
/// lets command sequencing run against a recording transport in tests.
#[allow(async_fn_in_trait)]
pub trait FrameTransport {
    async fn send_frame(&self, frame: &Frame) -> Result<(), TransportError>;
}

/// Parse UUID string into uuid::Uuid
fn parse_uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).expect("invalid UUID in lumen_proto")
}

/// Delivers frames to a real light via btleplug.
///
/// Each send is one transient session: connect (or reuse the OS-held
/// connection), locate the control characteristic, write once. Nothing is
/// pooled across calls.
pub struct BleTransport {
    peripheral: Peripheral,
    characteristic: Uuid,
}

impl BleTransport {
    pub fn new(peripheral: Peripheral) -> Self {
        Self {
            peripheral,
            characteristic: parse_uuid(CONTROL_CHARACTERISTIC_UUID),
        }
    }

    pub fn peripheral(&self) -> &Peripheral {
        &self.peripheral
    }
}

impl FrameTransport for BleTransport {
    async fn send_frame(&self, frame: &Frame) -> Result<(), TransportError> {
        connect::establish_connection(&self.peripheral).await?;

        self.peripheral
            .discover_services()
            .await
            .map_err(TransportError::Ble)?;

        let characteristics = self.peripheral.characteristics();
        let control = characteristics
            .iter()
            .find(|c| c.uuid == self.characteristic)
            .ok_or(TransportError::CharacteristicNotFound {
                uuid: self.characteristic,
            })?;

        // Fire and forget: one whole-frame write, no acknowledgment, no
        // retry at this step.
        self.peripheral
            .write(control, frame.as_bytes(), WriteType::WithoutResponse)
            .await
            .map_err(|source| TransportError::WriteFailed { source })?;

        log::debug!(
            "wrote frame {:02x?} to {}",
            frame.as_bytes(),
            self.peripheral.address()
        );
        Ok(())
    }
}
