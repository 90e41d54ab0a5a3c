//! Connection establishment with bounded retry.
//!
//! BLE links are unreliable: the adapter may be busy, the light out of
//! range, or a GATT negotiation may race with another client. Connecting
//! therefore retries a few times with doubling backoff before giving up.
//! Retry is confined to this layer; the write path makes a single attempt.

use std::time::Duration;

use btleplug::api::Peripheral as _;
use btleplug::platform::Peripheral;

/// Connection attempts before giving up.
const CONNECT_ATTEMPTS: u32 = 3;

/// Backoff before the second attempt; doubles each retry.
const INITIAL_BACKOFF: Duration = Duration::from_millis(250);

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("connection failed after {attempts} attempts: {source}")]
    ConnectionFailed {
        attempts: u32,
        source: btleplug::Error,
    },
    #[error(transparent)]
    Ble(#[from] btleplug::Error),
}

/// Connect to a peripheral, reusing an existing connection when the OS
/// still holds one.
pub async fn establish_connection(peripheral: &Peripheral) -> Result<(), ConnectError> {
    if peripheral.is_connected().await? {
        return Ok(());
    }

    let mut backoff = INITIAL_BACKOFF;
    let mut attempt = 0;
    loop {
        attempt += 1;
        match peripheral.connect().await {
            Ok(()) => {
                log::debug!(
                    "connected to {} on attempt {attempt}",
                    peripheral.address()
                );
                return Ok(());
            }
            Err(source) => {
                if attempt >= CONNECT_ATTEMPTS {
                    return Err(ConnectError::ConnectionFailed {
                        attempts: attempt,
                        source,
                    });
                }
                log::warn!(
                    "connect attempt {attempt}/{CONNECT_ATTEMPTS} to {} failed: {source}",
                    peripheral.address()
                );
            }
        }
        tokio::time::sleep(backoff).await;
        backoff *= 2;
    }
}
