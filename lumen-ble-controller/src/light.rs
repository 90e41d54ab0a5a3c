//! Light session: high-level operations and command sequencing.

use lumen_proto::Command;

use crate::transport::{FrameTransport, TransportError};

/// Last-known state of a light, as far as this controller has commanded
/// it. Fields stay `None` until the first successful command; the device
/// never reports back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightState {
    pub is_on: Option<bool>,
    pub brightness: Option<u8>,
    pub effect: Option<u8>,
}

/// Options for a turn-on intent. Each present option becomes its own
/// frame after the power command.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnOn {
    pub brightness: Option<u8>,
    pub color: Option<(u8, u8, u8)>,
    pub effect: Option<u8>,
}

/// A control session for one light.
pub struct Light<T> {
    transport: T,
    state: LightState,
}

impl<T: FrameTransport> Light<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: LightState::default(),
        }
    }

    pub fn state(&self) -> LightState {
        self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Encode and send a single command.
    pub async fn send(&self, command: Command) -> Result<(), TransportError> {
        self.transport.send_frame(&command.frame()).await
    }

    /// Turn the light on, then apply each requested option in the fixed
    /// order brightness, color, effect. One independent frame per command;
    /// the next send does not begin until the previous one completed.
    ///
    /// There is no atomicity across the sequence: a failed send aborts the
    /// remaining commands, and the ones already sent have taken effect on
    /// the device. State reflects exactly the frames that were delivered.
    pub async fn turn_on(&mut self, options: TurnOn) -> Result<(), TransportError> {
        self.send(Command::Power(true)).await?;
        self.state.is_on = Some(true);

        if let Some(level) = options.brightness {
            self.send(Command::Brightness(level)).await?;
            self.state.brightness = Some(level);
        }

        if let Some((red, green, blue)) = options.color {
            self.send(Command::Color { red, green, blue }).await?;
        }

        if let Some(id) = options.effect {
            self.send(Command::Effect(id)).await?;
            self.state.effect = Some(id);
        }

        Ok(())
    }

    pub async fn turn_off(&mut self) -> Result<(), TransportError> {
        self.send(Command::Power(false)).await?;
        self.state.is_on = Some(false);
        Ok(())
    }

    pub async fn set_brightness(&mut self, level: u8) -> Result<(), TransportError> {
        self.send(Command::Brightness(level)).await?;
        self.state.brightness = Some(level);
        Ok(())
    }

    pub async fn set_color(&mut self, red: u8, green: u8, blue: u8) -> Result<(), TransportError> {
        self.send(Command::Color { red, green, blue }).await
    }

    pub async fn set_effect(&mut self, id: u8) -> Result<(), TransportError> {
        self.send(Command::Effect(id)).await?;
        self.state.effect = Some(id);
        Ok(())
    }
}
