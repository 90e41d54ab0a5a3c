//! Lumen wire protocol - command opcodes and frame encoding
//!
//! Lights of this family accept fixed 20-byte frames on a single GATT
//! write characteristic: a `0x33` sync byte, an opcode byte, up to 17
//! payload bytes, zero padding through byte 18, and a trailing XOR
//! checksum of everything before it.

pub mod ble;

// Command opcodes
pub const OP_POWER: u8 = 0x01;
pub const OP_BRIGHTNESS: u8 = 0x04;
pub const OP_COLOR: u8 = 0x05;
pub const OP_EFFECT: u8 = 0x06;

/// Color mode tag carried as the first payload byte of a COLOR command.
/// Only manual RGB mode is used here; the encoder treats it as an opaque
/// payload byte.
pub const MODE_MANUAL: u8 = 0x02;

/// First byte of every frame.
pub const SYNC: u8 = 0x33;

/// Total frame size on the wire.
pub const FRAME_LEN: usize = 20;

/// Maximum payload size: 20 bytes minus sync, opcode and checksum.
pub const MAX_PAYLOAD_LEN: usize = 17;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("invalid command opcode {value:?}")]
    InvalidCommand { value: String },
    #[error("invalid payload byte {value:?}")]
    InvalidPayload { value: String },
    #[error("payload too long: {len} bytes, limit is 17")]
    PayloadTooLong { len: usize },
}

/// A single encoded command frame, ready for a GATT write.
///
/// Immutable once constructed; it has no identity beyond its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    /// Encode an opcode and payload into a checksummed 20-byte frame.
    pub fn encode(opcode: u8, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(FrameError::PayloadTooLong { len: payload.len() });
        }

        let mut bytes = [0u8; FRAME_LEN];
        bytes[0] = SYNC;
        bytes[1] = opcode;
        bytes[2..2 + payload.len()].copy_from_slice(payload);

        let mut checksum = 0u8;
        for b in &bytes[..FRAME_LEN - 1] {
            checksum ^= b;
        }
        bytes[FRAME_LEN - 1] = checksum;

        Ok(Self(bytes))
    }

    /// Encode from an untrusted opcode value.
    ///
    /// Opcode values wider than a byte are masked to their low 8 bits
    /// rather than rejected, so undocumented opcodes keep working however
    /// a caller represents them.
    pub fn encode_raw(opcode: u16, payload: &[u8]) -> Result<Self, FrameError> {
        Self::encode((opcode & 0xff) as u8, payload)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn opcode(&self) -> u8 {
        self.0[1]
    }
}

/// A logical command for the light, with its wire payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Power(bool),
    Brightness(u8),
    Color { red: u8, green: u8, blue: u8 },
    Effect(u8),
}

impl Command {
    pub fn opcode(&self) -> u8 {
        match self {
            Command::Power(_) => OP_POWER,
            Command::Brightness(_) => OP_BRIGHTNESS,
            Command::Color { .. } => OP_COLOR,
            Command::Effect(_) => OP_EFFECT,
        }
    }

    pub fn payload(&self) -> Vec<u8> {
        match *self {
            Command::Power(on) => vec![if on { 0x01 } else { 0x00 }],
            Command::Brightness(level) => vec![level],
            Command::Color { red, green, blue } => vec![MODE_MANUAL, red, green, blue],
            Command::Effect(id) => vec![id],
        }
    }

    /// Encode this command into its wire frame.
    pub fn frame(&self) -> Frame {
        Frame::encode(self.opcode(), &self.payload())
            .expect("known command payloads fit in a frame")
    }
}

/// Parse an opcode from untyped input: decimal or `0x`-prefixed hex.
///
/// Values wider than a byte are masked like [`Frame::encode_raw`];
/// non-numeric input fails with [`FrameError::InvalidCommand`].
pub fn parse_opcode(s: &str) -> Result<u8, FrameError> {
    let value = parse_int(s).ok_or_else(|| FrameError::InvalidCommand {
        value: s.to_string(),
    })?;
    Ok((value & 0xff) as u8)
}

/// Parse a comma-separated payload from untyped input.
///
/// Each element is a decimal or `0x`-prefixed hex byte. Unlike the opcode,
/// payload elements are validated strictly: anything non-numeric or
/// outside 0-255 fails with [`FrameError::InvalidPayload`].
pub fn parse_payload(s: &str) -> Result<Vec<u8>, FrameError> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    s.split(',')
        .map(|part| {
            let part = part.trim();
            match parse_int(part) {
                Some(v) if v <= 0xff => Ok(v as u8),
                _ => Err(FrameError::InvalidPayload {
                    value: part.to_string(),
                }),
            }
        })
        .collect()
}

fn parse_int(s: &str) -> Option<u64> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xor(bytes: &[u8]) -> u8 {
        bytes.iter().fold(0, |acc, b| acc ^ b)
    }

    #[test]
    fn frame_is_always_20_bytes() {
        for len in 0..=MAX_PAYLOAD_LEN {
            let payload = vec![0xAB; len];
            let frame = Frame::encode(OP_COLOR, &payload).unwrap();
            assert_eq!(frame.as_bytes().len(), FRAME_LEN);
        }
    }

    #[test]
    fn header_carries_sync_and_opcode() {
        let frame = Frame::encode(0x7E, &[1, 2, 3]).unwrap();
        assert_eq!(frame.as_bytes()[0], SYNC);
        assert_eq!(frame.as_bytes()[1], 0x7E);
        assert_eq!(frame.opcode(), 0x7E);
    }

    #[test]
    fn payload_is_copied_verbatim() {
        let payload = [0x02, 0xFF, 0x00, 0x80];
        let frame = Frame::encode(OP_COLOR, &payload).unwrap();
        assert_eq!(&frame.as_bytes()[2..6], &payload);
        assert!(frame.as_bytes()[6..19].iter().all(|&b| b == 0));
    }

    #[test]
    fn whole_frame_xors_to_zero() {
        // The checksum byte is the XOR of the 19 bytes before it, so
        // folding the whole frame must cancel out.
        let frame = Frame::encode(OP_COLOR, &[MODE_MANUAL, 10, 20, 30]).unwrap();
        assert_eq!(xor(frame.as_bytes()), 0);

        let frame = Frame::encode(0xFE, &[0xAA; 17]).unwrap();
        assert_eq!(xor(frame.as_bytes()), 0);
    }

    #[test]
    fn payload_length_boundary() {
        assert!(Frame::encode(OP_POWER, &[0u8; 17]).is_ok());
        assert_eq!(
            Frame::encode(OP_POWER, &[0u8; 18]),
            Err(FrameError::PayloadTooLong { len: 18 })
        );
    }

    #[test]
    fn encoding_is_deterministic() {
        let a = Frame::encode(OP_EFFECT, &[0x04]).unwrap();
        let b = Frame::encode(OP_EFFECT, &[0x04]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn power_on_frame() {
        // 33 01 01 00 .. 00 33 - checksum is 0x33 ^ 0x01 ^ 0x01
        let frame = Frame::encode(OP_POWER, &[0x01]).unwrap();
        let mut expected = [0u8; FRAME_LEN];
        expected[0] = 0x33;
        expected[1] = 0x01;
        expected[2] = 0x01;
        expected[19] = 0x33;
        assert_eq!(frame.as_bytes(), &expected[..]);
    }

    #[test]
    fn empty_payload_frame() {
        // 33 06 00 .. 00 35 - checksum is 0x33 ^ 0x06
        let frame = Frame::encode(OP_EFFECT, &[]).unwrap();
        assert_eq!(frame.as_bytes()[0], 0x33);
        assert_eq!(frame.as_bytes()[1], 0x06);
        assert!(frame.as_bytes()[2..19].iter().all(|&b| b == 0));
        assert_eq!(frame.as_bytes()[19], 0x35);
    }

    #[test]
    fn raw_opcode_is_masked() {
        let wide = Frame::encode_raw(0x101, &[]).unwrap();
        let narrow = Frame::encode(0x01, &[]).unwrap();
        assert_eq!(wide, narrow);
    }

    #[test]
    fn command_payload_shapes() {
        assert_eq!(Command::Power(true).payload(), vec![0x01]);
        assert_eq!(Command::Power(false).payload(), vec![0x00]);
        assert_eq!(Command::Brightness(200).payload(), vec![200]);
        assert_eq!(
            Command::Color { red: 10, green: 20, blue: 30 }.payload(),
            vec![MODE_MANUAL, 10, 20, 30]
        );
        assert_eq!(Command::Effect(4).payload(), vec![4]);
    }

    #[test]
    fn command_frames_use_their_opcode() {
        assert_eq!(Command::Power(true).frame().opcode(), OP_POWER);
        assert_eq!(Command::Brightness(1).frame().opcode(), OP_BRIGHTNESS);
        let color = Command::Color { red: 0, green: 0, blue: 0 };
        assert_eq!(color.frame().opcode(), OP_COLOR);
        assert_eq!(Command::Effect(0).frame().opcode(), OP_EFFECT);
    }

    #[test]
    fn parse_opcode_accepts_decimal_and_hex() {
        assert_eq!(parse_opcode("4"), Ok(OP_BRIGHTNESS));
        assert_eq!(parse_opcode("0x05"), Ok(OP_COLOR));
        // masked, not rejected
        assert_eq!(parse_opcode("0x105"), Ok(0x05));
    }

    #[test]
    fn parse_opcode_rejects_non_numeric() {
        assert_eq!(
            parse_opcode("power"),
            Err(FrameError::InvalidCommand { value: "power".to_string() })
        );
    }

    #[test]
    fn parse_payload_accepts_mixed_radix() {
        assert_eq!(
            parse_payload("0x02, 255, 0, 0x80"),
            Ok(vec![0x02, 0xFF, 0x00, 0x80])
        );
        assert_eq!(parse_payload(""), Ok(Vec::new()));
    }

    #[test]
    fn parse_payload_rejects_out_of_range_and_garbage() {
        assert_eq!(
            parse_payload("1,256,3"),
            Err(FrameError::InvalidPayload { value: "256".to_string() })
        );
        assert_eq!(
            parse_payload("1,red,3"),
            Err(FrameError::InvalidPayload { value: "red".to_string() })
        );
    }
}
