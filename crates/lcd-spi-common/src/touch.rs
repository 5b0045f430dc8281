/// One touchscreen sample, as produced by the touch controller.
///
/// Values are passed through unmodified; no calibration is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchSample {
    pub x: u16,
    pub y: u16,
    pub z: u16,
}

impl TouchSample {
    /// Size of the sample on the wire
    pub const SIZE: usize = 6;

    pub fn new(x: u16, y: u16, z: u16) -> Self {
        TouchSample { x, y, z }
    }

    pub fn to_bytes(&self) -> [u8; 6] {
        let mut bytes = [0u8; 6];
        bytes[0..2].copy_from_slice(&self.x.to_le_bytes());
        bytes[2..4].copy_from_slice(&self.y.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.z.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8; 6]) -> Self {
        TouchSample {
            x: u16::from_le_bytes([bytes[0], bytes[1]]),
            y: u16::from_le_bytes([bytes[2], bytes[3]]),
            z: u16::from_le_bytes([bytes[4], bytes[5]]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_sample_wire_order() {
        let sample = TouchSample::new(0x0123, 0x0456, 0x0789);
        assert_eq!(sample.to_bytes(), [0x23, 0x01, 0x56, 0x04, 0x89, 0x07]);
    }
}
