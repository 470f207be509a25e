#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
    /// Takes the low 24 bits of `value` as `0xRRGGBB`.
    pub const fn from_u32(value: u32) -> Self {
        Self {
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        }
    }
    pub fn as_u32(&self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | (self.b as u32)
    }
    pub fn to_style(&self) -> String {
        to_style(self.as_u32())
    }
}

/// `#rrggbb` form of a 24-bit color, as accepted by canvas fill and stroke
/// styles.
pub fn to_style(value: u32) -> String {
    format!("#{:06x}", value & 0x00ff_ffff)
}
