/// Floating point RGBA color, one per pixel of the pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32, // Red component (0.0 - 1.0)
    pub g: f32, // Green component (0.0 - 1.0)
    pub b: f32, // Blue component (0.0 - 1.0)
    pub a: f32, // Alpha component (0.0 - 1.0)
}

impl Color {
    /// Opaque color from RGB components.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from a hexadecimal string.
    /// Accepts "#RRGGBB", "RRGGBB" and the same forms with a trailing AA byte.
    pub fn from_hex(hex: &str) -> Result<Self, &'static str> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 && hex.len() != 8 {
            return Err("Hex string should be 6 or 8 characters long (RRGGBB[AA]).");
        }
        if !hex.is_ascii() {
            return Err("Hex string should only contain ASCII hex digits");
        }

        let channel = |range: std::ops::Range<usize>, err: &'static str| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| err)
        };

        let r = channel(0..2, "Invalid red component in hex")?;
        let g = channel(2..4, "Invalid green component in hex")?;
        let b = channel(4..6, "Invalid blue component in hex")?;
        let a = if hex.len() == 8 {
            channel(6..8, "Invalid alpha component in hex")?
        } else {
            1.0
        };

        Ok(Self::rgba(r, g, b, a))
    }

    const fn hex_char_to_u8(c: u8) -> u8 {
        match c {
            b'0'..=b'9' => c - b'0',
            b'a'..=b'f' => c - b'a' + 10,
            b'A'..=b'F' => c - b'A' + 10,
            _ => 0,
        }
    }

    const fn hex_pair_to_f32(high: u8, low: u8) -> f32 {
        ((Self::hex_char_to_u8(high) << 4) | Self::hex_char_to_u8(low)) as f32 / 255.0
    }

    /// Const constructor for the predefined palette. Expects exactly "RRGGBB".
    const fn hex(hex: &str) -> Self {
        let b = hex.as_bytes();
        Self::new(
            Self::hex_pair_to_f32(b[0], b[1]),
            Self::hex_pair_to_f32(b[2], b[3]),
            Self::hex_pair_to_f32(b[4], b[5]),
        )
    }

    fn channel_u8(v: f32) -> u8 {
        (v.clamp(0.0, 1.0) * 255.0) as u8
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            Self::channel_u8(self.r),
            Self::channel_u8(self.g),
            Self::channel_u8(self.b),
            Self::channel_u8(self.a),
        ]
    }

    /// 0x00RRGGBB, the layout minifb expects. Alpha is dropped.
    pub fn to_u32(&self) -> u32 {
        let [r, g, b, _] = self.to_rgba8();
        ((r as u32) << 16) | ((g as u32) << 8) | b as u32
    }

    /// Convert the color to a terminal-compatible ANSI escape sequence.
    pub fn to_ansii_escape(&self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("\x1b[38;2;{};{};{}m", r, g, b)
    }
}

// Predefined colors
impl Color {
    pub const BLACK: Color = Color::hex("000000");
    pub const WHITE: Color = Color::hex("FFFFFF");
    pub const RED: Color = Color::hex("FF0000");
    pub const GREEN: Color = Color::hex("00FF00");
    pub const BLUE: Color = Color::hex("0000FF");
    pub const YELLOW: Color = Color::hex("FFFF00");
    pub const CYAN: Color = Color::hex("00FFFF");
    pub const MAGENTA: Color = Color::hex("FF00FF");
    pub const ORANGE: Color = Color::hex("FFA500");
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}
