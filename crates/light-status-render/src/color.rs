use thiserror::Error;

pub use tiny_skia::Color;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color `{0}`, expected #rrggbb or #rrggbbaa")]
pub struct ColorError(pub String);

/// 解析 `#rrggbb` / `#rrggbbaa`
pub fn parse_color(s: &str) -> Result<Color, ColorError> {
    let err = || ColorError(s.to_string());
    let hex = s.strip_prefix('#').ok_or_else(err)?;
    if !matches!(hex.len(), 6 | 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(err());
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
    let alpha = if hex.len() == 8 { channel(6)? } else { 0xFF };
    Ok(Color::from_rgba8(channel(0)?, channel(2)?, channel(4)?, alpha))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        let white = parse_color("#ffffff").unwrap();
        assert_eq!(white.to_color_u8().red(), 255);
        assert_eq!(white.to_color_u8().alpha(), 255);

        let c = parse_color("#000fff80").unwrap().to_color_u8();
        assert_eq!((c.red(), c.green(), c.blue(), c.alpha()), (0x00, 0x0f, 0xff, 0x80));
    }

    #[test]
    fn rejects_malformed_colors() {
        for input in ["ffffff", "#fff", "#gggggg", "#12345", "", "#ffffff0"] {
            assert_eq!(parse_color(input), Err(ColorError(input.to_string())), "{input}");
        }
    }
}
