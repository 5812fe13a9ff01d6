use std::str::FromStr;

use cosmic_text::Family;
use thiserror::Error;

/// 点数换算像素时使用的 DPI
const SCREEN_DPI: f32 = 96.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FontError {
    #[error("font pattern `{0}` has no family name")]
    MissingFamily(String),

    #[error("invalid font size in `{0}`")]
    InvalidSize(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontFamily {
    Monospace,
    SansSerif,
    Serif,
    Named(String),
}

impl FontFamily {
    pub fn as_family(&self) -> Family<'_> {
        match self {
            FontFamily::Monospace => Family::Monospace,
            FontFamily::SansSerif => Family::SansSerif,
            FontFamily::Serif => Family::Serif,
            FontFamily::Named(name) => Family::Name(name),
        }
    }
}

/// 字体模式 `<family>[:size=<pt>][:pixelsize=<px>]`
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: FontFamily,
    /// 像素大小
    pub size: f32,
}

impl FontSpec {
    pub fn from_points(family: FontFamily, points: f32) -> Self {
        Self {
            family,
            size: points_to_pixels(points),
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::from_points(FontFamily::Monospace, 12.0)
    }
}

impl FromStr for FontSpec {
    type Err = FontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let name = parts.next().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(FontError::MissingFamily(s.to_string()));
        }

        let family = match name.to_ascii_lowercase().as_str() {
            "monospace" | "mono" => FontFamily::Monospace,
            "sans" | "sans-serif" | "sansserif" => FontFamily::SansSerif,
            "serif" => FontFamily::Serif,
            _ => FontFamily::Named(name.to_string()),
        };

        let mut size = FontSpec::default().size;
        for property in parts {
            let Some((key, value)) = property.split_once('=') else {
                continue;
            };
            let parse_size = || {
                value
                    .trim()
                    .parse::<f32>()
                    .ok()
                    .filter(|v| v.is_finite() && *v > 0.0)
                    .ok_or_else(|| FontError::InvalidSize(s.to_string()))
            };
            match key.trim() {
                "size" => size = points_to_pixels(parse_size()?),
                "pixelsize" => size = parse_size()?,
                // 其余属性（weight、antialias 等）忽略
                _ => {}
            }
        }

        Ok(Self { family, size })
    }
}

fn points_to_pixels(points: f32) -> f32 {
    points * SCREEN_DPI / 72.0
}
