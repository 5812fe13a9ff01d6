//! 基于 tiny-skia 和 cosmic-text 的软件渲染
//!
//! 所有绘制都在 CPU 上完成，结果是一块 RGBA 像素缓冲区，由窗口后端负责上屏。

use cosmic_text::{
    Attrs, Buffer, Color as CosmicColor, FontSystem, LayoutGlyph, Metrics, Shaping, SwashCache,
};
use tiny_skia::{Color, PixmapMut};
use tracing::{debug, info};

use crate::font::{FontFamily, FontSpec};

/// 行高相对字号的比例
const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// 最近一次排版的结果；状态行每帧都会先测量再绘制同一段文本
struct ShapedText {
    text: String,
    /// (字形, 所在行的基线偏移)
    glyphs: Vec<(LayoutGlyph, f32)>,
    width: f32,
    height: f32,
}

/// 面板的像素缓冲区和字体资源
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    font: FontSpec,
    foreground: Color,
    background: Color,
    font_system: FontSystem,
    swash_cache: SwashCache,
    shaped: Option<ShapedText>,
}

impl Canvas {
    /// `fonts` 按优先级排列，使用第一个已安装的字体
    pub fn new(width: u32, height: u32, fonts: &[FontSpec], foreground: Color, background: Color) -> Self {
        let font_system = FontSystem::new();
        let font = choose_font(fonts, |name| {
            font_system
                .db()
                .faces()
                .any(|face| face.families.iter().any(|(family, _)| family.eq_ignore_ascii_case(name)))
        });
        info!(?font, "font selected");
        debug!(width, height, "creating canvas");

        Self {
            width,
            height,
            pixels: vec![0u8; buffer_len(width, height)],
            font,
            foreground,
            background,
            font_system,
            swash_cache: SwashCache::new(),
            shaped: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA 像素
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn fill_background(&mut self) {
        if let Some(mut pixmap) = PixmapMut::from_bytes(&mut self.pixels, self.width, self.height) {
            pixmap.fill(self.background);
        }
    }

    /// 测量文本，结果向上取整到整像素
    pub fn measure_text(&mut self, text: &str) -> (i32, i32) {
        let (width, height) = self.shape(text);
        (width.ceil() as i32, height.ceil() as i32)
    }

    /// 以 (x, y) 为文本框左上角绘制
    pub fn draw_text(&mut self, text: &str, x: i32, y: i32) {
        self.shape(text);
        let Some(shaped) = self.shaped.as_ref() else {
            return;
        };

        let color = self.foreground.to_color_u8();
        let text_color = CosmicColor::rgba(color.red(), color.green(), color.blue(), color.alpha());

        for (glyph, line_y) in &shaped.glyphs {
            let physical = glyph.physical((x as f32, y as f32 + line_y), 1.0);

            if let Some(image) = self
                .swash_cache
                .get_image(&mut self.font_system, physical.cache_key)
            {
                blend_glyph(
                    &mut self.pixels,
                    self.width,
                    self.height,
                    &image.data,
                    image.placement.width,
                    image.placement.height,
                    physical.x + image.placement.left,
                    physical.y - image.placement.top,
                    text_color,
                );
            }
        }
    }

    /// 排版文本并缓存，返回 (宽, 高)
    fn shape(&mut self, text: &str) -> (f32, f32) {
        if let Some(shaped) = self.shaped.as_ref().filter(|s| s.text == text) {
            return (shaped.width, shaped.height);
        }

        let shaped = layout(&mut self.font_system, &self.font, text);
        let size = (shaped.width, shaped.height);
        self.shaped = Some(shaped);
        size
    }
}

/// RGBA 缓冲区字节数
fn buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

/// 取第一个可用的字体；通用族总是可用，都不可用时退回第一项交给字体系统替换
fn choose_font(fonts: &[FontSpec], installed: impl Fn(&str) -> bool) -> FontSpec {
    fonts
        .iter()
        .find(|font| match &font.family {
            FontFamily::Named(name) => installed(name),
            _ => true,
        })
        .or_else(|| fonts.first())
        .cloned()
        .unwrap_or_default()
}

fn layout(font_system: &mut FontSystem, font: &FontSpec, text: &str) -> ShapedText {
    let metrics = Metrics::new(font.size, font.size * LINE_HEIGHT_FACTOR);
    let mut buffer = Buffer::new(font_system, metrics);
    let attrs = Attrs::new().family(font.family.as_family());
    buffer.set_text(font_system, text, &attrs, Shaping::Advanced, None);
    buffer.shape_until_scroll(font_system, false);

    let mut glyphs = Vec::new();
    let mut width = 0.0f32;
    let mut height = 0.0f32;
    for run in buffer.layout_runs() {
        width = width.max(run.line_w);
        height += run.line_height;
        glyphs.extend(run.glyphs.iter().map(|g| (g.clone(), run.line_y)));
    }

    ShapedText {
        text: text.to_string(),
        glyphs,
        width,
        height,
    }
}

/// 将字形的 alpha 遮罩混合到 RGBA 缓冲区，越界部分裁掉
#[allow(clippy::too_many_arguments)]
fn blend_glyph(
    data: &mut [u8],
    width: u32,
    height: u32,
    glyph: &[u8],
    glyph_width: u32,
    glyph_height: u32,
    dest_x: i32,
    dest_y: i32,
    color: CosmicColor,
) {
    let (width, height) = (width as i32, height as i32);

    for gy in 0..glyph_height as i32 {
        let py = dest_y + gy;
        if py < 0 || py >= height {
            continue;
        }

        for gx in 0..glyph_width as i32 {
            let px = dest_x + gx;
            if px < 0 || px >= width {
                continue;
            }

            let Some(&alpha) = glyph.get((gy * glyph_width as i32 + gx) as usize) else {
                continue;
            };
            if alpha == 0 {
                continue;
            }

            let idx = ((py * width + px) * 4) as usize;
            let Some(pixel) = data.get_mut(idx..idx + 4) else {
                continue;
            };

            let src_a = alpha as u32 * color.a() as u32 / 255;
            let inv_a = 255 - src_a;
            pixel[0] = ((color.r() as u32 * src_a + pixel[0] as u32 * inv_a) / 255) as u8;
            pixel[1] = ((color.g() as u32 * src_a + pixel[1] as u32 * inv_a) / 255) as u8;
            pixel[2] = ((color.b() as u32 * src_a + pixel[2] as u32 * inv_a) / 255) as u8;
            pixel[3] = (src_a + pixel[3] as u32 * inv_a / 255) as u8;
        }
    }
}
