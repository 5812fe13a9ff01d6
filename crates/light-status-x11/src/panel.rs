use anyhow::{bail, Context, Result};
use light_status_geometry::Rect;
use light_status_render::{Canvas, Surface};
use tracing::{debug, warn};
use x11rb::atom_manager;
use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use crate::display::X11Display;

/// PutImage 请求头所占字节
const PUT_IMAGE_HEADER: usize = 24;

atom_manager! {
    pub AtomCollection: AtomCollectionCookie {
        _NET_WM_NAME,
        _NET_WM_WINDOW_TYPE,
        _NET_WM_WINDOW_TYPE_UTILITY,
        UTF8_STRING,
        ATOM,
    }
}

/// 面板窗口参数
#[derive(Debug, Clone)]
pub struct PanelOptions<'a> {
    /// 屏幕空间中的绝对位置和尺寸
    pub rect: Rect,
    pub name: &'a str,
    pub class: &'a str,
}

/// 置顶的状态面板窗口
///
/// 窗口和 GC 在 drop 时释放，连接本身由 [`X11Display`] 持有。
pub struct X11Panel<'a> {
    conn: &'a RustConnection,
    window: Window,
    gc: Gcontext,
    depth: u8,
    canvas: Canvas,
    /// 上屏用的 BGRX 缓冲区
    image: Vec<u8>,
}

impl<'a> X11Panel<'a> {
    pub fn create(display: &'a X11Display, options: &PanelOptions<'_>, canvas: Canvas) -> Result<Self> {
        let conn = display.connection();
        let screen = display.screen();
        let rect = options.rect;

        let depth = screen.root_depth;
        let bpp = conn
            .setup()
            .pixmap_formats
            .iter()
            .find(|format| format.depth == depth)
            .map(|format| format.bits_per_pixel);
        if bpp != Some(32) {
            bail!("unsupported visual: depth {depth} with {bpp:?} bits per pixel");
        }
        if conn.setup().image_byte_order != ImageOrder::LSB_FIRST {
            bail!("unsupported visual: big-endian image byte order");
        }

        let atoms = AtomCollection::new(conn)?.reply()?;

        let window = conn.generate_id()?;
        let win_aux = CreateWindowAux::new()
            .background_pixel(screen.black_pixel)
            .override_redirect(1);
        conn.create_window(
            depth,
            window,
            screen.root,
            i16::try_from(rect.x).context("panel x out of range")?,
            i16::try_from(rect.y).context("panel y out of range")?,
            u16::try_from(rect.w).context("panel width out of range")?,
            u16::try_from(rect.h).context("panel height out of range")?,
            0,
            WindowClass::INPUT_OUTPUT,
            screen.root_visual,
            &win_aux,
        )
        .context("failed to create panel window")?;

        // 名称、类名和窗口类型提示
        conn.change_property8(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_NAME,
            AtomEnum::STRING,
            options.name.as_bytes(),
        )?;
        conn.change_property8(
            PropMode::REPLACE,
            window,
            atoms._NET_WM_NAME,
            atoms.UTF8_STRING,
            options.name.as_bytes(),
        )?;
        conn.change_property8(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_CLASS,
            AtomEnum::STRING,
            wm_class(options.name, options.class).as_bytes(),
        )?;
        conn.change_property32(
            PropMode::REPLACE,
            window,
            atoms._NET_WM_WINDOW_TYPE,
            atoms.ATOM,
            &[atoms._NET_WM_WINDOW_TYPE_UTILITY],
        )?;

        let gc = conn.generate_id()?;
        conn.create_gc(gc, window, &CreateGCAux::new())?;

        conn.map_window(window)?;
        conn.flush()?;
        debug!(window, %rect, "panel window mapped");

        let image = vec![0u8; canvas.pixels().len()];
        Ok(Self {
            conn,
            window,
            gc,
            depth,
            canvas,
            image,
        })
    }

    /// 按最大请求长度分块上传图像
    fn put_image(&self) -> Result<()> {
        let width = self.canvas.width() as usize;
        let height = self.canvas.height() as usize;
        let stride = width * 4;
        if stride == 0 || height == 0 {
            return Ok(());
        }

        let max_bytes = self.conn.maximum_request_bytes().saturating_sub(PUT_IMAGE_HEADER);
        let rows_per_chunk = (max_bytes / stride).max(1);

        for (chunk, rows) in self.image.chunks(rows_per_chunk * stride).enumerate() {
            self.conn.put_image(
                ImageFormat::Z_PIXMAP,
                self.window,
                self.gc,
                width as u16,
                (rows.len() / stride) as u16,
                0,
                (chunk * rows_per_chunk) as i16,
                0,
                self.depth,
                rows,
            )?;
        }
        Ok(())
    }
}

impl Surface for X11Panel<'_> {
    fn clear(&mut self) -> Result<()> {
        self.conn.clear_area(false, self.window, 0, 0, 0, 0)?;
        Ok(())
    }

    fn fill_background(&mut self) {
        self.canvas.fill_background();
    }

    fn measure_text(&mut self, text: &str) -> (i32, i32) {
        self.canvas.measure_text(text)
    }

    fn draw_text(&mut self, text: &str, rect: Rect) {
        self.canvas.draw_text(text, rect.x, rect.y);
    }

    fn flush(&mut self) -> Result<()> {
        rgba_to_bgrx(self.canvas.pixels(), &mut self.image);
        self.put_image()?;
        self.conn.flush()?;
        Ok(())
    }
}

impl Drop for X11Panel<'_> {
    fn drop(&mut self) {
        let _ = self.conn.free_gc(self.gc);
        if let Err(e) = self.conn.destroy_window(self.window) {
            warn!("failed to destroy panel window: {e}");
        }
        let _ = self.conn.flush();
    }
}

/// WM_CLASS 的格式：`instance\0class\0`
fn wm_class(name: &str, class: &str) -> String {
    format!("{name}\0{class}\0")
}

/// RGBA → X server 的 32 位小端 BGRX
fn rgba_to_bgrx(src: &[u8], dst: &mut [u8]) {
    for (from, to) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
        to[0] = from[2];
        to[1] = from[1];
        to[2] = from[0];
        to[3] = from[3];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_red_and_blue() {
        let src = [1, 2, 3, 4, 10, 20, 30, 40];
        let mut dst = [0u8; 8];
        rgba_to_bgrx(&src, &mut dst);
        assert_eq!(dst, [3, 2, 1, 4, 30, 20, 10, 40]);
    }

    #[test]
    fn wm_class_is_two_nul_terminated_strings() {
        assert_eq!(wm_class("light-status", "LightStatus"), "light-status\0LightStatus\0");
    }
}
