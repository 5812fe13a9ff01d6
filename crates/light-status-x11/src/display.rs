use anyhow::{bail, Context, Result};
use light_status_geometry::Rect;
use light_status_screen::DisplayQuery;
use tracing::info;
use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::xinerama::{self, ConnectionExt as _};
use x11rb::protocol::xproto::{ConnectionExt as _, Screen};
use x11rb::rust_connection::RustConnection;

/// X server 连接
pub struct X11Display {
    conn: RustConnection,
    screen_num: usize,
}

impl X11Display {
    /// 连接 `$DISPLAY`
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None).context("could not open display")?;
        info!(screen_num, "connected to X server");
        Ok(Self { conn, screen_num })
    }

    pub fn connection(&self) -> &RustConnection {
        &self.conn
    }

    /// 默认屏幕
    pub fn screen(&self) -> &Screen {
        &self.conn.setup().roots[self.screen_num]
    }
}

impl DisplayQuery for X11Display {
    fn monitors(&self) -> Result<Vec<Rect>> {
        if self
            .conn
            .extension_information(xinerama::X11_EXTENSION_NAME)?
            .is_none()
        {
            bail!("Xinerama not supported");
        }
        if self.conn.xinerama_is_active()?.reply()?.state == 0 {
            bail!("Xinerama not active");
        }

        let screens = self
            .conn
            .xinerama_query_screens()?
            .reply()
            .context("XineramaQueryScreens failed")?;
        Ok(screens.screen_info.iter().map(screen_rect).collect())
    }

    fn pointer(&self) -> Result<(i32, i32)> {
        let reply = self
            .conn
            .query_pointer(self.screen().root)?
            .reply()
            .context("XQueryPointer failed")?;
        if !reply.same_screen {
            bail!("pointer is not on the default screen");
        }
        Ok((reply.root_x.into(), reply.root_y.into()))
    }

    fn default_screen(&self) -> usize {
        self.screen_num
    }

    fn default_screen_size(&self) -> (i32, i32) {
        let screen = self.screen();
        (screen.width_in_pixels.into(), screen.height_in_pixels.into())
    }
}

fn screen_rect(info: &xinerama::ScreenInfo) -> Rect {
    Rect::new(
        info.x_org.into(),
        info.y_org.into(),
        info.width.into(),
        info.height.into(),
    )
}
