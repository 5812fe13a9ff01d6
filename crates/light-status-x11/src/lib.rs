//! X11 后端：显示器拓扑查询和面板窗口

pub mod display;
pub mod panel;

pub use display::X11Display;
pub use panel::{PanelOptions, X11Panel};
