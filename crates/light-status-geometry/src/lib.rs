pub mod align;
pub mod error;
pub mod monitor;
mod number;
pub mod position;
pub mod rect;

pub use align::{Align, Alignment};
pub use error::ParseError;
pub use monitor::{MonitorSelection, MonitorSpec};
pub use position::{Anchor, MousePosition};
pub use rect::Rect;
