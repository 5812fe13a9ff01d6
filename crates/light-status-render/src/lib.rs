pub mod canvas;
pub mod color;
pub mod font;
pub mod producer;
pub mod render_loop;
pub mod surface;

pub use canvas::Canvas;
pub use color::{parse_color, Color, ColorError};
pub use font::{FontError, FontFamily, FontSpec};
pub use producer::Producer;
pub use render_loop::{LoopState, RenderLoop, Termination};
pub use surface::Surface;
