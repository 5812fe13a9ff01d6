pub mod line;
pub mod normalize;

pub use line::StatusLine;
pub use normalize::normalize;
