pub mod query;
pub mod resolve;

pub use query::DisplayQuery;
pub use resolve::{resolve_target_rect, RegionSource, TargetRegion};
