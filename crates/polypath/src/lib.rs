pub mod path;
pub mod winding;

pub use path::{ClosedPath, PathError, PARALLEL_THRESHOLD};
pub use winding::FillRule;
