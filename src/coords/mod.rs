mod frame;
mod pm;
mod sky;

pub use frame::Frame;
pub use pm::ProperMotions;
pub use sky::SkyCoord;
