pub mod overlay;
pub mod theme;

pub use overlay::{Overlay, OverlayInfo};
