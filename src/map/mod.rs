pub mod geometry;
mod projection;
mod renderer;

pub use geometry::ring_contains;
pub use projection::Viewport;
pub use renderer::{MapLabel, MapLayers, MapRenderer, ACCENT, BREAKPOINTS, NO_DATA, PALETTE};
