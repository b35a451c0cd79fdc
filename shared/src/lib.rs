pub mod chronology;
pub mod colors;
pub mod coordinator;
pub mod geo;
pub mod overlay;
pub mod snapshot;
pub mod topology;

pub use chronology::{MAX_YEAR, MIN_YEAR, YEAR_STEP, clamp_year, format_year};
pub use colors::empire_color;
pub use coordinator::ViewerState;
pub use geo::MapProjection;
pub use snapshot::*;
pub use topology::WorldTopology;
