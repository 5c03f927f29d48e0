// Domain entities

pub mod log_event;
pub mod model;
pub mod player;
pub mod scan;
pub mod watermark;

pub use log_event::*;
pub use model::*;
pub use player::*;
pub use scan::*;
pub use watermark::*;
