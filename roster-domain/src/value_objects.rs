// Domain value objects
pub mod identifiers;
pub mod log_time;

pub use identifiers::*;
pub use log_time::*;
