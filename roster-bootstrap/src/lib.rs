pub mod context;
pub mod lifecycle;

pub use lifecycle::{run_daemon, run_list};
