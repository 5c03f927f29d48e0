pub mod scan_commands;

pub use scan_commands::*;
