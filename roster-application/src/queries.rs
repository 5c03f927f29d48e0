pub mod roster_queries;

pub use roster_queries::*;
