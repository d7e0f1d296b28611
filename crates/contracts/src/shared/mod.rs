pub mod chart;
pub mod table;

pub use chart::*;
pub use table::*;
