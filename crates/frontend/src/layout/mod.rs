pub mod global_context;
pub mod sidebar;

pub use global_context::AppGlobalContext;
