//! Screen implementations

mod context_select;
mod fs_browser;
mod pod_table;

pub use context_select::ContextSelectScreen;
pub use fs_browser::FsBrowserScreen;
pub use pod_table::PodTableScreen;
