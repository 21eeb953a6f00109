//! kdense-tools
//!
//! The static catalog of external analysis tools and the planner that picks
//! the ones relevant to a query. Nothing here ever calls a tool.

pub mod catalog;
pub mod planner;

pub use catalog::ToolCatalog;
pub use planner::ToolPlanner;
