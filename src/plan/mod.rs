//! From intent to commands: pick a route, then compile it to steps.

pub mod compile;
pub mod planner;
