pub mod agent;
pub mod apply;
pub mod event;
pub mod goals;
pub mod map;
