pub mod entity;
pub mod rules;
pub mod terrain;
pub mod tile;
