pub mod press_bus;
pub mod scheme;
pub mod tile;
pub mod timer;
