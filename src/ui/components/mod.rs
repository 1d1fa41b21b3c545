pub mod key_stats;
pub mod nav;
pub mod settings;
pub mod typing_area;
