//! Terminal typing trainer with a per-key speed keyboard.

pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod generator;
pub mod keyboard;
pub mod logging;
pub mod session;
pub mod store;
pub mod ui;
