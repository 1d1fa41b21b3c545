pub mod input;
pub mod practice;
