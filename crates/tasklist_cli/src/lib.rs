pub mod actions;
pub mod app;
pub mod cli;
pub mod logging;
pub mod render;
