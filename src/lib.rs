pub mod action;
pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod entry;
pub mod feeds;
pub mod loader;
pub mod menu;
pub mod mode;
pub mod page;
pub mod tui;
pub mod utils;
