pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod domain;
pub mod panel;
pub mod shared;
pub mod tui;
