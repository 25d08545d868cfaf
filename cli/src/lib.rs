pub mod api;
pub mod commands;
pub mod config;
pub mod date;
pub mod error;
pub mod fetcher;
pub mod html;
pub mod logger;
mod runner;
pub mod sink;
pub mod writer;
