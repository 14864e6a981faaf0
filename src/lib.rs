pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod event;
pub mod identity;
pub mod logging;
pub mod orchestrator;
pub mod service;
pub mod settings;
pub mod state;
pub mod task;
pub mod ui;
pub mod utils;
pub mod version;

pub use error::{Error, Result};
