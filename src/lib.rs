pub mod app;
pub mod commands;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod library;
pub mod locale;
pub mod messages;
pub mod model;
pub mod notify;
pub mod sequencer;
pub mod table;
