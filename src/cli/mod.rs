pub mod app;
pub mod classify;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod output;
pub mod patterns;
pub mod pick;
pub mod runtime;

pub use classify::{cmd_classify, ClassifyArgs};
pub use config::{cmd_config, ConfigArgs};
pub use pick::{cmd_pick, PickArgs};
