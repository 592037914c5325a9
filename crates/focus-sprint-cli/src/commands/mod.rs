pub mod config;
pub mod lang;
pub mod settings;
pub mod task;
pub mod timer;
