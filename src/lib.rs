pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod sensor;
pub mod sysfs;
pub mod watcher;
