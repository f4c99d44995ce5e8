pub mod backend;
pub mod config_io;
pub mod lock;
pub mod prefs;
pub mod recovery;
pub mod store;
