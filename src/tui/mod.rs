pub mod app;
pub mod debounce;
pub mod input;
pub mod modal;
pub mod render;
pub mod theme;

pub use app::run;
