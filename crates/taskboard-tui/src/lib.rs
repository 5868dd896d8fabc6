pub mod app;
pub mod dialog;
pub mod events;
pub mod form;
pub mod popup;
pub mod theme;
pub mod ui;

pub use app::{install_panic_hook, App, AppMode};
pub use form::{FormPresentation, TaskForm};
