pub mod app;
pub mod command;
pub mod library_view;
pub mod list_model;
pub mod theme;

pub use app::App;
pub use theme::Theme;
