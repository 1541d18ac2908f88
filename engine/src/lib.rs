pub mod app;
pub mod graphics;

pub use app::{run_app, App, AppConfig, AppFlow};
pub use graphics::{Color, Frame, Sprite};
