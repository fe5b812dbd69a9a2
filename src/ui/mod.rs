//! egui front end

pub mod app;
pub mod components;
pub mod theme;

pub use app::MealVoiceApp;
pub use theme::Theme;
