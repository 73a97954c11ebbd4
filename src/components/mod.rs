//! The components module contains all shared components for our app.

mod app;
mod icons;
mod library;
mod player_view;

pub use app::*;
pub use icons::*;
pub use library::*;
pub use player_view::*;
