// Read Later services
// Services derive what the user sees: projections, badge, theme assets, settings, export/import.

pub mod badge_presenter;
pub mod list_exchange;
pub mod settings_engine;
pub mod theme_engine;
pub mod view_projector;
