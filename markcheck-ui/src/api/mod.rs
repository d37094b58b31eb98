//! HTTP API handlers for markcheck-ui

pub mod buildinfo;
pub mod datasheets;
pub mod detections;
pub mod health;
pub mod inspections;
pub mod settings;
pub mod ui;

pub use datasheets::datasheet_routes;
pub use detections::detection_routes;
pub use health::health_routes;
pub use inspections::inspection_routes;
pub use settings::settings_routes;
pub use ui::ui_routes;
