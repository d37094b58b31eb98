//! Database access for markcheck-ui
//!
//! One module per entity. Schema creation lives in markcheck-common so the
//! same database can be shared by other tooling.

pub mod datasheets;
pub mod detections;
pub mod inspections;
pub mod settings;
