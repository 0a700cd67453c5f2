//! HTTP handlers, one module per feature area.

pub mod card_formats;
pub mod merge_fields;
pub mod paper_profiles;
pub mod preview;
pub mod print_jobs;
pub mod templates;
