//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod card_format;
pub mod card_template;
pub mod card_template_version;
pub mod merge_field;
pub mod paper_profile;
pub mod print_job;
