//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod card_format_repo;
pub mod card_template_repo;
pub mod card_template_version_repo;
pub mod merge_field_repo;
pub mod paper_profile_repo;
pub mod print_job_repo;

pub use card_format_repo::CardFormatRepo;
pub use card_template_repo::CardTemplateRepo;
pub use card_template_version_repo::CardTemplateVersionRepo;
pub use merge_field_repo::MergeFieldRepo;
pub use paper_profile_repo::PaperProfileRepo;
pub use print_job_repo::PrintJobRepo;
