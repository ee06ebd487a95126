//! Data model: categories, subjects, and migration tasks

pub mod category;
pub mod subject;

pub use category::Category;
pub use subject::Subject;

/// Ephemeral unit of work: move one object between categories.
///
/// Created when the scanner finds a misplaced object, consumed by the
/// relocator, and discarded once the pointer update has been attempted.
#[derive(Debug, Clone)]
pub struct MigrationTask {
    pub subject_id: String,
    pub source: Category,
    pub target: Category,
    pub object_key: String,
}
