//! Category classifier
//!
//! Pure mapping from a subject's affiliation fields to its canonical storage
//! category. Priority is a fixed ordered rule list, first match wins:
//! trainer > club > agent > academy, otherwise independent. Legacy camelCase
//! spellings of the affiliation fields count the same as the canonical ones.

use crate::models::{Category, Subject};

/// Ordered classification rules: (field spellings, category).
const RULES: [(&[&str], Category); 4] = [
    (&["trainer_id", "trainerId"], Category::Trainer),
    (&["club_id", "clubId"], Category::Club),
    (&["agent_id", "agentId"], Category::Agent),
    (&["academy_id", "academyId"], Category::Academy),
];

/// Canonical category for a subject. Total: always exactly one category.
pub fn classify(subject: &Subject) -> Category {
    for (fields, category) in RULES {
        if subject.any_field_set(fields) {
            return category;
        }
    }
    Category::Avatars
}
