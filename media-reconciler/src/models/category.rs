//! Storage categories (buckets) and their canonical mapping
//!
//! The category set is closed: every media object lives in exactly one of
//! the five buckets below, and every subject maps to exactly one canonical
//! bucket based on its affiliation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the fixed storage buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Independent subjects (no affiliation)
    Avatars,
    /// Trainer-managed subjects
    Trainer,
    /// Club-managed subjects
    Club,
    /// Academy-managed subjects
    Academy,
    /// Agent-managed subjects
    Agent,
}

impl Category {
    /// All categories in enumeration order.
    ///
    /// This order is stable: it drives the non-canonical tail of the scan
    /// sweep and the ordering of report sections.
    pub const ALL: [Category; 5] = [
        Category::Avatars,
        Category::Trainer,
        Category::Club,
        Category::Academy,
        Category::Agent,
    ];

    /// Bucket name in the object store.
    pub fn bucket(&self) -> &'static str {
        match self {
            Category::Avatars => "avatars",
            Category::Trainer => "playertrainer",
            Category::Club => "playerclub",
            Category::Academy => "playeracademy",
            Category::Agent => "playeragent",
        }
    }

    /// Account-type label used in reports and CLI filters.
    pub fn account_type(&self) -> &'static str {
        match self {
            Category::Avatars => "independent",
            Category::Trainer => "trainer",
            Category::Club => "club",
            Category::Academy => "academy",
            Category::Agent => "agent",
        }
    }

    /// Index into [`Category::ALL`].
    pub fn index(&self) -> usize {
        Category::ALL.iter().position(|c| c == self).unwrap_or(0)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bucket())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Parses either a bucket name or an account-type label.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.bucket() == s || c.account_type() == s)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_names_are_stable() {
        assert_eq!(Category::Avatars.bucket(), "avatars");
        assert_eq!(Category::Trainer.bucket(), "playertrainer");
        assert_eq!(Category::Club.bucket(), "playerclub");
        assert_eq!(Category::Academy.bucket(), "playeracademy");
        assert_eq!(Category::Agent.bucket(), "playeragent");
    }

    #[test]
    fn enumeration_order_is_stable() {
        let buckets: Vec<&str> = Category::ALL.iter().map(|c| c.bucket()).collect();
        assert_eq!(
            buckets,
            vec!["avatars", "playertrainer", "playerclub", "playeracademy", "playeragent"]
        );
    }

    #[test]
    fn parses_bucket_and_label() {
        assert_eq!("playerclub".parse::<Category>().unwrap(), Category::Club);
        assert_eq!("independent".parse::<Category>().unwrap(), Category::Avatars);
        assert_eq!("TRAINER".parse::<Category>().unwrap(), Category::Trainer);
        assert!("stadium".parse::<Category>().is_err());
    }

    #[test]
    fn index_round_trips() {
        for (i, cat) in Category::ALL.iter().enumerate() {
            assert_eq!(cat.index(), i);
        }
    }
}
