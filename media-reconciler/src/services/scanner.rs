//! Category scanner
//!
//! Sweeps the categories for one subject and reports where its media object
//! currently lives. The canonical category is probed first: an object that
//! is where it belongs is trusted even when a stale copy survives elsewhere
//! from an earlier half-finished migration (expected dual-presence). The
//! remaining categories follow in enumeration order.
//!
//! Pacing between probes is the caller's policy: the scanner invokes the
//! supplied pacer after every miss but holds no delay constants itself.

use crate::models::Category;
use crate::services::locator::Locator;
use crate::utils::Pacer;

/// Where a subject's media object was found.
#[derive(Debug, Clone)]
pub struct ScanHit {
    pub category: Category,
    pub key: String,
    pub public_url: String,
}

pub struct Scanner<'a> {
    locator: Locator<'a>,
}

impl<'a> Scanner<'a> {
    pub fn new(locator: Locator<'a>) -> Self {
        Self { locator }
    }

    /// Scan order for a given canonical category: canonical first, then the
    /// rest in enumeration order.
    pub fn scan_order(canonical: Category) -> impl Iterator<Item = Category> {
        std::iter::once(canonical)
            .chain(Category::ALL.into_iter().filter(move |c| *c != canonical))
    }

    /// Find the category currently holding the subject's media object.
    ///
    /// Stops at the first hit. `None` means the subject has no media in any
    /// category, a valid terminal state rather than an error.
    pub async fn scan(
        &self,
        subject_id: &str,
        canonical: Category,
        pacer: &Pacer,
    ) -> Option<ScanHit> {
        for category in Self::scan_order(canonical) {
            if let Some(found) = self.locator.locate(subject_id, category).await {
                return Some(ScanHit {
                    category,
                    key: found.key,
                    public_url: found.public_url,
                });
            }

            pacer.between_requests().await;
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_order_puts_canonical_first() {
        let order: Vec<Category> = Scanner::scan_order(Category::Academy).collect();
        assert_eq!(
            order,
            vec![
                Category::Academy,
                Category::Avatars,
                Category::Trainer,
                Category::Club,
                Category::Agent,
            ]
        );
    }

    #[test]
    fn scan_order_covers_every_category_once() {
        for canonical in Category::ALL {
            let order: Vec<Category> = Scanner::scan_order(canonical).collect();
            assert_eq!(order.len(), Category::ALL.len());
            for category in Category::ALL {
                assert_eq!(order.iter().filter(|c| **c == category).count(), 1);
            }
        }
    }
}
