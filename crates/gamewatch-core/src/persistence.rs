//! Persistence hook invoked after catalog mutations.

use crate::catalog::SubscriptionCatalog;

/// Receives a snapshot of the catalog after every mutation.
///
/// Saving is best effort: implementations must return promptly, must not
/// report failure to the caller, and may complete the write later. The
/// in-memory catalog stays the source of truth either way.
pub trait Persistence {
    /// Persist the current catalog.
    fn save(&mut self, catalog: &SubscriptionCatalog);
}

/// Counts save requests and keeps the most recent snapshot.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    saves: usize,
    last: Option<SubscriptionCatalog>,
}

impl MemoryPersistence {
    /// Create a store that has seen no saves.
    pub const fn new() -> Self {
        Self {
            saves: 0,
            last: None,
        }
    }

    /// Number of save requests received.
    pub const fn saves(&self) -> usize {
        self.saves
    }

    /// Most recently saved catalog.
    pub const fn last(&self) -> Option<&SubscriptionCatalog> {
        self.last.as_ref()
    }
}

impl Persistence for MemoryPersistence {
    fn save(&mut self, catalog: &SubscriptionCatalog) {
        self.saves = self.saves.saturating_add(1);
        self.last = Some(catalog.clone());
    }
}
