//! Update batch tracking.
//!
//! The host reports structural changes between two passes as a list of
//! [`UpdateItem`]s. The batch classifies them into inserted, deleted and
//! reloaded index sets, or collapses everything into a single whole-section
//! reload. The batch lives for one transition and is cleared on commit.

use std::collections::HashSet;

/// Kind of structural change reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateAction {
    /// An item was inserted at `index_after`.
    Insert,
    /// The item at `index_before` was removed.
    Delete,
    /// An item was reloaded in place.
    Reload,
    /// Every item was reloaded.
    ReloadSection,
}

/// One structural change.
///
/// Indices that an action does not use may be `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateItem {
    pub action: UpdateAction,
    /// Index in the previous pass.
    pub index_before: Option<usize>,
    /// Index in the new pass.
    pub index_after: Option<usize>,
}

impl UpdateItem {
    /// Marker index meaning "every item" for reloads.
    pub const WHOLE_SECTION: usize = usize::MAX;

    /// An insertion at `index`.
    pub const fn insert(index: usize) -> Self {
        Self {
            action: UpdateAction::Insert,
            index_before: None,
            index_after: Some(index),
        }
    }

    /// A deletion of the item previously at `index`.
    pub const fn delete(index: usize) -> Self {
        Self {
            action: UpdateAction::Delete,
            index_before: Some(index),
            index_after: None,
        }
    }

    /// A reload of the item at `index`.
    pub const fn reload(index: usize) -> Self {
        Self {
            action: UpdateAction::Reload,
            index_before: Some(index),
            index_after: Some(index),
        }
    }

    /// A reload of every item.
    pub const fn reload_section() -> Self {
        Self {
            action: UpdateAction::ReloadSection,
            index_before: None,
            index_after: None,
        }
    }

    fn targets_whole_section(&self) -> bool {
        match self.action {
            UpdateAction::ReloadSection => true,
            UpdateAction::Reload => {
                self.index_before == Some(Self::WHOLE_SECTION)
                    || self.index_after == Some(Self::WHOLE_SECTION)
            }
            UpdateAction::Insert | UpdateAction::Delete => false,
        }
    }
}

/// Classification of the changes between two passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateBatch {
    inserted: HashSet<usize>,
    deleted: HashSet<usize>,
    reloaded: HashSet<usize>,
    whole_section_reload: bool,
}

impl UpdateBatch {
    /// An empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every item of a host update.
    pub fn notify<'a>(&mut self, items: impl IntoIterator<Item = &'a UpdateItem>) {
        for item in items {
            self.record(item);
        }
    }

    /// Record a single update.
    pub fn record(&mut self, item: &UpdateItem) {
        if item.targets_whole_section() {
            self.mark_whole_section();
            return;
        }
        if self.whole_section_reload {
            // Per-index bookkeeping is meaningless once everything reloads.
            return;
        }

        let (set, index) = match item.action {
            UpdateAction::Insert => (&mut self.inserted, item.index_after),
            UpdateAction::Delete => (&mut self.deleted, item.index_before),
            UpdateAction::Reload => (&mut self.reloaded, item.index_after.or(item.index_before)),
            UpdateAction::ReloadSection => return self.mark_whole_section(),
        };

        match index {
            Some(index) => {
                set.insert(index);
            }
            None => tracing::warn!(
                target: "cascade::transition",
                action = ?item.action,
                "update item is missing its index, ignoring"
            ),
        }
    }

    fn mark_whole_section(&mut self) {
        self.whole_section_reload = true;
        self.inserted.clear();
        self.deleted.clear();
        self.reloaded.clear();
    }

    /// Whether the batch is a whole-section reload.
    #[inline]
    pub fn is_whole_section_reload(&self) -> bool {
        self.whole_section_reload
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        !self.whole_section_reload
            && self.inserted.is_empty()
            && self.deleted.is_empty()
            && self.reloaded.is_empty()
    }

    pub fn is_inserted(&self, index: usize) -> bool {
        self.inserted.contains(&index)
    }

    pub fn is_deleted(&self, index: usize) -> bool {
        self.deleted.contains(&index)
    }

    pub fn is_reloaded(&self, index: usize) -> bool {
        self.reloaded.contains(&index)
    }

    /// Inserted indices (new-pass numbering).
    pub fn inserted(&self) -> &HashSet<usize> {
        &self.inserted
    }

    /// Deleted indices (previous-pass numbering).
    pub fn deleted(&self) -> &HashSet<usize> {
        &self.deleted
    }

    /// Reloaded indices.
    pub fn reloaded(&self) -> &HashSet<usize> {
        &self.reloaded
    }

    /// Forget everything recorded.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_by_action() {
        let mut batch = UpdateBatch::new();
        batch.notify(&[
            UpdateItem::insert(4),
            UpdateItem::delete(2),
            UpdateItem::reload(7),
        ]);

        assert!(batch.is_inserted(4));
        assert!(batch.is_deleted(2));
        assert!(batch.is_reloaded(7));
        assert!(!batch.is_inserted(2));
        assert!(!batch.is_whole_section_reload());
        assert!(!batch.is_empty());
    }

    #[test]
    fn test_section_reload_discards_indices() {
        let mut batch = UpdateBatch::new();
        batch.notify(&[UpdateItem::insert(1), UpdateItem::reload_section()]);
        batch.record(&UpdateItem::delete(3));

        assert!(batch.is_whole_section_reload());
        assert!(batch.inserted().is_empty());
        assert!(batch.deleted().is_empty());
    }

    #[test]
    fn test_reload_with_marker_index_is_section_reload() {
        let mut batch = UpdateBatch::new();
        batch.record(&UpdateItem::reload(UpdateItem::WHOLE_SECTION));

        assert!(batch.is_whole_section_reload());
        assert!(batch.reloaded().is_empty());
    }

    #[test]
    fn test_missing_index_ignored() {
        let mut batch = UpdateBatch::new();
        batch.record(&UpdateItem {
            action: UpdateAction::Insert,
            index_before: Some(3),
            index_after: None,
        });

        assert!(batch.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut batch = UpdateBatch::new();
        batch.notify(&[UpdateItem::reload_section()]);
        batch.reset();

        assert!(batch.is_empty());
        assert_eq!(batch, UpdateBatch::default());
    }
}
