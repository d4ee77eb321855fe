//! The ordered card collection and its persistence slot.
//!
//! [`CollectionStore`] is the only owner of the cards. Every completed
//! mutation re-serializes the whole collection and overwrites the slot
//! (immediately, or after a short delay with [`SavePolicy::Deferred`]).
//! When the slot holds nothing, the fixed seed set is shown without being
//! written until the first mutation.

pub mod card;
pub mod format;
pub mod reorder;
pub mod slot;

use std::io;
use std::time::{Duration, Instant};
use thiserror::Error;

pub use card::{lowest_free_id, seed_cards, Card, CardDraft, DraftError, IdGenerator};
pub use reorder::{move_element, ReorderGesture};
pub use slot::{FileSlot, Slot};

/// Suffix of the key a corrupted collection is moved to before the seed set replaces it
pub const BACKUP_SUFFIX: &str = ".corrupt";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Could not save to {location}: {source}")]
    Write {
        location: String,
        #[source]
        source: io::Error,
    },
    #[error("Could not remove {location}: {source}")]
    Remove {
        location: String,
        #[source]
        source: io::Error,
    },
    #[error("Could not encode collection: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] DraftError),
}

/// When a completed mutation reaches the slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavePolicy {
    /// Save before the mutating call returns
    Immediate,
    /// Mark dirty; `flush_due` saves once `delay` has passed since the first unsaved change
    Deferred { delay: Duration },
}

/// Where the cards came from when the store was opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    Stored,
    Seeded,
    /// The slot could not be read or decoded; the seed set replaced it
    Recovered {
        reason: String,
        backup: Option<String>,
    },
}

pub struct CollectionStore {
    slot: Box<dyn Slot>,
    key: String,
    cards: Vec<Card>,
    ids: IdGenerator,
    policy: SavePolicy,
    origin: LoadOrigin,
    dirty_since: Option<Instant>,
    save_failed: bool,
}

impl CollectionStore {
    /// Load the collection from `key`, falling back to the seed set.
    ///
    /// Never fails: an unreadable or undecodable slot is reported through
    /// [`LoadOrigin::Recovered`] instead.
    pub fn open(mut slot: Box<dyn Slot>, key: impl Into<String>, policy: SavePolicy) -> Self {
        let key = key.into();
        let (cards, origin) = Self::load(slot.as_mut(), &key);

        match &origin {
            LoadOrigin::Stored => tracing::info!("Loaded {} cards from {}", cards.len(), slot.locate(&key)),
            LoadOrigin::Seeded => tracing::info!("No saved collection at {}, showing defaults", slot.locate(&key)),
            LoadOrigin::Recovered { reason, .. } => {
                tracing::warn!("Discarded unreadable collection at {}: {}", slot.locate(&key), reason)
            }
        }

        Self {
            ids: IdGenerator::seeded_from(&cards),
            slot,
            key,
            cards,
            policy,
            origin,
            dirty_since: None,
            save_failed: false,
        }
    }

    fn load(slot: &mut dyn Slot, key: &str) -> (Vec<Card>, LoadOrigin) {
        let text = match slot.read(key) {
            Ok(Some(text)) if !text.trim().is_empty() => text,
            Ok(_) => return (seed_cards(), LoadOrigin::Seeded),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Self::discard(slot, key, format!("not valid text: {}", e));
            }
            Err(e) => {
                let reason = format!("read failed: {}", e);
                return (seed_cards(), LoadOrigin::Recovered { reason, backup: None });
            }
        };

        match format::decode(&text) {
            Ok(cards) => (cards, LoadOrigin::Stored),
            Err(e) => Self::discard(slot, key, e.to_string()),
        }
    }

    /// Move an undecodable slot aside as-is and fall back to the seed set.
    fn discard(slot: &mut dyn Slot, key: &str, reason: String) -> (Vec<Card>, LoadOrigin) {
        let backup_key = format!("{}{}", key, BACKUP_SUFFIX);
        let backup = match slot.rename(key, &backup_key) {
            Ok(()) => Some(slot.locate(&backup_key)),
            Err(err) => {
                tracing::warn!("Could not move corrupted collection aside: {}", err);
                None
            }
        };
        (seed_cards(), LoadOrigin::Recovered { reason, backup })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn position(&self, id: u64) -> Option<usize> {
        self.cards.iter().position(|c| c.id == id)
    }

    pub fn origin(&self) -> &LoadOrigin {
        &self.origin
    }

    pub fn location(&self) -> String {
        self.slot.locate(&self.key)
    }

    /// True while a completed mutation has not reached the slot
    pub fn is_dirty(&self) -> bool {
        self.dirty_since.is_some()
    }

    /// Serialize the whole collection and overwrite the slot.
    ///
    /// On failure the in-memory cards stay authoritative and the store stays
    /// dirty; nothing retries on its own, but `flush` or the next mutation
    /// writes the full collection again.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let text = format::encode(&self.cards)?;
        match self.slot.write(&self.key, &text) {
            Ok(()) => {
                self.dirty_since = None;
                self.save_failed = false;
                tracing::debug!("Saved {} cards to {}", self.cards.len(), self.location());
                Ok(())
            }
            Err(source) => {
                self.dirty_since.get_or_insert_with(Instant::now);
                self.save_failed = true;
                tracing::warn!("Save failed: {}", source);
                Err(StoreError::Write {
                    location: self.location(),
                    source,
                })
            }
        }
    }

    /// Append a new card with a freshly generated id.
    ///
    /// Only presence of name and URL is checked here; well-formedness is the
    /// caller's concern (see [`CardDraft::validate`]). A save error means the
    /// card was added in memory but not persisted.
    pub fn insert(&mut self, draft: CardDraft) -> Result<Card, StoreError> {
        if draft.name.trim().is_empty() {
            return Err(DraftError::MissingName.into());
        }
        if draft.url.trim().is_empty() {
            return Err(DraftError::MissingUrl.into());
        }

        // Past u64::MAX the clock scheme has nothing left; reuse a gap instead
        let id = self
            .ids
            .next_id()
            .unwrap_or_else(|| lowest_free_id(&self.cards));
        let card = draft.into_card(id);
        tracing::info!("Added card {} ({})", card.id, card.name);
        self.cards.push(card.clone());
        self.commit()?;
        Ok(card)
    }

    /// Remove the card with `id`. Unknown ids are a no-op returning `false`.
    pub fn delete(&mut self, id: u64) -> Result<bool, StoreError> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        let removed = self.cards.remove(index);
        tracing::info!("Deleted card {} ({})", removed.id, removed.name);
        self.commit()?;
        Ok(true)
    }

    /// Move the card at `from` to `to` and save. Invalid or equal indices are
    /// a no-op returning `false`.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<bool, StoreError> {
        if !self.reorder_in_place(from, to) {
            return Ok(false);
        }
        self.commit()?;
        Ok(true)
    }

    /// One reorder step without touching the slot
    fn reorder_in_place(&mut self, from: usize, to: usize) -> bool {
        move_element(&mut self.cards, from, to)
    }

    /// Empty the collection and delete the slot, so the next load shows the
    /// seed set again.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.cards.clear();
        self.dirty_since = None;
        self.save_failed = false;
        tracing::info!("Cleared collection at {}", self.location());
        self.slot.remove(&self.key).map_err(|source| StoreError::Remove {
            location: self.slot.locate(&self.key),
            source,
        })
    }

    /// A mutation has completed: persist it according to the save policy.
    fn commit(&mut self) -> Result<(), StoreError> {
        match self.policy {
            SavePolicy::Immediate => self.save(),
            SavePolicy::Deferred { .. } => {
                self.dirty_since.get_or_insert_with(Instant::now);
                self.save_failed = false;
                Ok(())
            }
        }
    }

    /// Save if a deferred write has waited long enough. Returns whether it saved.
    ///
    /// Only meaningful under [`SavePolicy::Deferred`]. After a failed write
    /// nothing is attempted until the next mutation or an explicit `flush`.
    pub fn flush_due(&mut self, now: Instant) -> Result<bool, StoreError> {
        let SavePolicy::Deferred { delay } = self.policy else {
            return Ok(false);
        };
        if self.save_failed {
            return Ok(false);
        }
        match self.dirty_since {
            Some(since) if now.saturating_duration_since(since) >= delay => {
                self.save()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Save any pending change right away.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        if self.is_dirty() {
            self.save()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::slot::MemorySlot;
    use proptest::prelude::*;
    use tempfile::TempDir;

    const KEY: &str = "websites";

    fn open(slot: &MemorySlot) -> CollectionStore {
        CollectionStore::open(Box::new(slot.clone()), KEY, SavePolicy::Immediate)
    }

    fn names(store: &CollectionStore) -> Vec<&str> {
        store.cards().iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_absent_slot_shows_seed_without_writing() {
        let slot = MemorySlot::default();
        let store = open(&slot);
        assert_eq!(store.cards(), seed_cards().as_slice());
        assert_eq!(store.origin(), &LoadOrigin::Seeded);
        assert_eq!(slot.writes(), 0);
        assert!(slot.get(KEY).is_none());
    }

    #[test]
    fn test_blank_slot_is_seeded() {
        let slot = MemorySlot::with_value(KEY, "  \n");
        let store = open(&slot);
        assert_eq!(store.origin(), &LoadOrigin::Seeded);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_saved_empty_collection_stays_empty() {
        let slot = MemorySlot::default();
        let mut store = open(&slot);
        for id in [1, 2, 3] {
            store.delete(id).unwrap();
        }
        assert!(store.is_empty());

        let reopened = open(&slot);
        assert!(reopened.is_empty());
        assert_eq!(reopened.origin(), &LoadOrigin::Stored);
    }

    #[test]
    fn test_corrupted_slot_falls_back_and_keeps_backup() {
        let slot = MemorySlot::with_value(KEY, "[{\"id\": 1, \"name\": ");
        let store = open(&slot);

        assert_eq!(store.cards(), seed_cards().as_slice());
        match store.origin() {
            LoadOrigin::Recovered { backup, .. } => {
                assert_eq!(backup.as_deref(), Some("memory:websites.corrupt"))
            }
            other => panic!("expected recovery, got {:?}", other),
        }
        assert!(slot.get(KEY).is_none());
        assert_eq!(slot.get("websites.corrupt").as_deref(), Some("[{\"id\": 1, \"name\": "));
    }

    #[test]
    fn test_non_utf8_file_is_moved_aside_once() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::new(dir.path());
        let path = slot.path_for(KEY);
        std::fs::write(&path, b"[\xff\xfe garbage").unwrap();

        let store = CollectionStore::open(Box::new(slot.clone()), KEY, SavePolicy::Immediate);
        assert_eq!(store.cards(), seed_cards().as_slice());
        assert!(matches!(
            store.origin(),
            LoadOrigin::Recovered { backup: Some(_), .. }
        ));
        assert!(!path.exists());
        let backup = slot.path_for(&format!("{}{}", KEY, BACKUP_SUFFIX));
        assert_eq!(std::fs::read(backup).unwrap(), b"[\xff\xfe garbage");

        // Next launch starts clean
        let reopened = CollectionStore::open(Box::new(slot), KEY, SavePolicy::Immediate);
        assert_eq!(reopened.origin(), &LoadOrigin::Seeded);
    }

    #[test]
    fn test_insert_after_max_id_reuses_a_free_id() {
        let slot = MemorySlot::with_value(
            KEY,
            r#"[{"id":18446744073709551615,"name":"a","url":"https://a.dev"}]"#,
        );
        let mut store = open(&slot);
        let card = store.insert(CardDraft::new("b", "https://b.dev")).unwrap();
        assert_eq!(card.id, 1);

        let reopened = open(&slot);
        assert_eq!(reopened.origin(), &LoadOrigin::Stored);
        assert_eq!(names(&reopened), vec!["a", "b"]);
    }

    #[test]
    fn test_legacy_bare_array_loads() {
        let slot = MemorySlot::with_value(
            KEY,
            r#"[{"id":1712345678901,"name":"Example","url":"https://example.com","image":"","description":""}]"#,
        );
        let store = open(&slot);
        assert_eq!(store.origin(), &LoadOrigin::Stored);
        assert_eq!(names(&store), vec!["Example"]);
    }

    #[test]
    fn test_insert_appends_and_saves() {
        let slot = MemorySlot::default();
        let mut store = open(&slot);

        let card = store
            .insert(CardDraft::new("Test", "https://test.dev").with_description("d"))
            .unwrap();

        assert_eq!(store.len(), 4);
        assert_eq!(store.cards()[3], card);
        assert!(card.id > 3);
        assert_eq!(slot.writes(), 1);
    }

    #[test]
    fn test_insert_rejects_missing_fields_without_saving() {
        let slot = MemorySlot::default();
        let mut store = open(&slot);

        assert!(matches!(
            store.insert(CardDraft::new("", "https://a.com")),
            Err(StoreError::Invalid(DraftError::MissingName))
        ));
        assert!(matches!(
            store.insert(CardDraft::new("A", "  ")),
            Err(StoreError::Invalid(DraftError::MissingUrl))
        ));
        assert_eq!(store.len(), 3);
        assert_eq!(slot.writes(), 0);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let slot = MemorySlot::default();
        let mut store = open(&slot);

        assert!(store.delete(2).unwrap());
        let after_first = store.cards().to_vec();
        assert!(!store.delete(2).unwrap());
        assert_eq!(store.cards(), after_first.as_slice());
        // The no-op delete did not write
        assert_eq!(slot.writes(), 1);
    }

    #[test]
    fn test_reorder_out_of_range_is_noop() {
        let slot = MemorySlot::default();
        let mut store = open(&slot);
        assert!(!store.reorder(0, 3).unwrap());
        assert!(!store.reorder(5, 0).unwrap());
        assert!(!store.reorder(1, 1).unwrap());
        assert_eq!(store.cards(), seed_cards().as_slice());
        assert_eq!(slot.writes(), 0);
    }

    #[test]
    fn test_clear_removes_slot_and_reseeds_on_next_load() {
        let slot = MemorySlot::default();
        let mut store = open(&slot);
        store.insert(CardDraft::new("Test", "https://test.dev")).unwrap();
        assert!(slot.get(KEY).is_some());

        store.clear().unwrap();
        assert!(store.is_empty());
        assert!(slot.get(KEY).is_none());

        let reopened = open(&slot);
        assert_eq!(reopened.cards(), seed_cards().as_slice());
        assert_eq!(reopened.origin(), &LoadOrigin::Seeded);
    }

    #[test]
    fn test_example_scenario() {
        let slot = MemorySlot::default();
        let mut store = open(&slot);

        store.insert(CardDraft::new("Test", "https://test.dev")).unwrap();
        assert!(store.reorder(3, 0).unwrap());
        assert_eq!(
            names(&store),
            vec!["Test", "neal.fun", "The Useless Web", "A Soft Murmur"]
        );

        assert!(store.delete(2).unwrap());
        assert_eq!(names(&store), vec!["Test", "neal.fun", "A Soft Murmur"]);

        store.save().unwrap();
        let reopened = open(&slot);
        assert_eq!(reopened.cards(), store.cards());
        assert_eq!(reopened.origin(), &LoadOrigin::Stored);
    }

    #[test]
    fn test_write_failure_keeps_memory_and_retries_on_flush() {
        let slot = MemorySlot::default();
        let mut store = open(&slot);

        slot.fail_writes(true);
        let err = store.insert(CardDraft::new("Offline", "https://offline.dev")).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert_eq!(store.len(), 4);
        assert!(store.is_dirty());

        slot.fail_writes(false);
        store.flush().unwrap();
        assert!(!store.is_dirty());
        assert_eq!(open(&slot).len(), 4);
    }

    #[test]
    fn test_deferred_policy_batches_saves() {
        let slot = MemorySlot::default();
        let delay = Duration::from_millis(500);
        let mut store =
            CollectionStore::open(Box::new(slot.clone()), KEY, SavePolicy::Deferred { delay });

        store.delete(1).unwrap();
        store.reorder(0, 1).unwrap();
        assert_eq!(slot.writes(), 0);
        assert!(store.is_dirty());

        let now = Instant::now();
        assert!(!store.flush_due(now - Duration::from_secs(1)).unwrap());
        assert!(store.flush_due(now + delay).unwrap());
        assert_eq!(slot.writes(), 1);
        assert!(!store.flush_due(now + delay * 2).unwrap());

        assert_eq!(names(&open(&slot)), vec!["A Soft Murmur", "The Useless Web"]);
    }

    #[test]
    fn test_deferred_failure_waits_for_next_change() {
        let slot = MemorySlot::default();
        let delay = Duration::from_millis(10);
        let mut store =
            CollectionStore::open(Box::new(slot.clone()), KEY, SavePolicy::Deferred { delay });
        let later = Instant::now() + Duration::from_secs(5);

        slot.fail_writes(true);
        store.delete(1).unwrap();
        assert!(store.flush_due(later).is_err());
        // No automatic retry
        assert!(!store.flush_due(later).unwrap());

        slot.fail_writes(false);
        store.delete(2).unwrap();
        assert!(store.flush_due(later).unwrap());
        assert_eq!(names(&open(&slot)), vec!["A Soft Murmur"]);
    }

    #[test]
    fn test_immediate_policy_never_flushes_on_tick() {
        let slot = MemorySlot::default();
        let mut store = open(&slot);
        slot.fail_writes(true);
        assert!(store.delete(1).is_err());
        assert!(!store.flush_due(Instant::now() + Duration::from_secs(60)).unwrap());
        assert!(store.is_dirty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn inserts_keep_ids_unique_and_order_prefix(
            drafts in proptest::collection::vec(("[a-zA-Z][a-zA-Z0-9 ]{0,12}", "[a-z]{1,10}"), 1..20)
        ) {
            let slot = MemorySlot::default();
            let mut store = open(&slot);

            for (name, host) in drafts {
                let before = store.cards().to_vec();
                let card = store
                    .insert(CardDraft::new(name, format!("https://{}.com", host)))
                    .unwrap();
                prop_assert_eq!(&store.cards()[..before.len()], before.as_slice());
                prop_assert_eq!(store.cards().last(), Some(&card));
            }

            let mut ids: Vec<u64> = store.cards().iter().map(|c| c.id).collect();
            let total = ids.len();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), total);
        }

        #[test]
        fn save_then_load_round_trips(
            cards in proptest::collection::vec(
                (".{1,16}", ".{1,24}", ".{0,24}", ".{0,40}"),
                0..12,
            )
        ) {
            let slot = MemorySlot::default();
            let mut store = open(&slot);
            store.cards = cards
                .into_iter()
                .enumerate()
                .map(|(i, (name, url, image, description))| Card {
                    id: i as u64 + 100,
                    name,
                    url,
                    image,
                    description,
                })
                .collect();
            store.save().unwrap();

            let reopened = open(&slot);
            prop_assert_eq!(reopened.cards(), store.cards());
        }
    }
}
