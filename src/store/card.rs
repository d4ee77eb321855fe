use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// A single favorite-link entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: u64,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub image: String,       // Empty = placeholder
    #[serde(default)]
    pub description: String, // Empty = no description line
}

impl Card {
    pub fn has_image(&self) -> bool {
        !self.image.trim().is_empty()
    }

    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

/// User-entered values for a card that has no id yet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDraft {
    pub name: String,
    pub url: String,
    pub image: String,
    pub description: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Name is required")]
    MissingName,
    #[error("URL is required")]
    MissingUrl,
    #[error("Not a valid URL: {0}")]
    InvalidUrl(String),
    #[error("Not a valid image URL: {0}")]
    InvalidImageUrl(String),
}

impl CardDraft {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Trim every field and check the required ones.
    ///
    /// Name and URL must be non-empty, and the URL (and image, when given) must
    /// parse as an absolute URL. This is the gate the shell applies before a
    /// draft reaches the store.
    pub fn validate(&self) -> Result<CardDraft, DraftError> {
        let draft = CardDraft {
            name: self.name.trim().to_string(),
            url: self.url.trim().to_string(),
            image: self.image.trim().to_string(),
            description: self.description.trim().to_string(),
        };

        if draft.name.is_empty() {
            return Err(DraftError::MissingName);
        }
        if draft.url.is_empty() {
            return Err(DraftError::MissingUrl);
        }
        if url::Url::parse(&draft.url).is_err() {
            return Err(DraftError::InvalidUrl(draft.url));
        }
        if !draft.image.is_empty() && url::Url::parse(&draft.image).is_err() {
            return Err(DraftError::InvalidImageUrl(draft.image));
        }

        Ok(draft)
    }

    pub(crate) fn into_card(self, id: u64) -> Card {
        Card {
            id,
            name: self.name,
            url: self.url,
            image: self.image,
            description: self.description,
        }
    }
}

/// Hands out card ids derived from the wall clock (milliseconds), bumped past
/// anything already seen so two inserts in the same millisecond, or a clock
/// that steps backwards, can never collide.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn seeded_from(cards: &[Card]) -> Self {
        let mut gen = Self::default();
        gen.observe(cards);
        gen
    }

    /// Make sure future ids are greater than every id in `cards`.
    pub fn observe(&mut self, cards: &[Card]) {
        if let Some(max) = cards.iter().map(|c| c.id).max() {
            self.last = self.last.max(max);
        }
    }

    /// `None` once the id space above the largest seen id is used up.
    pub fn next_id(&mut self) -> Option<u64> {
        self.next_id_at(now_millis())
    }

    pub fn next_id_at(&mut self, now_ms: u64) -> Option<u64> {
        let id = now_ms.max(self.last.checked_add(1)?);
        self.last = id;
        Some(id)
    }
}

/// Smallest positive id not used by any card in `cards`.
pub fn lowest_free_id(cards: &[Card]) -> u64 {
    let mut ids: Vec<u64> = cards.iter().map(|c| c.id).collect();
    ids.sort_unstable();

    let mut candidate = 1;
    for id in ids {
        if id == candidate {
            candidate += 1;
        } else if id > candidate {
            break;
        }
    }
    candidate
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// The fixed sample set shown before anything has been saved.
pub fn seed_cards() -> Vec<Card> {
    vec![
        Card {
            id: 1,
            name: "neal.fun".to_string(),
            url: "https://neal.fun".to_string(),
            image: "https://images.unsplash.com/photo-1551650975-87deedd944c3?w=400&h=300&fit=crop".to_string(),
            description: "Interactive projects and games".to_string(),
        },
        Card {
            id: 2,
            name: "The Useless Web".to_string(),
            url: "https://theuselessweb.com".to_string(),
            image: "https://images.unsplash.com/photo-1484788984921-03950022c9ef?w=400&h=300&fit=crop".to_string(),
            description: "Random weird websites".to_string(),
        },
        Card {
            id: 3,
            name: "A Soft Murmur".to_string(),
            url: "https://asoftmurmur.com".to_string(),
            image: "https://images.unsplash.com/photo-1470790376778-a9fbc86d70e2?w=400&h=300&fit=crop".to_string(),
            description: "Ambient sounds mixer".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims_and_accepts() {
        let draft = CardDraft::new("  Rust  ", " https://www.rust-lang.org ")
            .with_description(" systems ");
        let valid = draft.validate().unwrap();
        assert_eq!(valid.name, "Rust");
        assert_eq!(valid.url, "https://www.rust-lang.org");
        assert_eq!(valid.description, "systems");
        assert!(valid.image.is_empty());
    }

    #[test]
    fn test_validate_required_fields() {
        assert_eq!(
            CardDraft::new("   ", "https://a.com").validate(),
            Err(DraftError::MissingName)
        );
        assert_eq!(CardDraft::new("A", "").validate(), Err(DraftError::MissingUrl));
        assert!(matches!(
            CardDraft::new("A", "not a url").validate(),
            Err(DraftError::InvalidUrl(_))
        ));
        assert!(matches!(
            CardDraft::new("A", "https://a.com").with_image("nope").validate(),
            Err(DraftError::InvalidImageUrl(_))
        ));
    }

    #[test]
    fn test_id_generator_is_strictly_increasing() {
        let mut gen = IdGenerator::default();
        let a = gen.next_id_at(1_000);
        let b = gen.next_id_at(1_000);
        let c = gen.next_id_at(500); // clock went backwards
        assert_eq!(a, Some(1_000));
        assert_eq!(b, Some(1_001));
        assert_eq!(c, Some(1_002));
    }

    #[test]
    fn test_id_generator_stops_at_max() {
        let mut cards = seed_cards();
        cards[0].id = u64::MAX;
        let mut gen = IdGenerator::seeded_from(&cards);
        assert_eq!(gen.next_id_at(10), None);
        assert_eq!(gen.next_id_at(u64::MAX), None);
    }

    #[test]
    fn test_lowest_free_id_fills_gaps() {
        let mut cards = seed_cards();
        assert_eq!(lowest_free_id(&cards), 4);
        cards[1].id = u64::MAX;
        assert_eq!(lowest_free_id(&cards), 2);
        assert_eq!(lowest_free_id(&[]), 1);
    }

    #[test]
    fn test_id_generator_skips_existing_ids() {
        let mut cards = seed_cards();
        cards[1].id = 9_999;
        let mut gen = IdGenerator::seeded_from(&cards);
        assert_eq!(gen.next_id_at(10), Some(10_000));
    }

    #[test]
    fn test_seed_cards_shape() {
        let seed = seed_cards();
        let ids: Vec<u64> = seed.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(seed.iter().all(|c| c.has_image() && c.has_description()));
    }
}
