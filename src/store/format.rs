//! On-disk JSON layout of the collection.
//!
//! Written as `{"version": 1, "cards": [...]}`. A bare array of cards (the
//! unversioned layout) is still accepted on read.

use serde::{Deserialize, Serialize};

use super::card::Card;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    cards: &'a [Card],
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Stored {
    Envelope { version: u32, cards: Vec<Card> },
    Bare(Vec<Card>),
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed collection: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),
    #[error("duplicate card id {0}")]
    DuplicateId(u64),
}

pub fn encode(cards: &[Card]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&EnvelopeRef {
        version: FORMAT_VERSION,
        cards,
    })
}

pub fn decode(text: &str) -> Result<Vec<Card>, DecodeError> {
    let cards = match serde_json::from_str::<Stored>(text)? {
        Stored::Envelope { version, cards } if version <= FORMAT_VERSION => cards,
        Stored::Envelope { version, .. } => return Err(DecodeError::UnsupportedVersion(version)),
        Stored::Bare(cards) => cards,
    };

    let mut seen = std::collections::HashSet::with_capacity(cards.len());
    for card in &cards {
        if !seen.insert(card.id) {
            return Err(DecodeError::DuplicateId(card.id));
        }
    }

    Ok(cards)
}
