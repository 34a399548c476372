//! Contact classification
//!
//! A contact between two tagged bodies is resolved once into a
//! [`ContactKind`]; the controller dispatches on that instead of comparing
//! category bits.

use serde::{Deserialize, Serialize};

use super::host::BodyTag;

/// What a contact means for the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    /// Player touched a pipe or the ground
    Lethal,
    /// Player entered a scoring gate
    ScoreGate,
    /// Nothing gameplay-relevant
    Benign,
}

/// Classify a contact between two bodies (order does not matter)
pub fn classify(a: BodyTag, b: BodyTag) -> ContactKind {
    match (a, b) {
        (BodyTag::Player, other) | (other, BodyTag::Player) => match other {
            BodyTag::Pipe | BodyTag::Ground => ContactKind::Lethal,
            BodyTag::Gate => ContactKind::ScoreGate,
            BodyTag::Player => ContactKind::Benign,
        },
        _ => ContactKind::Benign,
    }
}
