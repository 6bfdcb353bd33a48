//! Attribute comparison between a guessed record and the hidden target
//!
//! `compare` is pure: no I/O, no state. Every attribute in [`AttributeKey::ALL`]
//! gets exactly one verdict, and each verdict carries both raw values so the
//! caller can show the numbers next to the marker.

use crate::model::{
    AttributeKey, AttributeValue, Comparison, EntityRecord, Verdict, VerdictStatus,
};
use std::cmp::Ordering;

/// Compares every attribute of `guessed` against `target`
pub fn compare(guessed: &EntityRecord, target: &EntityRecord) -> Comparison {
    AttributeKey::ALL
        .iter()
        .map(|key| (*key, compare_attribute(*key, guessed, target)))
        .collect()
}

fn compare_attribute(key: AttributeKey, guessed: &EntityRecord, target: &EntityRecord) -> Verdict {
    match key {
        AttributeKey::Team => categorical(&guessed.team, &target.team),
        AttributeKey::Division => categorical(&guessed.division, &target.division),
        AttributeKey::Conference => categorical(&guessed.conference, &target.conference),
        AttributeKey::Age => Verdict {
            status: directional(&guessed.age, &target.age),
            guessed: AttributeValue::Whole(guessed.age),
            target: AttributeValue::Whole(target.age),
        },
        AttributeKey::Height => Verdict {
            status: directional(&guessed.height_inches, &target.height_inches),
            guessed: AttributeValue::Inches(guessed.height_inches),
            target: AttributeValue::Inches(target.height_inches),
        },
        AttributeKey::Position => {
            let status = if guessed
                .position
                .as_str()
                .eq_ignore_ascii_case(target.position.as_str())
            {
                VerdictStatus::Correct
            } else if guessed.position.group() == target.position.group() {
                VerdictStatus::Partial
            } else {
                VerdictStatus::Incorrect
            };

            Verdict {
                status,
                guessed: AttributeValue::Text(guessed.position.to_string()),
                target: AttributeValue::Text(target.position.to_string()),
            }
        }
        AttributeKey::JerseyNumber => Verdict {
            status: directional(&guessed.jersey_number, &target.jersey_number),
            guessed: AttributeValue::Whole(guessed.jersey_number),
            target: AttributeValue::Whole(target.jersey_number),
        },
        AttributeKey::ScoringRate => Verdict {
            status: directional(&guessed.scoring_rate, &target.scoring_rate),
            guessed: AttributeValue::Decimal(guessed.scoring_rate),
            target: AttributeValue::Decimal(target.scoring_rate),
        },
    }
}

fn categorical(guessed: &str, target: &str) -> Verdict {
    let status = if guessed == target {
        VerdictStatus::Correct
    } else {
        VerdictStatus::Incorrect
    };

    Verdict {
        status,
        guessed: AttributeValue::Text(guessed.to_string()),
        target: AttributeValue::Text(target.to_string()),
    }
}

/// `Higher` tells the player the target's value is above their guess.
pub fn directional<T: PartialOrd>(guessed: &T, target: &T) -> VerdictStatus {
    match guessed.partial_cmp(target) {
        Some(Ordering::Equal) => VerdictStatus::Correct,
        Some(Ordering::Less) => VerdictStatus::Higher,
        Some(Ordering::Greater) => VerdictStatus::Lower,
        // Records with non-finite rates are rejected at ingest
        None => VerdictStatus::Incorrect,
    }
}
