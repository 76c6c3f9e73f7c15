//! Preference scoring. Purely additive: each preference contributes its
//! weight to every slot it matches, independently of all other preferences.
//! This module only ranks already-feasible choices; conflicts are not its
//! concern.

use crate::data::{ChosenSection, MergedSection, Preference, TimeSlot};

/// Summed weight of every preference matching the slot. A preference with no
/// day matches any day; one with no bucket matches any time of day.
pub fn slot_score(slot: &TimeSlot, preferences: &[Preference]) -> f64 {
    preferences
        .iter()
        .filter(|p| p.day.is_none_or(|d| d == slot.day))
        .filter(|p| p.bucket.is_none_or(|b| b == slot.bucket()))
        .map(|p| p.weight)
        .sum()
}

pub fn section_score(section: &MergedSection, preferences: &[Preference]) -> f64 {
    section
        .times
        .iter()
        .map(|slot| slot_score(slot, preferences))
        .sum()
}

/// Total score of a set of selected sections: the sum of per-slot scores over
/// every slot of every selection.
pub fn chosen_score(chosen: &[ChosenSection], preferences: &[Preference]) -> f64 {
    chosen
        .iter()
        .map(|c| section_score(&c.section, preferences))
        .sum()
}
