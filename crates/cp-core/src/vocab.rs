//! Closed chord vocabulary and the label → class-index mapping.

/// Ordered class list. Position = class index.
pub const CHORD_VOCABULARY: [&str; 34] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B", //
    "Cm", "C#m", "Dm", "D#m", "Em", "Fm", "F#m", "Gm", "G#m", "Am", "A#m", "Bm", //
    "C7", "D7", "E7", "G7", "A7", "Cm7", "Dm7", "Em7", "Gm7", "Am7",
];

/// Index assigned to labels outside the vocabulary.
pub const FALLBACK_INDEX: usize = 0;

/// Map a label to its class index. Case-sensitive exact match; anything
/// else maps to [`FALLBACK_INDEX`].
///
/// # Example
/// ```
/// use cp_core::vocab::label_index;
/// assert_eq!(label_index("Am"), 21);
/// assert_eq!(label_index("am"), 0);
/// assert_eq!(label_index("Cadd9"), 0);
/// ```
#[must_use]
pub fn label_index(label: &str) -> usize {
    CHORD_VOCABULARY
        .iter()
        .position(|&c| c == label)
        .unwrap_or(FALLBACK_INDEX)
}

/// Vocabulary as owned strings, for artifacts that carry it.
#[must_use]
pub fn vocabulary() -> Vec<String> {
    CHORD_VOCABULARY.iter().map(|&c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_vocabulary_label_maps_to_its_position() {
        for (i, label) in CHORD_VOCABULARY.iter().enumerate() {
            assert_eq!(label_index(label), i, "{label}");
        }
    }

    #[test]
    fn unknown_labels_fall_back() {
        for label in ["", "c", "H", "F#7", "Bb", "C "] {
            assert_eq!(label_index(label), FALLBACK_INDEX, "{label:?}");
        }
    }

    #[test]
    fn vocabulary_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        assert!(CHORD_VOCABULARY.iter().all(|c| seen.insert(*c)));
        assert_eq!(vocabulary().len(), CHORD_VOCABULARY.len());
    }
}
