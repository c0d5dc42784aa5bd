//! Filename → chord lookup for the unstructured source.
//!
//! Both tables are explicit ordered lists so the priority order can be read
//! and tested on its own. Two-character patterns come first: every name
//! containing `gm` also contains `g`.

use rand::RngCore;
use rand::seq::SliceRandom;

/// Ordered `(lowercase substring, chord)` rules. First match wins.
pub const IDMT_RULES: &[(&str, &str)] = &[
    ("am", "Am"),
    ("a7", "A7"),
    ("cm", "Cm"),
    ("c7", "C7"),
    ("dm", "Dm"),
    ("d7", "D7"),
    ("em", "Em"),
    ("e7", "E7"),
    ("gm", "Gm"),
    ("g7", "G7"),
    ("a", "A"),
    ("c", "C"),
    ("d", "D"),
    ("e", "E"),
    ("g", "G"),
];

/// Common chords drawn from when no rule matches.
///
/// This is a guess, not ground truth: samples labelled this way carry
/// `label_guessed = true`.
pub const FALLBACK_CHORDS: &[&str] = &["C", "D", "E", "G", "A", "Am", "Em", "Dm"];

/// Where a label came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Label {
    /// A rule matched the filename.
    Matched(&'static str),
    /// Drawn from the fallback set.
    Guessed(&'static str),
}

impl Label {
    /// The chord name.
    #[must_use]
    pub fn chord(self) -> &'static str {
        match self {
            Self::Matched(c) | Self::Guessed(c) => c,
        }
    }

    /// True for a fallback draw.
    #[must_use]
    pub fn is_guess(self) -> bool {
        matches!(self, Self::Guessed(_))
    }
}

/// An ordered rule list plus its fallback set.
#[derive(Clone, Copy, Debug)]
pub struct LabelTable {
    rules: &'static [(&'static str, &'static str)],
    fallback: &'static [&'static str],
}

impl LabelTable {
    /// The table used for the unstructured source.
    pub const IDMT: Self = Self {
        rules: IDMT_RULES,
        fallback: FALLBACK_CHORDS,
    };

    /// First rule whose pattern occurs in the lowercased name.
    ///
    /// # Example
    /// ```
    /// use cp_source::labels::LabelTable;
    /// assert_eq!(LabelTable::IDMT.lookup("Guitar_Gm_03"), Some("Gm"));
    /// assert_eq!(LabelTable::IDMT.lookup("take_7"), Some("A"));
    /// assert_eq!(LabelTable::IDMT.lookup("hit_01"), None);
    /// ```
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&'static str> {
        let lower = name.to_lowercase();
        self.rules
            .iter()
            .find(|(pattern, _)| lower.contains(pattern))
            .map(|&(_, chord)| chord)
    }

    /// Lookup, falling back to a draw from `rng`.
    pub fn infer(&self, name: &str, rng: &mut dyn RngCore) -> Label {
        if let Some(chord) = self.lookup(name) {
            return Label::Matched(chord);
        }
        let guess = self
            .fallback
            .choose(rng)
            .copied()
            .unwrap_or(self.fallback.first().copied().unwrap_or("C"));
        Label::Guessed(guess)
    }
}
