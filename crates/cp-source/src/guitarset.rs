use std::path::{Path, PathBuf};

use cp_core::config::SourceKind;
use cp_core::sample::{SampleJob, SampleMetadata};
use cp_core::traits::SourceAdapter;

/// Nom du dataset tel qu'il apparaît dans les métadonnées.
pub const SOURCE_NAME: &str = "GuitarSet";

/// Identity fields parsed from a `<performer>_<chord>_<style>` stem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuredName<'a> {
    pub performer: &'a str,
    pub chord: &'a str,
    pub style: &'a str,
}

/// Découpe un nom structuré. Segments beyond the third are ignored.
///
/// # Example
/// ```
/// use cp_source::guitarset::parse_stem;
/// let name = parse_stem("p1_Am_strum").unwrap();
/// assert_eq!(name.chord, "Am");
/// assert!(parse_stem("p1_Am").is_none());
/// ```
#[must_use]
pub fn parse_stem(stem: &str) -> Option<StructuredName<'_>> {
    let mut parts = stem.split('_');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(performer), Some(chord), Some(style)) => Some(StructuredName {
            performer,
            chord,
            style,
        }),
        _ => None,
    }
}

/// Adaptateur pour la source structurée : le label est lu tel quel dans le nom.
pub struct GuitarSetAdapter {
    root: PathBuf,
    progress_every: usize,
}

impl GuitarSetAdapter {
    /// `root` is the directory holding the audio tree (`<datasets>/guitarset/audio`).
    #[must_use]
    pub fn new(root: PathBuf, progress_every: usize) -> Self {
        Self {
            root,
            progress_every: progress_every.max(1),
        }
    }
}

impl SourceAdapter for GuitarSetAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::GuitarSet
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn progress_every(&self) -> usize {
        self.progress_every
    }

    fn classify(&mut self, path: &Path) -> Option<SampleJob> {
        let stem = path.file_stem()?.to_str()?;
        let name = parse_stem(stem)?;
        Some(SampleJob {
            id: format!("GuitarSet_{}_{}_{}", name.performer, name.chord, name.style),
            chord: name.chord.to_string(),
            instrument: "guitar".into(),
            quality: "studio".into(),
            path: path.to_path_buf(),
            metadata: SampleMetadata {
                source: SOURCE_NAME.into(),
                performer: Some(name.performer.to_string()),
                style: Some(name.style.to_string()),
                ..SampleMetadata::default()
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> GuitarSetAdapter {
        GuitarSetAdapter::new(PathBuf::from("datasets/guitarset/audio"), 50)
    }

    #[test]
    fn label_is_taken_verbatim() {
        let job = adapter().classify(Path::new("audio/p1_strum/p1_Bbmaj7_strum.wav"));
        let job = job.as_ref();
        assert_eq!(job.map(|j| j.chord.as_str()), Some("Bbmaj7"));
        assert_eq!(job.map(|j| j.id.as_str()), Some("GuitarSet_p1_Bbmaj7_strum"));
        assert_eq!(job.and_then(|j| j.metadata.performer.as_deref()), Some("p1"));
        assert_eq!(job.and_then(|j| j.metadata.style.as_deref()), Some("strum"));
        assert!(job.is_some_and(|j| !j.metadata.label_guessed));
    }

    #[test]
    fn short_names_are_skipped() {
        let mut a = adapter();
        assert!(a.classify(Path::new("x/p1_C.wav")).is_none());
        assert!(a.classify(Path::new("x/solo.wav")).is_none());
    }

    #[test]
    fn extra_segments_are_ignored() {
        let job = adapter().classify(Path::new("p3_G_pick_take2.wav"));
        assert_eq!(job.map(|j| j.id), Some("GuitarSet_p3_G_pick".to_string()));
    }
}
