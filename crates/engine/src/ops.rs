use serde::Deserialize;

use crate::session::EditSession;
use crate::source::AudioSource;

/// The fields the edit form may overwrite on a source. Start/end move only
/// through timeline ingestion.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceEdit {
    pub sound_description: String,
    pub audio_path: Option<String>,
    pub volume: f64,
}

impl EditSession {
    /// Append a fresh foreground source with default placement. The counter
    /// only ever grows, so slugs stay unique for the life of the session
    /// even when sources are deleted in between.
    pub fn add_source(&mut self) -> &AudioSource {
        self.new_source_counter += 1;
        let n = self.new_source_counter;
        let source = AudioSource {
            source_slug_id: format!("NewAudioSource{}", n),
            start_frame_index: 0,
            end_frame_index: 75,
            duration: 3.0,
            audio_path: None,
            sound_description: format!("New audio source {}", n),
            volume: 1.0,
        };
        self.sources.audio_sources.push(source);
        self.sources.audio_sources.last().unwrap()
    }

    /// Remove a source from whichever partition holds it. Unknown slugs are
    /// a no-op. A selection pointing at the removed source is cleared.
    pub fn delete_source(&mut self, slug: &str) {
        self.sources
            .audio_sources
            .retain(|source| source.source_slug_id != slug);
        self.sources
            .ambient_audio_sources
            .retain(|source| source.source_slug_id != slug);
        if self.selected_slug.as_deref() == Some(slug) {
            self.selected_slug = None;
        }
    }

    /// Overwrite the editable fields of a source in place, preserving its
    /// position in its partition. Foreground is checked first; a match there
    /// skips the ambient partition entirely. Returns false for unknown slugs.
    pub fn update_source(&mut self, slug: &str, edit: SourceEdit) -> bool {
        for source in self.sources.audio_sources.iter_mut() {
            if source.source_slug_id == slug {
                apply_edit(source, edit);
                return true;
            }
        }
        for source in self.sources.ambient_audio_sources.iter_mut() {
            if source.source_slug_id == slug {
                apply_edit(source, edit);
                return true;
            }
        }
        false
    }

    /// Selection event from the widget: the first selected id that resolves
    /// to a source wins; an empty list clears the selection.
    pub fn select(&mut self, ids: &[String]) -> Option<&AudioSource> {
        self.selected_slug = ids
            .iter()
            .find(|id| self.sources.find_by_slug(id).is_some())
            .cloned();
        self.selected_source()
    }
}

fn apply_edit(source: &mut AudioSource, edit: SourceEdit) {
    source.sound_description = edit.sound_description;
    source.audio_path = edit.audio_path;
    source.volume = edit.volume;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit(description: &str, volume: f64) -> SourceEdit {
        SourceEdit {
            sound_description: description.to_string(),
            audio_path: Some("/tmp/clip.wav".to_string()),
            volume,
        }
    }

    #[test]
    fn test_add_defaults() {
        let mut session = EditSession::new();
        let source = session.add_source();
        assert_eq!(source.source_slug_id, "NewAudioSource1");
        assert_eq!(source.start_frame_index, 0);
        assert_eq!(source.end_frame_index, 75);
        assert_eq!(source.duration, 3.0);
        assert_eq!(source.volume, 1.0);
        assert!(source.audio_path.is_none());
        assert_eq!(source.sound_description, "New audio source 1");
    }

    #[test]
    fn test_counter_survives_deletes() {
        let mut session = EditSession::new();
        let mut slugs = Vec::new();
        for i in 0..5 {
            slugs.push(session.add_source().source_slug_id.clone());
            if i == 2 {
                session.delete_source("NewAudioSource2");
            }
        }
        assert_eq!(
            slugs,
            vec![
                "NewAudioSource1",
                "NewAudioSource2",
                "NewAudioSource3",
                "NewAudioSource4",
                "NewAudioSource5"
            ]
        );
        // Deleted slug is never reissued
        assert!(session.sources.find_by_slug("NewAudioSource2").is_none());
        assert_eq!(session.sources.len(), 4);
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut session = EditSession::new();
        session.add_source();
        session.select(&["NewAudioSource1".to_string()]);
        assert!(session.selected_slug.is_some());

        session.delete_source("NewAudioSource1");
        assert!(session.selected_slug.is_none());
        assert!(session.sources.find_by_slug("NewAudioSource1").is_none());
    }

    #[test]
    fn test_delete_unknown_slug_is_noop() {
        let mut session = EditSession::new();
        session.add_source();
        session.delete_source("NeverExisted");
        assert_eq!(session.sources.len(), 1);
    }

    #[test]
    fn test_update_preserves_position() {
        let mut session = EditSession::new();
        session.add_source();
        session.add_source();
        session.add_source();

        assert!(session.update_source("NewAudioSource2", edit("metal clang", 1.5)));
        let slugs: Vec<&str> = session
            .sources
            .audio_sources
            .iter()
            .map(|s| s.source_slug_id.as_str())
            .collect();
        assert_eq!(
            slugs,
            vec!["NewAudioSource1", "NewAudioSource2", "NewAudioSource3"]
        );
        let updated = session.sources.find_by_slug("NewAudioSource2").unwrap();
        assert_eq!(updated.sound_description, "metal clang");
        assert_eq!(updated.volume, 1.5);
        assert_eq!(updated.audio_path.as_deref(), Some("/tmp/clip.wav"));
        // Frame placement is not the form's to change
        assert_eq!(updated.start_frame_index, 0);
        assert_eq!(updated.end_frame_index, 75);
    }

    #[test]
    fn test_update_unknown_slug() {
        let mut session = EditSession::new();
        session.add_source();
        assert!(!session.update_source("Missing", edit("x", 1.0)));
    }

    #[test]
    fn test_select_skips_unknown_ids() {
        let mut session = EditSession::new();
        session.add_source();
        let selected = session
            .select(&["track-length-item".to_string(), "NewAudioSource1".to_string()])
            .map(|s| s.source_slug_id.clone());
        assert_eq!(selected.as_deref(), Some("NewAudioSource1"));

        assert!(session.select(&[]).is_none());
        assert!(session.selected_slug.is_none());
    }
}
