use serde::{Deserialize, Serialize};

use crate::source::{AudioSourceCollection, VideoInfo};

/// Everything one editing session owns: the video copied into it, the
/// current source collection, the widget selection, and the counter that
/// names user-added sources.
///
/// Sessions are independent value state; nothing here is shared or global,
/// so concurrent sessions cannot interfere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditSession {
    pub video: Option<VideoInfo>,
    pub sources: AudioSourceCollection,
    pub selected_slug: Option<String>,
    pub new_source_counter: u64,
}

impl EditSession {
    pub fn new() -> Self {
        EditSession::default()
    }

    /// Refresh the session's copy of the video metadata.
    pub fn adopt_video(&mut self, video: VideoInfo) {
        self.video = Some(video);
    }

    /// Replace the collection wholesale with a fresh generation result.
    /// The add counter restarts and any selection is dropped.
    pub fn adopt_generation(&mut self, sources: AudioSourceCollection) {
        self.sources = sources;
        self.new_source_counter = 0;
        self.selected_slug = None;
    }

    pub fn selected_source(&self) -> Option<&crate::source::AudioSource> {
        self.selected_slug
            .as_deref()
            .and_then(|slug| self.sources.find_by_slug(slug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::AudioSource;

    #[test]
    fn test_adopt_generation_resets_session_state() {
        let mut session = EditSession::new();
        session.add_source();
        session.add_source();
        session.selected_slug = Some("NewAudioSource1".to_string());
        assert_eq!(session.new_source_counter, 2);

        let generated = AudioSourceCollection {
            audio_sources: vec![AudioSource {
                source_slug_id: "DoorSlam1".to_string(),
                start_frame_index: 10,
                end_frame_index: 40,
                duration: 1.2,
                audio_path: None,
                sound_description: "a door slams shut".to_string(),
                volume: 1.0,
            }],
            ambient_audio_sources: vec![],
        };
        session.adopt_generation(generated);

        assert_eq!(session.new_source_counter, 0);
        assert!(session.selected_slug.is_none());
        assert_eq!(session.sources.len(), 1);
        assert!(session.sources.find_by_slug("NewAudioSource1").is_none());
    }

    #[test]
    fn test_selected_source_resolves_through_collection() {
        let mut session = EditSession::new();
        session.add_source();
        assert!(session.selected_source().is_none());
        session.selected_slug = Some("NewAudioSource1".to_string());
        assert_eq!(
            session.selected_source().unwrap().sound_description,
            "New audio source 1"
        );
    }
}
