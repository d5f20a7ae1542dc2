use serde::{Deserialize, Serialize};

/// Probed metadata for the loaded video, using the wire field names the
/// description service and the widget glue expect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VideoInfo {
    pub width: i64,
    pub height: i64,
    /// Length in seconds.
    pub duration: f64,
    pub frame_count: i64,
    pub frame_rate: f64,
    /// Sampling stride for the description service, in frames.
    pub frame_interval: i64,
    pub downscaled_width: i64,
    pub downscaled_height: i64,
    /// Set once the video has been copied into the editing session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,
}

impl VideoInfo {
    /// Time conversions need a frame rate and a frame count. Missing either
    /// is the defined "unavailable" state, not an error.
    pub fn conversions_available(&self) -> bool {
        self.frame_rate > 0.0 && self.frame_count > 0
    }

    pub fn last_frame(&self) -> i64 {
        self.frame_count - 1
    }

    pub fn duration_ms(&self) -> i64 {
        (self.duration * 1000.0) as i64
    }
}

/// One annotated sound clip bound to a frame range of the video.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AudioSource {
    /// Unique across both partitions; immutable after creation; the sole
    /// join key between the collection and the widget representation.
    #[serde(rename = "SourceSlugID")]
    pub source_slug_id: String,
    pub start_frame_index: i64,
    pub end_frame_index: i64,
    /// Seconds, derived from the millisecond span whenever start/end change.
    pub duration: f64,
    /// Path to the synthesized clip; absent until generated.
    pub audio_path: Option<String>,
    pub sound_description: String,
    /// Gain in [0.0, 2.0].
    pub volume: f64,
}

/// Which of the two fixed partitions a source lives in. Membership never
/// changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Foreground,
    Ambient,
}

/// The two ordered partitions of sources. Slug uniqueness holds across the
/// union; within a partition, sequence order is insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AudioSourceCollection {
    pub audio_sources: Vec<AudioSource>,
    pub ambient_audio_sources: Vec<AudioSource>,
}

impl AudioSourceCollection {
    /// Foreground is searched before ambient; the first match wins.
    pub fn find_by_slug(&self, slug: &str) -> Option<&AudioSource> {
        self.audio_sources
            .iter()
            .chain(self.ambient_audio_sources.iter())
            .find(|source| source.source_slug_id == slug)
    }

    pub fn find_by_slug_mut(&mut self, slug: &str) -> Option<&mut AudioSource> {
        self.audio_sources
            .iter_mut()
            .chain(self.ambient_audio_sources.iter_mut())
            .find(|source| source.source_slug_id == slug)
    }

    pub fn partition_of(&self, slug: &str) -> Option<Partition> {
        if self.audio_sources.iter().any(|s| s.source_slug_id == slug) {
            Some(Partition::Foreground)
        } else if self
            .ambient_audio_sources
            .iter()
            .any(|s| s.source_slug_id == slug)
        {
            Some(Partition::Ambient)
        } else {
            None
        }
    }

    pub fn iter_all(&self) -> impl Iterator<Item = &AudioSource> {
        self.audio_sources
            .iter()
            .chain(self.ambient_audio_sources.iter())
    }

    pub fn iter_all_mut(&mut self) -> impl Iterator<Item = &mut AudioSource> {
        self.audio_sources
            .iter_mut()
            .chain(self.ambient_audio_sources.iter_mut())
    }

    pub fn len(&self) -> usize {
        self.audio_sources.len() + self.ambient_audio_sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.audio_sources.is_empty() && self.ambient_audio_sources.is_empty()
    }
}
