use crate::session::EditSession;
use crate::source::{AudioSource, AudioSourceCollection, VideoInfo};
use crate::time::frame_to_timestamp;
use crate::timeline::{
    SourceItem, TimelineData, TimelineItem, TimelineTime, TrackMarkerItem, AMBIENT_GROUP,
    FOREGROUND_GROUP, TRACK_LENGTH_GROUP, TRACK_LENGTH_ITEM_ID,
};

/// Build the widget representation of a collection: the track-length marker
/// first, then foreground items on lane 1 and ambient items on lane 2, in
/// the partitions' insertion order. Deterministic and side-effect-free.
pub fn project(sources: &AudioSourceCollection, video: &VideoInfo) -> TimelineData {
    let mut data = TimelineData::empty();

    // The marker always reflects the current video's last frame, recomputed
    // on every projection rather than stored anywhere.
    data.items.push(TimelineItem::Marker(TrackMarkerItem {
        id: TRACK_LENGTH_ITEM_ID.to_string(),
        content: String::new(),
        group: TRACK_LENGTH_GROUP.to_string(),
        selectable: false,
        item_type: "background".to_string(),
        start: TimelineTime::Millis(0),
        end: TimelineTime::Millis(frame_to_timestamp(video.last_frame(), video.frame_rate)),
        class_name: "color-primary-600".to_string(),
    }));

    for source in &sources.audio_sources {
        data.items
            .push(source_item(source, FOREGROUND_GROUP, video.frame_rate));
    }
    for source in &sources.ambient_audio_sources {
        data.items
            .push(source_item(source, AMBIENT_GROUP, video.frame_rate));
    }
    data
}

fn source_item(source: &AudioSource, group: i64, frame_rate: f64) -> TimelineItem {
    TimelineItem::Source(SourceItem {
        id: source.source_slug_id.clone(),
        content: source.sound_description.clone(),
        group,
        start: TimelineTime::Millis(frame_to_timestamp(source.start_frame_index, frame_rate)),
        end: TimelineTime::Millis(frame_to_timestamp(source.end_frame_index, frame_rate)),
    })
}

impl EditSession {
    /// The session's current widget representation, or the bare three-lane
    /// structure while no usable video is loaded.
    pub fn timeline(&self) -> TimelineData {
        match &self.video {
            Some(video) if video.conversions_available() => project(&self.sources, video),
            _ => TimelineData::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::GroupId;

    fn video() -> VideoInfo {
        VideoInfo {
            width: 1280,
            height: 720,
            duration: 6.0,
            frame_count: 150,
            frame_rate: 25.0,
            frame_interval: 25,
            downscaled_width: 512,
            downscaled_height: 288,
            video_path: Some("/tmp/input.mp4".to_string()),
        }
    }

    fn source(slug: &str, start: i64, end: i64) -> AudioSource {
        AudioSource {
            source_slug_id: slug.to_string(),
            start_frame_index: start,
            end_frame_index: end,
            duration: (end - start) as f64 / 25.0,
            audio_path: None,
            sound_description: format!("{} sound", slug),
            volume: 1.0,
        }
    }

    fn collection() -> AudioSourceCollection {
        AudioSourceCollection {
            audio_sources: vec![source("Steps1", 0, 75), source("Door1", 100, 125)],
            ambient_audio_sources: vec![source("Rain1", 0, 149)],
        }
    }

    #[test]
    fn test_marker_spans_video_length() {
        let data = project(&collection(), &video());
        match &data.items[0] {
            TimelineItem::Marker(marker) => {
                assert_eq!(marker.id, TRACK_LENGTH_ITEM_ID);
                assert_eq!(marker.group, TRACK_LENGTH_GROUP);
                assert!(!marker.selectable);
                assert_eq!(marker.item_type, "background");
                assert!(matches!(marker.start, TimelineTime::Millis(0)));
                // frame 149 at 25 fps: 5960 ms exact, rounded up to 6000
                assert!(matches!(marker.end, TimelineTime::Millis(6000)));
            }
            other => panic!("first item must be the marker, got {:?}", other),
        }
    }

    #[test]
    fn test_items_follow_partition_and_order() {
        let data = project(&collection(), &video());
        let lanes: Vec<(String, i64)> = data
            .items
            .iter()
            .filter_map(|item| match item {
                TimelineItem::Source(s) => Some((s.id.clone(), s.group)),
                _ => None,
            })
            .collect();
        assert_eq!(
            lanes,
            vec![
                ("Steps1".to_string(), FOREGROUND_GROUP),
                ("Door1".to_string(), FOREGROUND_GROUP),
                ("Rain1".to_string(), AMBIENT_GROUP)
            ]
        );
    }

    #[test]
    fn test_source_item_timestamps() {
        let data = project(&collection(), &video());
        match &data.items[1] {
            TimelineItem::Source(item) => {
                assert!(matches!(item.start, TimelineTime::Millis(0)));
                assert!(matches!(item.end, TimelineTime::Millis(3000)));
                assert_eq!(item.content, "Steps1 sound");
            }
            other => panic!("expected source item, got {:?}", other),
        }
    }

    #[test]
    fn test_projection_is_deterministic() {
        let sources = collection();
        let vi = video();
        let first = serde_json::to_string(&project(&sources, &vi)).unwrap();
        let second = serde_json::to_string(&project(&sources, &vi)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_slugs_unique_and_single_lane() {
        let data = project(&collection(), &video());
        let mut seen = std::collections::HashSet::new();
        for item in &data.items {
            if let TimelineItem::Source(s) = item {
                assert!(seen.insert(s.id.clone()), "duplicate slug {}", s.id);
                assert!(s.group == FOREGROUND_GROUP || s.group == AMBIENT_GROUP);
            }
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_session_without_video_projects_empty() {
        let mut session = EditSession::new();
        session.add_source();
        let data = session.timeline();
        assert!(data.items.is_empty());
        assert_eq!(data.groups.len(), 3);
        assert_eq!(data.groups[1].id, GroupId::Lane(FOREGROUND_GROUP));

        // A video without usable frame metadata is the same unavailable state
        let mut broken = video();
        broken.frame_count = 0;
        session.adopt_video(broken);
        assert!(session.timeline().items.is_empty());
    }
}
