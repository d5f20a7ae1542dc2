use crate::session::EditSession;
use crate::source::{AudioSource, AudioSourceCollection, VideoInfo};
use crate::time::date_to_milliseconds;
use crate::timeline::{SourceItem, TimelineData, TimelineItem};

/// Write the widget's edited representation back onto the collection.
///
/// Each source is matched against the items by slug; marker and opaque
/// items, and items whose id names no source, are ignored. Matched items
/// are clamped to the video bounds and applied. The scan is
/// O(sources x items), which is fine at per-video source counts.
pub fn apply_timeline_edit(
    data: &TimelineData,
    sources: &mut AudioSourceCollection,
    video: &VideoInfo,
) {
    let duration_ms = video.duration_ms();
    let frame_rate = video.frame_rate;

    for source in sources.iter_all_mut() {
        for item in &data.items {
            if let TimelineItem::Source(item) = item {
                if item.id == source.source_slug_id {
                    apply_item(source, item, duration_ms, frame_rate);
                    break;
                }
            }
        }
    }
}

/// Clamp an edited item to the video and copy it onto the source. Start is
/// floored at zero, end is capped at the video's length; if the two cross
/// after clamping the inverted range is written through as-is, and the
/// resulting non-positive duration is the downstream validation signal.
fn apply_item(source: &mut AudioSource, item: &SourceItem, duration_ms: i64, frame_rate: f64) {
    let start_ms = date_to_milliseconds(&item.start).max(0);
    let end_ms = date_to_milliseconds(&item.end).min(duration_ms);
    source.start_frame_index = ((start_ms as f64 / 1000.0) * frame_rate) as i64;
    source.end_frame_index = ((end_ms as f64 / 1000.0) * frame_rate) as i64;
    source.duration = (end_ms - start_ms) as f64 / 1000.0;
}

impl EditSession {
    /// Ingest a widget edit into the session. Without a usable video there
    /// is nothing to clamp against, so the edit is a defined no-op.
    pub fn apply_timeline_edit(&mut self, data: &TimelineData) {
        if let Some(video) = &self.video {
            if video.conversions_available() {
                apply_timeline_edit(data, &mut self.sources, video);
            }
        }
    }
}
