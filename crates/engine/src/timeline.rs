use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const TRACK_LENGTH_GROUP: &str = "track-length";
pub const TRACK_LENGTH_ITEM_ID: &str = "track-length-item";

/// Widget lane for foreground sources.
pub const FOREGROUND_GROUP: i64 = 1;
/// Widget lane for ambient sources.
pub const AMBIENT_GROUP: i64 = 2;

/// The groups/items structure exchanged with the visual timeline widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineData {
    pub groups: Vec<TimelineGroup>,
    pub items: Vec<TimelineItem>,
}

impl TimelineData {
    /// The fixed three-lane structure with no items, used before any
    /// generation has produced sources.
    pub fn empty() -> Self {
        TimelineData {
            groups: vec![
                TimelineGroup::named(TRACK_LENGTH_GROUP),
                TimelineGroup::lane(FOREGROUND_GROUP),
                TimelineGroup::lane(AMBIENT_GROUP),
            ],
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineGroup {
    pub id: GroupId,
    pub content: String,
}

impl TimelineGroup {
    pub fn named(id: &str) -> Self {
        TimelineGroup {
            id: GroupId::Name(id.to_string()),
            content: String::new(),
        }
    }

    pub fn lane(id: i64) -> Self {
        TimelineGroup {
            id: GroupId::Lane(id),
            content: String::new(),
        }
    }
}

/// Group ids are heterogeneous on the wire: the marker lane is a string,
/// the source lanes are integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupId {
    Name(String),
    Lane(i64),
}

/// One entry in the widget's item list.
///
/// The marker and source shapes are distinguished structurally rather than
/// by the magic group name, so ingestion can filter on the variant. Items
/// matching neither shape deserialize as `Opaque` and are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimelineItem {
    Marker(TrackMarkerItem),
    Source(SourceItem),
    Opaque(Value),
}

/// The synthetic background span representing total video length. Never
/// user-editable, regenerated on every projection, never matched against
/// an audio source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackMarkerItem {
    pub id: String,
    pub content: String,
    pub group: String,
    pub selectable: bool,
    #[serde(rename = "type")]
    pub item_type: String,
    pub start: TimelineTime,
    pub end: TimelineTime,
    #[serde(rename = "className")]
    pub class_name: String,
}

/// One draggable/resizable item per audio source; `id` is the source slug
/// and is the only field the widget must preserve round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceItem {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub group: i64,
    pub start: TimelineTime,
    pub end: TimelineTime,
}

/// A point in widget time. Projection always emits `Millis`; the widget may
/// hand back either epoch milliseconds or an ISO-8601 string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimelineTime {
    Millis(i64),
    Text(String),
    Other(Value),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_id_wire_shapes() {
        let groups = TimelineData::empty().groups;
        let json = serde_json::to_value(&groups).unwrap();
        assert_eq!(json[0]["id"], "track-length");
        assert_eq!(json[1]["id"], 1);
        assert_eq!(json[2]["id"], 2);
    }

    #[test]
    fn test_source_item_round_trip() {
        let json = serde_json::json!({
            "id": "Footsteps1",
            "content": "footsteps on gravel",
            "group": 1,
            "start": 0,
            "end": "1970-01-01T00:00:03.000Z"
        });
        let item: TimelineItem = serde_json::from_value(json).unwrap();
        match item {
            TimelineItem::Source(source) => {
                assert_eq!(source.id, "Footsteps1");
                assert!(matches!(source.end, TimelineTime::Text(_)));
            }
            other => panic!("expected source item, got {:?}", other),
        }
    }

    #[test]
    fn test_marker_item_is_structural() {
        let json = serde_json::json!({
            "id": TRACK_LENGTH_ITEM_ID,
            "content": "",
            "group": TRACK_LENGTH_GROUP,
            "selectable": false,
            "type": "background",
            "start": 0,
            "end": 6000,
            "className": "color-primary-600"
        });
        let item: TimelineItem = serde_json::from_value(json).unwrap();
        assert!(matches!(item, TimelineItem::Marker(_)));
    }

    #[test]
    fn test_foreign_item_deserializes_as_opaque() {
        let json = serde_json::json!({"weird": ["shape"], "start": 10});
        let item: TimelineItem = serde_json::from_value(json).unwrap();
        assert!(matches!(item, TimelineItem::Opaque(_)));
    }
}
