use anyhow::Result;
use engine::{AudioSourceCollection, VideoInfo};
use serde_json::Value;

const DEFAULT_VISION_SERVICE_URL: &str = "http://127.0.0.1:8001";

fn service_url() -> String {
    std::env::var("AUTOFOLEY_VISION_URL").unwrap_or_else(|_| DEFAULT_VISION_SERVICE_URL.to_string())
}

/// Ask the vision-LM service to describe the video's sound events. The
/// service samples the video at `FrameInterval` using the downscaled
/// dimensions and returns the two-partition collection JSON.
pub async fn describe_video(
    video: &VideoInfo,
    instruction: &str,
    api_key: &str,
) -> Result<AudioSourceCollection> {
    let video_path = video
        .video_path
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("session has no video copy to describe"))?;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/vision/describe", service_url()))
        .bearer_auth(api_key)
        .json(&serde_json::json!({
            "video_path": video_path,
            "frame_interval": video.frame_interval,
            "width": video.downscaled_width,
            "height": video.downscaled_height,
            "instruction": instruction,
        }))
        .send()
        .await?;

    if !response.status().is_success() {
        anyhow::bail!("vision service returned error: {}", response.status());
    }

    let body: Value = response.json().await?;
    parse_collection(body)
}

/// Validate the description result: it must be an object carrying both
/// partition arrays. Anything else is not usable and the caller should
/// regenerate.
pub fn parse_collection(value: Value) -> Result<AudioSourceCollection> {
    let has_both_partitions = value.get("AudioSources").map_or(false, Value::is_array)
        && value
            .get("AmbientAudioSources")
            .map_or(false, Value::is_array);
    if !has_both_partitions {
        anyhow::bail!("description result is missing the audio source partitions");
    }
    serde_json::from_value(value)
        .map_err(|e| anyhow::anyhow!("description result is not usable: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_collection() {
        let value = serde_json::json!({
            "AudioSources": [{
                "SourceSlugID": "DogBark1",
                "StartFrameIndex": 12,
                "EndFrameIndex": 48,
                "Duration": 1.44,
                "AudioPath": null,
                "SoundDescription": "a dog barking twice",
                "Volume": 1.0
            }],
            "AmbientAudioSources": []
        });
        let collection = parse_collection(value).unwrap();
        assert_eq!(collection.audio_sources.len(), 1);
        assert_eq!(collection.audio_sources[0].source_slug_id, "DogBark1");
    }

    #[test]
    fn test_parse_rejects_missing_partition() {
        assert!(parse_collection(serde_json::json!({"AudioSources": []})).is_err());
        assert!(parse_collection(serde_json::json!("just text")).is_err());
        assert!(parse_collection(serde_json::json!({
            "AudioSources": "not a list",
            "AmbientAudioSources": []
        }))
        .is_err());
    }
}
