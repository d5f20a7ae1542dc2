use anyhow::Result;
use engine::AudioSourceCollection;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

const DEFAULT_TTSFX_SERVICE_URL: &str = "http://127.0.0.1:8002";

fn service_url() -> String {
    std::env::var("AUTOFOLEY_TTSFX_URL").unwrap_or_else(|_| DEFAULT_TTSFX_SERVICE_URL.to_string())
}

/// Synthesize one sound-effect clip. `Ok(None)` means the service produced
/// nothing for this prompt; the caller keeps whatever clip it already had.
pub async fn generate_audio(
    prompt: &str,
    duration_seconds: f64,
    api_key: &str,
    out_dir: &Path,
) -> Result<Option<PathBuf>> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/ttsfx/generate", service_url()))
        .bearer_auth(api_key)
        .json(&serde_json::json!({
            "prompt": prompt,
            "duration_seconds": duration_seconds,
        }))
        .send()
        .await?;

    if !response.status().is_success() {
        anyhow::bail!("ttsfx service returned error: {}", response.status());
    }

    let audio = response.bytes().await?;
    if audio.is_empty() {
        return Ok(None);
    }

    tokio::fs::create_dir_all(out_dir).await?;
    let clip_path = out_dir.join(format!("{}.wav", Uuid::new_v4()));
    tokio::fs::write(&clip_path, &audio).await?;
    Ok(Some(clip_path))
}

/// Synthesize clips for every source in both partitions. A source whose
/// synthesis comes back empty keeps its previous audio path.
pub async fn generate_all_audio(
    sources: &mut AudioSourceCollection,
    api_key: &str,
    out_dir: &Path,
) -> Result<()> {
    for source in sources.iter_all_mut() {
        match generate_audio(&source.sound_description, source.duration, api_key, out_dir).await? {
            Some(path) => source.audio_path = Some(path.to_string_lossy().to_string()),
            None => warn!(
                slug = %source.source_slug_id,
                "synthesis returned no audio, keeping previous clip"
            ),
        }
    }
    Ok(())
}
