use anyhow::{Context, Result};
use engine::render::RenderCommand;
use engine::VideoInfo;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::process::Command;

#[derive(Debug, Clone, Deserialize)]
struct ProbeOutput {
    format: Option<FormatInfo>,
    streams: Vec<StreamInfo>,
}

#[derive(Debug, Clone, Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    width: Option<i64>,
    height: Option<i64>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
}

pub struct FFmpegWrapper;

impl FFmpegWrapper {
    /// Probe an uploaded video into the session's `VideoInfo`. The frame
    /// interval defaults to one sample per second; the downscaled
    /// dimensions start equal to the source and are adjusted by the
    /// video-config endpoint.
    pub async fn probe(media_path: &Path) -> Result<VideoInfo> {
        let output = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration:stream=codec_type,width,height,r_frame_rate,avg_frame_rate,nb_frames",
                "-of",
                "json",
                media_path.to_str().context("non-UTF8 media path")?,
            ])
            .output()
            .await
            .context("Failed to execute ffprobe. Make sure FFmpeg is installed.")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("ffprobe failed: {}", stderr);
        }

        let probe: ProbeOutput = serde_json::from_slice(&output.stdout)
            .context("Failed to parse ffprobe JSON output")?;

        let duration = probe
            .format
            .and_then(|f| f.duration)
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(0.0);

        let video_stream = probe
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .context("no video stream in input")?;

        let width = video_stream.width.unwrap_or(0);
        let height = video_stream.height.unwrap_or(0);

        let fps_str = video_stream
            .r_frame_rate
            .as_deref()
            .or(video_stream.avg_frame_rate.as_deref());
        let frame_rate = fps_str.and_then(parse_frame_rate).unwrap_or(0.0);

        // Container metadata may carry the exact count; otherwise derive it.
        let frame_count = video_stream
            .nb_frames
            .as_deref()
            .and_then(|n| n.parse::<i64>().ok())
            .unwrap_or_else(|| (duration * frame_rate).round() as i64);

        Ok(VideoInfo {
            width,
            height,
            duration,
            frame_count,
            frame_rate,
            frame_interval: frame_rate.round().max(1.0) as i64,
            downscaled_width: width,
            downscaled_height: height,
            video_path: None,
        })
    }

    /// Execute a render command generated by the engine.
    pub async fn run_render(command: &RenderCommand) -> Result<PathBuf> {
        let output = Command::new("ffmpeg")
            .args(&command.ffmpeg_args)
            .output()
            .await
            .context("Failed to execute ffmpeg. Make sure FFmpeg is installed.")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("ffmpeg render failed: {}", stderr);
        }

        Ok(command.output_path.clone())
    }
}

/// Parse ffprobe's fractional frame rate ("30/1", "30000/1001").
fn parse_frame_rate(value: &str) -> Option<f64> {
    let mut parts = value.split('/');
    let num = parts.next()?.parse::<f64>().ok()?;
    let den = match parts.next() {
        Some(d) => d.parse::<f64>().ok()?,
        None => 1.0,
    };
    if den == 0.0 {
        return None;
    }
    Some(num / den)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer_fraction() {
        assert_eq!(parse_frame_rate("30/1"), Some(30.0));
        assert_eq!(parse_frame_rate("25"), Some(25.0));
    }

    #[test]
    fn test_parse_ntsc_fraction() {
        let fps = parse_frame_rate("30000/1001").unwrap();
        assert!((fps - 29.97).abs() < 0.01);
    }

    #[test]
    fn test_parse_rejects_zero_denominator() {
        assert_eq!(parse_frame_rate("30/0"), None);
        assert_eq!(parse_frame_rate("garbage"), None);
    }
}
