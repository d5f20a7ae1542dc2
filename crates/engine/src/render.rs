use std::path::PathBuf;

use crate::source::{AudioSource, AudioSourceCollection, VideoInfo};

pub struct RenderCommand {
    pub ffmpeg_args: Vec<String>,
    pub output_path: PathBuf,
}

/// Generate the FFmpeg invocation that composites every synthesized clip
/// onto the input video: per-source gain and delay, one mix, video stream
/// copied through. Sources with no generated audio are skipped; with
/// nothing to mix the command degrades to a plain stream copy.
pub fn generate_render_command(
    sources: &AudioSourceCollection,
    video: &VideoInfo,
    input_path: PathBuf,
    output_path: PathBuf,
) -> RenderCommand {
    let clips: Vec<&AudioSource> = sources
        .iter_all()
        .filter(|source| source.audio_path.is_some())
        .collect();

    let mut args = vec!["-i".to_string(), input_path.to_string_lossy().to_string()];

    if clips.is_empty() {
        args.extend([
            "-c".to_string(),
            "copy".to_string(),
            "-y".to_string(),
            output_path.to_string_lossy().to_string(),
        ]);
        return RenderCommand {
            ffmpeg_args: args,
            output_path,
        };
    }

    for clip in &clips {
        args.push("-i".to_string());
        args.push(clip.audio_path.clone().unwrap());
    }

    args.push("-filter_complex".to_string());
    args.push(build_mix_filter(&clips, video.frame_rate));
    args.extend([
        "-map".to_string(),
        "0:v".to_string(),
        "-map".to_string(),
        "[aout]".to_string(),
        "-c:v".to_string(),
        "copy".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-b:a".to_string(),
        "192k".to_string(),
        "-shortest".to_string(),
        "-y".to_string(),
        output_path.to_string_lossy().to_string(),
    ]);

    RenderCommand {
        ffmpeg_args: args,
        output_path,
    }
}

/// Per clip: apply its gain, delay it to its start frame's wall-clock
/// offset, then mix everything into [aout]. Input 0 is the video.
fn build_mix_filter(clips: &[&AudioSource], frame_rate: f64) -> String {
    let mut parts = Vec::new();
    for (idx, clip) in clips.iter().enumerate() {
        let input = idx + 1;
        let delay_ms = ((clip.start_frame_index as f64 / frame_rate) * 1000.0) as i64;
        parts.push(format!(
            "[{}:a]volume={},adelay={}|{}[s{}]",
            input, clip.volume, delay_ms, delay_ms, idx
        ));
    }
    let mix_inputs: String = (0..clips.len()).map(|i| format!("[s{}]", i)).collect();
    parts.push(format!(
        "{}amix=inputs={}:normalize=0[aout]",
        mix_inputs,
        clips.len()
    ));
    parts.join(";")
}
