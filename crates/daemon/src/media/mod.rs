pub mod ffmpeg;

use anyhow::Result;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, BufReader};

/// Content hash of the uploaded video, used to name its copy inside the
/// session directory.
pub async fn compute_file_checksum(file_path: &Path) -> Result<String> {
    let file = File::open(file_path).await?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut chunk = vec![0u8; 64 * 1024];

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        hasher.update(&chunk[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Shrink dimensions so the longest side fits `max_side`, preserving
/// aspect. Dimensions already within the bound are returned unchanged.
pub fn downscale_dimensions(width: i64, height: i64, max_side: i64) -> (i64, i64) {
    let longest = width.max(height);
    if longest <= max_side {
        return (width, height);
    }
    let scale = max_side as f64 / longest as f64;
    (
        (width as f64 * scale).round() as i64,
        (height as f64 * scale).round() as i64,
    )
}
