//! Race data artifact files
//!
//! Plain JSON, or zstd-compressed JSON when the path ends in `.zst`.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tr_core::RaceData;
use tracing::debug;

const ZSTD_LEVEL: i32 = 3;

pub fn is_compressed(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("zst"))
}

/// Serialize `data` to `path`, creating parent directories
pub fn write_artifact(data: &RaceData, path: &Path, pretty: bool) -> Result<u64> {
    let mut json = data.to_json(pretty).context("failed to serialize race data")?;
    json.push('\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    if is_compressed(path) {
        let mut encoder = zstd::stream::Encoder::new(BufWriter::new(file), ZSTD_LEVEL)?;
        encoder.write_all(json.as_bytes())?;
        encoder.finish()?.flush()?;
    } else {
        let mut writer = BufWriter::new(file);
        writer.write_all(json.as_bytes())?;
        writer.flush()?;
    }

    let written = fs::metadata(path)?.len();
    debug!(path = %path.display(), bytes = written, "Wrote race data");
    Ok(written)
}

/// Read and validate an artifact written by [`write_artifact`] or by any
/// other producer of the same JSON shape
pub fn read_artifact(path: &Path) -> Result<RaceData> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let raw = if is_compressed(path) {
        zstd::stream::decode_all(bytes.as_slice())
            .with_context(|| format!("failed to decompress {}", path.display()))?
    } else {
        bytes
    };
    let json = String::from_utf8(raw).context("race data is not valid UTF-8")?;
    RaceData::from_json(&json).with_context(|| format!("invalid race data in {}", path.display()))
}
