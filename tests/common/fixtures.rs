//! Snapshot fixtures written to temporary directories

use super::constants::*;
use anyhow::Result;
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

/// The fixture catalog, as it would come out of the data preparation step.
///
/// Labels come in the shapes seen in real snapshots: plain strings, lists
/// and nulls.
pub fn test_tracks() -> Value {
    json!([
        {"track_name": BLUE_SKY, "track_id": "t0", "emotions": "Happy"},
        {"track_name": RAINY_DAY, "track_id": "t1", "emotions": "Sad"},
        {"track_name": "Sunrise Run", "track_id": "t2", "emotions": "Happy Energetic"},
        {"track_name": MIDNIGHT_DRIVE, "track_id": MIDNIGHT_DRIVE_ID, "emotions": "Calm"},
        {"track_name": BLUE_SKY, "track_id": "t4", "emotions": "sad, reflective"},
        {"track_name": BLUE_SKY, "track_id": "t0", "emotions": "Happy"},
        {"track_name": "Golden Hour", "track_id": "t6", "emotions": "UNHAPPY"},
        {"track_name": "Storm Front", "track_id": "t7", "emotions": "Angry"},
        {"track_name": "Slow Waves", "track_id": "t8", "emotions": null},
        {"track_name": "Party Lights", "track_id": "t9", "emotions": "happy; dance"},
        {"track_name": "Lullaby", "track_id": "t10", "emotions": ["Calm", "sleepy"]},
        {"track_name": "Open Road", "track_id": "t11", "emotions": "Energetic"},
    ])
}

/// Similarity of (i, j) is `1 - |i - j| * SCORE_STEP`.
pub fn test_similarity(size: usize) -> Vec<Vec<f32>> {
    (0..size)
        .map(|i| {
            (0..size)
                .map(|j| 1.0 - (i as f32 - j as f32).abs() * SCORE_STEP)
                .collect()
        })
        .collect()
}

/// Writes both snapshots into a fresh temporary directory.
///
/// Returns the directory guard and the songs and similarity paths.
pub fn create_test_snapshots(
    tracks: &Value,
    similarity: &[Vec<f32>],
) -> Result<(TempDir, PathBuf, PathBuf)> {
    let dir = TempDir::new()?;
    let songs_path = dir.path().join("songs.json");
    let similarity_path = dir.path().join("similarity.json");
    std::fs::write(&songs_path, serde_json::to_vec(tracks)?)?;
    std::fs::write(&similarity_path, serde_json::to_vec(similarity)?)?;
    Ok((dir, songs_path, similarity_path))
}
