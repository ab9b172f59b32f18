//! Snapshot loading and validation
//!
//! Both snapshots are read once at startup. Anything unexpected in them is a
//! fatal [`LoadError`]: the server refuses to start rather than serve
//! recommendations from data it does not understand.

use super::{Catalog, SimilarityIndex, TrackId, TrackRecord};
use half::f16;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const TRACK_NAME_FIELD: &str = "track_name";
pub const TRACK_ID_FIELD: &str = "track_id";
pub const LABELS_FIELD: &str = "emotions";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Track at position {position} is missing the '{field}' field")]
    MissingField {
        position: usize,
        field: &'static str,
    },

    #[error("Track at position {position} has an invalid '{field}' value: {value}")]
    InvalidField {
        position: usize,
        field: &'static str,
        value: String,
    },

    #[error("Unsupported similarity snapshot {}, expected a .json, .f16 or .f32 file", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Similarity matrix row {row} has {len} columns, expected {expected}")]
    RowLengthMismatch {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("Similarity matrix has {actual} scores, expected {expected} for {dimension} tracks")]
    ScoreCountMismatch {
        actual: usize,
        expected: usize,
        dimension: usize,
    },

    #[error("Similarity snapshot is {actual} bytes long, not a multiple of {width}")]
    TruncatedScore { actual: usize, width: usize },

    #[error("Similarity score at ({row}, {column}) is NaN")]
    NanScore { row: usize, column: usize },

    #[error("Similarity matrix is {dimension}x{dimension} but the catalog has {tracks} tracks")]
    DimensionMismatch { dimension: usize, tracks: usize },
}

fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })
}

/// Flattens any JSON value into the label string used for mood matching.
fn normalize_labels(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(normalize_labels)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

fn required_field<'a>(
    record: &'a Map<String, Value>,
    position: usize,
    field: &'static str,
) -> Result<&'a Value, LoadError> {
    record
        .get(field)
        .ok_or(LoadError::MissingField { position, field })
}

fn parse_track(position: usize, record: &Map<String, Value>) -> Result<TrackRecord, LoadError> {
    let name = match required_field(record, position, TRACK_NAME_FIELD)? {
        Value::String(name) => name.clone(),
        other => {
            return Err(LoadError::InvalidField {
                position,
                field: TRACK_NAME_FIELD,
                value: other.to_string(),
            })
        }
    };

    let raw_id = required_field(record, position, TRACK_ID_FIELD)?;
    let id = match raw_id {
        Value::String(id) => Some(TrackId::Text(id.clone())),
        Value::Number(n) => Some(TrackId::Numeric(n.clone())),
        _ => None,
    }
    .ok_or_else(|| LoadError::InvalidField {
        position,
        field: TRACK_ID_FIELD,
        value: raw_id.to_string(),
    })?;

    let labels = normalize_labels(required_field(record, position, LABELS_FIELD)?);

    Ok(TrackRecord { name, id, labels })
}

/// Validates raw catalog records and normalizes their labels.
pub fn parse_tracks(records: &[Map<String, Value>]) -> Result<Vec<TrackRecord>, LoadError> {
    records
        .iter()
        .enumerate()
        .map(|(position, record)| parse_track(position, record))
        .collect()
}

/// Loads the catalog snapshot: a JSON array of track objects.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, LoadError> {
    let path = path.as_ref();
    info!("Loading catalog from {}...", path.display());
    let bytes = read_file(path)?;
    let records: Vec<Map<String, Value>> =
        serde_json::from_slice(&bytes).map_err(|source| LoadError::Json {
            path: path.to_owned(),
            source,
        })?;
    let catalog = Catalog::new(parse_tracks(&records)?);
    info!("Catalog has {} tracks", catalog.len());
    Ok(catalog)
}

fn decode_raw_scores(
    bytes: &[u8],
    width: usize,
    decode: fn(&[u8]) -> f16,
) -> Result<Vec<f16>, LoadError> {
    if bytes.len() % width != 0 {
        return Err(LoadError::TruncatedScore {
            actual: bytes.len(),
            width,
        });
    }
    Ok(bytes.chunks_exact(width).map(decode).collect())
}

fn decode_f16(chunk: &[u8]) -> f16 {
    f16::from_le_bytes([chunk[0], chunk[1]])
}

fn decode_f32(chunk: &[u8]) -> f16 {
    f16::from_f32(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
}

/// Loads the similarity snapshot for a catalog of `tracks` entries.
///
/// The format is picked from the file extension: `.json` for nested arrays,
/// `.f16` / `.f32` for raw little-endian row-major scores.
pub fn load_similarity_index<P: AsRef<Path>>(
    path: P,
    tracks: usize,
) -> Result<SimilarityIndex, LoadError> {
    let path = path.as_ref();
    info!("Loading similarity matrix from {}...", path.display());

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let index = match extension.as_deref() {
        Some("json") => {
            let bytes = read_file(path)?;
            let rows: Vec<Vec<f32>> =
                serde_json::from_slice(&bytes).map_err(|source| LoadError::Json {
                    path: path.to_owned(),
                    source,
                })?;
            SimilarityIndex::from_rows(rows)?
        }
        Some("f16") => {
            let scores = decode_raw_scores(&read_file(path)?, 2, decode_f16)?;
            SimilarityIndex::from_raw(tracks, scores)?
        }
        Some("f32") => {
            let scores = decode_raw_scores(&read_file(path)?, 4, decode_f32)?;
            SimilarityIndex::from_raw(tracks, scores)?
        }
        _ => return Err(LoadError::UnsupportedFormat(path.to_owned())),
    };

    if index.dimension() != tracks {
        return Err(LoadError::DimensionMismatch {
            dimension: index.dimension(),
            tracks,
        });
    }

    debug!(
        "Similarity matrix is {}x{} ({} bytes in memory)",
        index.dimension(),
        index.dimension(),
        index.dimension() * index.dimension() * std::mem::size_of::<f16>()
    );
    Ok(index)
}
