use super::LoadError;
use half::f16;

/// Square matrix of precomputed similarity scores, stored in half precision.
///
/// Row `i` holds the scores of catalog position `i` against every other
/// position. Scores are only used for ordering, so f16 is enough.
#[derive(Debug, Default)]
pub struct SimilarityIndex {
    dimension: usize,
    scores: Vec<f16>,
}

impl SimilarityIndex {
    /// Builds the index from row-major half precision scores.
    pub fn from_raw(dimension: usize, scores: Vec<f16>) -> Result<SimilarityIndex, LoadError> {
        let expected = dimension * dimension;
        if scores.len() != expected {
            return Err(LoadError::ScoreCountMismatch {
                actual: scores.len(),
                expected,
                dimension,
            });
        }
        if let Some(index) = scores.iter().position(|s| s.is_nan()) {
            return Err(LoadError::NanScore {
                row: index / dimension,
                column: index % dimension,
            });
        }
        Ok(SimilarityIndex { dimension, scores })
    }

    /// Builds the index from full precision rows, which must form a square.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<SimilarityIndex, LoadError> {
        let dimension = rows.len();
        let mut scores = Vec::with_capacity(dimension * dimension);
        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != dimension {
                return Err(LoadError::RowLengthMismatch {
                    row: row_index,
                    len: row.len(),
                    expected: dimension,
                });
            }
            scores.extend(row.into_iter().map(f16::from_f32));
        }
        Self::from_raw(dimension, scores)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn row(&self, position: usize) -> Option<&[f16]> {
        if position >= self.dimension {
            return None;
        }
        let start = position * self.dimension;
        Some(&self.scores[start..start + self.dimension])
    }

    pub fn score(&self, row: usize, column: usize) -> Option<f16> {
        self.row(row).and_then(|r| r.get(column).copied())
    }
}
