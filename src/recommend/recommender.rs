use crate::catalog::{Catalog, LoadError, SimilarityIndex, TrackRecord};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// Number of tracks returned for a song based query.
pub const SIMILAR_TRACKS_LIMIT: usize = 10;

/// Number of tracks returned for a mood based query.
pub const MOOD_TRACKS_LIMIT: usize = 15;

/// Answers recommendation queries over an immutable catalog and its
/// similarity index.
#[derive(Debug, Default)]
pub struct Recommender {
    catalog: Catalog,
    similarity: SimilarityIndex,
}

impl Recommender {
    /// Pairs a catalog with its similarity index. The index must have one
    /// row per catalog position.
    pub fn new(catalog: Catalog, similarity: SimilarityIndex) -> Result<Recommender, LoadError> {
        if similarity.dimension() != catalog.len() {
            return Err(LoadError::DimensionMismatch {
                dimension: similarity.dimension(),
                tracks: catalog.len(),
            });
        }
        Ok(Recommender {
            catalog,
            similarity,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // Positions and scores of the best matches for `song`, best first.
    // Equal scores keep column order. The queried track itself is not
    // skipped, it usually ranks first.
    fn top_positions(&self, song: &str) -> Vec<(usize, f32)> {
        let row = match self
            .catalog
            .position_of(song)
            .and_then(|position| self.similarity.row(position))
        {
            Some(row) => row,
            None => return vec![],
        };

        let mut scored: Vec<(usize, f32)> = row
            .iter()
            .map(|score| score.to_f32())
            .enumerate()
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(SIMILAR_TRACKS_LIMIT);
        scored
    }

    /// Tracks most similar to the first catalog track named exactly `song`.
    ///
    /// Returns an empty list when no track has that name.
    pub fn rank_by_similarity(&self, song: &str) -> Vec<&TrackRecord> {
        let tracks: Vec<&TrackRecord> = self
            .top_positions(song)
            .into_iter()
            .filter_map(|(position, _)| self.catalog.get(position))
            .collect();
        debug!("{} similar tracks for {:?}", tracks.len(), song);
        tracks
    }

    /// Tracks whose labels contain `mood`, ignoring case and surrounding
    /// whitespace.
    ///
    /// Identical (name, id, labels) entries are returned once. Results keep
    /// catalog order and a blank mood yields nothing.
    pub fn recommend_by_mood(&self, mood: &str) -> Vec<&TrackRecord> {
        let mood = mood.trim();
        if mood.is_empty() {
            return vec![];
        }
        let needle = mood.to_lowercase();

        let mut seen: HashSet<&TrackRecord> = HashSet::new();
        let mut tracks = Vec::new();
        for (track, labels) in self.catalog.iter_with_lowercase_labels() {
            if tracks.len() == MOOD_TRACKS_LIMIT {
                break;
            }
            if labels.contains(&needle) && seen.insert(track) {
                tracks.push(track);
            }
        }
        debug!("{} tracks for mood {:?}", tracks.len(), mood);
        tracks
    }
}
