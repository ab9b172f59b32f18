use super::TrackRecord;

/// Ordered, immutable list of tracks.
///
/// Positions are stable for the lifetime of the catalog and are what the
/// similarity index is aligned with.
#[derive(Debug, Default)]
pub struct Catalog {
    tracks: Vec<TrackRecord>,
    // Lowercased copy of each track's labels, same positions as `tracks`.
    lowercase_labels: Vec<String>,
}

impl Catalog {
    pub fn new(tracks: Vec<TrackRecord>) -> Catalog {
        let lowercase_labels = tracks.iter().map(|t| t.labels.to_lowercase()).collect();
        Catalog {
            tracks,
            lowercase_labels,
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&TrackRecord> {
        self.tracks.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackRecord> {
        self.tracks.iter()
    }

    /// All track names in catalog order, duplicates included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tracks.iter().map(|t| t.name.as_str())
    }

    /// Position of the first track whose name is exactly `name`.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.name == name)
    }

    pub(crate) fn iter_with_lowercase_labels(&self) -> impl Iterator<Item = (&TrackRecord, &str)> {
        self.tracks
            .iter()
            .zip(self.lowercase_labels.iter().map(String::as_str))
    }
}
