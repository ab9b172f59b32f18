#[allow(clippy::module_inception)]
mod catalog;
mod load;
mod similarity;
mod track;

pub use catalog::Catalog;
pub use load::{
    load_catalog, load_similarity_index, parse_tracks, LoadError, LABELS_FIELD, TRACK_ID_FIELD,
    TRACK_NAME_FIELD,
};
pub use similarity::SimilarityIndex;
pub use track::{TrackId, TrackRecord};
