mod recommender;

pub use recommender::{Recommender, MOOD_TRACKS_LIMIT, SIMILAR_TRACKS_LIMIT};
