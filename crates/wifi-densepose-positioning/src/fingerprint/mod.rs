//! Location fingerprinting: recorded RSSI signatures and KNN matching.

pub mod collect;
pub mod matcher;
pub mod record;
pub mod store;

pub use collect::{average_signatures, collect_fingerprint};
pub use matcher::{
    cosine_similarity, euclidean_distance, Classification, ConfidenceBands, KnnMatcher,
    MatchCandidate,
};
pub use record::{FingerprintMap, FingerprintRecord};
pub use store::{FingerprintStats, FingerprintStore};
