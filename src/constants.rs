//! Cross-cutting, shared constants.
//!
//! Scoring weights and cutoffs live here so the scorer, the ranking step and the tests agree
//! on a single source of truth.

/// Output dimension of the sentence embedder (MiniLM-class BERT).
pub const EMBEDDING_DIM: usize = 384;

/// Max tokens fed to the sentence embedder.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

/// Characters of `source_notes` included in the candidate text.
pub const SOURCE_NOTES_CHAR_LIMIT: usize = 500;

/// Weight of the embedding similarity in the final score.
pub const EMBEDDING_WEIGHT: f32 = 0.7;
/// Weight of the metadata bonus in the final score.
pub const METADATA_WEIGHT: f32 = 0.3;

/// Bonus when `system_component` agrees.
pub const SYSTEM_COMPONENT_BONUS: f32 = 0.15;
/// Bonus when `failure_mode` agrees.
pub const FAILURE_MODE_BONUS: f32 = 0.10;
/// Bonus when `level2` agrees.
pub const LEVEL2_BONUS: f32 = 0.05;

/// Candidates scoring below this are dropped (inclusive lower bound).
pub const SIMILARITY_CUTOFF: f32 = 0.5;

/// Default number of similar complaints returned.
pub const DEFAULT_SIMILAR_LIMIT: usize = 5;

/// A snapshot is requested after this many new cache insertions.
pub const DEFAULT_SNAPSHOT_EVERY: u64 = 10;

/// Capacity of the snapshot request queue. Requests beyond it coalesce.
pub const SNAPSHOT_QUEUE_CAPACITY: usize = 1;

/// Default inference timeout in seconds.
pub const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 200;

/// Opening marker of the reasoning span in model replies.
pub const REASONING_OPEN: &str = "<think>";
/// Closing marker of the reasoning span in model replies.
pub const REASONING_CLOSE: &str = "</think>";

/// Separator used when folding multiple classification objects.
pub const FOLD_SEPARATOR: &str = "|";

/// Default location of the embedding snapshot file.
pub const DEFAULT_CACHE_PATH: &str = "./.data/embeddings.rkyv";

/// Snapshot format version. Snapshots with another version are ignored on load.
pub const SNAPSHOT_VERSION: u32 = 1;
