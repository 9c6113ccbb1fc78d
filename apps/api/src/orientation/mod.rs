// Orientation scoring: trait aggregation, interpretation, career matching.
// The scoring modules are pure; all I/O goes through repository::OrientationStore.

pub mod aggregator;
pub mod engine;
pub mod family;
pub mod handlers;
pub mod interpretation;
pub mod matching;
pub mod models;
pub mod repository;
pub mod traits;
