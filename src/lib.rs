pub mod config;
pub mod cooccurrence;
pub mod engine;
pub mod error;
pub mod frequency;
pub mod history;
pub mod models;
pub mod normalize;
pub mod sampler;
