//! Core trait abstractions for the pipeline.

pub mod model;

pub use model::GenerativeModel;
