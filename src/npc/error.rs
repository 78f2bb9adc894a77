//! Error types for NPC data loading and spawning.

use thiserror::Error;

/// Errors that can occur when reading NPC or level data files.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },
}

/// Configuration that cannot produce a working NPC. Refused at spawn.
#[derive(Debug, Error, PartialEq)]
pub enum NpcConfigError {
    /// Patrol route has no waypoints.
    #[error("Patrol route has no waypoints")]
    EmptyWaypoints,

    /// A value that must be strictly positive is not.
    #[error("'{field}' must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    /// A value that must not be negative is.
    #[error("'{field}' must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    /// Spawn references a definition that was never loaded.
    #[error("Unknown NPC definition: {0}")]
    UnknownDefinition(String),

    /// Attack damage window is not an ordered pair inside the clip.
    #[error("Damage window ({start}, {end}) must satisfy 0 <= start <= end <= 1")]
    InvalidDamageWindow { start: f32, end: f32 },
}
