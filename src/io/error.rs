//! Error types and context management for generation operations

use std::fmt;
use std::path::PathBuf;

use crate::spatial::room::GridCoord;

/// Main error type for all generation operations
#[derive(Debug)]
pub enum GenerationError {
    /// Room count constraints cannot be met within the sampled size target
    ///
    /// Occurs when every weighted candidate keeps exceeding its effective
    /// maximum, or when no contiguous definition carries any weight.
    InfeasibleRoomCounts {
        /// Pass being built, when known
        pass: Option<usize>,
        /// Consecutive rejected samples before giving up
        rejections: usize,
        /// Description of the infeasibility
        reason: String,
    },

    /// Configuration content is malformed or inconsistent
    InvalidConfiguration {
        /// Description of what's wrong with the configuration
        reason: String,
    },

    /// The starting shape could not be placed at the grid centre
    StartingRoomRejected {
        /// Target cell of the placement
        at: GridCoord,
    },

    /// A pass index beyond the configured passes was requested
    PassIndexOutOfRange {
        /// Requested pass
        index: usize,
        /// Number of configured passes
        passes: usize,
    },

    /// Export was requested for a grid with no rooms
    EmptyDungeon,

    /// Failed to parse a generation group file
    ConfigParse {
        /// Path to the configuration file
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// Failed to save a rendered image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InfeasibleRoomCounts {
                pass,
                rejections,
                reason,
            } => {
                if let Some(pass) = pass {
                    write!(f, "Pass {pass}: ")?;
                }
                write!(
                    f,
                    "Room counts are infeasible after {rejections} rejected samples: {reason}"
                )
            }
            Self::InvalidConfiguration { reason } => {
                write!(f, "Invalid configuration: {reason}")
            }
            Self::StartingRoomRejected { at } => {
                write!(
                    f,
                    "Starting room could not be placed at ({}, {})",
                    at[0], at[1]
                )
            }
            Self::PassIndexOutOfRange { index, passes } => {
                write!(f, "Pass {index} does not exist ({passes} configured)")
            }
            Self::EmptyDungeon => write!(f, "No rooms have been placed in the grid"),
            Self::ConfigParse { path, source } => {
                write!(
                    f,
                    "Failed to parse configuration '{}': {source}",
                    path.display()
                )
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigParse { source, .. } => Some(source),
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for generation results
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Attaches the failing pass index to queue-building errors
pub trait WithPass<T> {
    /// Record which pass produced the error
    ///
    /// # Errors
    ///
    /// Propagates the original error with the pass index applied
    fn with_pass(self, pass: usize) -> Result<T>;
}

impl<T, E> WithPass<T> for std::result::Result<T, E>
where
    E: Into<GenerationError>,
{
    fn with_pass(self, pass: usize) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            // Only infeasibility errors are pass-specific
            if let GenerationError::InfeasibleRoomCounts { pass: slot, .. } = &mut error {
                *slot = Some(pass);
            }
            error
        })
    }
}

/// Create an invalid configuration error
pub fn invalid_configuration(reason: &impl ToString) -> GenerationError {
    GenerationError::InvalidConfiguration {
        reason: reason.to_string(),
    }
}
