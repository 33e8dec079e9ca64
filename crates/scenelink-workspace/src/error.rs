//! Validation errors for scene projects

use std::path::PathBuf;

/// Errors surfaced while discovering or validating a scene project
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Scene manifest not found
    #[error("no scene manifest found at {path}")]
    ManifestMissing {
        /// Expected manifest path
        path: PathBuf,
    },

    /// Scene manifest could not be parsed
    #[error("scene manifest at {path} is invalid: {source}")]
    ManifestInvalid {
        /// Manifest path
        path: PathBuf,
        /// Parse failure
        source: serde_json::Error,
    },

    /// Manifest's entry point does not exist on disk
    #[error("scene entry point {main} does not exist")]
    MissingEntryPoint {
        /// Declared entry point
        main: String,
    },

    /// Scene declares no parcels
    #[error("scene declares no parcels")]
    NoParcels,

    /// Parcel coordinate is not an `x,y` integer pair
    #[error("invalid parcel coordinate {value:?}, expected \"x,y\"")]
    InvalidParcel {
        /// Rejected coordinate
        value: String,
    },

    /// Base parcel is not one of the scene's parcels
    #[error("base parcel {base} is not part of the scene's parcels")]
    BaseNotInParcels {
        /// Declared base coordinate
        base: String,
    },

    /// Filesystem failure during discovery or validation
    #[error("workspace io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_descriptive() {
        let err = ValidationError::InvalidParcel {
            value: "1;2".to_string(),
        };
        assert!(err.to_string().contains("1;2"));
        assert!(err.to_string().contains("x,y"));
    }
}
