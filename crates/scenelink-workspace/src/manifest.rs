//! Scene manifest model
//!
//! The `scene.json` file at a project root describes the scene bundle:
//! entry point plus the parcels it occupies.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Name of the manifest file at a project root
pub const MANIFEST_FILE: &str = "scene.json";

/// Parsed `scene.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneManifest {
    /// Scene display name
    #[serde(default)]
    pub name: Option<String>,
    /// Entry point served to clients, relative to the project root
    pub main: String,
    /// Parcel layout
    pub scene: SceneOptions,
}

/// Parcel layout options of a scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneOptions {
    /// Base parcel, must be one of `parcels`
    pub base: String,
    /// Parcels occupied by the scene, as `x,y` pairs
    pub parcels: Vec<String>,
}

impl SceneOptions {
    /// Validate the parcel layout
    ///
    /// # Errors
    /// - `NoParcels` if the parcel list is empty
    /// - `InvalidParcel` for any coordinate that is not an `x,y` integer pair
    /// - `BaseNotInParcels` if `base` is missing from `parcels`
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.parcels.is_empty() {
            return Err(ValidationError::NoParcels);
        }
        for parcel in &self.parcels {
            parse_coords(parcel)?;
        }
        parse_coords(&self.base)?;
        if !self.parcels.contains(&self.base) {
            return Err(ValidationError::BaseNotInParcels {
                base: self.base.clone(),
            });
        }
        Ok(())
    }
}

/// Parse an `x,y` coordinate pair
pub(crate) fn parse_coords(value: &str) -> Result<(i32, i32), ValidationError> {
    let invalid = || ValidationError::InvalidParcel {
        value: value.to_string(),
    };
    let (x, y) = value.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse().map_err(|_| invalid())?;
    let y = y.trim().parse().map_err(|_| invalid())?;
    Ok((x, y))
}
