//! track.toml manifest parsing
//!
//! Every key is optional; an empty manifest names the standard files of a
//! Wipeout track directory.
//!
//! ```toml
//! textures = "LIBRARY.CMP"
//! texture_index = "LIBRARY.TTF"
//! vertices = "TRACK.TRV"
//! faces = "TRACK.TRF"
//! sections = "TRACK.TRS"
//! track_texture = "TRACK.TEX"   # Wipeout 2097 and later only
//!
//! [path]
//! tension = 0.5
//! bias = 0.0
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use wipeout_formats::track::{DEFAULT_BIAS, DEFAULT_TENSION};

/// Manifest file looked up in the track directory
pub const MANIFEST_NAME: &str = "track.toml";

/// Standard name of the track texture override file
pub const TRACK_TEXTURE_NAME: &str = "TRACK.TEX";

/// File names (relative to the track directory) and path settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TrackManifest {
    pub textures: PathBuf,
    pub texture_index: PathBuf,
    pub vertices: PathBuf,
    pub faces: PathBuf,
    pub sections: PathBuf,
    pub track_texture: Option<PathBuf>,
    pub path: PathSection,
}

/// Spline settings handed on with the camera path
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathSection {
    pub tension: f32,
    pub bias: f32,
}

impl Default for TrackManifest {
    fn default() -> Self {
        Self {
            textures: "LIBRARY.CMP".into(),
            texture_index: "LIBRARY.TTF".into(),
            vertices: "TRACK.TRV".into(),
            faces: "TRACK.TRF".into(),
            sections: "TRACK.TRS".into(),
            track_texture: None,
            path: PathSection::default(),
        }
    }
}

impl Default for PathSection {
    fn default() -> Self {
        Self {
            tension: DEFAULT_TENSION,
            bias: DEFAULT_BIAS,
        }
    }
}

impl TrackManifest {
    /// Load manifest from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse manifest from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse track.toml")
    }

    /// Load `explicit` if given, else `track.toml` in `dir` if it exists,
    /// else the defaults
    pub fn find(dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let path = dir.join(MANIFEST_NAME);
        if path.exists() {
            tracing::debug!("Using manifest {:?}", path);
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Name TRACK.TEX unless the manifest already names an override file
    pub fn with_track_texture(mut self) -> Self {
        if self.track_texture.is_none() {
            self.track_texture = Some(TRACK_TEXTURE_NAME.into());
        }
        self
    }
}
