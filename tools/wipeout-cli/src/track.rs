//! Track directory export

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use wipeout_formats::{Track, TrackFiles};

use crate::manifest::TrackManifest;
use crate::png::write_png;

pub struct TrackOptions {
    pub manifest: Option<PathBuf>,
    /// Load TRACK.TEX even when the manifest does not name it
    pub force_tex: bool,
    /// JSON destination; stdout when absent
    pub output: Option<PathBuf>,
    /// Directory for composed track textures
    pub textures: Option<PathBuf>,
}

fn read(dir: &Path, name: &Path) -> Result<Vec<u8>> {
    let path = dir.join(name);
    std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Decode the track in `dir` and write its camera path as JSON
pub fn export_track(dir: &Path, options: &TrackOptions) -> Result<()> {
    let mut manifest = TrackManifest::find(dir, options.manifest.as_deref())?;
    if options.force_tex {
        manifest = manifest.with_track_texture();
    }

    let vertices = read(dir, &manifest.vertices)?;
    let faces = read(dir, &manifest.faces)?;
    let sections = read(dir, &manifest.sections)?;
    let texture_index = read(dir, &manifest.texture_index)?;
    let track_texture = manifest
        .track_texture
        .as_deref()
        .map(|name| read(dir, name))
        .transpose()?;

    let files = TrackFiles {
        vertices: &vertices,
        faces: &faces,
        sections: &sections,
        texture_index: &texture_index,
        track_texture: track_texture.as_deref(),
    };
    let track = Track::decode(&files)
        .with_context(|| format!("Failed to decode track: {}", dir.display()))?;

    let path = track
        .camera_path()
        .with_context(|| format!("Failed to build camera path: {}", dir.display()))?
        .with_spline(manifest.path.tension, manifest.path.bias);
    tracing::info!(
        "{} sections, {} faces, {} path points",
        track.sections.len(),
        track.faces.len(),
        path.points.len()
    );

    if let Some(out_dir) = &options.textures {
        write_textures(dir, &manifest, &track, out_dir)?;
    }

    let json = serde_json::to_string_pretty(&path).context("Failed to serialize camera path")?;
    match &options.output {
        Some(output) => std::fs::write(output, json)
            .with_context(|| format!("Failed to write {}", output.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}

/// Compose every near texture from the library tiles and save as PNG
fn write_textures(
    dir: &Path,
    manifest: &TrackManifest,
    track: &Track,
    out_dir: &Path,
) -> Result<()> {
    let archive = read(dir, &manifest.textures)?;
    let tiles = wipeout_formats::decode_archive_images(&archive)
        .with_context(|| format!("Failed to decode {}", manifest.textures.display()))?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create directory: {}", out_dir.display()))?;

    for (index, entry) in track.texture_index.iter().enumerate() {
        let image = entry
            .compose_near(&tiles)
            .with_context(|| format!("Failed to compose track texture {}", index))?;
        write_png(&image, &out_dir.join(format!("{:03}.png", index)))?;
    }
    tracing::info!(
        "Wrote {} track textures to {:?}",
        track.texture_index.len(),
        out_dir
    );
    Ok(())
}
