//! CMP archive extraction

use anyhow::{Context, Result};
use std::path::Path;

use crate::png::write_png;

/// Unpack `input` into `output_dir` as `NNN.tim`, optionally with `NNN.png`
/// beside each. Returns the number of embedded files.
pub fn unpack_archive(input: &Path, output_dir: &Path, png: bool) -> Result<usize> {
    let data = std::fs::read(input)
        .with_context(|| format!("Failed to read archive: {}", input.display()))?;
    let files = wipeout_lz::unpack(&data)
        .with_context(|| format!("Failed to unpack archive: {}", input.display()))?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    for (index, file) in files.iter().enumerate() {
        let path = output_dir.join(format!("{:03}.tim", index));
        std::fs::write(&path, file)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        if png {
            let image = wipeout_formats::decode_image(file)
                .with_context(|| format!("Failed to decode embedded image {}", index))?;
            write_png(&image, &path.with_extension("png"))?;
        }
    }

    Ok(files.len())
}
