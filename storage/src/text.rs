// Plain-text height dumps: whitespace separated floats, one grid row per
// line, no header. Readers must be told the grid size.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use terragen_core::{HeightField, PerlinNoise, TerrainError};

use crate::error::{Result, StorageError};

pub fn write_height_dump(field: &HeightField, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let io_err = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut out = BufWriter::new(File::create(path).map_err(io_err)?);
    for row in field.rows() {
        let line = row
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{line}").map_err(io_err)?;
    }
    out.flush().map_err(io_err)?;

    log::debug!(
        "wrote {}x{} height dump to {}",
        field.width(),
        field.height(),
        path.display()
    );
    Ok(())
}

pub fn read_height_dump(
    path: impl AsRef<Path>,
    width: usize,
    height: usize,
) -> Result<HeightField> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let values = text
        .split_whitespace()
        .enumerate()
        .map(|(index, token)| {
            token.parse::<f32>().map_err(|source| StorageError::Parse {
                path: path.to_path_buf(),
                index,
                token: token.to_string(),
                source,
            })
        })
        .collect::<Result<Vec<f32>>>()?;

    if values.len() != width * height {
        return Err(StorageError::LengthMismatch {
            path: path.to_path_buf(),
            expected: width * height,
            actual: values.len(),
        });
    }
    Ok(HeightField::from_vec(width, height, values)?)
}

// Dump the raw [0, 1) noise of the last generation
pub fn save_noise_map(perlin: &PerlinNoise, path: impl AsRef<Path>) -> Result<()> {
    let noise = perlin.noise_map().ok_or(TerrainError::NotGenerated)?;
    write_height_dump(noise, path)
}
