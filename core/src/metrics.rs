use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

// Heights at which a shader blends between the four terrain textures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiTextureHeights {
    pub height0: f32,
    pub height1: f32,
    pub height2: f32,
    pub height3: f32,
}

impl Default for MultiTextureHeights {
    fn default() -> Self {
        Self {
            height0: 64.0,
            height1: 128.0,
            height2: 192.0,
            height3: 256.0,
        }
    }
}

impl MultiTextureHeights {
    pub fn as_array(&self) -> [f32; 4] {
        [self.height0, self.height1, self.height2, self.height3]
    }
}

// Generation configuration for one terrain tile.
// Fixed for the duration of a generation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainMetrics {
    // Grid columns.
    pub width: usize,
    // Grid rows.
    pub height: usize,
    // World-space edge length of the tile, also the texture coordinate divisor.
    pub terrain_size: f32,
    pub min_height: f32,
    pub max_height: f32,
    // Distance between neighbouring grid vertices.
    pub world_scale: f32,
    // Tile position in a tiled world.
    pub chunk_x: i32,
    pub chunk_y: i32,
    pub texture_scale: f32,
    pub texture_heights: MultiTextureHeights,
}

impl Default for TerrainMetrics {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            terrain_size: 256.0,
            min_height: 0.0,
            max_height: 256.0,
            world_scale: 1.0,
            chunk_x: 0,
            chunk_y: 0,
            texture_scale: 256.0,
            texture_heights: MultiTextureHeights::default(),
        }
    }
}

impl TerrainMetrics {
    // Square tile of `size` cells with edge length `size`
    pub fn square(size: usize, min_height: f32, max_height: f32) -> Self {
        Self {
            width: size,
            height: size,
            terrain_size: size as f32,
            min_height,
            max_height,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TerrainError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.min_height <= self.max_height) {
            return Err(TerrainError::InvalidHeightRange {
                min: self.min_height,
                max: self.max_height,
            });
        }
        if !(self.terrain_size > 0.0) {
            return Err(TerrainError::InvalidMetrics(format!(
                "terrain size must be positive, got {}",
                self.terrain_size
            )));
        }
        if !self.world_scale.is_finite() || !self.texture_scale.is_finite() {
            return Err(TerrainError::InvalidMetrics(
                "world and texture scale must be finite".into(),
            ));
        }
        Ok(())
    }

    // Model-space origin of this tile: chunks sit side by side and the
    // surface is lowered so max_height lands at y = 0
    pub fn chunk_origin(&self) -> Vec3 {
        Vec3::new(
            self.chunk_x as f32 * self.terrain_size,
            -self.max_height,
            self.chunk_y as f32 * self.terrain_size,
        )
    }

    pub fn shading(&self) -> ShadingParams {
        ShadingParams {
            min_height: self.min_height,
            max_height: self.max_height,
            texture_heights: self.texture_heights,
            origin: self.chunk_origin().to_array(),
        }
    }
}

// Plain data a caller forwards to its shading stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingParams {
    pub min_height: f32,
    pub max_height: f32,
    pub texture_heights: MultiTextureHeights,
    pub origin: [f32; 3],
}
