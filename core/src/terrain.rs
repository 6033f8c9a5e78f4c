use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::fault::{FaultFormation, FaultFormationParams};
use crate::height_field::HeightField;
use crate::mesh::TerrainMesh;
use crate::metrics::{ShadingParams, TerrainMetrics};
use crate::midpoint::{MidpointDisplacement, MidpointParams};
use crate::perlin::{PerlinNoise, PerlinParams};

// Which algorithm shapes the terrain, with its parameters.
// The fractal generators start from a Perlin base surface. Their final
// height range always comes from the terrain's `TerrainMetrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GenerationKind {
    Perlin(PerlinParams),
    FaultFormation {
        perlin: PerlinParams,
        fault: FaultFormationParams,
    },
    MidpointDisplacement {
        perlin: PerlinParams,
        midpoint: MidpointParams,
    },
}

impl Default for GenerationKind {
    fn default() -> Self {
        Self::Perlin(PerlinParams::default())
    }
}

impl GenerationKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Perlin(_) => "perlin",
            Self::FaultFormation { .. } => "fault_formation",
            Self::MidpointDisplacement { .. } => "midpoint_displacement",
        }
    }

    pub fn perlin(&self) -> &PerlinParams {
        match self {
            Self::Perlin(p) => p,
            Self::FaultFormation { perlin, .. } => perlin,
            Self::MidpointDisplacement { perlin, .. } => perlin,
        }
    }
}

// One terrain tile: metrics, noise source, and the latest field and mesh
#[derive(Debug)]
pub struct ProceduralTerrain {
    metrics: TerrainMetrics,
    perlin: PerlinNoise,
    field: Option<HeightField>,
    mesh: Option<TerrainMesh>,
}

impl ProceduralTerrain {
    pub fn new(metrics: TerrainMetrics) -> Result<Self> {
        metrics.validate()?;
        let perlin = PerlinNoise::new(metrics.width, metrics.height)?;
        Ok(Self {
            metrics,
            perlin,
            field: None,
            mesh: None,
        })
    }

    // Replace the height field and mesh with a freshly generated pair
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        kind: &GenerationKind,
        rng: &mut R,
    ) -> Result<&TerrainMesh> {
        let (min_height, max_height) = (self.metrics.min_height, self.metrics.max_height);

        // Every check runs before the noise source is reseeded, so a rejected
        // request leaves the terrain and its noise map untouched
        let perlin = kind.perlin();
        perlin.validate()?;
        self.perlin.check_params(perlin.octaves, perlin.bias)?;
        let fault = match kind {
            GenerationKind::FaultFormation { fault, .. } => Some(FaultFormation::new(
                FaultFormationParams {
                    min_height,
                    max_height,
                    ..*fault
                },
            )?),
            _ => None,
        };
        let midpoint = match kind {
            GenerationKind::MidpointDisplacement { midpoint, .. } => {
                Some(MidpointDisplacement::new(MidpointParams {
                    min_height,
                    max_height,
                    ..*midpoint
                })?)
            }
            _ => None,
        };

        let mut field = HeightField::new(self.metrics.width, self.metrics.height)?;
        self.perlin.generate(&mut field, perlin, max_height, rng)?;
        if let Some(fault) = &fault {
            fault.run(&mut field, rng);
        }
        if let Some(midpoint) = &midpoint {
            midpoint.run(&mut field, rng);
        }

        let mesh = TerrainMesh::from_height_field(&field, &self.metrics)?;
        log::debug!(
            "{} terrain: {} vertices, {} triangles",
            kind.name(),
            mesh.vertices.len(),
            mesh.triangle_count()
        );
        self.field = Some(field);
        Ok(self.mesh.insert(mesh))
    }

    pub fn is_generated(&self) -> bool {
        self.field.is_some()
    }

    pub fn metrics(&self) -> &TerrainMetrics {
        &self.metrics
    }

    pub fn perlin(&self) -> &PerlinNoise {
        &self.perlin
    }

    pub fn height_field(&self) -> Option<&HeightField> {
        self.field.as_ref()
    }

    pub fn mesh(&self) -> Option<&TerrainMesh> {
        self.mesh.as_ref()
    }

    pub fn shading(&self) -> ShadingParams {
        self.metrics.shading()
    }

    // Height of grid cell (x, z); None before generation or off the grid
    pub fn height_at(&self, x: usize, z: usize) -> Option<f32> {
        self.field.as_ref()?.try_get(x, z)
    }

    // Bilinear height at a model-space position, clamped to the tile
    pub fn height_interpolated(&self, x: f32, z: f32) -> Option<f32> {
        let field = self.field.as_ref()?;
        let scale = self.metrics.world_scale;
        if scale == 0.0 {
            return field.try_get(0, 0);
        }
        Some(field.sample_bilinear(x / scale, z / scale))
    }

    // Random surface points in world space, lowered by max_height like the
    // rendered tile so they sit on top of it
    pub fn random_points<R: Rng + ?Sized>(
        &self,
        amount: usize,
        rng: &mut R,
    ) -> Result<Vec<Vec3>> {
        let field = self.field.as_ref().ok_or(TerrainError::NotGenerated)?;
        let (w, h) = field.dimensions();
        let origin = self.metrics.chunk_origin();
        let scale = self.metrics.world_scale;

        Ok((0..amount)
            .map(|_| {
                let x = rng.random_range(0..w);
                let z = rng.random_range(0..h);
                origin + Vec3::new(x as f32 * scale, field.get(x, z), z as f32 * scale)
            })
            .collect())
    }

    // Hand over the generated field and mesh, e.g. to leave a worker thread
    pub fn into_parts(self) -> Result<(TerrainMetrics, HeightField, TerrainMesh)> {
        match (self.field, self.mesh) {
            (Some(field), Some(mesh)) => Ok((self.metrics, field, mesh)),
            _ => Err(TerrainError::NotGenerated),
        }
    }
}
