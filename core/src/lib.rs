// core holds the height field, the terrain generators, mesh derivation and
// the background generation worker
pub mod error;
pub mod fault;
pub mod height_field;
pub mod mesh;
pub mod metrics;
pub mod midpoint;
pub mod perlin;
pub mod preview;
pub mod random;
pub mod terrain;
pub mod worker;

pub use error::{Result, TerrainError};
pub use fault::{FaultFormation, FaultFormationParams};
pub use height_field::HeightField;
pub use mesh::{TerrainMesh, TerrainVertex};
pub use metrics::{MultiTextureHeights, ShadingParams, TerrainMetrics};
pub use midpoint::{MidpointDisplacement, MidpointParams};
pub use perlin::{PerlinNoise, PerlinParams};
pub use random::{TerrainRng, terrain_rng};
pub use terrain::{GenerationKind, ProceduralTerrain};
pub use worker::{
    GeneratedTerrain, GenerationRequest, RenderBackend, TerrainUpload, TerrainWorker,
    WorkerStatus,
};
