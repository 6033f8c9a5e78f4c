use thiserror::Error;

pub type Result<T> = std::result::Result<T, TerrainError>;

// Everything that can go wrong while configuring or running a generation
#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("octave count {octaves} is outside 1..={max} for a grid of width {width}")]
    InvalidOctaves {
        octaves: u32,
        max: u32,
        width: usize,
    },

    #[error("noise width {0} is not a power of two")]
    WidthNotPowerOfTwo(usize),

    #[error("octave bias must be finite and positive, got {0}")]
    InvalidBias(f32),

    #[error("FIR filter constant must lie in [0, 1), got {0}")]
    InvalidFilter(f32),

    #[error("height range is inverted: min {min} > max {max}")]
    InvalidHeightRange { min: f32, max: f32 },

    #[error("invalid terrain metrics: {0}")]
    InvalidMetrics(String),

    #[error("height field is {actual:?} but {expected:?} was expected")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("buffer holds {actual} values but the grid needs {expected}")]
    BufferLength { expected: usize, actual: usize },

    #[error("a {width}x{height} grid has too many vertices for 32-bit indices")]
    MeshTooLarge { width: usize, height: usize },

    #[error("terrain has not been generated yet")]
    NotGenerated,

    #[error("a terrain generation is already in flight")]
    GenerationInFlight,

    #[error("failed to start the terrain worker thread")]
    Spawn(#[from] std::io::Error),

    #[error("terrain worker stopped without reporting a result")]
    WorkerLost,

    #[error("rendering backend rejected the terrain upload")]
    Upload(#[source] Box<dyn std::error::Error + Send + Sync>),
}
