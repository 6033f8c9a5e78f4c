// Runs a fault-formation generation on the worker thread while the main
// thread keeps "rendering", then finalizes the result into a stand-in backend.
// Try `RUST_LOG=debug cargo run --example background_generation`.

use std::convert::Infallible;
use std::time::Duration;

use terragen_core::{
    FaultFormationParams, GenerationKind, GenerationRequest, PerlinParams, RenderBackend,
    TerrainMetrics, TerrainUpload, TerrainWorker, WorkerStatus,
};

// Counts what would have gone to the GPU
#[derive(Default)]
struct CountingBackend {
    vertex_bytes: usize,
    index_bytes: usize,
}

impl RenderBackend for CountingBackend {
    type Error = Infallible;

    fn upload(&mut self, terrain: &TerrainUpload<'_>) -> Result<(), Self::Error> {
        self.vertex_bytes += std::mem::size_of_val(terrain.vertices);
        self.index_bytes += std::mem::size_of_val(terrain.indices);
        log::info!(
            "uploaded terrain, origin {:?}, heights {}..{}",
            terrain.shading.origin,
            terrain.shading.min_height,
            terrain.shading.max_height
        );
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut worker = TerrainWorker::new();
    let mut backend = CountingBackend::default();

    worker.submit(GenerationRequest {
        metrics: TerrainMetrics {
            chunk_x: 1,
            ..TerrainMetrics::square(512, 0.0, 200.0)
        },
        kind: GenerationKind::FaultFormation {
            perlin: PerlinParams::default(),
            fault: FaultFormationParams {
                iterations: 300,
                ..Default::default()
            },
        },
        seed: None,
    })?;

    // Frame loop: poll without blocking until the terrain is ready
    let mut frames = 0u32;
    while worker.poll() == WorkerStatus::Running {
        frames += 1;
        std::thread::sleep(Duration::from_millis(16));
    }

    if let Some(terrain) = worker.finalize(&mut backend)? {
        println!(
            "Generated seed {} in {:?} over {frames} frames: {} vertex bytes, {} index bytes",
            terrain.seed, terrain.elapsed, backend.vertex_bytes, backend.index_bytes
        );
    }
    Ok(())
}
