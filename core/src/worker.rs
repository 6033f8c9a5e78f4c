use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, TryRecvError, bounded};
use rand::Rng;

use crate::error::{Result, TerrainError};
use crate::height_field::HeightField;
use crate::mesh::{TerrainMesh, TerrainVertex};
use crate::metrics::{ShadingParams, TerrainMetrics};
use crate::random::terrain_rng;
use crate::terrain::{GenerationKind, ProceduralTerrain};

// One background generation job.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub metrics: TerrainMetrics,
    pub kind: GenerationKind,
    // Fixed seed for a reproducible result; `None` draws a fresh one.
    pub seed: Option<u64>,
}

// Finished terrain handed back from the worker thread.
#[derive(Debug, Clone)]
pub struct GeneratedTerrain {
    pub metrics: TerrainMetrics,
    pub kind: GenerationKind,
    pub height_field: HeightField,
    pub mesh: TerrainMesh,
    // Seed the generation actually ran with.
    pub seed: u64,
    pub elapsed: Duration,
}

impl GeneratedTerrain {
    pub fn shading(&self) -> ShadingParams {
        self.metrics.shading()
    }

    pub fn upload(&self) -> TerrainUpload<'_> {
        TerrainUpload {
            vertices: &self.mesh.vertices,
            indices: &self.mesh.indices,
            shading: self.shading(),
        }
    }
}

// Everything a renderer needs from a finished terrain, borrowed
#[derive(Debug, Clone, Copy)]
pub struct TerrainUpload<'a> {
    pub vertices: &'a [TerrainVertex],
    pub indices: &'a [u32],
    pub shading: ShadingParams,
}

// Receives finished terrain on the thread that owns the graphics context.
pub trait RenderBackend {
    type Error: std::error::Error + Send + Sync + 'static;

    fn upload(&mut self, terrain: &TerrainUpload<'_>) -> std::result::Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStatus {
    Idle,
    Running,
    Ready,
}

// Runs one terrain generation at a time on a background thread.
// Results stay parked until `TerrainWorker::finalize` hands them to a
// `RenderBackend`; until then the worker counts as busy.
#[derive(Debug, Default)]
pub struct TerrainWorker {
    in_flight: Option<Receiver<Result<GeneratedTerrain>>>,
    ready: Option<Result<GeneratedTerrain>>,
}

impl TerrainWorker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some() || self.ready.is_some()
    }

    pub fn status(&self) -> WorkerStatus {
        match (&self.ready, &self.in_flight) {
            (Some(_), _) => WorkerStatus::Ready,
            (None, Some(rx)) if !rx.is_empty() => WorkerStatus::Ready,
            (None, Some(_)) => WorkerStatus::Running,
            (None, None) => WorkerStatus::Idle,
        }
    }

    // Start generating on a fresh thread. Rejected while a previous result
    // has not been finalized.
    pub fn submit(&mut self, request: GenerationRequest) -> Result<()> {
        if self.is_busy() {
            log::warn!("terrain worker busy, ignoring {} request", request.kind.name());
            return Err(TerrainError::GenerationInFlight);
        }

        let (tx, rx) = bounded(1);
        std::thread::Builder::new()
            .name("terrain-gen".into())
            .spawn(move || {
                // Receiver gone means the worker was dropped; nothing to report to
                let _ = tx.send(run_request(request));
            })?;

        log::debug!("terrain worker: running");
        self.in_flight = Some(rx);
        Ok(())
    }

    // Collect a completed result without blocking
    pub fn poll(&mut self) -> WorkerStatus {
        if let Some(rx) = &self.in_flight {
            match rx.try_recv() {
                Ok(result) => self.park(result),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => self.park(Err(TerrainError::WorkerLost)),
            }
        }
        self.status()
    }

    // Block until the running generation reports back
    pub fn wait(&mut self) -> WorkerStatus {
        if let Some(rx) = &self.in_flight {
            let result = rx.recv().unwrap_or(Err(TerrainError::WorkerLost));
            self.park(result);
        }
        self.status()
    }

    fn park(&mut self, result: Result<GeneratedTerrain>) {
        self.in_flight = None;
        self.ready = Some(result);
    }

    // Claim a completed result without uploading it
    pub fn take(&mut self) -> Option<Result<GeneratedTerrain>> {
        self.poll();
        self.ready.take()
    }

    // Upload a completed result through `backend` and return it.
    // Call from the thread that owns the graphics context. Returns
    // `Ok(None)` while nothing has completed. A failed generation is
    // returned as its error and frees the worker. A rejected upload keeps
    // the terrain parked so it can be retried or claimed with
    // `TerrainWorker::take`.
    pub fn finalize<B: RenderBackend>(
        &mut self,
        backend: &mut B,
    ) -> Result<Option<GeneratedTerrain>> {
        self.poll();
        let terrain = match self.ready.take() {
            None => return Ok(None),
            Some(result) => result?,
        };

        if let Err(err) = backend.upload(&terrain.upload()) {
            self.ready = Some(Ok(terrain));
            return Err(TerrainError::Upload(Box::new(err)));
        }

        log::info!(
            "terrain generation was finished: {} in {} ms (seed {})",
            terrain.kind.name(),
            terrain.elapsed.as_millis(),
            terrain.seed
        );
        Ok(Some(terrain))
    }
}

// Whole generation pass; runs on the worker thread
fn run_request(request: GenerationRequest) -> Result<GeneratedTerrain> {
    let start = Instant::now();
    let seed = request.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = terrain_rng(Some(seed));

    let mut terrain = ProceduralTerrain::new(request.metrics)?;
    terrain.generate(&request.kind, &mut rng)?;
    let (metrics, height_field, mesh) = terrain.into_parts()?;

    let elapsed = start.elapsed();
    log::debug!("terrain worker: done in {} ms", elapsed.as_millis());
    Ok(GeneratedTerrain {
        metrics,
        kind: request.kind,
        height_field,
        mesh,
        seed,
        elapsed,
    })
}
