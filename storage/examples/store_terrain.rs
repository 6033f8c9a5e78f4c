use terragen_core::{
    FaultFormationParams, GenerationKind, GenerationRequest, PerlinParams, TerrainMetrics,
    TerrainWorker,
};
use terragen_storage::{TerrainDoc, TerrainStore, write_height_dump};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Generate a 256×256 fault-formation tile in the background
    let mut worker = TerrainWorker::new();
    worker.submit(GenerationRequest {
        metrics: TerrainMetrics::default(),
        kind: GenerationKind::FaultFormation {
            perlin: PerlinParams::default(),
            fault: FaultFormationParams::default(),
        },
        seed: Some(2025),
    })?;
    worker.wait();
    let terrain = worker.take().ok_or("worker produced nothing")??;

    write_height_dump(&terrain.height_field, "terrain_2025.txt")?;

    // Init storage
    let storage = TerrainStore::init("mongodb://localhost:27017", "terrain_db", "terrain").await?;

    // Insert & read back
    storage
        .create(TerrainDoc::from_generated("fault-2025", &terrain))
        .await?;
    if let Some(found) = storage.read_by_seed(2025).await? {
        let field = found.height_field()?;
        println!(
            "Round-trip success: sample [128,128] = {}",
            field.get(128, 128)
        );
    } else {
        println!("Document not found!");
    }

    // Clean up
    storage.delete_by_seed(2025).await?;

    Ok(())
}
