// Generates and saves one 256×256 colour preview per algorithm:
// Perlin noise
// Fault formation
// Midpoint displacement

use std::path::Path;

use terragen_core::preview::render_preview;
use terragen_core::{
    FaultFormationParams, GenerationKind, MidpointParams, PerlinParams, ProceduralTerrain,
    TerrainMetrics, terrain_rng,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let metrics = TerrainMetrics::default();
    let perlin = PerlinParams::default();
    let kinds = [
        GenerationKind::Perlin(perlin),
        GenerationKind::FaultFormation {
            perlin,
            fault: FaultFormationParams::default(),
        },
        GenerationKind::MidpointDisplacement {
            perlin,
            midpoint: MidpointParams {
                roughness: 1.2,
                ..Default::default()
            },
        },
    ];

    for kind in &kinds {
        let mut terrain = ProceduralTerrain::new(metrics.clone())?;
        let mesh = terrain.generate(kind, &mut terrain_rng(Some(2025)))?;
        let triangles = mesh.triangle_count();

        let field = terrain.height_field().ok_or("terrain was not generated")?;
        let img = render_preview(field, &terrain.shading());
        let filename = format!("terrain_{}.png", kind.name());
        img.save(Path::new(&filename))?;
        println!("Saved {filename} ({triangles} triangles)");
    }
    Ok(())
}
