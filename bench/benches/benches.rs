use criterion::{Criterion, criterion_group, criterion_main};
use terragen_core::preview::render_preview;
use terragen_core::{
    FaultFormationParams, GenerationKind, HeightField, MidpointParams, PerlinNoise, PerlinParams,
    ProceduralTerrain, TerrainMesh, TerrainMetrics, terrain_rng,
};

const SIZE: usize = 256;
const SEED: u64 = 2025;

fn metrics() -> TerrainMetrics {
    TerrainMetrics::square(SIZE, 0.0, 256.0)
}

fn bench_perlin_synthesize(c: &mut Criterion) {
    let mut perlin = PerlinNoise::new(SIZE, SIZE).unwrap();
    perlin.regenerate_seed(&mut terrain_rng(Some(SEED)));
    c.bench_function("Perlin synthesize (5 octaves)", |b| {
        b.iter(|| perlin.synthesize(5, 2.0).unwrap())
    });
}

fn bench_generation(c: &mut Criterion, label: &str, kind: GenerationKind) {
    c.bench_function(label, |b| {
        b.iter(|| {
            let mut terrain = ProceduralTerrain::new(metrics()).unwrap();
            terrain.generate(&kind, &mut terrain_rng(Some(SEED))).unwrap();
        })
    });
}

fn bench_perlin_terrain(c: &mut Criterion) {
    bench_generation(
        c,
        "Perlin terrain + mesh",
        GenerationKind::Perlin(PerlinParams::default()),
    );
}

fn bench_fault_formation(c: &mut Criterion) {
    bench_generation(
        c,
        "Fault formation (200 faults) + FIR + mesh",
        GenerationKind::FaultFormation {
            perlin: PerlinParams::default(),
            fault: FaultFormationParams::default(),
        },
    );
}

fn bench_midpoint_displacement(c: &mut Criterion) {
    bench_generation(
        c,
        "Midpoint displacement + mesh",
        GenerationKind::MidpointDisplacement {
            perlin: PerlinParams::default(),
            midpoint: MidpointParams::default(),
        },
    );
}

fn bench_mesh_and_preview(c: &mut Criterion) {
    let mut terrain = ProceduralTerrain::new(metrics()).unwrap();
    terrain
        .generate(&GenerationKind::default(), &mut terrain_rng(Some(SEED)))
        .unwrap();
    let field: HeightField = terrain.height_field().unwrap().clone();

    c.bench_function("Mesh from height field", |b| {
        b.iter(|| TerrainMesh::from_height_field(&field, &metrics()).unwrap())
    });
    c.bench_function("Preview image", |b| {
        b.iter(|| render_preview(&field, &metrics().shading()))
    });
}

criterion_group!(
    terrain_benchmarks,
    bench_perlin_synthesize,
    bench_perlin_terrain,
    bench_fault_formation,
    bench_midpoint_displacement,
    bench_mesh_and_preview
);
criterion_main!(terrain_benchmarks);
