use terragen_core::{GenerationKind, HeightField, ProceduralTerrain, TerrainMetrics, terrain_rng};
use terragen_storage::{StorageError, read_height_dump, save_noise_map, write_height_dump};

#[test]
fn dump_roundtrip_preserves_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("heights.txt");

    let data = (0..12).map(|i| i as f32 * 0.37 - 1.5).collect();
    let field = HeightField::from_vec(4, 3, data).unwrap();
    write_height_dump(&field, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 3);

    let back = read_height_dump(&path, 4, 3).unwrap();
    assert_eq!(back, field);
}

#[test]
fn wrong_size_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("heights.txt");
    write_height_dump(&HeightField::new(3, 3).unwrap(), &path).unwrap();

    assert!(matches!(
        read_height_dump(&path, 4, 4),
        Err(StorageError::LengthMismatch {
            expected: 16,
            actual: 9,
            ..
        })
    ));
}

#[test]
fn garbage_token_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("heights.txt");
    std::fs::write(&path, "1.0 2.0\nthree 4.0\n").unwrap();

    match read_height_dump(&path, 2, 2) {
        Err(StorageError::Parse { index, token, .. }) => {
            assert_eq!(index, 2);
            assert_eq!(token, "three");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        read_height_dump(dir.path().join("absent.txt"), 2, 2),
        Err(StorageError::Io { .. })
    ));
}

#[test]
fn noise_map_needs_a_generation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noise.txt");

    let mut terrain = ProceduralTerrain::new(TerrainMetrics::square(16, 0.0, 10.0)).unwrap();
    assert!(matches!(
        save_noise_map(terrain.perlin(), &path),
        Err(StorageError::Terrain(_))
    ));

    terrain
        .generate(&GenerationKind::default(), &mut terrain_rng(Some(6)))
        .unwrap();
    save_noise_map(terrain.perlin(), &path).unwrap();
    let noise = read_height_dump(&path, 16, 16).unwrap();
    assert_eq!(&noise, terrain.perlin().noise_map().unwrap());
    assert!(noise.as_slice().iter().all(|v| (0.0..1.0).contains(v)));
}
