use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use terragen_core::{GeneratedTerrain, GenerationKind, HeightField, TerrainMetrics};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    pub name: String,
    // Generation seed, bit-cast from u64 since BSON has no unsigned 64-bit type
    pub seed: i64,
    pub kind: GenerationKind,
    pub metrics: TerrainMetrics,
    pub width: u32,
    pub height: u32,
    // Flattened row-major: length = width×height
    pub height_map: Vec<f32>,
}

impl TerrainDoc {
    pub fn from_generated(name: impl Into<String>, terrain: &GeneratedTerrain) -> Self {
        let field = &terrain.height_field;
        Self {
            id: None,
            name: name.into(),
            seed: terrain.seed as i64,
            kind: terrain.kind.clone(),
            metrics: terrain.metrics.clone(),
            width: field.width() as u32,
            height: field.height() as u32,
            height_map: field.as_slice().to_vec(),
        }
    }

    pub fn generation_seed(&self) -> u64 {
        self.seed as u64
    }

    pub fn height_field(&self) -> Result<HeightField> {
        Ok(HeightField::from_vec(
            self.width as usize,
            self.height as usize,
            self.height_map.clone(),
        )?)
    }
}
