// storage persists terrain: plain-text height dumps and MongoDB documents

pub mod error;
pub mod models;
pub mod text;

pub use error::{Result, StorageError};
pub use models::TerrainDoc;
pub use text::{read_height_dump, save_noise_map, write_height_dump};

use bson::{Document, doc};
use futures_util::stream::TryStreamExt;
use mongodb::{Client, Collection, IndexModel, options::ClientOptions};

pub struct TerrainStore {
    col: Collection<TerrainDoc>,
}

impl TerrainStore {
    // Connect and make sure the (name, seed) index exists
    pub async fn init(uri: &str, db_name: &str, col_name: &str) -> Result<Self> {
        let mut opts = ClientOptions::parse(uri).await?;
        opts.app_name = Some("terragen".to_string());
        let client = Client::with_options(opts)?;
        let col = client.database(db_name).collection(col_name);

        let index_model = IndexModel::builder()
            .keys(doc! { "name": 1, "seed": 1 })
            .build();
        col.create_index(index_model).await?;

        log::debug!("terrain store ready: {db_name}.{col_name}");
        Ok(Self { col })
    }

    // Names only; the projection keeps height maps off the wire
    pub async fn list_names(&self) -> Result<Vec<String>> {
        let mut cursor = self
            .col
            .clone_with_type::<Document>()
            .find(doc! {})
            .projection(name_projection())
            .await?;
        let mut names = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            if let Ok(name) = doc.get_str("name") {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    pub async fn read_by_name(&self, name: &str) -> Result<Option<TerrainDoc>> {
        Ok(self.col.find_one(doc! { "name": name }).await?)
    }

    // Insert a terrain, replacing any stored one with the same name and seed
    pub async fn create(&self, doc_obj: TerrainDoc) -> Result<()> {
        let filter = doc! {
            "name": &doc_obj.name,
            "seed": doc_obj.seed,
        };
        let replaced = self.col.delete_one(filter).await?;
        if replaced.deleted_count > 0 {
            log::debug!("replacing stored terrain {:?}", doc_obj.name);
        }

        self.col.insert_one(doc_obj).await?;
        Ok(())
    }

    pub async fn read_by_seed(&self, seed: i64) -> Result<Option<TerrainDoc>> {
        Ok(self.col.find_one(doc! { "seed": seed }).await?)
    }

    pub async fn delete_by_seed(&self, seed: i64) -> Result<()> {
        self.col.delete_one(doc! { "seed": seed }).await?;
        Ok(())
    }
}

fn name_projection() -> Document {
    doc! { "name": 1, "_id": 0 }
}
