#[cfg(test)]
pub mod memory;

use crate::models::{
    document, BulkWriteResult, DeleteResult, InsertResult, UpsertResult,
};
use crate::utils::AppError;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Collection, Database};

pub const JOBS_COLLECTION: &str = "jobs";
pub const PORTALS_COLLECTION: &str = "portals";

/// Operations the HTTP layer performs against a collection of schemaless
/// documents. Handlers only see this trait; `main` injects `MongoDB`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Round-trip to the server, used by `/health`
    async fn ping(&self) -> Result<(), AppError>;

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, AppError>;

    async fn insert_one(&self, collection: &str, doc: Document) -> Result<InsertResult, AppError>;

    /// `updateOne({id}, {$set: fields}, {upsert: true})`
    async fn upsert_by_id(
        &self,
        collection: &str,
        id: Bson,
        fields: Document,
    ) -> Result<UpsertResult, AppError>;

    /// `deleteOne({id})`; zero matches is not an error
    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<DeleteResult, AppError>;

    /// Upserts every document by its own `id`, in order, stopping at the
    /// first failure. An empty batch is rejected like an empty bulk write.
    async fn bulk_upsert(
        &self,
        collection: &str,
        docs: Vec<Document>,
    ) -> Result<BulkWriteResult, AppError> {
        if docs.is_empty() {
            return Err(AppError::DatabaseError(
                "Invalid BulkOperation, Batch cannot be empty".to_string(),
            ));
        }

        let mut result = BulkWriteResult::default();
        for (index, doc) in docs.into_iter().enumerate() {
            let key = document::upsert_key(&doc);
            let upsert = self
                .upsert_by_id(collection, key, document::set_fields(doc))
                .await?;
            result.record(index, upsert);
        }
        Ok(result)
    }
}

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    /// Builds the client and checks it with a ping. Only an unparsable URI is
    /// fatal: the driver connects lazily, so an unreachable server is logged
    /// and every later operation reports its own failure.
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, AppError> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Pool shared by every request
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        // Timeouts given in the URI win
        client_options
            .connect_timeout
            .get_or_insert(std::time::Duration::from_secs(5));
        client_options
            .server_selection_timeout
            .get_or_insert(std::time::Duration::from_secs(5));
        client_options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);
        let mongodb = Self { client, db };

        match mongodb.ping().await {
            Ok(()) => {
                log::info!("✅ Successfully connected to MongoDB!");
                mongodb.ensure_indexes().await;
            }
            Err(e) => log::error!("❌ MongoDB connection error: {}", e),
        }

        Ok(mongodb)
    }

    /// Non-unique lookups on `id`; uniqueness is only a convention kept by upserts
    async fn ensure_indexes(&self) {
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        for name in [JOBS_COLLECTION, PORTALS_COLLECTION] {
            let index = IndexModel::builder().keys(doc! { "id": 1 }).build();

            match self.collection::<Document>(name).create_index(index).await {
                Ok(_) => log::info!("   ✅ Index ready: {}(id)", name),
                Err(e) => log::warn!("   ⚠️  Could not create index on {}(id): {}", name, e),
            }
        }
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Closes the driver's connections. Called once the HTTP server has stopped.
    pub async fn shutdown(&self) {
        self.client.clone().shutdown().await;
    }
}

#[async_trait]
impl DocumentStore for MongoDB {
    async fn ping(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, AppError> {
        let cursor = self.collection::<Document>(collection).find(doc! {}).await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs)
    }

    async fn insert_one(&self, collection: &str, doc: Document) -> Result<InsertResult, AppError> {
        let result = self.collection::<Document>(collection).insert_one(doc).await?;

        Ok(InsertResult {
            acknowledged: true,
            inserted_id: document::bson_to_json(result.inserted_id),
        })
    }

    async fn upsert_by_id(
        &self,
        collection: &str,
        id: Bson,
        fields: Document,
    ) -> Result<UpsertResult, AppError> {
        let result = self
            .collection::<Document>(collection)
            .update_one(doc! { "id": id }, doc! { "$set": fields })
            .upsert(true)
            .await?;

        let upserted_id = result.upserted_id.map(document::bson_to_json);
        Ok(UpsertResult {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: upserted_id.is_some() as u64,
            upserted_id,
        })
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<DeleteResult, AppError> {
        let result = self
            .collection::<Document>(collection)
            .delete_one(doc! { "id": id })
            .await?;

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }
}
