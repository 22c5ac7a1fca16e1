use mongodb::bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::sync::Client;
use mongodb::sync::Database;

use super::KvStore;

const KV_COLLECTION: &str = "kv";

/// MongoDB-backed implementation of the KvStore trait.
/// One document per key: `{ key, value }`.
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Create a new MongoStore by connecting to the given URI and database name.
    pub fn new(uri: &str, db_name: &str) -> Result<Self, String> {
        let client_options = ClientOptions::parse(uri).map_err(|e| e.to_string())?;
        let client = Client::with_options(client_options).map_err(|e| e.to_string())?;
        let db = client.database(db_name);
        Ok(Self { db })
    }

    /// Test connectivity by pinging the server.
    pub fn test_connection(&self) -> Result<(), String> {
        self.db
            .run_command(doc! { "ping": 1 }, None)
            .map_err(|e| format!("MongoDB connection test failed: {}", e))?;
        Ok(())
    }

    /// Ensure the unique index on `key` exists.
    pub fn run_migrations(&self) -> Result<(), String> {
        use mongodb::IndexModel;

        let kv = self.db.collection::<Document>(KV_COLLECTION);
        kv.create_index(
            IndexModel::builder()
                .keys(doc! { "key": 1 })
                .options(
                    mongodb::options::IndexOptions::builder()
                        .unique(true)
                        .build(),
                )
                .build(),
            None,
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }
}

impl KvStore for MongoStore {
    fn kv_try_get(&self, key: &str) -> Result<Option<String>, String> {
        let coll = self.db.collection::<Document>(KV_COLLECTION);
        let d = coll
            .find_one(doc! { "key": key }, None)
            .map_err(|e| e.to_string())?;
        Ok(d.and_then(|d| d.get_str("value").ok().map(|s| s.to_string())))
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), String> {
        let coll = self.db.collection::<Document>(KV_COLLECTION);
        let opts = mongodb::options::UpdateOptions::builder()
            .upsert(true)
            .build();
        coll.update_one(
            doc! { "key": key },
            doc! { "$set": { "key": key, "value": value } },
            opts,
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    fn backend(&self) -> &str {
        "mongodb"
    }
}
