use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Collection, Database};

use super::{Result, ScheduleStore, StoreError};
use crate::api::middleware::ErrorLogExt;
use crate::booking::model::{RawDocument, ScheduleDocument};
use crate::config::MongoSettings;

/// Documento de agenda guardado en MongoDB.
///
/// Toda la agenda es un único documento de la colección, identificado por
/// `document_id`. La escritura reemplaza el documento entero (`upsert`), igual
/// que el cliente web existente.
#[derive(Debug, Clone)]
pub struct MongoStore {
    database: Database,
    collection: String,
    document_id: String,
}

impl MongoStore {
    pub async fn init(settings: &MongoSettings) -> Result<MongoStore> {
        let client = Client::with_uri_str(&settings.uri)
            .await
            .map_err(|e| StoreError::database("connect", e))?;

        let database = client.database(&settings.database);

        // Test connection
        database
            .run_command(doc! {"ping": 1})
            .await
            .map_err(|e| StoreError::database("ping", e))?;

        tracing::info!(
            database = %settings.database,
            collection = %settings.collection,
            "Conexión a MongoDB establecida exitosamente"
        );

        Ok(MongoStore {
            database,
            collection: settings.collection.clone(),
            document_id: settings.document_id.clone(),
        })
    }

    pub fn schedules(&self) -> Collection<Document> {
        self.database.collection(&self.collection)
    }

    fn id_filter(&self) -> Document {
        doc! { "_id": self.document_id.as_str() }
    }
}

#[async_trait::async_trait]
impl ScheduleStore for MongoStore {
    async fn load(&self) -> Result<Option<RawDocument>> {
        let found = self
            .schedules()
            .find_one(self.id_filter())
            .await
            .log_error_context("loading schedule document")
            .map_err(|e| StoreError::database("load_schedule", e))?;

        Ok(found.map(|mut document| {
            document.remove("_id");
            Bson::Document(document).into_relaxed_extjson()
        }))
    }

    async fn save(&self, document: &ScheduleDocument) -> Result<()> {
        let mut replacement = mongodb::bson::to_document(document)
            .map_err(|e| StoreError::Encoding(e.to_string()))?;
        replacement.insert("_id", self.document_id.as_str());

        self.schedules()
            .replace_one(self.id_filter(), replacement)
            .upsert(true)
            .await
            .log_error_context("saving schedule document")
            .map_err(|e| StoreError::database("save_schedule", e))?;

        tracing::debug!(
            stored_date = %document.stored_date,
            reservations = document.reservations.len(),
            "Documento de agenda guardado"
        );
        Ok(())
    }
}
