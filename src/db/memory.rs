use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{Result, ScheduleStore, StoreError};
use crate::booking::model::{RawDocument, ScheduleDocument};

/// Almacén en memoria con la misma semántica de documento completo que
/// MongoDB. Sirve para ejecuciones locales sin base de datos y para tests,
/// donde además permite simular caídas del almacén.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    document: Mutex<Option<RawDocument>>,
    saves: AtomicUsize,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: RawDocument) -> Self {
        Self {
            document: Mutex::new(Some(document)),
            ..Self::default()
        }
    }

    /// Copia del documento guardado actualmente.
    pub fn snapshot(&self) -> Option<RawDocument> {
        match self.document.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Número de escrituras completadas con éxito.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl ScheduleStore for InMemoryStore {
    async fn load(&self) -> Result<Option<RawDocument>> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("lectura simulada fallida".to_string()));
        }

        let guard = self
            .document
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save(&self, document: &ScheduleDocument) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("escritura simulada fallida".to_string()));
        }

        let value =
            serde_json::to_value(document).map_err(|e| StoreError::Encoding(e.to_string()))?;
        let mut guard = self
            .document
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        *guard = Some(value);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
