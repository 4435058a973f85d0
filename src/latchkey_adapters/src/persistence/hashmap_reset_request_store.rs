use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use latchkey_core::{
    ResetCode, ResetRequest, ResetRequestStore, ResetRequestStoreError, ResetStatus,
};

/// In-memory reset request store keyed by code.
///
/// `save_if_status` compares and writes under one write lock, which gives
/// the compare-and-set the reset workflow relies on.
#[derive(Default, Clone)]
pub struct HashMapResetRequestStore {
    requests: Arc<RwLock<HashMap<ResetCode, ResetRequest>>>,
}

impl HashMapResetRequestStore {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.requests.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.requests.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl ResetRequestStore for HashMapResetRequestStore {
    async fn find_by_code(
        &self,
        code: &ResetCode,
    ) -> Result<Option<ResetRequest>, ResetRequestStoreError> {
        let requests = self.requests.read().await;
        Ok(requests.get(code).cloned())
    }

    async fn insert(&self, request: ResetRequest) -> Result<(), ResetRequestStoreError> {
        let mut requests = self.requests.write().await;
        if requests.contains_key(request.code()) {
            return Err(ResetRequestStoreError::CodeConflict);
        }
        requests.insert(request.code().clone(), request);
        Ok(())
    }

    async fn save(&self, request: &ResetRequest) -> Result<(), ResetRequestStoreError> {
        let mut requests = self.requests.write().await;
        let stored = requests
            .get_mut(request.code())
            .ok_or(ResetRequestStoreError::RequestNotFound)?;
        *stored = request.clone();
        Ok(())
    }

    async fn save_if_status(
        &self,
        request: &ResetRequest,
        expected: ResetStatus,
    ) -> Result<bool, ResetRequestStoreError> {
        let mut requests = self.requests.write().await;
        let stored = requests
            .get_mut(request.code())
            .ok_or(ResetRequestStoreError::RequestNotFound)?;
        if stored.status() != expected {
            return Ok(false);
        }
        *stored = request.clone();
        Ok(true)
    }
}
