//! Repository layer — pluggable storage backend
//!
//! Abstracts rate-series reads and model/anomaly persistence so different
//! backends can be swapped without touching engine code:
//! - `InMemoryStore`: in-memory store for testing and minimal deployments
//! - Future: a real time-series/relational backend for production fleets
//!
//! CRUD semantics only; no transactions. The store is constructed explicitly
//! and injected into the engine — there is no module-level global.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::types::{Anomaly, DeclineCurveModel, MeasurementKind, RateObservation};

/// Trait for pluggable persistence backends
///
/// Implementations must be thread-safe (Send + Sync) for shared access
/// across async tasks.
pub trait ProductionStore: Send + Sync {
    /// Historical rate series for an asset and phase, in chronological order
    fn rate_series(
        &self,
        asset_id: &str,
        kind: MeasurementKind,
    ) -> Result<Vec<RateObservation>, StoreError>;

    /// Append observations to an asset's series
    fn append_observations(
        &self,
        asset_id: &str,
        observations: &[RateObservation],
    ) -> Result<(), StoreError>;

    /// Persist a fitted decline model
    fn store_model(&self, model: &DeclineCurveModel) -> Result<(), StoreError>;

    /// Fetch a model by id
    fn get_model(&self, id: &str) -> Result<Option<DeclineCurveModel>, StoreError>;

    /// Models for an asset, most recent first
    fn list_models(&self, asset_id: &str) -> Result<Vec<DeclineCurveModel>, StoreError>;

    /// Persist detected anomalies
    fn store_anomalies(&self, anomalies: &[Anomaly]) -> Result<(), StoreError>;

    /// Anomalies for an asset, most recent first
    fn list_anomalies(&self, asset_id: &str, limit: usize) -> Result<Vec<Anomaly>, StoreError>;

    /// Backend name for logging
    fn backend_name(&self) -> &'static str;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("not found")]
    NotFound,
}

/// In-memory repository for testing and minimal deployments
///
/// Thread-safe via `RwLock`. Not durable — data lost on restart.
pub struct InMemoryStore {
    series: RwLock<HashMap<(String, MeasurementKind), Vec<RateObservation>>>,
    models: RwLock<Vec<DeclineCurveModel>>,
    anomalies: RwLock<Vec<Anomaly>>,
    max_models: usize,
    max_anomalies: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            series: RwLock::new(HashMap::new()),
            models: RwLock::new(Vec::new()),
            anomalies: RwLock::new(Vec::new()),
            max_models: 1000,
            max_anomalies: 5000,
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductionStore for InMemoryStore {
    fn rate_series(
        &self,
        asset_id: &str,
        kind: MeasurementKind,
    ) -> Result<Vec<RateObservation>, StoreError> {
        let store = self
            .series
            .read()
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(store
            .get(&(asset_id.to_string(), kind))
            .cloned()
            .unwrap_or_default())
    }

    fn append_observations(
        &self,
        asset_id: &str,
        observations: &[RateObservation],
    ) -> Result<(), StoreError> {
        let mut store = self
            .series
            .write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        for obs in observations {
            store
                .entry((asset_id.to_string(), obs.kind))
                .or_default()
                .push(obs.clone());
        }

        // keep each series chronological regardless of append order
        for series in store.values_mut() {
            series.sort_by_key(|obs| obs.timestamp);
        }

        Ok(())
    }

    fn store_model(&self, model: &DeclineCurveModel) -> Result<(), StoreError> {
        let mut store = self
            .models
            .write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        store.push(model.clone());

        // Evict oldest if over limit
        if store.len() > self.max_models {
            store.remove(0);
        }

        Ok(())
    }

    fn get_model(&self, id: &str) -> Result<Option<DeclineCurveModel>, StoreError> {
        let store = self
            .models
            .read()
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(store.iter().find(|m| m.id == id).cloned())
    }

    fn list_models(&self, asset_id: &str) -> Result<Vec<DeclineCurveModel>, StoreError> {
        let store = self
            .models
            .read()
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(store
            .iter()
            .rev()
            .filter(|m| m.asset_id == asset_id)
            .cloned()
            .collect())
    }

    fn store_anomalies(&self, anomalies: &[Anomaly]) -> Result<(), StoreError> {
        let mut store = self
            .anomalies
            .write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        store.extend_from_slice(anomalies);

        while store.len() > self.max_anomalies {
            store.remove(0);
        }

        Ok(())
    }

    fn list_anomalies(&self, asset_id: &str, limit: usize) -> Result<Vec<Anomaly>, StoreError> {
        let store = self
            .anomalies
            .read()
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(store
            .iter()
            .rev()
            .filter(|a| a.asset_id == asset_id)
            .take(limit)
            .cloned()
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "InMemory"
    }
}
