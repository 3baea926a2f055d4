//! Service catalog and per-worker rates.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Service {
    pub service_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub base_price: f64,
}

/// A service a worker offers, with the worker's own hourly rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OfferedService {
    pub service_id: i64,
    pub name: String,
    pub price_per_hour: f64,
}

/// One checkbox row of the worker service form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSelection {
    pub id: i64,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub rate: f64,
}

/// Body of `POST /workers/:id/services`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetWorkerServicesRequest {
    pub services: Vec<ServiceSelection>,
}

impl SetWorkerServicesRequest {
    /// `(service_id, rate)` pairs for the selected rows.
    ///
    /// Fails when nothing is selected or a selected rate is negative or not finite.
    pub fn selected_rates(&self) -> ModelResult<Vec<(i64, f64)>> {
        let selected: Vec<(i64, f64)> = self
            .services
            .iter()
            .filter(|s| s.selected)
            .map(|s| (s.id, s.rate))
            .collect();

        if selected.is_empty() {
            return Err(ModelError::invalid("No services selected"));
        }
        if let Some((id, _)) = selected.iter().find(|(_, rate)| !rate.is_finite() || *rate < 0.0) {
            return Err(ModelError::invalid(format!(
                "Invalid rate for service {id}"
            )));
        }
        Ok(selected)
    }
}
