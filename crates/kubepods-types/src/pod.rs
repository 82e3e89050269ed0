use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::{ContainerInfo, PodPhase};

/// Failure to turn `kubectl get pods -o json` output into pod records
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid pod list JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("pod #{index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },
}

/// A pod as fetched on one refresh
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PodRecord {
    pub name: String,
    pub namespace: String,
    pub phase: PodPhase,
    /// Absent while the pod has not been scheduled yet
    pub start_time: Option<DateTime<Utc>>,
    pub containers: Vec<ContainerInfo>,
}

impl PodRecord {
    /// Decode the full list document printed by `kubectl get pods -o json`
    pub fn parse_list(json: &str) -> Result<Vec<Self>, DecodeError> {
        let list: PodListJson = serde_json::from_str(json)?;
        list.items
            .into_iter()
            .enumerate()
            .map(|(index, item)| item.into_record(index))
            .collect()
    }

    /// Sum of container restarts
    pub fn restart_count(&self) -> u64 {
        self.containers
            .iter()
            .map(|c| u64::from(c.restart_count))
            .sum()
    }

    /// Number of containers reporting ready
    pub fn ready_count(&self) -> usize {
        self.containers.iter().filter(|c| c.ready).count()
    }
}

#[derive(Deserialize)]
struct PodListJson {
    items: Vec<PodJson>,
}

#[derive(Deserialize)]
struct PodJson {
    #[serde(default)]
    metadata: MetadataJson,
    status: Option<StatusJson>,
}

#[derive(Deserialize, Default)]
struct MetadataJson {
    name: Option<String>,
    namespace: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusJson {
    phase: Option<String>,
    start_time: Option<DateTime<Utc>>,
    container_statuses: Option<Vec<ContainerStatusJson>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContainerStatusJson {
    #[serde(default)]
    name: String,
    restart_count: u32,
    ready: bool,
}

impl PodJson {
    fn into_record(self, index: usize) -> Result<PodRecord, DecodeError> {
        let missing = |field| DecodeError::MissingField { index, field };

        let name = self.metadata.name.ok_or_else(|| missing("metadata.name"))?;
        let namespace = self
            .metadata
            .namespace
            .ok_or_else(|| missing("metadata.namespace"))?;
        let status = self.status.ok_or_else(|| missing("status"))?;
        let phase = status.phase.ok_or_else(|| missing("status.phase"))?;

        let containers = status
            .container_statuses
            .unwrap_or_default()
            .into_iter()
            .map(|cs| {
                let mut container = ContainerInfo::new(cs.name);
                container.ready = cs.ready;
                container.restart_count = cs.restart_count;
                container
            })
            .collect();

        Ok(PodRecord {
            name,
            namespace,
            phase: PodPhase::from(phase.as_str()),
            start_time: status.start_time,
            containers,
        })
    }
}
