// Payload of the metrics endpoint.

use serde::{Deserialize, Serialize};

/// Recently stored records, each serialized to a JSON string.
/// `metrics` is omitted when nothing has been read (no backend configured).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<String>>,
}

impl MetricsList {
    pub fn from_metrics(metrics: Vec<String>) -> Self {
        Self {
            metrics: Some(metrics),
        }
    }

    pub fn len(&self) -> usize {
        self.metrics.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
