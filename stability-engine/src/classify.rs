//! Frequency classification of message clusters.

use serde::{Deserialize, Serialize};

use crate::cluster::MessageCluster;

/// Frequency at or above which a cluster is a core message.
const CORE_THRESHOLD: f64 = 0.8;
/// Frequency at or above which a cluster is at least variable.
const VARIABLE_THRESHOLD: f64 = 0.3;

/// A message present in (almost) every iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreMessage {
    pub message: String,
    /// Appearance frequency in percent (0–100).
    pub frequency_pct: f64,
}

/// A message that comes and goes across iterations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableMessage {
    pub message: String,
    pub frequency_pct: f64,
    /// Sorted iteration indices in which the message appeared.
    pub appearances: Vec<u32>,
}

/// A message seen only rarely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierMessage {
    pub message: String,
    pub frequency_pct: f64,
}

/// Clusters bucketed by appearance frequency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifiedMessages {
    pub core: Vec<CoreMessage>,
    pub variable: Vec<VariableMessage>,
    pub outliers: Vec<OutlierMessage>,
}

/// Bucket clusters by `|iterations| / total_iterations`.
///
/// Core at frequency ≥ 0.8, variable in [0.3, 0.8), outlier below 0.3.
/// Bucket-internal order follows cluster insertion order.
pub fn classify_clusters(clusters: &[MessageCluster], total_iterations: u32) -> ClassifiedMessages {
    let mut out = ClassifiedMessages::default();
    if total_iterations == 0 {
        return out;
    }

    for cluster in clusters {
        let frequency = cluster.iterations.len() as f64 / total_iterations as f64;
        let frequency_pct = frequency * 100.0;

        if frequency >= CORE_THRESHOLD {
            out.core.push(CoreMessage {
                message: cluster.representative.clone(),
                frequency_pct,
            });
        } else if frequency >= VARIABLE_THRESHOLD {
            out.variable.push(VariableMessage {
                message: cluster.representative.clone(),
                frequency_pct,
                appearances: cluster.iterations.iter().copied().collect(),
            });
        } else {
            out.outliers.push(OutlierMessage {
                message: cluster.representative.clone(),
                frequency_pct,
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn cluster(message: &str, iterations: &[u32]) -> MessageCluster {
        MessageCluster {
            representative: message.into(),
            iterations: iterations.iter().copied().collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn buckets_at_the_documented_thresholds() {
        let clusters = vec![
            cluster("core message", &[1, 2, 3, 4]),     // 4/5 = 0.8
            cluster("variable message", &[2, 5]),       // 2/5 = 0.4
            cluster("outlier message", &[3]),           // 1/5 = 0.2
        ];
        let classified = classify_clusters(&clusters, 5);

        assert_eq!(classified.core.len(), 1);
        assert_eq!(classified.core[0].message, "core message");
        assert!((classified.core[0].frequency_pct - 80.0).abs() < 1e-9);

        assert_eq!(classified.variable.len(), 1);
        assert_eq!(classified.variable[0].appearances, vec![2, 5]);
        assert!((classified.variable[0].frequency_pct - 40.0).abs() < 1e-9);

        assert_eq!(classified.outliers.len(), 1);
        assert!((classified.outliers[0].frequency_pct - 20.0).abs() < 1e-9);
    }

    #[test]
    fn full_presence_is_core() {
        let classified = classify_clusters(&[cluster("everywhere", &[1, 2, 3])], 3);
        assert_eq!(classified.core.len(), 1);
        assert!((classified.core[0].frequency_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_iterations_classifies_nothing() {
        let classified = classify_clusters(&[cluster("anything", &[1])], 0);
        assert!(classified.core.is_empty());
        assert!(classified.variable.is_empty());
        assert!(classified.outliers.is_empty());
    }
}
