//! Greedy cross-response key-point clustering.
//!
//! Clusters are kept in a plain `Vec` scanned front to back, because
//! insertion order is part of the semantics: each incoming point joins
//! the FIRST existing cluster whose representative it is similar to.
//! The similarity test is symmetric but not transitive, so two points
//! that both match a shared third point are not guaranteed to match
//! each other — a documented design property, not an accident. The
//! payoff is O(points × clusters) instead of full pairwise clustering,
//! which is the right trade for the small iteration counts (≤ 10) this
//! pipeline targets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use text_insight::{Vocabulary, canonical_key, similar};
use tracing::debug;

use crate::types::ResponseRecord;

/// One cluster: a representative normalized key point plus the set of
/// iterations in which a similar point appeared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCluster {
    /// Normalized text of the first point that opened the cluster.
    pub representative: String,
    /// Iteration indices, naturally sorted.
    pub iterations: BTreeSet<u32>,
}

/// Cluster key points tagged with their iteration index.
///
/// Points are processed in the order given; normalization lowercases
/// and strips everything but letters/digits/space/hyphen before any
/// comparison, so wording differences in punctuation or case never
/// split a cluster.
pub fn cluster_key_points<'a, I>(tagged: I, vocab: &Vocabulary) -> Vec<MessageCluster>
where
    I: IntoIterator<Item = (u32, &'a str)>,
{
    let mut clusters: Vec<MessageCluster> = Vec::new();

    for (iteration, point) in tagged {
        let key = canonical_key(point);
        if key.is_empty() {
            continue;
        }

        match clusters
            .iter_mut()
            .find(|c| similar(&key, &c.representative, vocab))
        {
            Some(cluster) => {
                cluster.iterations.insert(iteration);
            }
            None => clusters.push(MessageCluster {
                representative: key,
                iterations: BTreeSet::from([iteration]),
            }),
        }
    }

    debug!("cluster_key_points: {} clusters", clusters.len());
    clusters
}

/// Cluster the key points of a full run of response records.
pub fn cluster_responses(records: &[ResponseRecord], vocab: &Vocabulary) -> Vec<MessageCluster> {
    cluster_key_points(
        records.iter().flat_map(|r| {
            r.key_points
                .iter()
                .map(move |p| (r.iteration, p.as_str()))
        }),
        vocab,
    )
}
