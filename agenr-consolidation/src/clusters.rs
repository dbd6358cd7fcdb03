//! `buildClusters` contract: transitive-neighbor closure over
//! `find_similar`, a plain connected-components walk rather than a
//! density-based clustering algorithm — sufficient for the rules-only
//! consolidation this crate implements (no LLM-judge phase here).

use std::collections::{HashMap, HashSet, VecDeque};

use agenr_core::constants::CLUSTER_TYPE_FILTER_OVERFETCH;
use agenr_core::errors::AgenrResult;
use agenr_core::models::{Entry, EntryType};
use agenr_core::traits::EntryStore;

#[derive(Debug, Clone, Default)]
pub struct ClusterOptions {
    pub type_filter: Option<EntryType>,
    pub min_cluster: usize,
    pub neighbor_limit: usize,
    pub similarity_threshold: f64,
}

pub fn build_clusters(store: &dyn EntryStore, options: &ClusterOptions) -> AgenrResult<Vec<Vec<Entry>>> {
    let all = store.entries_since_rowid(0)?;
    let candidates: Vec<&Entry> = all
        .iter()
        .filter(|e| !e.retired && e.embedding.is_some())
        .filter(|e| options.type_filter.map(|t| t == e.entry_type).unwrap_or(true))
        .collect();

    let fetch_limit = match options.type_filter {
        Some(_) => options.neighbor_limit.saturating_mul(CLUSTER_TYPE_FILTER_OVERFETCH),
        None => options.neighbor_limit,
    };

    let mut adjacency: HashMap<String, HashSet<String>> = HashMap::new();
    let mut by_id: HashMap<String, Entry> = HashMap::new();

    for entry in &candidates {
        by_id.insert(entry.id.clone(), (*entry).clone());
        let embedding = entry.embedding.as_ref().expect("filtered above");
        let neighbors = store.find_similar(embedding, fetch_limit, &[entry.id.clone()])?;

        let mut kept = 0;
        for (neighbor, score) in neighbors {
            if let Some(filter) = options.type_filter {
                if neighbor.entry_type != filter {
                    continue;
                }
            }
            if score < options.similarity_threshold {
                continue;
            }
            adjacency.entry(entry.id.clone()).or_default().insert(neighbor.id.clone());
            adjacency.entry(neighbor.id.clone()).or_default().insert(entry.id.clone());
            by_id.insert(neighbor.id.clone(), neighbor);
            kept += 1;
            if kept >= options.neighbor_limit {
                break;
            }
        }
    }

    let mut visited: HashSet<String> = HashSet::new();
    let mut clusters = Vec::new();

    for id in adjacency.keys() {
        if visited.contains(id) {
            continue;
        }
        let mut component = Vec::new();
        let mut queue = VecDeque::from([id.clone()]);
        visited.insert(id.clone());

        while let Some(current) = queue.pop_front() {
            component.push(current.clone());
            if let Some(neighbors) = adjacency.get(&current) {
                for n in neighbors {
                    if visited.insert(n.clone()) {
                        queue.push_back(n.clone());
                    }
                }
            }
        }

        if component.len() >= options.min_cluster {
            clusters.push(component.into_iter().filter_map(|id| by_id.get(&id).cloned()).collect());
        }
    }

    Ok(clusters)
}
