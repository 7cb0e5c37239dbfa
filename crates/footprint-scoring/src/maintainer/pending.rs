//! PendingResourceTree: deduplicated rescore requests, grouped by activity and agent.

use std::collections::{BTreeMap, BTreeSet};

use footprint_core::types::ResourceTriple;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PendingResourceTree {
    tree: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl PendingResourceTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a request. Returns `false` if it was already pending.
    pub fn insert(&mut self, triple: ResourceTriple) -> bool {
        self.tree
            .entry(triple.activity)
            .or_default()
            .entry(triple.agent)
            .or_default()
            .insert(triple.resource)
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Number of distinct triples.
    pub fn len(&self) -> usize {
        self.tree
            .values()
            .flat_map(|agents| agents.values())
            .map(BTreeSet::len)
            .sum()
    }

    /// Swap the tree out, leaving an empty one behind.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Flatten into triples, `current` activity first.
    pub fn into_ordered(mut self, current: &str) -> Vec<ResourceTriple> {
        let mut out = Vec::with_capacity(self.len());
        if let Some(agents) = self.tree.remove(current) {
            push_activity(&mut out, current, agents);
        }
        for (activity, agents) in self.tree {
            push_activity(&mut out, &activity, agents);
        }
        out
    }

    /// Merge `other` back in (used when a pass is cancelled half way).
    pub fn extend<I: IntoIterator<Item = ResourceTriple>>(&mut self, triples: I) {
        for t in triples {
            self.insert(t);
        }
    }
}

fn push_activity(
    out: &mut Vec<ResourceTriple>,
    activity: &str,
    agents: BTreeMap<String, BTreeSet<String>>,
) {
    for (agent, resources) in agents {
        for resource in resources {
            out.push(ResourceTriple::new(activity, agent.as_str(), resource));
        }
    }
}
