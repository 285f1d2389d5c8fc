//! Dependency graph between stateful constructs of a page
//!
//! Tracks which state each declaration reads so declarations can be
//! emitted dependencies first, and detects loops.

use crate::error::CycleError;
use std::collections::{BTreeMap, BTreeSet};

/// Graph of `dependent -> dependency` edges.
///
/// Nodes keep their insertion order, which is also the order the
/// topological sort visits them in, so the output is deterministic.
#[derive(Clone, Debug)]
pub struct DependencyGraph<K: Ord + Clone> {
    nodes: Vec<K>,
    dependencies: BTreeMap<K, BTreeSet<K>>,
}

impl<K: Ord + Clone> Default for DependencyGraph<K> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            dependencies: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone> DependencyGraph<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Adding it again keeps its first position.
    pub fn add_node(&mut self, key: K) {
        if !self.dependencies.contains_key(&key) {
            self.dependencies.insert(key.clone(), BTreeSet::new());
            self.nodes.push(key);
        }
    }

    /// Record that `dependent` reads `dependency`
    pub fn add_dependency(&mut self, dependent: K, dependency: K) {
        self.add_node(dependent.clone());
        self.add_node(dependency.clone());
        if let Some(deps) = self.dependencies.get_mut(&dependent) {
            deps.insert(dependency);
        }
    }

    pub fn dependencies(&self, key: &K) -> impl Iterator<Item = &K> {
        self.dependencies.get(key).into_iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Order nodes so every node comes after everything it depends on.
    ///
    /// Depth-first with an explicit history of the nodes being visited.
    /// Reaching a node that's still in the history is a cycle; `label`
    /// names the nodes in the error.
    pub fn topological_order(&self, label: impl Fn(&K) -> String) -> Result<Vec<K>, CycleError> {
        let mut visited = BTreeSet::new();
        let mut history = Vec::new();
        let mut order = Vec::with_capacity(self.nodes.len());

        for node in &self.nodes {
            self.visit(node, &mut visited, &mut history, &mut order, &label)?;
        }

        Ok(order)
    }

    fn visit(
        &self,
        node: &K,
        visited: &mut BTreeSet<K>,
        history: &mut Vec<K>,
        order: &mut Vec<K>,
        label: &impl Fn(&K) -> String,
    ) -> Result<(), CycleError> {
        if let Some(start) = history.iter().position(|k| k == node) {
            let mut path: Vec<String> = history[start..].iter().map(label).collect();
            path.push(label(node));
            return Err(CycleError {
                node: label(node),
                path,
            });
        }
        if visited.contains(node) {
            return Ok(());
        }

        history.push(node.clone());
        for dep in self.dependencies(node) {
            self.visit(dep, visited, history, order, label)?;
        }
        history.pop();

        visited.insert(node.clone());
        order.push(node.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(key: &&str) -> String {
        key.to_string()
    }

    #[test]
    fn test_dependencies_come_first() {
        let mut graph = DependencyGraph::new();
        graph.add_node("total");
        graph.add_node("items");
        graph.add_dependency("total", "items");

        assert_eq!(graph.topological_order(label).unwrap(), vec!["items", "total"]);
    }

    #[test]
    fn test_independent_nodes_keep_insertion_order() {
        let mut graph = DependencyGraph::new();
        for key in ["c", "a", "b"] {
            graph.add_node(key);
        }
        assert_eq!(graph.topological_order(label).unwrap(), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_diamond() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("d", "b");
        graph.add_dependency("d", "c");
        graph.add_dependency("b", "a");
        graph.add_dependency("c", "a");

        let order = graph.topological_order(label).unwrap();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_two_node_cycle() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("a", "b");
        graph.add_dependency("b", "a");

        let err = graph.topological_order(label).unwrap_err();
        assert_eq!(err.node, "a");
        assert_eq!(err.path, vec!["a", "b", "a"]);
        assert_eq!(err.to_string(), "Dependency cycle at a: a -> b -> a");
    }

    #[test]
    fn test_self_cycle() {
        let mut graph = DependencyGraph::new();
        graph.add_node("ok");
        graph.add_dependency("loop", "loop");

        let err = graph.topological_order(label).unwrap_err();
        assert_eq!(err.path, vec!["loop", "loop"]);
    }
}
