// src/resolve/graph.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::resolve::unit::Unit;

/// Import graph over the discovered units.
///
/// Edge direction: dependency -> dependent. For `a` importing `b` we add
/// the edge `b -> a`.
#[derive(Debug)]
pub struct DependencyGraph<'a> {
    graph: DiGraphMap<&'a str, ()>,
    discovery: Vec<&'a str>,
}

impl<'a> DependencyGraph<'a> {
    pub fn from_units(units: &'a [Unit]) -> Self {
        let mut graph = DiGraphMap::new();
        let discovery: Vec<&str> = units.iter().map(|u| u.id.as_str()).collect();

        for id in &discovery {
            graph.add_node(*id);
        }
        for unit in units {
            for import in &unit.imports {
                if graph.contains_node(import.as_str()) {
                    graph.add_edge(import.as_str(), unit.id.as_str(), ());
                }
            }
        }

        Self { graph, discovery }
    }

    /// Units ordered so that every unit comes after its dependencies.
    ///
    /// Import cycles cannot compile; if one shows up anyway we fall back to
    /// discovery order.
    pub fn dependency_order(&self) -> Vec<&'a str> {
        toposort(&self.graph, None).unwrap_or_else(|_| self.discovery.clone())
    }

    /// Direct dependencies of `id` that were discovered.
    pub fn dependencies_of(&self, id: &str) -> Vec<&'a str> {
        let Some(node) = self.discovery.iter().copied().find(|x| *x == id) else {
            return Vec::new();
        };
        let mut deps: Vec<&'a str> = self
            .graph
            .neighbors_directed(node, petgraph::Direction::Incoming)
            .collect();
        deps.sort_unstable();
        deps
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}
