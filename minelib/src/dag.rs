use hashbrown::{HashMap, HashSet};

use log::trace;
use minelib_parser::structs::PrecedenceGraph;
use petgraph::{
    algo,
    dot::{Config, Dot},
    graph::{DiGraph, NodeIndex},
    visit::{Dfs, Reversed},
};

type Graph = DiGraph<usize, ()>;

/// A petgraph view of a precedence graph. Arcs point from a predecessor to
/// the block that depends on it.
///
/// Only blocks that have a precedence line or appear as a predecessor become
/// nodes.
pub struct PrecedenceDag<'a> {
    graph: Graph,
    block_to_nodes: HashMap<usize, NodeIndex>,
    pub precedence: &'a PrecedenceGraph,
}

impl<'a> PrecedenceDag<'a> {
    pub fn new(precedence: &'a PrecedenceGraph) -> Self {
        let mut graph = Graph::new();
        let mut block_to_nodes = HashMap::new();

        for (block, predecessors) in precedence.iter() {
            let block_index = *block_to_nodes
                .entry(block)
                .or_insert_with(|| graph.add_node(block));

            for predecessor in predecessors {
                let predecessor_index = *block_to_nodes
                    .entry(*predecessor)
                    .or_insert_with(|| graph.add_node(*predecessor));
                graph.add_edge(predecessor_index, block_index, ());
            }
        }

        trace!(
            "built precedence dag with {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Self {
            graph,
            block_to_nodes,
            precedence,
        }
    }

    /// Number of distinct blocks, including predecessors past `num_blocks`.
    pub fn num_blocks(&self) -> usize {
        self.graph.node_count()
    }

    /// Ids below the declared block count that never appear in the graph.
    pub fn num_gap_blocks(&self) -> usize {
        let declared = self.precedence.num_blocks();
        let present = self
            .block_to_nodes
            .keys()
            .filter(|block| **block < declared)
            .count();
        declared - present
    }

    pub fn num_arcs(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_acyclic(&self) -> bool {
        !algo::is_cyclic_directed(&self.graph)
    }

    /// Blocks without predecessors, in ascending order.
    pub fn surface_blocks(&self) -> Vec<usize> {
        let mut blocks: Vec<usize> = self
            .block_to_nodes
            .iter()
            .filter(|(_, node)| {
                self.graph
                    .neighbors_directed(**node, petgraph::Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|(block, _)| *block)
            .collect();
        blocks.sort_unstable();
        blocks
    }

    /// Group blocks into extraction ranks.
    ///
    /// Rank 0 holds the surface blocks. A block joins the first rank after
    /// all of its predecessors have been placed. Blocks on a cycle are never
    /// placed, so `None` is returned when the graph is cyclic.
    pub fn extraction_ranks(&self) -> Option<Vec<Vec<usize>>> {
        let mut successor_map: HashMap<usize, Vec<usize>> = HashMap::new();
        for (block, predecessors) in self.precedence.iter() {
            for predecessor in predecessors {
                successor_map.entry(*predecessor).or_default().push(block);
            }
        }

        let mut ranks: Vec<Vec<usize>> = vec![];
        let mut visited_blocks: HashSet<usize> = HashSet::new();
        let mut same_rank = self.surface_blocks();

        while !same_rank.is_empty() {
            visited_blocks.extend(same_rank.iter().copied());

            // Successors whose predecessors have all been visited
            let mut next_rank: Vec<usize> = same_rank
                .iter()
                .flat_map(|block| successor_map.remove(block).unwrap_or_default())
                .filter(|successor| {
                    !visited_blocks.contains(successor)
                        && self
                            .precedence
                            .predecessors(*successor)
                            .iter()
                            .all(|predecessor| visited_blocks.contains(predecessor))
                })
                .collect();
            next_rank.sort_unstable();
            next_rank.dedup();

            ranks.push(same_rank);
            same_rank = next_rank;
        }

        if visited_blocks.len() < self.num_blocks() {
            return None;
        }

        Some(ranks)
    }

    /// `block` together with every block that has to be removed before it,
    /// in ascending order. Empty when the block is unknown.
    pub fn cone(&self, block: usize) -> Vec<usize> {
        let Some(&start) = self.block_to_nodes.get(&block) else {
            return vec![];
        };

        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, start);
        let mut blocks = vec![];
        while let Some(node) = dfs.next(reversed) {
            blocks.push(self.graph[node]);
        }

        blocks.sort_unstable();
        blocks
    }

    /// Graphviz notation of the graph, nodes labelled with their block id.
    pub fn to_dot(&self) -> String {
        format!(
            "{:?}",
            Dot::with_config(&self.graph, &[Config::EdgeNoLabel])
        )
    }
}

#[cfg(test)]
mod tests {
    use minelib_parser::parse_precedence;

    use super::PrecedenceDag;

    static PRECEDENCE_FILE: &str = include_str!("../../instances/sample.prec");

    #[test]
    fn sample_graph() {
        let precedence = parse_precedence(PRECEDENCE_FILE.as_bytes()).unwrap();
        let dag = PrecedenceDag::new(&precedence);

        assert_eq!(dag.num_blocks(), 5);
        assert_eq!(dag.num_gap_blocks(), 0);
        assert_eq!(dag.num_arcs(), 7);
        assert!(dag.is_acyclic());
        assert_eq!(dag.surface_blocks(), vec![0]);
    }

    #[test]
    fn extraction_ranks() {
        let precedence = parse_precedence(PRECEDENCE_FILE.as_bytes()).unwrap();
        let dag = PrecedenceDag::new(&precedence);

        assert_eq!(
            dag.extraction_ranks(),
            Some(vec![vec![0], vec![1, 2], vec![3], vec![4]])
        );
    }

    #[test]
    fn cyclic_graph_has_no_ranks() {
        let precedence = parse_precedence("0 0\n1 2 0 2\n2 1 1\n".as_bytes()).unwrap();
        let dag = PrecedenceDag::new(&precedence);

        assert!(!dag.is_acyclic());
        assert_eq!(dag.extraction_ranks(), None);
    }

    #[test]
    fn cone_of_block() {
        let precedence = parse_precedence(PRECEDENCE_FILE.as_bytes()).unwrap();
        let dag = PrecedenceDag::new(&precedence);

        assert_eq!(dag.cone(3), vec![0, 1, 2, 3]);
        assert_eq!(dag.cone(0), vec![0]);
        assert!(dag.cone(42).is_empty());
    }

    #[test]
    fn predecessors_past_num_blocks_get_nodes() {
        let precedence = parse_precedence("0 1 9\n".as_bytes()).unwrap();
        let dag = PrecedenceDag::new(&precedence);

        assert_eq!(dag.num_blocks(), 2);
        assert_eq!(dag.surface_blocks(), vec![9]);
        assert_eq!(dag.extraction_ranks(), Some(vec![vec![9], vec![0]]));
    }

    #[test]
    fn sparse_ids_only_create_listed_nodes() {
        let precedence = parse_precedence("0 0\n1000000000000 1 0\n".as_bytes()).unwrap();
        let dag = PrecedenceDag::new(&precedence);

        assert_eq!(dag.num_blocks(), 2);
        assert_eq!(dag.num_gap_blocks(), 1_000_000_000_000 - 1);
        assert_eq!(
            dag.extraction_ranks(),
            Some(vec![vec![0], vec![1_000_000_000_000]])
        );
    }

    #[test]
    fn dot_output() {
        let precedence = parse_precedence("0 0\n1 1 0\n".as_bytes()).unwrap();
        let dag = PrecedenceDag::new(&precedence);

        let dot = dag.to_dot();

        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("0 -> 1"));
    }
}
