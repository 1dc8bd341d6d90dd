/*!
This module provides the ComponentGraph, a branching arena of sequence fragments that the merge driver grows one input sequence at a time.
Vertices are addressed by stable integer handles, so splitting one vertex never invalidates a handle held for another.

# Example usage
```rust
use contig_merge::component_graph::ComponentGraph;

// seed the graph and branch it after "AAAACCCC"
let mut graph = ComponentGraph::new(b"AAAACCCCTTTT");
graph.split_vertex_at(0, 8).unwrap();
let branch = graph.add_vertex(b"GGGG".to_vec());
graph.add_edge(0, branch);

let sequences: Vec<Vec<u8>> = graph.enumerate_paths().into_iter()
    .map(|p| p.sequence().to_vec())
    .collect();
assert_eq!(sequences, vec![b"AAAACCCCTTTT".to_vec(), b"AAAACCCCGGGG".to_vec()]);
```
*/

use itertools::Itertools;
use simple_error::bail;
use std::fmt;

use crate::path::Path;

/// Stable handle of a vertex in a ComponentGraph
pub type VertexId = usize;

/// Directed acyclic graph of sequence fragments with one or more source vertices.
/// An edge `u -> v` means the label of `u` is immediately followed by the label of `v` along that branch.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ComponentGraph {
    /// Label of each vertex, indexed by VertexId
    labels: Vec<Vec<u8>>,
    /// Outgoing edges of each vertex in insertion order
    out_edges: Vec<Vec<VertexId>>,
    /// Graph entry points in registration order
    sources: Vec<VertexId>
}

impl ComponentGraph {
    /// Creates a graph holding the seed sequence as its only vertex and source
    /// # Arguments
    /// * `seed` - the first sequence of the group
    pub fn new(seed: &[u8]) -> ComponentGraph {
        let mut graph = ComponentGraph::default();
        let v = graph.add_vertex(seed.to_vec());
        graph.add_source(v);
        graph
    }

    /// Appends a new unconnected vertex and returns its handle
    /// # Arguments
    /// * `label` - the sequence fragment owned by the vertex
    pub fn add_vertex(&mut self, label: Vec<u8>) -> VertexId {
        let v = self.labels.len();
        self.labels.push(label);
        self.out_edges.push(vec![]);
        v
    }

    /// Adds a directed edge `u -> v`
    pub fn add_edge(&mut self, u: VertexId, v: VertexId) {
        assert!(v < self.labels.len(), "edge target {v} does not exist");
        self.out_edges[u].push(v);
    }

    /// Registers a vertex as a graph entry point
    pub fn add_source(&mut self, v: VertexId) {
        assert!(v < self.labels.len(), "source {v} does not exist");
        self.sources.push(v);
    }

    /// Splits `u` into a prefix (kept by `u`) and a suffix (owned by a new vertex `v`).
    /// All outgoing edges of `u` are moved to `v` in their original order, and `u -> v` becomes the only outgoing edge of `u`.
    /// The caller guarantees that `prefix_label + suffix_label` is the current label of `u`.
    /// # Arguments
    /// * `u` - the vertex to split
    /// * `prefix_label` - the new label for `u`
    /// * `suffix_label` - the label of the new successor
    pub fn split_vertex(&mut self, u: VertexId, prefix_label: Vec<u8>, suffix_label: Vec<u8>) -> VertexId {
        debug_assert_eq!([prefix_label.as_slice(), suffix_label.as_slice()].concat(), self.labels[u]);
        let v = self.add_vertex(suffix_label);
        self.out_edges[v] = std::mem::take(&mut self.out_edges[u]);
        self.labels[u] = prefix_label;
        self.add_edge(u, v);
        v
    }

    /// Splits `u` so that its label is cut at `offset`, returning the new successor holding the suffix.
    /// # Arguments
    /// * `u` - the vertex to split
    /// * `offset` - the cut position inside the label of `u`
    /// # Errors
    /// * if `offset` would leave either side empty
    pub fn split_vertex_at(&mut self, u: VertexId, offset: usize) -> Result<VertexId, Box<dyn std::error::Error>> {
        let label_len = self.labels[u].len();
        if offset == 0 || offset >= label_len {
            bail!("Cannot split vertex {u} of length {label_len} at offset {offset}");
        }
        let suffix_label = self.labels[u][offset..].to_vec();
        let prefix_label = self.labels[u][..offset].to_vec();
        Ok(self.split_vertex(u, prefix_label, suffix_label))
    }

    /// Extends the label of `v` at its 3' end
    pub fn append_to_label(&mut self, v: VertexId, bases: &[u8]) {
        self.labels[v].extend_from_slice(bases);
    }

    /// Extends the label of `v` at its 5' end
    pub fn prepend_to_label(&mut self, v: VertexId, bases: &[u8]) {
        self.labels[v].splice(0..0, bases.iter().cloned());
    }

    /// Enumerates every source-to-sink path with a depth-first traversal.
    /// Sources are visited in registration order and edges in insertion order; each branch continues from its own copy of the path built so far.
    pub fn enumerate_paths(&self) -> Vec<Path> {
        let mut paths = vec![];
        let mut stack: Vec<(VertexId, Path)> = self.sources.iter().rev()
            .map(|&s| (s, Path::default()))
            .collect();

        while let Some((v, mut path)) = stack.pop() {
            path.push_vertex(v, &self.labels[v]);
            let targets = &self.out_edges[v];
            if targets.is_empty() {
                paths.push(path);
                continue;
            }

            // pushed in reverse so the first edge is explored first, the first edge can take ownership
            for &t in targets[1..].iter().rev() {
                stack.push((t, path.clone()));
            }
            stack.push((targets[0], path));
        }
        paths
    }

    /// Counts source-to-sink paths without building them
    pub fn count_paths(&self) -> usize {
        let mut memo: Vec<Option<usize>> = vec![None; self.labels.len()];
        self.sources.iter()
            .map(|&s| self.count_paths_from(s, &mut memo))
            .fold(0, usize::saturating_add)
    }

    fn count_paths_from(&self, v: VertexId, memo: &mut [Option<usize>]) -> usize {
        if let Some(count) = memo[v] {
            return count;
        }
        let count = if self.out_edges[v].is_empty() {
            1
        } else {
            self.out_edges[v].iter()
                .map(|&t| self.count_paths_from(t, memo))
                .fold(0, usize::saturating_add)
        };
        memo[v] = Some(count);
        count
    }

    // Getters
    pub fn label(&self, v: VertexId) -> &[u8] {
        &self.labels[v]
    }

    pub fn out_edges(&self, v: VertexId) -> &[VertexId] {
        &self.out_edges[v]
    }

    pub fn sources(&self) -> &[VertexId] {
        &self.sources
    }

    pub fn num_vertices(&self) -> usize {
        self.labels.len()
    }

    pub fn num_edges(&self) -> usize {
        self.out_edges.iter().map(|e| e.len()).sum()
    }
}

/// Textual dump of the graph structure: adjacency list, sources, and label lengths
impl fmt::Display for ComponentGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Adjacency list:")?;
        for (v, targets) in self.out_edges.iter().enumerate() {
            writeln!(f, "{v} -> {}", targets.iter().join(","))?;
        }
        writeln!(f, "Sources: {}", self.sources.iter().join(","))?;
        writeln!(f, "Vertex map:")?;
        for (v, label) in self.labels.iter().enumerate() {
            writeln!(f, "Vertex: {v}, Length: {}", label.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_sequences(graph: &ComponentGraph) -> Vec<Vec<u8>> {
        graph.enumerate_paths().into_iter()
            .map(|p| p.sequence().to_vec())
            .collect()
    }

    #[test]
    fn test_seed() {
        let graph = ComponentGraph::new(b"ACGTACGT");
        assert_eq!(graph.num_vertices(), 1);
        assert_eq!(graph.num_edges(), 0);
        assert_eq!(graph.sources(), &[0]);
        assert_eq!(graph.count_paths(), 1);
        assert_eq!(path_sequences(&graph), vec![b"ACGTACGT".to_vec()]);
    }

    #[test]
    fn test_split_invariant() {
        let mut graph = ComponentGraph::new(b"AAAACCCCTTTT");
        let b1 = graph.add_vertex(b"GG".to_vec());
        let b2 = graph.add_vertex(b"TT".to_vec());
        graph.add_edge(0, b1);
        graph.add_edge(0, b2);

        let original = graph.label(0).to_vec();
        let v = graph.split_vertex(0, b"AAAA".to_vec(), b"CCCCTTTT".to_vec());
        assert_eq!(v, 3);

        // concatenation reproduces the original label
        assert_eq!([graph.label(0), graph.label(v)].concat(), original);

        // every original edge moved to the successor, in order
        assert_eq!(graph.out_edges(v), &[b1, b2]);
        assert_eq!(graph.out_edges(0), &[v]);
        assert_eq!(graph.num_edges(), 3);

        // paths are unchanged by the split
        assert_eq!(path_sequences(&graph), vec![
            b"AAAACCCCTTTTGG".to_vec(),
            b"AAAACCCCTTTTTT".to_vec()
        ]);
    }

    #[test]
    fn test_split_vertex_at() {
        let mut graph = ComponentGraph::new(b"ACGTACGT");
        let v = graph.split_vertex_at(0, 3).unwrap();
        assert_eq!(graph.label(0), b"ACG");
        assert_eq!(graph.label(v), b"TACGT");

        // splitting on either end would create an empty label
        let err = graph.split_vertex_at(0, 0).unwrap_err();
        assert_eq!(err.to_string(), "Cannot split vertex 0 of length 3 at offset 0");
        assert!(graph.split_vertex_at(0, 3).is_err());
        assert_eq!(graph.num_vertices(), 2);
    }

    #[test]
    fn test_label_extension() {
        let mut graph = ComponentGraph::new(b"CCCC");
        graph.append_to_label(0, b"GG");
        graph.prepend_to_label(0, b"AA");
        assert_eq!(graph.label(0), b"AACCCCGG");
    }

    #[test]
    fn test_enumeration_order() {
        // 0:AAAA -> {1:CC, 2:GG}; 3:TTTT -> 1
        let mut graph = ComponentGraph::new(b"AAAA");
        let c = graph.add_vertex(b"CC".to_vec());
        let g = graph.add_vertex(b"GG".to_vec());
        graph.add_edge(0, c);
        graph.add_edge(0, g);
        let t = graph.add_vertex(b"TTTT".to_vec());
        graph.add_source(t);
        graph.add_edge(t, c);

        let paths = graph.enumerate_paths();
        assert_eq!(paths.len(), 3);
        assert_eq!(graph.count_paths(), 3);
        assert_eq!(paths[0].sequence(), b"AAAACC");
        assert_eq!(paths[0].vertices(), vec![0, c]);
        assert_eq!(paths[1].sequence(), b"AAAAGG");
        assert_eq!(paths[2].sequence(), b"TTTTCC");
        assert_eq!(paths[2].vertices(), vec![t, c]);

        // concatenation of labels along each path matches the path sequence
        for path in paths.iter() {
            let concat: Vec<u8> = path.vertices().iter()
                .flat_map(|&v| graph.label(v).iter().cloned())
                .collect();
            assert_eq!(concat, path.sequence());
        }
    }

    #[test]
    fn test_count_paths_diamond_chain() {
        // three diamonds in a row double the routes each time
        let mut graph = ComponentGraph::new(b"A");
        let mut tail = 0;
        for _ in 0..3 {
            let left = graph.add_vertex(b"C".to_vec());
            let right = graph.add_vertex(b"G".to_vec());
            let join = graph.add_vertex(b"T".to_vec());
            graph.add_edge(tail, left);
            graph.add_edge(tail, right);
            graph.add_edge(left, join);
            graph.add_edge(right, join);
            tail = join;
        }
        assert_eq!(graph.count_paths(), 8);
        assert_eq!(graph.enumerate_paths().len(), 8);
    }

    #[test]
    fn test_display() {
        let mut graph = ComponentGraph::new(b"AAAACCCC");
        graph.split_vertex_at(0, 4).unwrap();
        let b = graph.add_vertex(b"GG".to_vec());
        graph.add_edge(0, b);

        let dump = graph.to_string();
        assert_eq!(dump, "Adjacency list:\n0 -> 1,2\n1 -> \n2 -> \nSources: 0\nVertex map:\nVertex: 0, Length: 4\nVertex: 1, Length: 4\nVertex: 2, Length: 2\n");
    }
}
