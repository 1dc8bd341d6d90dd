
use std::collections::BTreeMap;

use crate::component_graph::VertexId;

/// Location of a single vertex label inside a concatenated path sequence.
/// The label occupies `start..end` of the path.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PathLocus {
    /// The vertex owning this label
    pub vertex: VertexId,
    /// Offset of the first label symbol in the path
    pub start: usize,
    /// Offset one past the last label symbol in the path
    pub end: usize
}

impl PathLocus {
    /// Translates a path offset into an offset inside this vertex label
    /// # Arguments
    /// * `path_position` - an offset in `start..=end`
    pub fn offset_of(&self, path_position: usize) -> usize {
        assert!(self.start <= path_position && path_position <= self.end);
        path_position - self.start
    }
}

/// A source-to-sink route through the component graph, stored as the concatenated sequence and an index from cumulative end offset to the vertex ending there.
/// Paths are read-only snapshots; any graph mutation invalidates them.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Path {
    /// Concatenation of every vertex label on the path
    sequence: Vec<u8>,
    /// Maps the end offset of each label to its vertex
    position_map: BTreeMap<usize, VertexId>
}

impl Path {
    /// Appends a vertex label to the end of this path
    /// # Arguments
    /// * `vertex` - the vertex being traversed
    /// * `label` - the label of that vertex, must not be empty
    pub fn push_vertex(&mut self, vertex: VertexId, label: &[u8]) {
        assert!(!label.is_empty(), "vertex {vertex} has an empty label");
        self.sequence.extend_from_slice(label);
        self.position_map.insert(self.sequence.len(), vertex);
    }

    /// Returns the locus of the first vertex whose label ends at or after `path_position`.
    /// An alignment that stops exactly at a label boundary resolves to the vertex on its left.
    /// # Arguments
    /// * `path_position` - an offset into the path sequence
    pub fn locus_ending_at_or_after(&self, path_position: usize) -> Option<PathLocus> {
        self.position_map.range(path_position..).next()
            .map(|(&end, &vertex)| self.locus(vertex, end))
    }

    /// Returns the locus of the vertex whose label contains the symbol at `path_position`.
    /// An alignment that starts exactly at a label boundary resolves to the vertex on its right.
    /// # Arguments
    /// * `path_position` - an offset into the path sequence, must be < `len()` to find anything
    pub fn locus_containing(&self, path_position: usize) -> Option<PathLocus> {
        self.position_map.range(path_position + 1..).next()
            .map(|(&end, &vertex)| self.locus(vertex, end))
    }

    /// Builds a locus from a map entry, the start is the end of the previous label
    fn locus(&self, vertex: VertexId, end: usize) -> PathLocus {
        let start = self.position_map.range(..end).next_back()
            .map(|(&previous_end, _)| previous_end)
            .unwrap_or(0);
        PathLocus { vertex, start, end }
    }

    /// Returns the vertices along the path in order
    pub fn vertices(&self) -> Vec<VertexId> {
        self.position_map.values().cloned().collect()
    }

    /// Returns the last vertex on the path, which is always a sink
    pub fn last_vertex(&self) -> Option<VertexId> {
        self.position_map.values().next_back().cloned()
    }

    /// Consumes the path and returns the concatenated sequence
    pub fn into_sequence(self) -> Vec<u8> {
        self.sequence
    }

    // Getters
    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn position_map(&self) -> &BTreeMap<usize, VertexId> {
        &self.position_map
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Path over three labels of length 4: AAAA | CCCC | GGGG
    fn three_vertex_path() -> Path {
        let mut path = Path::default();
        path.push_vertex(0, b"AAAA");
        path.push_vertex(3, b"CCCC");
        path.push_vertex(7, b"GGGG");
        path
    }

    #[test]
    fn test_push_vertex() {
        let path = three_vertex_path();
        assert_eq!(path.sequence(), b"AAAACCCCGGGG");
        assert_eq!(path.len(), 12);
        assert_eq!(path.vertices(), vec![0, 3, 7]);
        assert_eq!(path.last_vertex(), Some(7));
        assert_eq!(path.position_map().keys().cloned().collect::<Vec<usize>>(), vec![4, 8, 12]);
    }

    #[test]
    fn test_ending_at_boundary() {
        let path = three_vertex_path();
        // ends exactly where vertex 0 ends, so no split is needed there
        assert_eq!(path.locus_ending_at_or_after(4), Some(PathLocus { vertex: 0, start: 0, end: 4 }));
        // strictly inside vertex 3
        let locus = path.locus_ending_at_or_after(5).unwrap();
        assert_eq!(locus, PathLocus { vertex: 3, start: 4, end: 8 });
        assert_eq!(locus.offset_of(5), 1);
        // end of the path
        assert_eq!(path.locus_ending_at_or_after(12), Some(PathLocus { vertex: 7, start: 8, end: 12 }));
        assert_eq!(path.locus_ending_at_or_after(13), None);
    }

    #[test]
    fn test_containing_boundary() {
        let path = three_vertex_path();
        // a start at offset 4 belongs to the vertex on the right
        assert_eq!(path.locus_containing(4), Some(PathLocus { vertex: 3, start: 4, end: 8 }));
        assert_eq!(path.locus_containing(4).unwrap().offset_of(4), 0);
        assert_eq!(path.locus_containing(0), Some(PathLocus { vertex: 0, start: 0, end: 4 }));
        assert_eq!(path.locus_containing(3), Some(PathLocus { vertex: 0, start: 0, end: 4 }));
        let locus = path.locus_containing(10).unwrap();
        assert_eq!(locus.vertex, 7);
        assert_eq!(locus.offset_of(10), 2);
        assert_eq!(path.locus_containing(12), None);
    }
}
