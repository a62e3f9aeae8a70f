//! Vertex adjacency graph.
//!
//! Provides neighbor lookups for Laplacian smoothing.

use std::collections::BTreeSet;

use hashbrown::HashMap;

/// Vertex-to-neighbor graph derived from a triangle index list.
///
/// Each triangle `(a, b, c)` contributes the undirected edges `a-b`, `b-c`
/// and `c-a`. Neighbor sets are deduplicated and kept in ascending order so
/// that averaging over them is deterministic.
///
/// Every vertex referenced by at least one face has an entry; vertices never
/// referenced have none and report no neighbors. A vertex is never its own
/// neighbor, even when a degenerate face repeats an index.
///
/// Indices are not validated here. A face pointing past the vertex buffer
/// simply adds entries for vertices that do not exist; consumers bounds-check
/// before dereferencing.
#[derive(Debug, Clone, Default)]
pub struct VertexAdjacency {
    /// Maps vertex index to its neighbor indices.
    neighbors: HashMap<u32, BTreeSet<u32>>,
}

impl VertexAdjacency {
    /// Build the adjacency graph from a list of faces.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_process::VertexAdjacency;
    ///
    /// let faces = vec![[0, 1, 2], [1, 3, 2]];
    /// let adj = VertexAdjacency::build(&faces);
    ///
    /// assert_eq!(adj.degree(1), 3); // 0, 2, 3
    /// assert_eq!(adj.degree(0), 2); // 1, 2
    /// assert_eq!(adj.edge_count(), 5);
    /// ```
    #[must_use]
    pub fn build(faces: &[[u32; 3]]) -> Self {
        let mut neighbors: HashMap<u32, BTreeSet<u32>> = HashMap::new();

        for face in faces {
            for i in 0..3 {
                let v = face[i];
                let next = face[(i + 1) % 3];
                let prev = face[(i + 2) % 3];

                let entry = neighbors.entry(v).or_default();
                if next != v {
                    entry.insert(next);
                }
                if prev != v {
                    entry.insert(prev);
                }
            }
        }

        Self { neighbors }
    }

    /// Get the neighbor set of a vertex.
    ///
    /// Returns `None` if no face references the vertex.
    #[must_use]
    pub fn neighbor_set(&self, v: u32) -> Option<&BTreeSet<u32>> {
        self.neighbors.get(&v)
    }

    /// Iterate over the neighbors of a vertex in ascending order.
    ///
    /// Yields nothing for vertices absent from the graph.
    pub fn neighbors(&self, v: u32) -> impl Iterator<Item = u32> + '_ {
        self.neighbors.get(&v).into_iter().flatten().copied()
    }

    /// Number of distinct neighbors of a vertex.
    #[must_use]
    pub fn degree(&self, v: u32) -> usize {
        self.neighbors.get(&v).map_or(0, BTreeSet::len)
    }

    /// Check whether a vertex is referenced by any face.
    #[must_use]
    pub fn contains(&self, v: u32) -> bool {
        self.neighbors.contains_key(&v)
    }

    /// Number of vertices with an entry.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of distinct undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.neighbors.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Check whether the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}
