/// Sentinel triple separating two polylines inside a single line strip.
pub const PRIMITIVE_BREAK: [f32; 3] = [f32::NAN; 3];

/// Flat `x, y, z` vertex sequence drawn as one line strip, with polylines
/// separated by [`PRIMITIVE_BREAK`] triples.
#[derive(Debug, Clone, Default)]
pub struct WireMesh {
    pub vertices: Vec<f32>,
}

impl WireMesh {
    pub fn with_capacity(vertex_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count * 3),
        }
    }

    pub fn push_point(&mut self, point: [f32; 3]) {
        self.vertices.extend_from_slice(&point);
    }

    pub fn push_break(&mut self) {
        self.vertices.extend_from_slice(&PRIMITIVE_BREAK);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn break_count(&self) -> usize {
        self.vertices
            .chunks_exact(3)
            .filter(|v| is_break(v))
            .count()
    }

    /// Polylines in emission order, each without its terminating break.
    #[cfg(test)]
    pub fn polylines(&self) -> Vec<Vec<[f32; 3]>> {
        let mut lines = Vec::new();
        let mut current = Vec::new();

        for v in self.vertices.chunks_exact(3) {
            if is_break(v) {
                lines.push(std::mem::take(&mut current));
            } else {
                current.push([v[0], v[1], v[2]]);
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }

        lines
    }

    pub fn stats(&self) -> MeshStats {
        MeshStats {
            vertex_count: self.vertex_count(),
            polyline_count: self.break_count(),
        }
    }

    pub fn into_vertices(self) -> Vec<f32> {
        self.vertices
    }
}

fn is_break(v: &[f32]) -> bool {
    v.iter().all(|c| c.is_nan())
}

/// What remains known about a mesh once its vertices are on the GPU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshStats {
    pub vertex_count: usize,
    pub polyline_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polylines_split_on_breaks() {
        let mut mesh = WireMesh::default();
        mesh.push_point([0.0, 0.0, 0.0]);
        mesh.push_point([1.0, 0.0, 0.0]);
        mesh.push_break();
        mesh.push_point([2.0, 0.0, 0.0]);
        mesh.push_break();

        let lines = mesh.polylines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        assert_eq!(lines[1], vec![[2.0, 0.0, 0.0]]);
        assert_eq!(mesh.break_count(), 2);
        assert_eq!(mesh.vertex_count(), 5);
    }

    #[test]
    fn trailing_points_without_break_form_a_polyline() {
        let mut mesh = WireMesh::default();
        mesh.push_point([0.0, 1.0, 2.0]);

        assert_eq!(mesh.polylines(), vec![vec![[0.0, 1.0, 2.0]]]);
        assert_eq!(mesh.break_count(), 0);
    }

    #[test]
    fn stats_count_vertices_including_breaks() {
        let mut mesh = WireMesh::with_capacity(3);
        mesh.push_point([0.0; 3]);
        mesh.push_point([1.0; 3]);
        mesh.push_break();

        assert_eq!(
            mesh.stats(),
            MeshStats {
                vertex_count: 3,
                polyline_count: 1,
            }
        );
    }
}
