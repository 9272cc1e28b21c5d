use crate::{EmbeddedGraph, GridPoint};

/// Grid graph with `rows * cols` vertices, vertex `r * cols + c` drawn at
/// `(c, -r)`. Edges are listed row by row, vertical edge before horizontal.
#[allow(dead_code)]
pub fn generate_grid_graph(rows: usize, cols: usize) -> EmbeddedGraph {
    assert!(rows > 1 && cols > 1); // we want biconnected graph
    let points = get_embedding_of_grid(rows, cols);

    let mut edges = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            if r + 1 < rows {
                edges.push((r * cols + c, (r + 1) * cols + c));
            }
            if c + 1 < cols {
                edges.push((r * cols + c, r * cols + c + 1));
            }
        }
    }

    EmbeddedGraph::from_straight_line_drawing(&points, &edges).unwrap()
}

#[allow(dead_code)]
pub fn get_embedding_of_grid(rows: usize, cols: usize) -> Vec<GridPoint> {
    let mut points = vec![GridPoint::new(0, 0); rows * cols];
    for r in 0..rows {
        for c in 0..cols {
            points[r * cols + c] = GridPoint::new(c as i64, -(r as i64));
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_embedding() {
        let emb = get_embedding_of_grid(2, 2);
        assert_eq!(
            emb,
            vec![
                GridPoint::new(0, 0),
                GridPoint::new(1, 0),
                GridPoint::new(0, -1),
                GridPoint::new(1, -1)
            ]
        );
    }

    #[test]
    fn test_grid_faces() {
        let g = generate_grid_graph(3, 4);
        assert!(g.embedding_defects().is_empty());
        // 2 * 3 unit squares plus the outer face
        assert_eq!(g.all_faces().len(), 7);
        assert_eq!(g.face(g.outer_face()).unwrap().len(), 10);
    }
}
