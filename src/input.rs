use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};

use crate::{EmbeddedGraph, types::VertexId};

/// Reads an embedded graph from a file.
///
/// The file lists a rotation system:
/// - one line per vertex in format "v: n1 n2 n3", the neighbors of `v` in
///   counter-clockwise order,
/// - an optional line "outer: a b" naming the dart `a -> b` whose left face
///   is the outer face,
/// - empty lines and lines starting with `#` are skipped.
///
/// <div class="warning">
///
/// > The rotation system must be symmetric.
/// > Multi-edges and self-loops are not supported.
/// > Malformed input panics.
///
/// </div>
///
/// Example input (a triangle with a vertex in its middle):
/// ```text
/// outer: 0 2
/// 0: 1 3 2
/// 1: 2 3 0
/// 2: 0 3 1
/// 3: 0 1 2
/// ```
pub fn from_file(path: &str) -> EmbeddedGraph {
    let file = File::open(path).unwrap_or_else(|err| panic!("File {} should be readable: {}", path, err));
    let reader = BufReader::new(file);
    parse_rotation_system(reader)
}

/// This is equivalent to [`from_file`], but takes string as an input.
pub fn from_str(input: &str) -> EmbeddedGraph {
    let cursor = Cursor::new(input);
    let reader = BufReader::new(cursor);
    parse_rotation_system(reader)
}

fn parse_rotation_system<R: BufRead>(reader: R) -> EmbeddedGraph {
    let mut rotations = Vec::new();
    let mut outer_dart = None;

    for line in reader.lines() {
        let line = line.unwrap_or_else(|err| panic!("Line should be readable: {}", err));
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((head, tail)) = line.split_once(':') else {
            panic!("Wrong format, expected 'v: n1 n2 ...' or 'outer: a b', got '{}'", line);
        };
        let ids: Vec<VertexId> = tail.split_whitespace().map(parse_vertex).collect();

        if head.trim() == "outer" {
            if ids.len() != 2 {
                panic!("Wrong format, expected 'outer: a b'");
            }
            outer_dart = Some((ids[0], ids[1]));
        } else {
            rotations.push((parse_vertex(head.trim()), ids));
        }
    }

    match EmbeddedGraph::from_rotation_system(&rotations, outer_dart) {
        Ok(graph) => graph,
        Err(err) => panic!("Rotation system is not a valid embedding: {}", err),
    }
}

fn parse_vertex(token: &str) -> VertexId {
    match token.parse::<u32>() {
        Ok(id) => VertexId(id),
        Err(_) => panic!("Vertex should be a non-negative number, got '{}'", token),
    }
}
