//! Reads a rotation system from the file given as the first argument (or uses
//! a wheel) and prints its embedding in DOT format.

use planar_grid_drawing::{debugging::render_embedding, input};

const WHEEL: &str = "
outer: 0 3
0: 1 4 3
1: 2 4 0
2: 3 4 1
3: 0 4 2
4: 1 2 3 0
";

fn main() {
    let graph = match std::env::args().nth(1) {
        Some(path) => input::from_file(&path),
        None => input::from_str(WHEEL),
    };
    print!("{}", render_embedding(&graph));
}
