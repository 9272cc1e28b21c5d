pub(crate) mod geometry;
pub(crate) mod graphs;
pub(crate) mod grids;
pub(crate) mod random_graphs;
