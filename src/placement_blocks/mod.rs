pub(crate) mod contour;
pub(crate) mod geometry;
pub mod layout_view;
pub mod reinsert;

#[cfg(test)]
mod property_tests;
