mod quadrant;
mod spatial_tree;

pub use quadrant::*;
pub use spatial_tree::*;

#[cfg(test)]
mod spatial_tree_tests;
