//! Recursive procedural tree generation

pub mod generator;

pub use generator::{
    BranchSegment, LeafBillboard, LeafCluster, TreeGenerator, TreeParams, TreeSkeleton,
    TreeStyle, MAX_TREE_DEPTH,
};
