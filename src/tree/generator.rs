//! Procedural tree generation by recursive subdivision.
//!
//! Builds a branching skeleton of tapering segments with terminal leaf
//! clusters. Output is flat arena-style data (segment and cluster lists),
//! generated top-down and never mutated afterward; regeneration on a
//! parameter change (e.g. season) rebuilds the whole skeleton from scratch.

use glam::{Quat, Vec3};

use crate::core::types::Result;
use crate::core::Error;
use crate::math::SimpleRng;

/// Hard ceiling on recursion depth; branch count compounds exponentially.
pub const MAX_TREE_DEPTH: u32 = 8;

/// Tree visual style presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum TreeStyle {
    #[default]
    Oak,
    Willow,
    Elm,
    /// Winter variant — bare branches with no leaves
    WinterOak,
    WinterWillow,
}

/// Parameters for recursive tree generation
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TreeParams {
    /// Recursion depth; 0 is a single leaf cluster
    pub max_depth: u32,
    /// Trunk segment length in world units
    pub trunk_length: f32,
    /// Trunk radius at base
    pub trunk_radius: f32,
    /// Length and radius factor applied per generation
    pub shrink: f32,
    /// Maximum rotation per axis at a split (radians)
    pub split_angle: f32,
    /// Probability a split spawns 3 children instead of 2
    pub third_child_chance: f32,
    /// Direction bias (gravity, light, wind)
    pub tropism: Vec3,
    /// Tropism strength (0.0-1.0)
    pub tropism_strength: f32,
    /// Billboards per terminal leaf cluster; 0 for bare winter branches
    pub leaves_per_cluster: u32,
    /// Minimum leaf offset radius
    pub leaf_radius_min: f32,
    /// Maximum leaf offset radius
    pub leaf_radius_max: f32,
    /// Leaf sway frequency range (Hz), animation-only
    pub sway_freq_min: f32,
    pub sway_freq_max: f32,
    /// Bark color (linear RGB)
    pub bark_color: [f32; 3],
    /// Leaf color (linear RGB)
    pub leaf_color: [f32; 3],
    /// Per-leaf color variation range (0-1 per channel)
    pub leaf_color_variation: f32,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::oak()
    }
}

impl TreeParams {
    /// Oak preset — wide spreading crown, moderate lean toward the light
    pub fn oak() -> Self {
        Self {
            max_depth: 6,
            trunk_length: 6.0,
            trunk_radius: 0.45,
            shrink: 0.72,
            split_angle: 0.5,
            third_child_chance: 0.3,
            tropism: Vec3::Y,
            tropism_strength: 0.08,
            leaves_per_cluster: 5,
            leaf_radius_min: 0.4,
            leaf_radius_max: 0.9,
            sway_freq_min: 0.5,
            sway_freq_max: 1.5,
            bark_color: [0.35, 0.24, 0.12],
            leaf_color: [0.16, 0.50, 0.12],
            leaf_color_variation: 0.08,
        }
    }

    /// Willow preset — wide splits, drooping cascade
    pub fn willow() -> Self {
        Self {
            max_depth: 6,
            trunk_length: 5.0,
            trunk_radius: 0.40,
            shrink: 0.78,
            split_angle: 0.65,
            third_child_chance: 0.2,
            tropism: Vec3::NEG_Y,
            tropism_strength: 0.3,
            leaves_per_cluster: 6,
            leaf_radius_min: 0.3,
            leaf_radius_max: 0.6,
            sway_freq_min: 0.8,
            sway_freq_max: 2.0,
            bark_color: [0.43, 0.33, 0.20],
            leaf_color: [0.45, 0.75, 0.35],
            leaf_color_variation: 0.06,
        }
    }

    /// Elm preset — tall, narrow splits, upward reaching
    pub fn elm() -> Self {
        Self {
            max_depth: 7,
            trunk_length: 8.0,
            trunk_radius: 0.50,
            shrink: 0.70,
            split_angle: 0.4,
            third_child_chance: 0.25,
            tropism: Vec3::Y,
            tropism_strength: 0.15,
            leaves_per_cluster: 4,
            leaf_radius_min: 0.35,
            leaf_radius_max: 0.7,
            sway_freq_min: 0.5,
            sway_freq_max: 1.2,
            bark_color: [0.29, 0.22, 0.14],
            leaf_color: [0.20, 0.59, 0.16],
            leaf_color_variation: 0.07,
        }
    }

    /// Winter oak — same branching, no leaves
    pub fn winter_oak() -> Self {
        let mut params = Self::oak();
        params.leaves_per_cluster = 0;
        params
    }

    /// Winter willow — drooping bare branches, no leaves
    pub fn winter_willow() -> Self {
        let mut params = Self::willow();
        params.leaves_per_cluster = 0;
        params
    }

    /// Create params from style preset
    pub fn from_style(style: TreeStyle) -> Self {
        match style {
            TreeStyle::Oak => Self::oak(),
            TreeStyle::Willow => Self::willow(),
            TreeStyle::Elm => Self::elm(),
            TreeStyle::WinterOak => Self::winter_oak(),
            TreeStyle::WinterWillow => Self::winter_willow(),
        }
    }

    /// Check parameter ranges before generating.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth > MAX_TREE_DEPTH {
            return Err(Error::Config(format!(
                "max_depth capped at {} (branching is exponential), got {}",
                MAX_TREE_DEPTH, self.max_depth
            )));
        }
        if !(0.0..1.0).contains(&self.shrink) || self.shrink == 0.0 {
            return Err(Error::Config(format!(
                "shrink must be in (0, 1), got {}", self.shrink
            )));
        }
        if !(0.0..=1.0).contains(&self.third_child_chance) {
            return Err(Error::Config("third_child_chance must be in [0, 1]".into()));
        }
        if self.trunk_length <= 0.0 || self.trunk_radius <= 0.0 {
            return Err(Error::Config("trunk dimensions must be positive".into()));
        }
        if self.leaf_radius_min > self.leaf_radius_max {
            return Err(Error::Config("leaf radius range inverted".into()));
        }
        Ok(())
    }
}

/// One tapering branch segment. Owned by the recursion step that created it;
/// immutable once pushed.
#[derive(Clone, Copy, Debug)]
pub struct BranchSegment {
    pub start: Vec3,
    pub end: Vec3,
    pub start_radius: f32,
    pub end_radius: f32,
    /// Remaining recursion depth when this segment was emitted
    pub depth: u32,
}

/// One leaf billboard within a cluster. The sway tuple is carried for
/// animation only; generation never reads it back.
#[derive(Clone, Copy, Debug)]
pub struct LeafBillboard {
    pub offset: Vec3,
    pub rotation_y: f32,
    pub sway_frequency: f32,
    pub sway_phase: f32,
    pub color: [f32; 3],
}

/// Terminal leaf cluster at a branch tip
#[derive(Clone, Debug)]
pub struct LeafCluster {
    pub base_position: Vec3,
    pub leaves: Vec<LeafBillboard>,
}

/// Complete tree skeleton: flat segment and cluster lists
#[derive(Clone, Debug, Default)]
pub struct TreeSkeleton {
    pub segments: Vec<BranchSegment>,
    pub leaf_clusters: Vec<LeafCluster>,
}

impl TreeSkeleton {
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn leaf_cluster_count(&self) -> usize {
        self.leaf_clusters.len()
    }
}

/// Recursive tree generator
pub struct TreeGenerator {
    rng: SimpleRng,
    params: TreeParams,
}

impl TreeGenerator {
    /// Create a new tree generator with seed
    pub fn new(seed: u64, params: TreeParams) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            params,
        }
    }

    /// Create generator from style preset
    pub fn from_style(seed: u64, style: TreeStyle) -> Self {
        Self::new(seed, TreeParams::from_style(style))
    }

    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    /// Generate a complete skeleton in local tree space (trunk base at the
    /// origin, growing up +Y). Rebuild from a fresh generator to regenerate.
    pub fn generate(&mut self) -> TreeSkeleton {
        let mut skeleton = TreeSkeleton::default();
        self.grow(
            Vec3::ZERO,
            Vec3::Y,
            self.params.trunk_length,
            self.params.trunk_radius,
            self.params.max_depth,
            &mut skeleton,
        );
        skeleton
    }

    /// One recursion step: emit a segment and spawn children, or a terminal
    /// leaf cluster at depth 0. Depth strictly decreases, so the recursion is
    /// bounded by `O(k^max_depth)` segments.
    fn grow(
        &mut self,
        start: Vec3,
        direction: Vec3,
        length: f32,
        radius: f32,
        depth: u32,
        out: &mut TreeSkeleton,
    ) {
        if depth == 0 {
            if self.params.leaves_per_cluster > 0 {
                let cluster = self.make_cluster(start);
                out.leaf_clusters.push(cluster);
            }
            return;
        }

        let end = start + direction * length;
        out.segments.push(BranchSegment {
            start,
            end,
            start_radius: radius,
            end_radius: radius * self.params.shrink,
            depth,
        });

        let children = if self.rng.chance(self.params.third_child_chance) { 3 } else { 2 };
        for _ in 0..children {
            let child_dir = self.split_direction(direction);
            self.grow(
                end,
                child_dir,
                length * self.params.shrink,
                radius * self.params.shrink,
                depth - 1,
                out,
            );
        }
    }

    /// Child direction: parent direction rotated by bounded random angles
    /// about two perpendicular axes, leaned by tropism, renormalized.
    fn split_direction(&mut self, parent: Vec3) -> Vec3 {
        let reference = if parent.y.abs() < 0.9 { Vec3::Y } else { Vec3::X };
        let axis_a = parent.cross(reference).normalize();
        let axis_b = parent.cross(axis_a).normalize();

        let angle_a = self.rng.range(-self.params.split_angle, self.params.split_angle);
        let angle_b = self.rng.range(-self.params.split_angle, self.params.split_angle);

        let rotated = Quat::from_axis_angle(axis_a, angle_a)
            * (Quat::from_axis_angle(axis_b, angle_b) * parent);

        // Stylistic lean, not a physical model: additive then renormalized
        (rotated + self.params.tropism * self.params.tropism_strength).normalize()
    }

    /// Build one leaf cluster at a branch tip, with randomized billboard
    /// offsets and a persistent sway tuple per leaf
    fn make_cluster(&mut self, base: Vec3) -> LeafCluster {
        let leaves = (0..self.params.leaves_per_cluster)
            .map(|_| {
                let radius = self.rng.range(self.params.leaf_radius_min, self.params.leaf_radius_max);
                let offset = Vec3::new(
                    self.rng.range(-radius, radius),
                    self.rng.range(-radius * 0.5, radius),
                    self.rng.range(-radius, radius),
                );
                LeafBillboard {
                    offset,
                    rotation_y: self.rng.range(0.0, std::f32::consts::TAU),
                    sway_frequency: self.rng.range(self.params.sway_freq_min, self.params.sway_freq_max),
                    sway_phase: self.rng.range(0.0, std::f32::consts::TAU),
                    color: self.vary_leaf_color(),
                }
            })
            .collect();

        LeafCluster {
            base_position: base,
            leaves,
        }
    }

    /// Jitter the base leaf color per billboard
    fn vary_leaf_color(&mut self) -> [f32; 3] {
        let variation = self.params.leaf_color_variation;
        let mut color = self.params.leaf_color;
        for c in &mut color {
            *c = (*c + self.rng.range(-variation, variation)).clamp(0.0, 1.0);
        }
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Worst-case segment bound for branch factor k and depth d:
    /// (k^(d+1) - 1) / (k - 1)
    fn segment_bound(k: u64, d: u32) -> u64 {
        (k.pow(d + 1) - 1) / (k - 1)
    }

    #[test]
    fn test_tree_params_presets() {
        let oak = TreeParams::oak();
        let elm = TreeParams::elm();
        let willow = TreeParams::willow();

        assert!(elm.trunk_length > oak.trunk_length);
        assert!(willow.tropism.y < 0.0);
        assert!(oak.validate().is_ok());
        assert!(elm.validate().is_ok());
        assert!(willow.validate().is_ok());
    }

    #[test]
    fn test_params_validation() {
        let mut params = TreeParams::oak();
        params.max_depth = MAX_TREE_DEPTH + 1;
        assert!(params.validate().is_err());

        let mut params = TreeParams::oak();
        params.shrink = 1.0;
        assert!(params.validate().is_err());

        let mut params = TreeParams::oak();
        params.third_child_chance = 1.5;
        assert!(params.validate().is_err());

        let mut params = TreeParams::oak();
        params.leaf_radius_min = 2.0;
        params.leaf_radius_max = 1.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_depth_zero_single_cluster() {
        let mut params = TreeParams::oak();
        params.max_depth = 0;
        let skeleton = TreeGenerator::new(42, params).generate();

        assert_eq!(skeleton.segment_count(), 0);
        assert_eq!(skeleton.leaf_cluster_count(), 1);
    }

    #[test]
    fn test_segment_count_bounded() {
        for depth in 0..=6 {
            let mut params = TreeParams::oak();
            params.max_depth = depth;
            let skeleton = TreeGenerator::new(7, params).generate();

            let bound = segment_bound(3, depth);
            assert!(
                (skeleton.segment_count() as u64) <= bound,
                "depth {}: {} segments exceeds bound {}",
                depth, skeleton.segment_count(), bound
            );
        }
    }

    #[test]
    fn test_generator_deterministic() {
        let a = TreeGenerator::new(12345, TreeParams::oak()).generate();
        let b = TreeGenerator::new(12345, TreeParams::oak()).generate();

        assert_eq!(a.segment_count(), b.segment_count());
        assert_eq!(a.leaf_cluster_count(), b.leaf_cluster_count());
        for (sa, sb) in a.segments.iter().zip(&b.segments) {
            assert_eq!(sa.start, sb.start);
            assert_eq!(sa.end, sb.end);
        }
    }

    #[test]
    fn test_different_seeds_different_trees() {
        let a = TreeGenerator::new(1, TreeParams::oak()).generate();
        let b = TreeGenerator::new(2, TreeParams::oak()).generate();

        let diverged = a.segment_count() != b.segment_count()
            || a.segments.iter().zip(&b.segments).any(|(sa, sb)| sa.end != sb.end);
        assert!(diverged);
    }

    #[test]
    fn test_radii_and_lengths_shrink_by_depth() {
        let params = TreeParams::oak();
        let skeleton = TreeGenerator::new(42, params.clone()).generate();

        for seg in &skeleton.segments {
            let generation = params.max_depth - seg.depth;
            let expected_radius = params.trunk_radius * params.shrink.powi(generation as i32);
            let expected_length = params.trunk_length * params.shrink.powi(generation as i32);

            assert!((seg.start_radius - expected_radius).abs() < 1e-4);
            assert!((seg.end_radius - expected_radius * params.shrink).abs() < 1e-4);
            assert!(((seg.end - seg.start).length() - expected_length).abs() < 1e-3);
        }
    }

    #[test]
    fn test_clusters_sit_on_branch_tips() {
        let skeleton = TreeGenerator::new(9, TreeParams::oak()).generate();
        assert!(!skeleton.leaf_clusters.is_empty());

        for cluster in &skeleton.leaf_clusters {
            let on_tip = skeleton
                .segments
                .iter()
                .any(|seg| (seg.end - cluster.base_position).length() < 1e-4);
            assert!(on_tip, "cluster floating away from every branch tip");
        }
    }

    #[test]
    fn test_cluster_contents() {
        let params = TreeParams::oak();
        let skeleton = TreeGenerator::new(5, params.clone()).generate();

        for cluster in &skeleton.leaf_clusters {
            assert_eq!(cluster.leaves.len(), params.leaves_per_cluster as usize);
            for leaf in &cluster.leaves {
                assert!(leaf.sway_frequency >= params.sway_freq_min);
                assert!(leaf.sway_frequency <= params.sway_freq_max);
                for c in leaf.color {
                    assert!((0.0..=1.0).contains(&c));
                }
            }
        }
    }

    #[test]
    fn test_winter_styles_have_no_leaves() {
        for style in [TreeStyle::WinterOak, TreeStyle::WinterWillow] {
            let skeleton = TreeGenerator::from_style(42, style).generate();
            assert!(skeleton.leaf_clusters.is_empty(), "style {:?} grew leaves", style);
            assert!(skeleton.segment_count() > 0, "style {:?} produced no branches", style);
        }
    }

    #[test]
    fn test_all_styles_generate() {
        for style in [TreeStyle::Oak, TreeStyle::Willow, TreeStyle::Elm] {
            let skeleton = TreeGenerator::from_style(42, style).generate();
            assert!(skeleton.segment_count() > 10, "style {:?} too sparse", style);
            assert!(!skeleton.leaf_clusters.is_empty());
        }
    }

    #[test]
    fn test_directions_stay_unit() {
        let skeleton = TreeGenerator::new(11, TreeParams::willow()).generate();
        for seg in &skeleton.segments {
            let dir = (seg.end - seg.start).normalize();
            assert!((dir.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_willow_droops() {
        // Strong downward tropism: outer willow branches should lean down
        let skeleton = TreeGenerator::new(42, TreeParams::willow()).generate();
        let outer_down = skeleton
            .segments
            .iter()
            .filter(|s| s.depth <= 2)
            .filter(|s| (s.end - s.start).y < 0.0)
            .count();
        assert!(outer_down > 0, "no drooping branches in a willow");
    }
}
