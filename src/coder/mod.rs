pub mod adapt;
pub mod cost;
pub mod decoder;
pub mod encoder;
pub mod tables;
pub mod tree;

/// Probability of a "0" bit as value/256, valid in [1,255].
pub type Prob = u8;

/// Slot in a flat decision tree: entries <= 0 are leaves encoding the
/// negated symbol id, positive entries index a child node pair.
pub type TreeIndex = i8;

pub const PROB_MAX: Prob = 255;
pub const PROB_HALF: Prob = 128;

pub use adapt::{
    binary_prob, counts_to_branch_pairs, merge_probs, merge_probs_saturating, merge_probs_slice,
    merge_tree, prob_from_ratio, weighted_prob,
};
pub use cost::{branch_cost, tree_costs, tree_costs_skip, tree_path_cost};
pub use decoder::RangeDecoder;
pub use encoder::RangeEncoder;
pub use tables::{cost0, cost1, cost_bit, renorm_shift};
pub use tree::{tokens_from_tree, validate_tree, Token};
