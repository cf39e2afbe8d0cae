use serde::{Deserialize, Serialize};

use crate::coder::{merge_probs_saturating, merge_tree, validate_tree, Prob, TreeIndex};
use crate::error::{BvError, BvResult};

/// Saturation schedule for long-lived binary contexts: the update weight
/// ramps over the first 20 samples and is capped at 128/256.
pub const COUNT_SAT: u32 = 20;
pub const MAX_UPDATE_FACTOR: u32 = 128;

/// Default per-count update weights for tree contexts, ramping to the
/// coefficient-update ceiling of 112/256.
pub const DEFAULT_UPDATE_FACTORS: [Prob; 25] = [
    0, 5, 9, 14, 19, 23, 28, 33, 37, 42, 47, 51, 56, 61, 65, 70, 75, 79, 84, 89, 93, 98, 103,
    107, 112,
];

/// One adaptive boolean context: the current probability of a "0" plus the
/// bit counts observed since the last adaptation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryContext {
    prob: Prob,
    counts: [u32; 2],
}

impl BinaryContext {
    pub fn new(prob: Prob) -> Self {
        Self {
            prob,
            counts: [0, 0],
        }
    }

    pub fn prob(&self) -> Prob {
        self.prob
    }

    pub fn counts(&self) -> [u32; 2] {
        self.counts
    }

    pub fn record(&mut self, bit: bool) {
        self.counts[bit as usize] += 1;
    }

    /// Folds the observed counts into the probability and clears them.
    pub fn adapt(&mut self) {
        self.prob = merge_probs_saturating(
            self.prob,
            self.counts[0],
            self.counts[1],
            COUNT_SAT,
            MAX_UPDATE_FACTOR,
        );
        self.counts = [0, 0];
    }
}

impl Default for BinaryContext {
    fn default() -> Self {
        Self::new(crate::coder::PROB_HALF)
    }
}

/// Adaptive state for one tree alphabet: per-node probabilities plus
/// per-leaf symbol counts. The tree itself stays a shared constant; only
/// this state is duplicated per coding context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeContext {
    probs: Vec<Prob>,
    counts: Vec<u32>,
}

impl TreeContext {
    /// Validates the tree once up front; decode-path calls then trust it.
    pub fn new(tree: &[TreeIndex], initial: &[Prob]) -> BvResult<Self> {
        let num_symbols = tree.len() / 2 + 1;
        validate_tree(tree, num_symbols)?;
        if initial.len() != tree.len() / 2 {
            return Err(BvError::ContextError(format!(
                "{} probabilities for {} internal nodes",
                initial.len(),
                tree.len() / 2
            )));
        }
        Ok(Self {
            probs: initial.to_vec(),
            counts: vec![0; num_symbols],
        })
    }

    pub fn probs(&self) -> &[Prob] {
        &self.probs
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn record(&mut self, symbol: usize) {
        self.counts[symbol] += 1;
    }

    /// Re-derives every node probability from the counts seen since the
    /// last adaptation, then clears them. Returns the total symbol count.
    pub fn adapt(&mut self, tree: &[TreeIndex], factors: &[Prob]) -> u32 {
        let prev = self.probs.clone();
        let total = merge_tree(tree, &prev, &self.counts, &mut self.probs, factors);
        self.counts.fill(0);
        total
    }

    pub fn encode(&self) -> BvResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| BvError::ContextError(e.to_string()))
    }

    pub fn decode(data: &[u8]) -> BvResult<Self> {
        bincode::deserialize(data).map_err(|e| BvError::ContextError(e.to_string()))
    }
}
