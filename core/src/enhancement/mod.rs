//! Probability of reaching target attribute levels through random strengthen events.
//!
//! Every strengthen event picks one of the attributes that isn't at [`MAX_LEVEL`] yet and
//! raises it by one. The engine walks the whole decision tree of that process and counts
//! terminal leaves, a leaf being reached either when the step budget runs out or when
//! every attribute is capped. Each enumerated leaf counts as one outcome regardless of how
//! many choices led to it.

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::{
    Error, LevelRole, Result, ATTRIBUTE_COUNT, DEFAULT_MAX_STEPS, MAX_LEVEL, MIN_LEVEL,
    PATH_RECORD_LIMIT,
};


/*****************************************************************************************
 * LevelVector
 */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LevelVector([u8; ATTRIBUTE_COUNT]);

impl LevelVector {
    /// Validates caller supplied levels, `role` only affects the error reported
    pub fn new(role: LevelRole, levels: &[i64]) -> Result<Self> {
        if levels.len() != ATTRIBUTE_COUNT {
            return Err(Error::WrongLevelCount {
                role,
                len: levels.len(),
            });
        }

        let mut out = [0; ATTRIBUTE_COUNT];
        for (idx, &level) in levels.iter().enumerate() {
            if !(MIN_LEVEL as i64..=MAX_LEVEL as i64).contains(&level) {
                return Err(Error::LevelOutOfRange {
                    role,
                    slot: idx + 1,
                    level,
                });
            }
            out[idx] = level as u8;
        }
        Ok(Self(out))
    }

    pub fn levels(&self) -> [u8; ATTRIBUTE_COUNT] {
        self.0
    }

    /// Attributes that can still be strengthened, in ascending index order
    pub fn eligible(&self) -> ArrayVec<usize, ATTRIBUTE_COUNT> {
        (0..ATTRIBUTE_COUNT)
            .filter(|&idx| self.0[idx] < MAX_LEVEL)
            .collect()
    }

    /// Returns a copy with the given attribute one level higher
    pub fn raised(self, attribute: usize) -> Self {
        debug_assert!(self.0[attribute] < MAX_LEVEL);
        let mut levels = self.0;
        levels[attribute] += 1;
        Self(levels)
    }

    /// Level ups left until every attribute is at [`MAX_LEVEL`]
    pub fn remaining_levels(&self) -> u32 {
        self.0.iter().map(|&level| u32::from(MAX_LEVEL - level)).sum()
    }

    pub fn sorted_descending(self) -> Self {
        let mut levels = self.0;
        levels.sort_unstable_by(|a, b| b.cmp(a));
        Self(levels)
    }

    /// True if every level is at least the level of `target` in the same position
    pub fn dominates(&self, target: &LevelVector) -> bool {
        self.0.iter().zip(target.0.iter()).all(|(a, b)| a >= b)
    }

    pub fn meets(&self, target: &LevelVector, mode: CompareMode) -> bool {
        match mode {
            CompareMode::Free => self.sorted_descending().dominates(&target.sorted_descending()),
            CompareMode::Strict => self.dominates(target),
        }
    }
}

impl From<[u8; ATTRIBUTE_COUNT]> for LevelVector {
    fn from(levels: [u8; ATTRIBUTE_COUNT]) -> Self {
        debug_assert!(levels.iter().all(|l| (MIN_LEVEL..=MAX_LEVEL).contains(l)));
        Self(levels)
    }
}

/*****************************************************************************************
 * Query / Result Types
 */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompareMode {
    /// Both vectors are sorted before comparing, which slot holds which level is ignored
    #[default]
    Free,
    /// Every slot has to reach the target level of the same slot
    Strict,
}

impl CompareMode {
    pub fn from_order_independent(order_independent: bool) -> Self {
        if order_independent {
            CompareMode::Free
        } else {
            CompareMode::Strict
        }
    }

    pub fn is_order_independent(self) -> bool {
        self == CompareMode::Free
    }

    pub fn name(self) -> &'static str {
        match self {
            CompareMode::Free => "free",
            CompareMode::Strict => "strict",
        }
    }
}

impl std::str::FromStr for CompareMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "free" => Ok(CompareMode::Free),
            "strict" => Ok(CompareMode::Strict),
            _ => Err(Error::UnknownMode(s.into())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancementQuery {
    pub initial: Vec<i64>,
    pub target: Vec<i64>,
    pub max_steps: u32,
    pub mode: CompareMode,
    pub record_paths: bool,
}

impl EnhancementQuery {
    pub fn new(initial: &[i64], target: &[i64]) -> Self {
        Self {
            initial: initial.to_vec(),
            target: target.to_vec(),
            max_steps: DEFAULT_MAX_STEPS,
            mode: CompareMode::default(),
            record_paths: false,
        }
    }

    pub fn max_steps(mut self, value: u32) -> Self {
        self.max_steps = value;
        self
    }

    pub fn mode(mut self, value: CompareMode) -> Self {
        self.mode = value;
        self
    }

    pub fn record_paths(mut self, value: bool) -> Self {
        self.record_paths = value;
        self
    }

    /// Treat the initial levels as counted from 0 instead of [`MIN_LEVEL`]
    pub fn zero_based_initial(mut self) -> Self {
        for level in &mut self.initial {
            *level = level.saturating_add(MIN_LEVEL as i64);
        }
        self
    }

    pub fn validate(&self) -> Result<EnhancementPlan> {
        let initial = LevelVector::new(LevelRole::Initial, &self.initial)?;
        let target = LevelVector::new(LevelRole::Target, &self.target)?;

        let below = initial
            .0
            .iter()
            .zip(target.0.iter())
            .position(|(initial, target)| target < initial);
        if let Some(idx) = below {
            return Err(Error::TargetBelowInitial {
                slot: idx + 1,
                initial: initial.0[idx],
                target: target.0[idx],
            });
        }

        Ok(EnhancementPlan {
            initial,
            target,
            max_steps: self.max_steps,
            mode: self.mode,
            record_paths: self.record_paths,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// 1 based position of the event in the path
    pub step: u32,
    /// 0 based attribute index
    pub slot: usize,
    pub new_level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    pub success: bool,
    pub final_levels: LevelVector,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementResult {
    pub probability: f64,
    pub probability_percent: f64,
    pub successful_outcomes: u64,
    pub total_outcomes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<Path>>,
}

/*****************************************************************************************
 * Enumeration
 */

pub fn compute(query: &EnhancementQuery) -> Result<EnhancementResult> {
    Ok(query.validate()?.run())
}

/// A validated query, ready to be enumerated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancementPlan {
    pub initial: LevelVector,
    pub target: LevelVector,
    pub max_steps: u32,
    pub mode: CompareMode,
    pub record_paths: bool,
}

struct Node {
    levels: LevelVector,
    depth: u32,
    // the event that produced this node, None for the root
    step: Option<Step>,
}

impl EnhancementPlan {
    pub fn run(&self) -> EnhancementResult {
        let mut total_outcomes: u64 = 0;
        let mut successful_outcomes: u64 = 0;
        let mut paths = self.record_paths.then(Vec::new);

        // depth first over an explicit stack, children are pushed in reverse so the lowest
        // attribute index is expanded first
        let mut stack = vec![Node {
            levels: self.initial,
            depth: 0,
            step: None,
        }];
        // steps from the root to the node currently being expanded, no path is longer than
        // the number of level ups left before every attribute is capped
        let longest_path = self.max_steps.min(self.initial.remaining_levels());
        let mut trail: Vec<Step> = Vec::with_capacity(longest_path as usize);

        while let Some(node) = stack.pop() {
            if let Some(step) = node.step {
                trail.truncate(node.depth as usize - 1);
                trail.push(step);
            }

            let eligible = node.levels.eligible();
            if node.depth < self.max_steps && !eligible.is_empty() {
                for &attribute in eligible.iter().rev() {
                    let levels = node.levels.raised(attribute);
                    stack.push(Node {
                        levels,
                        depth: node.depth + 1,
                        step: Some(Step {
                            step: node.depth + 1,
                            slot: attribute,
                            new_level: levels.0[attribute],
                        }),
                    });
                }
                continue;
            }

            // either the budget is spent or nothing is left to strengthen, a capped vector
            // ends its branch early and is recorded like any other leaf
            let success = node.levels.meets(&self.target, self.mode);
            total_outcomes += 1;
            if success {
                successful_outcomes += 1;
            }
            log::trace!(
                "leaf {total_outcomes}: {:?} after {} steps, success = {success}",
                node.levels.0,
                node.depth
            );

            if let Some(paths) = &mut paths {
                if paths.len() < PATH_RECORD_LIMIT {
                    paths.push(Path {
                        success,
                        final_levels: node.levels,
                        steps: trail.clone(),
                    });
                }
            }
        }

        let probability = crate::ratio(successful_outcomes, total_outcomes);

        log::debug!(
            "enhancement {:?} -> {:?} ({}, {} steps): {successful_outcomes}/{total_outcomes}",
            self.initial.0,
            self.target.0,
            self.mode.name(),
            self.max_steps
        );

        EnhancementResult {
            probability,
            probability_percent: crate::percent(probability),
            successful_outcomes,
            total_outcomes,
            paths,
        }
    }
}
