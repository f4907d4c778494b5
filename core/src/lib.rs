mod display;

pub mod affix;
pub mod combination;
pub mod combinatorics;
pub mod command;
pub mod enhancement;

pub use affix::{Affix, AffixCategory};
pub use combination::{CombinationQuery, CombinationResult};
pub use command::{Command, CommandKind, ExecuteOptions, Reply};
pub use enhancement::{
    CompareMode, EnhancementPlan, EnhancementQuery, EnhancementResult, LevelVector, Path, Step,
};

/*****************************************************************************************
 * Error Types
 */

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("slot count must be between 1 and {max}, got {0}", max = AFFIX_COUNT)]
    SlotCountOutOfRange(i64),

    #[error("no valid affix ids (1-{max}) in the target range", max = AFFIX_COUNT)]
    EmptyTargetRange,

    #[error("affix id {0} is not between 1 and {max}", max = AFFIX_COUNT)]
    AffixIdOutOfRange(i64),

    #[error("expected {expected} {role} levels, got {len}", expected = ATTRIBUTE_COUNT)]
    WrongLevelCount { role: LevelRole, len: usize },

    #[error(
        "{role} level {level} in slot {slot} must be between {min} and {max}",
        min = MIN_LEVEL,
        max = MAX_LEVEL
    )]
    LevelOutOfRange {
        role: LevelRole,
        slot: usize,
        level: i64,
    },

    #[error("target level {target} in slot {slot} is below the initial level {initial}")]
    TargetBelowInitial { slot: usize, initial: u8, target: u8 },

    #[error("could not read {input:?} as {expected}")]
    Parse {
        input: String,
        expected: &'static str,
    },

    #[error("unknown command {0:?}, try help")]
    UnknownCommand(String),

    #[error("unknown mode {0:?}, expected free or strict")]
    UnknownMode(String),

    #[error("unknown affix category {0:?}, expected damage, defense or utility")]
    UnknownCategory(String),
}

/// Which of the two level vectors of an enhancement query a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelRole {
    Initial,
    Target,
}

impl std::fmt::Display for LevelRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelRole::Initial => f.write_str("initial"),
            LevelRole::Target => f.write_str("target"),
        }
    }
}

/*****************************************************************************************
 * Common Types / Constants
 */

/// Number of distinct affixes a mod can roll, ids are `1..=AFFIX_COUNT`
pub const AFFIX_COUNT: u8 = 10;

/// Number of independently leveled attributes on a single mod
pub const ATTRIBUTE_COUNT: usize = 4;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 5;

/// Strengthen events a mod receives over its lifetime
pub const DEFAULT_MAX_STEPS: u32 = 5;

/// Qualifying combinations are only listed when there are at most this many
pub const COMBINATION_DISPLAY_LIMIT: u64 = 1000;

/// Maximum number of terminal leaves whose decision path is kept
pub const PATH_RECORD_LIMIT: usize = 100;

pub(crate) fn percent(probability: f64) -> f64 {
    probability * 100.0
}

pub(crate) fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
