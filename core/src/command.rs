//! Chat style text commands such as `!oh affix 3 1,4,5,6`, and their execution.

use nom::{
    bytes::complete::take_till1,
    character::complete::{char, digit1, multispace0, multispace1, one_of, space0},
    combinator::{all_consuming, map_res, opt, recognize},
    multi::separated_list1,
    sequence::{delimited, pair},
    IResult,
};

use crate::{
    affix::{self, Affix, AffixCategory},
    combination::{self, CombinationQuery, CombinationResult},
    enhancement::{CompareMode, EnhancementPlan, EnhancementQuery, EnhancementResult},
    Error, Result, AFFIX_COUNT, DEFAULT_MAX_STEPS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Help,
    Affix,
    Strengthen,
    Affixes,
}

impl CommandKind {
    pub const ALL: [CommandKind; 4] = [
        CommandKind::Help,
        CommandKind::Affix,
        CommandKind::Strengthen,
        CommandKind::Affixes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CommandKind::Help => "help",
            CommandKind::Affix => "affix",
            CommandKind::Strengthen => "strengthen",
            CommandKind::Affixes => "affixes",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CommandKind::Help => "show available commands",
            CommandKind::Affix => "chance that every rolled affix is one of the targets",
            CommandKind::Strengthen => "chance that strengthening reaches the target levels",
            CommandKind::Affixes => "list affixes, optionally of one category",
        }
    }

    pub fn usage(self) -> &'static str {
        match self {
            CommandKind::Help => "help [command]",
            CommandKind::Affix => "affix <slot count> <id,id,...>",
            CommandKind::Strengthen => "strengthen <l,l,l,l> <l,l,l,l> [free|strict]",
            CommandKind::Affixes => "affixes [damage|defense|utility]",
        }
    }

    pub fn example(self) -> &'static str {
        match self {
            CommandKind::Help => "help strengthen",
            CommandKind::Affix => "affix 3 1,4,5,6",
            CommandKind::Strengthen => "strengthen 1,2,3,1 3,4,5,2 strict",
            CommandKind::Affixes => "affixes damage",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        CommandKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help {
        topic: Option<String>,
    },
    Affix {
        slot_count: i64,
        target_ids: Vec<i64>,
    },
    Strengthen {
        initial: Vec<i64>,
        target: Vec<i64>,
        mode: CompareMode,
    },
    Affixes {
        category: Option<AffixCategory>,
    },
    /// A known command that was given too few arguments
    Usage(CommandKind),
}

/// Knobs that apply to every command executed by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteOptions {
    pub max_steps: u32,
    pub show_combinations: bool,
    pub record_paths: bool,
    /// Initial levels of strengthen commands count from 0
    pub zero_based: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            show_combinations: false,
            record_paths: false,
            zero_based: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Combination(CombinationResult),
    Enhancement {
        plan: EnhancementPlan,
        result: EnhancementResult,
    },
    Affixes {
        category: Option<AffixCategory>,
        affixes: Vec<&'static Affix>,
    },
    /// `None` lists every command
    Help(Option<CommandKind>),
    Usage(CommandKind),
}

impl Command {
    /// Parses a single line of input.
    ///
    /// With a `prefix` set, lines that don't start with it are not meant for us and
    /// produce `Ok(None)`, as do blank lines.
    pub fn parse(input: &str, prefix: Option<&str>) -> Result<Option<Command>> {
        let input = match strip_prefix(input, prefix) {
            Some(rest) => rest,
            None => return Ok(None),
        };
        if input.is_empty() {
            return Ok(None);
        }

        let words = split_words(input)?;
        let (name, args) = match words.split_first() {
            Some((name, args)) => (*name, args),
            None => return Ok(None),
        };
        let kind =
            CommandKind::from_name(name).ok_or_else(|| Error::UnknownCommand(name.into()))?;

        let cmd = match (kind, args) {
            (CommandKind::Help, []) => Command::Help { topic: None },
            (CommandKind::Help, [topic, ..]) => Command::Help {
                topic: Some(topic.to_string()),
            },

            (CommandKind::Affix, [slot_count, target_ids, ..]) => Command::Affix {
                slot_count: parse_number(slot_count)?,
                target_ids: parse_affix_ids(target_ids)?,
            },

            (CommandKind::Strengthen, [initial, target, rest @ ..]) => Command::Strengthen {
                initial: parse_list(initial)?,
                target: parse_list(target)?,
                mode: match rest.first() {
                    Some(mode) => mode.parse()?,
                    None => CompareMode::default(),
                },
            },

            (CommandKind::Affixes, []) => Command::Affixes { category: None },
            (CommandKind::Affixes, [category, ..]) => Command::Affixes {
                category: Some(category.parse()?),
            },

            (kind, _) => Command::Usage(kind),
        };

        Ok(Some(cmd))
    }

    pub fn execute(self, options: &ExecuteOptions) -> Result<Reply> {
        match self {
            Command::Help { topic: None } => Ok(Reply::Help(None)),
            Command::Help { topic: Some(topic) } => CommandKind::from_name(&topic)
                .map(|kind| Reply::Help(Some(kind)))
                .ok_or(Error::UnknownCommand(topic)),

            Command::Affix {
                slot_count,
                target_ids,
            } => {
                let query = CombinationQuery::new(slot_count, &target_ids)
                    .show_combinations(options.show_combinations);
                Ok(Reply::Combination(combination::compute(&query)?))
            }

            Command::Strengthen {
                initial,
                target,
                mode,
            } => {
                let mut query = EnhancementQuery::new(&initial, &target)
                    .max_steps(options.max_steps)
                    .mode(mode)
                    .record_paths(options.record_paths);
                if options.zero_based {
                    query = query.zero_based_initial();
                }

                let plan = query.validate()?;
                let result = plan.run();
                Ok(Reply::Enhancement { plan, result })
            }

            Command::Affixes { category } => {
                let affixes = match category {
                    Some(category) => affix::by_category(category).collect(),
                    None => affix::all().iter().collect(),
                };
                Ok(Reply::Affixes { category, affixes })
            }

            Command::Usage(kind) => Ok(Reply::Usage(kind)),
        }
    }
}

/*****************************************************************************************
 * Argument Parsing
 */

/// Trims `input` and removes `prefix` from it, the prefix has to stand on its own.
///
/// Returns `None` when a prefix is set but the line doesn't start with it.
pub fn strip_prefix<'a>(input: &'a str, prefix: Option<&str>) -> Option<&'a str> {
    let input = input.trim();
    let Some(prefix) = prefix else {
        return Some(input);
    };

    let rest = input.strip_prefix(prefix)?;
    (rest.is_empty() || rest.starts_with(|c: char| c.is_whitespace())).then(|| rest.trim_start())
}

fn words(i: &str) -> IResult<&str, Vec<&str>> {
    delimited(
        multispace0,
        separated_list1(multispace1, take_till1(|c: char| c.is_whitespace())),
        multispace0,
    )(i)
}

fn integer(i: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(one_of("+-")), digit1)), |s: &str| {
        s.parse::<i64>()
    })(i)
}

fn split_words(input: &str) -> Result<Vec<&str>> {
    all_consuming(words)(input)
        .map(|(_, words)| words)
        .map_err(|_| Error::Parse {
            input: input.into(),
            expected: "a command",
        })
}

pub fn parse_number(input: &str) -> Result<i64> {
    all_consuming(delimited(space0, integer, space0))(input)
        .map(|(_, num)| num)
        .map_err(|_| Error::Parse {
            input: input.into(),
            expected: "a number",
        })
}

/// Parses a comma separated list of integers such as `1,2, 3`
pub fn parse_list(input: &str) -> Result<Vec<i64>> {
    all_consuming(separated_list1(char(','), delimited(space0, integer, space0)))(input)
        .map(|(_, list)| list)
        .map_err(|_| Error::Parse {
            input: input.into(),
            expected: "a comma separated list of numbers",
        })
}

/// Like [`parse_list`] but every id must name an affix
pub fn parse_affix_ids(input: &str) -> Result<Vec<i64>> {
    let ids = parse_list(input)?;
    match ids.iter().find(|&&id| !(1..=AFFIX_COUNT as i64).contains(&id)) {
        Some(&id) => Err(Error::AffixIdOutOfRange(id)),
        None => Ok(ids),
    }
}
