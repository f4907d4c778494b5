/// Display impls for all the results and replies
use crate::{
    Affix, AffixCategory, CombinationResult, CommandKind, CompareMode, EnhancementResult,
    LevelVector, Path, Reply, Step,
};
use std::fmt::{Display, Formatter, Result};

/// Replies below this percentage get a warning attached
const LOW_CHANCE_PERCENT: f64 = 10.0;
/// Replies above this percentage get an encouragement attached
const HIGH_CHANCE_PERCENT: f64 = 75.0;

const RULE: &str = "-------------------------";

struct DisplayList<T>(std::cell::RefCell<T>);

impl<T> DisplayList<T> {
    fn new(inner: T) -> Self {
        Self(std::cell::RefCell::new(inner))
    }
}

impl<T> Display for DisplayList<T>
where
    T: Iterator,
    T::Item: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use std::ops::DerefMut;

        let mut iter = self.0.borrow_mut();

        write!(f, "[")?;
        if let Some(item) = iter.next() {
            write!(f, "{item}")?;
            for item in iter.deref_mut() {
                write!(f, ", {item}")?;
            }
        }
        write!(f, "]")
    }
}

fn field(f: &mut Formatter<'_>, label: &str, value: impl Display) -> Result {
    writeln!(f, "  {:<20}{value}", format!("{label}:"))
}

impl Display for LevelVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", DisplayList::new(self.levels().into_iter()))
    }
}

impl Display for CompareMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.name())
    }
}

impl Display for AffixCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.name())
    }
}

impl Display for Affix {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{:>2}. {} ({})", self.id, self.name, self.category)
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        // slots are shown 1 based like every other user facing slot number
        write!(f, "{}->{}", self.slot + 1, self.new_level)
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let outcome = if self.success { "ok  " } else { "fail" };
        write!(f, "{outcome} {}", self.final_levels)?;
        for step in &self.steps {
            write!(f, " {step}")?;
        }
        Ok(())
    }
}

impl Display for CombinationResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Affix probability")?;
        field(f, "slot count", self.slot_count)?;
        field(
            f,
            "target affixes",
            crate::affix::names(&self.target_range).join(", "),
        )?;
        writeln!(f, "  {RULE}")?;
        field(f, "chance", format!("{:.4}%", self.probability_percent))?;
        field(f, "valid combinations", self.valid_combinations)?;
        field(f, "total combinations", self.total_combinations)?;
        field(f, "exact probability", format!("{:.6}", self.probability))?;

        if let Some(combinations) = &self.combinations {
            writeln!(f, "  combinations:")?;
            for combination in combinations {
                writeln!(f, "    {}", DisplayList::new(combination.iter()))?;
            }
        }
        Ok(())
    }
}

fn write_enhancement(
    f: &mut Formatter<'_>,
    initial: &LevelVector,
    target: &LevelVector,
    mode: CompareMode,
    max_steps: u32,
    result: &EnhancementResult,
) -> Result {
    writeln!(f, "Enhancement probability")?;
    field(f, "initial levels", initial)?;
    field(f, "target levels", target)?;
    field(f, "mode", mode)?;
    field(f, "strengthen events", max_steps)?;
    writeln!(f, "  {RULE}")?;
    field(f, "chance", format!("{:.4}%", result.probability_percent))?;
    field(f, "successful paths", result.successful_outcomes)?;
    field(f, "total paths", result.total_outcomes)?;
    field(f, "exact probability", format!("{:.6}", result.probability))?;

    if let Some(paths) = &result.paths {
        writeln!(f, "  paths (first {}):", paths.len())?;
        for (idx, path) in paths.iter().enumerate() {
            writeln!(f, "    #{:<4}{path}", idx + 1)?;
        }
    }

    if result.probability_percent < LOW_CHANCE_PERCENT {
        writeln!(
            f,
            "hint: low chance of success, consider a lower target or preparing more materials"
        )?;
    } else if result.probability_percent > HIGH_CHANCE_PERCENT {
        writeln!(f, "hint: high chance of success, worth a try")?;
    }
    Ok(())
}

fn write_command(f: &mut Formatter<'_>, kind: CommandKind) -> Result {
    writeln!(f, "command:     {}", kind.name())?;
    writeln!(f, "description: {}", kind.description())?;
    writeln!(f, "usage:       {}", kind.usage())?;
    writeln!(f, "example:     {}", kind.example())
}

impl Display for Reply {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Reply::Combination(result) => write!(f, "{result}"),

            Reply::Enhancement { plan, result } => write_enhancement(
                f,
                &plan.initial,
                &plan.target,
                plan.mode,
                plan.max_steps,
                result,
            ),

            Reply::Affixes { category, affixes } => {
                match category {
                    Some(category) => writeln!(f, "Affixes ({category})")?,
                    None => writeln!(f, "Affixes")?,
                }
                for affix in affixes {
                    writeln!(f, "  {affix}")?;
                }
                Ok(())
            }

            Reply::Help(None) => {
                writeln!(f, "Available commands")?;
                for kind in CommandKind::ALL {
                    writeln!(f, "  {:<12}{}", kind.name(), kind.description())?;
                }
                writeln!(f, "Use help <command> for details")
            }

            Reply::Help(Some(kind)) => write_command(f, *kind),

            Reply::Usage(kind) => {
                writeln!(f, "missing arguments for {}", kind.name())?;
                write_command(f, *kind)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use crate::{
        combination::{self, CombinationQuery},
        enhancement::EnhancementQuery,
        Command, ExecuteOptions,
    };

    use super::*;

    fn reply(input: &str, options: &ExecuteOptions) -> String {
        let cmd = Command::parse(input, None).unwrap().unwrap();
        cmd.execute(options).unwrap().to_string()
    }

    #[test_case([1, 2, 3, 1] => "[1, 2, 3, 1]")]
    #[test_case([5, 5, 5, 5] => "[5, 5, 5, 5]")]
    fn level_vector(levels: [u8; 4]) -> String {
        LevelVector::from(levels).to_string()
    }

    #[test]
    fn affix() {
        let affix = crate::affix::by_id(4).unwrap();
        pretty_assertions::assert_eq!(affix.to_string(), " 4. DMG vs Normal (damage)");
    }

    #[test]
    fn path() {
        let path = Path {
            success: true,
            final_levels: LevelVector::from([2, 2, 1, 1]),
            steps: vec![
                Step {
                    step: 1,
                    slot: 1,
                    new_level: 2,
                },
                Step {
                    step: 2,
                    slot: 0,
                    new_level: 2,
                },
            ],
        };
        pretty_assertions::assert_eq!(path.to_string(), "ok   [2, 2, 1, 1] 2->2 1->2");
    }

    #[test]
    fn combination_result() {
        let result = combination::compute(&CombinationQuery::new(3, &[1, 4, 5, 6])).unwrap();
        let expected = "\
Affix probability
  slot count:         3
  target affixes:     Status DMG, DMG vs Normal, DMG vs Elite, DMG vs Great One
  -------------------------
  chance:             3.3333%
  valid combinations: 4
  total combinations: 120
  exact probability:  0.033333
";
        pretty_assertions::assert_eq!(result.to_string(), expected);
    }

    #[test]
    fn combination_result_with_listing() {
        let result = combination::compute(
            &CombinationQuery::new(2, &[7, 8, 9]).show_combinations(true),
        )
        .unwrap();
        let text = result.to_string();

        assert!(text.contains("  combinations:\n    [7, 8]\n    [7, 9]\n    [8, 9]\n"));
    }

    #[test]
    fn enhancement_reply() {
        let text = reply("strengthen 1,1,1,1 2,2,2,2 strict", &ExecuteOptions::default());
        let expected = "\
Enhancement probability
  initial levels:     [1, 1, 1, 1]
  target levels:      [2, 2, 2, 2]
  mode:               strict
  strengthen events:  5
  -------------------------
  chance:             23.5294%
  successful paths:   240
  total paths:        1020
  exact probability:  0.235294
";
        pretty_assertions::assert_eq!(text, expected);
    }

    #[test]
    fn low_chance_hint() {
        let text = reply("strengthen 1,1,1,1 1,1,1,5 strict", &ExecuteOptions::default());
        assert!(text.ends_with(
            "hint: low chance of success, consider a lower target or preparing more materials\n"
        ));
    }

    #[test]
    fn high_chance_hint() {
        let text = reply("strengthen 4,4,4,4 5,5,5,5 strict", &ExecuteOptions::default());
        assert!(text.contains("  chance:             100.0000%\n"));
        assert!(text.ends_with("hint: high chance of success, worth a try\n"));
    }

    #[test]
    fn enhancement_paths_are_listed() {
        let plan = EnhancementQuery::new(&[4, 5, 5, 5], &[5, 5, 5, 5])
            .record_paths(true)
            .validate()
            .unwrap();
        let result = plan.run();
        let text = Reply::Enhancement { plan, result }.to_string();

        assert!(text.contains("  paths (first 1):\n    #1   ok   [5, 5, 5, 5] 1->5\n"));
    }

    #[test]
    fn affix_listing() {
        let text = reply("affixes utility", &ExecuteOptions::default());
        pretty_assertions::assert_eq!(
            text,
            "Affixes (utility)\n   2. Magazine Capacity (utility)\n   3. Reload Speed (utility)\n"
        );
    }

    #[test]
    fn help_lists_every_command() {
        let text = reply("help", &ExecuteOptions::default());
        for kind in CommandKind::ALL {
            assert!(text.contains(kind.name()), "missing {}", kind.name());
        }
        assert!(text.starts_with("Available commands\n  help        show available commands\n"));
    }

    #[test]
    fn usage_for_missing_arguments() {
        let text = reply("affix 3", &ExecuteOptions::default());
        let expected = "\
missing arguments for affix
command:     affix
description: chance that every rolled affix is one of the targets
usage:       affix <slot count> <id,id,...>
example:     affix 3 1,4,5,6
";
        pretty_assertions::assert_eq!(text, expected);
    }
}
