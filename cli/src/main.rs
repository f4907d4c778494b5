use clap::Parser;
use modcalc_core::{
    command::parse_list, AffixCategory, Command, CompareMode, ExecuteOptions, DEFAULT_MAX_STEPS,
};
use tracing_subscriber::EnvFilter;

mod headless;
mod output;

use output::Format;

#[derive(Debug, Parser)]
#[command(version, about = "Loot probability calculator for mod affixes and strengthening")]
struct Args {
    /// How replies are written to stdout
    #[arg(
        long,
        short,
        global = true,
        value_enum,
        env = "MODCALC_FORMAT",
        default_value_t = Format::Text
    )]
    format: Format,

    /// Log more to stderr, can be repeated. MODCALC_LOG overrides this
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Subcommand,
}

#[derive(Debug, clap::Subcommand)]
enum Subcommand {
    /// Chance that every rolled affix is one of the target affixes
    Affix {
        /// Number of affixes rolled onto the mod
        slot_count: i64,

        /// Comma separated target affix ids, e.g. 1,4,5,6
        #[arg(value_parser = list)]
        targets: List,

        /// List every qualifying combination when there aren't too many
        #[arg(long, short = 'c')]
        show_combinations: bool,
    },

    /// Chance that strengthening reaches the target attribute levels
    Strengthen {
        /// Comma separated initial levels, e.g. 1,2,3,1
        #[arg(value_parser = list)]
        initial: List,

        /// Comma separated target levels, e.g. 3,4,5,2
        #[arg(value_parser = list)]
        target: List,

        /// Every slot has to reach its own target level
        #[arg(long)]
        strict: bool,

        /// Number of strengthen events
        #[arg(long, short, default_value_t = DEFAULT_MAX_STEPS)]
        steps: u32,

        /// List the first decision paths of the enumeration
        #[arg(long, short = 'p')]
        show_paths: bool,

        /// Initial levels count from 0 instead of 1
        #[arg(long)]
        zero_based: bool,
    },

    /// List the affixes a mod can roll
    Affixes { category: Option<AffixCategory> },

    /// Read commands line by line from stdin and reply to each on stdout
    Headless {
        /// Only lines starting with this prefix are treated as commands, e.g. "!oh"
        #[arg(long, env = "MODCALC_PREFIX")]
        prefix: Option<String>,

        /// Number of strengthen events
        #[arg(long, short, default_value_t = DEFAULT_MAX_STEPS)]
        steps: u32,

        #[arg(long, short = 'c')]
        show_combinations: bool,

        #[arg(long, short = 'p')]
        show_paths: bool,

        #[arg(long)]
        zero_based: bool,

        /// Echo all input and output to stderr
        #[arg(long)]
        trace_io: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct List(Vec<i64>);

fn list(input: &str) -> modcalc_core::Result<List> {
    parse_list(input).map(List)
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("MODCALC_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

impl Subcommand {
    /// The command a one shot subcommand runs, `None` for headless
    fn into_command(self) -> Option<(Command, ExecuteOptions)> {
        let defaults = ExecuteOptions::default();
        match self {
            Subcommand::Affix {
                slot_count,
                targets,
                show_combinations,
            } => Some((
                Command::Affix {
                    slot_count,
                    target_ids: targets.0,
                },
                ExecuteOptions {
                    show_combinations,
                    ..defaults
                },
            )),

            Subcommand::Strengthen {
                initial,
                target,
                strict,
                steps,
                show_paths,
                zero_based,
            } => Some((
                Command::Strengthen {
                    initial: initial.0,
                    target: target.0,
                    mode: CompareMode::from_order_independent(!strict),
                },
                ExecuteOptions {
                    max_steps: steps,
                    record_paths: show_paths,
                    zero_based,
                    ..defaults
                },
            )),

            Subcommand::Affixes { category } => Some((Command::Affixes { category }, defaults)),

            Subcommand::Headless { .. } => None,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Subcommand::Headless {
        prefix,
        steps,
        show_combinations,
        show_paths,
        zero_based,
        trace_io,
    } = args.command
    {
        let config = headless::Config {
            prefix,
            format: args.format,
            options: ExecuteOptions {
                max_steps: steps,
                show_combinations,
                record_paths: show_paths,
                zero_based,
            },
            trace_io,
        };
        return headless::run(&config, std::io::stdin().lock(), std::io::stdout().lock());
    }

    let Some((cmd, options)) = args.command.into_command() else {
        anyhow::bail!("nothing to run");
    };

    let reply = cmd.execute(&options);
    match &reply {
        Ok(_) => {
            print!("{}", output::render(args.format, &reply)?);
            Ok(())
        }
        Err(err) => {
            if args.format == Format::Json {
                print!("{}", output::render(args.format, &reply)?);
            }
            anyhow::bail!("{err}")
        }
    }
}
