//! CLI command definitions

use clap::{Parser, ValueEnum};
use ensemble_domain::{CombinationStrategy, OutputFormat, Topology};
use std::path::PathBuf;

/// Collaboration topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TopologyArg {
    /// All models at once; the combination strategy picks the answer
    Parallel,
    /// One after another; critics and synthesizers feed the next model
    Sequential,
    /// All models at once; highest confidence x weight wins
    Voting,
    /// Primary first, the rest refine or critique its answer
    Hierarchical,
}

impl From<TopologyArg> for Topology {
    fn from(arg: TopologyArg) -> Self {
        match arg {
            TopologyArg::Parallel => Topology::Parallel,
            TopologyArg::Sequential => Topology::Sequential,
            TopologyArg::Voting => Topology::Voting,
            TopologyArg::Hierarchical => Topology::Hierarchical,
        }
    }
}

/// How parallel answers are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CombinationArg {
    /// Concatenate every answer
    Merge,
    /// Most common answer wins
    Vote,
    /// One extra call merges the answers
    Synthesis,
    /// One extra call critiques and improves the first answer
    #[value(alias = "critique")]
    CritiqueThenImprove,
}

impl From<CombinationArg> for CombinationStrategy {
    fn from(arg: CombinationArg) -> Self {
        match arg {
            CombinationArg::Merge => CombinationStrategy::Merge,
            CombinationArg::Vote => CombinationStrategy::Vote,
            CombinationArg::Synthesis => CombinationStrategy::Synthesis,
            CombinationArg::CritiqueThenImprove => CombinationStrategy::CritiqueThenImprove,
        }
    }
}

/// Output format for orchestration results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    /// Only the final answer
    Answer,
    /// Answer, every contribution and model statistics
    Full,
    /// JSON envelope
    Json,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Answer => OutputFormat::Answer,
            OutputArg::Full => OutputFormat::Full,
            OutputArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for model-ensemble
#[derive(Parser, Debug)]
#[command(name = "model-ensemble")]
#[command(author, version, about = "Ask several LLMs at once and combine their answers")]
#[command(long_about = r#"
model-ensemble sends one request to several language models and turns their
answers into a single response.

Topologies decide who runs and in what order (parallel, sequential, voting,
hierarchical). Parallel runs are combined by a strategy (merge, vote,
synthesis, critique-then-improve).

Configuration files are loaded from (in priority order):
1. ENSEMBLE_* environment variables
2. --config <path>     Explicit config file
3. ./ensemble.toml     Project-level config
4. ~/.config/model-ensemble/config.toml   Global config

Example:
  model-ensemble "What's the best way to handle errors in Rust?"
  model-ensemble -t hierarchical "Review this migration plan"
  model-ensemble -c synthesis -o full "Compare async runtimes"
"#)]
pub struct Cli {
    /// The request to send to the ensemble
    pub question: Option<String>,

    /// Collaboration topology (overrides config)
    #[arg(short, long, value_enum)]
    pub topology: Option<TopologyArg>,

    /// Combination strategy for parallel runs (overrides config)
    #[arg(short, long, value_enum)]
    pub combination: Option<CombinationArg>,

    /// Maximum number of models to dispatch (0 = no limit)
    #[arg(long, value_name = "N")]
    pub max_models: Option<usize>,

    /// Per-call timeout in seconds (0 = no timeout)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Tool name advertised to every model (can be specified multiple times)
    #[arg(long = "tool", value_name = "NAME")]
    pub tools: Vec<String>,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputArg>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write tracing logs to daily files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Append a JSONL transcript of the run to this file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_full_invocation() {
        let cli = Cli::try_parse_from([
            "model-ensemble",
            "-t",
            "hierarchical",
            "-c",
            "critique",
            "--max-models",
            "3",
            "--timeout",
            "30",
            "--tool",
            "search",
            "--tool",
            "calculator",
            "-o",
            "json",
            "-vv",
            "What is Rust?",
        ])
        .unwrap();

        assert_eq!(cli.question.as_deref(), Some("What is Rust?"));
        assert_eq!(cli.topology.map(Topology::from), Some(Topology::Hierarchical));
        assert_eq!(
            cli.combination.map(CombinationStrategy::from),
            Some(CombinationStrategy::CritiqueThenImprove)
        );
        assert_eq!(cli.max_models, Some(3));
        assert_eq!(cli.timeout, Some(30));
        assert_eq!(cli.tools, vec!["search", "calculator"]);
        assert_eq!(cli.output.map(OutputFormat::from), Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_defaults_leave_config_in_charge() {
        let cli = Cli::try_parse_from(["model-ensemble", "hi"]).unwrap();
        assert!(cli.topology.is_none());
        assert!(cli.combination.is_none());
        assert!(cli.output.is_none());
        assert!(cli.tools.is_empty());
        assert!(!cli.quiet);
    }

    #[test]
    fn test_unknown_topology_rejected() {
        assert!(Cli::try_parse_from(["model-ensemble", "-t", "round-robin", "hi"]).is_err());
    }
}
