use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "assay",
    about = "Assay — structural checks for shop test suites",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that an actual JSON document is equivalent to an expected one
    Compare(CompareArgs),
    /// Solve an arithmetic CAPTCHA question
    Captcha(CaptchaArgs),
    /// Record or look up analysed test failures
    Recall(RecallArgs),
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// JSON file with the actual value
    pub actual: PathBuf,
    /// JSON file with the expected value
    pub expected: PathBuf,
    /// TOML comparison profile
    #[arg(long)]
    pub profile: Option<PathBuf>,
    /// Index-erased path to skip (repeatable), e.g. `data[].updatedAt`
    #[arg(long = "exclude")]
    pub exclude: Vec<String>,
    #[arg(long)]
    pub ignore_array_order: bool,
}

#[derive(Args, Debug)]
pub struct CaptchaArgs {
    /// Question text, e.g. "What is 3+4-10 ?"
    pub text: String,
    /// Treat the text as a bare expression instead of a question
    #[arg(long)]
    pub expression: bool,
}

#[derive(Args, Debug)]
pub struct RecallArgs {
    /// JSON file backing the failure store
    #[arg(long)]
    pub store: PathBuf,
    #[command(subcommand)]
    pub action: RecallAction,
}

#[derive(Subcommand, Debug)]
pub enum RecallAction {
    /// Record a failure and its analysis
    Add {
        #[arg(long)]
        error: String,
        #[arg(long)]
        analysis: String,
        /// JSON file holding the error's embedding as an array of numbers
        #[arg(long)]
        embedding: PathBuf,
    },
    /// List stored failures similar to a query embedding
    Find {
        /// JSON file holding the query embedding
        #[arg(long)]
        embedding: PathBuf,
        #[arg(long)]
        threshold: Option<f32>,
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_compare() {
        let cli = Cli::try_parse_from([
            "assay", "compare", "a.json", "e.json", "--exclude", "id", "--exclude", "data[].at",
            "--ignore-array-order",
        ])
        .unwrap();
        match cli.command {
            Command::Compare(args) => {
                assert_eq!(args.actual, PathBuf::from("a.json"));
                assert_eq!(args.exclude, vec!["id", "data[].at"]);
                assert!(args.ignore_array_order);
                assert!(args.profile.is_none());
            }
            other => panic!("expected compare, got {other:?}"),
        }
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["assay", "captcha", "1+1", "--format", "json", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn parse_recall_find() {
        let cli = Cli::try_parse_from([
            "assay", "recall", "--store", "db.json", "find", "--embedding", "q.json", "--limit", "5",
        ])
        .unwrap();
        match cli.command {
            Command::Recall(RecallArgs {
                action: RecallAction::Find { limit, threshold, .. },
                ..
            }) => {
                assert_eq!(limit, Some(5));
                assert!(threshold.is_none());
            }
            other => panic!("expected recall find, got {other:?}"),
        }
    }

    #[test]
    fn compare_requires_both_files() {
        assert!(Cli::try_parse_from(["assay", "compare", "a.json"]).is_err());
    }
}
