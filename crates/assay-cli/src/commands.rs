use std::path::Path;

use anyhow::{bail, Context};
use assay_compare::{CompareProfile, CompareResult, Comparison};
use assay_recall::{FailureStore, RecallConfig};
use colored::Colorize;
use serde_json::{json, Value};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Compare(args) => cmd_compare(args, cli.format),
        Command::Captcha(args) => cmd_captcha(args, cli.format),
        Command::Recall(args) => cmd_recall(args, cli.format),
    }
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn read_embedding(path: &Path) -> anyhow::Result<Vec<f32>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} must hold an array of numbers", path.display()))
}

fn build_comparison(args: &CompareArgs) -> anyhow::Result<Comparison> {
    let profile = match &args.profile {
        Some(path) => CompareProfile::load(path)
            .with_context(|| format!("loading profile {}", path.display()))?,
        None => CompareProfile::default(),
    };
    let ignore = profile.ignore_array_order || args.ignore_array_order;
    let comparison = args
        .exclude
        .iter()
        .fold(profile.into_comparison(), |c, path| c.exclude(path.clone()))
        .ignore_array_order(ignore);
    Ok(comparison)
}

fn compare_files(args: &CompareArgs) -> anyhow::Result<CompareResult> {
    let comparison = build_comparison(args)?;
    let actual = read_json(&args.actual)?;
    let expected = read_json(&args.expected)?;
    Ok(comparison.compute(&actual, &expected))
}

fn cmd_compare(args: CompareArgs, format: OutputFormat) -> anyhow::Result<()> {
    let result = compare_files(&args)?;
    match format {
        OutputFormat::Json => {
            let report = json!({ "equal": result.equal(), "diffs": result.diffs() });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text if result.equal() => {
            println!("{} {} is equivalent to {}", "✓".green().bold(),
                args.actual.display().to_string().bold(), args.expected.display());
        }
        OutputFormat::Text => {
            println!("{} Expected objects to be equivalent:", "✗".red().bold());
            for diff in result.diffs() {
                println!("  {}", diff.yellow());
            }
        }
    }
    if !result.equal() {
        bail!("{} mismatch(es) found", result.len());
    }
    Ok(())
}

fn cmd_captcha(args: CaptchaArgs, format: OutputFormat) -> anyhow::Result<()> {
    let answer = if args.expression {
        assay_captcha::evaluate(&args.text)?
    } else {
        assay_captcha::solve_question(&args.text)?
    };
    match format {
        OutputFormat::Json => println!("{}", json!({ "answer": answer })),
        OutputFormat::Text => println!("{}", answer.to_string().bold()),
    }
    Ok(())
}

fn cmd_recall(args: RecallArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut store = FailureStore::open(RecallConfig::at(&args.store))
        .with_context(|| format!("opening {}", args.store.display()))?;
    match args.action {
        RecallAction::Add { error, analysis, embedding } => {
            let embedding = read_embedding(&embedding)?;
            let id = store.add_failure(&error, &analysis, embedding)?;
            store.save()?;
            match format {
                OutputFormat::Json => println!("{}", json!({ "id": id.to_string() })),
                OutputFormat::Text => println!("{} Recorded failure {}", "✓".green(), id.to_string().cyan()),
            }
        }
        RecallAction::Find { embedding, threshold, limit } => {
            let query = read_embedding(&embedding)?;
            let config = store.config();
            let matches = store.find_similar(
                &query,
                threshold.unwrap_or(config.threshold),
                limit.unwrap_or(config.limit),
            );
            match format {
                OutputFormat::Json => {
                    let report: Vec<Value> = matches
                        .iter()
                        .map(|m| json!({
                            "id": m.record.id.to_string(),
                            "similarity": m.similarity,
                            "error": m.record.error,
                            "analysis": m.record.analysis,
                        }))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                OutputFormat::Text if matches.is_empty() => println!("No similar failures."),
                OutputFormat::Text => {
                    for m in &matches {
                        println!("{}  {}", format!("{:.3}", m.similarity).yellow().bold(), m.record.error);
                        println!("  {}", m.record.analysis.dimmed());
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    fn args(actual: PathBuf, expected: PathBuf) -> CompareArgs {
        CompareArgs {
            actual,
            expected,
            profile: None,
            exclude: Vec::new(),
            ignore_array_order: false,
        }
    }

    #[test]
    fn compare_reports_diffs() {
        let dir = tempfile::tempdir().unwrap();
        let actual = write(dir.path(), "a.json", r#"{"id": 1, "tags": ["a", "b"]}"#);
        let expected = write(dir.path(), "e.json", r#"{"id": 2, "tags": ["b", "a"]}"#);

        let result = compare_files(&args(actual.clone(), expected.clone())).unwrap();
        assert_eq!(result.len(), 3);

        let mut relaxed = args(actual, expected);
        relaxed.exclude = vec!["id".into()];
        relaxed.ignore_array_order = true;
        assert!(compare_files(&relaxed).unwrap().equal());
    }

    #[test]
    fn compare_with_profile() {
        let dir = tempfile::tempdir().unwrap();
        let actual = write(dir.path(), "a.json", r#"{"createdAt": "2024-10-01T12:00:00Z"}"#);
        let expected = write(dir.path(), "e.json", r#"{"createdAt": "2024-10-01T12:00:30Z"}"#);
        let profile = write(
            dir.path(),
            "p.toml",
            "[[comparators]]\nkind = \"datetime\"\npath = \"createdAt\"\n",
        );

        let mut with_profile = args(actual, expected);
        assert!(!compare_files(&with_profile).unwrap().equal());
        with_profile.profile = Some(profile);
        assert!(compare_files(&with_profile).unwrap().equal());
    }

    #[test]
    fn compare_command_fails_on_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let actual = write(dir.path(), "a.json", "[1]");
        let expected = write(dir.path(), "e.json", "[2]");
        assert!(cmd_compare(args(actual, expected), OutputFormat::Json).is_err());
    }

    #[test]
    fn compare_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let actual = write(dir.path(), "a.json", "{");
        let expected = write(dir.path(), "e.json", "{}");
        let err = compare_files(&args(actual, expected)).unwrap_err();
        assert!(err.to_string().starts_with("parsing"));
    }

    #[test]
    fn captcha_command() {
        let question = CaptchaArgs { text: "What is 3+4-10 ?".into(), expression: false };
        assert!(cmd_captcha(question, OutputFormat::Text).is_ok());
        let bad = CaptchaArgs { text: "What is it?".into(), expression: false };
        assert!(cmd_captcha(bad, OutputFormat::Text).is_err());
    }

    #[test]
    fn recall_add_then_find() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("failures.json");
        let embedding = write(dir.path(), "emb.json", "[1.0, 0.0]");

        cmd_recall(
            RecallArgs {
                store: store.clone(),
                action: RecallAction::Add {
                    error: "Timeout 30000ms exceeded".into(),
                    analysis: "basket page slow".into(),
                    embedding: embedding.clone(),
                },
            },
            OutputFormat::Text,
        )
        .unwrap();

        let reopened = FailureStore::open(RecallConfig::at(&store)).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.find_similar_default(&[1.0, 0.0]).len(), 1);

        cmd_recall(
            RecallArgs {
                store,
                action: RecallAction::Find { embedding, threshold: None, limit: None },
            },
            OutputFormat::Json,
        )
        .unwrap();
    }
}
