//! sms-bayes CLI: train, tune and evaluate the SMS spam classifier.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use sms_bayes::classify::classify_detailed;
use sms_bayes::config::RunConfig;
use sms_bayes::dataset::ClassDistribution;
use sms_bayes::evaluate::{self, ConfusionCounts, SweepEntry};
use sms_bayes::message::Label;
use sms_bayes::pipeline::{self, Distributions, RunReport};

#[derive(Parser)]
#[command(name = "sms-bayes", version, about = "Naive Bayes SMS spam classifier")]
struct Cli {
    /// TOML config file (defaults apply for anything it omits).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset file, overriding `dataset.path`.
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Split seed, overriding `split.seed`.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split, train, sweep alpha on validation and evaluate on test.
    Run {
        /// Smoothing constant for the test evaluation.
        #[arg(long)]
        alpha: Option<f64>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Evaluate validation accuracy for a list of alpha values.
    Sweep {
        /// Comma-separated candidates, e.g. "0.1,0.5,1".
        #[arg(long, value_delimiter = ',')]
        alphas: Option<Vec<f64>>,

        /// Print the sweep as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Train on the training split and classify one message.
    Classify {
        /// Message text.
        #[arg(long)]
        text: String,

        /// Smoothing constant.
        #[arg(long)]
        alpha: Option<f64>,
    },

    /// Show dataset, split and model statistics.
    Info,

    /// Write the default configuration as TOML.
    InitConfig {
        /// Output path.
        #[arg(long, default_value = "sms-bayes.toml")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(path) = cli.dataset {
        config.dataset.path = path;
    }
    if let Some(seed) = cli.seed {
        config.split.seed = seed;
    }

    match cli.command {
        Commands::Run { alpha, json } => {
            if let Some(alpha) = alpha {
                config.classifier.alpha = alpha;
            }
            let report = pipeline::run(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
            } else {
                print_report(&report, config.classifier.review_margin);
            }
        }

        Commands::Sweep { alphas, json } => {
            if let Some(alphas) = alphas {
                config.classifier.alphas = alphas;
            }
            let prepared = pipeline::prepare(&config)?;
            let entries = evaluate::sweep(
                &prepared.model,
                &config.classifier.alphas,
                &prepared.split.validation,
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries).into_diagnostic()?);
            } else {
                print_sweep(&entries);
            }
        }

        Commands::Classify { text, alpha } => {
            let alpha = alpha.unwrap_or(config.classifier.alpha);
            let prepared = pipeline::prepare(&config)?;
            let result = classify_detailed(&text, alpha, &prepared.model)?;

            println!("Label: {}", result.label);
            println!("  log P(spam|message) ∝ {:.4}", result.log_spam);
            println!("  log P(ham|message)  ∝ {:.4}", result.log_ham);
            println!("  P(spam|message):      {:.4}", result.spam_probability());
            println!(
                "  tokens:               {} known, {} unknown",
                result.known_tokens, result.unknown_tokens
            );
            let margin = config.classifier.review_margin;
            if margin > 0.0 && result.needs_review(margin) {
                println!("  near-tie (|log odds| < {margin}): send to manual review");
            }
        }

        Commands::Info => {
            let prepared = pipeline::prepare(&config)?;
            print_distributions(&prepared.distributions());

            let params = prepared.model.params();
            println!("\nModel:");
            println!("  vocabulary:   {}", params.n_vocabulary);
            println!("  spam tokens:  {}", params.n_spam_tokens);
            println!("  ham tokens:   {}", params.n_ham_tokens);
            println!("  P(spam):      {:.4}", params.p_spam);
            println!("  P(ham):       {:.4}", params.p_ham);

            for label in Label::ALL {
                let top = prepared.model.counts().top_tokens(label, 10);
                let listing: Vec<String> =
                    top.iter().map(|(token, n)| format!("{token} ({n})")).collect();
                println!("  top {label}: {}", listing.join(", "));
            }
        }

        Commands::InitConfig { out } => {
            config.save(&out)?;
            println!("Wrote default config to {}", out.display());
        }
    }

    Ok(())
}

fn print_report(report: &RunReport, review_margin: f64) {
    print_distributions(&report.distributions);

    println!("\nValidation sweep:");
    print_sweep(&report.sweep);
    if let Some(best) = report.best_validation {
        println!(
            "  highest validation accuracy at alpha = {} ({:.2}%)",
            best.alpha,
            best.accuracy * 100.0
        );
    }

    let test = &report.test;
    println!("\nTest (alpha = {}):", test.alpha);
    println!("  accuracy: {:.2}%", test.accuracy * 100.0);
    print_confusion(&test.confusion);
    if review_margin > 0.0 {
        println!("  near-ties (|log odds| < {review_margin}): {}", test.needs_review);
    }
}

fn print_distributions(d: &Distributions) {
    let rows: [(&str, &ClassDistribution); 4] = [
        ("dataset", &d.dataset),
        ("train", &d.train),
        ("validation", &d.validation),
        ("test", &d.test),
    ];
    println!("Class distribution:");
    for (name, dist) in rows {
        println!("  {name:<10} {dist}");
    }
}

fn print_sweep(entries: &[SweepEntry]) {
    for entry in entries {
        println!("  alpha = {:<8} accuracy = {:.2}%", entry.alpha, entry.accuracy * 100.0);
    }
}

fn print_confusion(c: &ConfusionCounts) {
    println!("  confusion (rows = true, cols = predicted):");
    println!("               spam     ham");
    println!("    spam   {:>7} {:>7}", c.spam_as_spam, c.spam_as_ham);
    println!("    ham    {:>7} {:>7}", c.ham_as_spam, c.ham_as_ham);
    let fmt = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}%", v * 100.0));
    println!("  spam precision: {}  recall: {}", fmt(c.precision()), fmt(c.recall()));
}
