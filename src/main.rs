use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use idiom_quiz::output::render_summary;
use idiom_quiz::telemetry::init_tracing;
use idiom_quiz::{CliOverrides, QuestionMode, QuestionOrder, QuizConfig, QuizResult, RunReport, Strategy};

/// Generate a multiple-choice quiz JSON file from an idiom or vocabulary table
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Source table (.csv, .xlsx, .xls)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Quiz JSON destination
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Used-set snapshot; enables no-repeat mode
    #[arg(long = "used-set")]
    used_set: Option<PathBuf>,

    /// random_uniform | keyword_similar | lexical_typo
    #[arg(short, long)]
    strategy: Option<Strategy>,

    /// ask_meaning | ask_prompt
    #[arg(short, long)]
    mode: Option<QuestionMode>,

    /// Fail when an item cannot get three distractors
    #[arg(long)]
    strict: bool,

    /// With --strict, skip such items instead of failing
    #[arg(long = "skip-insufficient")]
    skip_insufficient: bool,

    /// Maximum number of questions to emit
    #[arg(long = "max")]
    max_questions: Option<usize>,

    /// table | random
    #[arg(long)]
    order: Option<QuestionOrder>,

    /// Year used for rows without one
    #[arg(long = "default-year")]
    default_year: Option<String>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            input: self.input.clone(),
            output: self.output.clone(),
            used_set: self.used_set.clone(),
            strategy: self.strategy,
            mode: self.mode,
            strict: self.strict,
            skip_insufficient: self.skip_insufficient,
            max_questions: self.max_questions,
            order: self.order,
            default_year: self.default_year.clone(),
            seed: self.seed,
        }
    }
}

fn execute(args: &Args) -> QuizResult<RunReport> {
    let mut config = QuizConfig::load(args.config.as_deref())?;
    config.apply_cli_overrides(&args.overrides());
    tracing::debug!(?config, "resolved configuration");
    idiom_quiz::run(&config)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match execute(&args) {
        Ok(report) => {
            if report.used_set_reset {
                println!("🔄 All items had been used; the used-set was reset.");
            }
            print!(
                "{}",
                render_summary(&report.output, &report.document.questions, report.skipped.len())
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
