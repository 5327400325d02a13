use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::{
    io::{self, BufRead},
    path::PathBuf,
    process::ExitCode,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use xlverdict::{
    analyze::{self, Analysis, Mode},
    cli::Cli,
    error::AnalyzerError,
    ingest,
    prompt::{ChoiceProvider, ConsoleChoices},
    report,
    rules::RuleSet,
};

fn main() -> ExitCode {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    let args = Cli::parse();
    let pause = !args.no_pause && console::user_attended();

    println!("{}", "=".repeat(50));
    println!("    xlverdict - comparison field analyzer");
    println!("{}", "=".repeat(50));

    let code = match run(&args, &mut ConsoleChoices) {
        Ok(()) => {
            println!("\n{}", "analysis complete".green().bold());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("\n{} {:?}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    };

    // keep the window open for double-click launches
    if pause {
        pause_for_exit();
    }
    code
}

fn run(args: &Cli, choices: &mut dyn ChoiceProvider) -> Result<()> {
    // ─── 2) pick the input workbook ──────────────────────────────────
    let input = select_input(args, choices)?;
    println!("analyzing {}", input.display().to_string().cyan());

    // ─── 3) mode and rules ───────────────────────────────────────────
    let mode = match args.mode {
        Some(arg) => arg.into(),
        None => {
            if choices.pick_detailed()? {
                Mode::Detailed
            } else {
                Mode::Basic
            }
        }
    };
    let rules = RuleSet::discover(&args.dir, args.rules.as_deref())?;

    // ─── 4) load and analyze ─────────────────────────────────────────
    let table = ingest::load_table(&input)?;
    println!(
        "loaded {} rows x {} columns",
        table.row_count(),
        table.column_count()
    );
    let analysis = analyze::analyze(&table, &rules, mode)?;

    // ─── 5) console summary ──────────────────────────────────────────
    print_summary(&analysis);

    // ─── 6) write the report ─────────────────────────────────────────
    let path = report::write_report(&input, &table, &analysis, args.format.into())?;
    println!("\nreport saved to {}", path.display().to_string().cyan());
    Ok(())
}

fn select_input(args: &Cli, choices: &mut dyn ChoiceProvider) -> Result<PathBuf> {
    if let Some(file) = &args.file {
        if !file.is_file() {
            return Err(AnalyzerError::InputFileMissing {
                path: file.display().to_string(),
            }
            .into());
        }
        return Ok(file.clone());
    }

    let files = ingest::discover_excel_files(&args.dir)?;
    if files.is_empty() {
        return Err(AnalyzerError::NoExcelFiles {
            dir: args.dir.display().to_string(),
        }
        .into());
    }
    let names: Vec<String> = files
        .iter()
        .map(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string())
        })
        .collect();
    let picked = choices.pick_file(&names)?;
    Ok(files[picked].clone())
}

fn print_summary(analysis: &Analysis) {
    println!("\n{} comparison columns:", analysis.columns.len());
    for column in &analysis.columns {
        let line = format!(
            "  {:<30} fail {}/{} ({:.2}%)  pass {:.2}%",
            column.name,
            column.fail_count,
            column.non_empty_count,
            column.fail_rate,
            column.pass_rate
        );
        if column.fail_count > 0 {
            println!("{}", line.red());
        } else {
            println!("{}", line.green());
        }
    }
    println!(
        "\noverall: {}/{} failed ({:.2}%)",
        analysis.overall.fail_count, analysis.overall.total_count, analysis.overall.fail_rate
    );
    if let Some(ledger) = &analysis.ledger {
        println!("failing rows explained: {}", ledger.len());
    }
}

fn pause_for_exit() {
    println!("\nPress Enter to exit...");
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}
