use clap::{Parser, Subcommand};
use op_preload::{CompilerContext, ConfigSource, DryRunCompiler, OperationRegistry, PreloadReport};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

type Result<T> = op_preload::Result<T>;

#[derive(Parser)]
#[command(name = "op-preload")]
#[command(about = "Validate and dry-run operator preload configs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every preload entry without compiling.
    Check {
        #[arg(long, env = "OP_PRELOAD_CONFIG")]
        config: PathBuf,
    },
    /// Run the preload against the in-memory compiler.
    Run {
        #[arg(long, env = "OP_PRELOAD_CONFIG")]
        config: PathBuf,

        /// Write the JSON report here.
        #[arg(short = 'o', long)]
        report: Option<PathBuf>,

        /// Compiler family id to treat as unsupported (repeatable).
        #[arg(long)]
        reject: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Check { config } => {
            let registry = OperationRegistry::new(ConfigSource::Path(config))?;
            let report = registry.check();
            print_summary(&report);
            if !report.all_ok() {
                std::process::exit(1);
            }
        }
        Commands::Run {
            config,
            report: out,
            reject,
        } => {
            let mut registry = OperationRegistry::new(ConfigSource::Path(config))?;
            let mut compiler = reject
                .into_iter()
                .fold(DryRunCompiler::new(), |compiler, id| compiler.reject(id));
            let report = registry.preload(&mut compiler, &mut CompilerContext::new());
            print_summary(&report);

            if let Some(out) = out {
                std::fs::write(&out, serde_json::to_string_pretty(&report)?)?;
                println!("Wrote {}", out.display());
            }
        }
    }

    Ok(())
}

fn print_summary(report: &PreloadReport) {
    let t = &report.totals;
    println!(
        "{} operations, {} entries: {} ok, {} skipped, {} compiler calls",
        t.operations, t.entries, t.succeeded, t.skipped, t.compile_calls
    );
    for name in &report.unknown_operations {
        println!("  unknown operation {name}");
    }
    for record in report.records.iter().filter(|r| !r.outcome.is_ok()) {
        if let op_preload::EntryOutcome::Skipped { stage, reason, .. } = &record.outcome {
            println!("  {}[{}] {}: {}", record.operation, record.index, stage, reason);
        }
    }
}
