use anyhow::bail;
use clap::{Parser, Subcommand, ValueEnum};
use pipeline_dag::editor::{LayoutConfig, PipelineEditor};
use pipeline_dag::graph::Snapshot;
use pipeline_dag::history::EditHistory;
use pipeline_dag::{Result, render, script, validate};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pipeline-dag")]
#[command(about = "Pipeline DAG validator and headless editor", long_about = None)]
struct Cli {
    /// Debug logging on stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a graph snapshot file.
    Validate {
        #[arg(long)]
        graph: String,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Exit with failure when the graph is not a valid DAG.
        #[arg(long)]
        strict: bool,
    },

    /// Replay an edit script, reporting the verdict after every step.
    Replay {
        #[arg(long)]
        script: String,

        /// Starting graph. Empty when omitted.
        #[arg(long)]
        graph: Option<String>,

        /// Write the final graph here as JSON.
        #[arg(short = 'o', long)]
        out: Option<String>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Keep at most this many undo steps.
        #[arg(long)]
        history_limit: Option<usize>,
    },
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Commands::Validate {
            graph,
            format,
            strict,
        } => {
            let snapshot = Snapshot::load(&graph)?;
            let result = validate(&snapshot.nodes, &snapshot.edges);

            match format {
                Format::Text => print!("{}", render::render_text_result(&result)),
                Format::Json => println!("{}", render::render_json_result(&result)?),
            }

            if strict && !render::is_valid_status(&result.message) {
                bail!("{}: {}", graph, result.message);
            }
        }

        Commands::Replay {
            script,
            graph,
            out,
            format,
            history_limit,
        } => {
            // 1) Parse the script up front so a typo fails before anything runs.
            let steps = script::parse_script_file(&script)?;

            // 2) Starting state.
            let history = match history_limit {
                Some(limit) => EditHistory::with_capacity_limit(limit),
                None => EditHistory::new(),
            };
            let mut editor = PipelineEditor::with_history(history);
            if let Some(path) = &graph {
                editor.restore(Snapshot::load(path)?);
            }

            // 3) Replay.
            let outcomes = script::replay(&mut editor, &steps, &LayoutConfig::default());
            let final_result = editor.validation();

            // 4) Report.
            match format {
                Format::Text => {
                    for step in &outcomes {
                        print!("{}", render::render_step(step));
                    }
                    print!("final: {}", render::render_text_result(&final_result));
                }
                Format::Json => println!(
                    "{}",
                    render::render_json_report(&outcomes, &final_result, editor.snapshot())?
                ),
            }

            if let Some(out) = out {
                let graph = editor.into_snapshot();
                std::fs::write(&out, graph.to_json_pretty()?)?;
                eprintln!("Wrote {}", out);
            }
        }
    }

    Ok(())
}
