use anyhow::Context;
use clap::Parser;
use field_filter::{Config, FieldFilter, Selection};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "field-filter",
    version,
    author,
    about = "Filter fields of a JSON document by include/exclude dot paths",
    long_about = "Filter fields of a JSON document by include/exclude dot paths.\n\n\
    Paths are comma-separated and dot-delimited (e.g. `account.address.city`). \
    Including a nested path keeps its ancestors; excluding a path removes its \
    whole subtree and always wins over an include at the same or a deeper path.\n\n\
    USAGE EXAMPLES:\n  \
      # Keep only the account number\n  \
      field-filter --input account.json --include accountNumber\n\n  \
      # Drop metadata, read from stdin\n  \
      cat account.json | field-filter --exclude meta\n\n  \
      # Use a request query string\n  \
      field-filter -i account.json --query 'includeOnly=transactions.amount'"
)]
struct Cli {
    /// JSON file to filter (reads stdin when omitted)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Comma-separated paths to include
    #[arg(long, value_name = "PATHS")]
    include: Option<String>,

    /// Comma-separated paths to exclude
    #[arg(long, value_name = "PATHS")]
    exclude: Option<String>,

    /// URL query string carrying includeOnly / excludeOnly
    #[arg(long, value_name = "QUERY")]
    query: Option<String>,

    /// Remove objects and arrays left empty after filtering
    #[arg(long)]
    prune: bool,

    /// Maximum nesting depth before failing
    #[arg(long, default_value_t = field_filter::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Reject requests that give both include and exclude paths
    #[arg(long)]
    strict: bool,

    /// Write compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Print a filtering summary to stderr
    #[arg(long)]
    stats: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose)?;

    let mut builder = Config::builder()
        .prune_empty(cli.prune)
        .max_depth(cli.max_depth)
        .reject_conflicting(cli.strict);

    if let Some(query) = cli.query.as_deref() {
        builder = builder.selection(Selection::from_query(query));
    }
    if let Some(include) = cli.include {
        builder = builder.include_only(include);
    }
    if let Some(exclude) = cli.exclude {
        builder = builder.exclude_only(exclude);
    }

    let config = builder.build().context("Failed to build configuration")?;
    let filter = FieldFilter::new(config).context("Failed to create filter")?;

    let input = read_input(cli.input.as_ref())?;
    let root: serde_json::Value =
        serde_json::from_str(&input).context("Input is not valid JSON")?;

    let filtered = filter.apply(&root).context("Filtering failed")?;

    let mut stdout = io::stdout().lock();
    if cli.compact {
        serde_json::to_writer(&mut stdout, &filtered.value)
    } else {
        serde_json::to_writer_pretty(&mut stdout, &filtered.value)
    }
    .context("Failed to write output")?;
    writeln!(stdout).context("Failed to write output")?;

    if cli.stats {
        filtered.report.print_summary();
    }

    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn setup_tracing(verbosity: u8) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::new("field_filter=warn"),
        1 => EnvFilter::new("field_filter=info"),
        2 => EnvFilter::new("field_filter=debug"),
        _ => EnvFilter::new("field_filter=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .init();

    Ok(())
}
