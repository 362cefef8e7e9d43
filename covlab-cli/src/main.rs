//! covlab CLI: fetch, plot and run commands.
//!
//! Commands:
//! - `fetch` - acquire one dataset kind from its start date to today and persist it
//! - `plot` - build charts from previously persisted CSV files
//! - `run` - acquire both kinds, persist them and write the HTML charts

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use covlab_core::chart::{build_grouped_chart, build_overview_chart, build_simple_chart};
use covlab_core::chart::{ChartRenderer, ChartSpec, HtmlRenderer};
use covlab_core::config::AppConfig;
use covlab_core::data::{
    acquire, persist, read_csv, Dataset, DatasetKind, HttpFetcher, LocalMirrorFetcher,
    PartitionFetcher, PersistFormat,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const NATIONAL_PLOT: &str = "National_plot.html";
const NATIONAL_SIMPLE_PLOT: &str = "National_simple_plot.html";
const REGIONS_PLOT: &str = "regions_plot.html";

#[derive(Parser)]
#[command(
    name = "covlab",
    about = "covlab CLI: daily epidemiological reports to interactive charts"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory for datasets and charts. Overrides the config file.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Acquire one dataset kind and persist it.
    Fetch {
        #[arg(long, value_enum)]
        kind: KindArg,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Read partitions from a local mirror directory instead of the network.
        #[arg(long)]
        offline: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
        format: FormatArg,
    },
    /// Build charts from persisted CSV files.
    Plot {
        /// National dataset CSV.
        #[arg(long)]
        national: Option<PathBuf>,

        /// Regional dataset CSV.
        #[arg(long)]
        regional: Option<PathBuf>,
    },
    /// Acquire both kinds, persist them and write the charts.
    Run {
        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Read partitions from a local mirror directory instead of the network.
        #[arg(long)]
        offline: Option<PathBuf>,

        /// Also write the simple national chart.
        #[arg(long, default_value_t = false)]
        simple: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    National,
    Regional,
}

impl From<KindArg> for DatasetKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::National => DatasetKind::National,
            KindArg::Regional => DatasetKind::Regional,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Parquet,
}

impl From<FormatArg> for PersistFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => PersistFormat::Csv,
            FormatArg::Parquet => PersistFormat::Parquet,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .compact()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    match cli.command {
        Commands::Fetch {
            kind,
            end,
            offline,
            format,
        } => run_fetch(&config, kind.into(), end, offline, format.into()),
        Commands::Plot { national, regional } => run_plot(&config, national, regional),
        Commands::Run {
            end,
            offline,
            simple,
        } => run_all(&config, end, offline, simple),
    }
}

fn parse_end(end: Option<String>) -> Result<NaiveDate> {
    let end_date = end
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("parsing --end (expected YYYY-MM-DD)")?
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    Ok(end_date)
}

fn make_fetcher(offline: Option<PathBuf>) -> Result<Box<dyn PartitionFetcher>> {
    match offline {
        Some(root) => Ok(Box::new(LocalMirrorFetcher::new(root))),
        None => Ok(Box::new(HttpFetcher::new().context("building HTTP client")?)),
    }
}

fn acquire_kind(
    config: &AppConfig,
    fetcher: &dyn PartitionFetcher,
    kind: DatasetKind,
    end: NaiveDate,
) -> Result<Dataset> {
    let range = config.date_range(end)?;
    let pattern = config.source_pattern(kind);
    let dataset = acquire(fetcher, &pattern, &range, &config.acquire_options())
        .with_context(|| format!("acquiring {kind} dataset"))?;
    Ok(dataset)
}

fn persist_kind(
    config: &AppConfig,
    dataset: &Dataset,
    kind: DatasetKind,
    format: PersistFormat,
) -> Result<PathBuf> {
    let path = persist(
        dataset,
        &config.output_dir,
        kind.file_stem(),
        format,
        &config.date_format,
    )
    .with_context(|| format!("persisting {kind} dataset"))?;
    Ok(path)
}

fn run_fetch(
    config: &AppConfig,
    kind: DatasetKind,
    end: Option<String>,
    offline: Option<PathBuf>,
    format: PersistFormat,
) -> Result<()> {
    let end_date = parse_end(end)?;
    let fetcher = make_fetcher(offline)?;

    let dataset = acquire_kind(config, fetcher.as_ref(), kind, end_date)?;
    let path = persist_kind(config, &dataset, kind, format)?;

    print_summary(kind, &dataset);
    println!("Saved to: {}", path.display());
    Ok(())
}

fn run_plot(
    config: &AppConfig,
    national: Option<PathBuf>,
    regional: Option<PathBuf>,
) -> Result<()> {
    let national = national.unwrap_or_else(|| default_csv(config, DatasetKind::National));
    let regional = regional.unwrap_or_else(|| default_csv(config, DatasetKind::Regional));
    let opts = config.acquire_options();

    let national_ds = read_csv(&national, &opts)
        .with_context(|| format!("reading {}", national.display()))?;
    let regional_ds = read_csv(&regional, &opts)
        .with_context(|| format!("reading {}", regional.display()))?;

    write_charts(config, &national_ds, &regional_ds, false)
}

fn run_all(
    config: &AppConfig,
    end: Option<String>,
    offline: Option<PathBuf>,
    simple: bool,
) -> Result<()> {
    let end_date = parse_end(end)?;
    let fetcher = make_fetcher(offline)?;

    let national = acquire_kind(config, fetcher.as_ref(), DatasetKind::National, end_date)?;
    persist_kind(config, &national, DatasetKind::National, PersistFormat::Csv)?;
    print_summary(DatasetKind::National, &national);

    let regional = acquire_kind(config, fetcher.as_ref(), DatasetKind::Regional, end_date)?;
    persist_kind(config, &regional, DatasetKind::Regional, PersistFormat::Csv)?;
    print_summary(DatasetKind::Regional, &regional);

    write_charts(config, &national, &regional, simple)
}

fn write_charts(
    config: &AppConfig,
    national: &Dataset,
    regional: &Dataset,
    simple: bool,
) -> Result<()> {
    let x = config.date_column.as_str();

    let overview = build_overview_chart(national, x).context("building national chart")?;
    render(&overview, &config.output_dir.join(NATIONAL_PLOT))?;

    if simple {
        let chart = build_simple_chart(national, x).context("building simple national chart")?;
        render(&chart, &config.output_dir.join(NATIONAL_SIMPLE_PLOT))?;
    }

    let regions = build_grouped_chart(regional, &config.group_by, &config.regional_y, x)
        .context("building regional chart")?;
    render(&regions, &config.output_dir.join(REGIONS_PLOT))?;

    Ok(())
}

fn render(chart: &ChartSpec, path: &Path) -> Result<()> {
    let written = HtmlRenderer
        .render(chart, path)
        .with_context(|| format!("rendering {}", path.display()))?;
    println!("Chart written to: {}", written.display());
    Ok(())
}

fn default_csv(config: &AppConfig, kind: DatasetKind) -> PathBuf {
    config
        .output_dir
        .join(format!("{}.{}", kind.file_stem(), PersistFormat::Csv.extension()))
}

fn print_summary(kind: DatasetKind, dataset: &Dataset) {
    println!();
    println!("=== {kind} ===");
    println!("Rows:          {}", dataset.height());
    println!("Columns:       {}", dataset.frame().width());
    let missing = dataset.missing_dates();
    if missing.is_empty() {
        println!("Missing days:  none");
    } else {
        let days: Vec<String> = missing.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect();
        println!("Missing days:  {} ({})", missing.len(), days.join(", "));
    }
    if !dataset.is_date_typed() {
        println!("Warning: date column '{}' was not coerced", dataset.date_column());
    }
}
