mod api;
mod server;

use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use umafan::config::DashboardConfig;
use umafan::loader::load_corpus;
use umafan::{format_number, format_signed, Corpus, UmaOverview};

#[derive(Parser)]
#[command(name = "umafan", about = "Circle fan-growth dashboard backend")]
struct Cli {
    /// Path to the TOML config (defaults to config/dashboard.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the YYYYMMDD.json snapshots
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List circles and snapshot dates
    Options(OptionsArgs),
    /// Fan growth for one circle over a date range
    Overview(OverviewArgs),
    /// Serve the JSON API and the dashboard assets
    Serve(ServeArgs),
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write the default config file
    Init {
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct OptionsArgs {
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct OverviewArgs {
    #[arg(long)]
    circle: u64,
    #[arg(long, default_value = "")]
    start: String,
    #[arg(long, default_value = "")]
    end: String,
    #[arg(long, default_value_t = 20)]
    limit: usize,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone, Default)]
struct ServeArgs {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    web_root: Option<String>,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (mut config, config_path) = DashboardConfig::load(cli.config)?;
    if let Some(dir) = cli.data_dir {
        config.data.dir = dir;
    }

    let command = cli
        .command
        .unwrap_or(Command::Options(OptionsArgs::default()));

    if let Command::Config(ConfigCommand::Init { force }) = command {
        let path = config_path.ok_or_else(|| "no config path resolved".to_string())?;
        return init_config(&path, force);
    }

    let corpus = load_corpus(&config.data.dir, &config.data.directory_label, config.data.strict)
        .await
        .map_err(|err| err.to_string())?;

    match command {
        Command::Options(args) => run_options(&corpus, args),
        Command::Overview(args) => run_overview(&corpus, args),
        Command::Serve(args) => {
            let mut settings = config.server;
            if let Some(host) = args.host {
                settings.host = host;
            }
            if let Some(port) = args.port {
                settings.port = port;
            }
            if let Some(web_root) = args.web_root {
                settings.web_root = web_root;
            }
            server::serve(corpus, settings).await
        }
        Command::Config(_) => Ok(()),
    }
}

fn run_options(corpus: &Corpus, args: OptionsArgs) -> Result<(), String> {
    let options = corpus.options();
    if args.json {
        return print_json(&options);
    }

    println!("Directory: {}", options.directory);
    println!("Circles ({}):", options.circles.len());
    for circle in &options.circles {
        println!("  {:>10}  {}", circle.id, circle.name);
    }
    match (options.dates.first(), options.dates.last()) {
        (Some(first), Some(last)) => {
            println!("Dates: {} snapshots, {} .. {}", options.dates.len(), first, last)
        }
        _ => println!("Dates: none"),
    }
    Ok(())
}

fn run_overview(corpus: &Corpus, args: OverviewArgs) -> Result<(), String> {
    let overview = corpus
        .overview(args.circle, &args.start, &args.end)
        .map_err(|err| err.to_string())?;
    if args.json {
        return print_json(&overview);
    }
    print_overview(&overview, args.limit);
    Ok(())
}

fn print_overview(overview: &UmaOverview, limit: usize) {
    println!("Circle: {} ({})", overview.circle.name, overview.circle.id);
    println!("Range: {} .. {}", overview.range.start, overview.range.end);
    println!(
        "Total growth: {} | Today: {}",
        format_number(overview.metrics.fans_total_growth),
        format_signed(overview.metrics.today_new_fans)
    );
    println!(
        "Activity: {} ({})",
        overview.metrics.activity_status, overview.metrics.activity_note
    );

    println!("\nDaily totals:");
    for ((date, total), delta) in overview
        .chart
        .dates
        .iter()
        .zip(&overview.chart.total_fans)
        .zip(&overview.chart.daily_new_fans)
    {
        println!("  {}  {:>15}  {:>12}", date, format_number(*total), format_signed(*delta));
    }

    println!("\nTop players:");
    for (rank, row) in overview.table.iter().take(limit).enumerate() {
        println!(
            "  {:>3}. {} ({}) {} -> {} ({}) {}",
            rank + 1,
            row.name,
            row.player_id,
            format_number(row.start_fans),
            format_number(row.end_fans),
            format_signed(i64::try_from(row.increase).unwrap_or(i64::MAX)),
            row.comment
        );
    }
    if overview.table.len() > limit {
        println!("  ... {} more", overview.table.len() - limit);
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| format!("failed to serialize output: {}", err))?;
    println!("{}", payload);
    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<(), String> {
    if path.exists() && !force {
        return Err(format!(
            "config already exists at {} (pass --force to overwrite)",
            path.display()
        ));
    }
    DashboardConfig::default().write(path)?;
    println!("Config written to {}.", path.display());
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
