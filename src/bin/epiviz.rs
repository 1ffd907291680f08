use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use epiviz_rs::api::{self, Client, DataSource, MapMode};
use epiviz_rs::config::Config;
use epiviz_rs::heatmap::{Regions, tooltip_text};
use epiviz_rs::models::{Statistic, YScale};
use epiviz_rs::view::{self, ChartRequest, View, ViewState};
use epiviz_rs::viz::{self, LegendMode, RenderOptions};
use epiviz_rs::{stats, storage};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "epiviz",
    version,
    about = "Fetch, chart, map & export observed and predicted epidemic case counts"
)]
struct Cli {
    /// Config file (TOML). Defaults to <config dir>/epiviz/config.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the areas known to the API.
    Areas,
    /// List the available forecasting models.
    Models,
    /// Build the line chart for some areas (and optionally save, plot, and print stats).
    Chart(ChartArgs),
    /// Build the heat map layer from current or predicted totals.
    Map(MapArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StatArg {
    Cumulative,
    Delta,
}

impl From<StatArg> for Statistic {
    fn from(v: StatArg) -> Self {
        match v {
            StatArg::Cumulative => Statistic::Cumulative,
            StatArg::Delta => Statistic::Delta,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScaleArg {
    Linear,
    Log,
}

impl From<ScaleArg> for YScale {
    fn from(v: ScaleArg) -> Self {
        match v {
            ScaleArg::Linear => YScale::Linear,
            ScaleArg::Log => YScale::Log,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LegendArg {
    Inside,
    Right,
}

impl From<LegendArg> for LegendMode {
    fn from(v: LegendArg) -> Self {
        match v {
            LegendArg::Inside => LegendMode::Inside,
            LegendArg::Right => LegendMode::Right,
        }
    }
}

#[derive(Args, Debug)]
struct ChartArgs {
    /// Area names or codes separated by comma or semicolon (e.g., Italy,US)
    #[arg(short, long)]
    areas: String,
    /// Model names separated by comma or semicolon (e.g., SIR). Omit for observed data only.
    #[arg(short, long)]
    models: Option<String>,
    /// Prediction horizon in days.
    #[arg(short, long, default_value_t = 14)]
    days: u32,
    /// Only the distancing (true) or no-distancing (false) scenario; both when omitted.
    #[arg(long)]
    distancing: Option<bool>,
    /// Plot running totals or daily changes.
    #[arg(long, value_enum, default_value = "cumulative")]
    statistic: StatArg,
    /// Y axis scale.
    #[arg(long, value_enum, default_value = "linear")]
    scale: ScaleArg,
    /// Save series to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Create a chart at the given path (.svg or .png).
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Plot width in pixels (overrides config).
    #[arg(long)]
    width: Option<u32>,
    /// Plot height in pixels (overrides config).
    #[arg(long)]
    height: Option<u32>,
    /// Legend placement (overrides config).
    #[arg(long, value_enum)]
    legend: Option<LegendArg>,
    /// Chart title; defaults to the Y axis legend.
    #[arg(long)]
    title: Option<String>,
    /// Print per-series statistics to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

#[derive(Args, Debug)]
struct MapArgs {
    /// Show predicted totals of this model instead of the latest observed totals.
    #[arg(short, long)]
    model: Option<String>,
    /// Prediction horizon in days (with --model).
    #[arg(short, long, default_value_t = 14)]
    days: u32,
    /// Save heat entries to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Render a ranking of the hottest areas at the given path (.svg or .png).
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Number of areas to print and plot (overrides config).
    #[arg(long)]
    top: Option<usize>,
    /// Also show states and provinces next to their countries.
    #[arg(long, default_value_t = false)]
    states: bool,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn out_format(format: Option<&OutFormat>, path: &Path) -> String {
    match format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
    }
    .to_ascii_lowercase()
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let cfg = Config::load(cli.config.as_deref()).context("loading configuration")?;
    let client = Client::from_config(&cfg.api)?;
    match cli.cmd {
        Command::Areas => cmd_areas(&client),
        Command::Models => cmd_models(&client),
        Command::Chart(args) => cmd_chart(&client, &cfg, args),
        Command::Map(args) => cmd_map(&client, &cfg, args),
    }
}

fn cmd_areas(client: &Client) -> Result<()> {
    let mut areas = client.areas().context("fetching areas")?;
    areas.sort_by_key(|a| a.display_name());
    for a in areas {
        println!("{}\t{}", a.iso_code, a.display_name());
    }
    Ok(())
}

fn cmd_models(client: &Client) -> Result<()> {
    for m in client.models().context("fetching models")? {
        match m.description.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(d) => println!("{}\t{}", m.name, d),
            None => println!("{}", m.name),
        }
    }
    Ok(())
}

fn cmd_chart(client: &Client, cfg: &Config, args: ChartArgs) -> Result<()> {
    let wanted = parse_list(&args.areas);
    if wanted.is_empty() {
        anyhow::bail!("--areas must name at least one area");
    }
    let known = client.areas().context("fetching areas")?;
    let req = ChartRequest {
        areas: api::resolve_areas(&known, &wanted)?,
        models: args.models.as_deref().map(parse_list).unwrap_or_default(),
        days: args.days,
        distancing: args.distancing,
        statistic: args.statistic.into(),
        scale: args.scale.into(),
    };

    let mut chart_view = View::new();
    view::load_chart(&mut chart_view, client, &req);
    if let ViewState::Failed(msg) = chart_view.state() {
        anyhow::bail!("could not load chart data: {msg}");
    }
    let chart = chart_view.model().context("chart data was not loaded")?;

    if let Some(path) = args.out.as_ref() {
        match out_format(args.format.as_ref(), path).as_str() {
            "csv" => storage::save_series_csv(&chart.series, path)?,
            "json" => storage::save_series_json(&chart.series, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} series to {}", chart.series.len(), path.display());
    }

    if let Some(plot_path) = args.plot.as_ref() {
        let mut opts = RenderOptions::from_config(&cfg.chart)
            .with_title(args.title.clone().unwrap_or_default());
        if let Some(w) = args.width {
            opts.width = w;
        }
        if let Some(h) = args.height {
            opts.height = h;
        }
        if let Some(l) = args.legend {
            opts.legend = l.into();
        }
        viz::plot_forecast(chart, plot_path, &opts)
            .with_context(|| format!("rendering {}", plot_path.display()))?;
        eprintln!("Wrote plot to {}", plot_path.display());
    }

    if args.stats {
        for s in stats::series_summary(&chart.series) {
            println!(
                "{}  count={}  min={} max={} mean={} median={} last={}",
                s.series_id,
                s.count,
                fmt_opt(s.min),
                fmt_opt(s.max),
                fmt_opt(s.mean),
                fmt_opt(s.median),
                fmt_opt(s.last)
            );
        }
    }

    Ok(())
}

fn cmd_map(client: &Client, cfg: &Config, args: MapArgs) -> Result<()> {
    let mode = match args.model {
        Some(model) => MapMode::Predicted {
            model,
            days: args.days,
        },
        None => MapMode::Current,
    };
    let top = args.top.unwrap_or(cfg.map.top);
    let regions = if args.states {
        Regions::WithSubdivisions
    } else {
        Regions::Countries
    };

    let mut map_view = View::new();
    view::load_map(&mut map_view, client, &mode);
    if let ViewState::Failed(msg) = map_view.state() {
        anyhow::bail!("could not load map data: {msg}");
    }
    let layer = map_view.model().context("map data was not loaded")?;

    for entry in layer.ranked(top, regions) {
        println!("{}\t{}", entry.id, tooltip_text(entry));
    }

    if let Some(path) = args.out.as_ref() {
        let shown: Vec<_> = layer.visible(regions).cloned().collect();
        match out_format(args.format.as_ref(), path).as_str() {
            "csv" => storage::save_heat_csv(&shown, path)?,
            "json" => storage::save_heat_json(&shown, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} areas to {}", shown.len(), path.display());
    }

    if let Some(plot_path) = args.plot.as_ref() {
        let opts = RenderOptions::from_config(&cfg.chart);
        viz::plot_heat_ranking(layer, plot_path, top, regions, &opts)
            .with_context(|| format!("rendering {}", plot_path.display()))?;
        eprintln!("Wrote plot to {}", plot_path.display());
    }

    Ok(())
}
