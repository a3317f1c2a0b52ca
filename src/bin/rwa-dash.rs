use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use num_format::{Locale, ToFormattedString};
use rwa_dash::interact::{ChartEvent, LegendBehavior};
use rwa_dash::loader::sources;
use rwa_dash::models::{GaugeRow, SECONDS_PER_DAY, date_to_ts, parse_date};
use rwa_dash::viz::{self, Chart, ChartKind, GaugeChart};
use rwa_dash::{DashboardConfig, DataDir, Timestamp, build_all, build_chart};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rwa-dash",
    version,
    about = "Render and summarize the RWA / liquidity dashboard charts"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render charts to SVG, optionally after zoom, pan, legend and hover input.
    Render(RenderArgs),
    /// Print the current liquidity gauge reading.
    Gauge(DataArgs),
    /// Print summary statistics per series.
    Stats(StatsArgs),
}

#[derive(Args, Debug)]
struct DataArgs {
    /// Directory holding the CSV sources.
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    data: DataArgs,
    /// Directory to write the SVG files to.
    #[arg(long, default_value = "charts")]
    out_dir: PathBuf,
    /// Chart to render (macro, asset-shares, chains, protocols, yield, gauge) or "all".
    #[arg(long, default_value = "all")]
    chart: String,
    /// Width of the time-series charts (default 900).
    #[arg(long)]
    width: Option<u32>,
    /// Height of the time-series charts (default 420).
    #[arg(long)]
    height: Option<u32>,
    /// JSON file with per-chart overrides.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Zoom factor to apply (clamped to the chart's scale extent).
    #[arg(long)]
    zoom: Option<f64>,
    /// Date (YYYY-MM-DD) to zoom around; defaults to the middle of the window.
    #[arg(long)]
    zoom_at: Option<String>,
    /// Pan the window by this many days (positive moves later).
    #[arg(long, allow_hyphen_values = true)]
    pan_days: Option<f64>,
    /// Show the hover tooltip for the point nearest this date (YYYY-MM-DD).
    #[arg(long)]
    hover: Option<String>,
    /// Click a legend entry (repeatable).
    #[arg(long)]
    toggle: Vec<String>,
    /// Focus one legend entry. Ignored on charts whose legend toggles series.
    #[arg(long)]
    focus: Option<String>,
}

#[derive(Args, Debug)]
struct StatsArgs {
    #[command(flatten)]
    data: DataArgs,
    /// Chart whose series to summarize, or "all".
    #[arg(long, default_value = "all")]
    chart: String,
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

fn parse_kinds(s: &str) -> Result<Vec<ChartKind>> {
    if s.eq_ignore_ascii_case("all") {
        return Ok(ChartKind::ALL.to_vec());
    }
    s.split([',', ';'])
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(|name| {
            ChartKind::from_name(name).ok_or_else(|| anyhow::anyhow!("unknown chart: {name}"))
        })
        .collect()
}

fn parse_day(flag: &str, s: &str) -> Result<Timestamp> {
    parse_date(s)
        .map(date_to_ts)
        .ok_or_else(|| anyhow::anyhow!("invalid --{flag}, expected YYYY-MM-DD"))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Gauge(args) => cmd_gauge(args),
        Command::Stats(args) => cmd_stats(args),
    }
}

/// Replay the requested input on `chart`: zoom, pan, legend clicks, then hover.
fn apply_input(chart: &mut dyn Chart, args: &RenderArgs) -> Result<()> {
    if chart.controller().is_none() {
        return Ok(());
    }
    if let Some(factor) = args.zoom {
        let focal = match &args.zoom_at {
            Some(s) => parse_day("zoom-at", s)?,
            None => match chart.controller() {
                Some(ctl) => ctl.window.start() + ctl.window.span() / 2.0,
                None => return Ok(()),
            },
        };
        viz::zoom_at_time(chart, factor, focal);
    }
    if let Some(days) = args.pan_days {
        viz::pan_by_time(chart, days * SECONDS_PER_DAY);
    }
    let focus = match (&args.focus, chart.controller()) {
        (Some(id), Some(ctl)) if ctl.visibility.behavior() == LegendBehavior::SingleFocus => Some(id),
        (Some(id), _) => {
            log::warn!("{}: --focus {id:?} ignored, the legend toggles series", chart.kind().name());
            None
        }
        (None, _) => None,
    };
    for id in args.toggle.iter().chain(focus) {
        if !chart.handle(&ChartEvent::LegendClick(id.as_str().into())).any() {
            log::warn!("{}: no legend entry {id:?}", chart.kind().name());
        }
    }
    if let Some(s) = &args.hover {
        viz::hover_at_time(chart, parse_day("hover", s)?);
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let kinds = parse_kinds(&args.chart)?;
    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    config.override_size(args.width, args.height);
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let data = DataDir::new(&args.data.data_dir);
    let mut failed = 0;
    for (kind, chart) in build_all(&kinds, &data, &config) {
        let mut chart = match chart {
            Ok(c) => c,
            Err(err) => {
                eprintln!("Skipped {}: {err}", kind.name());
                failed += 1;
                continue;
            }
        };
        apply_input(chart.as_mut(), &args)?;
        let path = args.out_dir.join(format!("{}.svg", kind.file_stem()));
        viz::write_svg(&chart.scene(), &path)?;
        eprintln!("Wrote {} to {}", kind.name(), path.display());
    }
    if failed > 0 {
        anyhow::bail!("{failed} chart(s) could not be loaded");
    }
    Ok(())
}

fn cmd_gauge(args: DataArgs) -> Result<()> {
    let data = DataDir::new(&args.data_dir);
    let rows: Vec<GaugeRow> = data.load(sources::M2_GAUGE)?;
    let gauge = GaugeChart::from_rows(&rows);
    let Some(snapshot) = gauge.snapshot() else {
        println!("No M2 growth readings.");
        return Ok(());
    };
    let r = &snapshot.reading;
    println!("latest={}  min={}  max={}", fmt_opt(Some(r.latest)), fmt_opt(Some(r.min)), fmt_opt(Some(r.max)));
    println!("percentage={:.1}  angle={:.1}°  band={}", r.percentage, r.angle_deg, r.band.label);
    println!("{}", snapshot.caption());
    Ok(())
}

fn cmd_stats(args: StatsArgs) -> Result<()> {
    let kinds = parse_kinds(&args.chart)?;
    let data = DataDir::new(&args.data.data_dir);
    let config = DashboardConfig::default();
    for kind in kinds {
        let chart = build_chart(kind, &data, &config)?;
        for s in chart.summaries() {
            println!(
                "{} • {}  count={} missing={}  min={} max={} mean={} median={} last={}",
                kind.name(),
                s.series,
                s.count.to_formatted_string(&Locale::en),
                s.missing.to_formatted_string(&Locale::en),
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
