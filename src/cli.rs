use crate::config::load_config;
use crate::export::ChartSession;
use crate::ir::{DataModel, Tier};
use crate::layout_dump::write_layout_dump;
use crate::parser::{parse_data_model, to_json_pretty};
use crate::render::write_output_svg;
use crate::scene::Highlight;
use crate::text_metrics::FontMetricsEstimator;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "caprings",
    version,
    about = "Concentric capability chart renderer (chart + legend, SVG/PNG)"
)]
pub struct Args {
    /// Input data file (.json / .json5) or '-' for stdin. Uses the built-in data set when omitted.
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON5 file with theme/chart/export overrides
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Write the computed layout as JSON to this path
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// Print the built-in data set as JSON and exit
    #[arg(long = "print-default")]
    pub print_default: bool,

    /// Highlight one band, as `<category index>:<tier>` (e.g. `2:near`)
    #[arg(long = "highlight", value_parser = parse_highlight)]
    pub highlight: Option<Highlight>,

    /// Measure text with system font metrics instead of the heuristic estimate
    #[arg(long = "font-metrics")]
    pub font_metrics: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    if args.print_default {
        println!("{}", to_json_pretty(&DataModel::default_data()));
        return Ok(());
    }

    let config = load_config(args.config.as_deref()).context("failed to load config")?;
    let model = match args.input.as_deref() {
        Some(path) => {
            let input = read_input(path)?;
            parse_data_model(&input).with_context(|| format!("invalid data in {}", path.display()))?
        }
        None => DataModel::default_data(),
    };

    let mut session = if args.font_metrics {
        let estimator = FontMetricsEstimator::new(&config.theme.font_family);
        ChartSession::new(config).with_estimator(estimator)
    } else {
        ChartSession::new(config)
    };
    let rendered = session.render(&model, args.highlight);

    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &rendered.layout, &rendered.placement)?;
        tracing::info!(path = %path.display(), "wrote layout dump");
    }

    match args.output_format {
        OutputFormat::Svg => {
            let svg = session
                .export_vector()
                .ok_or_else(|| anyhow::anyhow!("nothing rendered"))?;
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => write_png(&session, &args.output)?,
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(session: &ChartSession, output: &Option<PathBuf>) -> Result<()> {
    let output = ensure_output(output, "png")?;
    let image = session
        .export_raster()
        .ok_or_else(|| anyhow::anyhow!("nothing rendered"))??;
    crate::render::write_output_png(&image.png, &output)
}

#[cfg(not(feature = "png"))]
fn write_png(_session: &ChartSession, _output: &Option<PathBuf>) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

#[cfg_attr(not(feature = "png"), allow(dead_code))]
fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

fn parse_highlight(value: &str) -> std::result::Result<Highlight, String> {
    let (index, tier) = value
        .split_once(':')
        .ok_or_else(|| format!("expected <index>:<tier>, got {value:?}"))?;
    let category = index
        .trim()
        .parse::<usize>()
        .map_err(|err| format!("bad category index {index:?}: {err}"))?;
    let tier = Tier::from_key(tier.trim()).ok_or_else(|| {
        format!("unknown tier {tier:?} (comfortable, challenging, near, far)")
    })?;
    Ok(Highlight { category, tier })
}
