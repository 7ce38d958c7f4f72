use crate::config::{Config, load_config, validate};
use crate::dot::to_dot;
use crate::drawio::to_drawio_xml;
use crate::engine::{Graphviz, ImageFormat, RenderEngine};
use crate::error::Error;
use crate::ir::AnyGraph;
use crate::parser::{parse_dsl, parse_positioned};
use crate::render::{write_output_bytes, write_output_text};
use crate::{positioned_to_scene, positioned_to_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{LevelFilter, debug, info};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(
    name = "crmviz",
    version,
    about = "CIDOC-CRM graph DSL to Graphviz diagrams and editable shape scenes"
)]
pub struct Args {
    /// Input file: DSL text, or a positioned graph when the extension is .json. '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for text formats if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas width in EMU for the shape scene
    #[arg(short = 'w', long = "width")]
    pub width: Option<i64>,

    /// Canvas height in EMU for the shape scene
    #[arg(short = 'H', long = "height")]
    pub height: Option<i64>,

    /// Graphviz executable used for svg/png output of DSL input
    #[arg(long = "dot-program", default_value = "dot")]
    pub dot_program: String,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Dot,
    Svg,
    Png,
    Scene,
    Drawio,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Scene => "json",
            Self::Drawio => "drawio",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Dsl,
    Positioned,
}

#[derive(Debug, PartialEq)]
enum Artifact {
    Text(String),
    Binary(Vec<u8>),
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.log_level);
    debug!(args:?; "Parsed arguments");
    run_with(&args)
}

pub fn init_logger(level: &str) {
    let level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });
    // A second initialization in the same process is harmless.
    let _ = env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .try_init();
}

pub fn run_with(args: &Args) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.canvas_width = width;
    }
    if let Some(height) = args.height {
        config.render.canvas_height = height;
    }
    validate(&config)?;

    let (input, kind) = read_input(args.input.as_deref())?;
    let graph = load_graph(&input, kind)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edges().len();
        "Loaded graph"
    );

    let engine = Graphviz::new(args.dot_program.clone());
    match produce(&graph, args.output_format, &config, &engine)? {
        Artifact::Text(text) => write_output_text(&text, args.output.as_deref())?,
        Artifact::Binary(bytes) => {
            let output = ensure_output(&args.output, args.output_format.extension())?;
            write_output_bytes(&bytes, &output)?;
        }
    }

    info!("Output written");
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<(String, InputKind)> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok((buf, InputKind::Dsl));
        }
        let content = std::fs::read_to_string(path)?;
        return Ok((content, input_kind(path)));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok((buf, InputKind::Dsl))
}

fn input_kind(path: &Path) -> InputKind {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        InputKind::Positioned
    } else {
        InputKind::Dsl
    }
}

fn load_graph(input: &str, kind: InputKind) -> Result<AnyGraph> {
    Ok(match kind {
        InputKind::Dsl => AnyGraph::Described(parse_dsl(input).graph),
        InputKind::Positioned => AnyGraph::Positioned(parse_positioned(input)?),
    })
}

fn produce(
    graph: &AnyGraph,
    format: OutputFormat,
    config: &Config,
    engine: &dyn RenderEngine,
) -> Result<Artifact> {
    let artifact = match (format, graph) {
        (OutputFormat::Dot, graph) => {
            Artifact::Text(to_dot(&graph.described(), &config.theme, &config.dot))
        }
        (OutputFormat::Svg, AnyGraph::Described(described)) => {
            let dot = to_dot(described, &config.theme, &config.dot);
            let svg = engine.render(&dot, ImageFormat::Svg)?;
            Artifact::Text(String::from_utf8_lossy(&svg).into_owned())
        }
        (OutputFormat::Png, AnyGraph::Described(described)) => {
            let dot = to_dot(described, &config.theme, &config.dot);
            Artifact::Binary(engine.render(&dot, ImageFormat::Png)?)
        }
        (OutputFormat::Svg, AnyGraph::Positioned(positioned)) => {
            Artifact::Text(positioned_to_svg(positioned, config)?)
        }
        (OutputFormat::Png, AnyGraph::Positioned(positioned)) => {
            Artifact::Binary(scene_png(&positioned_to_svg(positioned, config)?, config)?)
        }
        (OutputFormat::Scene, AnyGraph::Positioned(positioned)) => {
            Artifact::Text(positioned_to_scene(positioned, config)?.to_json()?)
        }
        (OutputFormat::Drawio, AnyGraph::Positioned(positioned)) => {
            Artifact::Text(to_drawio_xml(positioned))
        }
        (OutputFormat::Scene | OutputFormat::Drawio, AnyGraph::Described(_)) => {
            return Err(Error::Unsupported(format!(
                "{:?} output needs a positioned graph (.json input)",
                format
            ))
            .into());
        }
    };
    Ok(artifact)
}

#[cfg(feature = "png")]
fn scene_png(svg: &str, config: &Config) -> Result<Vec<u8>> {
    Ok(crate::render::svg_to_png(svg, &config.render, &config.theme)?)
}

#[cfg(not(feature = "png"))]
fn scene_png(_svg: &str, _config: &Config) -> Result<Vec<u8>> {
    Err(Error::Unsupported("PNG output requires the `png` feature".to_string()).into())
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
