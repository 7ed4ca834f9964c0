use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lottie_core::{Animation, EngineConfig, NodeContent, Providers, RenderNode, RenderTree};
use std::fs;
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the Lottie JSON document
    #[arg(value_name = "DOCUMENT")]
    document: PathBuf,

    /// JSON file overriding the engine's numeric settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fail on features the engine cannot evaluate instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print document dimensions, timing and unsupported features
    Summary,
    /// List every addressable property
    Keypaths {
        /// Only list keypaths matching this pattern (`*` and `**` allowed)
        #[arg(long)]
        filter: Option<String>,
    },
    /// Evaluate a frame and print its scene tree
    Tree {
        #[arg(long, default_value_t = 0.0)]
        frame: f32,
    },
    /// Evaluate a frame and print the values behind a keypath
    Value {
        keypath: String,
        #[arg(long, default_value_t = 0.0)]
        frame: f32,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogFormat {
    Pretty,
    Json,
}

fn init_logging(level: LogLevel, format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level.into()).into())
        .from_env_lossy();

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

fn load_config(path: Option<&PathBuf>, strict: bool) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
            EngineConfig::from_json(&json).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    config.strict_unsupported |= strict;
    Ok(config)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.log_format);

    if let Err(e) = run(cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_ref(), cli.strict)?;
    let json = fs::read_to_string(&cli.document)
        .with_context(|| format!("reading document {}", cli.document.display()))?;
    let mut animation = Animation::from_json(&json, config, Providers::default())
        .with_context(|| format!("loading {}", cli.document.display()))?;
    info!(document = %cli.document.display(), "loaded animation");

    match cli.command {
        Command::Summary => print_summary(&animation),
        Command::Keypaths { filter } => {
            let keypaths = animation.keypaths();
            let pattern = filter.as_deref().map(lottie_core::Keypath::from);
            for keypath in keypaths {
                let segments: Vec<&str> = keypath.split('.').collect();
                if pattern.as_ref().map_or(true, |p| p.matches(&segments)) {
                    println!("{keypath}");
                }
            }
        }
        Command::Tree { frame } => {
            check_frame(&animation, frame)?;
            let tree = animation.render(frame);
            print_tree(&tree);
        }
        Command::Value { keypath, frame } => {
            check_frame(&animation, frame)?;
            animation.update(frame, false);
            for (path, value) in animation.value(&keypath)? {
                println!("{path} = {value:?}");
            }
        }
    }
    Ok(())
}

fn check_frame(animation: &Animation, frame: f32) -> Result<()> {
    if !frame.is_finite() {
        bail!("frame must be a finite number, got {frame}");
    }
    if frame < animation.in_point() || frame > animation.out_point() {
        info!(frame, ip = animation.in_point(), op = animation.out_point(), "frame lies outside the animation range");
    }
    Ok(())
}

fn print_summary(animation: &Animation) {
    println!("size:       {} x {}", animation.width(), animation.height());
    println!("frames:     {} .. {}", animation.in_point(), animation.out_point());
    println!("frame rate: {}", animation.frame_rate());
    println!("duration:   {:.3}s", animation.duration_frames() / animation.frame_rate());
    println!("layers:     {}", animation.composition().layers().len());
    println!("nodes:      {}", animation.graph().len());
    if animation.unsupported().is_empty() {
        println!("unsupported: none");
    } else {
        println!("unsupported:");
        for feature in animation.unsupported() {
            println!("  - {feature}");
        }
    }
}

fn print_tree(tree: &RenderTree) {
    println!("scene {} x {}", tree.width, tree.height);
    tree.walk(|node, depth| println!("{}{}", "  ".repeat(depth), describe(node)));
}

fn describe(node: &RenderNode) -> String {
    let name = node.name.as_deref().unwrap_or("<anonymous>");
    let kind = match &node.content {
        Some(NodeContent::Shape(shape)) => {
            let mut parts = vec!["shape"];
            if shape.fill.is_some() {
                parts.push("fill");
            }
            if shape.stroke.is_some() {
                parts.push("stroke");
            }
            parts.join("+")
        }
        Some(NodeContent::Text(text)) => format!("text[{} glyphs]", text.glyphs.len()),
        Some(NodeContent::Image(image)) => format!("image {}x{}", image.width, image.height),
        None => "group".to_string(),
    };
    let b = node.bounds;
    let mut line = format!(
        "{name} ({kind}) alpha={:.3} bounds=({:.1}, {:.1}, {:.1}, {:.1})",
        node.alpha, b.x0, b.y0, b.x1, b.y1
    );
    if node.is_hidden {
        line.push_str(" hidden");
    }
    if !node.masks.is_empty() {
        line.push_str(&format!(" masks={}", node.masks.len()));
    }
    if let Some(matte) = &node.mask {
        let source = matte.name.as_deref().unwrap_or("<anonymous>");
        let inverted = if node.invert_mask { " inverted" } else { "" };
        line.push_str(&format!(" matte={source}{inverted}"));
    }
    line
}
