//! QR Mandala CLI
//!
//! Usage:
//!   qr-mandala [OPTIONS] [CONTENT]
//!
//! Content is read from stdin when not given. SVG goes to stdout unless
//! `--output` is set; PNG output requires `--output`.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;

use qr_mandala::{
    export_with_config, generate_with_config, read_scene, EcLevel, ExportFormat, Layer,
    LogoConfig, RenderConfig, StyleConfig, SvgConfig,
};

#[derive(Parser)]
#[command(name = "qr-mandala")]
#[command(about = "Render text as a stylized, still-scannable QR code")]
struct Cli {
    /// Text to encode (reads from stdin if not provided)
    content: Option<String>,

    /// Style file (TOML format)
    #[arg(short, long, conflicts_with = "preset")]
    style: Option<PathBuf>,

    /// Built-in style preset
    #[arg(short, long)]
    preset: Option<String>,

    /// Error-correction level: L, M, Q or H
    #[arg(short, long, default_value = "H")]
    level: EcLevel,

    /// Output format: svg or png
    #[arg(short, long, default_value = "svg")]
    format: ExportFormat,

    /// Output file (stdout if not provided, SVG only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Side of the drawing in pixels
    #[arg(long, default_value_t = 500.0)]
    size: f64,

    /// Logo image file embedded at the center
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Edge opacity override, 0 to 1
    #[arg(long)]
    connectivity: Option<f64>,

    /// Dot scale override, 0.1 to 1
    #[arg(long)]
    dot_scale: Option<f64>,

    /// Frame complexity override, 0 to 1
    #[arg(long)]
    complexity: Option<f64>,

    /// Draw the decorative frame
    #[arg(long)]
    frame: bool,

    /// Add a glow to the outer finder rings
    #[arg(long)]
    glow: bool,

    /// Fail instead of warning when the logo zone exceeds the correction capacity
    #[arg(long)]
    strict: bool,

    /// List the built-in presets and exit
    #[arg(long)]
    list_presets: bool,

    /// Read an SVG file produced by this tool and print its contents
    #[arg(long, value_name = "FILE")]
    inspect: Option<PathBuf>,

    /// Debug mode: print scene statistics
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.list_presets {
        for name in StyleConfig::preset_names() {
            println!("{}", name);
        }
        return;
    }

    let svg_config = SvgConfig::default().with_glow(cli.glow);

    if let Some(path) = &cli.inspect {
        inspect(path, &svg_config);
        return;
    }

    let mut style = match (&cli.style, &cli.preset) {
        (Some(path), _) => StyleConfig::from_file(path).unwrap_or_else(|e| {
            eprintln!("Error loading style '{}': {}", path.display(), e);
            std::process::exit(1);
        }),
        (None, Some(name)) => StyleConfig::preset(name).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }),
        (None, None) => StyleConfig::default(),
    };

    if let Some(content) = read_content(&cli) {
        style = style.with_content(content);
    }
    if let Some(path) = &cli.logo {
        match LogoConfig::from_file(path) {
            Ok(logo) => style = style.with_logo(logo),
            Err(e) => {
                eprintln!("Error reading logo '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }
    if let Some(value) = cli.connectivity {
        style = style.with_connectivity(value);
    }
    if let Some(value) = cli.dot_scale {
        style = style.with_dot_scale(value);
    }
    if let Some(value) = cli.complexity {
        style = style.with_complexity(value);
    }
    if cli.frame {
        style = style.with_frame(true);
    }

    let config = RenderConfig::new()
        .with_svg(svg_config.clone())
        .with_strict_capacity(cli.strict)
        .with_debug(cli.debug);
    let scene = match generate_with_config(&style, cli.level, cli.size, &config) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let bytes = match export_with_config(&scene, cli.format, &svg_config) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match (&cli.output, cli.format) {
        (Some(path), _) => {
            if let Err(e) = fs::write(path, &bytes) {
                eprintln!("Error writing '{}': {}", path.display(), e);
                std::process::exit(1);
            }
            info!("wrote {} bytes of {} to {}", bytes.len(), cli.format, path.display());
        }
        (None, ExportFormat::Vector) => println!("{}", String::from_utf8_lossy(&bytes)),
        (None, ExportFormat::Raster) => {
            eprintln!("Error: PNG output requires --output");
            std::process::exit(1);
        }
    }
}

/// Content from the argument, or from piped stdin
fn read_content(cli: &Cli) -> Option<String> {
    if let Some(content) = &cli.content {
        return Some(content.clone());
    }
    if io::stdin().is_terminal() {
        return None;
    }
    let mut buffer = String::new();
    match io::stdin().read_to_string(&mut buffer) {
        Ok(_) => Some(buffer.trim_end_matches(['\r', '\n']).to_string()),
        Err(e) => {
            eprintln!("Error reading from stdin: {}", e);
            std::process::exit(1);
        }
    }
}

fn inspect(path: &Path, config: &SvgConfig) {
    let source = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    };
    let filename = path.display().to_string();
    match read_scene(&source, config) {
        Ok(scene) => {
            println!("size: {}", scene.size);
            println!("background: {}", scene.background);
            for layer in [
                Layer::Frame,
                Layer::Edges,
                Layer::Dots,
                Layer::Finders,
                Layer::Logo,
            ] {
                println!("{:?}: {}", layer, scene.count(layer));
            }
        }
        Err(e) => {
            eprintln!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    }
}
