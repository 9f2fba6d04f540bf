use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use foundation::TileId;
use tools::{TraceOptions, to_json, to_text, trace_json};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Trace the GPU commands issued for a line style")]
struct Args {
    /// Line style document (JSON)
    style: PathBuf,

    /// Camera zoom
    #[arg(long, default_value_t = 14.0)]
    zoom: f32,

    /// Device pixel ratio
    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f32,

    /// Tile to draw, as z/x/y (defaults to the zoom's origin tile)
    #[arg(long)]
    tile: Option<TileId>,

    /// Device writes point size from the shader
    #[arg(long)]
    point_size_uniform: bool,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();
    if args.pixel_ratio.is_nan() || args.pixel_ratio <= 0.0 {
        return Err(format!("pixel ratio must be positive, got {}", args.pixel_ratio));
    }

    let payload =
        fs::read_to_string(&args.style).map_err(|e| format!("read {:?}: {e}", args.style))?;
    let tile = args
        .tile
        .unwrap_or_else(|| TileId::new(args.zoom.floor().clamp(0.0, 30.0) as u8, 0, 0));
    let options = TraceOptions {
        zoom: args.zoom,
        pixel_ratio: args.pixel_ratio,
        tile,
        point_size_uniform: args.point_size_uniform,
    };

    let trace = trace_json(&payload, &options).map_err(|e| e.to_string())?;
    info!(
        commands = trace.commands.len(),
        tile = %tile,
        "traced {:?}",
        args.style
    );

    let rendered = match args.format {
        Format::Json => to_json(&trace).map_err(|e| e.to_string())?,
        Format::Text => to_text(&trace),
    };
    println!("{rendered}");
    Ok(())
}
