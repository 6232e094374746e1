use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use trustviz::controller::{Controller, VizConfig};
use trustviz::gpu::{RenderConfig, request_device};
use trustviz::graph::{Threshold, TrustGraph};
use trustviz::layout::{Dimensions, LayoutKind, LayoutParams};

/// Trust network visualization: layout, statistics, and frame rendering.
#[derive(Parser)]
#[command(name = "trustviz")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Configuration flags shared by the layout and render subcommands
#[derive(Args)]
struct ConfigArgs {
    /// Layout strategy: force-directed, circular, or grid
    #[arg(short, long, default_value = "force-directed")]
    layout: LayoutKind,

    /// Dimensionality: 2 or 3
    #[arg(short, long, default_value_t = 2)]
    dimensions: u8,

    /// Trust threshold: -1, 0, or 1
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    threshold: i8,

    /// Seed for the force-directed initialization (reproducible layouts)
    #[arg(long)]
    seed: Option<u64>,
}

impl ConfigArgs {
    fn viz_config(&self) -> anyhow::Result<VizConfig> {
        Ok(VizConfig {
            layout: self.layout,
            dimensions: Dimensions::try_from(self.dimensions)?,
            threshold: Threshold::try_from(self.threshold)?,
        })
    }

    fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            seed: self.seed,
            ..LayoutParams::default()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print statistics for a trust network document
    Stats {
        /// Input trust network JSON file
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Compute a layout and print entity positions as JSON
    Layout {
        /// Input trust network JSON file
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Render a single frame to a PPM image
    Render {
        /// Input trust network JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Output image path
        #[arg(short, long, default_value = "frame.ppm")]
        output: PathBuf,

        /// Frame width in pixels
        #[arg(long, default_value_t = 800)]
        width: u32,

        /// Frame height in pixels
        #[arg(long, default_value_t = 600)]
        height: u32,

        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[derive(Serialize)]
struct PositionRecord<'a> {
    entity: &'a str,
    position: [f32; 3],
}

fn load(input: &PathBuf) -> anyhow::Result<TrustGraph> {
    let json = fs::read_to_string(input)?;
    let (graph, report) = TrustGraph::from_json(&json)?;
    if report.dropped_edges > 0 {
        eprintln!("warning: dropped {} malformed edge(s)", report.dropped_edges);
    }
    Ok(graph)
}

fn stats(input: &PathBuf) -> anyhow::Result<()> {
    let graph = load(input)?;
    println!("{}", serde_json::to_string_pretty(&graph.stats())?);
    Ok(())
}

fn layout(input: &PathBuf, config: &ConfigArgs) -> anyhow::Result<()> {
    let graph = load(input)?;
    let mut controller = Controller::new(config.viz_config()?);
    controller.set_layout_params(config.layout_params());
    controller.set_graph(graph);

    let records: Vec<PositionRecord> = controller
        .graph()
        .entities()
        .iter()
        .zip(controller.snapshot().positions())
        .map(|(entity, &position)| PositionRecord { entity, position })
        .collect();
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn render(
    input: &PathBuf,
    output: &PathBuf,
    width: u32,
    height: u32,
    config: &ConfigArgs,
) -> anyhow::Result<()> {
    let graph = load(input)?;
    let mut controller = Controller::new(config.viz_config()?);
    controller.set_layout_params(config.layout_params());
    controller.set_graph(graph);

    // A missing GPU degrades to the non-rendering state instead of failing
    let (device, queue) = match pollster::block_on(request_device()) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("{e}; graph and layout queries remain available");
            println!("{}", serde_json::to_string_pretty(&controller.stats())?);
            return Ok(());
        }
    };

    controller.attach_renderer(
        Arc::new(device),
        Arc::new(queue),
        RenderConfig {
            width,
            height,
            ..RenderConfig::default()
        },
    );
    controller.render_frame();

    let pixels = controller
        .read_pixels()
        .ok_or_else(|| anyhow::anyhow!("renderer not attached"))?;
    write_ppm(output, width, height, &pixels)?;
    println!("Rendered {} to {}", input.display(), output.display());
    Ok(())
}

/// Write RGBA pixel data as a binary PPM (alpha discarded)
fn write_ppm(path: &PathBuf, width: u32, height: u32, rgba: &[u8]) -> anyhow::Result<()> {
    let mut out = format!("P6\n{width} {height}\n255\n").into_bytes();
    out.reserve(rgba.len() / 4 * 3);
    for pixel in rgba.chunks(4) {
        out.extend_from_slice(&pixel[..3]);
    }
    fs::write(path, out)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Stats { input } => stats(&input)?,
        Commands::Layout { input, config } => layout(&input, &config)?,
        Commands::Render {
            input,
            output,
            width,
            height,
            config,
        } => render(&input, &output, width, height, &config)?,
    }

    Ok(())
}
