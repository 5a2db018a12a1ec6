use crate::compose::compose_scene;
use crate::graph::{Graph, Node, NormalizedNodes};
use crate::layers::MapLayer;
use crate::prefs::{FileBackend, MemoryBackend, PrefBackend, PreferenceStore};
use crate::render::render_svg;
#[cfg(feature = "png")]
use crate::render::write_output_png;
use crate::render::write_output_svg;
use crate::selection::SelectionState;
use crate::theme::Theme;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "waymark", version, about = "Interactive map viewer (snapshot to SVG, list or grid)")]
pub struct Args {
    /// Map snapshot JSON file, or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG/text if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format for the map view
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Presentation to render
    #[arg(short = 'v', long = "view", value_enum, default_value = "map")]
    pub view: ViewMode,

    /// Preference file. Omitting it keeps preferences in memory for this run.
    #[arg(short = 'p', long = "prefs")]
    pub prefs: Option<PathBuf>,

    /// Toggle a layer's visibility by its code (repeatable)
    #[arg(long = "toggle-layer", value_name = "CODE")]
    pub toggle_layer: Vec<u8>,

    /// Toggle spoiler-free mode
    #[arg(long = "toggle-spoiler-free")]
    pub toggle_spoiler_free: bool,

    /// Toggle the per-card log counts
    #[arg(long = "toggle-log-counts")]
    pub toggle_log_counts: bool,

    /// Reset all preferences to their defaults before applying toggles
    #[arg(long = "reset-prefs")]
    pub reset_prefs: bool,

    /// Select a node by id before rendering
    #[arg(long = "select", value_name = "NODE_ID")]
    pub select: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    #[cfg(feature = "png")]
    Png,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ViewMode {
    Map,
    List,
    Grid,
}

pub fn run() -> Result<()> {
    let args = Args::parse();

    let input = read_input(args.input.as_deref())?;
    let graph = Graph::from_json(&input)?;

    let backend: Box<dyn PrefBackend> = match &args.prefs {
        Some(path) => Box::new(FileBackend::open(path)),
        None => Box::new(MemoryBackend::new()),
    };
    let mut store = PreferenceStore::load(backend);
    if args.reset_prefs {
        store.reset();
    }
    for code in &args.toggle_layer {
        let layer = MapLayer::from_code(*code)
            .with_context(|| format!("unknown layer code {code}"))?;
        store.toggle_layer(layer);
    }
    if args.toggle_spoiler_free {
        store.toggle_spoiler_free_mode();
    }
    if args.toggle_log_counts {
        store.toggle_show_log_counts();
    }

    let mut selection = SelectionState::new();
    if let Some(id) = &args.select {
        let node = graph
            .node(id)
            .with_context(|| format!("unknown node id `{id}`"))?;
        selection.click_node(node);
    }

    match args.view {
        ViewMode::Map => {
            let mut cache = NormalizedNodes::new();
            let normalized = cache.get(graph.nodes());
            let scene = compose_scene(normalized, store.preferences(), &selection)
                .context("nothing to draw")?;
            let svg = render_svg(&scene, &Theme::default());
            match args.output_format {
                OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref())?,
                #[cfg(feature = "png")]
                OutputFormat::Png => {
                    let output = ensure_output(&args.output, "png")?;
                    write_output_png(&svg, &output, &scene)?;
                }
            }
        }
        ViewMode::List => {
            let text = list_view(graph.nodes(), store.preferences().show_log_counts);
            write_output_text(&text, args.output.as_deref())?;
        }
        ViewMode::Grid => {
            let text = grid_view(graph.nodes());
            write_output_text(&text, args.output.as_deref())?;
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

fn write_output_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
        }
        None => {
            print!("{}", text);
        }
    }
    Ok(())
}

/// The "list" presentation: the raw node sequence, one line per location.
fn list_view(nodes: &[Node], show_log_counts: bool) -> String {
    let mut out = String::new();
    for node in nodes {
        out.push_str(&node.name);
        out.push_str(&format!(" [{}]", node.curiosity.label()));
        if show_log_counts {
            out.push_str(&format!(" ({} logs)", node.logs.len()));
        }
        out.push('\n');
    }
    out
}

/// The "grid" presentation: names in fixed-width columns, four per row.
fn grid_view(nodes: &[Node]) -> String {
    const COLUMNS: usize = 4;
    const CELL_WIDTH: usize = 22;
    let mut out = String::new();
    for row in nodes.chunks(COLUMNS) {
        for node in row {
            let mut name = node.name.clone();
            if name.chars().count() > CELL_WIDTH - 2 {
                name = name.chars().take(CELL_WIDTH - 3).collect();
                name.push('…');
            }
            out.push_str(&format!("{:<width$}", name, width = CELL_WIDTH));
        }
        out.push('\n');
    }
    out
}
