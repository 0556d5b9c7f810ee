//! `rune`: inspect and edit rich-text layer files from the command line.
//!
//! ```bash
//! # Show wrapped rows and the computed size of a layer
//! rune layout layer.json --cursor 0:3
//!
//! # Which position does a click at (42, 10) land on?
//! rune hit layer.json 42 10
//!
//! # Insert text and print the updated layer
//! rune insert layer.json --at 0:5 "!"
//!
//! # Print the effective configuration
//! rune config
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rune_config::RuneConfig;
use rune_richtext::{
    Color, Editor, EditorOptions, FontMetricsProvider, LayerParams, Point, RatioMetrics, SpanMeta,
    TextDirection, TextLayer, TextPosition, WrapGranularity,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rune", about = "Lay out and edit rich-text layers")]
struct Args {
    /// Configuration file (defaults to ./rune.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log layout and font events
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the wrapped rows, size and geometry of a layer
    Layout {
        file: PathBuf,
        /// Caret position as LINE:CHAR
        #[arg(long, value_parser = parse_position)]
        cursor: Option<TextPosition>,
        /// Extend a selection from the caret to LINE:CHAR
        #[arg(long, value_parser = parse_position, requires = "cursor")]
        select_to: Option<TextPosition>,
        /// Also list every placed glyph
        #[arg(long)]
        glyphs: bool,
        /// Print the normalized layer JSON afterwards
        #[arg(long)]
        json: bool,
    },
    /// Map a layer-local point to a document position
    Hit { file: PathBuf, x: f32, y: f32 },
    /// Insert text into a layer and print the result
    Insert {
        file: PathBuf,
        text: String,
        /// Insertion position as LINE:CHAR (defaults to the end)
        #[arg(long, value_parser = parse_position)]
        at: Option<TextPosition>,
        /// Write the layer here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Create a layer holding `text` in the configured default style
    New {
        text: String,
        #[arg(long, default_value_t = 0.0)]
        x: f32,
        #[arg(long, default_value_t = 0.0)]
        y: f32,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML
    Config,
}

fn parse_position(s: &str) -> std::result::Result<TextPosition, String> {
    let (line, character) = s
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:CHAR, got `{s}`"))?;
    let line = line.trim().parse().map_err(|e| format!("bad line: {e}"))?;
    let character = character
        .trim()
        .parse()
        .map_err(|e| format!("bad character: {e}"))?;
    Ok(TextPosition::new(line, character))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "rune=debug,rune_richtext=debug,rune_config=debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &args.config {
        Some(path) => RuneConfig::load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => RuneConfig::load_or_default(),
    };
    config.merge_with_env();

    match args.command {
        Command::Layout {
            file,
            cursor,
            select_to,
            glyphs,
            json,
        } => {
            let mut fonts = font_provider(&config);
            let mut editor = open_editor(&file, &config)?;
            if let Some(position) = cursor {
                editor.set_cursor(position, false);
            }
            if let Some(position) = select_to {
                editor.set_cursor(position, true);
            }
            settle_fonts(&mut editor, &mut fonts);
            print_layout(&mut editor, &mut fonts, cursor.is_some(), glyphs);
            if json {
                println!("{}", editor.layer().to_json_pretty()?);
            }
        }
        Command::Hit { file, x, y } => {
            let mut fonts = font_provider(&config);
            let mut editor = open_editor(&file, &config)?;
            settle_fonts(&mut editor, &mut fonts);
            let position = editor.layout(&mut fonts).position_from_point(Point::new(x, y));
            println!("{}:{}", position.line, position.character);
        }
        Command::Insert {
            file,
            text,
            at,
            output,
        } => {
            let mut fonts = font_provider(&config);
            let mut editor = open_editor(&file, &config)?;
            let at = at.unwrap_or_else(|| editor.document().end());
            editor.set_cursor(at, false);
            editor.insert_at_cursor(&text);
            settle_fonts(&mut editor, &mut fonts);
            write_layer(editor.layer(), output.as_deref())?;
        }
        Command::New { text, x, y, output } => {
            let mut fonts = font_provider(&config);
            let mut layer = TextLayer::new(x, y, &default_style(&config)?);
            layer.params = default_params(&config)?;
            let mut editor = Editor::new(layer, editor_options(&config));
            editor.insert_at_cursor(&text);
            settle_fonts(&mut editor, &mut fonts);
            write_layer(editor.layer(), output.as_deref())?;
        }
        Command::Config => {
            print!("{}", config.to_toml().context("serializing config")?);
        }
    }

    Ok(())
}

fn font_provider(config: &RuneConfig) -> FontMetricsProvider {
    let ratios = RatioMetrics::new(
        config.fonts.fallback_width_ratio,
        config.fonts.fallback_height_ratio,
        config.fonts.fallback_baseline_ratio,
    );
    let provider = if config.fonts.system_fonts {
        FontMetricsProvider::system(ratios)
    } else {
        FontMetricsProvider::with_ratios(ratios)
    };
    provider.with_preloaded(config.fonts.preloaded.iter().cloned())
}

fn editor_options(config: &RuneConfig) -> EditorOptions {
    EditorOptions {
        blink_interval: config.editor.blink_interval,
        min_box_size: config.editor.min_box_size,
    }
}

fn default_style(config: &RuneConfig) -> Result<SpanMeta> {
    let fill: Color = config
        .text
        .fill_color
        .parse()
        .context("invalid [text] fill_color")?;
    Ok(SpanMeta {
        size: Some(config.text.size),
        family: Some(config.text.family.clone()),
        fill_color: Some(fill),
        ..Default::default()
    })
}

fn default_params(config: &RuneConfig) -> Result<LayerParams> {
    let wrap: WrapGranularity = config.editor.wrap.parse().context("invalid [editor] wrap")?;
    let text_direction: TextDirection = config
        .editor
        .direction
        .parse()
        .context("invalid [editor] direction")?;
    Ok(LayerParams {
        wrap,
        text_direction,
        ..Default::default()
    })
}

fn open_editor(path: &Path, config: &RuneConfig) -> Result<Editor> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading layer {}", path.display()))?;
    let layer =
        TextLayer::from_json(&json).with_context(|| format!("parsing layer {}", path.display()))?;
    Ok(Editor::new(layer, editor_options(config)))
}

/// Lay out once so every used family is requested, then pick up the
/// loads that finished and lay out again with real metrics.
fn settle_fonts(editor: &mut Editor, fonts: &mut FontMetricsProvider) {
    editor.layout(fonts);
    for event in editor.poll_fonts(fonts) {
        tracing::debug!(?event, "font load finished");
    }
    editor.layout(fonts);
}

fn print_layout(
    editor: &mut Editor,
    fonts: &mut FontMetricsProvider,
    with_cursor: bool,
    with_glyphs: bool,
) {
    let layout = editor.layout(fonts);
    let (width, height) = layout.size();
    println!("size: {width} x {height}");
    for row in layout.rows() {
        let metrics = row.metrics();
        println!(
            "line {} [{}..{}) at {:.1} (+{:.1}): {:?}",
            row.line(),
            row.start(),
            row.end(),
            metrics.offset,
            metrics.size,
            row.text()
        );
    }
    if with_glyphs {
        for glyph in layout.glyphs() {
            println!(
                "glyph {:?} at {}:{} rect ({:.1}, {:.1}, {:.1}, {:.1})",
                glyph.ch,
                glyph.position.line,
                glyph.position.character,
                glyph.rect.x,
                glyph.rect.y,
                glyph.rect.width,
                glyph.rect.height
            );
        }
    }

    if with_cursor {
        let caret = editor.cursor_geometry(fonts);
        println!(
            "cursor: ({:.1}, {:.1}) {:.1} x {:.1}",
            caret.x, caret.y, caret.width, caret.height
        );
        for rect in editor.selection_geometry(fonts) {
            println!(
                "selection: ({:.1}, {:.1}) {:.1} x {:.1}",
                rect.x, rect.y, rect.width, rect.height
            );
        }
    }

    let layer = editor.layer();
    println!(
        "layer: ({}, {}) {} x {}",
        layer.x, layer.y, layer.width, layer.height
    );
}

fn write_layer(layer: &TextLayer, output: Option<&Path>) -> Result<()> {
    let json = layer.to_json_pretty()?;
    match output {
        Some(path) => {
            if path.is_dir() {
                bail!("{} is a directory", path.display());
            }
            std::fs::write(path, json + "\n")
                .with_context(|| format!("writing layer to {}", path.display()))?;
            tracing::info!(path = %path.display(), "layer written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
