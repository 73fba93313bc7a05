// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `loadspan`: plan span lines for a page description
//!
//! Reads `{ "slabs": [[x1, y1, x2, y2], ...], "voids": [...], "enclosure": [...] }`
//! and writes the page layout as JSON.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use loadspan_geometry::Axis;
use loadspan_layout::{LayoutConfig, LayoutPipeline, PageInput};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "loadspan", version, about = "Span line layout for structural floor plans")]
struct Args {
    /// Page JSON file, or '-' for stdin
    #[arg(short = 'i', long = "input", default_value = "-")]
    input: PathBuf,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Layout config JSON file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Axes to lay out
    #[arg(short = 'a', long = "axis", value_enum, default_value = "both")]
    axis: AxisArg,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum AxisArg {
    Horizontal,
    Vertical,
    Both,
}

impl AxisArg {
    fn axes(self) -> &'static [Axis] {
        match self {
            AxisArg::Horizontal => &[Axis::Horizontal],
            AxisArg::Vertical => &[Axis::Vertical],
            AxisArg::Both => &Axis::BOTH,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            LayoutConfig::from_json(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => LayoutConfig::default(),
    };

    let input = read_input(&args.input)?;
    let page = PageInput::from_json(&input).context("parsing page input")?;
    tracing::info!(
        slabs = page.slabs.len(),
        voids = page.voids.len(),
        enclosure = page.enclosure.is_some(),
        "Loaded page"
    );

    let pipeline = LayoutPipeline::new(config)?;
    let layout = pipeline.run_axes(&page, args.axis.axes());

    for axis in &layout.axes {
        let incomplete = axis.incomplete_groups().count();
        tracing::info!(
            axis = ?axis.axis,
            rectangles = axis.rectangles.len(),
            groups = axis.groups.len(),
            incomplete,
            "Planned axis"
        );
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&layout)?
    } else {
        serde_json::to_string(&layout)?
    };
    write_output(&json, args.output.as_deref())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("reading page from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading page {}", path.display()))
}

fn write_output(json: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("writing layout {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
            Ok(())
        }
    }
}
