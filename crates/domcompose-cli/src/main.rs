use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use log::info;

use domcompose::{
    parse_document, ComposeService, ConversionRequest, ConvertOptions, Diagnostics, SnapshotStyleSource, StyleMode,
    UserAgentBaseline,
};
use domcompose_core::{to_json, ComponentMapping, DesignTokens};

/// Convert an HTML page into a compositional document model
#[derive(Parser, Debug)]
#[command(name = "domcompose", version, about)]
struct Args {
    /// HTML file to convert
    file: PathBuf,

    /// Computed-style snapshot (JSON, keyed by node id in document order
    /// starting at 1). Styles are approximated from UA defaults and inline
    /// declarations when omitted.
    #[arg(long)]
    styles: Option<PathBuf>,

    /// Component mappings (JSON array)
    #[arg(long)]
    mappings: Option<PathBuf>,

    /// Design tokens (JSON)
    #[arg(long)]
    tokens: Option<PathBuf>,

    /// URL the page was captured from
    #[arg(long)]
    url: Option<String>,

    /// Write `<route>-<timestamp>.json` into this directory instead of
    /// printing to stdout
    #[arg(long, requires = "url")]
    out_dir: Option<PathBuf>,

    /// Which computed properties to keep
    #[arg(long, value_enum, default_value_t = Mode::UaDiffPlusInherited)]
    mode: Mode,

    /// Abort when the tree is nested deeper than this
    #[arg(long)]
    max_depth: Option<usize>,

    /// Trace style decisions for every element (needs RUST_LOG=trace)
    #[arg(long)]
    trace_styles: bool,

    /// Trace style decisions for elements with this class
    #[arg(long = "trace-class")]
    trace_classes: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    All,
    InheritedOnly,
    UaDiff,
    UaDiffPlusInherited,
}

impl From<Mode> for StyleMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::All => StyleMode::All,
            Mode::InheritedOnly => StyleMode::InheritedOnly,
            Mode::UaDiff => StyleMode::UaDiff,
            Mode::UaDiffPlusInherited => StyleMode::UaDiffPlusInherited,
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut options = ConvertOptions {
        style_mode: args.mode.into(),
        base_url: args.url.clone(),
        diagnostics: Diagnostics {
            trace_styles: args.trace_styles,
            trace_classes: args.trace_classes.clone(),
        },
        ..Default::default()
    };
    if let Some(max_depth) = args.max_depth {
        options.max_depth = max_depth;
    }

    let html = read(&args.file)?;
    let document = parse_document(&html);
    let root = document.find_element("body").unwrap_or(&document);

    let styles = match &args.styles {
        Some(path) => SnapshotStyleSource::from_json(&read(path)?)
            .with_context(|| format!("invalid style snapshot {}", path.display()))?,
        None => SnapshotStyleSource::approximate(&document, &UserAgentBaseline::new()),
    };
    let mappings: Vec<ComponentMapping> = match &args.mappings {
        Some(path) => serde_json::from_str(&read(path)?)
            .with_context(|| format!("invalid mappings {}", path.display()))?,
        None => Vec::new(),
    };
    let tokens: DesignTokens = match &args.tokens {
        Some(path) => serde_json::from_str(&read(path)?)
            .with_context(|| format!("invalid design tokens {}", path.display()))?,
        None => DesignTokens::default(),
    };

    let mut service = ComposeService::with_options(options);
    let request = ConversionRequest::new(root, &styles)
        .with_mappings(&mappings)
        .with_tokens(tokens);

    match (&args.out_dir, &args.url) {
        (Some(dir), Some(url)) => {
            let export = service
                .convert_and_export(&request, url, Utc::now())
                .context("conversion failed")?;
            fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
            let path = export.write_to(dir).context("failed to write export")?;
            info!("wrote {}", path.display());
            println!("{}", path.display());
        }
        _ => {
            let node = service.convert(&request).context("conversion failed")?;
            println!("{}", to_json(&node)?);
        }
    }

    Ok(())
}
