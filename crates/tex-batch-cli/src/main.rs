use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSet, GlobSetBuilder};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tex_batch_core::prelude::*;
use tex_batch_core::{pack_plan_json, resize_report_json, resize_summary_text};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "tex-batch",
    about = "Batch-resize and channel-pack game textures",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Hide progress bars (also hidden by --quiet)
    #[arg(long = "no-progress", default_value_t = false, global = true, help_heading = "Logging/UX")]
    no_progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify textures against a target size and print the report (no files written)
    Scan(ResizeArgs),
    /// Resize square power-of-two textures larger than the target size
    Resize(ResizeArgs),
    /// Pack grayscale maps into the R/G/B(/A) channels of one texture per directory
    Pack(PackArgs),
}

#[derive(Parser, Debug, Clone)]
struct CommonArgs {
    /// Root directory to walk
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// YAML config file path (its fields override the command-line options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Exclude directories matching any of these globs
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,
    /// Texture extensions to consider (repeatable), e.g. --ext .tga --ext .png
    #[arg(long = "ext", help_heading = "Input/Output")]
    extensions: Vec<String>,
    /// Output naming: trailing-token | full-stem
    #[arg(long, default_value = "trailing-token", help_heading = "Input/Output")]
    naming: String,
    /// Write the scan result (JSON) to this file
    #[arg(long, help_heading = "Export")]
    report: Option<PathBuf>,
    /// Scan and report but do not write any textures
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
}

#[derive(Parser, Debug, Clone)]
struct ResizeArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Target edge length: 64|128|256|512|1024|2048|4096
    #[arg(short, long, default_value = "1024", help_heading = "Resize")]
    size: String,
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Substring identifying the red channel source
    #[arg(short = 'r', long, default_value = "", help_heading = "Channels")]
    red: String,
    /// Substring identifying the green channel source
    #[arg(short = 'g', long, default_value = "", help_heading = "Channels")]
    green: String,
    /// Substring identifying the blue channel source
    #[arg(short = 'b', long, default_value = "", help_heading = "Channels")]
    blue: String,
    /// Substring identifying the alpha channel source (enables alpha)
    #[arg(short = 'a', long, help_heading = "Channels")]
    alpha: Option<String>,
    /// Suffix appended to the packed texture name
    #[arg(short = 'p', long, default_value = "", help_heading = "Channels")]
    packed_suffix: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    let progress = !cli.no_progress && !cli.quiet;
    match &cli.command {
        Commands::Scan(args) => {
            let mut a = args.clone();
            a.common.dry_run = true;
            run_resize(&a, progress)
        }
        Commands::Resize(args) => run_resize(args, progress),
        Commands::Pack(args) => run_pack(args, progress),
    }
}

fn run_resize(cli: &ResizeArgs, show_progress: bool) -> anyhow::Result<()> {
    let common = &cli.common;
    let target: TextureSize = cli
        .size
        .parse()
        .map_err(|_| anyhow::anyhow!("unsupported texture size: {}", cli.size))?;
    let mut cfg = ResizeConfig::builder()
        .target_size(target)
        .naming(parse_naming(&common.naming)?)
        .build();
    if !common.extensions.is_empty() {
        cfg.extensions = normalize_extensions(&common.extensions);
    }
    if let Some(path) = &common.config {
        let file =
            fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        cfg = y.into_resize_config(cfg)?;
    }
    cfg.validate()?;

    if common.print_config {
        return print_config(&cfg, &common.print_config_format);
    }

    // never set by the CLI
    let cancel = CancelFlag::new();
    let excludes = build_globset(&common.exclude)?;
    let spinner = scan_spinner(show_progress);
    let report = scan_for_resize(&common.input, &cfg, &HeaderReader, &cancel, |listing| {
        visit_dir(listing, excludes.as_ref(), &spinner)
    });
    finish(spinner);
    let report = report?;
    info!(
        larger = report.larger_than_target.len(),
        already_sized = report.already_sized.len(),
        not_pow2 = report.not_power_of_two.len(),
        not_square = report.not_square.len(),
        "scan finished"
    );

    if let Some(path) = &common.report {
        let json = serde_json::to_string_pretty(&resize_report_json(&report, cfg.target_size))?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        info!(?path, "report written");
    }

    if !common.dry_run {
        if report.larger_than_target.is_empty() {
            println!("No textures found to resize");
        } else {
            let naming = cfg.naming.convention();
            let mut editor = LocalEditor::new();
            let bar = progress_bar(report.larger_than_target.len(), show_progress, "resizing");
            let summary = resize_textures(
                &mut editor,
                &report.larger_than_target,
                cfg.target_size,
                &*naming,
                &cancel,
                |p| tick(&bar, &p),
            )?;
            finish(bar);
            info!(written = summary.written.len(), "texture resizing completed");
        }
    }
    print!(
        "{}",
        resize_summary_text(&report, cfg.target_size, !common.dry_run)
    );
    Ok(())
}

fn run_pack(cli: &PackArgs, show_progress: bool) -> anyhow::Result<()> {
    let common = &cli.common;
    let mut cfg = PackConfig::builder()
        .channels(&cli.red, &cli.green, &cli.blue)
        .packed_suffix(&cli.packed_suffix)
        .naming(parse_naming(&common.naming)?)
        .build();
    if let Some(a) = &cli.alpha {
        cfg.alpha = a.clone();
        cfg.alpha_enabled = true;
    }
    if !common.extensions.is_empty() {
        cfg.extensions = normalize_extensions(&common.extensions);
    }
    if let Some(path) = &common.config {
        let file =
            fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        cfg = y.into_pack_config(cfg)?;
    }
    cfg.validate()?;

    if common.print_config {
        return print_config(&cfg, &common.print_config_format);
    }

    let cancel = CancelFlag::new();
    let excludes = build_globset(&common.exclude)?;
    let spinner = scan_spinner(show_progress);
    let found = scan_for_pack(&common.input, &cfg, &cancel, |listing| {
        visit_dir(listing, excludes.as_ref(), &spinner)
    });
    finish(spinner);
    let found = found?;
    info!(count = found.len(), "channel sets found");

    let naming = cfg.naming.convention();
    if let Some(path) = &common.report {
        let json =
            serde_json::to_string_pretty(&pack_plan_json(&found, &cfg.packed_suffix, &*naming))?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        info!(?path, "report written");
    }

    if found.is_empty() {
        anyhow::bail!("No textures were found to pack");
    }

    if common.dry_run {
        for a in &found {
            println!(
                "{}",
                packed_output_path(a, &cfg.packed_suffix, &*naming).display()
            );
        }
        return Ok(());
    }

    let mut editor = LocalEditor::new();
    let bar = progress_bar(found.len(), show_progress, "packing");
    let summary = pack_textures(
        &mut editor,
        &found,
        &cfg.packed_suffix,
        &*naming,
        &cancel,
        |p| tick(&bar, &p),
    )?;
    finish(bar);
    for p in &summary.written {
        println!("{}", p.display());
    }
    info!(written = summary.written.len(), "texture packing completed");
    Ok(())
}

fn scan_spinner(show: bool) -> Option<ProgressBar> {
    if !show {
        return None;
    }
    let b = ProgressBar::new_spinner();
    b.set_style(
        ProgressStyle::with_template("{spinner:.green} scanning [{elapsed_precise}] {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    Some(b)
}

/// Skips directories matching an exclude glob and ticks the scan spinner.
fn visit_dir(listing: &DirListing, exclude: Option<&GlobSet>, spinner: &Option<ProgressBar>) -> DirAction {
    if let Some(ex) = exclude {
        let s = listing.dir.to_string_lossy().replace('\\', "/");
        if ex.is_match(&s) {
            warn!(dir = ?listing.dir, "excluded");
            return DirAction::Skip;
        }
    }
    if let Some(b) = spinner {
        b.set_message(listing.dir.display().to_string());
        b.tick();
    }
    DirAction::Scan
}

fn progress_bar(len: usize, show: bool, label: &str) -> Option<ProgressBar> {
    if !show {
        return None;
    }
    let b = ProgressBar::new(len as u64);
    let template = format!(
        "{{spinner:.green}} {} {{pos}}/{{len}} [{{elapsed_precise}}] {{wide_msg}}",
        label
    );
    b.set_style(
        ProgressStyle::with_template(&template).unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    Some(b)
}

fn tick(bar: &Option<ProgressBar>, p: &RunProgress<'_>) {
    if let Some(b) = bar {
        b.set_position(p.index as u64);
        let name = p.output.file_name().and_then(|s| s.to_str()).unwrap_or("");
        b.set_message(name.to_string());
    }
}

fn finish(bar: Option<ProgressBar>) {
    if let Some(b) = bar {
        b.finish_and_clear();
    }
}

fn build_globset(patterns: &[String]) -> anyhow::Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut b = GlobSetBuilder::new();
    for pat in patterns {
        b.add(Glob::new(pat)?);
    }
    Ok(Some(b.build()?))
}

/// Accepts `tga` or `.tga`.
fn normalize_extensions(exts: &[String]) -> Vec<String> {
    exts.iter()
        .map(|e| {
            if e.starts_with('.') {
                e.clone()
            } else {
                format!(".{}", e)
            }
        })
        .collect()
}

fn parse_naming(s: &str) -> anyhow::Result<NamingKind> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown naming convention: {}", s))
}

fn print_config<T: serde::Serialize>(cfg: &T, format: &str) -> anyhow::Result<()> {
    match format {
        "yaml" => println!("{}", serde_yaml::to_string(cfg)?),
        _ => println!("{}", serde_json::to_string_pretty(cfg)?),
    }
    Ok(())
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    target_size: Option<u32>,
    extensions: Option<Vec<String>>,
    naming: Option<String>,
    red: Option<String>,
    green: Option<String>,
    blue: Option<String>,
    alpha: Option<String>,
    alpha_enabled: Option<bool>,
    packed_suffix: Option<String>,
}

impl YamlConfig {
    fn into_resize_config(self, mut cfg: ResizeConfig) -> anyhow::Result<ResizeConfig> {
        if let Some(v) = self.target_size {
            cfg.target_size = TextureSize::from_pixels(v)
                .ok_or_else(|| anyhow::anyhow!("unsupported texture size: {}", v))?;
        }
        if let Some(v) = self.extensions {
            cfg.extensions = normalize_extensions(&v);
        }
        if let Some(v) = self.naming {
            cfg.naming = parse_naming(&v)?;
        }
        Ok(cfg)
    }

    fn into_pack_config(self, mut cfg: PackConfig) -> anyhow::Result<PackConfig> {
        if let Some(v) = self.red {
            cfg.red = v;
        }
        if let Some(v) = self.green {
            cfg.green = v;
        }
        if let Some(v) = self.blue {
            cfg.blue = v;
        }
        if let Some(v) = self.alpha {
            cfg.alpha = v;
            cfg.alpha_enabled = true;
        }
        if let Some(v) = self.alpha_enabled {
            cfg.alpha_enabled = v;
        }
        if let Some(v) = self.packed_suffix {
            cfg.packed_suffix = v;
        }
        if let Some(v) = self.extensions {
            cfg.extensions = normalize_extensions(&v);
        }
        if let Some(v) = self.naming {
            cfg.naming = parse_naming(&v)?;
        }
        Ok(cfg)
    }
}
