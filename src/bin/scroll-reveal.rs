use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scroll-reveal", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and validate a page configuration.
    Validate(ValidateArgs),
    /// Mount a page on a headless host, scroll through it, and dump the effect stream as JSON.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input page JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input page JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Viewport height in px. Every section is laid out one viewport tall.
    #[arg(long, default_value_t = 900.0)]
    viewport_height: f64,

    /// Scroll offsets to visit, in order (px).
    #[arg(long, value_delimiter = ',', default_value = "0")]
    scroll: Vec<f64>,

    /// Animation frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Frames to advance after each scroll step.
    #[arg(long, default_value_t = 60)]
    frames_per_step: u32,

    /// Simulate a host without visibility detection.
    #[arg(long)]
    no_intersection: bool,

    /// Deliver scroll offsets at most once per frame (overrides the page config).
    #[arg(long)]
    coalesce: bool,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn read_page_json(path: &Path) -> anyhow::Result<scroll_reveal::PageSpec> {
    let f = File::open(path).with_context(|| format!("open page '{}'", path.display()))?;
    let r = BufReader::new(f);
    let page: scroll_reveal::PageSpec =
        serde_json::from_reader(r).with_context(|| "parse page JSON")?;
    Ok(page)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let page = read_page_json(&args.in_path)?;
    page.validate()?;
    let targets: usize = page.sections.iter().map(|s| s.element_ids().count()).sum();
    eprintln!(
        "ok: {} sections, {} reveal targets, {} parallax layers",
        page.sections.len(),
        targets,
        page.sections.iter().filter(|s| s.parallax.is_some()).count()
    );
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    if args.fps == 0 {
        anyhow::bail!("--fps must be > 0");
    }
    if !(args.viewport_height > 0.0) {
        anyhow::bail!("--viewport-height must be > 0");
    }

    let mut page = read_page_json(&args.in_path)?;
    if args.coalesce {
        page.tracker.coalesce = scroll_reveal::CoalescePolicy::PerAnimationFrame;
    }

    let host = scroll_reveal::SimHost::with_capabilities(
        args.viewport_height,
        true,
        !args.no_intersection,
    );
    host.layout_page(&page);
    let log = Rc::new(scroll_reveal::EffectLog::new());
    let session =
        scroll_reveal::PageSession::mount(&page, host.clone(), host.visibility(), log.clone())?;

    let frame_s = 1.0 / f64::from(args.fps);
    let mut frame: u64 = 0;
    for &offset in &args.scroll {
        let reached = host.scroll_to(offset);
        tracing::info!(requested = offset, reached, "scrolled");
        for _ in 0..args.frames_per_step {
            frame += 1;
            session.advance_frame(frame as f64 * frame_s);
        }
    }
    session.unmount();

    let json = log.to_json_pretty()?;
    match &args.out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(out, json.as_bytes())
                .with_context(|| format!("write effects '{}'", out.display()))?;
            eprintln!("wrote {} effects to {}", log.len(), out.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}
