use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use racechart::{ChartOptions, FrameIndex, FrameRecord, Fps, RaceEngine, Row, Stage};

#[derive(Parser, Debug)]
#[command(name = "racechart", version)]
struct Cli {
    /// Log setup summaries and contract warnings to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the state of the frame containing `--time` as JSON.
    Frame(FrameArgs),
    /// Write one JSON line per video frame for the whole scene.
    Frames(FramesArgs),
}

#[derive(Parser, Debug)]
struct SceneArgs {
    /// Dataset JSON (array of row objects).
    #[arg(long)]
    data: PathBuf,

    /// Metadata JSON (array of row objects with an id and optional `name`).
    #[arg(long)]
    meta: Option<PathBuf>,

    /// Chart options JSON; missing fields take defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Video frame rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Scene duration in seconds.
    #[arg(long)]
    duration: f64,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Scene time in seconds.
    #[arg(long)]
    time: f64,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output JSON-lines path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(serde::Serialize)]
struct FrameDump {
    frame: u64,
    time: f64,
    date: Option<String>,
    bars: Vec<BarDump>,
}

#[derive(serde::Serialize)]
struct BarDump {
    #[serde(flatten)]
    record: FrameRecord,
    label: String,
    value_text: String,
    rect: [f64; 4],
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
    }
}

fn read_rows(path: &Path) -> anyhow::Result<Vec<Row>> {
    let f = File::open(path).with_context(|| format!("open rows '{}'", path.display()))?;
    let rows: Vec<Row> = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse rows JSON '{}'", path.display()))?;
    Ok(rows)
}

fn build_engine(scene: &SceneArgs) -> anyhow::Result<(RaceEngine, Stage)> {
    let rows = read_rows(&scene.data)?;
    let meta = match &scene.meta {
        Some(p) => read_rows(p)?,
        None => Vec::new(),
    };
    let opts: ChartOptions = match &scene.config {
        Some(p) => {
            let f = File::open(p).with_context(|| format!("open config '{}'", p.display()))?;
            serde_json::from_reader(BufReader::new(f)).with_context(|| "parse config JSON")?
        }
        None => ChartOptions::default(),
    };
    let stage = Stage::new(Fps::new(scene.fps, 1)?, scene.duration)?;
    let engine = RaceEngine::new(&rows, &meta, opts, stage)?;
    Ok((engine, stage))
}

fn dump(engine: &RaceEngine, frame: FrameIndex, time: f64, records: Vec<FrameRecord>) -> FrameDump {
    let bars = records
        .into_iter()
        .map(|record| {
            let r = engine.bar_rect(&record);
            BarDump {
                label: engine.label(&record.id),
                value_text: engine.format_value(record.value),
                rect: [r.x0, r.y0, r.x1, r.y1],
                record,
            }
        })
        .collect();
    FrameDump {
        frame: frame.0,
        time,
        date: engine.date_label(time),
        bars,
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (mut engine, stage) = build_engine(&args.scene)?;
    let target = stage.fps.secs_to_frames_floor(args.time.max(0.0));

    // The rank window needs every frame up to the target.
    let mut last = None;
    for f in 0..=target {
        let idx = FrameIndex(f);
        let t = stage.fps.frame_to_secs(idx);
        last = Some((idx, t, engine.frame_at(t)));
    }
    let (idx, t, records) = last.context("no frame computed")?;

    let out = dump(&engine, idx, t, records);
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let (mut engine, stage) = build_engine(&args.scene)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let f = File::create(&args.out)
        .with_context(|| format!("create output '{}'", args.out.display()))?;
    let mut w = BufWriter::new(f);

    let count = stage.frame_count();
    for f in 0..count {
        let idx = FrameIndex(f);
        let t = stage.fps.frame_to_secs(idx);
        let records = engine.frame_at(t);
        serde_json::to_writer(&mut w, &dump(&engine, idx, t, records))?;
        w.write_all(b"\n")?;
    }
    w.flush()?;

    eprintln!("wrote {count} frames to {}", args.out.display());
    Ok(())
}
