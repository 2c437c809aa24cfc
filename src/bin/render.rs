//! 保存済みスナップショットから原稿を作って標準出力に書き出す。

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use clap::Parser;

use weather_script::{
    forecast::collector::{SnapshotSource, StaticSnapshotSource},
    script::{self, DEFAULT_TARGET_CHARS, PhrasePicker, RandomPicker},
    util::time::now_jst,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// WeatherSnapshot JSON file
    #[arg(long, env = "WEATHER_SNAPSHOT_PATH")]
    snapshot: PathBuf,

    /// Target character count for the whole script
    #[arg(long, env = "SCRIPT_TARGET_CHARS", default_value_t = DEFAULT_TARGET_CHARS)]
    target: usize,

    /// Regeneration instructions (e.g. 「簡潔に」, 「詳しく」)
    #[arg(long)]
    instructions: Option<String>,

    /// Seed for phrase selection; omit for OS entropy
    #[arg(long)]
    seed: Option<u64>,

    /// Broadcast time (RFC 3339); defaults to now in JST
    #[arg(long)]
    at: Option<String>,

    /// Print the script record as JSON instead of the export text
    #[arg(long)]
    json: bool,
}

fn broadcast_time(raw: Option<&str>) -> Result<DateTime<FixedOffset>> {
    match raw {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("invalid --at timestamp: {raw}")),
        None => Ok(now_jst()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.target == 0 {
        anyhow::bail!("--target must be greater than zero");
    }

    let snapshot = StaticSnapshotSource::new(&cli.snapshot).snapshot().await?;
    let now = broadcast_time(cli.at.as_deref())?;
    let mut picker: Box<dyn PhrasePicker> = match cli.seed {
        Some(seed) => Box::new(RandomPicker::seeded(seed)),
        None => Box::new(RandomPicker::from_entropy()),
    };

    let record = match cli.instructions.as_deref() {
        Some(instructions) => {
            script::regenerate(&snapshot, &now, instructions, cli.target, picker.as_mut())
        }
        None => script::generate(&snapshot, &now, cli.target, picker.as_mut()),
    };

    if cli.json {
        let rendered =
            serde_json::to_string_pretty(&record).context("failed to serialize script record")?;
        println!("{rendered}");
    } else {
        print!("{}", record.export_text());
    }
    Ok(())
}
