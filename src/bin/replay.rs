use clap::Parser;
use pieboard::config::BoardConfig;
use pieboard::script::{run_script, Script};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pieboard-replay", about = "Replay a JSON event script through a board and print snapshots")]
struct Args {
    /// Script file (config, position, validator, events)
    script: PathBuf,
    /// Board config overriding the script's own
    #[arg(long)]
    config: Option<PathBuf>,
    /// Emit one JSON object per step instead of text boards
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let a = Args::parse();
    let mut script = Script::from_json_file(&a.script)?;
    if let Some(path) = a.config {
        script.config = BoardConfig::from_json_file(path)?;
    }
    eprintln!(
        "Replaying {} events from {} (validator={:?})",
        script.events.len(),
        a.script.display(),
        script.validator
    );

    for (i, step) in run_script(&script)?.iter().enumerate() {
        if a.json {
            println!("{}", serde_json::to_string(step)?);
            continue;
        }
        let snap = &step.snapshot;
        println!("#{i} {:?}", step.event);
        print!("{}", snap.position);
        let queued: Vec<String> =
            snap.premoves.iter().map(|p| format!("{}{}{}", p.piece, p.source, p.target)).collect();
        println!(
            "mover={} animating={} manual_drop={} premoves=[{}]",
            snap.mover.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
            snap.animating,
            snap.manual_drop,
            queued.join(" ")
        );
        println!();
    }
    Ok(())
}
