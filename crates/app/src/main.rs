use std::{io, path::PathBuf, time::Duration};

use clap::Parser;
use songsync_core::{play_show, Interrupt, OffPolicy, RunOutcome, RunnerConfig};
use tracing_subscriber::EnvFilter;

fn main() -> songsync_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.runner_config()?;
    let interrupt = Interrupt::install_ctrlc()?;

    tracing::info!(
        cues = ?cli.cue_script,
        audio = ?cli.audio,
        player = %config.player.program,
        "starting show"
    );

    let stdout = io::stdout().lock();
    let report = play_show(config, &cli.cue_script, &cli.audio, stdout, interrupt)?;

    match report.outcome {
        RunOutcome::Completed => tracing::info!(cues = report.cues, "show finished"),
        RunOutcome::Interrupted => tracing::info!(
            cues = report.cues,
            stopped = ?report.stopped,
            "show interrupted"
        ),
    }
    Ok(())
}

// stdout carries the control channel, so logs go to stderr.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Play a song and fire printer LED effects in time with it",
    long_about = None
)]
struct Cli {
    /// Cue sheet with one `action:argument` cue per line.
    cue_script: PathBuf,
    /// Audio file handed to the player.
    audio: PathBuf,
    /// Player executable; must accept `LP <path>` and `P` on stdin in `-R` mode.
    #[arg(long, default_value = "mpg123")]
    player: String,
    /// Seconds to wait between loading the track and starting playback.
    #[arg(long, default_value_t = 1.0)]
    startup_delay: f64,
    /// Warn instead of failing when an `off` cue names an inactive effect.
    #[arg(long)]
    lenient_off: bool,
}

impl Cli {
    fn runner_config(&self) -> songsync_core::Result<RunnerConfig> {
        let mut config = RunnerConfig::default();
        config.player.program = self.player.clone();
        config.startup_delay = Duration::try_from_secs_f64(self.startup_delay).map_err(|_| {
            format!("invalid --startup-delay {}", self.startup_delay)
        })?;
        if self.lenient_off {
            config.off_policy = OffPolicy::Lenient;
        }
        Ok(config)
    }
}
