//! The script runner: plays a track and fires LED cues against it.
//!
//! Timing is open loop. The runner never asks the player where it is in the
//! track; cue sheet `sleep` durations alone keep the lights in step with the
//! music.

use std::{io::Write, path::Path};

use crate::{
    ActiveEffects, ControlChannel, Cue, CueReader, Interrupt, PlayerCommand, PlayerControl,
    PlayerProcess, Result, RunnerConfig,
};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every cue in the sheet was processed.
    Completed,
    /// The operator interrupted the run and active effects were stopped.
    Interrupted,
}

/// Summary returned once a run finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Number of cue lines processed, unknown actions included.
    pub cues: usize,
    /// Effects switched off during interrupt cleanup.
    pub stopped: Vec<String>,
}

/// Drives one show: an audio player plus a control channel of LED commands.
#[derive(Debug)]
pub struct ScriptRunner<W, P> {
    config: RunnerConfig,
    control: ControlChannel<W>,
    player: P,
    interrupt: Interrupt,
    effects: ActiveEffects,
}

impl<W: Write, P: PlayerControl> ScriptRunner<W, P> {
    pub fn new(config: RunnerConfig, control: W, player: P, interrupt: Interrupt) -> Self {
        let effects = ActiveEffects::with_policy(config.off_policy);
        Self {
            config,
            control: ControlChannel::new(control),
            player,
            interrupt,
            effects,
        }
    }

    /// Plays `audio_path` while stepping through the cue sheet at `cue_path`.
    pub fn run(&mut self, cue_path: &Path, audio_path: &Path) -> Result<RunReport> {
        let cues = CueReader::open(cue_path)?;
        self.perform(cues, audio_path)
    }

    /// Starts playback, then steps through `cues`.
    fn perform<I>(&mut self, cues: I, audio_path: &Path) -> Result<RunReport>
    where
        I: IntoIterator<Item = Result<(usize, Cue)>>,
    {
        if !self.start_playback(audio_path)? {
            return Ok(self.abort(0));
        }
        self.run_cues(cues)
    }

    /// Loads the track, waits out the startup delay and starts playback.
    ///
    /// Returns `false` if interrupted before playback began.
    pub fn start_playback(&mut self, audio_path: &Path) -> Result<bool> {
        self.player.send(&PlayerCommand::load(audio_path))?;
        if !self.interrupt.sleep(self.config.startup_delay) {
            return Ok(false);
        }
        self.player.send(&PlayerCommand::Play)?;
        tracing::info!(audio = %audio_path.display(), "playback started");
        Ok(true)
    }

    /// Processes cues in order until the sheet ends, a cue fails or the run
    /// is interrupted.
    pub fn run_cues<I>(&mut self, cues: I) -> Result<RunReport>
    where
        I: IntoIterator<Item = Result<(usize, Cue)>>,
    {
        let mut processed = 0;

        for item in cues {
            if self.interrupt.is_triggered() {
                return Ok(self.abort(processed));
            }

            let (line, cue) = item?;
            tracing::debug!(line, ?cue, "cue");

            match cue {
                Cue::Sleep(duration) => {
                    if !self.interrupt.sleep(duration) {
                        return Ok(self.abort(processed + 1));
                    }
                }
                Cue::On(name) => {
                    self.control.start_effect(&name)?;
                    self.effects.activate(&name);
                }
                Cue::Off(name) => {
                    self.control.stop_effect(&name)?;
                    self.effects.deactivate(&name)?;
                }
                Cue::Unknown { action, .. } => {
                    tracing::debug!(line, action = %action, "skipping unrecognised cue");
                }
            }
            processed += 1;
        }

        Ok(RunReport {
            outcome: RunOutcome::Completed,
            cues: processed,
            stopped: Vec::new(),
        })
    }

    /// Stops every active effect. Write failures are logged and skipped so
    /// that as many effects as possible are switched off.
    fn abort(&mut self, processed: usize) -> RunReport {
        let stopped = self.effects.drain();
        for name in &stopped {
            if let Err(err) = self.control.stop_effect(name) {
                tracing::warn!(effect = %name, %err, "failed to stop effect");
            }
        }

        RunReport {
            outcome: RunOutcome::Interrupted,
            cues: processed,
            stopped,
        }
    }

    pub fn active_effects(&self) -> &ActiveEffects {
        &self.effects
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    /// Consumes the runner and returns the control channel writer.
    pub fn into_control(self) -> W {
        self.control.into_inner()
    }
}

/// Runs a show against a spawned audio player.
///
/// The cue sheet is opened before the player starts. The player process is
/// shut down when this returns, whichever way the run ends.
pub fn play_show<W: Write>(
    config: RunnerConfig,
    cue_path: &Path,
    audio_path: &Path,
    control: W,
    interrupt: Interrupt,
) -> Result<RunReport> {
    let cues = CueReader::open(cue_path)?;
    let player = PlayerProcess::spawn(&config.player)?;
    tracing::info!(pid = player.id(), program = %config.player.program, "audio player started");

    ScriptRunner::new(config, control, player, interrupt).perform(cues, audio_path)
}
