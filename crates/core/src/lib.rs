//! Core library for SongSync.
//!
//! SongSync plays an audio track through an external player and, in step
//! with it, writes LED effect commands for 3D printer firmware. Each module
//! owns one piece of that: cue sheet parsing, effect bookkeeping, the control
//! channel, the player process, interruptible waits, and the runner that
//! ties them together.

pub mod config;
pub mod control;
pub mod cue;
pub mod effects;
pub mod error;
pub mod interrupt;
pub mod player;
pub mod runner;

pub use config::{PlayerConfig, RunnerConfig};
pub use control::{ControlChannel, EffectCommand};
pub use cue::{Cue, CueReader};
pub use effects::{ActiveEffects, OffPolicy};
pub use error::{Result, SongSyncError};
pub use interrupt::Interrupt;
pub use player::{PlayerCommand, PlayerControl, PlayerProcess};
pub use runner::{play_show, RunOutcome, RunReport, ScriptRunner};
