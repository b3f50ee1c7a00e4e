use std::{
    fmt,
    io::Write,
    path::Path,
    process::{Child, ChildStdin, Command, ExitStatus, Stdio},
};

use crate::{PlayerConfig, Result, SongSyncError};

/// Commands understood by a player running in remote-control mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Load (and cue) an audio file.
    Load(String),
    /// Toggle pause. Sent once after loading to begin playback.
    Play,
}

impl PlayerCommand {
    pub fn load(path: impl AsRef<Path>) -> Self {
        Self::Load(path.as_ref().display().to_string())
    }
}

impl fmt::Display for PlayerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerCommand::Load(path) => write!(f, "LP {path}"),
            PlayerCommand::Play => f.write_str("P"),
        }
    }
}

/// Anything that accepts player commands. Implemented by [`PlayerProcess`]
/// and by in-memory recorders in tests.
pub trait PlayerControl {
    fn send(&mut self, command: &PlayerCommand) -> Result<()>;
}

/// An audio player child process driven through its standard input.
///
/// The process is closed when the handle is dropped: stdin is closed, then
/// the child is killed and reaped.
#[derive(Debug)]
pub struct PlayerProcess {
    child: Child,
    stdin: Option<ChildStdin>,
}

impl PlayerProcess {
    pub fn spawn(config: &PlayerConfig) -> Result<Self> {
        tracing::debug!(program = %config.program, args = ?config.args, "spawning audio player");

        let mut child = Command::new(&config.program)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|source| SongSyncError::PlayerSpawn {
                program: config.program.clone(),
                source,
            })?;
        let stdin = child.stdin.take();
        if stdin.is_none() {
            let _ = child.kill();
            let _ = child.wait();
            return Err(SongSyncError::msg("audio player has no stdin pipe"));
        }

        Ok(Self { child, stdin })
    }

    /// OS process id of the player.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    fn close(&mut self) -> std::io::Result<ExitStatus> {
        drop(self.stdin.take());
        if let Some(status) = self.child.try_wait()? {
            return Ok(status);
        }
        self.child.kill()?;
        self.child.wait()
    }
}

impl PlayerControl for PlayerProcess {
    fn send(&mut self, command: &PlayerCommand) -> Result<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| SongSyncError::msg("audio player input is closed"))?;
        tracing::debug!(%command, "player command");
        writeln!(stdin, "{command}")?;
        stdin.flush()?;
        Ok(())
    }
}

impl Drop for PlayerProcess {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::warn!(%err, "failed to stop audio player");
        }
    }
}
