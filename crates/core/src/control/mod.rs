use std::{fmt, io::Write};

use crate::Result;

/// A command for the firmware's LED effect macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectCommand<'a> {
    Start(&'a str),
    Stop(&'a str),
}

impl fmt::Display for EffectCommand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectCommand::Start(name) => write!(f, "SET_LED_EFFECT EFFECT={name} RESTART=1"),
            EffectCommand::Stop(name) => write!(f, "SET_LED_EFFECT EFFECT={name} STOP=1"),
        }
    }
}

/// Line-oriented writer for the printer control channel.
///
/// Every command is flushed as soon as it is written so the firmware sees it
/// at the moment the cue fires.
#[derive(Debug)]
pub struct ControlChannel<W> {
    out: W,
}

impl<W: Write> ControlChannel<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn send(&mut self, command: EffectCommand<'_>) -> Result<()> {
        writeln!(self.out, "{command}")?;
        self.out.flush()?;
        Ok(())
    }

    pub fn start_effect(&mut self, name: &str) -> Result<()> {
        self.send(EffectCommand::Start(name))
    }

    pub fn stop_effect(&mut self, name: &str) -> Result<()> {
        self.send(EffectCommand::Stop(name))
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
