use std::{
    fs::File,
    io::{BufRead, BufReader, Lines},
    path::Path,
    time::Duration,
};

use crate::{Result, SongSyncError};

/// A single instruction from a cue sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum Cue {
    /// Block for the given duration before reading the next cue.
    Sleep(Duration),
    /// Start (or restart) the named LED effect.
    On(String),
    /// Stop the named LED effect.
    Off(String),
    /// A well-formed line whose action is not recognised. Skipped by the
    /// runner.
    Unknown { action: String, argument: String },
}

impl Cue {
    /// Parses one `action:argument` line. `line` is the 1-based position used
    /// in error messages.
    ///
    /// The line is split at the first colon. The argument is trimmed; the
    /// action is matched exactly as written.
    pub fn parse(line: usize, text: &str) -> Result<Self> {
        let (action, argument) = text
            .split_once(':')
            .ok_or_else(|| SongSyncError::MissingSeparator {
                line,
                text: text.to_string(),
            })?;
        let argument = argument.trim();

        let cue = match action {
            "sleep" => Cue::Sleep(parse_seconds(line, argument)?),
            "on" => Cue::On(argument.to_string()),
            "off" => Cue::Off(argument.to_string()),
            _ => Cue::Unknown {
                action: action.to_string(),
                argument: argument.to_string(),
            },
        };
        Ok(cue)
    }
}

fn parse_seconds(line: usize, value: &str) -> Result<Duration> {
    let invalid = || SongSyncError::InvalidDuration {
        line,
        value: value.to_string(),
    };
    let seconds: f64 = value.parse().map_err(|_| invalid())?;
    Duration::try_from_secs_f64(seconds).map_err(|_| invalid())
}

/// Lazily parses cues from a line-oriented reader, one line at a time and in
/// file order.
///
/// Yields `(line_number, cue)` pairs. Iteration should stop at the first
/// error; the reader does not attempt to resynchronise.
#[derive(Debug)]
pub struct CueReader<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> CueReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl CueReader<BufReader<File>> {
    /// Opens a cue sheet on disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Iterator for CueReader<R> {
    type Item = Result<(usize, Cue)>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = match self.lines.next()? {
            Ok(text) => text,
            Err(err) => return Some(Err(err.into())),
        };
        self.line += 1;
        Some(Cue::parse(self.line, &text).map(|cue| (self.line, cue)))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use super::*;

    #[test]
    fn parses_each_action() {
        assert_eq!(
            Cue::parse(1, "sleep:2.5").unwrap(),
            Cue::Sleep(Duration::from_millis(2500))
        );
        assert_eq!(Cue::parse(1, "on:ring").unwrap(), Cue::On("ring".into()));
        assert_eq!(Cue::parse(1, "off: ring \r").unwrap(), Cue::Off("ring".into()));
    }

    #[test]
    fn splits_at_first_colon_only() {
        let cue = Cue::parse(1, "on:a:b").unwrap();
        assert_eq!(cue, Cue::On("a:b".into()));
    }

    #[test]
    fn unknown_actions_are_kept_verbatim() {
        let cue = Cue::parse(3, " on:ring").unwrap();
        assert_eq!(
            cue,
            Cue::Unknown {
                action: " on".into(),
                argument: "ring".into()
            }
        );
    }

    #[test]
    fn rejects_missing_separator() {
        let err = Cue::parse(7, "sleep 1").unwrap_err();
        assert!(matches!(err, SongSyncError::MissingSeparator { line: 7, .. }));
        assert!(format!("{err}").contains("line 7"));
    }

    #[test]
    fn rejects_unusable_durations() {
        for value in ["", "soon", "-1", "nan", "inf"] {
            let err = Cue::parse(2, &format!("sleep:{value}")).unwrap_err();
            assert!(
                matches!(err, SongSyncError::InvalidDuration { line: 2, .. }),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn reader_numbers_lines_and_stops_on_blank_line() {
        let mut reader = CueReader::new(Cursor::new("on:a\nsleep:0\n\noff:a\n"));

        assert_eq!(reader.next().unwrap().unwrap(), (1, Cue::On("a".into())));
        assert_eq!(reader.next().unwrap().unwrap(), (2, Cue::Sleep(Duration::ZERO)));
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(err, SongSyncError::MissingSeparator { line: 3, .. }));
    }

    #[test]
    fn trailing_newline_does_not_yield_extra_cue() {
        let cues: Vec<_> = CueReader::new(Cursor::new("on:a\noff:a\n"))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(cues.len(), 2);
    }

    #[test]
    fn opens_cue_sheet_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "on:ring").unwrap();
        writeln!(file, "sleep:1").unwrap();
        writeln!(file, "off:ring").unwrap();

        let cues: Vec<Cue> = CueReader::open(file.path())
            .unwrap()
            .map(|item| item.map(|(_, cue)| cue))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(
            cues,
            vec![
                Cue::On("ring".into()),
                Cue::Sleep(Duration::from_secs(1)),
                Cue::Off("ring".into()),
            ]
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CueReader::open(dir.path().join("absent.songsync")).unwrap_err();
        assert!(matches!(err, SongSyncError::Io(_)));
    }
}
