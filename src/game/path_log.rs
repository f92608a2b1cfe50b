//! Append-only record of every cell the player has occupied, persisted to a
//! timestamped file when the session ends.

use crate::maze::Cell;
use chrono::Local;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// One visited position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathEntry {
    /// Floor the player was on.
    pub floor: usize,
    /// Row of the occupied cell.
    pub row: usize,
    /// Column of the occupied cell.
    pub col: usize,
}

/// Why a path log could not be written.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The log directory could not be created.
    #[error("could not create log directory {}: {source}", dir.display())]
    CreateDir {
        /// Directory that was being created.
        dir: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// The log file could not be created or written.
    #[error("could not write path log {}: {source}", path.display())]
    WriteFile {
        /// File that was being written.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
}

/// The visited-cell log for one session.
///
/// Single-floor sessions serialize entries as `row,col`; multi-floor sessions
/// prefix each line with the floor index.
#[derive(Debug, Clone)]
pub struct PathLog {
    entries: Vec<PathEntry>,
    multi_floor: bool,
}

impl PathLog {
    /// Creates an empty log.
    pub fn new(multi_floor: bool) -> Self {
        Self {
            entries: Vec::new(),
            multi_floor,
        }
    }

    /// Appends one visited position.
    pub fn record(&mut self, floor: usize, cell: Cell) {
        self.entries.push(PathEntry {
            floor,
            row: cell.row,
            col: cell.col,
        });
    }

    /// Recorded entries, oldest first.
    pub fn entries(&self) -> &[PathEntry] {
        &self.entries
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes one entry as a log line.
    fn format_entry(&self, entry: &PathEntry) -> String {
        if self.multi_floor {
            format!("{},{},{}", entry.floor, entry.row, entry.col)
        } else {
            format!("{},{}", entry.row, entry.col)
        }
    }

    /// Writes the log into `dir`, one entry per line.
    ///
    /// # File Naming
    ///
    /// Files are named with the local date and time, for example
    /// `Route_08-26-26_03-41-22PM.txt`.
    ///
    /// # Returns
    ///
    /// The path of the written file.
    pub fn save_to_dir(&self, dir: &Path) -> Result<PathBuf, PersistError> {
        fs::create_dir_all(dir).map_err(|source| PersistError::CreateDir {
            dir: dir.to_path_buf(),
            source,
        })?;

        let file_name = Local::now().format("Route_%m-%d-%y_%I-%M-%S%p.txt").to_string();
        let path = dir.join(file_name);
        let write = |path: &PathBuf| -> io::Result<()> {
            let mut file = File::create(path)?;
            for entry in &self.entries {
                writeln!(file, "{}", self.format_entry(entry))?;
            }
            Ok(())
        };
        write(&path).map_err(|source| PersistError::WriteFile {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_floor_lines_carry_the_floor_index() {
        let mut log = PathLog::new(true);
        log.record(0, Cell::new(19, 1));
        log.record(0, Cell::new(18, 1));
        log.record(1, Cell::new(18, 1));
        let lines: Vec<String> = log.entries.iter().map(|e| log.format_entry(e)).collect();
        assert_eq!(lines, ["0,19,1", "0,18,1", "1,18,1"]);
    }

    #[test]
    fn single_floor_lines_omit_the_floor_index() {
        let mut log = PathLog::new(false);
        log.record(0, Cell::new(19, 1));
        log.record(0, Cell::new(19, 2));
        let lines: Vec<String> = log.entries.iter().map(|e| log.format_entry(e)).collect();
        assert_eq!(lines, ["19,1", "19,2"]);
    }

    #[test]
    fn save_writes_one_entry_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = PathLog::new(true);
        log.record(0, Cell::new(1, 1));
        log.record(2, Cell::new(0, 7));
        let path = log.save_to_dir(dir.path()).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "0,1,1\n2,0,7\n");
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("Route_"), "unexpected file name {name}");
        assert!(name.ends_with(".txt"));
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("logs").join("today");
        let mut log = PathLog::new(false);
        log.record(0, Cell::new(3, 3));
        let path = log.save_to_dir(&nested).unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }

    #[test]
    fn save_reports_unwritable_directories() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the directory should be forces the create to fail.
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"x").unwrap();
        let log = PathLog::new(false);
        let err = log.save_to_dir(&blocker).unwrap_err();
        assert!(matches!(err, PersistError::CreateDir { .. }));
    }
}
