// 🗄️ Line Stores - where the flat files actually live
//
// AccountRepository and TransactionLog never touch the filesystem directly.
// They talk to a LineStore, so the same ledger code runs against real files
// or against an in-memory fake in tests.

use anyhow::{anyhow, Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

// ============================================================================
// STORE TRAIT
// ============================================================================

/// LineStore - a persisted sequence of text lines
pub trait LineStore: Send + Sync {
    /// Read the whole store as text (lines separated by '\n')
    fn read_all(&self) -> Result<String>;

    /// Replace the entire store with `lines`, one per line
    fn replace_all(&self, lines: &[String]) -> Result<()>;

    /// Add one line at the end of the store
    fn append_line(&self, line: &str) -> Result<()>;

    /// Human-readable location for logs and error context
    fn describe(&self) -> String;
}

// ============================================================================
// FILE STORE
// ============================================================================

/// FileStore - one flat text file on disk
///
/// Rewrites go through a temporary sibling file that is renamed over the
/// original, so a crash mid-rewrite leaves either the old or the new file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("store");
        let temp_name = format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4());
        self.path.with_file_name(temp_name)
    }
}

impl LineStore for FileStore {
    fn read_all(&self) -> Result<String> {
        if !self.path.exists() {
            File::create(&self.path)
                .with_context(|| format!("Failed to create file: {}", self.path.display()))?;
            return Ok(String::new());
        }

        fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read file: {}", self.path.display()))
    }

    fn replace_all(&self, lines: &[String]) -> Result<()> {
        let temp_path = self.temp_path();

        let mut content = String::new();
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }

        let write_result = (|| -> Result<()> {
            let mut file = File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
            Ok(())
        })();

        if let Err(err) = write_result {
            let _ = fs::remove_file(&temp_path);
            return Err(err)
                .with_context(|| format!("Failed to write temporary file: {}", temp_path.display()));
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to replace {} with {}",
                self.path.display(),
                temp_path.display()
            )
        })
    }

    fn append_line(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open file for append: {}", self.path.display()))?;

        // A crash during an earlier append can leave a partial last line
        let mut needs_newline = false;
        let len = file
            .metadata()
            .with_context(|| format!("Failed to stat file: {}", self.path.display()))?
            .len();
        if len > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1))
                .and_then(|_| file.read_exact(&mut last))
                .with_context(|| format!("Failed to read last byte of: {}", self.path.display()))?;
            needs_newline = last[0] != b'\n';
        }

        let mut record = String::with_capacity(line.len() + 2);
        if needs_newline {
            record.push('\n');
        }
        record.push_str(line);
        record.push('\n');

        file.write_all(record.as_bytes())
            .with_context(|| format!("Failed to append to file: {}", self.path.display()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ============================================================================
// MEMORY STORE
// ============================================================================

/// MemoryStore - in-process stand-in for a flat file
#[derive(Debug, Default)]
pub struct MemoryStore {
    lines: RwLock<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with raw lines (malformed ones included)
    pub fn from_lines(lines: &[&str]) -> Self {
        MemoryStore {
            lines: RwLock::new(lines.iter().map(|l| l.to_string()).collect()),
        }
    }

    /// Snapshot of the current lines
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .read()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl LineStore for MemoryStore {
    fn read_all(&self) -> Result<String> {
        let lines = self
            .lines
            .read()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;

        let mut content = String::new();
        for line in lines.iter() {
            content.push_str(line);
            content.push('\n');
        }
        Ok(content)
    }

    fn replace_all(&self, lines: &[String]) -> Result<()> {
        let mut stored = self
            .lines
            .write()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        *stored = lines.to_vec();
        Ok(())
    }

    fn append_line(&self, line: &str) -> Result<()> {
        self.lines
            .write()
            .map_err(|_| anyhow!("memory store lock poisoned"))?
            .push(line.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

/// Shared stores, so a test can keep a handle while the repository owns one
impl<S: LineStore + ?Sized> LineStore for std::sync::Arc<S> {
    fn read_all(&self) -> Result<String> {
        (**self).read_all()
    }

    fn replace_all(&self, lines: &[String]) -> Result<()> {
        (**self).replace_all(lines)
    }

    fn append_line(&self, line: &str) -> Result<()> {
        (**self).append_line(line)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
