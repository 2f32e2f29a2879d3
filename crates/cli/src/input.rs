//! Input — locating log files and turning byte streams into lines.
//!
//! Agent logs occasionally contain bytes that are not valid UTF-8 (truncated
//! writes, console mojibake). Lines are decoded lossily so one bad byte never
//! aborts a report.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{bail, Context, Result};

use alaslog_engine::{parse, Pipeline};

/// Where the records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    Files(Vec<PathBuf>),
}

/// Most recently modified `*<suffix>` file directly under `dir`.
pub fn find_latest(dir: &Path, suffix: &str) -> Result<PathBuf> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read log directory {}", dir.display()))?;

    let mut latest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(suffix));
        if !matches || !path.is_file() {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .with_context(|| format!("Failed to stat {}", path.display()))?;
        if latest.as_ref().map_or(true, |(best, _)| modified > *best) {
            latest = Some((modified, path));
        }
    }

    match latest {
        Some((_, path)) => Ok(path),
        None => bail!("No *{} log found in {}", suffix, dir.display()),
    }
}

/// Lossy line iterator over a buffered reader.
///
/// Stops at the first I/O error and keeps it for [`LineReader::finish`].
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    error: Option<io::Error>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            error: None,
        }
    }

    /// Surface the I/O error that ended iteration, if any.
    pub fn finish(self) -> io::Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.error.is_some() {
            return None;
        }
        self.buf.clear();
        match self.inner.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                let line = String::from_utf8_lossy(&self.buf);
                Some(line.trim_end_matches(['\n', '\r']).to_string())
            }
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }
}

/// The last `n` lines of `lines`, holding at most `n` in memory.
pub fn tail<I: Iterator<Item = String>>(lines: I, n: usize) -> VecDeque<String> {
    let mut window = VecDeque::with_capacity(n.min(4096));
    for line in lines {
        if window.len() == n {
            window.pop_front();
        }
        window.push_back(line);
    }
    window
}

/// Parse everything `reader` yields into `pipeline`.
pub fn feed_reader<R: BufRead>(
    pipeline: &mut Pipeline,
    reader: R,
    tail_lines: Option<usize>,
) -> Result<()> {
    let mut lines = LineReader::new(reader);
    match tail_lines {
        Some(n) => {
            let window = tail(&mut lines, n);
            pipeline.feed_all(parse(window))?;
        }
        None => {
            pipeline.feed_all(parse(&mut lines))?;
        }
    }
    lines.finish().context("Failed to read input")?;
    Ok(())
}

/// Feed every input of `source` into one pipeline.
pub fn feed_source(pipeline: &mut Pipeline, source: &Source, tail_lines: Option<usize>) -> Result<()> {
    match source {
        Source::Stdin => {
            tracing::info!("reading from stdin");
            feed_reader(pipeline, io::stdin().lock(), tail_lines)
        }
        Source::Files(paths) => {
            tracing::info!(files = paths.len(), "parsing log files");
            for path in paths {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                feed_reader(pipeline, BufReader::new(file), tail_lines)
                    .with_context(|| format!("Failed to parse {}", path.display()))?;
                tracing::debug!(path = %path.display(), records = pipeline.total_records(), "file parsed");
            }
            Ok(())
        }
    }
}
