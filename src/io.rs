//! Reading interaction logs and writing result tables.
//!
//! Input is headerless comma-separated text with two integer fields per
//! line. Output is a directory holding one headerless CSV part file and a
//! `_SUCCESS` marker, the layout batch engines conventionally produce.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::MalformedRowPolicy;
use crate::error::{LlrError, Result};
use crate::interactions::{EntityId, Interaction, Interactions};
use crate::observe::{PipelineEvent, Reporter, Stage};

/// Name of the part file inside an output directory.
pub const PART_FILE: &str = "part-00000.csv";

/// Name of the completion marker inside an output directory.
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Outcome of parsing an interaction log.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Deduplicated interactions
    pub interactions: Interactions,
    /// Records seen, including skipped ones
    pub rows_read: usize,
    /// Malformed records dropped
    pub rows_skipped: usize,
    /// Well-formed records collapsed as duplicates
    pub duplicates: usize,
}

/// Parses raw two-field records into deduplicated interactions.
///
/// # Examples
///
/// ```
/// use llr_similarity::config::MalformedRowPolicy;
/// use llr_similarity::io::PairExtractor;
/// use llr_similarity::observe::NullReporter;
///
/// let input = "1,10\n1,10\n2,eleven\n2,11\n";
/// let extraction = PairExtractor::new(MalformedRowPolicy::Skip)
///     .extract(input.as_bytes(), &NullReporter)
///     .expect("skip policy tolerates bad rows");
///
/// assert_eq!(extraction.interactions.len(), 2);
/// assert_eq!(extraction.rows_skipped, 1);
/// assert_eq!(extraction.duplicates, 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PairExtractor {
    policy: MalformedRowPolicy,
}

impl PairExtractor {
    /// Create an extractor applying `policy` to malformed rows.
    pub fn new(policy: MalformedRowPolicy) -> Self {
        Self { policy }
    }

    /// Parse the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened, or
    /// [`LlrError::InputFormat`] under [`MalformedRowPolicy::Fail`].
    pub fn extract_path<P: AsRef<Path>>(
        &self,
        path: P,
        reporter: &dyn Reporter,
    ) -> Result<Extraction> {
        let file = File::open(path.as_ref())?;
        self.extract(file, reporter)
    }

    /// Parse records from `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`LlrError::InputFormat`] for the first malformed record
    /// under [`MalformedRowPolicy::Fail`]. A failing read is always fatal,
    /// whatever the policy.
    pub fn extract<R: Read>(&self, reader: R, reporter: &dyn Reporter) -> Result<Extraction> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        let mut rows_read = 0usize;
        let mut rows_skipped = 0usize;

        for result in csv_reader.records() {
            rows_read += 1;
            let parsed = match result {
                Ok(record) => {
                    let line = record.position().map_or(rows_read as u64, |p| p.line());
                    parse_record(&record).map_err(|cause| (line, cause))
                }
                Err(err) if err.is_io_error() => return Err(LlrError::from(err)),
                Err(err) => {
                    let line = err.position().map_or(rows_read as u64, |p| p.line());
                    Err((line, err.to_string()))
                }
            };

            match parsed {
                Ok(interaction) => records.push(interaction),
                Err((line, cause)) => match self.policy {
                    MalformedRowPolicy::Fail => return Err(LlrError::InputFormat { line, cause }),
                    MalformedRowPolicy::Skip => {
                        rows_skipped += 1;
                        reporter.report(&PipelineEvent::RowSkipped { line, cause });
                    }
                },
            }
        }

        let parsed_rows = records.len();
        let interactions = Interactions::from_records(records);
        reporter.report(&PipelineEvent::StageFinished {
            stage: Stage::Extract,
            rows: interactions.len(),
        });

        Ok(Extraction {
            duplicates: parsed_rows - interactions.len(),
            interactions,
            rows_read,
            rows_skipped,
        })
    }
}

fn parse_record(record: &csv::StringRecord) -> std::result::Result<Interaction, String> {
    if record.len() != 2 {
        return Err(format!("expected 2 fields, found {}", record.len()));
    }
    let user = parse_id(&record[0], "user")?;
    let item = parse_id(&record[1], "item")?;
    Ok(Interaction::new(user, item))
}

fn parse_id(field: &str, name: &str) -> std::result::Result<EntityId, String> {
    field
        .parse()
        .map_err(|_| format!("invalid {name} id: {field:?}"))
}

/// Fail if `path` already holds results.
///
/// An empty directory is accepted; any file or non-empty directory is not.
///
/// # Errors
///
/// Returns [`LlrError::OutputExists`], or an I/O error if the directory
/// cannot be listed.
pub fn ensure_absent<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(());
    }
    if path.is_dir() && fs::read_dir(path)?.next().is_none() {
        return Ok(());
    }
    Err(LlrError::OutputExists(path.to_path_buf()))
}

/// Writes a result table into an output directory.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    dir: PathBuf,
}

impl ResultWriter {
    /// Target `dir`, which must not already hold results.
    ///
    /// # Errors
    ///
    /// See [`ensure_absent`].
    pub fn create<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        ensure_absent(&dir)?;
        Ok(Self { dir })
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write every row, then publish the part file and the success marker.
    ///
    /// Rows are staged in a hidden temporary file that is renamed into place
    /// only once complete, so a failure never leaves a partial part file.
    ///
    /// # Errors
    ///
    /// Returns an I/O or CSV error; the output directory then holds no part
    /// file.
    pub fn write<T: Serialize>(&self, rows: &[T], reporter: &dyn Reporter) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let staging = self.dir.join(format!(".{PART_FILE}.inprogress"));
        let part = self.dir.join(PART_FILE);

        if let Err(err) = write_rows(&staging, rows) {
            // Best effort; the write error is what matters.
            let _ = fs::remove_file(&staging);
            return Err(err);
        }
        fs::rename(&staging, &part)?;
        File::create(self.dir.join(SUCCESS_MARKER))?;

        reporter.report(&PipelineEvent::StageFinished {
            stage: Stage::Write,
            rows: rows.len(),
        });
        Ok(part)
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    let mut inner = writer
        .into_inner()
        .map_err(|err| LlrError::Io(err.into_error()))?;
    inner.flush()?;
    inner.get_ref().sync_all()?;
    Ok(())
}
