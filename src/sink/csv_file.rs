use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::{AppendOutcome, LogRecord, RecordSink, Schema};
use crate::error::LogError;

/// Appends records to a CSV file, writing the header when the file is new.
///
/// No lock is taken: two processes creating the same missing file at once
/// can both write a header.
pub(crate) struct CsvFileSink {
    path: PathBuf,
    schema: Schema,
}

impl CsvFileSink {
    pub(crate) fn new(path: impl Into<PathBuf>, schema: Schema) -> Self {
        Self {
            path: path.into(),
            schema,
        }
    }

    fn existing_len(&self) -> Result<Option<u64>, LogError> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(Some(meta.len())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn check_header(&self) -> Result<(), LogError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;
        let found = match reader.records().next() {
            Some(record) => record?,
            None => csv::StringRecord::new(),
        };

        let expected = self.schema.headers();
        if found.iter().eq(expected.iter().copied()) {
            return Ok(());
        }
        Err(LogError::HeaderMismatch {
            schema: self.schema.name(),
            expected: expected.join(", "),
            found: found.iter().collect::<Vec<_>>().join(", "),
        })
    }

    fn encode(&self, record: &LogRecord, with_header: bool) -> Result<Vec<u8>, LogError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        if with_header {
            writer.write_record(self.schema.headers())?;
        }
        writer.write_record(self.schema.row(record))?;
        writer.into_inner().map_err(|e| LogError::Io(e.into_error()))
    }
}

fn ends_with_newline(path: &Path) -> io::Result<bool> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

impl RecordSink for CsvFileSink {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn append(&mut self, record: &LogRecord) -> Result<AppendOutcome, LogError> {
        let (outcome, bytes) = match self.existing_len()? {
            None | Some(0) => {
                if let Some(parent) = self.path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    fs::create_dir_all(parent)?;
                }
                (AppendOutcome::Created, self.encode(record, true)?)
            }
            Some(_) => {
                self.check_header()?;
                let mut bytes = Vec::new();
                if !ends_with_newline(&self.path)? {
                    bytes.push(b'\n');
                }
                bytes.extend(self.encode(record, false)?);
                (AppendOutcome::Appended, bytes)
            }
        };

        // The whole row goes out in one write so a failure never leaves half a record.
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&bytes)?;
        file.flush()?;

        tracing::debug!(
            path = %self.path.display(),
            schema = self.schema.name(),
            bytes = bytes.len(),
            created = matches!(outcome, AppendOutcome::Created),
            "appended log row"
        );
        Ok(outcome)
    }
}
