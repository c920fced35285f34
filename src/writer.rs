use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use log::info;

use crate::error::Result;
use crate::record::{CaseRecord, HEADERS};

/// Appends case rows to a CSV file, writing the header row only when the
/// file is new or empty.
pub struct RecordWriter {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl RecordWriter {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let is_new = std::fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        if is_new {
            writer.write_record(HEADERS)?;
            writer.flush()?;
            info!("Created new CSV file: {:?}", path);
        }
        Ok(RecordWriter { path, writer })
    }

    /// Each row is flushed immediately so a crash keeps earlier rows.
    pub fn write(&mut self, record: &CaseRecord) -> Result<()> {
        self.writer.write_record(record.fields())?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reads every row back, in file order.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<CaseRecord>> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize::<CaseRecord>() {
        records.push(row?);
    }
    Ok(records)
}

/// `decisions.csv` → `decisions_Jan_2025.csv`
pub fn month_file(base: &Path, month: &str, year: u32) -> PathBuf {
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("decisions");
    let name = match base.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}_{}.{}", stem, month, year, ext),
        None => format!("{}_{}_{}", stem, month, year),
    };
    base.with_file_name(name)
}
