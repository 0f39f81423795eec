//! Append-only history of submitted measurements
//!
//! Every successful "set data" action adds one row to a CSV file whose header
//! is the feature schema. Rows are never rewritten or deduplicated. The file
//! is read back through Arrow, and can be exported to Parquet for analysis.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use log::debug;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::error::util::{open_for_append, safe_open_file};
use crate::error::{Result, RiskError};
use crate::input::MedicalForm;
use crate::models::FeatureVector;
use crate::schema::FeatureSchema;
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Flat CSV record store keyed by nothing; one row per submission
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    schema: FeatureSchema,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>, schema: FeatureSchema) -> Self {
        Self {
            path: path.into(),
            schema,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record
    pub fn append(&self, record: &FeatureVector) -> Result<()> {
        self.append_all(std::slice::from_ref(record))
    }

    /// Append records in order. The header is written only when the file is
    /// new; an existing file must already carry the schema header.
    pub fn append_all(&self, records: &[FeatureVector]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let (file, is_new) = open_for_append(&self.path, "appending history")?;
        if !is_new {
            self.verify_header()?;
        }

        let batch = self.to_batch(records)?;
        let mut writer = WriterBuilder::new().with_header(is_new).build(file);
        writer.write(&batch)?;

        debug!(
            "Appended {} record(s) to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Read every stored record in insertion order. A missing file is an
    /// empty history.
    pub fn read_all(&self) -> Result<Vec<FeatureVector>> {
        let records = self
            .read_batches()?
            .iter()
            .map(|batch| {
                serde_arrow::from_record_batch::<Vec<MedicalForm>>(batch)
                    .map_err(RiskError::from)
            })
            .flatten_ok()
            .map_ok(|form| form.to_vector())
            .collect::<Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Number of stored records
    pub fn len(&self) -> Result<usize> {
        Ok(self.read_batches()?.iter().map(RecordBatch::num_rows).sum())
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|n| n == 0)
    }

    /// Read the history as Arrow record batches
    pub fn read_batches(&self) -> Result<Vec<RecordBatch>> {
        if !self.path.exists() {
            log_warning("History file does not exist yet", Some(&self.path));
            return Ok(Vec::new());
        }

        let start = Instant::now();
        log_operation_start("Reading history from", &self.path);
        if !self.verify_header()? {
            return Ok(Vec::new());
        }

        let file = safe_open_file(&self.path, "reading history")?;
        let reader = ReaderBuilder::new(self.schema.arrow_schema())
            .with_header(true)
            .build(file)?;
        let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

        let rows = batches.iter().map(RecordBatch::num_rows).sum();
        log_operation_complete("read", &self.path, rows, Some(start.elapsed()));
        Ok(batches)
    }

    /// Write the whole history to a Parquet file. Returns the row count.
    pub fn export_parquet(&self, out: &Path) -> Result<usize> {
        let batches = self.read_batches()?;
        let file = File::create(out)
            .map_err(|e| RiskError::io(format!("Failed to create {}", out.display()), e))?;

        let props = WriterProperties::builder().build();
        let mut writer = ArrowWriter::try_new(file, self.schema.arrow_schema(), Some(props))?;
        for batch in &batches {
            writer.write(batch)?;
        }
        writer.close()?;

        let rows = batches.iter().map(RecordBatch::num_rows).sum();
        log_operation_complete("exported", out, rows, None);
        Ok(rows)
    }

    fn to_batch(&self, records: &[FeatureVector]) -> Result<RecordBatch> {
        let forms = records.iter().map(MedicalForm::from).collect_vec();
        let schema = self.schema.arrow_schema();
        Ok(serde_arrow::to_record_batch(schema.fields(), &forms)?)
    }

    /// Check the first line of the file against the schema.
    ///
    /// Returns `false` for an empty file, errors on a mismatching header.
    fn verify_header(&self) -> Result<bool> {
        let file = safe_open_file(&self.path, "reading history header")?;
        let mut first_line = String::new();
        BufReader::new(file)
            .read_line(&mut first_line)
            .map_err(|e| RiskError::io(format!("Failed to read {}", self.path.display()), e))?;

        let first_line = first_line.trim_end_matches(['\r', '\n']);
        if first_line.is_empty() {
            return Ok(false);
        }

        let header = first_line.split(',').collect_vec();
        self.schema.check_header(&header).map_err(|e| match e {
            RiskError::SchemaError(reason) => {
                RiskError::SchemaError(format!("history file {}: {reason}", self.path.display()))
            }
            other => other,
        })?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn store(dir: &Path) -> HistoryStore {
        HistoryStore::new(dir.join("user_data.csv"), FeatureSchema::canonical())
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let history = store(dir.path());
        let record = FeatureVector::new([6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0]);

        history.append(&record).unwrap();
        history.append(&record).unwrap();

        let content = fs::read_to_string(history.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Pregnancies,Glucose,BloodPressure,SkinThickness,Insulin,BMI,DiabetesPedigreeFunction,Age"
        );
        // duplicates are kept
        assert_eq!(lines[1], lines[2]);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = store(dir.path());
        assert!(history.read_all().unwrap().is_empty());
        assert!(history.is_empty().unwrap());
    }

    #[test]
    fn test_rejects_foreign_header() {
        let dir = tempfile::tempdir().unwrap();
        let history = store(dir.path());
        fs::write(history.path(), "a,b,c\n1,2,3\n").unwrap();

        let err = history
            .append(&FeatureVector::new([1.0; 8]))
            .unwrap_err();
        assert!(matches!(err, RiskError::SchemaError(_)));
        // the file is untouched
        assert_eq!(fs::read_to_string(history.path()).unwrap(), "a,b,c\n1,2,3\n");
    }

    #[test]
    fn test_reads_integer_formatted_rows() {
        let dir = tempfile::tempdir().unwrap();
        let history = store(dir.path());
        fs::write(
            history.path(),
            "Pregnancies,Glucose,BloodPressure,SkinThickness,Insulin,BMI,DiabetesPedigreeFunction,Age\n\
             6,148,72,35,0,33.6,0.627,50\n",
        )
        .unwrap();

        let records = history.read_all().unwrap();
        assert_eq!(
            records,
            vec![FeatureVector::new([6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0])]
        );
    }
}
