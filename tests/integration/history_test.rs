use std::fs::File;

use arrow::array::{Array, Float64Array};
use diabetes_risk::{FeatureSchema, FeatureVector, HistoryStore, RiskError, Session};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::utils::{RECORDED, fixture_predictor};

fn history_in(dir: &tempfile::TempDir) -> HistoryStore {
    HistoryStore::new(dir.path().join("user_data.csv"), FeatureSchema::canonical())
}

#[test]
fn test_set_data_appends_one_record_per_call() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(history_in(&dir));
    assert!(session.medical_data().is_none());

    let first = [6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0];
    let second = [1.0, 85.0, 66.0, 29.0, 0.0, 26.6, 0.351, 31.0];
    session.set_data(&first).unwrap();
    session.set_data(&second).unwrap();
    session.set_data(&first).unwrap();

    let records = session.history().read_all().unwrap();
    assert_eq!(
        records,
        vec![
            FeatureVector::new(first),
            FeatureVector::new(second),
            FeatureVector::new(first),
        ]
    );
    assert_eq!(session.medical_data().unwrap().values, FeatureVector::new(first));
}

#[test]
fn test_rejected_data_is_not_stored() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(history_in(&dir));

    let err = session.set_data(&[1.0, 2.0, 3.0]).unwrap_err();
    assert!(matches!(err, RiskError::InvalidInputLength { actual: 3, .. }));
    assert!(session.medical_data().is_none());
    assert!(!session.history().path().exists());
}

#[test]
fn test_history_can_be_scored() {
    let dir = tempfile::tempdir().unwrap();
    let history = history_in(&dir);
    let predictor = fixture_predictor("linear");

    let records: Vec<FeatureVector> = RECORDED
        .iter()
        .map(|(raw, _, _)| FeatureVector::new(*raw))
        .collect();
    history.append_all(&records).unwrap();
    assert_eq!(history.len().unwrap(), records.len());

    let rows: Vec<Vec<f64>> = history
        .read_all()
        .unwrap()
        .iter()
        .map(FeatureVector::to_vec)
        .collect();
    let verdicts = predictor.predict_batch(&rows);
    for ((_, linear, _), verdict) in RECORDED.iter().zip(verdicts) {
        assert_eq!(verdict.unwrap().is_positive(), *linear == 1);
    }
}

#[test]
fn test_export_parquet() {
    let dir = tempfile::tempdir().unwrap();
    let history = history_in(&dir);
    history
        .append(&FeatureVector::new([6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0]))
        .unwrap();
    history
        .append(&FeatureVector::new([1.0, 85.0, 66.0, 29.0, 0.0, 26.6, 0.351, 31.0]))
        .unwrap();

    let out = dir.path().join("history.parquet");
    assert_eq!(history.export_parquet(&out).unwrap(), 2);

    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&out).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<_> = reader.map(Result::unwrap).collect();
    let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(rows, 2);

    let batch = &batches[0];
    assert_eq!(batch.schema().field(5).name(), "BMI");
    let glucose = batch
        .column(1)
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert_eq!(glucose.value(0), 148.0);
    assert!(!glucose.is_null(1));
}

#[test]
fn test_export_empty_history() {
    let dir = tempfile::tempdir().unwrap();
    let history = history_in(&dir);
    let out = dir.path().join("empty.parquet");
    assert_eq!(history.export_parquet(&out).unwrap(), 0);
    assert!(out.exists());
}
