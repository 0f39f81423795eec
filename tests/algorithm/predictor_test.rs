use diabetes_risk::{Feature, RiskError, RiskPredictor, Verdict, load_artifacts};
use proptest::prelude::*;

use crate::utils::{RECORDED, fixture_config, fixture_predictor};

#[test]
fn test_recorded_labels_linear() {
    let predictor = fixture_predictor("linear");
    for (raw, linear, _) in RECORDED {
        let verdict = predictor.predict(raw).unwrap();
        assert_eq!(verdict, Verdict::from_label(i64::from(*linear)), "input {raw:?}");
    }
}

#[test]
fn test_recorded_labels_rbf() {
    let predictor = fixture_predictor("rbf");
    for (raw, _, rbf) in RECORDED {
        let verdict = predictor.predict(raw).unwrap();
        assert_eq!(verdict, Verdict::from_label(i64::from(*rbf)), "input {raw:?}");
    }
}

#[test]
fn test_insulin_zero_imputed_with_mean() {
    let predictor = fixture_predictor("linear");
    let trace = predictor
        .explain(&[6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0])
        .unwrap();

    assert_eq!(trace.imputed_features.as_slice(), &[Feature::Insulin]);
    assert_eq!(
        trace.imputed.values(),
        &[6.0, 148.0, 72.0, 35.0, 79.8, 33.6, 0.627, 50.0]
    );
    assert_eq!(trace.verdict, Verdict::Diabetic);
    assert_eq!(trace.verdict.to_string(), "diabetic");
}

#[test]
fn test_all_zero_input() {
    let predictor = fixture_predictor("linear");
    let trace = predictor.explain(&[0.0; 8]).unwrap();

    assert_eq!(trace.imputed_features.as_slice(), &Feature::IMPUTABLE);
    assert_eq!(
        trace.imputed.values(),
        &[0.0, 120.89, 69.11, 20.54, 79.8, 31.99, 0.0, 0.0]
    );
    assert_eq!(trace.verdict, Verdict::NotDiabetic);
}

#[test]
fn test_wrong_length_rejected() {
    let predictor = fixture_predictor("linear");
    let nine = [6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0, 1.0];
    let seven = [6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627];

    assert!(matches!(
        predictor.predict(&nine),
        Err(RiskError::InvalidInputLength {
            expected: 8,
            actual: 9
        })
    ));
    assert!(matches!(
        predictor.predict(&seven),
        Err(RiskError::InvalidInputLength { actual: 7, .. })
    ));
    assert!(matches!(
        predictor.predict(&[]),
        Err(RiskError::InvalidInputLength { actual: 0, .. })
    ));
}

#[test]
fn test_predictor_from_artifact_set() {
    let set = load_artifacts(&fixture_config("rbf")).unwrap();
    assert_eq!(set.classifier.n_support(), Some(4));
    let predictor = RiskPredictor::from_artifacts(set);
    assert_eq!(predictor.imputation().mean(Feature::Insulin), Some(79.8));
    assert_eq!(predictor.imputation().mean(Feature::Age), None);
}

#[test]
fn test_missing_artifact_dir_fails_to_load() {
    let config = fixture_config("does-not-exist");
    match RiskPredictor::load(&config) {
        Err(RiskError::ArtifactLoadFailure { artifact, .. }) => {
            assert_eq!(artifact, "feature names");
        }
        other => panic!("expected ArtifactLoadFailure, got {other:?}"),
    }
}

#[test]
fn test_batch_matches_single_predictions() {
    let predictor = fixture_predictor("rbf");
    let rows: Vec<Vec<f64>> = RECORDED.iter().map(|(raw, _, _)| raw.to_vec()).collect();
    let batch = predictor.predict_batch(&rows);
    for (row, result) in rows.iter().zip(batch) {
        assert_eq!(result.unwrap(), predictor.predict(row).unwrap());
    }
}

fn measurement() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), 0.0001f64..500.0]
}

proptest! {
    #[test]
    fn prop_imputation_only_replaces_exact_zeros(raw in proptest::array::uniform8(measurement())) {
        let predictor = fixture_predictor("linear");
        let trace = predictor.explain(&raw).unwrap();

        for feature in Feature::ALL {
            let before = raw[feature.index()];
            let after = trace.imputed[feature];
            if feature.is_imputable() && before == 0.0 {
                prop_assert_eq!(Some(after), predictor.imputation().mean(feature));
                prop_assert!(trace.imputed_features.contains(&feature));
            } else {
                prop_assert_eq!(after, before);
                prop_assert!(!trace.imputed_features.contains(&feature));
            }
        }
    }

    #[test]
    fn prop_predict_is_deterministic(raw in proptest::array::uniform8(measurement())) {
        let predictor = fixture_predictor("rbf");
        let first = predictor.predict(&raw).unwrap();
        let second = predictor.predict(&raw).unwrap();
        prop_assert_eq!(first, second);
        prop_assert!(["not diabetic", "diabetic"].contains(&first.label_text()));
    }
}
