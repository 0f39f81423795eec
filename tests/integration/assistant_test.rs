use diabetes_risk::{Assistant, FeatureSchema, HistoryStore, RiskError, Session, Verdict};

use crate::utils::{RecordingAgent, RecordingSearch, fixture_predictor};

fn session(dir: &tempfile::TempDir) -> Session {
    Session::new(HistoryStore::new(
        dir.path().join("user_data.csv"),
        FeatureSchema::canonical(),
    ))
}

#[test]
fn test_query_without_data_only_reaches_agent() {
    let dir = tempfile::tempdir().unwrap();
    let predictor = fixture_predictor("linear");
    let agent = RecordingAgent::default();
    let videos = RecordingSearch::default();
    let assistant = Assistant::new(&agent, &videos, &predictor);

    let reply = assistant
        .ask(&session(&dir), "What are diabetes symptoms?")
        .unwrap();

    assert!(reply.reasoning.contains("chronic condition"));
    assert_eq!(reply.prediction, None);
    assert_eq!(reply.videos, None);
    assert_eq!(
        agent.queries.borrow().as_slice(),
        &["What are diabetes symptoms?".to_string()]
    );
    assert!(videos.queries.borrow().is_empty());
}

#[test]
fn test_query_with_data_predicts_and_recommends() {
    let dir = tempfile::tempdir().unwrap();
    let predictor = fixture_predictor("linear");
    let agent = RecordingAgent::default();
    let videos = RecordingSearch::default();
    let assistant = Assistant::new(&agent, &videos, &predictor);

    let mut session = session(&dir);
    session
        .set_data(&[6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0])
        .unwrap();

    let reply = assistant.ask(&session, "Predict my diabetes risk").unwrap();

    assert_eq!(reply.prediction, Some(Verdict::Diabetic));
    assert!(reply.videos.unwrap().contains("Managing type 2 diabetes"));
    assert_eq!(
        agent.queries.borrow()[0],
        "Predict my diabetes risk Use this data: [6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0]"
    );
    assert_eq!(
        videos.queries.borrow()[0],
        "Diabetes management video recommendations for data [6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0]"
    );
}

#[test]
fn test_agent_failure_stops_the_reply() {
    let dir = tempfile::tempdir().unwrap();
    let predictor = fixture_predictor("linear");
    let agent = RecordingAgent {
        fail: true,
        ..Default::default()
    };
    let videos = RecordingSearch::default();
    let assistant = Assistant::new(&agent, &videos, &predictor);

    let mut session = session(&dir);
    session.set_data(&[1.0; 8]).unwrap();

    let err = assistant.ask(&session, "hello").unwrap_err();
    assert!(matches!(err, RiskError::Collaborator(_)));
    assert!(err.to_string().contains("upstream unavailable"));
    assert!(videos.queries.borrow().is_empty());
}
