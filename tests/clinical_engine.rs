use chrono::{Duration, NaiveDate, NaiveDateTime};

use healthrevo_core::alerts::AlertFilter;
use healthrevo_core::medication::{InteractionTable, MedicationError, SqliteInteractionStore};
use healthrevo_core::models::{
    DrugInteractionRecord, FindingKind, FlagSeverity, InteractionSeverity, Medication, RiskLevel,
    RiskType, Severity, VitalsReading,
};
use healthrevo_core::{ClinicalEngine, EngineConfig, EngineError};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 4, 2)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap()
}

fn make_reading(days_ago: i64) -> VitalsReading {
    VitalsReading::at(now() - Duration::days(days_ago))
}

fn interactions() -> Vec<DrugInteractionRecord> {
    vec![
        DrugInteractionRecord {
            drug_a: "aspirin".into(),
            drug_b: "warfarin".into(),
            severity: InteractionSeverity::Major,
            description: "Increased bleeding risk".into(),
            mechanism: Some("Additive antiplatelet and anticoagulant effect".into()),
            clinical_management: Some("Avoid unless specifically indicated".into()),
        },
        DrugInteractionRecord {
            drug_a: "simvastatin".into(),
            drug_b: "clarithromycin".into(),
            severity: InteractionSeverity::Contraindicated,
            description: "Rhabdomyolysis risk".into(),
            mechanism: None,
            clinical_management: None,
        },
    ]
}

fn glucose_history(values: &[f64]) -> Vec<VitalsReading> {
    values
        .iter()
        .enumerate()
        .map(|(i, g)| VitalsReading {
            blood_glucose: Some(*g),
            ..make_reading(i as i64)
        })
        .collect()
}

#[test]
fn full_patient_workflow() {
    let engine =
        ClinicalEngine::new(EngineConfig::default(), InteractionTable::from_records(interactions()))
            .unwrap();
    let patient = 11;

    let history: Vec<VitalsReading> = (1..=5)
        .map(|d| VitalsReading {
            systolic: Some(138.0),
            diastolic: Some(88.0),
            heart_rate: Some(70.0),
            ..make_reading(d)
        })
        .collect();
    let reading = VitalsReading {
        systolic: Some(185.0),
        diastolic: Some(100.0),
        heart_rate: Some(74.0),
        ..make_reading(0)
    };

    let screened = engine
        .screen_reading_at(patient, &reading, &history, now())
        .unwrap();
    assert_eq!(screened[0].title, "Hypertensive Crisis");
    assert_eq!(screened[0].severity, Severity::Urgent);
    assert!(screened.iter().any(|a| {
        a.alert_type == FindingKind::Anomaly && a.title == "Systolic Blood Pressure Anomaly"
    }));

    let ingested = engine.ingest_reading_at(patient, &reading, now()).unwrap();
    assert_eq!(ingested.alerts[0].severity, Severity::Critical);

    let review = engine
        .review_prescription(
            patient,
            "1. Tab. Simvastatin\n40 mg\nonce daily\n2. Tab. Clarithromycin\n500 mg\ntwice daily",
        )
        .unwrap();
    assert_eq!(review.analysis.flags[0].severity, FlagSeverity::High);
    assert_eq!(review.alerts[0].severity, Severity::Critical);

    let all = engine.alerts().list(&AlertFilter::for_patient(patient)).unwrap();
    assert_eq!(all[0].priority_score, 100);
    for pair in all.windows(2) {
        assert!(pair[0].priority_score >= pair[1].priority_score);
    }

    let first = all[0].id;
    engine.alerts().set_acknowledged(&first, true, 3).unwrap();
    let open = engine
        .alerts()
        .list(&AlertFilter {
            patient_id: Some(patient),
            acknowledged: Some(false),
            ..AlertFilter::default()
        })
        .unwrap();
    assert_eq!(open.len(), all.len() - 1);
}

#[test]
fn diabetes_mean_150_scores_82() {
    let engine = ClinicalEngine::new(EngineConfig::default(), InteractionTable::new()).unwrap();
    let scores = engine.assess_risk(&glucose_history(&[140.0, 150.0, 160.0, 145.0, 155.0]), now());
    let diabetes = scores
        .iter()
        .find(|s| s.risk_type == RiskType::Diabetes)
        .unwrap();
    assert_eq!(diabetes.score, 82.0);
    assert!((70.0..=92.5).contains(&diabetes.score));
    assert_eq!(diabetes.risk_level, RiskLevel::Critical);
    assert_eq!(diabetes.confidence, 100.0);
}

#[test]
fn risk_is_idempotent() {
    let engine = ClinicalEngine::new(EngineConfig::default(), InteractionTable::new()).unwrap();
    let window = glucose_history(&[101.3, 133.7, 99.9, 187.2]);
    let a = engine.assess_risk(&window, now());
    let b = engine.assess_risk(&window, now());
    assert_eq!(a, b);
}

#[test]
fn sqlite_knowledge_base_behind_the_facade() {
    let store = SqliteInteractionStore::open_in_memory().unwrap();
    store.import(&interactions(), true).unwrap();
    let engine = ClinicalEngine::new(EngineConfig::default(), store).unwrap();

    let review = engine
        .review_medications(
            2,
            vec![
                Medication::new("WARFARIN", "5 mg", "once daily"),
                Medication::new("Aspirin", "75 mg", "once daily"),
            ],
        )
        .unwrap();
    assert_eq!(review.analysis.interactions.len(), 1);
    assert_eq!(review.analysis.flags[0].severity, FlagSeverity::High);
}

#[test]
fn duplicate_metformin_is_single_low_finding() {
    let engine = ClinicalEngine::new(EngineConfig::default(), InteractionTable::new()).unwrap();
    let review = engine
        .review_medications(
            4,
            vec![
                Medication::new("Metformin", "", ""),
                Medication::new("metformin", "", ""),
            ],
        )
        .unwrap();
    assert_eq!(review.analysis.findings.len(), 1);
    assert_eq!(review.analysis.findings[0].severity, FlagSeverity::Low);
    assert_eq!(review.analysis.findings[0].drug, "metformin");
    assert_eq!(review.analysis.summary, "Duplicate entries found.");
}

#[test]
fn unavailable_knowledge_base_fails_the_review() {
    use healthrevo_core::medication::{InteractionKnowledgeBase, KnowledgeBaseError};

    struct Offline;
    impl InteractionKnowledgeBase for Offline {
        fn find(
            &self,
            _: &str,
            _: &str,
        ) -> Result<Option<DrugInteractionRecord>, KnowledgeBaseError> {
            Err(KnowledgeBaseError::Unavailable("offline".into()))
        }
    }

    let engine = ClinicalEngine::new(EngineConfig::default(), Offline).unwrap();
    let result = engine.review_medications(
        1,
        vec![
            Medication::new("Aspirin", "", ""),
            Medication::new("Warfarin", "", ""),
        ],
    );
    assert!(matches!(
        result,
        Err(EngineError::Medication(MedicationError::KnowledgeBase(_)))
    ));
    assert!(engine.alerts().is_empty().unwrap());
}
