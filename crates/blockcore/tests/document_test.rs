// crates/blockcore/tests/document_test.rs

use blockcore::{
    export_file_name, parse_options, Config, DocumentError, Element, ElementKind, ElementStatus,
    WorkflowDocument, FORMAT_VERSION,
};
use chrono::TimeZone;
use serde_json::json;
use std::collections::HashSet;

fn fields(value: serde_json::Value) -> Config {
    value.as_object().cloned().expect("fields must be an object")
}

#[test]
fn test_add_element_ids_are_distinct_and_ordered() {
    let mut doc = WorkflowDocument::new();
    let kinds = [
        ElementKind::PdfUpload,
        ElementKind::TextInput,
        ElementKind::Email,
        ElementKind::TextInput,
        ElementKind::Timer,
    ];

    for kind in &kinds {
        doc.add_element(kind.clone());
    }

    let ids: HashSet<_> = doc.iter().map(|e| e.id().clone()).collect();
    assert_eq!(ids.len(), kinds.len(), "Ids should be pairwise distinct");

    let stored: Vec<_> = doc.iter().map(|e| e.kind().clone()).collect();
    assert_eq!(stored, kinds.to_vec(), "Insertion order should be preserved");
}

#[test]
fn test_add_element_defaults() {
    let mut doc = WorkflowDocument::new();
    doc.add_element(ElementKind::Chart);
    let second = doc.add_element(ElementKind::Slider).clone();

    assert_eq!(second.status(), ElementStatus::Pending);
    assert!(second.config().is_empty());
    assert!(second.output().is_none());
    assert_eq!(second.position.x, 100.0, "Second element goes in the second slot");
    assert_eq!(second.position.y, 50.0);
    assert_eq!(doc.get(0).unwrap().position.x, 0.0);
}

#[test]
fn test_remove_element_out_of_range_leaves_document_unchanged() {
    let mut doc = WorkflowDocument::new();
    doc.add_element(ElementKind::TextInput);
    doc.add_element(ElementKind::Email);
    let before: Vec<_> = doc.iter().cloned().collect();

    let err = doc.remove_element(2).unwrap_err();
    assert_eq!(err, DocumentError::IndexOutOfRange { index: 2, len: 2 });

    let after: Vec<_> = doc.iter().cloned().collect();
    assert_eq!(before, after);
}

#[test]
fn test_remove_element_keeps_remaining_ids() {
    let mut doc = WorkflowDocument::new();
    let first = doc.add_element(ElementKind::TextInput).id().clone();
    let second = doc.add_element(ElementKind::Email).id().clone();
    let third = doc.add_element(ElementKind::Loop).id().clone();

    let removed = doc.remove_element(1).unwrap();
    assert_eq!(removed.id(), &second);

    let remaining: Vec<_> = doc.iter().map(|e| e.id().clone()).collect();
    assert_eq!(remaining, vec![first, third]);
}

#[test]
fn test_email_readiness_requires_recipient_and_subject() {
    let mut doc = WorkflowDocument::new();
    doc.add_element(ElementKind::Email);

    let status = doc
        .update_config(0, fields(json!({"recipient": "", "subject": "Hello"})))
        .unwrap();
    assert_eq!(status, ElementStatus::Pending, "Empty recipient must not be ready");

    let status = doc.update_config(0, fields(json!({"body": "text"}))).unwrap();
    assert_eq!(status, ElementStatus::Pending);

    let status = doc
        .update_config(0, fields(json!({"recipient": "a@example.com"})))
        .unwrap();
    assert_eq!(status, ElementStatus::Ready, "Merged config has both fields now");

    let status = doc.update_config(0, fields(json!({"subject": ""}))).unwrap();
    assert_eq!(status, ElementStatus::Pending, "Clearing a required field reverts to pending");
}

#[test]
fn test_readiness_rules_per_kind() {
    let cases = [
        (ElementKind::TextInput, json!({"value": ""}), Some(ElementStatus::Pending)),
        (ElementKind::TextInput, json!({"value": "hi"}), Some(ElementStatus::Ready)),
        (ElementKind::NumberInput, json!({}), Some(ElementStatus::Ready)),
        (ElementKind::Checkbox, json!({"value": false}), Some(ElementStatus::Ready)),
        (ElementKind::Selectbox, json!({}), Some(ElementStatus::Ready)),
        (ElementKind::Conditional, json!({"condition_value": ""}), Some(ElementStatus::Pending)),
        (ElementKind::Conditional, json!({"condition_value": "5"}), Some(ElementStatus::Ready)),
        (ElementKind::DataDisplay, json!({}), Some(ElementStatus::Ready)),
        (ElementKind::Chart, json!({}), Some(ElementStatus::Ready)),
        (ElementKind::ApiCall, json!({"url": ""}), Some(ElementStatus::Pending)),
        (ElementKind::ApiCall, json!({"url": "http://x"}), Some(ElementStatus::Ready)),
        (ElementKind::PdfUpload, json!({"filename": "a.pdf"}), Some(ElementStatus::Pending)),
        (ElementKind::PdfUpload, json!({"filename": "a.pdf", "size": 10}), Some(ElementStatus::Ready)),
        (ElementKind::Loop, json!({"anything": 1}), None),
        (ElementKind::SaveData, json!({}), None),
        (ElementKind::Timer, json!({}), None),
        (ElementKind::Other("custom".into()), json!({}), None),
    ];

    for (kind, config, expected) in cases {
        assert_eq!(
            kind.readiness(&fields(config.clone())),
            expected,
            "readiness of {} with {}",
            kind,
            config
        );
    }
}

#[test]
fn test_update_config_leaves_status_alone_without_rule() {
    let json = json!({
        "elements": [{"id": "t1", "type": "timer", "status": "error"}]
    });
    let mut doc = WorkflowDocument::from_value(&json).unwrap();

    let status = doc.update_config(0, fields(json!({"seconds": 3}))).unwrap();
    assert_eq!(status, ElementStatus::Error);
    assert_eq!(doc.get(0).unwrap().config().get("seconds"), Some(&json!(3)));
}

#[test]
fn test_update_config_by_id_unknown() {
    let mut doc = WorkflowDocument::new();
    doc.add_element(ElementKind::TextInput);

    let err = doc
        .update_config_by_id(&"missing".into(), Config::new())
        .unwrap_err();
    assert_eq!(err, DocumentError::ElementNotFound("missing".to_string()));

    let err = doc.update_config(5, Config::new()).unwrap_err();
    assert_eq!(err, DocumentError::IndexOutOfRange { index: 5, len: 1 });
}

#[test]
fn test_serialize_round_trip() {
    let mut doc = WorkflowDocument::new();
    doc.add_element(ElementKind::TextInput);
    doc.add_element(ElementKind::Email);
    doc.add_element(ElementKind::Other("custom_step".into()));
    doc.update_config(0, fields(json!({"label": "Name", "value": "Ada"}))).unwrap();
    doc.update_config(1, fields(json!({"recipient": "a@b.c", "subject": "Hi", "body": ""})))
        .unwrap();

    let exported = doc.serialize().unwrap();
    assert_eq!(exported["version"], json!(FORMAT_VERSION));
    assert!(exported["created_at"].is_string());
    assert_eq!(exported["elements"][2]["type"], json!("custom_step"));
    assert_eq!(exported["elements"][0]["output"], json!(null));

    let restored = WorkflowDocument::from_value(&exported).unwrap();
    assert_eq!(restored.len(), doc.len());
    for (original, copy) in doc.iter().zip(restored.iter()) {
        assert_eq!(original, copy);
    }
}

#[test]
fn test_round_trip_through_text() {
    let mut doc = WorkflowDocument::new();
    doc.add_element(ElementKind::Slider);
    doc.update_config(0, ElementKind::Slider.default_config()).unwrap();

    let text = doc.to_json_pretty().unwrap();
    let restored = WorkflowDocument::from_json_str(&text).unwrap();

    assert_eq!(restored.elements(), doc.elements());
    assert_eq!(restored.version(), FORMAT_VERSION);
}

#[test]
fn test_import_applies_defaults() {
    let json = json!({
        "elements": [{"id": "e1", "type": "text_input"}],
        "created_at": "2024-03-01T10:20:30.123456",
        "version": "1.0"
    });

    let doc = WorkflowDocument::from_value(&json).unwrap();
    let element = doc.get(0).unwrap();
    assert_eq!(element.id().as_str(), "e1");
    assert_eq!(element.kind(), &ElementKind::TextInput);
    assert_eq!(element.position.x, 0.0);
    assert_eq!(element.position.y, 0.0);
    assert!(element.config().is_empty());
    assert_eq!(element.status(), ElementStatus::Pending);
    assert!(element.output().is_none());
    assert_eq!(
        doc.created_at(),
        chrono::Utc.with_ymd_and_hms(2024, 3, 1, 10, 20, 30).unwrap()
            + chrono::Duration::microseconds(123456)
    );
}

#[test]
fn test_created_at_survives_import_but_not_export() {
    let json = json!({
        "elements": [],
        "created_at": "2020-01-02T03:04:05Z",
        "version": "1.0"
    });
    let imported = chrono::Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();

    let doc = WorkflowDocument::from_value(&json).unwrap();
    assert_eq!(doc.created_at(), imported);

    let exported = doc.serialize().unwrap();
    let stamped: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(exported["created_at"].clone()).unwrap();
    assert!(stamped > imported, "Export stamps the export time");
    assert_eq!(doc.created_at(), imported, "Export leaves the stored value alone");
}

#[test]
fn test_import_missing_id_is_malformed() {
    let json = json!({
        "elements": [
            {"id": "ok", "type": "email"},
            {"type": "text_input"}
        ]
    });

    let err = WorkflowDocument::from_value(&json).unwrap_err();
    match err {
        DocumentError::MalformedDocument(message) => {
            assert!(message.contains("element 1"), "message: {}", message);
            assert!(message.contains("`id`"), "message: {}", message);
        }
        other => panic!("Expected MalformedDocument, got {:?}", other),
    }
}

#[test]
fn test_import_missing_type_is_malformed() {
    let json = json!({"elements": [{"id": "x"}]});
    assert!(matches!(
        WorkflowDocument::from_value(&json),
        Err(DocumentError::MalformedDocument(_))
    ));
}

#[test]
fn test_import_rejects_bad_status_and_duplicates() {
    let bad_status = json!({"elements": [{"id": "x", "type": "email", "status": "done"}]});
    assert!(matches!(
        WorkflowDocument::from_value(&bad_status),
        Err(DocumentError::MalformedDocument(_))
    ));

    let duplicate = json!({"elements": [
        {"id": "x", "type": "email"},
        {"id": "x", "type": "timer"}
    ]});
    assert!(matches!(
        WorkflowDocument::from_value(&duplicate),
        Err(DocumentError::MalformedDocument(_))
    ));
}

#[test]
fn test_failed_deserialize_keeps_previous_document() {
    let mut doc = WorkflowDocument::new();
    doc.add_element(ElementKind::Email);
    let before = doc.elements().to_vec();

    let result = doc.deserialize(&json!({"elements": [{"type": "email"}]}));
    assert!(result.is_err());
    assert_eq!(doc.elements(), before.as_slice());

    doc.deserialize(&json!({"elements": []})).unwrap();
    assert!(doc.is_empty(), "A successful import replaces everything");
}

#[test]
fn test_import_without_elements_is_empty() {
    let doc = WorkflowDocument::from_value(&json!({"version": "1.0"})).unwrap();
    assert!(doc.is_empty());

    assert!(WorkflowDocument::from_value(&json!([])).is_err());
}

#[test]
fn test_stats_count_processing_as_pending() {
    let json = json!({"elements": [
        {"id": "a", "type": "email", "status": "ready"},
        {"id": "b", "type": "email", "status": "error"},
        {"id": "c", "type": "email", "status": "processing"},
        {"id": "d", "type": "email"}
    ]});
    let stats = WorkflowDocument::from_value(&json).unwrap().stats();

    assert_eq!(stats.total, 4);
    assert_eq!(stats.ready, 1);
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.pending, 2);
}

#[test]
fn test_clear_empties_document() {
    let mut doc = WorkflowDocument::new();
    doc.add_element(ElementKind::Loop);
    doc.clear();
    assert!(doc.is_empty());
    assert_eq!(doc.add_element(ElementKind::Loop).position.x, 0.0);
}

#[test]
fn test_kind_names() {
    assert_eq!("api_call".parse::<ElementKind>().unwrap(), ElementKind::ApiCall);
    assert_eq!(
        "nope".parse::<ElementKind>().unwrap_err(),
        DocumentError::UnknownElementType("nope".to_string())
    );
    assert_eq!(ElementKind::from_name("nope"), ElementKind::Other("nope".into()));

    assert_eq!(ElementKind::Selectbox.display_name(), "Select Box");
    assert_eq!(ElementKind::Other("my_step".into()).display_name(), "My_Step");

    for kind in ElementKind::ALL.iter() {
        assert_eq!(&ElementKind::from_name(kind.as_str()), kind);
    }
}

#[test]
fn test_default_config_and_options() {
    let config = ElementKind::ApiCall.default_config();
    assert_eq!(config.get("method"), Some(&json!("GET")));
    assert_eq!(config.get("headers"), Some(&json!("{}")));
    assert!(!config.contains_key("url"), "Required fields have no default");

    let required: Vec<_> = ElementKind::Email
        .fields()
        .into_iter()
        .filter(|f| f.required)
        .map(|f| f.name)
        .collect();
    assert_eq!(required, vec!["recipient", "subject"]);

    assert!(ElementKind::Loop.fields().is_empty());
    assert_eq!(parse_options("Option 1\n  \n Option 2 \n"), vec!["Option 1", "Option 2"]);
}

#[test]
fn test_export_file_name() {
    let now = chrono::Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
    assert_eq!(export_file_name(&now), "workflow_20250102_030405.json");
}

#[test]
fn test_builder_keeps_status() {
    let element = Element::new(ElementKind::TextInput).with_config("value", "x");
    assert_eq!(element.status(), ElementStatus::Pending);
    assert_eq!(element.config().get("value"), Some(&json!("x")));
}
