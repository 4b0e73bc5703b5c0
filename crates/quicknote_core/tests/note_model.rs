use chrono::{Duration, TimeZone, Utc};
use quicknote_core::{Note, NoteId, NoteValidationError};

#[test]
fn with_id_sets_defaults() {
    let created_at = Utc.with_ymd_and_hms(2024, 9, 1, 10, 0, 0).unwrap();
    let note = Note::with_id("n-1", "hello", created_at).unwrap();

    assert_eq!(note.id(), &NoteId::from("n-1"));
    assert_eq!(note.text(), "hello");
    assert_eq!(note.created_at(), created_at);
    assert_eq!(note.updated_at(), None);
    assert!(!note.is_edited());
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let created_at = Utc.with_ymd_and_hms(2024, 9, 1, 10, 0, 0).unwrap();
    let updated_at = Utc.timestamp_millis_opt(1_725_185_000_123).unwrap();
    let note = Note::from_parts("n-1", "hello", created_at, Some(updated_at)).unwrap();

    let json = serde_json::to_value(&note).unwrap();
    assert_eq!(json["id"], "n-1");
    assert_eq!(json["text"], "hello");
    assert_eq!(json["createdAt"], "2024-09-01T10:00:00Z");
    assert_eq!(json["updatedAt"], "2024-09-01T10:03:20.123Z");
    assert!(json.get("created_at").is_none());

    let decoded: Note = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, note);
}

#[test]
fn from_parts_rejects_reversed_timestamps() {
    let created_at = Utc.with_ymd_and_hms(2024, 9, 1, 10, 0, 0).unwrap();
    let updated_at = Utc.with_ymd_and_hms(2024, 8, 1, 10, 0, 0).unwrap();

    let err = Note::from_parts("n-1", "x", created_at, Some(updated_at)).unwrap_err();
    assert_eq!(
        err,
        NoteValidationError::UpdatedBeforeCreated {
            created_at,
            updated_at,
        }
    );
}

#[test]
fn timestamps_beyond_year_9999_are_rejected() {
    let last_storable = Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap();
    let note = Note::with_id("a", "x", last_storable).unwrap();
    let decoded: Note = serde_json::from_value(serde_json::to_value(&note).unwrap()).unwrap();
    assert_eq!(decoded, note);

    let too_late = last_storable + Duration::seconds(2);
    assert_eq!(
        Note::with_id("a", "x", too_late).unwrap_err(),
        NoteValidationError::TimestampOutOfRange(too_late)
    );

    let created_at = Utc.with_ymd_and_hms(2024, 9, 1, 10, 0, 0).unwrap();
    let err = Note::from_parts("a", "x", created_at, Some(too_late)).unwrap_err();
    assert_eq!(err, NoteValidationError::TimestampOutOfRange(too_late));

    let before_year_zero = Utc.with_ymd_and_hms(0, 1, 1, 0, 0, 0).unwrap() - Duration::seconds(1);
    assert!(matches!(
        Note::with_id("a", "x", before_year_zero),
        Err(NoteValidationError::TimestampOutOfRange(_))
    ));
}

#[test]
fn deserialize_rejects_empty_id_and_bad_timestamp() {
    let empty_id = serde_json::json!({
        "id": "",
        "text": "t",
        "createdAt": "2024-09-01T10:00:00Z"
    });
    let err = serde_json::from_value::<Note>(empty_id).unwrap_err();
    assert!(err.to_string().contains("note id must not be empty"), "{err}");

    let bad_time = serde_json::json!({
        "id": "a",
        "text": "t",
        "createdAt": "yesterday"
    });
    let err = serde_json::from_value::<Note>(bad_time).unwrap_err();
    assert!(err.to_string().contains("invalid timestamp"), "{err}");
}

#[test]
fn deserialize_ignores_unknown_fields() {
    let value = serde_json::json!({
        "id": "a",
        "text": "t",
        "createdAt": "2024-09-01T10:00:00.000Z",
        "color": "yellow"
    });
    let note: Note = serde_json::from_value(value).unwrap();
    assert_eq!(note.id().as_str(), "a");
}
