use page_core::{Combinator, DataType, MatchMode, WireFilter, WireSort};

#[test]
fn filter_wire_format_uses_screaming_enums() {
    let raw = r#"{"id":"fullName","value":"Adi","matchMode":"CONTAINS","dataType":"TEXT","mode":"AND"}"#;
    let f: WireFilter = serde_json::from_str(raw).unwrap();
    assert_eq!(f.id, "fullName");
    assert_eq!(f.match_mode, MatchMode::Contains);
    assert_eq!(f.data_type, DataType::Text);
    assert_eq!(f.mode, Combinator::And);

    let raw = r#"{"id":"level","value":[1,2],"matchMode":"GREATER_THAN","dataType":"NUMBER","mode":"OR"}"#;
    let f: WireFilter = serde_json::from_str(raw).unwrap();
    assert_eq!(f.match_mode, MatchMode::GreaterThan);
    assert_eq!(f.mode, Combinator::Or);
}

#[test]
fn filter_mode_defaults_to_and() {
    let raw = r#"{"id":"level","value":1,"matchMode":"NOT","dataType":"NUMBER"}"#;
    let f: WireFilter = serde_json::from_str(raw).unwrap();
    assert_eq!(f.mode, Combinator::And);
}

#[test]
fn unknown_match_mode_is_rejected() {
    let raw = r#"{"id":"level","value":1,"matchMode":"LIKE","dataType":"NUMBER"}"#;
    assert!(serde_json::from_str::<WireFilter>(raw).is_err());
}

#[test]
fn sort_desc_defaults_to_false() {
    let s: Vec<WireSort> = serde_json::from_str(r#"[{"id":"name"},{"id":"code","desc":true}]"#).unwrap();
    assert!(!s[0].desc);
    assert!(s[1].desc);
}
