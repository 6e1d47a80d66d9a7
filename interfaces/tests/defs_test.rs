use interfaces::{InvalidSearchTerm, ResultItem, SearchTerm};

#[test]
fn test_normalize_trims_and_lowercases() {
    let term = SearchTerm::normalize("  Cats \t").unwrap();
    assert_eq!(term.as_str(), "cats");
    assert_eq!(SearchTerm::normalize("CATS"), SearchTerm::normalize("cats "));
}

#[test]
fn test_normalize_rejects_blank_input() {
    assert!(SearchTerm::normalize("").is_none());
    assert!(SearchTerm::normalize("   ").is_none());
    assert!(SearchTerm::normalize("\n\t").is_none());
}

#[test]
fn test_normalize_folds_unicode() {
    let term = SearchTerm::normalize(" ÉCLAIR ").unwrap();
    assert_eq!(term.as_str(), "éclair");
}

#[test]
fn test_from_stored_keeps_text_verbatim() {
    let term = SearchTerm::from_stored("Mixed Case").unwrap();
    assert_eq!(term.as_str(), "Mixed Case");
    assert!(SearchTerm::from_stored("").is_none());
}

#[test]
fn test_serde_shapes() {
    let term = SearchTerm::normalize("dogs").unwrap();
    assert_eq!(serde_json::to_string(&term).unwrap(), "\"dogs\"");

    let item = ResultItem::new("1", "Cat", "u1", 100, 100);
    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["id"], "1");
    assert_eq!(json["width"], 100);
}

#[test]
fn test_deserialize_accepts_only_normalized_terms() {
    let term: SearchTerm = serde_json::from_str("\"cats\"").unwrap();
    assert_eq!(term, SearchTerm::normalize("cats").unwrap());

    for text in ["\"\"", "\"   \"", "\" Cats\"", "\"DOGS\""] {
        assert!(serde_json::from_str::<SearchTerm>(text).is_err(), "accepted {}", text);
    }
}

#[test]
fn test_try_from_reports_why_text_was_rejected() {
    assert_eq!(SearchTerm::try_from(String::new()), Err(InvalidSearchTerm::Blank));
    assert_eq!(
        SearchTerm::try_from("Cats ".to_string()),
        Err(InvalidSearchTerm::NotNormalized("Cats ".to_string()))
    );
    assert_eq!(String::from(SearchTerm::try_from("cats".to_string()).unwrap()), "cats");
}
