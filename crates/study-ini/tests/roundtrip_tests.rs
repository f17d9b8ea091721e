use pretty_assertions::assert_eq;
use proptest::prelude::*;
use study_ini::{
    IniDocument, IniError, IniFilter, IniReader, IniValue, IniWriter, Section, SimpleKeyValueReader,
    SimpleKeyValueWriter, SpecialKeys,
};

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.+-]{0,10}"
}

fn scalar_strategy() -> impl Strategy<Value = IniValue> {
    prop_oneof![
        any::<bool>().prop_map(IniValue::Bool),
        any::<i64>().prop_map(IniValue::Int),
        (-1.0e6f64..1.0e6).prop_map(IniValue::Float),
        "[a-z][a-z ,]{0,12}[a-z]"
            .prop_filter("coerced keywords", |s| {
                !matches!(s.as_str(), "true" | "false" | "inf" | "nan" | "infinity")
            })
            .prop_map(IniValue::Str),
    ]
}

fn section_strategy() -> impl Strategy<Value = Section> {
    prop::collection::vec((name_strategy(), scalar_strategy()), 0..6)
        .prop_map(|pairs| pairs.into_iter().collect())
}

fn document_strategy() -> impl Strategy<Value = IniDocument> {
    prop::collection::vec((name_strategy(), section_strategy()), 0..5)
        .prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_plain_document_roundtrip(doc in document_strategy()) {
        let text = IniWriter::default().render(&doc);
        let parsed = IniReader::default().parse_str(&text).unwrap();
        prop_assert_eq!(parsed, doc);
    }

    #[test]
    fn prop_special_list_roundtrip(items in prop::collection::vec(any::<i64>(), 1..8)) {
        let keys = SpecialKeys::new(["k"]);
        let list = IniValue::List(items.into_iter().map(IniValue::Int).collect());
        let mut section = Section::new();
        section.insert("k".to_string(), list.clone());
        let mut doc = IniDocument::new();
        doc.insert("s".to_string(), section);

        let parsed = keys.reader().parse_str(&keys.writer().render(&doc)).unwrap();
        prop_assert_eq!(&parsed["s"]["k"], &list);
    }
}

#[test]
fn special_list_keeps_order() {
    let keys = SpecialKeys::new(["k"]);
    let parsed = keys
        .reader()
        .parse_str("[s]\nk = 1\nk = 2\nk = 3\n")
        .unwrap();
    assert_eq!(
        parsed["s"]["k"],
        IniValue::List(vec![1.into(), 2.into(), 3.into()])
    );
}

#[test]
fn duplicate_plain_key_last_wins() {
    let parsed = IniReader::default()
        .parse_str("[A]\nx = 1\n[A]\nx = 2\n")
        .unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed["A"]["x"], IniValue::Int(2));
}

#[test]
fn infinities_normalize_on_roundtrip() {
    let mut section = Section::new();
    section.insert("max".to_string(), IniValue::Float(f64::INFINITY));
    section.insert("min".to_string(), IniValue::Float(f64::NEG_INFINITY));
    let mut doc = IniDocument::new();
    doc.insert("bounds".to_string(), section);

    let parsed = IniReader::default()
        .parse_str(&IniWriter::default().render(&doc))
        .unwrap();
    assert_eq!(parsed["bounds"]["max"], IniValue::from("+Inf"));
    assert_eq!(parsed["bounds"]["min"], IniValue::from("-Inf"));
}

#[test]
fn missing_file_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.ini");
    assert!(IniReader::default().read(&path).unwrap().is_empty());
    assert!(SimpleKeyValueReader::default().read(&path).unwrap().is_empty());
}

#[test]
fn filtered_file_read_stops_early() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.ini");
    std::fs::write(&path, "[A]\na = 1\n[B]\nb = 2\n[C]\nthis line is broken\n").unwrap();

    let filter = IniFilter::section("B").unwrap();
    let parsed = IniReader::default().read_filtered(&path, &filter).unwrap();
    assert_eq!(parsed.keys().collect::<Vec<_>>(), ["B"]);
    assert_eq!(parsed["B"]["b"], IniValue::Int(2));

    // A full read does reach the broken line
    assert!(IniReader::default().read(&path).is_err());
}

#[test]
fn windows_1252_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("study.antares");
    std::fs::write(&path, b"[antares]\ncaption = caf\xe9 \x80\n").unwrap();

    let parsed = IniReader::default().read(&path).unwrap();
    assert_eq!(parsed["antares"]["caption"], IniValue::from("café €"));
}

#[test]
fn undecodable_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("generaldata.ini");
    std::fs::write(&path, b"[a]\nx = \x81\n").unwrap();

    let err = IniReader::default().read(&path).unwrap_err();
    assert!(matches!(err, IniError::Decode { path: p } if p == path));
}

#[test]
fn read_from_buffered_source() {
    let source = std::io::Cursor::new("[general]\nmode = Adequacy\n");
    let parsed = IniReader::default()
        .read_from(source, &IniFilter::all())
        .unwrap();
    assert_eq!(parsed["general"]["mode"], IniValue::from("Adequacy"));
}

#[test]
fn simple_key_value_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.ini");
    let mut data = Section::new();
    data.insert("optimality_gap".to_string(), IniValue::Int(1));
    data.insert("master".to_string(), IniValue::from("integer"));
    data.insert("cut-type".to_string(), IniValue::Null);

    SimpleKeyValueWriter::new().write(&data, &path).unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "optimality_gap=1\nmaster=integer\n"
    );

    let parsed = SimpleKeyValueReader::default().read(&path).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed["master"], IniValue::from("integer"));
}
