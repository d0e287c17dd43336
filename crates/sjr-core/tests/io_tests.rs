use std::fs;
use std::io::{self, Write};

use sjr_core::{load, load_from, load_with, parse_bytes, save, save_to, Node, ParseOptions, SjrError};
use tempfile::tempdir;

// ============================================================================
// load
// ============================================================================

#[test]
fn load_reads_whole_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.sjr");
    fs::write(&path, "{\n\t\"a\": 1,\n\t\"b\": [true, \"x\"]\n}\n").unwrap();

    let doc = load(&path).unwrap();
    assert_eq!(doc.child_count(), 2);
    assert_eq!(doc["b"].array_size(), 2);
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = load(dir.path().join("absent.sjr")).unwrap_err();
    match err {
        SjrError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
        other => panic!("expected an I/O error, got {other}"),
    }
}

#[test]
fn load_malformed_file_is_format_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.sjr");
    fs::write(&path, r#"{"a": }"#).unwrap();
    assert!(matches!(
        load(&path),
        Err(SjrError::Format { offset: 6, .. })
    ));
}

#[test]
fn load_with_applies_options() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("spaced.sjr");
    fs::write(&path, r#"{"greeting": "hello world"}"#).unwrap();

    let kept = load_with(&path, &ParseOptions::new().with_string_whitespace(true)).unwrap();
    assert_eq!(kept["greeting"].value::<String>().unwrap(), "hello world");
    let dropped = load(&path).unwrap();
    assert_eq!(dropped["greeting"].value::<String>().unwrap(), "helloworld");
}

#[test]
fn load_from_reader() {
    let doc = load_from(&b"[1, 2, 3]"[..], &ParseOptions::default()).unwrap();
    assert_eq!(doc.array_size(), 3);
}

#[test]
fn invalid_utf8_is_format_error_at_first_bad_byte() {
    let err = parse_bytes(b"[1, \xff]", &ParseOptions::default()).unwrap_err();
    assert_eq!(err.offset(), Some(4));
}

// ============================================================================
// save
// ============================================================================

#[test]
fn save_writes_rendered_text_with_newline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.sjr");
    let mut doc = Node::new();
    doc["c"].set_value(true);
    doc["a"].set_value(1);
    doc["b"].set_value(2.5);

    save(&doc, &path).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "{\n\t\"a\": 1,\n\t\"b\": 2.5,\n\t\"c\": true\n}\n"
    );
}

#[test]
fn save_then_load_roundtrips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roundtrip.sjr");
    let mut doc = Node::new();
    doc["servers"][0]["host"].set_value("a.internal");
    doc["servers"][0]["port"].set_value(8080);
    doc["servers"][1]["host"].set_value("b.internal");
    doc["retries"].set_value(3);

    save(&doc, &path).unwrap();
    assert_eq!(load(&path).unwrap(), doc);
}

#[test]
fn save_to_unwritable_path_is_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("out.sjr");
    assert!(matches!(save(&Node::new(), &path), Err(SjrError::Io(_))));
}

#[test]
fn save_unrepresentable_tree_creates_no_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nan.sjr");
    let mut doc = Node::new();
    doc["x"].set_value(f64::INFINITY);
    assert!(matches!(save(&doc, &path), Err(SjrError::Serialize(_))));
    assert!(!path.exists());
}

#[test]
fn save_to_writer() {
    let mut buf = Vec::new();
    save_to(&Node::from(7), &mut buf).unwrap();
    assert_eq!(buf, b"7\n");
}

/// A sink that refuses every write.
struct BrokenSink;

impl Write for BrokenSink {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn save_to_failing_sink_is_io_error() {
    assert!(matches!(
        save_to(&Node::new(), BrokenSink),
        Err(SjrError::Io(_))
    ));
}
