use sjr_core::{render, Node, SjrError};

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn render_bools() {
    assert_eq!(render(&Node::from(true)).unwrap(), "true");
    assert_eq!(render(&Node::from(false)).unwrap(), "false");
}

#[test]
fn render_integers() {
    assert_eq!(render(&Node::from(42)).unwrap(), "42");
    assert_eq!(render(&Node::from(-7)).unwrap(), "-7");
    assert_eq!(render(&Node::from(i64::MIN)).unwrap(), "-9223372036854775808");
}

#[test]
fn render_floats() {
    assert_eq!(render(&Node::from(2.5)).unwrap(), "2.5");
    assert_eq!(render(&Node::from(-0.125)).unwrap(), "-0.125");
    assert_eq!(render(&Node::from(4.0)).unwrap(), "4.0");
}

#[test]
fn render_string_without_escaping() {
    assert_eq!(render(&Node::from("hi")).unwrap(), "\"hi\"");
    assert_eq!(render(&Node::from(r"a\b")).unwrap(), r#""a\b""#);
}

#[test]
fn non_finite_float_fails_to_render() {
    let mut doc = Node::new();
    doc["bad"].set_value(f64::NAN);
    assert!(matches!(render(&doc), Err(SjrError::Serialize(_))));
}

// ============================================================================
// Arrays
// ============================================================================

#[test]
fn render_empty_array() {
    assert_eq!(render(&Node::array()).unwrap(), "[]");
}

#[test]
fn render_array_on_one_line() {
    let mut doc = Node::new();
    doc[0].set_value(1);
    doc[1].set_value("two");
    doc[2][1].set_value(true);
    assert_eq!(render(&doc).unwrap(), "[1, \"two\", [\n{\n}, true]]");
}

#[test]
fn render_vivified_elements_as_empty_objects() {
    let mut doc = Node::new();
    doc[1].set_value(5);
    assert_eq!(render(&doc).unwrap(), "[\n{\n}, 5]");
}

// ============================================================================
// Objects
// ============================================================================

#[test]
fn render_empty_object() {
    assert_eq!(render(&Node::new()).unwrap(), "{\n}");
}

#[test]
fn render_flat_object() {
    let mut doc = Node::new();
    doc["a"].set_value(1);
    doc["b"].set_value(2.5);
    doc["c"].set_value(true);
    assert_eq!(
        render(&doc).unwrap(),
        "{\n\t\"a\": 1,\n\t\"b\": 2.5,\n\t\"c\": true\n}"
    );
}

#[test]
fn keys_render_in_lexicographic_order() {
    let mut doc = Node::new();
    doc["zebra"].set_value(1);
    doc["apple"].set_value(2);
    let text = render(&doc).unwrap();
    let apple = text.find("\"apple\"").unwrap();
    let zebra = text.find("\"zebra\"").unwrap();
    assert!(apple < zebra, "{text}");
}

#[test]
fn render_nested_object_indents_with_tabs() {
    let mut doc = Node::new();
    doc["outer"]["inner"].set_value(1);
    doc["z"].set_value(0);
    assert_eq!(
        render(&doc).unwrap(),
        "{\n\t\"outer\": \n\t{\n\t\t\"inner\": 1\n\t},\n\t\"z\": 0\n}"
    );
}

#[test]
fn render_deeply_nested_objects() {
    let mut doc = Node::new();
    doc["a"]["b"]["c"].set_value("x");
    assert_eq!(
        render(&doc).unwrap(),
        "{\n\t\"a\": \n\t{\n\t\t\"b\": \n\t\t{\n\t\t\t\"c\": \"x\"\n\t\t}\n\t}\n}"
    );
}

#[test]
fn render_object_inside_array() {
    let mut doc = Node::new();
    doc["list"][0]["k"].set_value(1);
    assert_eq!(
        render(&doc).unwrap(),
        "{\n\t\"list\": [\n\t{\n\t\t\"k\": 1\n\t}]\n}"
    );
}

#[test]
fn render_labeled_root_object() {
    let mut doc = Node::new();
    doc.set_label("window");
    doc["width"].set_value(640);
    assert_eq!(
        render(&doc).unwrap(),
        "\"window\": {\n\t\"width\": 640\n}"
    );
}

#[test]
fn render_labeled_nested_object() {
    let mut doc = Node::new();
    doc["ui"].set_label("window");
    doc["ui"]["width"].set_value(640);
    assert_eq!(
        render(&doc).unwrap(),
        "{\n\t\"ui\": \"window\": \n\t{\n\t\t\"width\": 640\n\t}\n}"
    );
}

#[test]
fn render_ignores_hidden_containers() {
    let mut doc = Node::new();
    doc["a"].set_value(1);
    doc.set_value("scalar wins");
    assert_eq!(render(&doc).unwrap(), "\"scalar wins\"");
}

#[test]
fn render_is_repeatable() {
    let mut doc = Node::new();
    doc["x"]["y"].set_value(1);
    let first = render(&doc).unwrap();
    let second = doc.render().unwrap();
    assert_eq!(first, second);
}
