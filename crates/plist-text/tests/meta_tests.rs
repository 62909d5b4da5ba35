//! Annotation-tree round trips: unmodified documents reproduce their source
//! text, and edits to the value tree (deletions, additions, replacements) show
//! up without disturbing the rest of the document.

use plist_text::{
    encode, encode_with_meta, reconcile, Dictionary, EncodeOptions, Entry, Integer, KeyedNode, Meta, Node, Value,
};

/// Project-file shaped document exactly as the generator writes it with a tab
/// indent.
const PROJECT: &str = concat!(
    "{\n",
    "\tarchiveVersion = 1;\n",
    "\tclasses = {\n",
    "\t};\n",
    "\tobjectVersion = 56;\n",
    "\tobjects = {\n",
    "/* Begin PBXBuildFile section */\n",
    "\n",
    "\t\tAB12 /* main.swift in Sources */ = {\n",
    "\t\t\tisa = PBXBuildFile;\n",
    "\t\t\tfileRef = CD34 /* main.swift */;\n",
    "\t\t};\n",
    "/* End PBXBuildFile section */\n",
    "\n",
    "\t};\n",
    "\trootObject = EF56 /* Project object */;\n",
    "}",
);

/// Value tree for [`PROJECT`], built in an order unrelated to the source.
fn project_value() -> Value {
    let mut build_file = Dictionary::new();
    build_file.insert("fileRef", Value::from("CD34"));
    build_file.insert("isa", Value::from("PBXBuildFile"));

    let mut objects = Dictionary::new();
    objects.insert("AB12", Value::from(build_file));

    let mut root = Dictionary::new();
    root.insert("rootObject", Value::from("EF56"));
    root.insert("objects", Value::from(objects));
    root.insert("objectVersion", Value::from("56"));
    root.insert("classes", Value::from(Dictionary::new()));
    root.insert("archiveVersion", Value::from("1"));
    Value::from(root)
}

/// Annotation tree a decoder would record for [`PROJECT`].
fn project_meta() -> Meta {
    Meta::with_root(vec![
        Node::keyed("archiveVersion"),
        Node::keyed("classes"),
        Node::keyed("objectVersion"),
        KeyedNode::new("objects")
            .with_child(Node::comment("/* Begin PBXBuildFile section */"))
            .with_child(
                KeyedNode::new("AB12")
                    .with_annotation("/* main.swift in Sources */")
                    .with_child(Node::keyed("isa"))
                    .with_child(
                        KeyedNode::new("fileRef")
                            .with_child(KeyedNode::new("CD34").with_annotation("/* main.swift */")),
                    ),
            )
            .with_child(Node::comment("/* End PBXBuildFile section */"))
            .into(),
        KeyedNode::new("rootObject")
            .with_child(KeyedNode::new("EF56").with_annotation("/* Project object */"))
            .into(),
    ])
}

fn objects_mut(value: &mut Value) -> &mut Dictionary {
    value
        .as_dictionary_mut()
        .and_then(|root| root.get_mut("objects"))
        .and_then(Value::as_dictionary_mut)
        .unwrap()
}

fn write(value: &Value, meta: &Meta) -> String {
    encode_with_meta(value, Some(meta), &EncodeOptions::openstep().indent("\t")).unwrap()
}

// ============================================================================
// Unmodified round trip
// ============================================================================

#[test]
fn unmodified_document_reproduces_source() {
    assert_eq!(write(&project_value(), &project_meta()), PROJECT);
}

#[test]
fn repeated_encodes_are_identical() {
    let value = project_value();
    let meta = project_meta();
    assert_eq!(write(&value, &meta), write(&value, &meta));
}

#[test]
fn unmodified_gnustep_document_reproduces_source() {
    let source = "{flag=<*BY>;\n// typed values\ncount=<*I3>;name=\"two words\" /* label */;}";

    let mut root = Dictionary::new();
    root.insert("name", Value::from("two words"));
    root.insert("count", Value::Integer(Integer::unsigned(3)));
    root.insert("flag", Value::from(true));

    let meta = Meta::with_root(vec![
        Node::keyed("flag"),
        Node::comment("// typed values"),
        Node::keyed("count"),
        KeyedNode::new("name")
            .with_child(KeyedNode::new("two words").with_annotation("/* label */"))
            .into(),
    ]);

    let text = encode_with_meta(&Value::from(root), Some(&meta), &EncodeOptions::gnustep()).unwrap();
    assert_eq!(text, source);
}

// ============================================================================
// Ordering without annotations
// ============================================================================

#[test]
fn without_meta_keys_are_sorted_bytewise() {
    let root: Dictionary = ["b", "B", "a", "_", "10", "9"]
        .into_iter()
        .map(|k| (k, Value::from("1")))
        .collect();
    let text = encode(&Value::from(root), &EncodeOptions::openstep()).unwrap();
    assert_eq!(text, "{10=1;9=1;B=1;_=1;a=1;b=1;}");
}

#[test]
fn empty_meta_behaves_like_no_meta() {
    let value = project_value();
    let opts = EncodeOptions::openstep();
    assert_eq!(
        encode_with_meta(&value, Some(&Meta::new()), &opts).unwrap(),
        encode(&value, &opts).unwrap()
    );
}

#[test]
fn nested_dictionary_without_children_is_sorted() {
    let mut inner = Dictionary::new();
    inner.insert("z", Value::from("1"));
    inner.insert("a", Value::from("2"));
    let mut root = Dictionary::new();
    root.insert("inner", Value::from(inner));
    root.insert("first", Value::from("x"));

    let meta = Meta::with_root(vec![Node::keyed("inner"), Node::keyed("first")]);
    let text = encode_with_meta(&Value::from(root), Some(&meta), &EncodeOptions::openstep()).unwrap();
    assert_eq!(text, "{inner={a=2;z=1;};first=x;}");
}

// ============================================================================
// Edits between decode and encode
// ============================================================================

#[test]
fn deleted_key_drops_its_comment() {
    let mut value = project_value();
    objects_mut(&mut value).remove("AB12");

    let text = write(&value, &project_meta());
    assert!(!text.contains("AB12"));
    assert!(!text.contains("main.swift"));
    assert!(text.contains(concat!(
        "\tobjects = {\n",
        "/* Begin PBXBuildFile section */\n",
        "\n",
        "/* End PBXBuildFile section */\n",
        "\n",
        "\t};\n",
    )));
}

#[test]
fn pruning_meta_matches_leaving_it_stale() {
    let mut value = project_value();
    objects_mut(&mut value).remove("AB12");

    let stale = project_meta();
    let mut pruned = project_meta();
    let removed = pruned
        .root_mut()
        .and_then(Node::as_keyed_mut)
        .and_then(|root| root.child_mut("objects"))
        .and_then(|objects| objects.remove_child("AB12"));
    assert!(removed.is_some());

    assert_eq!(write(&value, &stale), write(&value, &pruned));
}

#[test]
fn added_key_follows_tracked_keys() {
    let mut value = project_value();
    value.as_dictionary_mut().unwrap().insert("bar", Value::from("baz"));

    let text = write(&value, &project_meta());
    let bar = text.find("bar = baz;").unwrap();
    for tracked in ["archiveVersion", "classes", "objectVersion", "objects", "rootObject"] {
        assert!(text.find(tracked).unwrap() < bar, "{tracked} should precede bar");
    }
    assert!(text.ends_with("\trootObject = EF56 /* Project object */;\n\tbar = baz;\n}"));
}

#[test]
fn added_nested_dictionary_is_sorted() {
    let mut value = project_value();
    let mut file_ref = Dictionary::new();
    file_ref.insert("path", Value::from("main.swift"));
    file_ref.insert("isa", Value::from("PBXFileReference"));
    objects_mut(&mut value).insert("CD34", Value::from(file_ref));

    let text = write(&value, &project_meta());
    assert!(text.contains(concat!(
        "/* End PBXBuildFile section */\n",
        "\n",
        "\t\tCD34 = {\n",
        "\t\t\tisa = PBXFileReference;\n",
        "\t\t\tpath = main.swift;\n",
        "\t\t};\n",
        "\t};\n",
    )));
}

#[test]
fn replaced_value_keeps_position_but_not_old_comment() {
    let mut value = project_value();
    value.as_dictionary_mut().unwrap().insert("rootObject", Value::from("XY99"));

    let text = write(&value, &project_meta());
    assert!(text.ends_with("\trootObject = XY99;\n}"));
    assert!(!text.contains("Project object"));
}

#[test]
fn changed_value_type_is_rendered_in_place() {
    let mut value = project_value();
    value
        .as_dictionary_mut()
        .unwrap()
        .insert("objectVersion", Value::Integer(Integer::unsigned(60)));

    let text = write(&value, &project_meta());
    assert!(text.contains("\tclasses = {\n\t};\n\tobjectVersion = 60;\n\tobjects = {\n"));
}

// ============================================================================
// Reconciliation view
// ============================================================================

#[test]
fn reconcile_orders_comments_pairs_and_new_keys() {
    let mut dict = Dictionary::new();
    dict.insert("new", Value::from("n"));
    dict.insert("kept", Value::from("k"));

    let nodes = vec![
        Node::comment("/* head */"),
        Node::keyed("gone"),
        Node::keyed("kept"),
        Node::comment("/* tail */"),
    ];
    let entries = reconcile(&dict, &nodes);

    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0], Entry::Comment("/* head */"));
    assert!(matches!(entries[1], Entry::Pair { key: "kept", node: Some(_), .. }));
    assert_eq!(entries[2], Entry::Comment("/* tail */"));
    assert!(matches!(entries[3], Entry::Pair { key: "new", node: None, .. }));
}

#[test]
fn reconcile_does_not_touch_inputs() {
    let value = project_value();
    let meta = project_meta();
    let before = (value.clone(), meta.clone());
    let _ = write(&value, &meta);
    assert_eq!((value, meta), before);
}

// ============================================================================
// Annotation tree persistence
// ============================================================================

#[test]
fn meta_survives_json_serialization() {
    let meta = project_meta();
    let json = serde_json::to_string(&meta).unwrap();
    let back: Meta = serde_json::from_str(&json).unwrap();
    assert_eq!(back, meta);
    assert_eq!(write(&project_value(), &back), PROJECT);
}

#[test]
fn meta_accessors() {
    let meta = project_meta();
    let siblings = meta.root_siblings();
    assert_eq!(siblings.len(), 5);
    assert_eq!(siblings[3].text(), "objects");
    assert_eq!(siblings[3].children()[0].text(), "/* Begin PBXBuildFile section */");
    assert!(siblings[3].children()[0].as_keyed().is_none());

    let root_object = meta.root().and_then(Node::as_keyed).and_then(|r| r.child("rootObject")).unwrap();
    assert_eq!(root_object.children[0].annotations(), ["/* Project object */".to_string()]);
}
