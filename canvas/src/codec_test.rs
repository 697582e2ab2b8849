use serde::Deserialize;
use serde_json::json;

use super::*;
use crate::consts::{DEFAULT_ITEM_HEIGHT, DEFAULT_ITEM_WIDTH};

// =============================================================
// Helpers
// =============================================================

/// Payload with a size that depends on its kind, like page-builder blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Card {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
}

impl Payload for Card {
    fn default_width(&self) -> i64 {
        if self.kind == "hero" { 800 } else { 300 }
    }

    fn default_height(&self) -> i64 {
        if self.kind == "hero" { 400 } else { 100 }
    }
}

fn card(kind: &str) -> Card {
    Card { kind: kind.to_owned(), title: None }
}

fn item<T>(id: &str, x: i64, y: i64, w: i64, h: i64, z: i64, payload: T) -> PositionedItem<T> {
    PositionedItem::new(ItemId::from(id), Geometry::new(x, y, w, h, z), payload)
}

fn geometry_of<T>(doc: &CanvasDocument<T>, index: usize) -> Geometry {
    doc.items()[index].geometry()
}

// =============================================================
// Encoding
// =============================================================

#[test]
fn encode_item_merges_geometry_into_payload() {
    let it = item("a", 10, 20, 300, 120, 2, json!({ "type": "text", "content": "hi" }));
    assert_eq!(
        encode_item(&it).unwrap(),
        json!({
            "id": "a", "x": 10, "y": 20, "width": 300, "height": 120, "zIndex": 2,
            "type": "text", "content": "hi",
        })
    );
}

#[test]
fn encode_item_geometry_overrides_payload_keys() {
    let it = item("a", 10, 20, 300, 120, 2, json!({ "x": 999, "id": "stale" }));
    let v = encode_item(&it).unwrap();
    assert_eq!(v["x"], json!(10));
    assert_eq!(v["id"], json!("a"));
}

#[test]
fn encode_item_null_payload_is_geometry_only() {
    let it = item("a", 0, 0, 50, 30, 1, serde_json::Value::Null);
    let v = encode_item(&it).unwrap();
    assert_eq!(v.as_object().unwrap().len(), 6);
}

#[test]
fn encode_item_rejects_scalar_payload() {
    let it = item("a", 0, 0, 50, 30, 1, json!(42));
    let err = encode_item(&it).unwrap_err();
    assert!(matches!(err, CodecError::PayloadNotObject { id } if id.as_str() == "a"));
}

#[test]
fn encode_items_keeps_document_order() {
    let doc = CanvasDocument::from_items(vec![
        item("b", 0, 0, 100, 100, 5, json!({})),
        item("a", 0, 0, 100, 100, 1, json!({})),
    ])
    .unwrap();
    let v = encode_items(&doc).unwrap();
    let ids: Vec<&str> = v[ITEMS_KEY].as_array().unwrap().iter().map(|e| e["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[test]
fn encode_empty_document() {
    let doc: CanvasDocument<serde_json::Value> = CanvasDocument::new();
    assert_eq!(encode_items(&doc).unwrap(), json!({ "items": [] }));
}

// =============================================================
// Decoding: native documents
// =============================================================

#[test]
fn round_trip_preserves_everything() {
    let doc = CanvasDocument::from_items(vec![
        item("hero", 0, 0, 800, 400, 1, Card { kind: "hero".into(), title: Some("Welcome".into()) }),
        item("text", 820, 40, 300, 150, 3, card("text")),
    ])
    .unwrap();

    let stored = encode_items(&doc).unwrap();
    let back: CanvasDocument<Card> = decode_items(&stored).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn decode_reads_explicit_geometry() {
    let stored = json!({ "items": [
        { "id": "a", "type": "text", "x": 40, "y": 60, "width": 250, "height": 90, "zIndex": 7 },
    ]});
    let doc: CanvasDocument<Card> = decode_items(&stored).unwrap();
    assert_eq!(geometry_of(&doc, 0), Geometry::new(40, 60, 250, 90, 7));
    assert_eq!(doc.items()[0].payload, card("text"));
}

#[test]
fn decode_strips_geometry_from_payload() {
    let stored = json!({ "items": [{ "id": "a", "x": 1, "y": 2, "width": 100, "height": 50, "zIndex": 1, "k": "v" }] });
    let doc: CanvasDocument<serde_json::Value> = decode_items(&stored).unwrap();
    assert_eq!(doc.items()[0].payload, json!({ "k": "v" }));
}

#[test]
fn decode_accepts_bare_array() {
    let stored = json!([{ "id": "a", "x": 5, "y": 5, "width": 100, "height": 100, "zIndex": 1 }]);
    let doc: CanvasDocument<serde_json::Value> = decode_items(&stored).unwrap();
    assert_eq!(doc.len(), 1);
}

#[test]
fn decode_accepts_string_encoded_document() {
    let text = json!({ "items": [{ "id": "a", "x": 5, "y": 6, "width": 100, "height": 100, "zIndex": 1 }] }).to_string();
    let doc: CanvasDocument<serde_json::Value> = decode_items(&json!(text)).unwrap();
    assert_eq!(geometry_of(&doc, 0), Geometry::new(5, 6, 100, 100, 1));
}

#[test]
fn decode_reads_numeric_strings_and_px() {
    let stored = json!({ "items": [
        { "id": "a", "x": "12", "y": " 30px ", "width": "250px", "height": 80.6, "zIndex": "2" },
    ]});
    let doc: CanvasDocument<serde_json::Value> = decode_items(&stored).unwrap();
    assert_eq!(geometry_of(&doc, 0), Geometry::new(12, 30, 250, 81, 2));
}

#[test]
fn decode_clamps_out_of_range_geometry() {
    let stored = json!({ "items": [{ "id": "a", "x": -40, "y": -1, "width": 10, "height": 5, "zIndex": 1 }] });
    let doc: CanvasDocument<serde_json::Value> = decode_items(&stored).unwrap();
    assert_eq!(geometry_of(&doc, 0), Geometry::new(0, 0, 50, 30, 1));
}

#[test]
fn huge_geometry_falls_back_to_defaults() {
    let stored = json!({ "items": [
        { "id": "a", "x": 1e30, "y": 9.3e18, "width": 100, "height": 100 },
        { "id": "b", "width": i64::MAX, "height": "-1e300px" },
    ] });
    let doc: CanvasDocument<serde_json::Value> = decode_items(&stored).unwrap();

    assert_eq!(geometry_of(&doc, 0), Geometry::new(0, 0, 100, 100, 1));
    assert_eq!(geometry_of(&doc, 1), Geometry::new(0, 100 + LEGACY_STACK_GAP_PX, DEFAULT_ITEM_WIDTH, DEFAULT_ITEM_HEIGHT, 2));
}

#[test]
fn largest_stored_pixel_value_is_accepted() {
    let stored = json!([{ "id": "a", "x": MAX_STORED_PX, "y": MAX_STORED_PX + 1 }]);
    let doc: CanvasDocument<serde_json::Value> = decode_items(&stored).unwrap();
    let g = geometry_of(&doc, 0);
    assert_eq!((g.x, g.y), (MAX_STORED_PX, 0));
}

// =============================================================
// Decoding: empty documents
// =============================================================

#[test]
fn empty_forms_decode_to_empty_document() {
    for stored in [json!(null), json!(""), json!("   "), json!({}), json!({ "items": null }), json!({ "items": [] }), json!([])] {
        let doc: CanvasDocument<serde_json::Value> = decode_items(&stored).unwrap();
        assert!(doc.is_empty(), "{stored}");
    }
}

#[test]
fn empty_graph_forms_decode_to_empty_graph() {
    for stored in [json!(null), json!(""), json!({})] {
        let graph: GraphDocument<serde_json::Value> = decode_graph(&stored).unwrap();
        assert!(graph.nodes.is_empty() && graph.edges.is_empty(), "{stored}");
    }
}

// =============================================================
// Decoding: legacy documents
// =============================================================

#[test]
fn legacy_items_stack_vertically_with_defaults() {
    let stored = json!({ "items": [{ "type": "hero" }, { "type": "text" }, { "type": "text" }] });
    let doc: CanvasDocument<Card> = decode_items(&stored).unwrap();

    assert_eq!(geometry_of(&doc, 0), Geometry::new(0, 0, 800, 400, 1));
    assert_eq!(geometry_of(&doc, 1), Geometry::new(0, 400 + LEGACY_STACK_GAP_PX, 300, 100, 2));
    assert_eq!(geometry_of(&doc, 2), Geometry::new(0, 400 + LEGACY_STACK_GAP_PX + 100 + LEGACY_STACK_GAP_PX, 300, 100, 3));
}

#[test]
fn legacy_items_do_not_overlap() {
    let stored = json!([{}, {}, {}, {}]);
    let doc: CanvasDocument<serde_json::Value> = decode_items(&stored).unwrap();
    for pair in doc.items().windows(2) {
        assert!(pair[0].geometry().bottom() < pair[1].y());
    }
}

#[test]
fn legacy_z_index_follows_document_order() {
    let stored = json!([{}, {}, {}]);
    let doc: CanvasDocument<serde_json::Value> = decode_items(&stored).unwrap();
    let z: Vec<i64> = doc.iter().map(PositionedItem::z_index).collect();
    assert_eq!(z, vec![1, 2, 3]);
}

#[test]
fn legacy_z_index_skips_dropped_entries() {
    let stored = json!([{}, 5, "x", {}]);
    let doc: CanvasDocument<serde_json::Value> = decode_items(&stored).unwrap();
    let z: Vec<i64> = doc.iter().map(PositionedItem::z_index).collect();
    assert_eq!(z, vec![1, 2]);
}

#[test]
fn legacy_value_payload_uses_generic_defaults() {
    let doc: CanvasDocument<serde_json::Value> = decode_items(&json!([{ "label": "x" }])).unwrap();
    let g = geometry_of(&doc, 0);
    assert_eq!((g.width, g.height), (DEFAULT_ITEM_WIDTH, DEFAULT_ITEM_HEIGHT));
}

#[test]
fn mixed_document_stacks_below_placed_items() {
    let stored = json!([
        { "id": "placed", "x": 400, "y": 100, "width": 200, "height": 200, "zIndex": 4 },
        { "id": "legacy" },
    ]);
    let doc: CanvasDocument<serde_json::Value> = decode_items(&stored).unwrap();
    let legacy = doc.get(&ItemId::from("legacy")).unwrap();
    assert_eq!(legacy.x(), 0);
    assert_eq!(legacy.y(), 300 + LEGACY_STACK_GAP_PX);
    assert_eq!(legacy.z_index(), 2);
}

#[test]
fn partial_geometry_keeps_what_is_present() {
    let doc: CanvasDocument<Card> = decode_items(&json!([{ "type": "hero", "x": 120, "zIndex": 9 }])).unwrap();
    assert_eq!(geometry_of(&doc, 0), Geometry::new(120, 0, 800, 400, 9));
}

#[test]
fn unreadable_geometry_falls_back_to_defaults() {
    let stored = json!([{ "x": "left", "y": true, "width": null, "height": {}, "zIndex": "top" }]);
    let doc: CanvasDocument<serde_json::Value> = decode_items(&stored).unwrap();
    assert_eq!(geometry_of(&doc, 0), Geometry::new(0, 0, DEFAULT_ITEM_WIDTH, DEFAULT_ITEM_HEIGHT, 1));
}

// =============================================================
// Decoding: ids
// =============================================================

#[test]
fn numeric_ids_are_kept_as_text() {
    let doc: CanvasDocument<serde_json::Value> = decode_items(&json!([{ "id": 17 }])).unwrap();
    assert_eq!(doc.items()[0].id.as_str(), "17");
}

#[test]
fn float_ids_read_like_item_id() {
    let doc: CanvasDocument<serde_json::Value> = decode_items(&json!([{ "id": 1.0 }, { "id": 2.5 }])).unwrap();
    for (item, raw) in doc.iter().zip([json!(1.0), json!(2.5)]) {
        assert_eq!(item.id, ItemId::deserialize(raw).unwrap());
    }
    assert_eq!(doc.items()[0].id.as_str(), "1");
}

#[test]
fn unusable_ids_are_generated() {
    let doc: CanvasDocument<serde_json::Value> =
        decode_items(&json!([{ "id": true }, { "id": ["a"] }, { "id": "  " }])).unwrap();
    assert_eq!(doc.len(), 3);
    assert!(doc.iter().all(|it| !it.id.as_str().trim().is_empty() && it.id.as_str() != "true"));
}

#[test]
fn missing_ids_are_generated() {
    let doc: CanvasDocument<serde_json::Value> = decode_items(&json!([{}, { "id": "" }, { "id": null }])).unwrap();
    assert_eq!(doc.len(), 3);
    assert!(doc.iter().all(|it| !it.id.as_str().is_empty()));
}

#[test]
fn duplicate_ids_are_replaced() {
    let doc: CanvasDocument<serde_json::Value> =
        decode_items(&json!([{ "id": "a", "n": 1 }, { "id": "a", "n": 2 }])).unwrap();
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.items()[0].id.as_str(), "a");
    assert_ne!(doc.items()[1].id.as_str(), "a");
    assert_eq!(doc.items()[1].payload, json!({ "n": 2 }));
}

// =============================================================
// Decoding: failures
// =============================================================

#[test]
fn non_object_entries_are_skipped() {
    let doc: CanvasDocument<serde_json::Value> = decode_items(&json!([1, "x", { "id": "a" }, null])).unwrap();
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.items()[0].id.as_str(), "a");
}

#[test]
fn invalid_json_string_is_an_error() {
    let err = decode_items::<serde_json::Value>(&json!("{not json")).unwrap_err();
    assert!(matches!(err, CodecError::Json(_)));
}

#[test]
fn wrong_shapes_are_errors() {
    for stored in [json!(3), json!(true), json!({ "items": 5 }), json!({ "items": {} })] {
        let err = decode_items::<serde_json::Value>(&stored).unwrap_err();
        assert!(matches!(err, CodecError::UnexpectedShape(_)), "{stored}");
    }
}

#[test]
fn unreadable_payload_reports_index() {
    let stored = json!([{ "type": "text" }, { "type": 12 }]);
    let err = decode_items::<Card>(&stored).unwrap_err();
    assert!(matches!(err, CodecError::Payload { index: 1, .. }));
}

// =============================================================
// Graph documents
// =============================================================

#[test]
fn graph_round_trip_preserves_edges() {
    let graph = GraphDocument {
        nodes: CanvasDocument::from_items(vec![
            item("ceo", 300, 0, 180, 64, 1, json!({ "label": "CEO" })),
            item("cto", 100, 140, 180, 64, 2, json!({ "label": "CTO" })),
        ])
        .unwrap(),
        edges: vec![json!({ "from": "ceo", "to": "cto", "style": "solid" })],
    };

    let stored = encode_graph(&graph.nodes, &graph.edges).unwrap();
    assert_eq!(stored[EDGES_KEY], json!([{ "from": "ceo", "to": "cto", "style": "solid" }]));

    let back: GraphDocument<serde_json::Value> = decode_graph(&stored).unwrap();
    assert_eq!(back, graph);
}

#[test]
fn legacy_graph_nodes_get_defaults() {
    let stored = json!({ "nodes": [{ "id": "a" }, { "id": "b" }], "edges": [{ "from": "a", "to": "b" }] });
    let graph: GraphDocument<serde_json::Value> = decode_graph(&stored).unwrap();
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.nodes.items()[1].y(), DEFAULT_ITEM_HEIGHT + LEGACY_STACK_GAP_PX);
}

#[test]
fn graph_rejects_non_array_edges() {
    let err = decode_graph::<serde_json::Value>(&json!({ "nodes": [], "edges": "a->b" })).unwrap_err();
    assert!(matches!(err, CodecError::UnexpectedShape(_)));
}

#[test]
fn graph_rejects_bare_array() {
    let err = decode_graph::<serde_json::Value>(&json!([])).unwrap_err();
    assert!(matches!(err, CodecError::UnexpectedShape(_)));
}
