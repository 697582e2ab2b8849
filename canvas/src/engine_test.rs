use serde_json::json;

use super::*;

// =============================================================
// Helpers
// =============================================================

type Core = EngineCore<serde_json::Value>;

fn item(id: &str, x: i64, y: i64, w: i64, h: i64, z: i64) -> PositionedItem<serde_json::Value> {
    PositionedItem::new(ItemId::from(id), Geometry::new(x, y, w, h, z), json!({ "label": id }))
}

fn core_with(items: Vec<PositionedItem<serde_json::Value>>) -> Core {
    EngineCore::with_document(CanvasDocument::from_items(items).unwrap())
}

/// One item at 100,100 sized 200x100.
fn single() -> Core {
    core_with(vec![item("a", 100, 100, 200, 100, 1)])
}

fn id(s: &str) -> ItemId {
    ItemId::from(s)
}

fn pt(x: i64, y: i64) -> Point {
    Point::new(x, y)
}

fn geometry(core: &Core, s: &str) -> Geometry {
    core.item(&id(s)).unwrap().geometry()
}

fn press(core: &mut Core, x: i64, y: i64) -> Vec<Action> {
    core.on_pointer_down(pt(x, y), Button::Primary)
}

fn release(core: &mut Core, x: i64, y: i64) -> Vec<Action> {
    core.on_pointer_up(pt(x, y), Button::Primary)
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_core_is_empty_and_idle() {
    let core = Core::new();
    assert!(core.document().is_empty());
    assert!(core.selection().is_none());
    assert!(core.input.is_idle());
}

#[test]
fn load_document_without_selection_only_renders() {
    let mut core = Core::new();
    let actions = core.load_document(CanvasDocument::from_items(vec![item("a", 0, 0, 100, 100, 1)]).unwrap());
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert_eq!(core.document().len(), 1);
}

#[test]
fn load_document_drops_selection_and_gesture() {
    let mut core = single();
    press(&mut core, 150, 130);
    assert!(!core.input.is_idle());

    let actions = core.load_document(CanvasDocument::new());
    assert_eq!(actions, vec![Action::SelectionChanged(None), Action::RenderNeeded]);
    assert!(core.input.is_idle());
    assert!(core.selection().is_none());
}

// =============================================================
// Adding and removing
// =============================================================

#[test]
fn add_item_to_empty_canvas_lands_at_origin() {
    let mut core = Core::new();
    let actions = core.add_item(id("a"), json!({}), None).unwrap();

    assert_eq!(
        actions,
        vec![Action::ItemAdded(id("a")), Action::SelectionChanged(Some(id("a"))), Action::RenderNeeded]
    );
    assert_eq!(geometry(&core, "a"), Geometry::new(0, 0, 300, 120, 1));
    assert_eq!(core.selection(), Some(&id("a")));
}

#[test]
fn add_item_without_position_goes_below_content() {
    let mut core = single();
    core.add_item(id("b"), json!({}), None).unwrap();
    let g = geometry(&core, "b");
    assert_eq!((g.x, g.y), (0, 200 + 20));
    assert_eq!(g.z_index, 2);
}

#[test]
fn add_item_at_position_is_clamped() {
    let mut core = Core::new();
    core.add_item(id("a"), json!({}), Some(pt(-50, 75))).unwrap();
    assert_eq!((geometry(&core, "a").x, geometry(&core, "a").y), (0, 75));
}

#[test]
fn add_item_duplicate_id_fails() {
    let mut core = single();
    let err = core.add_item(id("a"), json!({}), None).unwrap_err();
    assert_eq!(err, DocError::DuplicateId(id("a")));
    assert_eq!(core.document().len(), 1);
}

#[test]
fn remove_selected_item_clears_selection() {
    let mut core = single();
    core.select(&id("a"));
    let actions = core.remove_item(&id("a"));
    assert_eq!(
        actions,
        vec![Action::ItemRemoved(id("a")), Action::SelectionChanged(None), Action::RenderNeeded]
    );
    assert!(core.document().is_empty());
}

#[test]
fn remove_unknown_item_is_noop() {
    let mut core = single();
    assert!(core.remove_item(&id("ghost")).is_empty());
}

#[test]
fn remove_item_mid_drag_ends_gesture() {
    let mut core = single();
    press(&mut core, 150, 130);
    core.remove_item(&id("a"));
    assert!(core.input.is_idle());
}

// =============================================================
// Geometry edits and ordering
// =============================================================

#[test]
fn set_geometry_clamps_and_reports() {
    let mut core = single();
    let actions = core.set_geometry(&id("a"), Geometry::new(-5, 10, 20, 400, 3));
    let expected = Geometry::new(0, 10, 50, 400, 3);
    assert_eq!(actions, vec![Action::ItemResized { id: id("a"), geometry: expected }, Action::RenderNeeded]);
    assert_eq!(geometry(&core, "a"), expected);
}

#[test]
fn set_geometry_unchanged_is_silent() {
    let mut core = single();
    assert!(core.set_geometry(&id("a"), Geometry::new(100, 100, 200, 100, 1)).is_empty());
    assert!(core.set_geometry(&id("ghost"), Geometry::default()).is_empty());
}

#[test]
fn bring_to_front_and_send_to_back() {
    let mut core = core_with(vec![item("a", 0, 0, 100, 100, 1), item("b", 0, 0, 100, 100, 2)]);

    let actions = core.bring_to_front(&id("a"));
    assert_eq!(actions, vec![Action::ItemReordered { id: id("a"), z_index: 3 }, Action::RenderNeeded]);

    assert!(core.bring_to_front(&id("a")).is_empty());

    let actions = core.send_to_back(&id("a"));
    assert_eq!(actions, vec![Action::ItemReordered { id: id("a"), z_index: 1 }, Action::RenderNeeded]);
    assert!(core.send_to_back(&id("ghost")).is_empty());
}

// =============================================================
// Selection
// =============================================================

#[test]
fn select_and_reselect() {
    let mut core = single();
    assert_eq!(core.select(&id("a")), vec![Action::SelectionChanged(Some(id("a"))), Action::RenderNeeded]);
    assert!(core.select(&id("a")).is_empty());
    assert!(core.select(&id("ghost")).is_empty());
    assert_eq!(core.selection(), Some(&id("a")));
}

#[test]
fn clear_selection_only_when_selected() {
    let mut core = single();
    assert!(core.clear_selection().is_empty());
    core.select(&id("a"));
    assert_eq!(core.clear_selection(), vec![Action::SelectionChanged(None), Action::RenderNeeded]);
}

// =============================================================
// Dragging
// =============================================================

#[test]
fn press_on_item_selects_and_starts_drag() {
    let mut core = single();
    let actions = press(&mut core, 150, 130);
    assert_eq!(actions, vec![Action::SelectionChanged(Some(id("a"))), Action::RenderNeeded]);
    assert!(matches!(core.input, InputState::DraggingItem(_)));
}

#[test]
fn drag_follows_pointer_with_grab_offset() {
    let mut core = single();
    press(&mut core, 150, 130);

    assert_eq!(core.on_pointer_move(pt(170, 145)), vec![Action::RenderNeeded]);
    let g = geometry(&core, "a");
    assert_eq!((g.x, g.y, g.width, g.height), (120, 115, 200, 100));

    let actions = release(&mut core, 170, 145);
    assert_eq!(actions, vec![Action::RenderNeeded, Action::ItemMoved { id: id("a"), x: 120, y: 115 }]);
    assert!(core.input.is_idle());
}

#[test]
fn release_position_is_applied() {
    let mut core = single();
    press(&mut core, 150, 130);
    release(&mut core, 160, 140);
    let g = geometry(&core, "a");
    assert_eq!((g.x, g.y), (110, 110));
}

#[test]
fn click_without_motion_does_not_report_move() {
    let mut core = single();
    press(&mut core, 150, 130);
    let actions = release(&mut core, 150, 130);
    assert!(!actions.iter().any(Action::mutates_document));
}

#[test]
fn drag_past_origin_clamps() {
    let mut core = single();
    press(&mut core, 150, 130);
    core.on_pointer_move(pt(-500, -500));
    let g = geometry(&core, "a");
    assert_eq!((g.x, g.y), (0, 0));
}

#[test]
fn drag_grows_canvas_extent() {
    let mut core = single();
    let before = core.extent();
    press(&mut core, 150, 130);
    release(&mut core, 3050, 2030);
    let after = core.extent();
    assert_eq!(after, Extent { width: 3000 + 200 + 200, height: 2000 + 100 + 200 });
    assert!(after.width > before.width && after.height > before.height);
}

#[test]
fn press_on_empty_canvas_clears_selection() {
    let mut core = single();
    core.select(&id("a"));
    let actions = press(&mut core, 900, 900);
    assert_eq!(actions, vec![Action::SelectionChanged(None), Action::RenderNeeded]);
    assert!(core.input.is_idle());
}

#[test]
fn press_picks_topmost_item() {
    let mut core = core_with(vec![item("low", 0, 0, 300, 300, 1), item("high", 100, 100, 300, 300, 2)]);
    press(&mut core, 150, 150);
    assert_eq!(core.selection(), Some(&id("high")));
}

#[test]
fn non_primary_buttons_are_ignored() {
    let mut core = single();
    assert!(core.on_pointer_down(pt(150, 130), Button::Secondary).is_empty());
    assert!(core.on_pointer_down(pt(150, 130), Button::Middle).is_empty());
    assert!(core.selection().is_none());
    assert!(core.input.is_idle());
}

#[test]
fn begin_drag_unknown_item_is_noop() {
    let mut core = single();
    assert!(core.begin_drag(&id("ghost"), pt(0, 0)).is_empty());
    assert!(core.input.is_idle());
}

#[test]
fn end_drag_does_not_end_resize() {
    let mut core = single();
    core.begin_resize(&id("a"), Handle::E, pt(300, 150));
    assert!(core.end_drag().is_empty());
    assert!(matches!(core.input, InputState::ResizingItem(_)));
}

#[test]
fn item_vanishing_mid_drag_resets_gesture() {
    let mut core = single();
    press(&mut core, 150, 130);
    core.doc.remove(&id("a"));
    assert!(core.on_pointer_move(pt(200, 200)).is_empty());
    assert!(core.input.is_idle());
}

// =============================================================
// Resizing
// =============================================================

#[test]
fn handle_press_on_selected_item_starts_resize() {
    let mut core = single();
    core.select(&id("a"));
    assert!(press(&mut core, 300, 200).is_empty());
    assert!(matches!(&core.input, InputState::ResizingItem(r) if r.handle == Handle::Se));
}

#[test]
fn corner_press_on_unselected_item_drags_instead() {
    let mut core = single();
    press(&mut core, 100, 100);
    assert!(matches!(core.input, InputState::DraggingItem(_)));
}

#[test]
fn se_resize_scenario() {
    let mut core = single();
    core.select(&id("a"));
    press(&mut core, 300, 200);
    core.on_pointer_move(pt(330, 190));
    let actions = release(&mut core, 330, 190);

    let expected = Geometry::new(100, 100, 230, 90, 1);
    assert_eq!(actions, vec![Action::RenderNeeded, Action::ItemResized { id: id("a"), geometry: expected }]);
    assert_eq!(geometry(&core, "a"), expected);
}

#[test]
fn nw_resize_scenario_keeps_far_edges() {
    let mut core = single();
    core.begin_resize(&id("a"), Handle::Nw, pt(100, 100));
    core.on_pointer_move(pt(350, 120));
    core.end_resize();

    let g = geometry(&core, "a");
    assert_eq!((g.x, g.width, g.right()), (250, 50, 300));
    assert_eq!((g.y, g.height, g.bottom()), (120, 80, 200));
}

#[test]
fn begin_resize_selects_item() {
    let mut core = single();
    let actions = core.begin_resize(&id("a"), Handle::S, pt(200, 200));
    assert_eq!(actions, vec![Action::SelectionChanged(Some(id("a"))), Action::RenderNeeded]);
}

#[test]
fn end_resize_without_change_is_silent() {
    let mut core = single();
    core.begin_resize(&id("a"), Handle::S, pt(200, 200));
    assert!(core.end_resize().is_empty());
    assert!(core.input.is_idle());
}

#[test]
fn new_gesture_finishes_the_previous_one() {
    let mut core = single();
    press(&mut core, 150, 130);
    core.on_pointer_move(pt(160, 130));

    let actions = core.begin_resize(&id("a"), Handle::E, pt(310, 150));
    assert_eq!(actions, vec![Action::ItemMoved { id: id("a"), x: 110, y: 100 }]);
    assert!(matches!(core.input, InputState::ResizingItem(_)));
}

#[test]
fn minimum_size_holds_through_engine_resize() {
    let mut core = single();
    core.begin_resize(&id("a"), Handle::Se, pt(300, 200));
    core.on_pointer_move(pt(-1000, -1000));
    let g = geometry(&core, "a");
    assert_eq!((g.width, g.height), (50, 30));
}

// =============================================================
// Hover cursor
// =============================================================

#[test]
fn hover_reports_cursor_changes_only() {
    let mut core = single();
    assert_eq!(core.on_pointer_move(pt(150, 130)), vec![Action::SetCursor("move")]);
    assert!(core.on_pointer_move(pt(160, 140)).is_empty());
    assert_eq!(core.on_pointer_move(pt(900, 900)), vec![Action::SetCursor("default")]);
}

#[test]
fn hover_over_selected_handle_shows_resize_cursor() {
    let mut core = single();
    core.select(&id("a"));
    assert_eq!(core.on_pointer_move(pt(300, 150)), vec![Action::SetCursor("ew-resize")]);
    assert_eq!(core.on_pointer_move(pt(100, 100)), vec![Action::SetCursor("nwse-resize")]);
}

// =============================================================
// Keyboard
// =============================================================

#[test]
fn delete_removes_selected_item() {
    let mut core = single();
    core.select(&id("a"));
    let actions = core.on_key_down(&Key("Delete".into()));
    assert!(actions.contains(&Action::ItemRemoved(id("a"))));
    assert!(core.document().is_empty());
}

#[test]
fn backspace_removes_selected_item() {
    let mut core = single();
    core.select(&id("a"));
    core.on_key_down(&Key("Backspace".into()));
    assert!(core.document().is_empty());
}

#[test]
fn delete_during_gesture_is_ignored() {
    let mut core = single();
    press(&mut core, 150, 130);
    assert!(core.on_key_down(&Key("Delete".into())).is_empty());
    assert_eq!(core.document().len(), 1);
}

#[test]
fn escape_ends_gesture_and_clears_selection() {
    let mut core = single();
    press(&mut core, 150, 130);
    core.on_pointer_move(pt(170, 130));

    let actions = core.on_key_down(&Key("Escape".into()));
    assert_eq!(
        actions,
        vec![
            Action::ItemMoved { id: id("a"), x: 120, y: 100 },
            Action::SelectionChanged(None),
            Action::RenderNeeded,
        ]
    );
    assert!(core.input.is_idle());
}

#[test]
fn other_keys_are_ignored() {
    let mut core = single();
    core.select(&id("a"));
    assert!(core.on_key_down(&Key("a".into())).is_empty());
}

// =============================================================
// Queries
// =============================================================

#[test]
fn scene_shows_handles_for_selection_only() {
    let mut core = core_with(vec![item("a", 0, 0, 100, 100, 1), item("b", 200, 0, 100, 100, 2)]);
    assert!(core.scene().handles.is_empty());

    core.select(&id("b"));
    let scene = core.scene();
    assert_eq!(scene.handles.len(), 8);
    assert_eq!(scene.items.iter().filter(|f| f.selected).count(), 1);
}

#[test]
fn action_mutates_document() {
    assert!(Action::ItemAdded(id("a")).mutates_document());
    assert!(Action::ItemMoved { id: id("a"), x: 0, y: 0 }.mutates_document());
    assert!(!Action::RenderNeeded.mutates_document());
    assert!(!Action::SetCursor("move").mutates_document());
    assert!(!Action::SelectionChanged(None).mutates_document());
}

#[test]
fn device_pixels_rounds_up_and_saturates() {
    assert_eq!(device_pixels(1200, 1.0), 1200);
    assert_eq!(device_pixels(1001, 1.5), 1502);
    assert_eq!(device_pixels(-10, 2.0), 0);
}
