#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn default_viewport_is_identity() {
    let vp = Viewport::default();
    assert_eq!(vp.to_canvas(ClientPoint::new(150.0, 130.0)), Point::new(150, 130));
}

#[test]
fn origin_is_subtracted() {
    let mut vp = Viewport::default();
    vp.set_origin(240.0, 64.0);
    assert_eq!(vp.to_canvas(ClientPoint::new(340.0, 164.0)), Point::new(100, 100));
}

#[test]
fn scroll_is_added() {
    let mut vp = Viewport::default();
    vp.set_scroll(500.0, 250.0);
    assert_eq!(vp.to_canvas(ClientPoint::new(10.0, 10.0)), Point::new(510, 260));
}

#[test]
fn negative_scroll_clamps_to_zero() {
    let mut vp = Viewport::default();
    vp.set_scroll(-10.0, -20.0);
    assert_eq!(vp.scroll_x, 0.0);
    assert_eq!(vp.scroll_y, 0.0);
}

#[test]
fn zoom_divides_after_offsets() {
    let mut vp = Viewport::default();
    vp.set_origin(100.0, 0.0);
    vp.set_scroll(100.0, 0.0);
    vp.set_zoom(2.0);
    // (300 - 100 + 100) / 2
    assert_eq!(vp.to_canvas(ClientPoint::new(300.0, 80.0)), Point::new(150, 40));
}

#[test]
fn fractional_positions_round() {
    let mut vp = Viewport::default();
    vp.set_zoom(1.5);
    assert_eq!(vp.to_canvas(ClientPoint::new(100.0, 101.0)), Point::new(67, 67));
}

#[test]
fn zoom_clamps() {
    let mut vp = Viewport::default();
    vp.set_zoom(100.0);
    assert_eq!(vp.zoom, crate::consts::MAX_ZOOM);
    vp.set_zoom(0.0);
    assert_eq!(vp.zoom, crate::consts::MIN_ZOOM);
    vp.set_zoom(f64::NAN);
    assert_eq!(vp.zoom, 1.0);
}

#[test]
fn to_client_inverts_to_canvas() {
    let mut vp = Viewport::default();
    vp.set_origin(12.0, 34.0);
    vp.set_scroll(40.0, 80.0);
    vp.set_zoom(2.0);
    let pt = Point::new(123, 456);
    assert_eq!(vp.to_canvas(vp.to_client(pt)), pt);
}
