use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use formats::AssetHandle;
use foundation::math::{LngLat, Mat4, Vec3};
use layers::host::{MapEvent, MapHost, MarkerId, MarkerKind, RecordingMap};
use layers::pins::{PinsLayer, StaticAssetSource};
use layers::route::{ROUTE_CORE_LAYER_ID, ROUTE_GLOW_LAYER_ID, ROUTE_SOURCE_ID, RouteSegmentMeta};
use layers::{LayerId, SourceId};
use pretty_assertions::assert_eq;
use route_view::{RouteMapView, ViewConfig};
use runtime::{LocationError, LocationEvent, LocationSource, WatchId};
use scene::components::Mesh;
use scene::{ObjectKind, Pin, PinId};

fn assert_close(a: f64, b: f64, eps: f64) {
    let diff = (a - b).abs();
    assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
}

fn pin_asset() -> StaticAssetSource {
    let asset = AssetHandle::from_meshes(
        "pin",
        vec![Mesh::new(
            vec![Vec3::new(-0.3, -0.1, -0.3), Vec3::new(0.3, 1.1, 0.3)],
            vec![],
        )],
    );
    StaticAssetSource::new().with_asset("/models/pin.glb", asset)
}

fn mounted() -> RouteMapView<RecordingMap> {
    RouteMapView::mount(RecordingMap::dark_style(), ViewConfig::default(), Rc::new(pin_asset()))
}

fn pins_layer(view: &RouteMapView<RecordingMap>) -> &PinsLayer {
    view.host()
        .custom_layer::<PinsLayer>(&LayerId::new("three-pins"))
        .expect("pins layer")
}

fn route_visible(map: &RecordingMap) -> bool {
    map.has_layer(&LayerId::new(ROUTE_GLOW_LAYER_ID))
        || map.has_layer(&LayerId::new(ROUTE_CORE_LAYER_ID))
        || map.has_source(&SourceId::new(ROUTE_SOURCE_ID))
}

fn click_target(view: &RouteMapView<RecordingMap>, pin_lng: f64) -> MarkerId {
    view.host()
        .markers_of(MarkerKind::ClickTarget)
        .into_iter()
        .find(|(_, spec)| spec.position.lng == pin_lng)
        .map(|(id, _)| id)
        .expect("click target")
}

#[test]
fn single_pin_without_route() {
    let mut view = mounted();
    view.set_pins(vec![Pin::new("1", 127.38, 36.35)]);
    view.set_route(Vec::new());
    view.handle_event(MapEvent::StyleLoaded);

    let map = view.host();
    assert!(!route_visible(map));
    assert_eq!(map.markers_of(MarkerKind::ClickTarget).len(), 1);
    assert_eq!(map.markers_of(MarkerKind::LabelBadge).len(), 1);
    assert_eq!(map.markers_of(MarkerKind::DurationBadge).len(), 0);
    assert_eq!(map.markers_of(MarkerKind::StartMarker).len(), 0);
    assert_eq!(pins_layer(&view).scene().len(), 1);
    assert!(map.errors().is_empty(), "{:?}", map.errors());
}

#[test]
fn drive_segment_badge_at_midpoint() {
    let mut view = mounted();
    view.handle_event(MapEvent::StyleLoaded);
    view.set_route(vec![LngLat::new(127.38, 36.35), LngLat::new(127.39, 36.36)]);
    view.set_segments(vec![RouteSegmentMeta {
        drive_minutes: Some(8.0),
        ..Default::default()
    }]);

    let badges = view.host().markers_of(MarkerKind::DurationBadge);
    assert_eq!(badges.len(), 1);
    let (_, badge) = badges[0];
    assert_eq!(badge.element.text.as_deref(), Some("drive 8m"));
    assert_close(badge.position.lng, 127.385, 1e-9);
    assert_close(badge.position.lat, 36.355, 1e-9);
    assert!(route_visible(view.host()));
    assert_eq!(view.host().markers_of(MarkerKind::StartMarker).len(), 1);
}

#[test]
fn layer_order_after_style_load() {
    let mut view = mounted();
    view.set_route(vec![LngLat::new(127.38, 36.35), LngLat::new(127.39, 36.36)]);
    view.handle_event(MapEvent::StyleLoaded);

    let ids: Vec<String> = view.host().layer_ids().into_iter().map(|l| l.0).collect();
    assert_eq!(
        ids,
        vec![
            "land",
            "water",
            "road",
            "3d-buildings",
            "road-label",
            "poi-label",
            "three-pins",
            "route-glow",
            "route-core",
        ]
    );
}

#[test]
fn shrinking_route_removes_every_route_visual() {
    let mut view = mounted();
    view.handle_event(MapEvent::StyleLoaded);
    view.set_segments(vec![RouteSegmentMeta {
        walk_minutes: Some(5.0),
        ..Default::default()
    }]);
    view.set_route(vec![LngLat::new(127.38, 36.35), LngLat::new(127.39, 36.36)]);
    assert!(route_visible(view.host()));

    view.set_route(vec![LngLat::new(127.38, 36.35)]);
    let map = view.host();
    assert!(!route_visible(map));
    assert!(map.markers_of(MarkerKind::DurationBadge).is_empty());
    assert!(map.markers_of(MarkerKind::StartMarker).is_empty());
    assert!(map.errors().is_empty(), "{:?}", map.errors());
}

#[test]
fn changing_pins_replaces_the_whole_layer() {
    let mut view = mounted();
    view.set_pins(vec![Pin::new("1", 127.38, 36.35), Pin::new("2", 127.39, 36.36)]);
    view.handle_event(MapEvent::StyleLoaded);
    assert_eq!(pins_layer(&view).scene().len(), 2);

    view.set_pins(vec![Pin::new("3", 127.40, 36.37)]);
    let layer = pins_layer(&view);
    let ids: Vec<&str> = layer.scene().pin_ids().map(PinId::as_str).collect();
    assert_eq!(ids, vec!["3"]);
    assert!(layer.scene().objects().all(|o| o.kind == ObjectKind::AssetClone));

    let map = view.host();
    assert_eq!(map.render_logs().len(), 2);
    assert!(map.render_logs()[0].borrow().disposed);
    assert_eq!(map.markers_of(MarkerKind::ClickTarget).len(), 1);
    assert!(map.errors().is_empty(), "{:?}", map.errors());
}

#[test]
fn missing_asset_falls_back_to_cones() {
    let mut view = RouteMapView::mount(
        RecordingMap::dark_style(),
        ViewConfig::default(),
        Rc::new(StaticAssetSource::new()),
    );
    view.set_pins(vec![Pin::new("1", 127.38, 36.35), Pin::new("2", 127.39, 36.36)]);
    view.handle_event(MapEvent::StyleLoaded);

    let layer = pins_layer(&view);
    assert_eq!(layer.scene().len(), 2);
    assert!(layer.scene().objects().all(|o| o.kind == ObjectKind::FallbackCone));
    // The map keeps rendering.
    view.host_mut().render_frame(&Mat4::IDENTITY);
    assert_eq!(view.host().render_logs()[0].borrow().frames.len(), 1);
}

#[test]
fn pin_click_reports_only_the_confirming_click() {
    let mut view = mounted();
    let clicked = Rc::new(RefCell::new(Vec::new()));
    let sink = clicked.clone();
    view.set_on_pin_click(move |pin| sink.borrow_mut().push(pin));
    view.set_pins(vec![Pin::new("1", 127.38, 36.35), Pin::new("2", 127.39, 36.36)]);
    view.handle_event(MapEvent::StyleLoaded);

    let first = click_target(&view, 127.38);
    view.handle_event(MapEvent::MarkerClicked(first));
    assert!(clicked.borrow().is_empty());
    assert_eq!(view.host().fly_tos().len(), 1);

    // Our own fly-to starts a zoom; it must not clear focus.
    view.handle_event(MapEvent::ZoomStart { user_initiated: false });
    view.handle_event(MapEvent::MarkerClicked(first));
    assert_eq!(*clicked.borrow(), vec![PinId::from("1")]);

    // Panning disengages, so the next click is a first click again.
    view.handle_event(MapEvent::DragStart);
    view.handle_event(MapEvent::MarkerClicked(first));
    assert_eq!(clicked.borrow().len(), 1);
    assert_eq!(view.host().fly_tos().len(), 2);
}

#[test]
fn photos_follow_pins() {
    let mut view = mounted();
    view.set_pins(vec![
        Pin::new("1", 127.38, 36.35).with_place_id(10),
        Pin::new("2", 127.39, 36.36),
    ]);
    view.set_photos(HashMap::from([
        ("10".to_string(), "/uploads/a.jpg".to_string()),
        ("2".to_string(), "/uploads/b.jpg".to_string()),
    ]));
    view.handle_event(MapEvent::StyleLoaded);
    assert_eq!(view.host().markers_of(MarkerKind::PhotoCard).len(), 2);

    view.set_pins(vec![Pin::new("2", 127.39, 36.36)]);
    let cards = view.host().markers_of(MarkerKind::PhotoCard);
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].1.element.image_url.as_deref(), Some("/uploads/b.jpg"));
}

#[derive(Default)]
struct FakeGeolocation {
    active: Rc<RefCell<Option<WatchId>>>,
}

impl LocationSource for FakeGeolocation {
    fn watch(&mut self) -> WatchId {
        *self.active.borrow_mut() = Some(WatchId(7));
        WatchId(7)
    }

    fn clear_watch(&mut self, id: WatchId) {
        assert_eq!(self.active.borrow_mut().take(), Some(id));
    }
}

#[test]
fn location_updates_move_the_marker_and_errors_are_ignored() {
    let geolocation = FakeGeolocation::default();
    let active = geolocation.active.clone();
    let mut view = mounted().with_location_source(Box::new(geolocation));
    assert_eq!(*active.borrow(), Some(WatchId(7)));

    view.on_location_event(LocationEvent::Position(LngLat::new(127.381, 36.351)));
    assert!(view.host().markers_of(MarkerKind::CurrentLocation).is_empty());

    view.handle_event(MapEvent::StyleLoaded);
    assert_eq!(view.host().markers_of(MarkerKind::CurrentLocation).len(), 1);

    view.on_location_event(LocationEvent::Error(LocationError {
        code: 1,
        message: "permission denied".to_string(),
    }));
    let current = view.host().markers_of(MarkerKind::CurrentLocation);
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].1.position, LngLat::new(127.381, 36.351));

    view.on_location_event(LocationEvent::Position(LngLat::new(127.382, 36.352)));
    let current = view.host().markers_of(MarkerKind::CurrentLocation);
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].1.position, LngLat::new(127.382, 36.352));

    let map = view.unmount();
    assert_eq!(*active.borrow(), None);
    assert_eq!(map.markers().count(), 0);
}

#[test]
fn unmount_releases_everything() {
    let mut view = mounted();
    view.set_pins(vec![Pin::new("1", 127.38, 36.35)]);
    view.set_route(vec![LngLat::new(127.38, 36.35), LngLat::new(127.39, 36.36)]);
    view.handle_event(MapEvent::StyleLoaded);

    let map = view.unmount();
    assert!(map.layer_ids().is_empty());
    assert_eq!(map.markers().count(), 0);
    assert!(!map.has_source(&SourceId::new(ROUTE_SOURCE_ID)));
    assert!(map.render_logs()[0].borrow().disposed);
    assert!(map.errors().is_empty(), "{:?}", map.errors());
}

#[test]
fn pins_are_scaled_to_the_same_height_in_meters() {
    let mut view = mounted();
    view.set_pins(vec![Pin::new("near", 127.38, 36.35), Pin::new("far", 127.38, 60.0)]);
    view.handle_event(MapEvent::StyleLoaded);

    let scene = pins_layer(&view).scene();
    for id in ["near", "far"] {
        let object = scene.get(&PinId::from(id)).expect("object");
        let lat = if id == "near" { 36.35 } else { 60.0 };
        let m = foundation::math::meters_to_world_unit(lat);
        let world = object.world_bounds();
        assert_close(world.size().z / m, 35.0, 1e-6);
        assert_close(world.min.z, 0.0, 1e-15);
    }
}
