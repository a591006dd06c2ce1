use super::*;
use crate::config::Config;
use crate::coord::Coordinate;
use crate::draw::{DrawingCollaborator, GraphicHandle, GraphicKind, GraphicStyle, Scene};
use crate::error::MeasureError;
use crate::input::{
    Channel, InputNormalizer, MouseButton, NormalizedEvent, RawPointerEvent, ScreenPoint,
};
use crate::measure::{LabelContent, MeasureKind, RecordStatus, geometry};
use crate::pool::{MeasurementPool, PoolEvent, SharedPool};
use crate::provider::{
    Cartesian3, CesiumGlobe, GoogleLatLng, GoogleMaps, ProviderAdapter, ProviderKind,
};
use futures::executor::block_on;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

struct Harness<D: DrawingCollaborator> {
    session: ProviderSession<D>,
    pool: SharedPool,
    t0: Instant,
}

impl Harness<Scene<GoogleMaps>> {
    fn google(kind: MeasureKind) -> Self {
        Self::with_drawer(Scene::new(GoogleMaps), kind)
    }
}

impl<D: DrawingCollaborator> Harness<D> {
    fn with_drawer(drawer: D, kind: MeasureKind) -> Self {
        Self::on_provider(ProviderKind::Google, drawer, kind)
    }

    fn on_provider(provider: ProviderKind, drawer: D, kind: MeasureKind) -> Self {
        let pool = MeasurementPool::shared();
        let mut session =
            ProviderSession::for_provider(provider, pool.clone(), drawer, &Config::default());
        session.activate(kind);
        Self {
            session,
            pool,
            t0: Instant::now(),
        }
    }

    fn send(&mut self, channel: Channel, lat: f64, lon: f64, screen: (f64, f64), ms: u64) {
        let event = NormalizedEvent::new(
            Coordinate::new(lat, lon),
            ScreenPoint::new(screen.0, screen.1),
            self.t0 + Duration::from_millis(ms),
        );
        self.session.handle(channel, &event);
    }

    fn click(&mut self, lat: f64, lon: f64, ms: u64) {
        self.send(Channel::LeftClick, lat, lon, screen_of(lat, lon), ms);
    }

    fn state(&self, kind: MeasureKind) -> ModeState {
        self.session.mode(kind).state()
    }

    fn only_record(&self) -> crate::measure::MeasurementRecord {
        let pool = self.pool.borrow();
        assert_eq!(pool.len(), 1, "expected exactly one record");
        pool.records()[0].clone()
    }
}

fn screen_of(lat: f64, lon: f64) -> (f64, f64) {
    (lon * 1000.0, -lat * 1000.0)
}

/// Completed distance from (10, 20) to (10, 20.1).
fn completed_distance() -> Harness<Scene<GoogleMaps>> {
    let mut h = Harness::google(MeasureKind::Distance);
    h.click(10.0, 20.0, 0);
    h.click(10.0, 20.1, 100);
    h
}

/// Drags the first vertex of [`completed_distance`] to (10.5, 20) and releases.
fn drag_first_vertex(h: &mut Harness<Scene<GoogleMaps>>) {
    let (x, y) = screen_of(10.0, 20.0);
    h.send(Channel::DragStart, 10.0, 20.0, (x, y), 1000);
    h.send(Channel::MouseMove, 10.5, 20.0, (x + 10.0, y), 1010);
    h.send(Channel::MouseUp, 10.5, 20.0, (x + 10.0, y), 1020);
}

fn event_log(pool: &SharedPool) -> Rc<RefCell<Vec<&'static str>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    pool.borrow_mut()
        .subscribe(move |event: &PoolEvent| sink.borrow_mut().push(event.name()));
    log
}

#[test]
fn two_clicks_complete_a_distance() {
    let h = completed_distance();
    let record = h.only_record();

    assert_eq!(record.kind, MeasureKind::Distance);
    assert_eq!(record.coordinates.len(), 2);
    assert_eq!(record.status, RecordStatus::Completed);
    let expected = geometry::distance(&Coordinate::new(10.0, 20.0), &Coordinate::new(10.0, 20.1));
    assert!((record.measurements[0] - expected).abs() < 1e-6);
    assert!((10_900.0..11_000.0).contains(&record.measurements[0]));
    assert_eq!(h.state(MeasureKind::Distance), ModeState::Completed);

    let scene = h.session.drawer();
    assert_eq!(scene.count(GraphicKind::Point), 2);
    assert_eq!(scene.count(GraphicKind::Line), 1);
    assert_eq!(scene.count(GraphicKind::Label), 1);
}

#[test]
fn first_click_writes_a_pending_record() {
    let mut h = Harness::google(MeasureKind::Distance);
    h.click(10.0, 20.0, 0);

    let record = h.only_record();
    assert_eq!(record.status, RecordStatus::Pending);
    assert_eq!(record.coordinates, vec![Coordinate::new(10.0, 20.0)]);
    assert_eq!(record.provider_name, "google");
    assert_eq!(record.label_index, 1);
    assert_eq!(h.state(MeasureKind::Distance), ModeState::Collecting);
}

#[test]
fn area_closes_on_right_click() {
    let mut h = Harness::google(MeasureKind::Area);
    h.click(0.0, 0.0, 0);
    h.click(0.0, 1.0, 100);
    h.click(1.0, 1.0, 200);
    h.click(1.0, 0.0, 300);
    assert_eq!(h.only_record().status, RecordStatus::Pending);

    h.send(Channel::RightClick, 1.0, 0.0, screen_of(1.0, 0.0), 400);

    let record = h.only_record();
    assert_eq!(record.coordinates.len(), 4);
    assert!(record.measurements[0] > 0.0);
    assert_eq!(record.status, RecordStatus::Completed);
    assert_eq!(h.session.drawer().count(GraphicKind::Polygon), 1);
    assert_eq!(h.session.drawer().count(GraphicKind::Line), 0);
}

#[test]
fn area_double_click_drops_duplicate_vertex() {
    let mut h = Harness::google(MeasureKind::Area);
    h.click(0.0, 0.0, 0);
    h.click(0.0, 1.0, 100);
    h.click(1.0, 1.0, 200);
    // The browser delivers the second click of a double-click first.
    h.click(1.0, 1.0, 250);
    h.send(Channel::DoubleClick, 1.0, 1.0, screen_of(1.0, 1.0), 260);

    let record = h.only_record();
    assert_eq!(record.coordinates.len(), 3);
    assert_eq!(record.status, RecordStatus::Completed);
    assert_eq!(h.session.drawer().count(GraphicKind::Point), 3);
}

#[test]
fn area_with_two_points_is_cancelled_on_close() {
    let mut h = Harness::google(MeasureKind::Area);
    h.click(0.0, 0.0, 0);
    h.click(0.0, 1.0, 100);
    h.send(Channel::RightClick, 0.0, 1.0, screen_of(0.0, 1.0), 200);

    assert!(h.pool.borrow().is_empty());
    assert_eq!(h.state(MeasureKind::Area), ModeState::Idle);
    assert!(h.session.drawer().is_empty());
}

#[test]
fn right_click_cancels_distance() {
    let mut h = Harness::google(MeasureKind::Distance);
    h.click(10.0, 20.0, 0);
    h.send(Channel::RightClick, 10.0, 20.0, screen_of(10.0, 20.0), 50);

    assert!(h.pool.borrow().is_empty());
    assert_eq!(h.state(MeasureKind::Distance), ModeState::Idle);
    assert!(h.session.mode(MeasureKind::Distance).working_record().is_none());
}

#[test]
fn point_info_completes_on_one_click() {
    let mut h = Harness::google(MeasureKind::PointInfo);
    h.click(48.8584, 2.2945, 0);

    let record = h.only_record();
    assert_eq!(record.status, RecordStatus::Completed);
    assert_eq!(record.measurements, vec![48.8584, 2.2945, 0.0]);

    let scene = h.session.drawer();
    assert_eq!(scene.count(GraphicKind::Point), 1);
    assert_eq!(scene.count(GraphicKind::Label), 1);
    let label = h
        .session
        .mode(MeasureKind::PointInfo)
        .graphics(record.id)
        .and_then(|g| g.label.as_ref())
        .unwrap();
    assert_eq!(
        scene.graphic(label.id).unwrap().text.as_deref(),
        Some("48.858400, 2.294500")
    );
}

#[test]
fn moves_preview_without_touching_the_pool() {
    let mut h = Harness::google(MeasureKind::Distance);
    h.click(10.0, 20.0, 0);
    h.send(Channel::MouseMove, 10.0, 20.05, screen_of(10.0, 20.05), 30);

    assert_eq!(h.state(MeasureKind::Distance), ModeState::Previewing);
    let preview = h.session.mode(MeasureKind::Distance).preview_graphics();
    let shape = preview.shape.as_ref().unwrap();
    assert_eq!(shape.status, RecordStatus::Moving);
    assert_eq!(shape.positions[1], Coordinate::new(10.0, 20.05));
    assert_eq!(h.only_record().coordinates.len(), 1);

    h.click(10.0, 20.1, 60);
    let mode = h.session.mode(MeasureKind::Distance);
    assert!(mode.preview_graphics().shape.is_none());
    assert_eq!(h.session.drawer().count(GraphicKind::Line), 1);
    assert_eq!(h.session.drawer().count(GraphicKind::Label), 1);
}

#[test]
fn zero_length_distance_is_allowed() {
    let mut h = Harness::google(MeasureKind::Distance);
    h.click(5.0, 5.0, 0);
    h.click(5.0, 5.0, 300);

    let record = h.only_record();
    assert_eq!(record.status, RecordStatus::Completed);
    assert_eq!(record.measurements, vec![0.0]);
}

#[test]
fn every_completed_record_has_its_point_count() {
    let mut h = Harness::google(MeasureKind::Distance);
    h.click(0.0, 0.0, 0);
    h.click(0.0, 1.0, 10);
    h.click(1.0, 0.0, 20);
    h.click(1.0, 1.0, 30);
    h.session.activate(MeasureKind::Area);
    for (i, (lat, lon)) in [(2.0, 2.0), (2.0, 3.0), (3.0, 3.0)].into_iter().enumerate() {
        h.click(lat, lon, 40 + i as u64 * 10);
    }
    h.send(Channel::RightClick, 3.0, 3.0, screen_of(3.0, 3.0), 100);
    h.session.activate(MeasureKind::PointInfo);
    h.click(4.0, 4.0, 110);

    let pool = h.pool.borrow();
    assert_eq!(pool.len(), 4);
    for record in pool.records() {
        assert_eq!(record.status, RecordStatus::Completed);
        assert!(record.has_required_points(), "{record:?}");
    }
}

#[test]
fn dragging_a_vertex_updates_the_record() {
    let mut h = completed_distance();
    let log = event_log(&h.pool);
    drag_first_vertex(&mut h);

    let record = h.only_record();
    assert_eq!(record.coordinates[0], Coordinate::new(10.5, 20.0));
    let expected = geometry::distance(&Coordinate::new(10.5, 20.0), &Coordinate::new(10.0, 20.1));
    assert!((record.measurements[0] - expected).abs() < 1e-6);
    assert_eq!(record.status, RecordStatus::Completed);
    assert!(h.session.drawer().panning_enabled());
    assert_eq!(log.borrow().iter().filter(|n| **n == "drag-end").count(), 1);

    let graphics = h.session.mode(MeasureKind::Distance).graphics(record.id).unwrap();
    let point = graphics.points[0].as_ref().unwrap();
    let native = &h.session.drawer().graphic(point.id).unwrap().positions[0];
    assert_eq!(*native, GoogleLatLng { lat: 10.5, lng: 20.0 });
    assert_eq!(graphics.shape.as_ref().unwrap().status, RecordStatus::Completed);
}

#[test]
fn drag_marks_record_moving_and_locks_panning() {
    let mut h = completed_distance();
    let (x, y) = screen_of(10.0, 20.0);
    h.send(Channel::DragStart, 10.0, 20.0, (x, y), 1000);
    h.send(Channel::MouseMove, 10.2, 20.0, (x + 8.0, y), 1010);

    assert_eq!(h.only_record().status, RecordStatus::Moving);
    // Coordinates are only written back on release.
    assert_eq!(h.only_record().coordinates[0], Coordinate::new(10.0, 20.0));
    assert!(!h.session.drawer().panning_enabled());
    assert!(h.session.mode(MeasureKind::Distance).drag().is_dragging());
}

#[test]
fn second_drag_start_is_refused_while_dragging() {
    let mut h = completed_distance();
    let (x, y) = screen_of(10.0, 20.0);
    h.send(Channel::DragStart, 10.0, 20.0, (x, y), 1000);
    h.send(Channel::MouseMove, 10.2, 20.0, (x + 8.0, y), 1010);
    let (x2, y2) = screen_of(10.0, 20.1);
    h.send(Channel::DragStart, 10.0, 20.1, (x2, y2), 1020);

    let drag = h.session.mode(MeasureKind::Distance).drag();
    assert!(matches!(drag.state(), DragState::Dragging(s) if s.vertex == 0));

    h.send(Channel::MouseUp, 10.2, 20.0, (x + 8.0, y), 1030);
    assert_eq!(h.only_record().status, RecordStatus::Completed);
}

#[test]
fn moving_record_cannot_start_another_drag() {
    let mut h = completed_distance();
    let mut record = h.only_record();
    record.status = RecordStatus::Moving;
    h.pool.borrow_mut().update(record.id, record);

    let (x, y) = screen_of(10.0, 20.0);
    h.send(Channel::DragStart, 10.0, 20.0, (x, y), 1000);
    h.send(Channel::MouseMove, 10.5, 20.0, (x + 20.0, y), 1010);

    assert!(!h.session.mode(MeasureKind::Distance).drag().is_engaged());
    assert_eq!(h.only_record().coordinates[0], Coordinate::new(10.0, 20.0));
}

#[test]
fn press_below_threshold_is_still_a_click() {
    let mut h = completed_distance();
    let (x, y) = screen_of(10.0, 20.0);
    h.send(Channel::DragStart, 10.0, 20.0, (x, y), 1000);
    h.send(Channel::MouseMove, 10.0, 20.0, (x + 2.0, y + 1.0), 1005);
    h.send(Channel::MouseUp, 10.0, 20.0, (x + 2.0, y + 1.0), 1010);
    h.click(10.0, 20.0, 1011);

    assert_eq!(h.pool.borrow().len(), 2);
    assert_eq!(h.state(MeasureKind::Distance), ModeState::Collecting);
    assert_eq!(
        h.pool.borrow().records()[0].coordinates[0],
        Coordinate::new(10.0, 20.0)
    );
}

#[test]
fn click_after_press_cancels_the_armed_drag() {
    let mut h = completed_distance();
    let (x, y) = screen_of(10.0, 20.0);
    h.send(Channel::DragStart, 10.0, 20.0, (x, y), 1000);
    h.click(10.0, 20.0, 1001);
    assert_eq!(h.state(MeasureKind::Distance), ModeState::Collecting);
    assert!(!h.session.mode(MeasureKind::Distance).drag().is_engaged());

    h.send(Channel::MouseMove, 10.05, 20.0, (x + 50.0, y), 1010);

    let mode = h.session.mode(MeasureKind::Distance);
    assert!(!mode.drag().is_dragging());
    assert_eq!(mode.state(), ModeState::Previewing);
    assert!(mode.preview_graphics().shape.is_some());
    assert!(h.session.drawer().panning_enabled());
    assert_eq!(h.pool.borrow().records()[0].status, RecordStatus::Completed);
    assert_eq!(
        h.pool.borrow().records()[0].coordinates[0],
        Coordinate::new(10.0, 20.0)
    );

    h.click(10.1, 20.2, 1100);
    assert_eq!(h.state(MeasureKind::Distance), ModeState::Completed);
    let pool = h.pool.borrow();
    assert_eq!(pool.len(), 2);
    assert!(pool.records().iter().all(|r| r.status == RecordStatus::Completed));
}

#[test]
fn dragging_an_area_vertex_recomputes_the_polygon() {
    let mut h = Harness::google(MeasureKind::Area);
    h.click(0.0, 0.0, 0);
    h.click(0.0, 1.0, 100);
    h.click(1.0, 1.0, 200);
    h.click(1.0, 0.0, 300);
    h.send(Channel::RightClick, 1.0, 0.0, screen_of(1.0, 0.0), 400);
    let before = h.only_record();

    let (x, y) = screen_of(1.0, 1.0);
    h.send(Channel::DragStart, 1.0, 1.0, (x, y), 1000);
    h.send(Channel::MouseMove, 2.0, 2.0, screen_of(2.0, 2.0), 1010);
    h.send(Channel::MouseUp, 2.0, 2.0, screen_of(2.0, 2.0), 1020);

    let after = h.only_record();
    assert_eq!(after.status, RecordStatus::Completed);
    assert_eq!(after.coordinates[2], Coordinate::new(2.0, 2.0));
    assert_eq!(after.coordinates.len(), 4);
    assert!(after.measurements[0] > before.measurements[0]);
    let expected = geometry::polygon_area(&after.coordinates);
    assert!((after.measurements[0] - expected).abs() < 1e-6);

    let graphics = h.session.mode(MeasureKind::Area).graphics(after.id).unwrap();
    let polygon = graphics.shape.as_ref().unwrap();
    assert_eq!(polygon.kind, GraphicKind::Polygon);
    assert!(polygon.positions.contains(&Coordinate::new(2.0, 2.0)));
    assert!(!polygon.positions.contains(&Coordinate::new(1.0, 1.0)));
    assert_eq!(polygon.status, RecordStatus::Completed);
}

#[test]
fn globe_drag_matches_vertices_within_its_tolerance() {
    let globe = CesiumGlobe;
    let normalizer = InputNormalizer::new(globe);
    let mut h =
        Harness::on_provider(ProviderKind::Cesium, Scene::new(globe), MeasureKind::Distance);
    let t0 = h.t0;
    let send = |h: &mut Harness<Scene<CesiumGlobe>>,
                channel: Channel,
                native: Cartesian3,
                screen: (f64, f64),
                ms: u64| {
        let raw = RawPointerEvent {
            channel,
            native,
            screen: ScreenPoint::new(screen.0, screen.1),
            button: Some(MouseButton::Left),
            at: t0 + Duration::from_millis(ms),
        };
        h.session.handle_raw(&normalizer, &raw);
    };

    let start = globe.to_native(&Coordinate::new(10.0, 20.0));
    let end = globe.to_native(&Coordinate::new(10.0, 20.1));
    send(&mut h, Channel::LeftClick, start, screen_of(10.0, 20.0), 0);
    send(&mut h, Channel::LeftClick, end, screen_of(10.0, 20.1), 100);
    let record = h.only_record();
    assert_eq!(record.provider_name, "cesium");
    assert_eq!(record.status, RecordStatus::Completed);

    // A few millimetres off the stored vertex, as a globe pick would be.
    let pressed = Cartesian3 {
        y: start.y + 0.005,
        ..start
    };
    let vertex = record.coordinates[0];
    let picked = crate::coord::normalize(globe.from_native(&pressed)).unwrap();
    assert!(!crate::coord::equal(&picked, &vertex, Some(1e-9)));
    assert!(crate::coord::equal(&picked, &vertex, Some(1e-7)));

    let (x, y) = screen_of(10.0, 20.0);
    let target = globe.to_native(&Coordinate::new(10.5, 20.0));
    send(&mut h, Channel::DragStart, pressed, (x, y), 1000);
    send(&mut h, Channel::MouseMove, target, (x + 20.0, y), 1010);
    assert_eq!(h.only_record().status, RecordStatus::Moving);
    send(&mut h, Channel::MouseUp, target, (x + 20.0, y), 1020);

    let moved = h.only_record();
    assert_eq!(moved.status, RecordStatus::Completed);
    let target_point = Coordinate::new(10.5, 20.0);
    assert!(crate::coord::equal(&moved.coordinates[0], &target_point, Some(1e-9)));
    assert_eq!(moved.coordinates[1], record.coordinates[1]);
    assert!(moved.measurements[0] > record.measurements[0]);
    assert!(h.session.drawer().panning_enabled());
}

#[test]
fn click_right_after_drag_is_swallowed() {
    let mut h = completed_distance();
    drag_first_vertex(&mut h);

    h.click(10.5, 20.0, 1100);
    assert_eq!(h.pool.borrow().len(), 1);
    assert_eq!(h.state(MeasureKind::Distance), ModeState::Completed);

    h.click(30.0, 30.0, 1300);
    assert_eq!(h.pool.borrow().len(), 2);
    assert_eq!(h.state(MeasureKind::Distance), ModeState::Collecting);
}

#[test]
fn deactivate_mid_drag_restores_committed_state() {
    let mut h = completed_distance();
    let (x, y) = screen_of(10.0, 20.0);
    h.send(Channel::DragStart, 10.0, 20.0, (x, y), 1000);
    h.send(Channel::MouseMove, 11.0, 20.0, (x + 30.0, y), 1010);
    h.session.deactivate();

    let record = h.only_record();
    assert_eq!(record.status, RecordStatus::Completed);
    assert_eq!(record.coordinates[0], Coordinate::new(10.0, 20.0));
    assert!(h.session.drawer().panning_enabled());

    let mode = h.session.mode(MeasureKind::Distance);
    assert!(!mode.drag().is_engaged());
    let graphics = mode.graphics(record.id).unwrap();
    assert_eq!(
        graphics.points[0].as_ref().unwrap().positions,
        vec![Coordinate::new(10.0, 20.0)]
    );
    assert_eq!(graphics.label.as_ref().unwrap().status, RecordStatus::Completed);
}

#[test]
fn deactivate_mid_collection_leaves_no_record() {
    let mut h = Harness::google(MeasureKind::Distance);
    h.click(10.0, 20.0, 0);
    assert_eq!(h.pool.borrow().len(), 1);

    h.session.deactivate();
    assert!(h.pool.borrow().is_empty());
    assert!(h.session.drawer().is_empty());
    assert_eq!(h.session.active_kind(), None);
}

#[test]
fn switching_modes_discards_unfinished_work() {
    let mut h = Harness::google(MeasureKind::Distance);
    h.click(10.0, 20.0, 0);
    h.session.activate(MeasureKind::Area);

    assert!(h.pool.borrow().is_empty());
    assert!(!h.session.mode(MeasureKind::Distance).is_active());
    assert!(h.session.mode(MeasureKind::Area).is_active());
}

#[test]
fn inactive_session_ignores_events() {
    let mut h = Harness::google(MeasureKind::Distance);
    h.session.deactivate();
    h.click(10.0, 20.0, 0);
    h.click(10.0, 20.1, 10);
    assert!(h.pool.borrow().is_empty());
}

#[test]
fn remove_by_provider_spares_other_providers() {
    let pool = MeasurementPool::shared();
    let config = Config::default();
    let mut map_a =
        ProviderSession::named(ProviderKind::Google, "mapA", pool.clone(), Scene::new(GoogleMaps), &config);
    let mut map_b =
        ProviderSession::named(ProviderKind::Google, "mapB", pool.clone(), Scene::new(GoogleMaps), &config);
    let t0 = Instant::now();
    let click = |session: &mut ProviderSession<Scene<GoogleMaps>>, lat: f64, lon: f64| {
        let event = NormalizedEvent::new(Coordinate::new(lat, lon), ScreenPoint::default(), t0);
        session.handle(Channel::LeftClick, &event);
    };

    map_a.activate(MeasureKind::PointInfo);
    map_b.activate(MeasureKind::PointInfo);
    click(&mut map_a, 1.0, 1.0);
    click(&mut map_a, 2.0, 2.0);
    click(&mut map_b, 3.0, 3.0);

    let log = event_log(&pool);
    assert_eq!(pool.borrow_mut().remove_by_provider("mapA"), 2);
    assert_eq!(*log.borrow(), vec!["record-removed", "pool-changed"]);

    let pool = pool.borrow();
    assert_eq!(pool.len(), 1);
    assert_eq!(pool.records()[0].provider_name, "mapB");
    assert_eq!(map_b.provider_name(), "mapB");
}

#[test]
fn teardown_removes_graphics_and_records() {
    let pool = MeasurementPool::shared();
    let config = Config::default();
    let mut google =
        ProviderSession::for_provider(ProviderKind::Google, pool.clone(), Scene::new(GoogleMaps), &config);
    let mut other =
        ProviderSession::named(ProviderKind::Google, "other", pool.clone(), Scene::new(GoogleMaps), &config);
    let event = NormalizedEvent::new(Coordinate::new(1.0, 1.0), ScreenPoint::default(), Instant::now());
    google.activate(MeasureKind::PointInfo);
    other.activate(MeasureKind::PointInfo);
    google.handle(Channel::LeftClick, &event);
    other.handle(Channel::LeftClick, &event);

    assert_eq!(google.teardown(), 1);
    assert!(google.drawer().is_empty());
    assert_eq!(google.active_kind(), None);
    assert_eq!(pool.borrow().len(), 1);
    assert!(!other.drawer().is_empty());
}

#[test]
fn delete_removes_graphics_and_record() {
    let mut h = completed_distance();
    let id = h.only_record().id;

    let removed = h.session.delete(id).unwrap();
    assert_eq!(removed.id, id);
    assert!(h.pool.borrow().is_empty());
    assert!(h.session.drawer().is_empty());
    assert!(h.session.mode(MeasureKind::Distance).graphics(id).is_none());

    assert!(matches!(
        h.session.delete(id),
        Err(MeasureError::RecordNotFound(_))
    ));
}

#[test]
fn rename_label_updates_record_and_graphic() {
    let mut h = completed_distance();
    let id = h.only_record().id;

    let renamed = block_on(h.session.rename_label(id, &FixedLabel(Some(" Fence ".into()))));
    assert_eq!(renamed, Ok(true));
    assert_eq!(h.only_record().label.as_deref(), Some("Fence"));

    let label_id = h
        .session
        .mode(MeasureKind::Distance)
        .graphics(id)
        .and_then(|g| g.label.as_ref())
        .map(|l| l.id)
        .unwrap();
    let text = |h: &Harness<Scene<GoogleMaps>>| h.session.drawer().graphic(label_id).unwrap().text.clone();
    assert_eq!(text(&h).as_deref(), Some("Fence"));

    let reset = block_on(h.session.rename_label(id, &FixedLabel(Some(String::new()))));
    assert_eq!(reset, Ok(true));
    assert_eq!(h.only_record().label, None);
    assert!(text(&h).unwrap().ends_with(" km"));
}

#[test]
fn rename_during_drag_survives_release() {
    let mut h = completed_distance();
    let id = h.only_record().id;
    let (x, y) = screen_of(10.0, 20.0);
    h.send(Channel::DragStart, 10.0, 20.0, (x, y), 1000);
    h.send(Channel::MouseMove, 10.2, 20.0, (x + 8.0, y), 1010);

    let renamed = block_on(h.session.rename_label(id, &FixedLabel(Some("Fence".into()))));
    assert_eq!(renamed, Ok(true));
    h.send(Channel::MouseMove, 10.5, 20.0, (x + 10.0, y), 1020);
    h.send(Channel::MouseUp, 10.5, 20.0, (x + 10.0, y), 1030);

    let record = h.only_record();
    assert_eq!(record.label.as_deref(), Some("Fence"));
    assert_eq!(record.coordinates[0], Coordinate::new(10.5, 20.0));
    assert_eq!(record.status, RecordStatus::Completed);

    let label = h
        .session
        .mode(MeasureKind::Distance)
        .graphics(id)
        .and_then(|g| g.label.as_ref())
        .map(|l| l.id)
        .unwrap();
    let text = h.session.drawer().graphic(label).unwrap().text.clone();
    assert_eq!(text.as_deref(), Some("Fence"));
}

#[test]
fn rolled_back_drag_keeps_a_new_label() {
    let mut h = completed_distance();
    let id = h.only_record().id;
    let (x, y) = screen_of(10.0, 20.0);
    h.send(Channel::DragStart, 10.0, 20.0, (x, y), 1000);
    h.send(Channel::MouseMove, 11.0, 20.0, (x + 30.0, y), 1010);
    let renamed = block_on(h.session.rename_label(id, &FixedLabel(Some("Fence".into()))));
    assert_eq!(renamed, Ok(true));
    h.session.deactivate();

    let record = h.only_record();
    assert_eq!(record.coordinates[0], Coordinate::new(10.0, 20.0));
    assert_eq!(record.label.as_deref(), Some("Fence"));
    assert_eq!(record.status, RecordStatus::Completed);
}

#[test]
fn cancelled_rename_changes_nothing() {
    let mut h = completed_distance();
    let before = h.only_record();

    let result = block_on(h.session.rename_label(before.id, &FixedLabel(None)));
    assert_eq!(result, Ok(false));
    assert_eq!(h.only_record(), before);
}

#[test]
fn rename_of_unknown_id_fails() {
    let mut h = completed_distance();
    let result = block_on(h.session.rename_label(42, &FixedLabel(Some("x".into()))));
    assert!(matches!(result, Err(MeasureError::RecordNotFound(_))));
}

/// Collaborator whose renderer is gone: every primitive fails.
#[derive(Debug, Default)]
struct FailingDrawer {
    panning: Option<bool>,
}

fn offline<T>() -> Result<T, MeasureError> {
    Err(MeasureError::CollaboratorFailure("renderer offline".into()))
}

impl DrawingCollaborator for FailingDrawer {
    fn add_point(&mut self, _: &Coordinate, _: &GraphicStyle) -> Result<GraphicHandle, MeasureError> {
        offline()
    }

    fn add_line(
        &mut self,
        _: [Coordinate; 2],
        _: &GraphicStyle,
    ) -> Result<GraphicHandle, MeasureError> {
        offline()
    }

    fn add_polygon(
        &mut self,
        _: &[Coordinate],
        _: &GraphicStyle,
    ) -> Result<GraphicHandle, MeasureError> {
        offline()
    }

    fn add_label(
        &mut self,
        _: &[Coordinate],
        _: &LabelContent,
        _: &GraphicStyle,
    ) -> Result<GraphicHandle, MeasureError> {
        offline()
    }

    fn update_position(&mut self, _: &mut GraphicHandle, _: &[Coordinate]) -> Result<(), MeasureError> {
        offline()
    }

    fn update_style(
        &mut self,
        _: &mut GraphicHandle,
        _: &GraphicStyle,
        _: RecordStatus,
    ) -> Result<(), MeasureError> {
        offline()
    }

    fn update_label(&mut self, _: &mut GraphicHandle, _: &LabelContent) -> Result<(), MeasureError> {
        offline()
    }

    fn remove(&mut self, _: &GraphicHandle) -> Result<(), MeasureError> {
        offline()
    }

    fn set_panning_enabled(&mut self, enabled: bool) {
        self.panning = Some(enabled);
    }
}

#[test]
fn collaborator_failures_do_not_block_data_changes() {
    let mut h = Harness::with_drawer(FailingDrawer::default(), MeasureKind::Distance);
    h.click(10.0, 20.0, 0);
    h.send(Channel::MouseMove, 10.0, 20.05, screen_of(10.0, 20.05), 10);
    h.click(10.0, 20.1, 20);

    let record = h.only_record();
    assert_eq!(record.status, RecordStatus::Completed);
    assert!(record.measurements[0] > 0.0);

    let (x, y) = screen_of(10.0, 20.0);
    h.send(Channel::DragStart, 10.0, 20.0, (x, y), 1000);
    h.send(Channel::MouseMove, 10.5, 20.0, (x + 10.0, y), 1010);
    h.send(Channel::MouseUp, 10.5, 20.0, (x + 10.0, y), 1020);
    assert_eq!(h.only_record().coordinates[0], Coordinate::new(10.5, 20.0));
    assert_eq!(h.session.drawer().panning, Some(true));

    assert!(h.session.delete(record.id).is_ok());
    assert!(h.pool.borrow().is_empty());
}
