// Host-side tests for the hover/click state machine, both on the bare
// controller and through the full per-frame tick.

use glam::{Vec2, Vec3};
use portal_core::constants::PORTAL_LINK_URL;
use portal_core::interaction::Interaction;
use portal_core::raycast::Ray;
use portal_core::scene::{MeshData, SceneNode};
use portal_core::uniforms::GlowPreset;
use portal_core::{
    AppEvent, ClickAction, CursorStyle, FrameData, FrameHost, HoverController, HoverState,
    InteractionRegistry, PortalApp, SceneConfig, SceneGraph, Viewport,
};

const CENTER: (f32, f32) = (400.0, 300.0);
const FAR: (f32, f32) = (0.0, 0.0);

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Cursor(CursorStyle),
    Dispatch(ClickAction),
    Render,
}

#[derive(Default)]
struct RecordingHost {
    calls: Vec<Call>,
}

impl RecordingHost {
    fn cursor_calls(&self) -> Vec<CursorStyle> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Cursor(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    fn dispatches(&self) -> Vec<ClickAction> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Dispatch(a) => Some(a.clone()),
                _ => None,
            })
            .collect()
    }
}

impl FrameHost for RecordingHost {
    fn set_cursor(&mut self, cursor: CursorStyle) {
        self.calls.push(Call::Cursor(cursor));
    }
    fn dispatch(&mut self, action: &ClickAction) {
        self.calls.push(Call::Dispatch(action.clone()));
    }
    fn resize_surface(&mut self, _viewport: &Viewport) {}
    fn render(&mut self, _frame: &FrameData<'_>) {
        self.calls.push(Call::Render);
    }
}

/// Unit quad facing +z. Test rays avoid its diagonal seam.
fn quad(center: Vec3) -> MeshData {
    let (cx, cy, cz) = (center.x, center.y, center.z);
    MeshData::new(
        vec![
            Vec3::new(cx - 0.5, cy - 0.5, cz),
            Vec3::new(cx + 0.5, cy - 0.5, cz),
            Vec3::new(cx + 0.5, cy + 0.5, cz),
            Vec3::new(cx - 0.5, cy + 0.5, cz),
        ],
        Vec::new(),
        Some(vec![0, 1, 2, 0, 2, 3]),
    )
}

fn portal_scene() -> SceneGraph {
    let mut g = SceneGraph::new();
    let root = g.add(SceneNode::new("Scene"));
    g.add_child(
        root,
        SceneNode::new("portalLight").with_mesh(quad(Vec3::new(0.2, 0.6, 0.0))),
    );
    g.add_child(
        root,
        SceneNode::new("baked").with_mesh(quad(Vec3::new(0.0, 0.0, -3.0))),
    );
    g
}

fn scene_without_portal() -> SceneGraph {
    let mut g = SceneGraph::new();
    g.add(SceneNode::new("baked").with_mesh(quad(Vec3::new(0.0, 0.75, 0.0))));
    g
}

fn make_app() -> PortalApp {
    let config = SceneConfig {
        firefly_seed: Some(7),
        ..Default::default()
    };
    PortalApp::new(config, Viewport::new(800.0, 600.0, 1.0))
}

fn pointer((x, y): (f32, f32)) -> AppEvent {
    AppEvent::PointerMove {
        client_x: x,
        client_y: y,
    }
}

fn loaded_app(host: &mut RecordingHost) -> PortalApp {
    let mut app = make_app();
    app.tick(0.0, [AppEvent::SceneLoaded(Box::new(portal_scene()))], host);
    app
}

#[test]
fn starts_unloaded_and_stays_there_without_a_scene() {
    let mut app = make_app();
    let mut host = RecordingHost::default();
    for i in 0..10 {
        let t = app.tick(i as f32 * 0.016, [pointer(CENTER)], &mut host);
        assert!(t.is_empty());
    }
    assert_eq!(app.hover.state(), HoverState::Unloaded);
    assert!(host.cursor_calls().is_empty());
}

#[test]
fn first_frame_after_load_moves_to_idle() {
    let mut host = RecordingHost::default();
    let mut app = make_app();
    let t = app.tick(
        0.0,
        [pointer(FAR), AppEvent::SceneLoaded(Box::new(portal_scene()))],
        &mut host,
    );
    assert_eq!(t.len(), 1);
    assert_eq!(t[0].from, HoverState::Unloaded);
    assert_eq!(t[0].to, HoverState::Idle);
    assert_eq!(app.hover.state(), HoverState::Idle);
    assert_eq!(app.portal.glow, GlowPreset::BASELINE);
}

#[test]
fn full_crossing_sequence_applies_and_reverts_presets_twice() {
    let mut host = RecordingHost::default();
    let mut app = make_app();
    let mut seen = vec![app.hover.state()];
    let mut step = |app: &mut PortalApp, events: Vec<AppEvent>, host: &mut RecordingHost| {
        for t in app.tick(0.0, events, host) {
            seen.push(t.to);
        }
    };

    step(
        &mut app,
        vec![pointer(CENTER), AppEvent::SceneLoaded(Box::new(portal_scene()))],
        &mut host,
    );
    step(&mut app, vec![pointer(FAR)], &mut host);
    step(&mut app, vec![pointer(CENTER)], &mut host);

    let kinds: Vec<&str> = seen
        .iter()
        .map(|s| match s {
            HoverState::Unloaded => "unloaded",
            HoverState::Idle => "idle",
            HoverState::Hovered { .. } => "hovered",
        })
        .collect();
    assert_eq!(kinds, ["unloaded", "idle", "hovered", "idle", "hovered"]);

    let stats = app.hover_stats();
    assert_eq!(stats.applied, 2);
    assert_eq!(stats.reverted, 1);

    // One more exit to balance the count.
    app.tick(0.0, [pointer(FAR)], &mut host);
    assert_eq!(app.hover_stats().reverted, 2);
    assert_eq!(
        host.cursor_calls(),
        [
            CursorStyle::Pointer,
            CursorStyle::Default,
            CursorStyle::Pointer,
            CursorStyle::Default
        ]
    );
}

#[test]
fn steady_hover_fires_preset_once() {
    let mut host = RecordingHost::default();
    let mut app = loaded_app(&mut host);
    for i in 0..50 {
        app.tick(i as f32, [pointer(CENTER)], &mut host);
    }
    assert!(app.hover.state().is_hovered());
    assert_eq!(app.hover_stats().applied, 1);
    assert_eq!(app.hover_stats().reverted, 0);
    assert_eq!(host.cursor_calls(), [CursorStyle::Pointer]);
    assert_eq!(app.portal.glow, GlowPreset::HOVERED);
}

#[test]
fn revert_restores_exact_baseline_after_long_hover() {
    let mut host = RecordingHost::default();
    let mut app = loaded_app(&mut host);
    app.tick(0.0, [pointer(CENTER)], &mut host);
    for i in 0..500 {
        app.tick(i as f32 * 0.016, None, &mut host);
    }
    app.tick(9.0, [pointer(FAR)], &mut host);
    assert_eq!(app.hover.state(), HoverState::Idle);
    assert_eq!(app.portal.glow.outer_glow, 5.0);
    assert_eq!(app.portal.glow.sharpness, 0.7);
    assert_eq!(app.portal.glow.speed_factor, 1.0);
}

#[test]
fn hovered_run_across_a_scanline_is_contiguous() {
    let mut host = RecordingHost::default();
    let mut app = loaded_app(&mut host);
    let mut hovered = Vec::new();
    for x in (0..800).step_by(10) {
        app.tick(0.0, [pointer((x as f32, CENTER.1))], &mut host);
        hovered.push(app.hover.state().is_hovered());
    }
    assert!(hovered[40], "screen center must hover");
    assert!(!hovered[0] && !hovered[hovered.len() - 1]);
    let rising = hovered.windows(2).filter(|w| !w[0] && w[1]).count();
    let falling = hovered.windows(2).filter(|w| w[0] && !w[1]).count();
    assert_eq!((rising, falling), (1, 1));
}

#[test]
fn click_while_hovered_dispatches_exactly_one_link() {
    let mut host = RecordingHost::default();
    let mut app = loaded_app(&mut host);
    app.tick(0.0, [pointer(CENTER)], &mut host);
    app.tick(0.1, [AppEvent::PointerDown], &mut host);
    assert_eq!(
        host.dispatches(),
        [ClickAction::OpenUrl(PORTAL_LINK_URL.to_string())]
    );
}

#[test]
fn click_while_idle_or_unloaded_does_nothing() {
    let mut host = RecordingHost::default();
    let mut app = make_app();
    app.tick(0.0, [pointer(CENTER), AppEvent::PointerDown], &mut host);
    assert!(host.dispatches().is_empty());

    app.tick(0.1, [AppEvent::SceneLoaded(Box::new(portal_scene()))], &mut host);
    app.tick(0.2, [pointer(FAR)], &mut host);
    app.tick(0.3, [AppEvent::PointerDown, AppEvent::PointerDown], &mut host);
    assert!(host.dispatches().is_empty());
}

#[test]
fn missing_target_never_leaves_unloaded_over_a_thousand_frames() {
    let mut host = RecordingHost::default();
    let mut app = make_app();
    app.tick(
        0.0,
        [AppEvent::SceneLoaded(Box::new(scene_without_portal()))],
        &mut host,
    );
    let mut transitions = 0;
    for i in 0..1000u32 {
        let x = (i * 37 % 800) as f32;
        let y = (i * 53 % 600) as f32;
        transitions += app
            .tick(i as f32 / 60.0, [pointer((x, y)), AppEvent::PointerDown], &mut host)
            .len();
    }
    assert_eq!(transitions, 0);
    assert_eq!(app.hover.state(), HoverState::Unloaded);
    assert!(host.dispatches().is_empty());
    assert_eq!(app.frames(), 1001);
}

#[test]
fn failed_name_resolution_is_not_retried() {
    let empty = scene_without_portal();
    let scene = portal_scene();
    let mut hover = HoverController::new(InteractionRegistry::with_defaults());
    let hit = Ray::new(Vec3::new(0.0, 0.75, 5.0), Vec3::new(0.0, 0.0, -1.0));

    assert!(hover.evaluate(Some(&empty), &hit).is_empty());
    // a scene is installed once, so the first lookup decides
    assert!(hover.evaluate(Some(&scene), &hit).is_empty());
    assert_eq!(hover.state(), HoverState::Unloaded);
}

#[test]
fn load_failure_is_a_thousand_quiet_frames() {
    let mut host = RecordingHost::default();
    let mut app = make_app();
    for i in 0..1000u32 {
        let p = if i % 2 == 0 { CENTER } else { FAR };
        assert!(app.tick(i as f32, [pointer(p)], &mut host).is_empty());
    }
    assert_eq!(app.hover.state(), HoverState::Unloaded);
    let renders = host.calls.iter().filter(|c| **c == Call::Render).count();
    assert_eq!(renders, 1000);
}

#[test]
fn controller_emits_no_transition_when_state_is_unchanged() {
    let scene = portal_scene();
    let mut hover = HoverController::new(InteractionRegistry::with_defaults());
    let miss = Ray::new(Vec3::new(0.0, 10.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
    assert_eq!(hover.evaluate(Some(&scene), &miss).len(), 1);
    for _ in 0..5 {
        assert!(hover.evaluate(Some(&scene), &miss).is_empty());
    }
}

#[test]
fn transition_reports_left_and_entered_targets() {
    let scene = portal_scene();
    let portal = scene.find_by_name("portalLight", true).unwrap();
    let mut hover = HoverController::new(InteractionRegistry::with_defaults());
    let hit = Ray::new(Vec3::new(0.0, 0.75, 5.0), Vec3::new(0.0, 0.0, -1.0));
    let miss = Ray::new(Vec3::new(0.0, 10.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

    let entered = hover.evaluate(Some(&scene), &hit);
    assert_eq!(entered.len(), 2);
    assert_eq!(entered[1].entered(), Some(portal));
    assert_eq!(entered[1].left(), None);

    let left = hover.evaluate(Some(&scene), &miss);
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].left(), Some(portal));
    assert_eq!(left[0].entered(), None);
}

#[test]
fn registry_drives_click_action_per_target() {
    let mut registry = InteractionRegistry::new();
    registry.register("baked", Interaction::log("floor clicked"));
    assert_eq!(registry.len(), 1);
    registry.register("baked", Interaction::log("replaced"));
    assert_eq!(registry.len(), 1);

    let scene = portal_scene();
    let mut hover = HoverController::new(registry);
    assert_eq!(hover.registry().len(), 1);
    let at_floor = Ray::new(Vec3::new(0.1, -0.2, 5.0), Vec3::new(0.0, 0.0, -1.0));
    hover.evaluate(Some(&scene), &at_floor);
    assert!(hover.state().is_hovered());
    assert_eq!(hover.click(), Some(&ClickAction::Log("replaced".into())));
}

#[test]
fn nearest_registered_target_wins() {
    let mut registry = InteractionRegistry::with_defaults();
    registry.register("baked", Interaction::log("floor"));
    let scene = portal_scene();
    let portal = scene.find_by_name("portalLight", true).unwrap();
    let mut hover = HoverController::new(registry);
    // Passes through the portal quad first, then the floor quad behind it.
    let ray = Ray::new(Vec3::new(0.1, 0.3, 5.0), Vec3::new(0.0, 0.0, -1.0));
    hover.evaluate(Some(&scene), &ray);
    assert_eq!(hover.state(), HoverState::Hovered { target: portal });
}

#[test]
fn pointer_normalization_matches_viewport_corners() {
    let vp = Viewport::new(800.0, 600.0, 1.0);
    assert_eq!(vp.normalize_pointer(0.0, 0.0), Vec2::new(-1.0, 1.0));
    assert_eq!(vp.normalize_pointer(800.0, 600.0), Vec2::new(1.0, -1.0));
    assert_eq!(vp.normalize_pointer(400.0, 300.0), Vec2::ZERO);
}
