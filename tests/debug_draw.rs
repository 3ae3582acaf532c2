use ballast::assets::{Mesh, Vertex3D};
use ballast::core::{GameObject, Scene};
use ballast::nalgebra::{Matrix4, Point3, Vector3};
use ballast::physics::{
    BodyType, BoundsType, Camera, DebugDrawAdapter, DebugRenderMode, LineRenderer, PhysicsConfig,
    PhysicsWorld, build_body,
};
use more_asserts::assert_gt;

#[derive(Default)]
struct RecordingRenderer {
    begun: u32,
    ended: u32,
    in_pass: bool,
    lines: Vec<(Point3<f32>, Point3<f32>, [f32; 4])>,
}

impl LineRenderer for RecordingRenderer {
    fn begin(&mut self, _view_projection: &Matrix4<f32>) {
        self.begun += 1;
        self.in_pass = true;
    }

    fn line(&mut self, from: &Point3<f32>, to: &Point3<f32>, color: [f32; 4]) {
        assert!(self.in_pass, "line submitted outside a begin/end bracket");
        self.lines.push((*from, *to, color));
    }

    fn end(&mut self) {
        self.ended += 1;
        self.in_pass = false;
    }
}

fn world_with_one_body() -> (Scene, PhysicsWorld) {
    let mut scene = Scene::new();
    let mut physics = PhysicsWorld::new();

    let mut vertices = Vec::with_capacity(8);
    for i in 0..8u16 {
        let x = if i & 1 == 0 { -1.0 } else { 1.0 };
        let y = if i & 2 == 0 { -1.0 } else { 1.0 };
        let z = if i & 4 == 0 { -1.0 } else { 1.0 };
        vertices.push(Vertex3D::position_only(Vector3::new(x, y, z)));
    }
    let indices: Vec<u16> = vec![
        0, 1, 2, 2, 1, 3, 4, 6, 5, 5, 6, 7, 0, 4, 1, 1, 4, 5, 2, 3, 6, 6, 3, 7, 0, 2, 4, 4, 2, 6,
        1, 5, 3, 3, 5, 7,
    ];
    let mesh = Mesh::from_vertices(vertices, indices);

    let id = scene.spawn(GameObject::new("debug subject"));
    let built = build_body(
        &mesh,
        BodyType::Static,
        BoundsType::Box,
        &PhysicsConfig::default(),
    )
    .unwrap();
    scene.attach_body(&mut physics, id, built);

    (scene, physics)
}

fn camera() -> Camera {
    Camera {
        view_projection: Matrix4::identity(),
    }
}

#[test]
fn lines_outside_a_pass_are_dropped() {
    let mut adapter = DebugDrawAdapter::new(RecordingRenderer::default());

    adapter.draw_line(Point3::origin(), Point3::new(1.0, 0.0, 0.0), [1.0; 4]);

    assert!(adapter.renderer().lines.is_empty());
    assert_eq!(adapter.renderer().begun, 0);
}

#[test]
fn draw_world_brackets_the_pass_and_emits_segments() {
    let (_scene, physics) = world_with_one_body();
    let mut adapter = DebugDrawAdapter::new(RecordingRenderer::default());

    adapter.draw_world(&physics, &camera());

    let recorder = adapter.renderer();
    assert_eq!(recorder.begun, 1);
    assert_eq!(recorder.ended, 1);
    assert_gt!(recorder.lines.len(), 0);
}

#[test]
fn disabled_adapter_requests_no_primitives() {
    let (_scene, physics) = world_with_one_body();
    let mut adapter = DebugDrawAdapter::new(RecordingRenderer::default());
    adapter.set_enabled(false);

    assert_eq!(adapter.debug_mode(), DebugRenderMode::empty());

    adapter.draw_world(&physics, &camera());
    assert!(adapter.renderer().lines.is_empty());
}

#[test]
fn debug_mode_requests_aabbs_and_wireframes() {
    let adapter = DebugDrawAdapter::new(RecordingRenderer::default());
    assert_eq!(
        adapter.debug_mode(),
        DebugRenderMode::COLLIDER_AABBS | DebugRenderMode::COLLIDER_SHAPES
    );
}

#[test]
fn the_gate_closes_again_after_a_pass() {
    let (_scene, physics) = world_with_one_body();
    let mut adapter = DebugDrawAdapter::new(RecordingRenderer::default());

    adapter.draw_world(&physics, &camera());
    let after_pass = adapter.renderer().lines.len();

    adapter.draw_line(Point3::origin(), Point3::new(0.0, 0.0, 1.0), [1.0; 4]);
    assert_eq!(adapter.renderer().lines.len(), after_pass);
}
