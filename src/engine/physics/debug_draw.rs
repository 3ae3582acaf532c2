use crate::physics::PhysicsWorld;
use nalgebra::{Matrix4, Point3};
use rapier3d::pipeline::{
    DebugRenderBackend, DebugRenderObject, DebugRenderPipeline, DebugRenderStyle,
};
use rapier3d::prelude::*;

pub use rapier3d::pipeline::DebugRenderMode;

/// Immediate-mode line renderer seam.
///
/// The renderer demands one `begin`/`end` bracket per draw pass; line
/// submission is only valid inside the bracket.
pub trait LineRenderer {
    fn begin(&mut self, view_projection: &Matrix4<f32>);
    fn line(&mut self, from: &Point3<f32>, to: &Point3<f32>, color: [f32; 4]);
    fn end(&mut self);
}

/// The slice of a camera the debug pass needs.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub view_projection: Matrix4<f32>,
}

/// Bridges the simulator's per-line debug callback to a bracketed
/// [`LineRenderer`].
///
/// The simulator may emit lines from contexts outside an active pass; those
/// are dropped rather than buffered. Single-threaded and non-reentrant:
/// calling [`DebugDrawAdapter::draw_world`] from within a pass is undefined.
pub struct DebugDrawAdapter<R: LineRenderer> {
    pipeline: DebugRenderPipeline,
    backend: LineBackend<R>,
    enabled: bool,
}

struct LineBackend<R> {
    renderer: R,
    can_draw: bool,
    // Scratch endpoints, reused across calls within a pass.
    from: Point3<f32>,
    to: Point3<f32>,
}

impl<R: LineRenderer> LineBackend<R> {
    fn submit(&mut self, a: Point3<f32>, b: Point3<f32>, color: [f32; 4]) {
        if !self.can_draw {
            return;
        }
        self.from = a;
        self.to = b;
        self.renderer.line(&self.from, &self.to, color);
    }
}

impl<R: LineRenderer> DebugRenderBackend for LineBackend<R> {
    fn draw_line(
        &mut self,
        _object: DebugRenderObject,
        a: Point<Real>,
        b: Point<Real>,
        color: [f32; 4],
    ) {
        self.submit(a, b, color);
    }
}

impl<R: LineRenderer> DebugDrawAdapter<R> {
    pub fn new(renderer: R) -> Self {
        DebugDrawAdapter {
            pipeline: DebugRenderPipeline::new(
                DebugRenderStyle::default(),
                DebugRenderMode::empty(),
            ),
            backend: LineBackend {
                renderer,
                can_draw: false,
                from: Point3::origin(),
                to: Point3::origin(),
            },
            enabled: true,
        }
    }

    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// The primitives requested from the simulator's traversal: AABBs and
    /// shape wireframes while enabled, nothing otherwise.
    pub fn debug_mode(&self) -> DebugRenderMode {
        if self.enabled {
            DebugRenderMode::COLLIDER_AABBS | DebugRenderMode::COLLIDER_SHAPES
        } else {
            DebugRenderMode::empty()
        }
    }

    /// Runs one bracketed debug pass over the whole simulation world.
    pub fn draw_world(&mut self, physics: &PhysicsWorld, camera: &Camera) {
        self.pipeline.mode = self.debug_mode();

        self.backend.renderer.begin(&camera.view_projection);
        self.backend.can_draw = true;

        self.pipeline.render(
            &mut self.backend,
            &physics.rigid_body_set,
            &physics.collider_set,
            &physics.impulse_joint_set,
            &physics.multibody_joint_set,
            &physics.narrow_phase,
        );

        self.backend.renderer.end();
        self.backend.can_draw = false;
    }

    /// Direct line submission with the same gating as the simulator's
    /// callbacks: outside a [`DebugDrawAdapter::draw_world`] pass this is a
    /// no-op.
    pub fn draw_line(&mut self, from: Point3<f32>, to: Point3<f32>, color: [f32; 4]) {
        self.backend.submit(from, to, color);
    }

    #[inline]
    pub fn renderer(&self) -> &R {
        &self.backend.renderer
    }

    #[inline]
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.backend.renderer
    }

    pub fn into_renderer(self) -> R {
        self.backend.renderer
    }
}
