use foundation::math::Mat4;
use scene::components::{Material, Shape3D};
use scene::lights::Light;
use scene::{PinId, PinScene};

/// Camera for one frame. The host's projection matrix is adopted verbatim.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub projection: Mat4,
}

impl Camera {
    pub fn from_host_matrix(projection: Mat4) -> Self {
        Self { projection }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub pin_id: PinId,
    pub model: Mat4,
    pub shape: Shape3D,
    pub material: Material,
    pub render_order: i32,
    pub frustum_culled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub camera: Camera,
    pub lights: Vec<Light>,
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    /// Snapshot of the scene in draw order (ascending `render_order`, stable).
    pub fn collect(scene: &PinScene, camera: Camera) -> Self {
        let mut commands: Vec<DrawCommand> = scene
            .objects()
            .map(|object| DrawCommand {
                pin_id: object.pin_id.clone(),
                model: object.transform.matrix(),
                shape: object.drawable.shape.clone(),
                material: object.drawable.material,
                render_order: object.drawable.render_order,
                frustum_culled: object.drawable.frustum_culled,
            })
            .collect();
        commands.sort_by_key(|c| c.render_order);

        Self {
            camera,
            lights: scene.lights().to_vec(),
            commands,
        }
    }
}

/// Renderer bound to the host's draw surface and graphics context.
///
/// The context is shared with the host, so implementations must never clear
/// color: the basemap drawn beneath has to survive.
pub trait RenderBackend {
    /// Forgets any cached GL state; the host may have changed it since the last frame.
    fn reset_state(&mut self);
    fn clear_depth(&mut self);
    fn draw(&mut self, frame: &RenderFrame);
    /// Releases GPU resources. Called once, when the owning layer is removed.
    fn dispose(&mut self);
}
