//! Shared 2D camera resource.
//!
//! [`Camera2D`] composes pan, rotation and zoom on top of the
//! [`ResolutionRenderer`] scale so that all camera math happens in virtual
//! resolution space:
//!
//! ```text
//! translate(-position) * rotate_z(rotation) * scale(zoom)
//!     * translate(virtual_center) * resolution_scale
//! ```
//!
//! The camera's focal point lands in the middle of the virtual screen, and
//! the window size only enters through the last factor.
//!
//! The camera can also glide to a target position (see
//! [`Camera2D::start_transition`]); [`crate::systems::camera::camera_update_system`]
//! advances it each frame.

use bevy_ecs::prelude::Resource;
use raylib::prelude::Vector2;

use crate::math::{Affine2, IRect, add_v2, lerp_v2, sub_v2, vec2};
use crate::resources::resolution::ResolutionRenderer;

/// Hard floor for zoom, regardless of `min_zoom`.
pub const ZOOM_FLOOR: f32 = 0.1;
/// Default upper zoom bound.
pub const DEFAULT_MAX_ZOOM: f32 = 999.0;
/// Default transition duration in seconds.
pub const DEFAULT_TRANSITION_SECS: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Transition {
    target: Vector2,
    duration: f32,
    elapsed: f32,
}

#[derive(Debug, Clone, Copy)]
struct CachedView {
    view: Affine2,
    /// Resolution matrix the view was built against.
    resolution: Affine2,
    virtual_center: Vector2,
}

/// ECS resource holding the active 2D camera.
#[derive(Resource, Debug, Clone)]
pub struct Camera2D {
    position: Vector2,
    zoom: f32,
    rotation: f32,
    min_zoom: f32,
    max_zoom: f32,
    transition: Option<Transition>,
    cached: Option<CachedView>,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera2D {
    pub fn new() -> Self {
        Self {
            position: vec2(0.0, 0.0),
            zoom: 1.0,
            rotation: 0.0,
            min_zoom: ZOOM_FLOOR,
            max_zoom: DEFAULT_MAX_ZOOM,
            transition: None,
            cached: None,
        }
    }

    /// Builder: set zoom limits, then clamp the current zoom into them.
    pub fn with_zoom_limits(mut self, min_zoom: f32, max_zoom: f32) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.set_zoom(self.zoom);
        self
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.set_zoom(zoom);
        self
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vector2) {
        self.position = position;
        self.cached = None;
    }

    /// Pan the camera by `amount` world units.
    pub fn move_by(&mut self, amount: Vector2) {
        self.set_position(add_v2(self.position, amount));
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set zoom, clamped to `[max(ZOOM_FLOOR, min_zoom), max_zoom]`.
    pub fn set_zoom(&mut self, zoom: f32) {
        let mut z = zoom.max(ZOOM_FLOOR);
        if z < self.min_zoom {
            z = self.min_zoom;
        }
        if z > self.max_zoom {
            z = self.max_zoom;
        }
        self.zoom = z;
        self.cached = None;
    }

    pub fn zoom_by(&mut self, delta: f32) {
        self.set_zoom(self.zoom + delta);
    }

    pub fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    pub fn set_min_zoom(&mut self, min_zoom: f32) {
        self.min_zoom = min_zoom;
        self.set_zoom(self.zoom);
    }

    pub fn max_zoom(&self) -> f32 {
        self.max_zoom
    }

    pub fn set_max_zoom(&mut self, max_zoom: f32) {
        self.max_zoom = max_zoom;
        self.set_zoom(self.zoom);
    }

    /// Rotation in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, radians: f32) {
        self.rotation = radians;
        self.cached = None;
    }

    pub fn rotate_by(&mut self, radians: f32) {
        self.set_rotation(self.rotation + radians);
    }

    /// Center on `rect` and zoom so it fills the virtual screen.
    ///
    /// The rectangle's dominant axis (relative to the virtual aspect ratio)
    /// decides the zoom.
    pub fn center_on_target(&mut self, rect: IRect, irr: &ResolutionRenderer) {
        let center = rect.center();
        self.set_position(vec2(center.x as f32, center.y as f32));
        if rect.w <= 0 || rect.h <= 0 {
            return;
        }
        let screen_aspect = irr.virtual_width() as f32 / irr.virtual_height() as f32;
        let rect_aspect = rect.w as f32 / rect.h as f32;
        let ratio = if rect_aspect >= screen_aspect {
            irr.virtual_width() as f32 / rect.w as f32
        } else {
            irr.virtual_height() as f32 / rect.h as f32
        };
        self.set_zoom(ratio);
    }

    /// Force the view matrix to be rebuilt on next access.
    pub fn recalculate_transformation_matrices(&mut self) {
        self.cached = None;
    }

    fn build_view(&self, irr: &ResolutionRenderer) -> Affine2 {
        let center = irr.virtual_center();
        Affine2::translation(-self.position.x, -self.position.y)
            * Affine2::rotation_z(self.rotation)
            * Affine2::uniform_scale(self.zoom)
            * Affine2::translation(center.x, center.y)
            * irr.transformation_matrix()
    }

    /// World-to-viewport transform.
    ///
    /// Cached until position, zoom or rotation change, or until the
    /// resolution renderer's scale changes.
    pub fn view_transformation(&mut self, irr: &ResolutionRenderer) -> Affine2 {
        let resolution = irr.transformation_matrix();
        let virtual_center = irr.virtual_center();
        if let Some(cached) = self.cached {
            if cached.resolution == resolution && cached.virtual_center == virtual_center {
                return cached.view;
            }
        }
        let view = self.build_view(irr);
        self.cached = Some(CachedView {
            view,
            resolution,
            virtual_center,
        });
        view
    }

    /// Whether a cached view matrix is currently held.
    pub fn has_cached_view(&self) -> bool {
        self.cached.is_some()
    }

    /// Convert screen coordinates (e.g. mouse position) to world coordinates.
    pub fn to_virtual(&mut self, screen: Vector2, irr: &ResolutionRenderer) -> Vector2 {
        let vp = irr.viewport();
        let local = sub_v2(screen, vec2(vp.x as f32, vp.y as f32));
        self.view_transformation(irr)
            .inverse()
            .unwrap_or(Affine2::IDENTITY)
            .transform_point(local)
    }

    /// Convert world coordinates to screen coordinates.
    pub fn to_display(&mut self, world: Vector2, irr: &ResolutionRenderer) -> Vector2 {
        let vp = irr.viewport();
        add_v2(
            self.view_transformation(irr).transform_point(world),
            vec2(vp.x as f32, vp.y as f32),
        )
    }

    // ---------------- transitions ----------------

    /// Start gliding toward `target` over `duration` seconds.
    ///
    /// Restarts the clock if a transition is already running.
    pub fn start_transition(&mut self, target: Vector2, duration: f32) {
        log::debug!(
            "Camera transition to ({:.1}, {:.1}) over {:.2}s",
            target.x,
            target.y,
            duration
        );
        self.transition = Some(Transition {
            target,
            duration,
            elapsed: 0.0,
        });
    }

    /// Retarget a running transition without restarting its clock.
    pub fn update_transition_target(&mut self, target: Vector2) {
        if let Some(tr) = self.transition.as_mut() {
            tr.target = target;
        }
    }

    pub fn stop_transition(&mut self) {
        self.transition = None;
    }

    /// Restart the clock of the running transition.
    pub fn reset_transition(&mut self) {
        if let Some(tr) = self.transition.as_mut() {
            tr.elapsed = 0.0;
        }
    }

    pub fn is_transition_active(&self) -> bool {
        self.transition.is_some()
    }

    pub fn transition_target(&self) -> Option<Vector2> {
        self.transition.map(|tr| tr.target)
    }

    /// Advance the running transition by `dt` seconds.
    ///
    /// Each step lerps from the current position toward the target by
    /// `elapsed / duration`. Returns `true` on the frame the target is
    /// reached; the camera then sits exactly on the target.
    pub fn update(&mut self, dt: f32) -> bool {
        let Some(mut tr) = self.transition else {
            return false;
        };
        tr.elapsed += dt;
        let amount = if tr.duration <= 0.0 {
            1.0
        } else {
            (tr.elapsed / tr.duration).clamp(0.0, 1.0)
        };
        if amount >= 1.0 {
            self.set_position(tr.target);
            self.stop_transition();
            return true;
        }
        self.set_position(lerp_v2(self.position, tr.target, amount));
        self.transition = Some(tr);
        false
    }
}
