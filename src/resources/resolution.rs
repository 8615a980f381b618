//! Resolution-independent rendering resource.
//!
//! [`ResolutionRenderer`] maps a fixed virtual resolution onto the actual
//! backbuffer. It computes a centered viewport that preserves the virtual
//! aspect ratio (letterbox when the window is taller, pillarbox when it is
//! wider) and a uniform scale matrix from virtual to viewport pixels.
//!
//! All game-side coordinates live in virtual space. Only rendering and
//! pointer conversion need to know about the real window size.

use bevy_ecs::prelude::Resource;
use raylib::prelude::{Color, Vector2};
use thiserror::Error;

use crate::math::{Affine2, IPoint, IRect, add_v2, sub_v2, vec2};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("virtual resolution must be non-zero, got {width}x{height}")]
    ZeroVirtualSize { width: u32, height: u32 },
    #[error("{what} size {width}x{height} does not fit in i32")]
    SizeTooLarge {
        what: &'static str,
        width: u32,
        height: u32,
    },
}

fn to_i32_size(
    what: &'static str,
    width: u32,
    height: u32,
) -> Result<(i32, i32), ResolutionError> {
    let too_large = |_| ResolutionError::SizeTooLarge {
        what,
        width,
        height,
    };
    Ok((
        i32::try_from(width).map_err(too_large)?,
        i32::try_from(height).map_err(too_large)?,
    ))
}

/// Maps a virtual design resolution onto the real screen.
///
/// The scale matrix is rebuilt only when the screen size actually changes
/// through [`ResolutionRenderer::set_screen_size`].
#[derive(Resource, Debug, Clone)]
pub struct ResolutionRenderer {
    virtual_width: i32,
    virtual_height: i32,
    screen_width: i32,
    screen_height: i32,
    viewport: IRect,
    /// True when the viewport height is clamped to the screen (pillarbox).
    scale_from_height: bool,
    scale_matrix: Affine2,
    /// Clear color for the bars outside the viewport.
    pub background_color: Color,
}

impl ResolutionRenderer {
    pub fn new(
        virtual_width: u32,
        virtual_height: u32,
        screen_width: u32,
        screen_height: u32,
    ) -> Result<Self, ResolutionError> {
        if virtual_width == 0 || virtual_height == 0 {
            return Err(ResolutionError::ZeroVirtualSize {
                width: virtual_width,
                height: virtual_height,
            });
        }
        let (vw, vh) = to_i32_size("virtual", virtual_width, virtual_height)?;
        let (sw, sh) = to_i32_size("screen", screen_width, screen_height)?;
        let mut irr = Self {
            virtual_width: vw,
            virtual_height: vh,
            screen_width: sw.max(1),
            screen_height: sh.max(1),
            viewport: IRect::default(),
            scale_from_height: false,
            scale_matrix: Affine2::IDENTITY,
            background_color: Color::BLACK,
        };
        irr.setup_virtual_screen_viewport();
        Ok(irr)
    }

    /// Update the real screen size. Returns `true` if the viewport changed.
    ///
    /// Non-positive sizes (e.g. a minimized window) are ignored.
    pub fn set_screen_size(&mut self, width: i32, height: i32) -> bool {
        if width <= 0 || height <= 0 {
            log::warn!("Ignoring invalid screen size {}x{}", width, height);
            return false;
        }
        if width == self.screen_width && height == self.screen_height {
            return false;
        }
        self.screen_width = width;
        self.screen_height = height;
        self.setup_virtual_screen_viewport();
        log::info!(
            "Screen resized to {}x{}, virtual viewport {:?} (scale {:.3})",
            width,
            height,
            self.viewport,
            self.scale()
        );
        true
    }

    /// Fit the virtual aspect ratio into the screen, width first.
    fn setup_virtual_screen_viewport(&mut self) {
        let target_aspect = self.virtual_width as f32 / self.virtual_height as f32;
        let mut width = self.screen_width;
        let mut height = (width as f32 / target_aspect + 0.5) as i32;

        if height > self.screen_height {
            // Pillarbox
            self.scale_from_height = true;
            height = self.screen_height;
            width = (height as f32 * target_aspect + 0.5) as i32;
        } else {
            // Letterbox (or exact fit)
            self.scale_from_height = false;
        }

        self.viewport = IRect::new(
            self.screen_width / 2 - width / 2,
            self.screen_height / 2 - height / 2,
            width,
            height,
        );
        self.recreate_scale_matrix();
    }

    fn recreate_scale_matrix(&mut self) {
        self.scale_matrix = Affine2::uniform_scale(self.scale());
    }

    /// Uniform virtual-to-viewport scale factor.
    pub fn scale(&self) -> f32 {
        if self.scale_from_height {
            self.screen_height as f32 / self.virtual_height as f32
        } else {
            self.screen_width as f32 / self.virtual_width as f32
        }
    }

    /// Matrix for drawing virtual-space content into the viewport.
    ///
    /// Does not include the viewport offset; rendering applies it separately.
    pub fn transformation_matrix(&self) -> Affine2 {
        self.scale_matrix
    }

    /// The centered sub-rectangle of the screen holding the virtual area.
    pub fn viewport(&self) -> IRect {
        self.viewport
    }

    /// The whole backbuffer.
    pub fn full_viewport(&self) -> IRect {
        IRect::new(0, 0, self.screen_width, self.screen_height)
    }

    pub fn virtual_width(&self) -> i32 {
        self.virtual_width
    }

    pub fn virtual_height(&self) -> i32 {
        self.virtual_height
    }

    pub fn screen_width(&self) -> i32 {
        self.screen_width
    }

    pub fn screen_height(&self) -> i32 {
        self.screen_height
    }

    pub fn virtual_center(&self) -> Vector2 {
        vec2(
            self.virtual_width as f32 * 0.5,
            self.virtual_height as f32 * 0.5,
        )
    }

    pub fn virtual_size(&self) -> Vector2 {
        vec2(self.virtual_width as f32, self.virtual_height as f32)
    }

    fn viewport_origin(&self) -> Vector2 {
        vec2(self.viewport.x as f32, self.viewport.y as f32)
    }

    /// Convert screen coordinates to virtual coordinates.
    pub fn to_virtual(&self, screen: Vector2) -> Vector2 {
        let inv = self
            .scale_matrix
            .inverse()
            .unwrap_or(Affine2::IDENTITY);
        inv.transform_point(sub_v2(screen, self.viewport_origin()))
    }

    /// Integer variant of [`Self::to_virtual`], truncating toward zero.
    pub fn to_virtual_point(&self, screen: IPoint) -> IPoint {
        IPoint::from_vector(self.to_virtual(screen.to_vector()))
    }

    /// Convert virtual coordinates to screen coordinates.
    pub fn to_display(&self, virt: Vector2) -> Vector2 {
        add_v2(
            self.scale_matrix.transform_point(virt),
            self.viewport_origin(),
        )
    }

    /// Integer variant of [`Self::to_display`], truncating toward zero.
    pub fn to_display_point(&self, virt: IPoint) -> IPoint {
        IPoint::from_vector(self.to_display(virt.to_vector()))
    }
}
