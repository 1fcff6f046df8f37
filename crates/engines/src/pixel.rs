//! Pure-computation rasterization of particle snapshots into RGBA frames.
//!
//! Always available (no feature gate); the `png` snapshot writers only
//! encode what this module draws.
//!
//! The world square `[-extent, extent]^2` maps onto the whole frame with `y`
//! pointing up. Particles are drawn as disks of radius `size` world units,
//! never smaller than one pixel.

use glam::{DMat3, DVec2, DVec3};
use particle_systems_core::color::Srgb;
use particle_systems_core::error::EngineError;
use particle_systems_core::snapshot::ParticleSnapshot;

/// Default half-width of the visible world square.
pub const DEFAULT_EXTENT: f64 = 100.0;

/// Camera pitch of the 3D view, in radians.
const OBLIQUE_PITCH: f64 = -1.0;
/// Camera yaw of the 3D view, in radians.
const OBLIQUE_YAW: f64 = 0.6;
/// Brightness of a sphere's silhouette relative to its center.
const RIM_BRIGHTNESS: f64 = 0.45;

/// How particles are placed on the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Top-down view of the `x`/`y` plane with flat disks.
    Planar,
    /// Rotated orthographic view of 3D space with shaded spheres, drawn far
    /// to near.
    Oblique,
}

/// Output size and visible world extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSpec {
    width: usize,
    height: usize,
    extent: f64,
}

impl FrameSpec {
    /// Returns `EngineError::InvalidDimensions` for a zero side or a
    /// non-positive extent.
    pub fn new(width: usize, height: usize, extent: f64) -> Result<Self, EngineError> {
        if width == 0 || height == 0 || extent.is_nan() || extent <= 0.0 {
            return Err(EngineError::InvalidDimensions);
        }
        width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(EngineError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            extent,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn extent(&self) -> f64 {
        self.extent
    }

    /// World point to fractional pixel coordinates.
    fn to_pixel(self, p: DVec2) -> DVec2 {
        let span = 2.0 * self.extent;
        DVec2::new(
            (p.x + self.extent) / span * self.width as f64,
            (self.extent - p.y) / span * self.height as f64,
        )
    }

    /// World length to pixels (horizontal scale).
    fn to_pixels(self, len: f64) -> f64 {
        len / (2.0 * self.extent) * self.width as f64
    }
}

/// An RGBA8 image, row-major, four bytes per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl Frame {
    /// A frame filled with `background`.
    pub fn filled(spec: &FrameSpec, background: Srgb) -> Self {
        let [r, g, b] = background.to_rgb8();
        Self {
            width: spec.width,
            height: spec.height,
            rgba: [r, g, b, 255].repeat(spec.width * spec.height),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.rgba
    }

    /// Color at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ])
    }

    /// Fills a disk centered at fractional pixel `center`, clipped to the
    /// frame. With `shaded`, brightness falls off toward the rim like a lit
    /// sphere seen head-on.
    fn fill_disk(&mut self, center: DVec2, radius: f64, color: Srgb, shaded: bool) {
        let radius = radius.max(0.5);
        let x0 = (center.x - radius).floor().max(0.0);
        let y0 = (center.y - radius).floor().max(0.0);
        let x1 = (center.x + radius).ceil().min(self.width as f64);
        let y1 = (center.y + radius).ceil().min(self.height as f64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        for py in y0 as usize..y1 as usize {
            for px in x0 as usize..x1 as usize {
                let offset = DVec2::new(px as f64 + 0.5, py as f64 + 0.5) - center;
                let d2 = offset.length_squared() / (radius * radius);
                if d2 > 1.0 {
                    continue;
                }
                let c = if shaded {
                    let facing = (1.0 - d2).sqrt();
                    color.shade(RIM_BRIGHTNESS + (1.0 - RIM_BRIGHTNESS) * facing)
                } else {
                    color
                };
                let [r, g, b] = c.to_rgb8();
                let i = (py * self.width + px) * 4;
                self.rgba[i..i + 4].copy_from_slice(&[r, g, b, 255]);
            }
        }
    }
}

/// Rotation applied to world points in the [`Projection::Oblique`] view.
fn oblique_camera() -> DMat3 {
    DMat3::from_rotation_x(OBLIQUE_PITCH) * DMat3::from_rotation_z(OBLIQUE_YAW)
}

/// Draws one frame of `snapshots` on a white background.
pub fn render_frame(
    snapshots: &[ParticleSnapshot],
    spec: &FrameSpec,
    projection: Projection,
) -> Frame {
    let mut frame = Frame::filled(spec, Srgb::WHITE);
    match projection {
        Projection::Planar => {
            for s in snapshots {
                let center = spec.to_pixel(DVec2::new(s.x, s.y));
                frame.fill_disk(center, spec.to_pixels(s.size), s.color, false);
            }
        }
        Projection::Oblique => {
            let camera = oblique_camera();
            let mut placed: Vec<(DVec3, &ParticleSnapshot)> = snapshots
                .iter()
                .map(|s| (camera * DVec3::new(s.x, s.y, s.z), s))
                .collect();
            // Larger view-space z is closer to the viewer; draw it last.
            placed.sort_by(|a, b| a.0.z.total_cmp(&b.0.z));
            for (p, s) in placed {
                let center = spec.to_pixel(p.truncate());
                frame.fill_disk(center, spec.to_pixels(s.size), s.color, true);
            }
        }
    }
    frame
}
