//! PNG and animated GIF output of rendered [`Frame`]s.
//!
//! Feature-gated behind `png` (default on) so library users that only need
//! pixel buffers do not pull in the `image` crate.

use crate::pixel::Frame;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, RgbaImage};
use particle_systems_core::error::EngineError;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Default delay between GIF frames.
pub const DEFAULT_FRAME_DELAY_MS: u32 = 100;

fn to_image(frame: &Frame) -> Result<RgbaImage, EngineError> {
    let w = u32::try_from(frame.width()).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(frame.height()).map_err(|_| EngineError::InvalidDimensions)?;
    RgbaImage::from_raw(w, h, frame.rgba().to_vec())
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))
}

/// Writes a frame as a PNG image.
pub fn write_png(frame: &Frame, path: &Path) -> Result<(), EngineError> {
    let img = to_image(frame)?;
    img.save(path)
        .map_err(|e| EngineError::Io(format!("{}: {e}", path.display())))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

/// Writes `frames` as a looping animated GIF, `delay_ms` per frame.
///
/// An empty `frames` slice is rejected before `path` is created.
pub fn write_gif(frames: &[Frame], path: &Path, delay_ms: u32) -> Result<(), EngineError> {
    if frames.is_empty() {
        return Err(EngineError::EmptyAnimation);
    }
    let io_err = |e: &dyn std::fmt::Display| EngineError::Io(format!("{}: {e}", path.display()));

    let file = File::create(path).map_err(|e| io_err(&e))?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder.set_repeat(Repeat::Infinite).map_err(|e| io_err(&e))?;
    for frame in frames {
        let delay = Delay::from_numer_denom_ms(delay_ms, 1);
        encoder
            .encode_frame(image::Frame::from_parts(to_image(frame)?, 0, 0, delay))
            .map_err(|e| io_err(&e))?;
    }
    log::debug!("wrote {} ({} frames)", path.display(), frames.len());
    Ok(())
}
