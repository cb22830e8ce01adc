use std::fmt;

use crate::config::ColorSpaceDef;
use crate::error::Error;
use crate::pipeline::{self, Op};

/// A compiled, directional transform pipeline between two resolved
/// color spaces.
///
/// Immutable and self-contained: it does not borrow the [`Config`] it
/// was built from, so the config may be dropped while processors built
/// from it stay usable. Call [`Processor::cpu`] to get the form
/// optimized for repeated per-pixel application.
///
/// [`Config`]: crate::Config
pub struct Processor {
    ops: Vec<Op>,
    src: String,
    dst: String,
}

impl Processor {
    pub(crate) fn build(src: &ColorSpaceDef, dst: &ColorSpaceDef) -> Result<Self, Error> {
        let ops = pipeline::compile(src, dst).map_err(Error::Build)?;
        Ok(Self {
            ops,
            src: src.name.clone(),
            dst: dst.name.clone(),
        })
    }

    /// Name of the resolved source color space.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Name of the resolved destination color space.
    pub fn dst(&self) -> &str {
        &self.dst
    }

    /// Finalize for CPU application: fuse adjacent matrices and drop
    /// identity stages. The result owns its ops outright.
    pub fn cpu(&self) -> CpuProcessor {
        CpuProcessor {
            ops: pipeline::optimize(&self.ops),
        }
    }
}

impl fmt::Debug for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Processor")
            .field("src", &self.src)
            .field("dst", &self.dst)
            .field("ops", &self.ops.len())
            .finish()
    }
}

/// The CPU-resident form of a [`Processor`], optimized for repeated
/// per-pixel application.
///
/// Holds no interior mutability: concurrent `apply_*` calls on the
/// same instance from multiple threads, on disjoint buffers, are safe.
pub struct CpuProcessor {
    ops: Vec<Op>,
}

impl CpuProcessor {
    /// True when the optimized pipeline has no stages left, e.g. a
    /// same-space processor.
    pub fn is_noop(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply the pipeline to one RGB triple, in place.
    ///
    /// Single precision throughout; output values are not clamped and
    /// may land outside `[0, 1]`.
    pub fn apply_pixel(&self, rgb: &mut [f32; 3]) {
        for op in &self.ops {
            op.apply(rgb);
        }
    }

    /// Apply the pipeline to an interleaved RGBA image, in place.
    /// Alpha is untouched.
    ///
    /// Does nothing when `pixels.len() != width * height`.
    pub fn apply_rgba(&self, pixels: &mut [[f32; 4]], width: u32, height: u32) {
        if pixels.len() != width as usize * height as usize {
            return;
        }

        for px in pixels.iter_mut() {
            let mut rgb = [px[0], px[1], px[2]];
            self.apply_pixel(&mut rgb);
            px[0] = rgb[0];
            px[1] = rgb[1];
            px[2] = rgb[2];
        }
    }

    /// Sample the pipeline on a `size`³ grid, red fastest.
    pub fn bake_3d_lut(&self, size: u32) -> Vec<[f32; 4]> {
        if size < 2 {
            return vec![[0.0, 0.0, 0.0, 1.0]];
        }

        let total = size as usize * size as usize * size as usize;
        let mut lut = Vec::with_capacity(total);
        let denom = (size - 1) as f32;

        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    let mut px = [x as f32 / denom, y as f32 / denom, z as f32 / denom];
                    self.apply_pixel(&mut px);
                    lut.push([px[0], px[1], px[2], 1.0]);
                }
            }
        }

        lut
    }
}

impl fmt::Debug for CpuProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CpuProcessor")
            .field("ops", &self.ops.len())
            .finish()
    }
}
