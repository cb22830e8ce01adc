//! Compiled transform pipelines: ordered op lists over RGB triples.
//!
//! A pipeline is compiled once per endpoint pair (decode the source
//! transfer to linear, one gamut matrix, encode the destination
//! transfer) and then optimized for the CPU path by fusing adjacent
//! matrices and dropping identity stages. Ops are plain data with no
//! interior mutability, so a compiled pipeline can be applied from
//! multiple threads concurrently.

use std::sync::Arc;

use glam::DMat3;

use crate::config::ColorSpaceDef;
use crate::primaries::conversion_matrix;
use crate::transfer::{self, TransferFunction};

/// A single compiled pipeline stage.
#[derive(Clone)]
pub(crate) enum Op {
    /// 3x3 linear-light matrix, row-major.
    Matrix([[f32; 3]; 3]),
    /// Decode encoded channel values to linear light.
    ToLinear(Arc<dyn TransferFunction>),
    /// Encode linear-light channel values.
    FromLinear(Arc<dyn TransferFunction>),
}

const IDENTITY: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

impl Op {
    fn from_dmat3(m: DMat3) -> Self {
        let c = m.to_cols_array_2d();
        Self::Matrix([
            [c[0][0] as f32, c[1][0] as f32, c[2][0] as f32],
            [c[0][1] as f32, c[1][1] as f32, c[2][1] as f32],
            [c[0][2] as f32, c[1][2] as f32, c[2][2] as f32],
        ])
    }

    pub(crate) fn apply(&self, rgb: &mut [f32; 3]) {
        match self {
            Self::Matrix(m) => {
                let [r, g, b] = *rgb;
                rgb[0] = m[0][0] * r + m[0][1] * g + m[0][2] * b;
                rgb[1] = m[1][0] * r + m[1][1] * g + m[1][2] * b;
                rgb[2] = m[2][0] * r + m[2][1] * g + m[2][2] * b;
            }
            Self::ToLinear(tf) => {
                for v in rgb.iter_mut() {
                    *v = tf.to_linear(*v);
                }
            }
            Self::FromLinear(tf) => {
                for v in rgb.iter_mut() {
                    *v = tf.to_encoded(*v);
                }
            }
        }
    }

    fn is_identity(&self) -> bool {
        match self {
            Self::Matrix(m) => {
                let mut max_diff = 0.0_f32;
                for (row, id_row) in m.iter().zip(IDENTITY.iter()) {
                    for (a, b) in row.iter().zip(id_row.iter()) {
                        max_diff = max_diff.max((a - b).abs());
                    }
                }
                max_diff < 1e-6
            }
            _ => false,
        }
    }

    fn is_finite(&self) -> bool {
        match self {
            Self::Matrix(m) => m.iter().flatten().all(|v| v.is_finite()),
            _ => true,
        }
    }
}

fn mul(a: &[[f32; 3]; 3], b: &[[f32; 3]; 3]) -> [[f32; 3]; 3] {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    out
}

/// Compile the forward pipeline from `src` to `dst`.
///
/// Returns an error when the gamut matrix derivation is not finite;
/// pipelines returned here are always fully usable.
pub(crate) fn compile(src: &ColorSpaceDef, dst: &ColorSpaceDef) -> Result<Vec<Op>, String> {
    let mut ops = Vec::with_capacity(3);

    if let Some(tf) = transfer::curve(src.transfer) {
        ops.push(Op::ToLinear(tf));
    }

    let matrix = Op::from_dmat3(conversion_matrix(src.primaries, dst.primaries));
    if !matrix.is_finite() {
        return Err(format!(
            "gamut matrix {:?} -> {:?} is not finite",
            src.primaries, dst.primaries
        ));
    }
    ops.push(matrix);

    if let Some(tf) = transfer::curve(dst.transfer) {
        ops.push(Op::FromLinear(tf));
    }

    Ok(ops)
}

/// Optimize an op list for repeated application: fuse adjacent
/// matrices into one and drop identity stages. A same-space pipeline
/// optimizes to an empty list.
pub(crate) fn optimize(ops: &[Op]) -> Vec<Op> {
    let mut out: Vec<Op> = Vec::with_capacity(ops.len());
    for op in ops {
        match (out.last_mut(), op) {
            (Some(Op::Matrix(prev)), Op::Matrix(next)) => {
                // next runs after prev, so it multiplies from the left.
                *prev = mul(next, prev);
            }
            _ => out.push(op.clone()),
        }
    }
    out.retain(|op| !op.is_identity());
    out
}
