//! RGB primaries and the 3x3 gamut matrices between them.
//!
//! Matrices are derived from published chromaticity coordinates: an
//! RGB→XYZ solve per primary set, with Bradford chromatic adaptation
//! inserted when the two white points differ. Derivation runs in f64;
//! the per-pixel path consumes the result as f32.

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

/// Primary sets understood by the config schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Primaries {
    /// sRGB / Rec.709 primaries, D65 white point.
    Srgb,
    /// ITU-R BT.2020 primaries, D65 white point.
    Rec2020,
    /// ACES AP1 primaries, D60 white point.
    AcesCg,
    /// ACES AP0 primaries, D60 white point.
    #[serde(rename = "aces2065-1")]
    Aces2065_1,
}

/// CIE xy coordinates for three primaries and the white point.
#[derive(Debug, Clone, Copy)]
struct Chromaticities {
    rx: f64,
    ry: f64,
    gx: f64,
    gy: f64,
    bx: f64,
    by: f64,
    wx: f64,
    wy: f64,
}

impl Primaries {
    fn chromaticities(self) -> Chromaticities {
        match self {
            Self::Srgb => Chromaticities {
                rx: 0.640,
                ry: 0.330,
                gx: 0.300,
                gy: 0.600,
                bx: 0.150,
                by: 0.060,
                wx: 0.3127,
                wy: 0.3290,
            },
            Self::Rec2020 => Chromaticities {
                rx: 0.708,
                ry: 0.292,
                gx: 0.170,
                gy: 0.797,
                bx: 0.131,
                by: 0.046,
                wx: 0.3127,
                wy: 0.3290,
            },
            Self::AcesCg => Chromaticities {
                rx: 0.713,
                ry: 0.293,
                gx: 0.165,
                gy: 0.830,
                bx: 0.128,
                by: 0.044,
                wx: 0.32168,
                wy: 0.33767,
            },
            Self::Aces2065_1 => Chromaticities {
                rx: 0.73470,
                ry: 0.26530,
                gx: 0.00000,
                gy: 1.00000,
                bx: 0.00010,
                by: -0.07700,
                wx: 0.32168,
                wy: 0.33767,
            },
        }
    }

    fn white_point(self) -> (f64, f64) {
        let c = self.chromaticities();
        (c.wx, c.wy)
    }
}

fn xy_to_xyz(x: f64, y: f64) -> DVec3 {
    DVec3::new(x / y, 1.0, (1.0 - x - y) / y)
}

fn rgb_to_xyz(p: Primaries) -> DMat3 {
    let c = p.chromaticities();
    let m = DMat3::from_cols(
        xy_to_xyz(c.rx, c.ry),
        xy_to_xyz(c.gx, c.gy),
        xy_to_xyz(c.bx, c.by),
    );
    let w = xy_to_xyz(c.wx, c.wy);
    // Solve for the per-primary scales that map RGB white to the white point.
    let s = m.inverse() * w;
    m * DMat3::from_diagonal(s)
}

fn bradford_adapt(src_wp: DVec3, dst_wp: DVec3) -> DMat3 {
    // Bradford cone response matrix, column-major.
    let m = DMat3::from_cols_array(&[
        0.8951, -0.7502, 0.0389, //
        0.2664, 1.7135, -0.0685, //
        -0.1614, 0.0367, 1.0296,
    ]);
    let src_lms = m * src_wp;
    let dst_lms = m * dst_wp;
    let d = DMat3::from_diagonal(dst_lms / src_lms);
    m.inverse() * d * m
}

/// Linear-light matrix converting `src` RGB to `dst` RGB.
pub fn conversion_matrix(src: Primaries, dst: Primaries) -> DMat3 {
    let m_src = rgb_to_xyz(src);
    let m_dst = rgb_to_xyz(dst);
    let adapt = if src.white_point() == dst.white_point() {
        DMat3::IDENTITY
    } else {
        let (sx, sy) = src.white_point();
        let (dx, dy) = dst.white_point();
        bradford_adapt(xy_to_xyz(sx, sy), xy_to_xyz(dx, dy))
    };
    m_dst.inverse() * adapt * m_src
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-5;

    fn assert_vec3_close(actual: DVec3, expected: DVec3) {
        assert!(
            (actual - expected).abs().max_element() < EPSILON,
            "got {actual:?}, expected {expected:?}"
        );
    }

    #[test]
    fn test_same_primaries_give_identity_matrix() {
        for p in [
            Primaries::Srgb,
            Primaries::Rec2020,
            Primaries::AcesCg,
            Primaries::Aces2065_1,
        ] {
            let m = conversion_matrix(p, p);
            assert_vec3_close(m * DVec3::ONE, DVec3::ONE);
            assert_vec3_close(m * DVec3::X, DVec3::X);
            assert_vec3_close(m * DVec3::Z, DVec3::Z);
        }
    }

    #[test]
    fn test_srgb_to_xyz_matches_published_matrix() {
        // IEC 61966-2-1 / Bruce Lindbloom reference values.
        let m = rgb_to_xyz(Primaries::Srgb);
        let red = m * DVec3::X;
        assert_vec3_close(red, DVec3::new(0.4123908, 0.2126390, 0.0193308));
        let white = m * DVec3::ONE;
        assert_vec3_close(white, DVec3::new(0.9504559, 1.0, 1.0890578));
    }

    #[test]
    fn test_conversion_preserves_white() {
        // White maps to white across every pair, including the
        // D65 <-> D60 pairs that go through Bradford adaptation.
        let all = [
            Primaries::Srgb,
            Primaries::Rec2020,
            Primaries::AcesCg,
            Primaries::Aces2065_1,
        ];
        for src in all {
            for dst in all {
                let m = conversion_matrix(src, dst);
                assert_vec3_close(m * DVec3::ONE, DVec3::ONE);
            }
        }
    }

    #[test]
    fn test_conversion_roundtrip_is_identity() {
        let fwd = conversion_matrix(Primaries::Srgb, Primaries::AcesCg);
        let back = conversion_matrix(Primaries::AcesCg, Primaries::Srgb);
        let rt = back * fwd;
        let v = DVec3::new(0.18, 0.5, 0.9);
        assert_vec3_close(rt * v, v);
    }
}
