//! Transfer function (OETF/EOTF) implementations.
//!
//! Each implementation uses the published specification constants.
//! Transfer functions convert between non-linear (encoded) and linear
//! light values.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Transfer characteristics understood by the config schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transfer {
    /// Linear light (no encoding).
    #[default]
    Linear,
    /// sRGB piecewise curve per IEC 61966-2-1.
    Srgb,
    /// Pure 2.2 power function.
    Gamma22,
    /// Pure 2.4 power function.
    Gamma24,
    /// ACEScc logarithmic encoding (S-2014-003).
    AcesCc,
    /// ACEScct logarithmic encoding with toe (S-2016-001).
    AcesCct,
}

/// A transfer function that converts between linear and non-linear encodings.
pub trait TransferFunction: Send + Sync {
    /// Convert from non-linear (encoded) to linear light.
    fn to_linear(&self, encoded: f32) -> f32;

    /// Convert from linear light to non-linear (encoded).
    fn to_encoded(&self, linear: f32) -> f32;
}

/// Get the curve for a transfer characteristic, or `None` for linear.
pub fn curve(transfer: Transfer) -> Option<Arc<dyn TransferFunction>> {
    match transfer {
        Transfer::Linear => None,
        Transfer::Srgb => Some(Arc::new(SrgbTransfer)),
        Transfer::Gamma22 => Some(Arc::new(GammaTransfer { exponent: 2.2 })),
        Transfer::Gamma24 => Some(Arc::new(GammaTransfer { exponent: 2.4 })),
        Transfer::AcesCc => Some(Arc::new(AcesCcTransfer)),
        Transfer::AcesCct => Some(Arc::new(AcesCctTransfer)),
    }
}

// ---------------------------------------------------------------------------
// sRGB (IEC 61966-2-1)
// ---------------------------------------------------------------------------

/// sRGB transfer function per IEC 61966-2-1.
///
/// ```text
/// to_linear:   V <= 0.04045 → V / 12.92
///              V >  0.04045 → ((V + 0.055) / 1.055) ^ 2.4
///
/// from_linear: L <= 0.0031308 → L × 12.92
///              L >  0.0031308 → 1.055 × L^(1/2.4) − 0.055
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SrgbTransfer;

impl TransferFunction for SrgbTransfer {
    fn to_linear(&self, encoded: f32) -> f32 {
        if encoded <= 0.04045 {
            encoded / 12.92
        } else {
            ((encoded + 0.055) / 1.055).powf(2.4)
        }
    }

    fn to_encoded(&self, linear: f32) -> f32 {
        if linear <= 0.0031308 {
            linear * 12.92
        } else {
            1.055 * linear.powf(1.0 / 2.4) - 0.055
        }
    }
}

// ---------------------------------------------------------------------------
// Pure power gamma
// ---------------------------------------------------------------------------

/// Pure power-function gamma, clamped at zero.
#[derive(Debug, Clone, Copy)]
pub struct GammaTransfer {
    pub exponent: f32,
}

impl TransferFunction for GammaTransfer {
    fn to_linear(&self, encoded: f32) -> f32 {
        encoded.max(0.0).powf(self.exponent)
    }

    fn to_encoded(&self, linear: f32) -> f32 {
        linear.max(0.0).powf(1.0 / self.exponent)
    }
}

// ---------------------------------------------------------------------------
// ACEScc (logarithmic, S-2014-003)
// ---------------------------------------------------------------------------

/// ACEScc transfer function — pure logarithmic encoding in AP1.
///
/// # Reference
/// S-2014-003: ACEScc — A Logarithmic Encoding of ACES Data
#[derive(Debug, Clone, Copy)]
pub struct AcesCcTransfer;

impl TransferFunction for AcesCcTransfer {
    fn to_linear(&self, encoded: f32) -> f32 {
        if encoded <= -0.3014 {
            (2.0_f32.powf(encoded * 17.52 - 9.72) - 1e-15) * 2.0
        } else {
            2.0_f32.powf(encoded * 17.52 - 9.72)
        }
    }

    fn to_encoded(&self, linear: f32) -> f32 {
        let min_val: f32 = 2.0_f32.powi(-15);
        if linear <= 0.0 {
            (1e-15_f32.log2() + 9.72) / 17.52
        } else if linear < min_val {
            ((1e-15 + linear * 0.5).log2() + 9.72) / 17.52
        } else {
            (linear.log2() + 9.72) / 17.52
        }
    }
}

// ---------------------------------------------------------------------------
// ACEScct (logarithmic with toe, S-2016-001)
// ---------------------------------------------------------------------------

/// ACEScct transfer function — logarithmic encoding with a toe for shadow detail.
///
/// # Reference
/// S-2016-001: ACEScct — A Quasi-Logarithmic Encoding of ACES Data
#[derive(Debug, Clone, Copy)]
pub struct AcesCctTransfer;

impl AcesCctTransfer {
    const CUT: f32 = 0.0078125;
    const CUT_ENCODED: f32 = 0.155_251_14;
    const SLOPE: f32 = 10.540_238;
    const OFFSET: f32 = 0.072_905_534;
}

impl TransferFunction for AcesCctTransfer {
    fn to_linear(&self, encoded: f32) -> f32 {
        if encoded <= Self::CUT_ENCODED {
            (encoded - Self::OFFSET) / Self::SLOPE
        } else {
            2.0_f32.powf(encoded * 17.52 - 9.72)
        }
    }

    fn to_encoded(&self, linear: f32) -> f32 {
        if linear <= Self::CUT {
            Self::SLOPE * linear + Self::OFFSET
        } else {
            (linear.log2() + 9.72) / 17.52
        }
    }
}
