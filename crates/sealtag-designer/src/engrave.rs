//! Extrude-and-cut engraving.

use nalgebra::Vector3;
use sealtag_kernel::BrepKernel;
use tracing::{debug, warn};

/// What happened to the body during engraving
#[derive(Debug, Clone, PartialEq)]
pub enum EngraveOutcome {
    /// The text tool was subtracted
    Engraved,
    /// There was nothing to engrave
    Skipped,
    /// The kernel failed; the body is unchanged
    Failed { reason: String },
}

impl EngraveOutcome {
    pub fn is_engraved(&self) -> bool {
        matches!(self, EngraveOutcome::Engraved)
    }
}

/// Sweeps `faces` along `extrusion` and subtracts the result from `body`.
///
/// Kernel failures are logged and leave `body` untouched.
pub fn engrave<K: BrepKernel>(
    kernel: &K,
    body: K::Solid,
    faces: Option<&K::Compound>,
    extrusion: Vector3<f64>,
) -> (K::Solid, EngraveOutcome) {
    let Some(faces) = faces else {
        debug!("No text faces, skipping engraving");
        return (body, EngraveOutcome::Skipped);
    };

    let tool = match kernel.extrude_compound(faces, extrusion) {
        Ok(tool) => tool,
        Err(e) => {
            warn!("Text extrusion failed, keeping body: {}", e);
            return (
                body,
                EngraveOutcome::Failed {
                    reason: e.to_string(),
                },
            );
        }
    };

    match kernel.cut(&body, &tool) {
        Ok(engraved) => (engraved, EngraveOutcome::Engraved),
        Err(e) => {
            warn!("Engraving cut failed, keeping body: {}", e);
            (
                body,
                EngraveOutcome::Failed {
                    reason: e.to_string(),
                },
            )
        }
    }
}
