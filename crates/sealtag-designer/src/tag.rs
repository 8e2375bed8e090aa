//! # Tag Builder
//!
//! Drives one build request against a kernel:
//!
//! 1. Validate [`TagParams`]
//! 2. Base body: a triangle in the plane `x = -width/2` with its base on
//!    `y = 0` and apex at `y = height`, swept `width` along +X, every edge
//!    rounded by `body.fillet_radius`
//! 3. Text: outline, center, flatten, classify, build faces on the text
//!    plane, sweep into the body's bottom face and cut (best effort)
//! 4. Tessellate into a [`MeshData`]

use nalgebra::{Point3, Vector3};
use sealtag_core::{MeshData, TagParams};
use sealtag_kernel::{BrepKernel, Deflection, KernelError};
use sealtag_settings::Config;
use tracing::{debug, info};

use crate::classify::classify_contours;
use crate::contour::build_contours;
use crate::engrave::{engrave, EngraveOutcome};
use crate::error::{BuildError, FontError};
use crate::faces::{build_text_faces, PlaneMapping};
use crate::mesh_extract::extract_mesh;
use crate::outline::{OutlineSource, SystemFontSource, TextOutline};

/// Result of a build: the solid (for export), its preview mesh and what
/// happened during engraving
#[derive(Debug, Clone)]
pub struct TagModel<S> {
    pub solid: S,
    pub mesh: MeshData,
    pub engraving: EngraveOutcome,
}

/// Builds tags with a borrowed kernel and configuration.
///
/// Without an explicit outline source, the font from `config.font` is
/// resolved the first time text actually needs outlining.
pub struct TagBuilder<'a, K: BrepKernel> {
    kernel: &'a K,
    config: &'a Config,
    outlines: Option<&'a dyn OutlineSource>,
}

impl<'a, K: BrepKernel> TagBuilder<'a, K> {
    pub fn new(kernel: &'a K, config: &'a Config) -> Self {
        Self {
            kernel,
            config,
            outlines: None,
        }
    }

    pub fn with_outline_source(mut self, source: &'a dyn OutlineSource) -> Self {
        self.outlines = Some(source);
        self
    }

    fn deflection(&self) -> Deflection {
        Deflection::new(
            self.config.tessellation.linear_deflection,
            self.config.tessellation.angular_deflection,
        )
    }

    fn outline(&self, text: &str, size: f64) -> Result<TextOutline, FontError> {
        match self.outlines {
            Some(source) => source.outline(text, size),
            None => SystemFontSource::from_settings(&self.config.font)?.outline(text, size),
        }
    }

    /// The rounded triangular prism, before engraving
    pub fn build_body(&self, params: &TagParams) -> Result<K::Solid, BuildError> {
        let k = self.kernel;
        let (w, d, h) = (params.width, params.depth, params.height);
        let x = -w / 2.0;
        let base_back = Point3::new(x, 0.0, -d / 2.0);
        let apex = Point3::new(x, h, 0.0);
        let base_front = Point3::new(x, 0.0, d / 2.0);

        let edges = [
            k.make_segment(apex, base_back),
            k.make_segment(base_back, base_front),
            k.make_segment(base_front, apex),
        ]
        .into_iter()
        .collect::<Result<Vec<_>, KernelError>>()
        .map_err(BuildError::Body)?;
        let wire = k.make_wire(&edges).map_err(BuildError::Body)?;
        let profile = k.make_face(&wire).map_err(BuildError::Body)?;
        let prism = k
            .extrude_face(&profile, Vector3::new(w, 0.0, 0.0))
            .map_err(BuildError::Body)?;

        let radius = self.config.body.fillet_radius;
        if radius <= 0.0 {
            return Ok(prism);
        }
        let all_edges = k.edges(&prism);
        debug!("Rounding {} body edges (r = {})", all_edges.len(), radius);
        k.fillet(&prism, radius, &all_edges)
            .map_err(BuildError::Body)
    }

    /// Font size that fits the text on the bottom face
    pub fn font_size(&self, params: &TagParams) -> f64 {
        self.config
            .engrave
            .font_size(params.width, params.depth, params.text.chars().count())
    }

    /// Text faces on the engraving plane, `None` when the text yields no
    /// outer contours
    pub fn text_faces(&self, params: &TagParams) -> Result<Option<K::Compound>, BuildError> {
        let outline = self.outline(&params.text, self.font_size(params))?.centered();
        let contours = build_contours(&outline.commands, self.config.engrave.curve_samples);
        let classified = classify_contours(contours);
        let outers = classified.iter().filter(|c| c.is_outer()).count();
        debug!(
            "Text {:?}: {} contours, {} outers",
            params.text,
            classified.len(),
            outers
        );
        if outers == 0 {
            return Ok(None);
        }

        let mapping = PlaneMapping::from_settings(&self.config.engrave.plane);
        Ok(build_text_faces(self.kernel, &classified, &mapping))
    }

    /// Engraves `params.text` into `body`.
    ///
    /// Empty text never touches the font. A missing font is an error; any
    /// kernel failure while engraving returns the body unchanged.
    pub fn engrave_text(
        &self,
        body: K::Solid,
        params: &TagParams,
    ) -> Result<(K::Solid, EngraveOutcome), BuildError> {
        if !params.has_text() {
            return Ok((body, EngraveOutcome::Skipped));
        }
        let faces = self.text_faces(params)?;
        let depth = self
            .config
            .engrave
            .engrave_depth(params.height, params.text_height);
        let mapping = PlaneMapping::from_settings(&self.config.engrave.plane);
        Ok(engrave(
            self.kernel,
            body,
            faces.as_ref(),
            mapping.extrusion(depth),
        ))
    }

    pub fn build(&self, params: &TagParams) -> Result<TagModel<K::Solid>, BuildError> {
        params.validate()?;

        let body = self.build_body(params)?;
        let (mut solid, engraving) = self.engrave_text(body, params)?;
        let mesh = extract_mesh(self.kernel, &mut solid, self.deflection())
            .map_err(BuildError::Tessellation)?;

        info!(
            "Built tag {}x{}x{} ({:?}): {} triangles, engraving {:?}",
            params.width,
            params.depth,
            params.height,
            params.text,
            mesh.triangle_count(),
            engraving
        );
        Ok(TagModel {
            solid,
            mesh,
            engraving,
        })
    }

    /// Unit box minus a sphere of radius 0.65 at its center
    pub fn build_sample(&self) -> Result<TagModel<K::Solid>, BuildError> {
        let k = self.kernel;
        let cube = k
            .make_box(Point3::origin(), Vector3::new(1.0, 1.0, 1.0))
            .map_err(BuildError::Body)?;
        let ball = k
            .make_sphere(Point3::new(0.5, 0.5, 0.5), 0.65)
            .map_err(BuildError::Body)?;
        let mut solid = k.cut(&cube, &ball).map_err(BuildError::Body)?;
        let mesh = extract_mesh(k, &mut solid, self.deflection())
            .map_err(BuildError::Tessellation)?;

        info!("Built sample solid: {} triangles", mesh.triangle_count());
        Ok(TagModel {
            solid,
            mesh,
            engraving: EngraveOutcome::Skipped,
        })
    }
}
