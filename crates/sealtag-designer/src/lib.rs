//! # SealTag Designer
//!
//! The geometry pipeline that turns a [`TagParams`] request into an engraved
//! solid and a render mesh.
//!
//! ## Architecture
//!
//! ```text
//! TagParams
//!   ├── body: triangular profile → prism → rounded edges
//!   └── text → OutlineSource → flatten → contours → classify
//!               → planar faces → extrude + cut
//! final solid ─┬── mesh_extract → MeshData
//!              └── kernel STL writer → bytes
//! ```
//!
//! Kernel access goes through [`sealtag_kernel::BrepKernel`]. The
//! [`GeometryService`] owns the single kernel instance on a worker thread and
//! runs one job at a time.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sealtag_designer::{GeometryService, TagParams};
//!
//! let service = GeometryService::shared(config).await?;
//! let mesh = service.build(TagParams::new(40.0, 40.0, 15.0, "A")).await?;
//! let stl = service.export().await?;
//! ```

pub mod classify;
pub mod contour;
pub mod engrave;
pub mod error;
pub mod faces;
pub mod flatten;
pub mod font_manager;
pub mod mesh_extract;
pub mod outline;
pub mod service;
pub mod tag;

pub use classify::{classify_contours, regions, ClassifiedContour, ContourRole, Region};
pub use contour::{build_contours, Contour, ContourBuilder, CONTOUR_EPSILON};
pub use engrave::{engrave, EngraveOutcome};
pub use error::{BuildError, FontError, ServiceError};
pub use faces::{build_text_faces, PlaneMapping, EDGE_EPSILON};
pub use flatten::{flatten_cubic, flatten_quadratic, DEFAULT_CURVE_SAMPLES};
pub use mesh_extract::{assemble_mesh, extract_mesh};
pub use outline::{OutlineSource, PathCommand, SystemFontSource, TextOutline};
pub use service::GeometryService;
pub use tag::{TagBuilder, TagModel};

pub use sealtag_core::{MeshData, Point2D, TagParams};
