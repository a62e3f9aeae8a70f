//! Pipeline configuration.

use mesh_io::{DEFAULT_STL_HEADER, ExportOptions, MeshFormat};
use mesh_process::SmoothParams;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Order in which the smoothing and scaling stages run.
///
/// Laplacian smoothing is translation-free and scales linearly, so both
/// orders give the same geometry up to rounding. The choice only matters
/// for floating-point reproducibility against a reference run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StageOrder {
    /// Smooth in capture units, then scale.
    #[default]
    SmoothThenScale,
    /// Scale first, then smooth in output units.
    ScaleThenSmooth,
}

/// Configuration for one pipeline run.
///
/// # Example
///
/// ```
/// use scan_pipeline::{PipelineConfig, StageOrder};
/// use mesh_io::MeshFormat;
///
/// let config = PipelineConfig::for_printing()
///     .with_stage_order(StageOrder::ScaleThenSmooth)
///     .with_formats(vec![MeshFormat::Stl]);
///
/// assert_eq!(config.scale, 1000.0);
/// assert_eq!(config.formats, vec![MeshFormat::Stl]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipelineConfig {
    /// Laplacian smoothing passes.
    pub smoothing: SmoothParams,

    /// Uniform scale factor, must be positive and finite.
    pub scale: f64,

    /// Whether smoothing runs before or after scaling.
    pub stage_order: StageOrder,

    /// Formats to export, in order. Empty skips export.
    pub formats: Vec<MeshFormat>,

    /// OBJ object name and artifact file stem.
    pub object_name: String,

    /// Free text for the STL header.
    pub stl_header: String,

    /// Whether to compute per-vertex normals for preview.
    pub generate_normals: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            smoothing: SmoothParams::default(),
            scale: 1.0,
            stage_order: StageOrder::default(),
            formats: MeshFormat::ALL.to_vec(),
            object_name: "face_scan".to_string(),
            stl_header: DEFAULT_STL_HEADER.to_string(),
            generate_normals: true,
        }
    }
}

impl PipelineConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// No smoothing, no scaling: the averaged capture as-is.
    #[must_use]
    pub fn raw() -> Self {
        Self {
            smoothing: SmoothParams::none(),
            scale: 1.0,
            ..Self::default()
        }
    }

    /// Light smoothing and metres to millimetres, the unit slicers expect.
    #[must_use]
    pub fn for_printing() -> Self {
        Self {
            smoothing: SmoothParams::new(3),
            scale: 1000.0,
            ..Self::default()
        }
    }

    /// Sets the smoothing parameters.
    #[must_use]
    pub const fn with_smoothing(mut self, smoothing: SmoothParams) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Sets the scale factor.
    #[must_use]
    pub const fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the stage order.
    #[must_use]
    pub const fn with_stage_order(mut self, order: StageOrder) -> Self {
        self.stage_order = order;
        self
    }

    /// Sets the export formats.
    #[must_use]
    pub fn with_formats(mut self, formats: Vec<MeshFormat>) -> Self {
        self.formats = formats;
        self
    }

    /// Sets the object name.
    #[must_use]
    pub fn with_object_name(mut self, name: impl Into<String>) -> Self {
        self.object_name = name.into();
        self
    }

    /// Sets whether vertex normals are generated.
    #[must_use]
    pub const fn with_normals(mut self, generate: bool) -> Self {
        self.generate_normals = generate;
        self
    }

    /// Exporter options derived from this configuration.
    #[must_use]
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions::default()
            .with_object_name(self.object_name.clone())
            .with_stl_header(self.stl_header.clone())
    }
}
