//! Synchronous pipeline run: aggregate, process, export, persist.

use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Instant;

use mesh_io::{ExportArtifact, ExportStats, MeshFormat, export_mesh};
use mesh_process::{SmoothParams, VertexAdjacency, scale_mesh, smooth_mesh, with_vertex_normals};
use mesh_types::{IndexedMesh, MeshTopology};
use nalgebra::Vector3;
use sensor_capture::{FrameSample, aggregate_frames};
use tracing::{debug, info};

use crate::cancel::CancelToken;
use crate::config::{PipelineConfig, StageOrder};
use crate::context::ExportContext;
use crate::error::{PipelineError, PipelineResult, Stage};
use crate::events::{EventEmitter, PipelineEvent};

/// Smoothing outcome without the mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SmoothingStats {
    /// Passes actually run.
    pub iterations_performed: u32,
    /// Largest single-vertex displacement in any pass.
    pub max_displacement: f64,
}

/// A processed mesh ready for preview or export.
#[derive(Debug, Clone)]
pub struct ProcessedMesh {
    /// Smoothed and scaled mesh. Carries vertex normals when generated.
    pub mesh: IndexedMesh,
    /// Smoothing statistics.
    pub smoothing: SmoothingStats,
    /// Per-vertex normals, empty when generation is disabled.
    pub normals: Vec<Vector3<f64>>,
}

/// An artifact written to its final path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedArtifact {
    /// Artifact format.
    pub format: MeshFormat,
    /// Final path.
    pub path: PathBuf,
    /// Export counts.
    pub stats: ExportStats,
}

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Number of frames averaged.
    pub frames_aggregated: usize,
    /// Smoothing statistics.
    pub smoothing: SmoothingStats,
    /// Final processed mesh.
    pub mesh: IndexedMesh,
    /// Per-vertex normals, empty when generation is disabled.
    pub normals: Vec<Vector3<f64>>,
    /// Files written, in configured format order.
    pub artifacts: Vec<PersistedArtifact>,
}

impl PipelineReport {
    /// Path of the artifact in `format`, if one was written.
    #[must_use]
    pub fn artifact_path(&self, format: MeshFormat) -> Option<&PathBuf> {
        self.artifacts
            .iter()
            .find(|a| a.format == format)
            .map(|a| &a.path)
    }

    /// Total faces omitted across all artifacts.
    #[must_use]
    pub fn triangles_skipped(&self) -> usize {
        self.artifacts.iter().map(|a| a.stats.triangles_skipped).sum()
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scan: {} frames, {} vertices, {} faces, {} smoothing passes, {} files",
            self.frames_aggregated,
            self.mesh.vertex_count(),
            self.mesh.face_count(),
            self.smoothing.iterations_performed,
            self.artifacts.len()
        )
    }
}

/// Cancellation and event plumbing shared by the stages of one run.
struct Run<'a> {
    cancel: &'a CancelToken,
    events: &'a EventEmitter,
}

impl Run<'_> {
    fn check(&self, stage: Stage) -> PipelineResult<()> {
        if self.cancel.is_cancelled() {
            info!(%stage, "Pipeline cancelled");
            self.events.emit(PipelineEvent::Cancelled { stage });
            return Err(PipelineError::Cancelled { stage });
        }
        Ok(())
    }

    fn stage<T>(&self, stage: Stage, f: impl FnOnce() -> PipelineResult<T>) -> PipelineResult<T> {
        self.check(stage)?;
        self.events.emit(PipelineEvent::StageStarted { stage });
        let start = Instant::now();

        let value = f()?;

        let elapsed = start.elapsed();
        debug!(%stage, ?elapsed, "Stage finished");
        self.events.emit(PipelineEvent::StageFinished { stage, elapsed });
        Ok(value)
    }
}

/// Smooth, scale and (optionally) compute normals for an aggregated mesh.
///
/// # Errors
///
/// Returns [`PipelineError::Scale`] if the configured scale is not positive
/// and finite.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex};
/// use scan_pipeline::{process_mesh, PipelineConfig};
///
/// let mesh = IndexedMesh::from_parts(
///     vec![
///         Vertex::from_coords(0.0, 0.0, 0.0),
///         Vertex::from_coords(0.001, 0.0, 0.0),
///         Vertex::from_coords(0.0, 0.001, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// );
///
/// let processed = process_mesh(&mesh, &PipelineConfig::raw().with_scale(1000.0)).unwrap();
/// assert_eq!(processed.mesh.vertices[1].position.x, 1.0);
/// ```
pub fn process_mesh(mesh: &IndexedMesh, config: &PipelineConfig) -> PipelineResult<ProcessedMesh> {
    let cancel = CancelToken::new();
    let events = EventEmitter::silent();
    let run = Run {
        cancel: &cancel,
        events: &events,
    };
    process_in(&run, mesh, config)
}

fn process_in(
    run: &Run<'_>,
    mesh: &IndexedMesh,
    config: &PipelineConfig,
) -> PipelineResult<ProcessedMesh> {
    // Scaling never changes faces, so one graph serves either order.
    let adjacency = VertexAdjacency::build(&mesh.faces);
    let smooth = |m: &IndexedMesh| {
        run.stage(Stage::Smooth, || Ok(smooth_step(m, &adjacency, &config.smoothing)))
    };
    let scale = |m: &IndexedMesh| run.stage(Stage::Scale, || Ok(scale_mesh(m, config.scale)?));

    let (mesh, smoothing) = match config.stage_order {
        StageOrder::SmoothThenScale => {
            let (smoothed, stats) = smooth(mesh)?;
            (scale(&smoothed)?, stats)
        }
        StageOrder::ScaleThenSmooth => smooth(&scale(mesh)?)?,
    };

    let (mesh, normals) = if config.generate_normals {
        run.stage(Stage::Normals, || {
            let mesh = with_vertex_normals(&mesh);
            let normals: Vec<Vector3<f64>> = mesh.vertices.iter().filter_map(|v| v.normal).collect();
            Ok((mesh, normals))
        })?
    } else {
        (mesh, Vec::new())
    };

    Ok(ProcessedMesh {
        mesh,
        smoothing,
        normals,
    })
}

fn smooth_step(
    mesh: &IndexedMesh,
    adjacency: &VertexAdjacency,
    params: &SmoothParams,
) -> (IndexedMesh, SmoothingStats) {
    let result = smooth_mesh(mesh, adjacency, params);
    let stats = SmoothingStats {
        iterations_performed: result.iterations_performed,
        max_displacement: result.max_displacement,
    };
    (result.mesh, stats)
}

/// Encode `mesh` in every configured format.
///
/// # Errors
///
/// Returns [`PipelineError::Export`] if an encoder fails.
pub fn export_artifacts(
    mesh: &IndexedMesh,
    config: &PipelineConfig,
) -> PipelineResult<Vec<ExportArtifact>> {
    let options = config.export_options();
    config
        .formats
        .iter()
        .map(|&format| {
            export_mesh(mesh, format, &options)
                .map_err(|source| PipelineError::Export { format, source })
        })
        .collect()
}

/// Run the whole pipeline on the calling thread.
///
/// Cancellation is checked before every stage and before each file is
/// persisted. Files already persisted when cancellation is observed are
/// complete; no partial file is ever left at a destination path.
///
/// # Errors
///
/// Returns the first stage error, or [`PipelineError::Cancelled`].
pub fn run_pipeline(
    frames: &[FrameSample],
    config: &PipelineConfig,
    context: &ExportContext,
    cancel: &CancelToken,
) -> PipelineResult<PipelineReport> {
    run_with(frames, config, context, cancel, &EventEmitter::silent())
}

/// Like [`run_pipeline`], publishing progress on `events`.
///
/// # Errors
///
/// See [`run_pipeline`].
pub fn run_pipeline_with_events(
    frames: &[FrameSample],
    config: &PipelineConfig,
    context: &ExportContext,
    cancel: &CancelToken,
    events: mpsc::Sender<PipelineEvent>,
) -> PipelineResult<PipelineReport> {
    run_with(frames, config, context, cancel, &EventEmitter::new(events))
}

pub(crate) fn run_with(
    frames: &[FrameSample],
    config: &PipelineConfig,
    context: &ExportContext,
    cancel: &CancelToken,
    events: &EventEmitter,
) -> PipelineResult<PipelineReport> {
    let run = Run { cancel, events };

    info!(
        frames = frames.len(),
        smoothing = config.smoothing.iterations,
        scale = config.scale,
        formats = config.formats.len(),
        "Starting scan pipeline"
    );

    let aggregated = run.stage(Stage::Capture, || Ok(aggregate_frames(frames)?))?;
    let processed = process_in(&run, &aggregated, config)?;
    let encoded = run.stage(Stage::Export, || export_artifacts(&processed.mesh, config))?;

    let artifacts = run.stage(Stage::Persist, || {
        let mut written = Vec::with_capacity(encoded.len());
        for artifact in &encoded {
            // Checked per file so a cancel between files stops further writes.
            run.check(Stage::Persist)?;

            let path = context.path_for(artifact.format());
            artifact
                .persist_to(&path)
                .map_err(|source| PipelineError::Persist {
                    path: path.clone(),
                    source,
                })?;

            let persisted = PersistedArtifact {
                format: artifact.format(),
                path,
                stats: artifact.stats(),
            };
            run.events.emit(PipelineEvent::ArtifactPersisted {
                format: persisted.format,
                path: persisted.path.clone(),
                stats: persisted.stats,
            });
            written.push(persisted);
        }
        Ok(written)
    })?;

    let report = PipelineReport {
        frames_aggregated: frames.len(),
        smoothing: processed.smoothing,
        mesh: processed.mesh,
        normals: processed.normals,
        artifacts,
    };
    info!(%report, "Scan pipeline finished");
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{Point3, Vertex};

    fn tetrahedron() -> IndexedMesh {
        IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 0.0, 0.0),
                Vertex::from_coords(0.0, 1.0, 0.0),
                Vertex::from_coords(0.0, 0.0, 1.0),
            ],
            vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]],
        )
    }

    #[test]
    fn raw_config_keeps_geometry() {
        let processed = process_mesh(&tetrahedron(), &PipelineConfig::raw()).unwrap();
        assert_eq!(processed.smoothing.iterations_performed, 0);
        assert_eq!(processed.normals.len(), 4);
        for (a, b) in processed.mesh.vertices.iter().zip(&tetrahedron().vertices) {
            assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn stage_orders_agree() {
        let base = PipelineConfig::new()
            .with_smoothing(SmoothParams::new(2))
            .with_scale(10.0);
        let a = process_mesh(&tetrahedron(), &base).unwrap();
        let b = process_mesh(
            &tetrahedron(),
            &base.clone().with_stage_order(StageOrder::ScaleThenSmooth),
        )
        .unwrap();

        for (va, vb) in a.mesh.vertices.iter().zip(&b.mesh.vertices) {
            assert_relative_eq!(va.position, vb.position, epsilon = 1e-9);
        }
    }

    #[test]
    fn invalid_scale_is_a_scale_error() {
        let err = process_mesh(&tetrahedron(), &PipelineConfig::raw().with_scale(0.0)).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Scale));
    }

    #[test]
    fn normals_can_be_disabled() {
        let processed =
            process_mesh(&tetrahedron(), &PipelineConfig::raw().with_normals(false)).unwrap();
        assert!(processed.normals.is_empty());
        assert!(processed.mesh.vertices.iter().all(|v| v.normal.is_none()));
    }

    #[test]
    fn export_artifacts_in_config_order() {
        let config = PipelineConfig::raw().with_formats(vec![MeshFormat::Obj, MeshFormat::Stl]);
        let artifacts = export_artifacts(&tetrahedron(), &config).unwrap();
        let formats: Vec<_> = artifacts.iter().map(ExportArtifact::format).collect();
        assert_eq!(formats, [MeshFormat::Obj, MeshFormat::Stl]);
    }

    #[test]
    fn cancelled_token_stops_before_capture() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let dir = tempfile::tempdir().unwrap();
        let ctx = ExportContext::new(dir.path(), "x");

        let err = run_pipeline(&[], &PipelineConfig::raw(), &ctx, &cancel).unwrap_err();
        assert!(matches!(err, PipelineError::Cancelled { stage: Stage::Capture }));
    }

    #[test]
    fn report_display() {
        let report = PipelineReport {
            frames_aggregated: 3,
            smoothing: SmoothingStats::default(),
            mesh: IndexedMesh::from_positions(vec![Point3::origin()], vec![]),
            normals: vec![],
            artifacts: vec![],
        };
        assert_eq!(
            report.to_string(),
            "Scan: 3 frames, 1 vertices, 0 faces, 0 smoothing passes, 0 files"
        );
    }
}
