//! Property-based tests for frame aggregation.
//!
//! Run with: cargo test -p sensor-capture --test aggregate_properties

use nalgebra::Point3;
use proptest::prelude::*;
use sensor_capture::{CaptureError, FrameSample, Topology, aggregate_frames};

fn arb_point() -> impl Strategy<Value = [f64; 3]> {
    prop::array::uniform3(-10.0..10.0f64)
}

/// Between 1 and 12 frames of the same vertex count.
fn arb_frames() -> impl Strategy<Value = Vec<Vec<[f64; 3]>>> {
    (3usize..16, 1usize..12).prop_flat_map(|(vertices, frames)| {
        prop::collection::vec(prop::collection::vec(arb_point(), vertices), frames)
    })
}

fn to_samples(raw: &[Vec<[f64; 3]>], topology: &Topology) -> Vec<FrameSample> {
    raw.iter()
        .map(|points| {
            FrameSample::new(
                points.iter().map(|p| Point3::new(p[0], p[1], p[2])).collect(),
                topology.clone(),
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn aggregated_vertex_is_arithmetic_mean(raw in arb_frames()) {
        let topology = Topology::new(vec![[0, 1, 2]]);
        let samples = to_samples(&raw, &topology);

        let mesh = aggregate_frames(&samples).unwrap();
        prop_assert_eq!(mesh.vertices.len(), raw[0].len());
        prop_assert_eq!(&mesh.faces, &vec![[0, 1, 2]]);

        #[allow(clippy::cast_precision_loss)]
        let n = raw.len() as f64;
        for (i, vertex) in mesh.vertices.iter().enumerate() {
            for axis in 0..3 {
                let expected = raw.iter().map(|frame| frame[i][axis]).sum::<f64>() / n;
                prop_assert!((vertex.position[axis] - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn any_vertex_count_mismatch_is_rejected(raw in arb_frames(), extra in 1usize..4) {
        let topology = Topology::new(vec![[0, 1, 2]]);
        let mut samples = to_samples(&raw, &topology);
        let mut longer = raw[0].clone();
        longer.extend(std::iter::repeat_n([0.0, 0.0, 0.0], extra));
        samples.extend(to_samples(&[longer], &topology));

        let result = aggregate_frames(&samples);
        let is_inconsistent = matches!(result, Err(CaptureError::InconsistentTopology { .. }));
        prop_assert!(is_inconsistent);
    }
}
