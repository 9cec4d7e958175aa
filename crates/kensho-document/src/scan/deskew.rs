// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Skew detection by projection profile.
//
// A well-aligned line of text produces alternating high/low bands in the
// per-row sum of edge intensity. Each candidate angle rotates the edge image
// and scores the population variance of those row sums; the sharpest profile
// wins.

use image::Rgba;
use kensho_core::config::SkewSearch;
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::image::processor::{EdgeImage, ImageProcessor, rotate_edges};

/// Searches a fixed grid of rotation angles for the one that best aligns
/// horizontal text.
#[derive(Debug, Clone)]
pub struct SkewEstimator {
    /// Search covers `[-max_angle, max_angle]` degrees.
    max_angle: f64,
    /// Grid spacing in degrees.
    step: f64,
}

impl SkewEstimator {
    pub fn new(search: &SkewSearch) -> Self {
        Self {
            max_angle: search.max_angle.abs(),
            step: search.step,
        }
    }

    /// Candidate angles in ascending order, from `-max_angle` to `max_angle`.
    ///
    /// Angles are computed from their index rather than by accumulation so
    /// the grid always has `2 * max_angle / step + 1` entries.
    pub fn candidate_angles(&self) -> Vec<f64> {
        if self.step <= 0.0 {
            return vec![-self.max_angle];
        }
        let count = (2.0 * self.max_angle / self.step).round() as usize + 1;
        (0..count)
            .map(|i| -self.max_angle + i as f64 * self.step)
            .collect()
    }

    /// Estimate the corrective rotation (clockwise degrees) for an edge image.
    ///
    /// Candidates are scored in parallel; the reduction walks them in
    /// ascending angle order with a strict `>`, so the first angle reaching
    /// the maximum wins and the result does not depend on scheduling. A
    /// blank edge image scores zero everywhere and yields `-max_angle`.
    #[instrument(skip_all, fields(width = edges.width(), height = edges.height()))]
    pub fn estimate_angle(&self, edges: &EdgeImage) -> f64 {
        let angles = self.candidate_angles();
        let scores: Vec<f64> = angles
            .par_iter()
            .map(|&angle| projection_score(&rotate_edges(edges, angle as f32)))
            .collect();

        let (best_angle, best_score) = select_best(&angles, &scores);
        debug!(best_angle, best_score, candidates = angles.len(), "Skew search complete");
        best_angle
    }
}

impl Default for SkewEstimator {
    fn default() -> Self {
        Self::new(&SkewSearch::default())
    }
}

/// First-maximum reduction over `(angle, score)` pairs in the given order.
///
/// The sentinel lies below any variance, so an all-zero profile still picks
/// the leftmost angle.
fn select_best(angles: &[f64], scores: &[f64]) -> (f64, f64) {
    let mut best_angle = angles.first().copied().unwrap_or(0.0);
    let mut best_score = f64::NEG_INFINITY;
    for (&angle, &score) in angles.iter().zip(scores) {
        if score > best_score {
            best_score = score;
            best_angle = angle;
        }
    }
    (best_angle, best_score)
}

/// Population variance of the per-row sums of edge intensity.
pub fn projection_score(edges: &EdgeImage) -> f64 {
    if edges.width() == 0 || edges.height() == 0 {
        return 0.0;
    }
    let row_sums: Vec<f64> = edges
        .rows()
        .map(|row| row.map(|pixel| pixel.0[0] as f64).sum())
        .collect();

    let n = row_sums.len() as f64;
    let mean = row_sums.iter().sum::<f64>() / n;
    row_sums.iter().map(|sum| (sum - mean).powi(2)).sum::<f64>() / n
}

/// Estimates skew and rotates the original image when the correction is
/// large enough to be worth the resampling loss.
#[derive(Debug, Clone)]
pub struct Deskewer {
    estimator: SkewEstimator,
    /// Best angles with a smaller magnitude leave the image untouched.
    min_correction: f64,
    background: Rgba<u8>,
}

impl Deskewer {
    pub fn new(search: &SkewSearch, background: [u8; 4]) -> Self {
        Self {
            estimator: SkewEstimator::new(search),
            min_correction: search.min_correction,
            background: Rgba(background),
        }
    }

    pub fn estimator(&self) -> &SkewEstimator {
        &self.estimator
    }

    /// Deskew `image`, returning the (possibly rotated) image and the angle
    /// applied, if any.
    ///
    /// The edge image drives the estimate only; the rotation is applied to
    /// the original decoded image.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn deskew(&self, image: ImageProcessor) -> (ImageProcessor, Option<f64>) {
        let edges = image.edge_magnitude();
        let angle = self.estimator.estimate_angle(&edges);

        if angle.abs() < self.min_correction {
            debug!(angle, "Skew below correction threshold; keeping original");
            return (image, None);
        }

        info!(angle, "Correcting skew");
        (
            image.rotate_about_center(angle as f32, self.background),
            Some(angle),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, Luma};

    /// Stripes of `period` pixels whose corrective clockwise rotation is
    /// `theta` degrees. Every pixel is painted, so there is no canvas border
    /// to produce spurious edges.
    fn tilted_stripes(size: u32, period: f64, theta: f64) -> GrayImage {
        let centre = size as f64 / 2.0;
        let (sin, cos) = theta.to_radians().sin_cos();
        GrayImage::from_fn(size, size, |x, y| {
            let dx = x as f64 - centre;
            let dy = y as f64 - centre;
            let v = dx * sin + dy * cos;
            if ((v / period).floor() as i64).rem_euclid(2) == 0 {
                Luma([40u8])
            } else {
                Luma([220u8])
            }
        })
    }

    fn edges_of(img: GrayImage) -> EdgeImage {
        ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(img)).edge_magnitude()
    }

    #[test]
    fn default_grid_has_101_ascending_candidates() {
        let angles = SkewEstimator::default().candidate_angles();
        assert_eq!(angles.len(), 101);
        assert_eq!(angles[0], -10.0);
        assert!((angles[100] - 10.0).abs() < 1e-9);
        assert!((angles[50]).abs() < 1e-9);
        assert!(angles.windows(2).all(|w| (w[1] - w[0] - 0.2).abs() < 1e-9));
    }

    #[test]
    fn ties_go_to_the_first_angle() {
        let angles = [-1.0, 0.0, 1.0, 2.0];
        assert_eq!(select_best(&angles, &[1.0, 5.0, 5.0, 3.0]), (0.0, 5.0));
        assert_eq!(select_best(&angles, &[0.0, 0.0, 0.0, 0.0]), (-1.0, 0.0));
    }

    #[test]
    fn nan_scores_never_win() {
        let angles = [-1.0, 0.0, 1.0];
        assert_eq!(select_best(&angles, &[f64::NAN, 2.0, f64::NAN]), (0.0, 2.0));
        assert_eq!(select_best(&angles, &[f64::NAN; 3]).0, -1.0);
    }

    #[test]
    fn blank_image_defaults_to_leftmost_angle() {
        let edges = edges_of(GrayImage::from_pixel(40, 40, Luma([128u8])));
        assert_eq!(SkewEstimator::default().estimate_angle(&edges), -10.0);
    }

    #[test]
    fn projection_score_is_population_variance() {
        // Rows sum to 0, 20, 0, 20 → mean 10, variance 100.
        let edges = EdgeImage::from_fn(2, 4, |_, y| {
            if y % 2 == 1 { Luma([10u16]) } else { Luma([0u16]) }
        });
        assert!((projection_score(&edges) - 100.0).abs() < 1e-9);
        assert_eq!(projection_score(&EdgeImage::new(0, 0)), 0.0);
    }

    #[test]
    fn recovers_known_tilt_within_one_step() {
        let estimator = SkewEstimator::default();
        for theta in [3.0, -4.4, 7.2] {
            let angle = estimator.estimate_angle(&edges_of(tilted_stripes(160, 12.0, theta)));
            assert!(
                (angle - theta).abs() <= 0.2 + 1e-6,
                "expected ~{theta}, got {angle}"
            );
        }
    }

    #[test]
    fn aligned_text_is_left_alone() {
        let original = DynamicImage::ImageLuma8(tilted_stripes(120, 10.0, 0.0));
        let deskewer = Deskewer::new(&SkewSearch::default(), [0, 0, 0, 0]);

        let (out, applied) = deskewer.deskew(ImageProcessor::from_dynamic(original.clone()));
        assert_eq!(applied, None);
        assert_eq!(out.as_dynamic(), &original);
    }

    #[test]
    fn tilted_text_is_rotated_in_place() {
        let original = DynamicImage::ImageLuma8(tilted_stripes(120, 10.0, -5.0));
        let deskewer = Deskewer::new(&SkewSearch::default(), [255, 255, 255, 255]);

        let (out, applied) = deskewer.deskew(ImageProcessor::from_dynamic(original));
        let angle = applied.expect("skew should be corrected");
        assert!((angle + 5.0).abs() <= 0.2 + 1e-6, "got {angle}");
        assert_eq!((out.width(), out.height()), (120, 120));
    }
}
