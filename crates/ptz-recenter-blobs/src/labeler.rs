//! Connected-component labeling by raster scan and union-find.
//!
//! Pass 1 visits every pixel once in row-major order. A target pixel looks
//! at its already-visited neighbors (west and north for 4-connectivity,
//! plus north-west and north-east for 8-connectivity): with no labeled
//! neighbor it gets a fresh provisional label, otherwise the smallest
//! neighboring label, and differing neighbor labels are recorded as
//! equivalent. Equivalences are then resolved into dense canonical ids in
//! discovery order. Pass 2 rewrites the label map and accumulates each
//! region's bounding box, pixel count and (optionally) pixel set.

use std::str::FromStr;

use log::debug;
use ptz_recenter_core::{BoundingBox, PixelCoord, RecenterError, Rgb, RgbImageView, Stage};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::union_find::EquivalenceTable;

/// Pixel adjacency rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Orthogonal neighbors only.
    #[serde(alias = "axes", alias = "4")]
    Four,
    /// Orthogonal and diagonal neighbors.
    #[default]
    #[serde(alias = "surround", alias = "8")]
    Eight,
}

impl FromStr for Connectivity {
    type Err = RecenterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "four" | "axes" | "4" => Ok(Connectivity::Four),
            "eight" | "surround" | "8" => Ok(Connectivity::Eight),
            other => Err(RecenterError::config(format!(
                "unsupported connectivity '{other}' (expected four/axes/4 or eight/surround/8)"
            ))),
        }
    }
}

impl TryFrom<u8> for Connectivity {
    type Error = RecenterError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            4 => Ok(Connectivity::Four),
            8 => Ok(Connectivity::Eight),
            other => Err(RecenterError::config(format!(
                "unsupported connectivity {other} (expected 4 or 8)"
            ))),
        }
    }
}

/// One connected group of target pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Canonical label, `1..=nb_labels`.
    pub label: u32,
    pub bounding_box: BoundingBox,
    pub pixel_count: usize,
    /// Member pixels in raster order, present only when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixels: Option<Vec<PixelCoord>>,
}

/// Output of one labeling pass. Label ids are only meaningful within it.
#[derive(Clone, Debug)]
pub struct Labeling {
    width: usize,
    height: usize,
    labels: Vec<u32>,
    regions: Vec<Region>,
}

impl Labeling {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of canonical labels (regions).
    #[inline]
    pub fn nb_labels(&self) -> u32 {
        self.regions.len() as u32
    }

    /// Row-major label map; 0 is background.
    #[inline]
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    pub fn label_at(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.labels[y * self.width + x])
    }

    /// Regions ordered by ascending label.
    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn into_regions(self) -> Vec<Region> {
        self.regions
    }

    pub fn region(&self, label: u32) -> Result<&Region, RecenterError> {
        if label == 0 {
            return Err(RecenterError::dimension(
                Stage::Label,
                "label 0 is background and has no region",
            ));
        }
        self.regions.get(label as usize - 1).ok_or_else(|| {
            RecenterError::dimension(
                Stage::Label,
                format!("label {label} out of range (nb_labels={})", self.nb_labels()),
            )
        })
    }

    pub fn bounding_box(&self, label: u32) -> Result<BoundingBox, RecenterError> {
        self.region(label).map(|r| r.bounding_box)
    }

    /// Pixel set of `label`, if pixel sets were collected.
    pub fn pixel_set(&self, label: u32) -> Option<&[PixelCoord]> {
        self.region(label).ok()?.pixels.as_deref()
    }
}

/// Connected-component labeler.
///
/// Holds configuration only; every call builds its own label map, so one
/// instance can be shared between threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComponentLabeler {
    connectivity: Connectivity,
    collect_pixel_sets: bool,
}

impl ComponentLabeler {
    pub fn new(connectivity: Connectivity) -> Self {
        Self {
            connectivity,
            collect_pixel_sets: false,
        }
    }

    /// Also materialize each region's pixel coordinates.
    pub fn with_pixel_sets(mut self, collect: bool) -> Self {
        self.collect_pixel_sets = collect;
        self
    }

    #[inline]
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// Label the pixels of `frame` for which `classify` returns true.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame, classify), fields(width = frame.width, height = frame.height))
    )]
    pub fn label<F>(&self, frame: &RgbImageView<'_>, classify: F) -> Result<Labeling, RecenterError>
    where
        F: Fn(Rgb) -> bool,
    {
        frame.validate()?;
        self.label_grid(frame.width, frame.height, |x, y| classify(frame.pixel(x, y)))
    }

    /// Label a precomputed row-major binary mask.
    pub fn label_mask(
        &self,
        width: usize,
        height: usize,
        mask: &[bool],
    ) -> Result<Labeling, RecenterError> {
        if width.checked_mul(height) != Some(mask.len()) {
            return Err(RecenterError::dimension(
                Stage::Label,
                format!(
                    "mask holds {} entries, expected {width}x{height}",
                    mask.len()
                ),
            ));
        }
        self.label_grid(width, height, |x, y| mask[y * width + x])
    }

    fn label_grid<F>(
        &self,
        width: usize,
        height: usize,
        mut is_target: F,
    ) -> Result<Labeling, RecenterError>
    where
        F: FnMut(usize, usize) -> bool,
    {
        if width == 0 || height == 0 {
            return Err(RecenterError::dimension(
                Stage::Label,
                format!("grid has empty extent (width={width}, height={height})"),
            ));
        }
        let n = width
            .checked_mul(height)
            .filter(|&n| n <= u32::MAX as usize)
            .ok_or_else(|| {
                RecenterError::dimension(
                    Stage::Label,
                    format!("{width}x{height} grid exceeds 32-bit label space"),
                )
            })?;

        let eight = self.connectivity == Connectivity::Eight;
        let mut labels = vec![0u32; n];
        let mut table = EquivalenceTable::with_capacity(64);

        for y in 0..height {
            let row = y * width;
            for x in 0..width {
                if !is_target(x, y) {
                    continue;
                }

                let mut neighbors = [0u32; 4];
                if x > 0 {
                    neighbors[0] = labels[row + x - 1];
                }
                if y > 0 {
                    let up = row - width + x;
                    neighbors[1] = labels[up];
                    if eight && x > 0 {
                        neighbors[2] = labels[up - 1];
                    }
                    if eight && x + 1 < width {
                        neighbors[3] = labels[up + 1];
                    }
                }

                let mut current = 0u32;
                for &l in neighbors.iter().filter(|&&l| l != 0) {
                    if current == 0 {
                        current = l;
                    } else if l != current {
                        table.union(current, l);
                        current = current.min(l);
                    }
                }
                if current == 0 {
                    current = table.make_label();
                }
                labels[row + x] = current;
            }
        }

        let provisional = table.len();
        let (canonical, nb_labels) = table.resolve();
        let regions = self.accumulate(width, &mut labels, &canonical, nb_labels as usize);

        debug!(
            "labeled {width}x{height} grid ({:?}): {provisional} provisional -> {nb_labels} regions",
            self.connectivity
        );

        Ok(Labeling {
            width,
            height,
            labels,
            regions,
        })
    }

    /// Rewrite provisional labels to canonical ones and build per-region stats.
    fn accumulate(
        &self,
        width: usize,
        labels: &mut [u32],
        canonical: &[u32],
        nb_labels: usize,
    ) -> Vec<Region> {
        let mut boxes: Vec<Option<BoundingBox>> = vec![None; nb_labels];
        let mut counts = vec![0usize; nb_labels];
        let mut pixel_sets: Vec<Vec<PixelCoord>> = if self.collect_pixel_sets {
            vec![Vec::new(); nb_labels]
        } else {
            Vec::new()
        };

        for (i, slot) in labels.iter_mut().enumerate() {
            if *slot == 0 {
                continue;
            }
            let label = canonical[*slot as usize];
            *slot = label;

            let idx = label as usize - 1;
            let p = PixelCoord::new((i % width) as u32, (i / width) as u32);
            match &mut boxes[idx] {
                Some(bbox) => bbox.include(p),
                empty => *empty = Some(BoundingBox::from_pixel(p)),
            }
            counts[idx] += 1;
            if self.collect_pixel_sets {
                pixel_sets[idx].push(p);
            }
        }

        let mut pixel_sets = pixel_sets.into_iter();
        boxes
            .into_iter()
            .zip(counts)
            .enumerate()
            .filter_map(|(idx, (bbox, pixel_count))| {
                let pixels = pixel_sets.next();
                Some(Region {
                    label: idx as u32 + 1,
                    bounding_box: bbox?,
                    pixel_count,
                    pixels,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(rows: &[&str]) -> (usize, usize, Vec<bool>) {
        let h = rows.len();
        let w = rows[0].len();
        let data = rows
            .iter()
            .flat_map(|r| r.chars().map(|c| c == '#'))
            .collect();
        (w, h, data)
    }

    fn run(conn: Connectivity, rows: &[&str]) -> Labeling {
        let (w, h, m) = mask(rows);
        ComponentLabeler::new(conn)
            .label_mask(w, h, &m)
            .expect("labeling")
    }

    #[test]
    fn empty_mask_has_no_labels() {
        let lab = run(Connectivity::Eight, &["....", "....", "...."]);
        assert_eq!(lab.nb_labels(), 0);
        assert!(lab.labels().iter().all(|&l| l == 0));
        assert!(lab.regions().is_empty());
    }

    #[test]
    fn isolated_pixel_has_degenerate_box() {
        let lab = run(Connectivity::Four, &[".....", "..#..", "....."]);
        assert_eq!(lab.nb_labels(), 1);
        let bbox = lab.bounding_box(1).expect("bbox");
        assert_eq!(bbox.min, PixelCoord::new(2, 1));
        assert_eq!(bbox.max, PixelCoord::new(2, 1));
        assert_eq!(bbox.center(), PixelCoord::new(2, 1));
        assert_eq!(lab.label_at(2, 1), Some(1));
    }

    #[test]
    fn far_apart_pixels_are_separate_regions() {
        for conn in [Connectivity::Four, Connectivity::Eight] {
            let lab = run(conn, &["#...#", ".....", "..#.."]);
            assert_eq!(lab.nb_labels(), 3);
            assert!(lab.regions().iter().all(|r| r.pixel_count == 1));
        }
    }

    #[test]
    fn diagonal_neighbors_depend_on_connectivity() {
        let rows = ["#.", ".#"];
        assert_eq!(run(Connectivity::Eight, &rows).nb_labels(), 1);
        assert_eq!(run(Connectivity::Four, &rows).nb_labels(), 2);

        // anti-diagonal goes through the north-east neighbor
        let rows = [".#", "#."];
        assert_eq!(run(Connectivity::Eight, &rows).nb_labels(), 1);
        assert_eq!(run(Connectivity::Four, &rows).nb_labels(), 2);
    }

    #[test]
    fn u_shape_merges_into_one_label() {
        let lab = run(
            Connectivity::Four,
            &["#...#", "#...#", "#...#", "#####"],
        );
        assert_eq!(lab.nb_labels(), 1);
        let r = lab.region(1).expect("region");
        assert_eq!(r.pixel_count, 11);
        assert_eq!(r.bounding_box.min, PixelCoord::new(0, 0));
        assert_eq!(r.bounding_box.max, PixelCoord::new(4, 3));
    }

    #[test]
    fn labels_follow_raster_discovery_order() {
        // The column-2 arm is seen first and absorbs the left arm on the
        // last row; the lone pixel at (5, 1) becomes label 2.
        let lab = run(
            Connectivity::Four,
            &["..#...", "#.#..#", "###..."],
        );
        assert_eq!(lab.nb_labels(), 2);
        assert_eq!(lab.label_at(2, 0), Some(1));
        assert_eq!(lab.label_at(0, 1), Some(1));
        assert_eq!(lab.label_at(5, 1), Some(2));
    }

    #[test]
    fn every_pixel_has_exactly_one_consistent_label() {
        let rows = ["##..#.#", "#..##..", "..#..##", "#.#.#.#"];
        let (w, h, m) = mask(&rows);
        for conn in [Connectivity::Four, Connectivity::Eight] {
            let lab = ComponentLabeler::new(conn)
                .label_mask(w, h, &m)
                .expect("labeling");
            assert_eq!(lab.labels().len(), w * h);
            for (i, &l) in lab.labels().iter().enumerate() {
                assert_eq!(l > 0, m[i]);
                assert!(l <= lab.nb_labels());
            }
            let total: usize = lab.regions().iter().map(|r| r.pixel_count).sum();
            assert_eq!(total, m.iter().filter(|&&b| b).count());
            for r in lab.regions() {
                assert!(r.bounding_box.min.x <= r.bounding_box.max.x);
                assert!(r.bounding_box.min.y <= r.bounding_box.max.y);
            }
        }
    }

    #[test]
    fn pixel_sets_are_opt_in() {
        let (w, h, m) = mask(&["##.", "..#"]);
        let plain = ComponentLabeler::new(Connectivity::Eight)
            .label_mask(w, h, &m)
            .expect("plain");
        assert!(plain.pixel_set(1).is_none());

        let full = ComponentLabeler::new(Connectivity::Eight)
            .with_pixel_sets(true)
            .label_mask(w, h, &m)
            .expect("full");
        assert_eq!(
            full.pixel_set(1).expect("pixels"),
            &[
                PixelCoord::new(0, 0),
                PixelCoord::new(1, 0),
                PixelCoord::new(2, 1)
            ]
        );
    }

    #[test]
    fn background_and_unknown_labels_have_no_box() {
        let lab = run(Connectivity::Eight, &["#."]);
        assert!(matches!(
            lab.bounding_box(0),
            Err(RecenterError::DimensionMismatch { .. })
        ));
        assert!(lab.bounding_box(2).is_err());
    }

    #[test]
    fn rejects_bad_extents() {
        let labeler = ComponentLabeler::new(Connectivity::Four);
        assert!(labeler.label_mask(0, 3, &[]).is_err());
        assert!(labeler.label_mask(2, 2, &[true; 3]).is_err());
        let frame = RgbImageView::new(0, 0, &[]);
        assert!(matches!(
            labeler.label(&frame, |_| true),
            Err(RecenterError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn labels_frame_pixels_through_classifier() {
        let g = [0u8, 255, 0];
        let k = [0u8, 0, 0];
        let data: Vec<u8> = [g, k, g, g, k, k].concat();
        let frame = RgbImageView::new(3, 2, &data);
        let lab = ComponentLabeler::new(Connectivity::Four)
            .label(&frame, |p| p.g > 127)
            .expect("labeling");
        assert_eq!(lab.nb_labels(), 2);
        assert_eq!(lab.labels(), &[1, 0, 2, 1, 0, 0]);
    }

    #[test]
    fn connectivity_parses_names_and_numbers() {
        assert_eq!("axes".parse::<Connectivity>().expect("axes"), Connectivity::Four);
        assert_eq!(
            "Surround".parse::<Connectivity>().expect("surround"),
            Connectivity::Eight
        );
        assert_eq!(Connectivity::try_from(4u8).expect("4"), Connectivity::Four);
        assert!(matches!(
            Connectivity::try_from(6u8),
            Err(RecenterError::InvalidConfiguration(_))
        ));
        assert!("hex".parse::<Connectivity>().is_err());
    }
}
