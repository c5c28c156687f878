// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! YOLO label file reading and writing.
//!
//! One line per box: `class_id cx cy w h`, geometry normalized to the image
//! size. Lines that do not have exactly five finite fields, or that describe
//! an empty box, are skipped.

use crate::models::annotation::{BoundingBox, Point};
use crate::util::geometry::{denormalize_coordinates, normalize_coordinates};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Label file path for an image: same base name, `.txt`, in `output_dir`.
pub fn label_path_for(image_path: &Path, output_dir: &Path) -> PathBuf {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{}.txt", stem))
}

/// Parse a single label line into a box in pixel coordinates.
pub fn parse_label_line(line: &str, image_width: u32, image_height: u32) -> Option<BoundingBox> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [class_id, cx, cy, w, h] = fields.as_slice() else {
        return None;
    };
    let number = |field: &str| field.parse::<f64>().ok().filter(|v| v.is_finite());
    let center = Point::new(number(*cx)?, number(*cy)?);
    let size = Point::new(number(*w)?, number(*h)?);
    if size.x <= 0.0 || size.y <= 0.0 {
        return None;
    }

    let (cx, cy) = denormalize_coordinates(&center, image_width, image_height);
    let (w, h) = denormalize_coordinates(&size, image_width, image_height);
    let bbox = BoundingBox::new(
        *class_id,
        cx - w / 2.0,
        cy - h / 2.0,
        cx + w / 2.0,
        cy + h / 2.0,
    );
    bbox.is_well_formed().then_some(bbox)
}

/// Format a box as a label line (without the trailing newline).
pub fn format_label_line(bbox: &BoundingBox, image_width: u32, image_height: u32) -> String {
    let center = normalize_coordinates(
        bbox.x1 + bbox.width() / 2.0,
        bbox.y1 + bbox.height() / 2.0,
        image_width,
        image_height,
    );
    let size = normalize_coordinates(bbox.width(), bbox.height(), image_width, image_height);
    format!("{} {} {} {} {}", bbox.class_id, center.x, center.y, size.x, size.y)
}

/// Load boxes from a label file. Malformed lines are skipped.
pub fn load_labels(path: &Path, image_width: u32, image_height: u32) -> Result<Vec<BoundingBox>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read labels from {}", path.display()))?;

    let mut boxes = Vec::new();
    for (number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_label_line(line, image_width, image_height) {
            Some(bbox) => boxes.push(bbox),
            None => log::debug!("Skipping malformed line {} in {}", number + 1, path.display()),
        }
    }

    log::info!("Loaded {} boxes from {}", boxes.len(), path.display());
    Ok(boxes)
}

/// Write boxes to a label file, replacing it in one step.
///
/// The content goes to a sibling temporary file which is then renamed over
/// the target, so readers never see a half-written file.
pub fn save_labels(boxes: &[BoundingBox], path: &Path, image_width: u32, image_height: u32) -> Result<()> {
    let text: String = boxes
        .iter()
        .map(|bbox| format_label_line(bbox, image_width, image_height) + "\n")
        .collect();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);
    std::fs::write(&tmp_path, text)
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    log::info!("Saved {} boxes to {}", boxes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_label_path_for() {
        let path = label_path_for(Path::new("/data/images/cell_01.png"), Path::new("/data/labels"));
        assert_eq!(path, PathBuf::from("/data/labels/cell_01.txt"));
    }

    #[test]
    fn test_format_matches_yolo() {
        let bbox = BoundingBox::new("0", 10.0, 10.0, 30.0, 30.0);
        assert_eq!(format_label_line(&bbox, 100, 100), "0 0.2 0.2 0.2 0.2");
    }

    #[test]
    fn test_height_normalized_by_image_height() {
        let bbox = BoundingBox::new("1", 0.0, 0.0, 100.0, 50.0);
        let line = format_label_line(&bbox, 200, 100);
        assert_eq!(line, "1 0.25 0.25 0.5 0.5");
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("img.txt");
        std::fs::write(
            &path,
            "0 0.5 0.5 0.2 0.2\n1 0.5 0.5 0.2\n\n2 a 0.5 0.1 0.1\n3 0.1 0.1 0.1 0.1 extra\n1 0.25 0.25 0.1 0.1\n",
        )
        .unwrap();

        let boxes = load_labels(&path, 100, 100).unwrap();
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].class_id, "0");
        assert!((boxes[0].x1 - 40.0).abs() < 1e-9);
        assert!((boxes[0].y2 - 60.0).abs() < 1e-9);
        assert_eq!(boxes[1].class_id, "1");
    }

    #[test]
    fn test_non_finite_and_empty_boxes_skipped() {
        assert_eq!(parse_label_line("0 nan 0.5 inf 0.1", 100, 100), None);
        assert_eq!(parse_label_line("0 0.5 0.5 0.1 NaN", 100, 100), None);
        assert_eq!(parse_label_line("0 -inf 0.5 0.1 0.1", 100, 100), None);
        assert_eq!(parse_label_line("0 0.5 0.5 0 0.1", 100, 100), None);
        assert_eq!(parse_label_line("0 0.5 0.5 0.1 -0.2", 100, 100), None);
        assert_eq!(parse_label_line("0 0.5 0.5 1e-300 0.1", 100, 100), None);

        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("img.txt");
        std::fs::write(&path, "0 nan 0.5 inf 0.1\n1 0.5 0.5 -0.1 0.1\n2 0.5 0.5 0.25 0.25\n").unwrap();
        let boxes = load_labels(&path, 100, 100).unwrap();
        assert_eq!(boxes.len(), 1);
        assert!(boxes[0].is_well_formed());

        save_labels(&boxes, &path, 100, 100).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "2 0.5 0.5 0.25 0.25\n");
    }

    #[test]
    fn test_roundtrip_within_one_pixel() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("roundtrip.txt");
        let (width, height) = (1277, 643);
        let boxes = vec![
            BoundingBox::new("0", 0.0, 0.0, 1.0, 1.0),
            BoundingBox::new("1", 13.0, 77.0, 640.0, 401.0),
            BoundingBox::new("2", 1000.0, 600.0, 1277.0, 643.0),
            BoundingBox::new("7", 333.0, 1.0, 334.0, 642.0),
        ];

        save_labels(&boxes, &path, width, height).unwrap();
        let loaded = load_labels(&path, width, height).unwrap();

        assert_eq!(loaded.len(), boxes.len());
        for (a, b) in boxes.iter().zip(&loaded) {
            assert_eq!(a.class_id, b.class_id);
            for (p, q) in [(a.x1, b.x1), (a.y1, b.y1), (a.x2, b.x2), (a.y2, b.y2)] {
                assert!((p - q).abs() <= 1.0, "{} vs {}", p, q);
            }
        }
    }

    #[test]
    fn test_save_overwrites_and_leaves_no_temp() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("img.txt");
        save_labels(&[BoundingBox::new("0", 0.0, 0.0, 5.0, 5.0)], &path, 10, 10).unwrap();
        save_labels(&[], &path, 10, 10).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
        assert!(!dir.path().join("nested").join("img.txt.tmp").exists());
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        assert!(load_labels(&dir.path().join("missing.txt"), 10, 10).is_err());
    }
}
