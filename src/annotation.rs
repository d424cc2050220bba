//! Source annotation parsing and YOLO normalization.
//!
//! Source lines look like `<label name> <x_min> <y_min> <x_max> <y_max>`, where the
//! label name may contain spaces. Coordinates are absolute pixels.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{DatasetError, DatasetResult};
use crate::types::{BoundingBox, YoloBox};

const COORDINATE_COUNT: usize = 4;

/// Parse a whole annotation file. Blank lines are skipped.
pub fn read_annotation_file(path: &Path) -> DatasetResult<Vec<BoundingBox>> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DatasetError::SampleNotFound {
            path: path.to_path_buf(),
        },
        _ => DatasetError::io(path, e),
    })?;

    let mut boxes = Vec::new();
    for (line_idx, line) in content.lines().enumerate() {
        if let Some(bbox) = parse_annotation_line(line, path, line_idx + 1)? {
            boxes.push(bbox);
        }
    }
    Ok(boxes)
}

/// Parse a single annotation line; `Ok(None)` for blank lines.
pub fn parse_annotation_line(
    line: &str,
    path: &Path,
    line_num: usize,
) -> DatasetResult<Option<BoundingBox>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(None);
    }

    let parse_error = |msg: String| DatasetError::Parse {
        path: path.to_path_buf(),
        line: line_num,
        msg,
    };

    if tokens.len() <= COORDINATE_COUNT {
        return Err(parse_error(format!(
            "expected a label followed by 4 coordinates, got {} token(s)",
            tokens.len()
        )));
    }

    let (name_tokens, coord_tokens) = tokens.split_at(tokens.len() - COORDINATE_COUNT);
    let mut coords = [0.0f64; COORDINATE_COUNT];
    for (slot, token) in coords.iter_mut().zip(coord_tokens) {
        *slot = token
            .parse::<f64>()
            .map_err(|_| parse_error(format!("invalid coordinate `{}`", token)))?;
    }

    Ok(Some(BoundingBox {
        label: name_tokens.join(" "),
        x_min: coords[0],
        y_min: coords[1],
        x_max: coords[2],
        y_max: coords[3],
    }))
}

impl BoundingBox {
    /// Normalize this box against an image of `width` x `height` pixels.
    pub fn to_yolo(&self, class_id: usize, width: u32, height: u32) -> YoloBox {
        let w = width as f64;
        let h = height as f64;
        YoloBox {
            class_id,
            x_center: (self.x_min + self.x_max) / (2.0 * w),
            y_center: (self.y_min + self.y_max) / (2.0 * h),
            width: (self.x_max - self.x_min) / w,
            height: (self.y_max - self.y_min) / h,
        }
    }
}

impl YoloBox {
    /// Expand back to absolute pixel corners `(x_min, y_min, x_max, y_max)`.
    pub fn to_pixel_corners(&self, width: u32, height: u32) -> (f64, f64, f64, f64) {
        let w = width as f64;
        let h = height as f64;
        (
            (self.x_center - self.width / 2.0) * w,
            (self.y_center - self.height / 2.0) * h,
            (self.x_center + self.width / 2.0) * w,
            (self.y_center + self.height / 2.0) * h,
        )
    }
}

/// Render converted boxes as YOLO label file content, one newline-terminated line per box.
pub fn to_yolo_lines(boxes: &[YoloBox]) -> String {
    let mut yolo_data = String::with_capacity(boxes.len() * 48);
    for bbox in boxes {
        yolo_data.push_str(&bbox.to_string());
        yolo_data.push('\n');
    }
    yolo_data
}
