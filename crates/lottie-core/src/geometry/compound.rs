use super::path::{normalize_trim, BezierPath};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimMode {
    /// Every contour is trimmed by the same fractions of its own length.
    Simultaneously,
    /// Fractions refer to the combined length of all contours, in order.
    Individually,
}

impl TrimMode {
    pub fn from_raw(m: u8) -> Self {
        if m == 2 {
            TrimMode::Individually
        } else {
            TrimMode::Simultaneously
        }
    }
}

/// An ordered set of contours trimmed as one unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompoundPath {
    paths: Vec<BezierPath>,
    length: f32,
}

impl CompoundPath {
    pub fn new(paths: Vec<BezierPath>) -> Self {
        let length = paths.iter().map(BezierPath::length).sum();
        Self { paths, length }
    }

    pub fn paths(&self) -> &[BezierPath] {
        &self.paths
    }

    pub fn into_paths(self) -> Vec<BezierPath> {
        self.paths
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn push(&mut self, path: BezierPath) {
        self.length += path.length();
        self.paths.push(path);
    }

    pub fn trim(&self, start: f32, end: f32, offset: f32, mode: TrimMode) -> CompoundPath {
        let pieces = trim_compound_tagged(&self.paths, start, end, offset, mode);
        CompoundPath::new(pieces.into_iter().map(|(_, path)| path).collect())
    }
}

/// Trims `paths` as a compound path.
pub fn trim_compound(
    paths: &[BezierPath],
    start: f32,
    end: f32,
    offset: f32,
    mode: TrimMode,
) -> CompoundPath {
    CompoundPath::new(
        trim_compound_tagged(paths, start, end, offset, mode)
            .into_iter()
            .map(|(_, path)| path)
            .collect(),
    )
}

/// Like [`trim_compound`], but every output piece carries the index of the
/// source contour it was cut from.
pub fn trim_compound_tagged(
    paths: &[BezierPath],
    start: f32,
    end: f32,
    offset: f32,
    mode: TrimMode,
) -> Vec<(usize, BezierPath)> {
    let Some((s, e)) = normalize_trim(start, end, offset) else {
        return Vec::new();
    };
    if s == 0.0 && e == 1.0 {
        return paths.iter().cloned().enumerate().collect();
    }

    match mode {
        TrimMode::Simultaneously => paths
            .iter()
            .enumerate()
            .flat_map(|(index, path)| {
                path.trim(start, end, offset)
                    .into_iter()
                    .map(move |piece| (index, piece))
            })
            .collect(),
        TrimMode::Individually => {
            let total: f32 = paths.iter().map(BezierPath::length).sum();
            let windows: Vec<(f32, f32)> = if s > e {
                vec![(0.0, e * total), (s * total, total)]
            } else {
                vec![(s * total, e * total)]
            };

            let mut result = Vec::new();
            for (cut_start, cut_end) in windows {
                let mut path_start = 0.0;
                for (index, path) in paths.iter().enumerate() {
                    let path_end = path_start + path.length();
                    if path_end <= cut_start || path_start >= cut_end {
                        // Excluded, unless it is a zero-length contour sitting
                        // inside the window.
                        if path_start == path_end && cut_start <= path_start && path_start < cut_end {
                            result.push((index, path.clone()));
                        }
                    } else if cut_start <= path_start && path_end <= cut_end {
                        result.push((index, path.clone()));
                    } else {
                        // Head, tail, or both ends fall inside this contour.
                        for piece in path.trim_lengths(cut_start - path_start, cut_end - path_start) {
                            result.push((index, piece));
                        }
                    }
                    path_start = path_end;
                }
            }
            result
        }
    }
}
