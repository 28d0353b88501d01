//! Blade image grouping
//!
//! Scans the RGB and thermal image directories and partitions files into
//! per-blade groups keyed by the blade identifier prefix extracted from
//! each filename (e.g. `Turbine-2_A` from `Turbine-2_A_PS_sequence_13.jpg`).
//!
//! Filtering is an explicit predicate ([`classify_filename`]) so the
//! accept/reject decision can be tested independently of directory walking.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Image extensions considered for grouping (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "png"];

/// Anchored blade identifier pattern: `Turbine-<digits>_<uppercase letter>`.
///
/// Note: blade labels longer than one uppercase letter (or numeric labels)
/// do not match and their files are dropped. This mirrors the KI-VISIR
/// dataset naming convention.
fn blade_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(Turbine-\d+_[A-Z])").expect("blade identifier pattern is valid")
    })
}

/// Image modality of a discovered file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Rgb,
    Thermal,
}

impl Modality {
    /// Human-readable label used in prompts and logs.
    pub fn label(self) -> &'static str {
        match self {
            Modality::Rgb => "RGB",
            Modality::Thermal => "thermal",
        }
    }
}

/// A discovered inspection image. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Full path to the image on disk
    pub path: PathBuf,
    /// RGB or thermal
    pub modality: Modality,
    /// Owning blade identifier, e.g. `Turbine-2_A`
    pub blade_id: String,
}

/// All images discovered for one turbine blade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BladeGroup {
    /// Blade identifier, e.g. `Turbine-2_A`
    pub blade_id: String,
    /// RGB images in per-directory sorted order
    pub rgb: Vec<ImageFile>,
    /// Thermal images in per-directory sorted order
    pub thermal: Vec<ImageFile>,
}

impl BladeGroup {
    fn new(blade_id: String) -> Self {
        Self {
            blade_id,
            rgb: Vec::new(),
            thermal: Vec::new(),
        }
    }

    /// True when the group holds no images in either modality.
    pub fn is_empty(&self) -> bool {
        self.rgb.is_empty() && self.thermal.is_empty()
    }

    /// Total number of images across both modalities.
    pub fn image_count(&self) -> usize {
        self.rgb.len() + self.thermal.len()
    }
}

/// Outcome of the filename predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileMatch {
    /// Filename carries a supported extension and a blade identifier prefix
    Matched { blade_id: String },
    /// Wrong extension or no identifier prefix — excluded from every group
    Rejected,
}

/// Classify a bare filename: supported image extension plus an anchored
/// blade identifier prefix. Anything else is rejected (silently skipped
/// by the grouper).
pub fn classify_filename(name: &str) -> FileMatch {
    let has_image_extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let lower = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false);

    if !has_image_extension {
        return FileMatch::Rejected;
    }

    match blade_pattern().captures(name) {
        Some(caps) => FileMatch::Matched {
            blade_id: caps[1].to_string(),
        },
        None => FileMatch::Rejected,
    }
}

/// Scan both image directories and group files by blade identifier.
///
/// Groups appear in first-seen order (RGB directory scanned first, then
/// thermal); files within a modality keep their directory's lexicographic
/// order. A missing directory contributes zero files — asymmetric inputs
/// (RGB present, thermal absent) are valid and yield RGB-only groups.
pub fn group_by_blade(rgb_dir: &Path, thermal_dir: &Path) -> Vec<BladeGroup> {
    let mut groups: Vec<BladeGroup> = Vec::new();

    scan_directory(rgb_dir, Modality::Rgb, &mut groups);
    scan_directory(thermal_dir, Modality::Thermal, &mut groups);

    groups
}

/// Scan one directory and append matching files to their blade's group,
/// creating new groups in first-seen order.
fn scan_directory(dir: &Path, modality: Modality, groups: &mut Vec<BladeGroup>) {
    if !dir.is_dir() {
        debug!(
            dir = %dir.display(),
            modality = modality.label(),
            "Image directory missing — contributing zero files"
        );
        return;
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                dir = %dir.display(),
                error = %e,
                "Failed to read image directory — contributing zero files"
            );
            return;
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    let mut matched = 0usize;
    let mut rejected = 0usize;

    for name in names {
        match classify_filename(&name) {
            FileMatch::Matched { blade_id } => {
                let index = groups
                    .iter()
                    .position(|g| g.blade_id == blade_id)
                    .unwrap_or_else(|| {
                        groups.push(BladeGroup::new(blade_id.clone()));
                        groups.len() - 1
                    });

                let file = ImageFile {
                    path: dir.join(&name),
                    modality,
                    blade_id,
                };
                match modality {
                    Modality::Rgb => groups[index].rgb.push(file),
                    Modality::Thermal => groups[index].thermal.push(file),
                }
                matched += 1;
            }
            FileMatch::Rejected => {
                rejected += 1;
            }
        }
    }

    debug!(
        dir = %dir.display(),
        modality = modality.label(),
        matched = matched,
        rejected = rejected,
        "Directory scan complete"
    );
}
