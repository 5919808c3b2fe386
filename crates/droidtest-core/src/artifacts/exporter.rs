//! Zip export of report artifacts into the deploy directory

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::Artifact;

/// Timestamp inserted into colliding export names, e.g. `20240131235959`
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// An artifact written to the deploy directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedArtifact {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// An artifact that could not be exported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFailure {
    pub source: PathBuf,
    pub reason: String,
}

/// Outcome of a best-effort export pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub exported: Vec<ExportedArtifact>,
    pub failed: Vec<ExportFailure>,
}

impl ExportSummary {
    pub fn is_empty(&self) -> bool {
        self.exported.is_empty() && self.failed.is_empty()
    }

    fn fail(&mut self, source: &Path, reason: impl ToString) {
        let reason = reason.to_string();
        warn!(path = %source.display(), error = %reason, "failed to export artifact");
        self.failed.push(ExportFailure {
            source: source.to_path_buf(),
            reason,
        });
    }
}

/// Zips artifacts into a deploy directory
#[derive(Debug, Clone)]
pub struct ArtifactExporter {
    deploy_dir: PathBuf,
}

impl ArtifactExporter {
    pub fn new(deploy_dir: impl Into<PathBuf>) -> Self {
        Self {
            deploy_dir: deploy_dir.into(),
        }
    }

    /// Export each artifact as `<name>.zip`, continuing past failures
    pub fn export_zips(&self, artifacts: &[Artifact]) -> ExportSummary {
        let mut summary = ExportSummary::default();

        if let Err(e) = std::fs::create_dir_all(&self.deploy_dir) {
            for artifact in artifacts {
                summary.fail(&artifact.path, &e);
            }
            return summary;
        }

        for artifact in artifacts {
            let name = unique_name(&self.deploy_dir, &format!("{}.zip", artifact.name), Local::now());
            let destination = self.deploy_dir.join(&name);

            info!(
                source = %artifact.path.display(),
                destination = %destination.display(),
                "exporting artifact"
            );

            match zip_path(&artifact.path, &destination) {
                Ok(()) => summary.exported.push(ExportedArtifact {
                    source: artifact.path.clone(),
                    destination,
                }),
                Err(e) => {
                    // Drop the partial archive so a retry does not collide with it
                    let _ = std::fs::remove_file(&destination);
                    summary.fail(&artifact.path, e);
                }
            }
        }

        summary
    }
}

/// Pick a file name that does not exist in `dir` yet
///
/// A taken `report.zip` becomes `report-<timestamp>.zip`. Two collisions
/// within the same second still clash.
pub fn unique_name(dir: &Path, name: &str, now: DateTime<Local>) -> String {
    if !dir.join(name).exists() {
        return name.to_string();
    }

    let timestamp = now.format(TIMESTAMP_FORMAT);
    let path = Path::new(name);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => format!(
            "{}-{}.{}",
            stem.to_string_lossy(),
            timestamp,
            ext.to_string_lossy()
        ),
        _ => format!("{}-{}", name, timestamp),
    }
}

/// Zip a file or a directory tree; the source's own name is the archive root
pub fn zip_path(source: &Path, destination: &Path) -> zip::result::ZipResult<()> {
    let base = source.parent().unwrap_or_else(|| Path::new(""));
    let mut zip = ZipWriter::new(File::create(destination)?);
    let options = SimpleFileOptions::default();

    if source.is_dir() {
        for entry in WalkDir::new(source).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            let name = archive_name(entry.path().strip_prefix(base).unwrap_or(entry.path()));

            if entry.file_type().is_dir() {
                zip.add_directory(name, options)?;
            } else if entry.file_type().is_file() {
                zip.start_file(name, options)?;
                io::copy(&mut File::open(entry.path())?, &mut zip)?;
            }
        }
    } else {
        let name = archive_name(source.strip_prefix(base).unwrap_or(source));
        zip.start_file(name, options)?;
        io::copy(&mut File::open(source)?, &mut zip)?;
    }

    zip.finish()?;
    Ok(())
}

/// Archive entry names always use `/`
fn archive_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}
