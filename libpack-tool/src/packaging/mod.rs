use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use libpack_lib::Layout;
use tokio::runtime::Builder;
use tracing::info;

use crate::config::{PackageSettings, validate_library_file_name};
use crate::error::{PackError, Result};
use crate::fs_utils::{collect_directory_entries, compile_patterns, join_archive_path};
use crate::naming::archive_file_name;

pub mod zip;

/// Represents a file to include in the ZIP archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name_in_archive: String,
}

/// Compression algorithm to use when creating the ZIP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compressor {
    Deflate,
    Stored,
}

/// A build configuration of the packaged library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildVariant {
    Debug,
    Release,
}

impl BuildVariant {
    pub const ALL: [BuildVariant; 2] = [BuildVariant::Debug, BuildVariant::Release];

    /// Marker segment used both inside the archive and in split archive names.
    pub fn marker(self) -> &'static str {
        match self {
            BuildVariant::Debug => "debug",
            BuildVariant::Release => "release",
        }
    }

    /// Archive entry for this variant's library: `<marker>/lib/<library_file_name>`.
    pub fn library_entry(self, settings: &PackageSettings) -> FileEntry {
        let source = match self {
            BuildVariant::Debug => &settings.debug_library_path,
            BuildVariant::Release => &settings.release_library_path,
        };
        FileEntry {
            path: source.clone(),
            name_in_archive: join_archive_path(
                &format!("{}/lib", self.marker()),
                &settings.library_file_name,
            ),
        }
    }
}

/// One archive to be written and everything that goes into it, in order.
#[derive(Debug, Clone)]
pub struct ArchivePlan {
    pub path: PathBuf,
    pub entries: Vec<FileEntry>,
}

/// Outcome of writing one archive.
#[derive(Debug, Clone)]
pub struct PackageReport {
    pub path: PathBuf,
    pub entries: usize,
    pub bytes: u64,
}

/// Works out which archives to write and their entries, without touching the output directory.
pub fn plan_archives(settings: &PackageSettings) -> Result<Vec<ArchivePlan>> {
    validate_library_file_name(&settings.library_file_name)?;
    let patterns = compile_patterns(&settings.exclude)?;
    let headers = collect_directory_entries(
        &settings.include_directory,
        &settings.include_prefix,
        &patterns,
    )?;

    let archive_path = |variant: Option<BuildVariant>| {
        settings.output_directory.join(archive_file_name(
            &settings.archive_name,
            &settings.library_file_name,
            variant.map(BuildVariant::marker),
        ))
    };

    let plans = match settings.layout {
        Layout::Combined => {
            let mut entries = headers;
            entries.extend(BuildVariant::ALL.iter().map(|v| v.library_entry(settings)));
            vec![ArchivePlan {
                path: archive_path(None),
                entries,
            }]
        }
        Layout::Split => BuildVariant::ALL
            .iter()
            .map(|&variant| {
                let mut entries = headers.clone();
                entries.push(variant.library_entry(settings));
                ArchivePlan {
                    path: archive_path(Some(variant)),
                    entries,
                }
            })
            .collect(),
    };

    let mut seen = HashSet::new();
    for plan in &plans {
        if !seen.insert(plan.path.clone()) {
            return Err(PackError::DuplicateArchiveName(plan.path.clone()));
        }
    }

    Ok(plans)
}

/// Packages headers and both library variants into the configured archive(s).
///
/// This is the main entrypoint for synchronous applications; it manages its own runtime.
pub fn package(settings: &PackageSettings) -> Result<Vec<PackageReport>> {
    fs::create_dir_all(&settings.output_directory)
        .map_err(|e| PackError::io(&settings.output_directory, e))?;

    let plans = plan_archives(settings)?;

    let rt = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(PackError::Runtime)?;

    let compressor = settings.compressor;
    let reports = rt.block_on(async {
        let mut reports = Vec::with_capacity(plans.len());
        for plan in &plans {
            reports.push(zip::write_archive(plan, compressor).await?);
        }
        Ok::<_, PackError>(reports)
    })?;

    info!(archives = reports.len(), "packaging complete");
    Ok(reports)
}
