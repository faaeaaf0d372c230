use std::path::{Path, PathBuf};

use async_zip::tokio::write::ZipFileWriter;
use async_zip::{Compression, ZipEntryBuilder};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::{PackError, Result};
use crate::packaging::{ArchivePlan, Compressor, FileEntry, PackageReport};

impl From<Compressor> for Compression {
    fn from(compressor: Compressor) -> Self {
        match compressor {
            Compressor::Deflate => Compression::Deflate,
            Compressor::Stored => Compression::Stored,
        }
    }
}

/// Sibling path the archive is assembled at before it is moved into place.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

/// Writes one archive.
///
/// Entries are written to `<archive>.partial`, the writer is closed, and only then is
/// the file renamed over the final path. On any failure the partial file is removed
/// and whatever was at the final path before is left alone.
pub async fn write_archive(plan: &ArchivePlan, compressor: Compressor) -> Result<PackageReport> {
    if let Some(parent) = plan.path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PackError::io(parent, e))?;
    }

    let partial = partial_path(&plan.path);
    match write_entries(&partial, &plan.entries, compressor).await {
        Ok(bytes) => {
            tokio::fs::rename(&partial, &plan.path)
                .await
                .map_err(|e| PackError::io(&plan.path, e))?;
            info!(
                archive = %plan.path.display(),
                entries = plan.entries.len(),
                bytes,
                "archive written"
            );
            Ok(PackageReport {
                path: plan.path.clone(),
                entries: plan.entries.len(),
                bytes,
            })
        }
        Err(e) => {
            warn!(archive = %partial.display(), error = %e, "removing partial archive");
            if let Err(rm) = tokio::fs::remove_file(&partial).await {
                debug!(error = %rm, "partial archive not removed");
            }
            Err(e)
        }
    }
}

async fn write_entries(path: &Path, entries: &[FileEntry], compressor: Compressor) -> Result<u64> {
    let zip_err = |source: async_zip::error::ZipError| PackError::Zip {
        path: path.to_path_buf(),
        source,
    };

    let file = tokio::fs::File::create(path)
        .await
        .map_err(|e| PackError::io(path, e))?;
    let mut writer = ZipFileWriter::with_tokio(file);

    let mut total = 0u64;
    for fe in entries {
        let data = tokio::fs::read(&fe.path)
            .await
            .map_err(|e| PackError::io(&fe.path, e))?;
        let builder = ZipEntryBuilder::new(fe.name_in_archive.clone().into(), compressor.into());
        writer
            .write_entry_whole(builder, &data)
            .await
            .map_err(zip_err)?;
        debug!(source = %fe.path.display(), entry = %fe.name_in_archive, "added");
        total += data.len() as u64;
    }

    let mut file = writer.close().await.map_err(zip_err)?.into_inner();
    file.flush().await.map_err(|e| PackError::io(path, e))?;
    file.sync_all().await.map_err(|e| PackError::io(path, e))?;

    Ok(total)
}
