//! Bundles a header tree and debug/release builds of a static library into ZIP archives.

pub mod config;
pub mod error;
pub mod fs_utils;
pub mod naming;
pub mod packaging;

pub use config::PackageSettings;
pub use error::{PackError, Result};
pub use libpack_lib::{Config, Layout};
pub use packaging::{
    ArchivePlan, BuildVariant, Compressor, FileEntry, PackageReport, package, plan_archives,
};
