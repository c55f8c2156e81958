//! Working directory packaging
//!
//! Zips a directory tree for local-mode runs. Entries keep their paths
//! relative to the source, directories get a trailing `/`, and files are
//! deflated with their unix permissions kept so scripts stay executable.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use paws_core::compile::Packager;

/// [`Packager`] writing zip archives to disk
pub struct ZipPackager;

impl Packager for ZipPackager {
    fn package(&self, source: &Path, target: &Path, nest_under_base: bool) -> io::Result<()> {
        zip_directory(source, target, nest_under_base)
    }
}

/// Zip `source` into `target`
///
/// With `nest_under_base`, entries are placed under a directory named after
/// the last component of `source` (`repo/`, `repo/src/main.rs`, ...).
/// The archive itself is skipped if it lies inside `source`. A partially
/// written archive is removed on failure.
pub fn zip_directory(source: &Path, target: &Path, nest_under_base: bool) -> io::Result<()> {
    let source = source.canonicalize()?;
    let base = if nest_under_base {
        source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    } else {
        None
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(target)?;

    let result = write_archive(&source, target, base.as_deref(), file);
    if result.is_err() {
        let _ = fs::remove_file(target);
    }
    result
}

fn write_archive(source: &Path, target: &Path, base: Option<&str>, file: File) -> io::Result<()> {
    let target = target.canonicalize()?;
    let mut zip = ZipWriter::new(BufWriter::new(file));

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if path == target {
            continue;
        }

        let relative = path
            .strip_prefix(source)
            .map_err(io::Error::other)?
            .to_string_lossy()
            .replace('\\', "/");
        let name = match (base, relative.is_empty()) {
            (Some(base), true) => base.to_string(),
            (Some(base), false) => format!("{}/{}", base, relative),
            (None, true) => continue,
            (None, false) => relative,
        };

        let entry_options = with_permissions(options.clone(), &entry.metadata()?);
        if entry.file_type().is_dir() {
            debug!("Adding directory {}/", name);
            zip.add_directory(format!("{}/", name), entry_options)
                .map_err(io::Error::other)?;
        } else {
            debug!("Adding file {}", name);
            zip.start_file(name, entry_options)
                .map_err(io::Error::other)?;
            let mut input = File::open(path)?;
            io::copy(&mut input, &mut zip)?;
        }
    }

    let mut writer = zip.finish().map_err(io::Error::other)?;
    writer.flush()
}

#[cfg(unix)]
fn with_permissions(options: SimpleFileOptions, metadata: &fs::Metadata) -> SimpleFileOptions {
    use std::os::unix::fs::PermissionsExt;
    options.unix_permissions(metadata.permissions().mode())
}

#[cfg(not(unix))]
fn with_permissions(options: SimpleFileOptions, _metadata: &fs::Metadata) -> SimpleFileOptions {
    options
}
