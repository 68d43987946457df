//! Archive unpacking for downloaded release assets
//!
//! Downloads land in extension-less temp files, so the container is
//! detected from its leading magic bytes rather than its name.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;
use upswap_core::ArchiveKind;
use zip::ZipArchive;

use crate::error::{InstallStage, Result, UpdateError};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const ZIP_MAGIC: [u8; 4] = [b'P', b'K', 0x03, 0x04];

/// Identify the container of an open archive, leaving the cursor at the start
pub fn detect_kind(file: &mut File) -> Result<ArchiveKind> {
    let mut magic = [0u8; 4];
    let mut read = 0;
    while read < magic.len() {
        match file.read(&mut magic[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) => return Err(UpdateError::fs(InstallStage::Unpack, e)),
        }
    }
    file.seek(SeekFrom::Start(0))
        .map_err(|e| UpdateError::fs(InstallStage::Unpack, e))?;

    if read >= ZIP_MAGIC.len() && magic == ZIP_MAGIC {
        Ok(ArchiveKind::Zip)
    } else if read >= GZIP_MAGIC.len() && magic[..2] == GZIP_MAGIC {
        Ok(ArchiveKind::TarGz)
    } else {
        Err(UpdateError::archive(
            InstallStage::Unpack,
            "unsupported archive format",
        ))
    }
}

/// Extract every entry of `file` into `dest`
pub fn unpack(file: &mut File, dest: &Path) -> Result<()> {
    let kind = detect_kind(file)?;
    debug!("unpacking {} archive into {}", kind, dest.display());

    match kind {
        ArchiveKind::TarGz => unpack_tar_gz(file, dest),
        ArchiveKind::Zip => unpack_zip(file, dest),
    }
}

fn unpack_tar_gz(file: &mut File, dest: &Path) -> Result<()> {
    let mut archive = Archive::new(GzDecoder::new(file));
    archive.set_preserve_permissions(true);
    archive
        .unpack(dest)
        .map_err(|e| UpdateError::archive(InstallStage::Unpack, e))
}

fn unpack_zip(file: &mut File, dest: &Path) -> Result<()> {
    let mut archive =
        ZipArchive::new(file).map_err(|e| UpdateError::archive(InstallStage::Unpack, e))?;
    archive
        .extract(dest)
        .map_err(|e| UpdateError::archive(InstallStage::Unpack, e))
}
