//! In-memory archive fixtures

use std::io::{Cursor, Write};

use flate2::write::GzEncoder;
use flate2::Compression;

/// Gzip-compressed tarball holding one file
pub fn tar_gz_bytes(name: &str, content: &[u8]) -> Vec<u8> {
    tar_gz_with(&[(name, content)])
}

/// Gzip-compressed tarball holding several files
pub fn tar_gz_with(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, content) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, *content).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Zip archive holding one file
pub fn zip_bytes(name: &str, content: &[u8]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file(name, zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(content).unwrap();
    writer.finish().unwrap().into_inner()
}
