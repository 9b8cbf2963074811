//! Zip and manifest writers for multi-file artifacts.

use crate::error::AppError;
use crate::models::artifact::StoredFile;
use crate::storage::Storage;
use std::fs::File;
use std::io::{self, Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Copy every member into a deflated zip at the archive's top level.
///
/// Entry names are the stored filenames, so duplicates cannot occur within
/// one batch.
///
/// # Errors
/// Returns an error if a member cannot be read or the archive write fails.
pub(super) fn write_zip<W>(writer: W, storage: &Storage, members: &[StoredFile]) -> Result<W, AppError>
where
    W: Write + Seek,
{
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .large_file(members.iter().any(|member| member.len >= u64::from(u32::MAX)));

    for member in members {
        zip.start_file(member.name.as_str(), options)?;
        let mut source = File::open(storage.path_of(&member.name)?)?;
        io::copy(&mut source, &mut zip)?;
    }

    Ok(zip.finish()?)
}

/// Gallery manifest body: one member name per line, in order.
pub(super) fn manifest_body(members: &[StoredFile]) -> String {
    let mut body = String::new();
    for member in members {
        body.push_str(&member.name);
        body.push('\n');
    }
    body
}
