//! Flat-directory file storage for uploads and artifacts.
//!
//! Every artifact and member lives directly under one root directory. Writes
//! go through a temporary file in the same directory and are moved into place
//! without replacing existing files, so a reader never observes a partial
//! file under a visible name. Artifact records live under a hidden
//! subdirectory that the name validator refuses to expose.

use crate::constants::RECORD_DIR_NAME;
use crate::error::AppError;
use crate::models::artifact::{ArtifactRecord, StoredFile};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Upper bound on `stem-N.ext` attempts when an upload name is taken.
const MAX_NAME_ATTEMPTS: usize = 10_000;
/// Longest filename accepted by [`Storage::validate_name`].
const MAX_NAME_LEN: usize = 255;

/// Handle to the storage directory.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
    records: PathBuf,
}

impl Storage {
    /// Open (and create if needed) the storage directory.
    ///
    /// # Errors
    /// Returns an error if the directory or its record subdirectory cannot be
    /// created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        let records = root.join(RECORD_DIR_NAME);
        fs::create_dir_all(&records)?;
        Ok(Self { root, records })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check that `name` is a single, visible path component.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] for names that could escape the root or
    /// address hidden entries; callers treat them as missing.
    pub fn validate_name(name: &str) -> Result<(), AppError> {
        let invalid = name.is_empty()
            || name.len() > MAX_NAME_LEN
            || name.starts_with('.')
            || name.contains(['/', '\\'])
            || name.chars().any(char::is_control);
        if invalid {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// Absolute path of a stored name. Does not check existence.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] if the name is invalid.
    pub fn path_of(&self, name: &str) -> Result<PathBuf, AppError> {
        Self::validate_name(name)?;
        Ok(self.root.join(name))
    }

    /// Metadata of a stored regular file, `None` when it does not exist.
    ///
    /// # Errors
    /// Returns an error only for I/O failures other than absence.
    pub fn stat(&self, name: &str) -> Result<Option<StoredFile>, AppError> {
        let path = match self.path_of(name) {
            Ok(path) => path,
            Err(AppError::NotFound) => return Ok(None),
            Err(err) => return Err(err),
        };
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => Ok(Some(StoredFile {
                name: name.to_string(),
                len: meta.len(),
            })),
            Ok(_) => Ok(None),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Read a stored file into memory.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when the file is absent.
    pub fn read(&self, name: &str) -> Result<Vec<u8>, AppError> {
        let path = self.path_of(name)?;
        fs::read(path).map_err(not_found_or_io)
    }

    /// Open a stored file for streaming along with its metadata.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when the file is absent.
    pub fn open_file(&self, name: &str) -> Result<(File, StoredFile), AppError> {
        let path = self.path_of(name)?;
        let file = File::open(path).map_err(not_found_or_io)?;
        let meta = file.metadata()?;
        if !meta.is_file() {
            return Err(AppError::NotFound);
        }
        Ok((
            file,
            StoredFile {
                name: name.to_string(),
                len: meta.len(),
            },
        ))
    }

    /// Save uploaded bytes under `name`, or `stem-N.ext` if `name` is taken.
    ///
    /// # Returns
    /// The stored file, carrying the name actually used.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] for unusable names and an I/O error if
    /// the write fails. No visible file is left behind on failure.
    pub fn save(&self, name: &str, content: &[u8]) -> Result<StoredFile, AppError> {
        Self::validate_name(name)
            .map_err(|_| AppError::BadRequest(format!("invalid file name '{}'", name)))?;

        let mut temp = NamedTempFile::new_in(&self.root)?;
        temp.write_all(content)?;
        temp.as_file().sync_all()?;

        for candidate in candidate_names(name).take(MAX_NAME_ATTEMPTS) {
            match temp.persist_noclobber(self.root.join(&candidate)) {
                Ok(file) => {
                    let len = file.metadata()?.len();
                    return Ok(StoredFile {
                        name: candidate,
                        len,
                    });
                }
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => temp = err.file,
                Err(err) => return Err(err.into()),
            }
        }
        Err(AppError::StorageMessage(format!(
            "no free name left for '{}'",
            name
        )))
    }

    /// Create a new file under exactly `name` with content produced by `write`.
    ///
    /// The writer receives a scratch file in the storage directory; the file
    /// only becomes visible under `name` after `write` returns successfully.
    ///
    /// # Errors
    /// Propagates the writer's error, and fails with an I/O error of kind
    /// `AlreadyExists` if `name` is taken.
    pub fn create<F>(&self, name: &str, write: F) -> Result<StoredFile, AppError>
    where
        F: FnOnce(&mut File) -> Result<(), AppError>,
    {
        let target = self.path_of(name)?;
        let mut temp = NamedTempFile::new_in(&self.root)?;
        write(temp.as_file_mut())?;
        temp.as_file_mut().flush()?;
        temp.as_file().sync_all()?;
        let file = temp.persist_noclobber(target)?;
        let len = file.metadata()?.len();
        Ok(StoredFile {
            name: name.to_string(),
            len,
        })
    }

    /// Remove a stored file; absent files are not an error.
    ///
    /// # Errors
    /// Returns an I/O error if removal fails for another reason.
    pub fn remove(&self, name: &str) -> Result<(), AppError> {
        let path = self.path_of(name)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Persist the record describing an artifact, replacing any earlier one.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn write_record(&self, record: &ArtifactRecord) -> Result<(), AppError> {
        let path = self.record_path(record.artifact.id())?;
        let mut temp = NamedTempFile::new_in(&self.records)?;
        serde_json::to_writer_pretty(temp.as_file_mut(), record)?;
        temp.as_file().sync_all()?;
        temp.persist(path)?;
        Ok(())
    }

    /// Load the record for an artifact, `None` if the name has none.
    ///
    /// # Errors
    /// Returns an error if the record exists but cannot be read or parsed.
    pub fn read_record(&self, name: &str) -> Result<Option<ArtifactRecord>, AppError> {
        let path = match self.record_path(name) {
            Ok(path) => path,
            Err(AppError::NotFound) => return Ok(None),
            Err(err) => return Err(err),
        };
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn record_path(&self, name: &str) -> Result<PathBuf, AppError> {
        Self::validate_name(name)?;
        Ok(self.records.join(format!("{}.json", name)))
    }
}

fn not_found_or_io(err: io::Error) -> AppError {
    if err.kind() == io::ErrorKind::NotFound {
        AppError::NotFound
    } else {
        AppError::Io(err)
    }
}

/// `name`, then `stem-1.ext`, `stem-2.ext`, ...
fn candidate_names(name: &str) -> impl Iterator<Item = String> + '_ {
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    std::iter::once(name.to_string()).chain((1..).map(move |n| match ext {
        Some(ext) => format!("{}-{}.{}", stem, n, ext),
        None => format!("{}-{}", stem, n),
    }))
}
