//! File spooling LOB store.
//!
//! Content at or below the inline threshold stays in memory. Larger content is
//! written to `<dir>/<uuid>.lob`; the file lives as long as the last value
//! that references it and is removed when that value is dropped.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{read_chunk, LobStore, UnitCounter, READ_CHUNK};
use crate::error::{ValueError, ValueResult};
use crate::ids::UuidFactory;
use crate::value::{Lob, LobKind, LobLength, LobSource, Value};

#[derive(Debug, Clone)]
pub struct FileLobStore {
    dir: PathBuf,
    inline_threshold: usize,
}

impl FileLobStore {
    /// Create a store spooling into `dir`, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>, inline_threshold: usize) -> ValueResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| ValueError::lob_io("lob_store", e))?;
        Ok(FileLobStore {
            dir,
            inline_threshold,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn inline_threshold(&self) -> usize {
        self.inline_threshold
    }
}

impl LobStore for FileLobStore {
    fn create_lob(&self, kind: LobKind, stream: &mut dyn Read, declared_length: i64) -> ValueResult<Value> {
        let mut counter = UnitCounter::new(kind, LobLength::from_declared(declared_length));
        let mut buffer = Vec::new();
        let mut spool: Option<Spool> = None;
        let mut chunk = vec![0u8; READ_CHUNK];

        loop {
            let n = read_chunk(stream, &mut chunk)?;
            if n == 0 {
                counter.finish()?;
                break;
            }
            let accepted = counter.accept(&chunk[..n])?;
            match spool.as_mut() {
                Some(file) => file.write(&accepted)?,
                None => {
                    buffer.extend_from_slice(&accepted);
                    if buffer.len() > self.inline_threshold {
                        let mut file = Spool::create(&self.dir)?;
                        file.write(&buffer)?;
                        buffer = Vec::new();
                        spool = Some(file);
                    }
                }
            }
            if counter.is_full() {
                break;
            }
        }

        let lob = match spool {
            None => Lob::inline(kind, buffer)?,
            Some(file) => {
                let path = file.commit()?;
                tracing::debug!(path = %path.display(), units = counter.units(), "lob_spooled");
                Lob::external(
                    kind,
                    Arc::new(FileLobSource { path }),
                    LobLength::Known(counter.units()),
                )
            }
        };
        Ok(Value::Lob(lob))
    }
}

/// A spool file that is removed unless committed
struct Spool {
    path: PathBuf,
    writer: BufWriter<File>,
    committed: bool,
}

impl Spool {
    fn create(dir: &Path) -> ValueResult<Self> {
        let path = dir.join(format!("{}.lob", UuidFactory::new_random()));
        let file = File::create(&path).map_err(|e| ValueError::lob_io("create_lob", e))?;
        Ok(Spool {
            path,
            writer: BufWriter::new(file),
            committed: false,
        })
    }

    fn write(&mut self, bytes: &[u8]) -> ValueResult<()> {
        self.writer
            .write_all(bytes)
            .map_err(|e| ValueError::lob_io("create_lob", e))
    }

    fn commit(mut self) -> ValueResult<PathBuf> {
        self.writer
            .flush()
            .map_err(|e| ValueError::lob_io("create_lob", e))?;
        self.committed = true;
        Ok(self.path.clone())
    }
}

impl Drop for Spool {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.path);
            tracing::debug!(path = %self.path.display(), "lob_spool_discarded");
        }
    }
}

/// Spooled LOB content; the file is deleted when the source is dropped
#[derive(Debug)]
pub struct FileLobSource {
    path: PathBuf,
}

impl FileLobSource {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LobSource for FileLobSource {
    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(BufReader::new(File::open(&self.path)?)))
    }
}

impl Drop for FileLobSource {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "lob_file_removed"),
            Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "lob_file_remove_failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::LobData;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn spool_files(dir: &Path) -> usize {
        fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_small_content_stays_inline() {
        let temp = TempDir::new().unwrap();
        let store = FileLobStore::new(temp.path(), 16).unwrap();
        let value = store
            .create_lob(LobKind::Clob, &mut Cursor::new(b"short".to_vec()), -1)
            .unwrap();
        assert!(value.as_lob().unwrap().is_inline());
        assert_eq!(spool_files(temp.path()), 0);
    }

    #[test]
    fn test_large_content_spools_and_is_removed() {
        let temp = TempDir::new().unwrap();
        let store = FileLobStore::new(temp.path().join("lobs"), 16).unwrap();
        let value = store
            .create_lob(LobKind::Blob, &mut Cursor::new(vec![3u8; 20_000]), -1)
            .unwrap();
        let lob = value.as_lob().unwrap().clone();
        assert!(matches!(lob.data(), LobData::External { length: LobLength::Known(20_000), .. }));
        assert_eq!(spool_files(store.dir()), 1);
        assert_eq!(lob.read_bytes("test").unwrap(), vec![3u8; 20_000]);

        drop(value);
        assert_eq!(spool_files(store.dir()), 1);
        drop(lob);
        assert_eq!(spool_files(store.dir()), 0);
    }

    #[test]
    fn test_declared_length_limits_spooled_content() {
        let temp = TempDir::new().unwrap();
        let store = FileLobStore::new(temp.path(), 4).unwrap();
        let value = store
            .create_lob(LobKind::Blob, &mut Cursor::new(vec![1u8; 100]), 50)
            .unwrap();
        assert_eq!(value.as_lob().unwrap().resolve_length("test").unwrap(), 50);
    }

    #[test]
    fn test_failed_spool_leaves_no_file() {
        let temp = TempDir::new().unwrap();
        let store = FileLobStore::new(temp.path(), 4).unwrap();
        let mut bytes = vec![b'a'; 10_000];
        bytes.push(0xff);
        let result = store.create_lob(LobKind::Clob, &mut Cursor::new(bytes), -1);
        assert!(result.is_err());
        assert_eq!(spool_files(temp.path()), 0);
    }
}
