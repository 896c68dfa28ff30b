//! LOB storage.
//!
//! A [`LobStore`] turns a caller supplied stream into a LOB value. The store
//! decides where the content lives:
//!
//! - [`MemoryLobStore`] keeps everything inline
//! - [`FileLobStore`] keeps small content inline and spools the rest into a
//!   directory, one file per LOB
//!
//! Either way the stream is drained once, CLOB content is checked to be UTF-8
//! and a non-negative declared length caps how many bytes (BLOB) or
//! characters (CLOB) are taken.

pub mod file;

pub use file::{FileLobSource, FileLobStore};

use std::io::{self, Read};

use crate::error::{ValueError, ValueResult};
use crate::value::{Lob, LobKind, LobLength, Value, ValueKind};

/// Storage collaborator that creates LOB values from streams
pub trait LobStore: Send + Sync {
    /// Drains `stream` into a new BLOB or CLOB value. A negative
    /// `declared_length` means the length is found by reading to the end.
    fn create_lob(&self, kind: LobKind, stream: &mut dyn Read, declared_length: i64) -> ValueResult<Value>;
}

/// Store that keeps every LOB inline
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryLobStore;

impl LobStore for MemoryLobStore {
    fn create_lob(&self, kind: LobKind, stream: &mut dyn Read, declared_length: i64) -> ValueResult<Value> {
        let mut counter = UnitCounter::new(kind, LobLength::from_declared(declared_length));
        let mut bytes = Vec::new();
        let mut chunk = vec![0u8; READ_CHUNK];
        loop {
            let n = read_chunk(stream, &mut chunk)?;
            if n == 0 {
                counter.finish()?;
                break;
            }
            bytes.extend_from_slice(&counter.accept(&chunk[..n])?);
            if counter.is_full() {
                break;
            }
        }
        Ok(Value::Lob(Lob::inline(kind, bytes)?))
    }
}

pub(crate) const READ_CHUNK: usize = 8192;

/// One read from `stream`, retried while it is interrupted
pub(crate) fn read_chunk(stream: &mut dyn Read, buf: &mut [u8]) -> ValueResult<usize> {
    loop {
        match stream.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(ValueError::lob_io("create_lob", e)),
        }
    }
}

/// Counts bytes or characters of a stream as it is read
///
/// For CLOBs the counter validates UTF-8 across chunk boundaries: the tail of
/// a chunk that ends inside a multi-byte sequence is held back until the next
/// chunk completes it.
#[derive(Debug)]
pub(crate) struct UnitCounter {
    kind: LobKind,
    limit: Option<u64>,
    units: u64,
    pending: Vec<u8>,
}

impl UnitCounter {
    pub(crate) fn new(kind: LobKind, limit: LobLength) -> Self {
        UnitCounter {
            kind,
            limit: limit.known(),
            units: 0,
            pending: Vec::new(),
        }
    }

    pub(crate) fn units(&self) -> u64 {
        self.units
    }

    pub(crate) fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.units >= limit)
    }

    /// Returns the part of `chunk` that belongs to the LOB
    pub(crate) fn accept(&mut self, chunk: &[u8]) -> ValueResult<Vec<u8>> {
        let room = self.limit.map_or(u64::MAX, |limit| limit.saturating_sub(self.units));
        match self.kind {
            LobKind::Blob => {
                let take = usize::try_from(room).map_or(chunk.len(), |r| r.min(chunk.len()));
                self.units += take as u64;
                Ok(chunk[..take].to_vec())
            }
            LobKind::Clob => {
                let mut data = std::mem::take(&mut self.pending);
                data.extend_from_slice(chunk);
                let valid = match std::str::from_utf8(&data) {
                    Ok(text) => text.len(),
                    Err(e) if e.error_len().is_none() => e.valid_up_to(),
                    Err(e) => return Err(invalid_utf8(&e.to_string())),
                };
                // the prefix is valid UTF-8 by construction
                let text = std::str::from_utf8(&data[..valid]).map_err(|e| invalid_utf8(&e.to_string()))?;
                let mut end = text.len();
                let mut taken = 0u64;
                for (i, _) in text.char_indices() {
                    if taken == room {
                        end = i;
                        break;
                    }
                    taken += 1;
                }
                self.units += taken;
                if end == text.len() {
                    self.pending = data[valid..].to_vec();
                }
                data.truncate(end);
                Ok(data)
            }
        }
    }

    /// Fails when the stream ended inside a multi-byte sequence
    pub(crate) fn finish(&mut self) -> ValueResult<()> {
        if self.pending.is_empty() || self.is_full() {
            return Ok(());
        }
        Err(invalid_utf8("stream ends inside a multi-byte sequence"))
    }
}

fn invalid_utf8(detail: &str) -> ValueError {
    ValueError::conversion("create_lob", ValueKind::Varbinary, ValueKind::Clob, format!("invalid UTF-8: {detail}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_memory_store_respects_declared_length() {
        let store = MemoryLobStore;
        let value = store
            .create_lob(LobKind::Blob, &mut Cursor::new(vec![7u8; 100]), 10)
            .unwrap();
        assert_eq!(value.as_lob().unwrap().read_bytes("test").unwrap(), vec![7u8; 10]);
    }

    #[test]
    fn test_counter_carries_split_sequence() {
        let mut counter = UnitCounter::new(LobKind::Clob, LobLength::Unknown);
        let text = "aé".as_bytes();
        let first = counter.accept(&text[..2]).unwrap();
        assert_eq!(first, b"a");
        let second = counter.accept(&text[2..]).unwrap();
        assert_eq!(second, "é".as_bytes());
        assert_eq!(counter.units(), 2);
        counter.finish().unwrap();
    }

    #[test]
    fn test_counter_stops_at_char_limit() {
        let mut counter = UnitCounter::new(LobKind::Clob, LobLength::Known(2));
        let taken = counter.accept("héllo".as_bytes()).unwrap();
        assert_eq!(taken, "hé".as_bytes());
        assert!(counter.is_full());
    }

    /// Fails every other read with `Interrupted`
    struct Flaky {
        inner: Cursor<Vec<u8>>,
        interrupt: bool,
    }

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    #[test]
    fn test_interrupted_reads_are_retried() {
        let mut stream = Flaky {
            inner: Cursor::new("héllo".as_bytes().to_vec()),
            interrupt: false,
        };
        let value = MemoryLobStore.create_lob(LobKind::Clob, &mut stream, -1).unwrap();
        assert_eq!(value.render().unwrap(), "héllo");
    }

    #[test]
    fn test_read_errors_surface_as_lob_io() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("disk gone"))
            }
        }
        let err = MemoryLobStore.create_lob(LobKind::Blob, &mut Broken, -1).unwrap_err();
        assert!(matches!(err, ValueError::LobIo { operation: "create_lob", .. }));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let store = MemoryLobStore;
        let err = store
            .create_lob(LobKind::Clob, &mut Cursor::new(vec![0x66, 0xff, 0x66]), -1)
            .unwrap_err();
        assert!(matches!(err, ValueError::DataConversion { target_kind: ValueKind::Clob, .. }));

        let truncated = store.create_lob(LobKind::Clob, &mut Cursor::new(vec![0x66, 0xc3]), -1);
        assert!(truncated.is_err());
    }
}
