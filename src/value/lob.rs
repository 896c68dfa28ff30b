//! Large objects.
//!
//! A LOB is either an inline buffer or a handle to an external single-pass
//! stream. Everything that reads a LOB goes through [`Lob::with_cursor`],
//! which opens a fresh cursor for the duration of one operation.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::{self, Read};
use std::sync::Arc;

use crate::context::DEFAULT_LOB_CHUNK_SIZE;
use crate::error::{ValueError, ValueResult};
use crate::value::ValueKind;

/// Binary or character large object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LobKind {
    Blob,
    Clob,
}

impl LobKind {
    pub fn value_kind(&self) -> ValueKind {
        match self {
            LobKind::Blob => ValueKind::Blob,
            LobKind::Clob => ValueKind::Clob,
        }
    }
}

/// Length of a LOB in bytes (BLOB) or characters (CLOB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LobLength {
    Known(u64),
    /// Determined by a full read
    Unknown,
}

impl LobLength {
    /// Maps a declared length where any negative value means unknown
    pub fn from_declared(declared: i64) -> Self {
        u64::try_from(declared).map_or(LobLength::Unknown, LobLength::Known)
    }

    pub fn known(&self) -> Option<u64> {
        match self {
            LobLength::Known(n) => Some(*n),
            LobLength::Unknown => None,
        }
    }
}

/// Source of an externally stored LOB
///
/// Streams are single-pass: each call to `open` must return a new cursor
/// positioned at the start of the content.
pub trait LobSource: Send + Sync + fmt::Debug {
    fn open(&self) -> io::Result<Box<dyn Read + Send>>;
}

/// Streams a shared in-memory buffer
#[derive(Debug, Clone)]
pub struct MemoryLobSource {
    data: Arc<[u8]>,
}

impl MemoryLobSource {
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        MemoryLobSource { data: data.into() }
    }
}

impl LobSource for MemoryLobSource {
    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(io::Cursor::new(Arc::clone(&self.data))))
    }
}

#[derive(Debug, Clone)]
pub enum LobData {
    Inline(Arc<[u8]>),
    External {
        source: Arc<dyn LobSource>,
        length: LobLength,
    },
}

/// A BLOB or CLOB value. CLOB content is UTF-8.
#[derive(Debug, Clone)]
pub struct Lob {
    kind: LobKind,
    data: LobData,
}

impl Lob {
    pub fn blob(bytes: impl Into<Arc<[u8]>>) -> Self {
        Lob {
            kind: LobKind::Blob,
            data: LobData::Inline(bytes.into()),
        }
    }

    pub fn clob(text: &str) -> Self {
        Lob {
            kind: LobKind::Clob,
            data: LobData::Inline(Arc::from(text.as_bytes())),
        }
    }

    /// Inline CLOB from raw bytes, which must be valid UTF-8
    pub fn clob_from_bytes(bytes: Vec<u8>) -> ValueResult<Self> {
        let text = String::from_utf8(bytes).map_err(|e| {
            ValueError::conversion("clob", ValueKind::Varbinary, ValueKind::Clob, e.to_string())
        })?;
        Ok(Lob::clob(&text))
    }

    pub fn inline(kind: LobKind, bytes: Vec<u8>) -> ValueResult<Self> {
        match kind {
            LobKind::Blob => Ok(Lob::blob(bytes)),
            LobKind::Clob => Lob::clob_from_bytes(bytes),
        }
    }

    pub fn external(kind: LobKind, source: Arc<dyn LobSource>, length: LobLength) -> Self {
        Lob {
            kind,
            data: LobData::External { source, length },
        }
    }

    pub fn kind(&self) -> LobKind {
        self.kind
    }

    pub fn data(&self) -> &LobData {
        &self.data
    }

    pub fn is_inline(&self) -> bool {
        matches!(self.data, LobData::Inline(_))
    }

    /// Inline buffer, if any
    pub fn inline_bytes(&self) -> Option<&[u8]> {
        match &self.data {
            LobData::Inline(bytes) => Some(bytes),
            LobData::External { .. } => None,
        }
    }

    pub fn length(&self) -> LobLength {
        match &self.data {
            LobData::Inline(bytes) => LobLength::Known(match self.kind {
                LobKind::Blob => bytes.len() as u64,
                LobKind::Clob => count_chars(bytes),
            }),
            LobData::External { length, .. } => *length,
        }
    }

    /// Length as a descriptor precision; unknown lengths report the maximum
    pub fn precision(&self) -> i64 {
        self.length()
            .known()
            .map_or(i64::MAX, |n| i64::try_from(n).unwrap_or(i64::MAX))
    }

    /// Runs `f` over a freshly opened cursor; the cursor is dropped on every
    /// exit path.
    pub fn with_cursor<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut dyn Read) -> io::Result<T>,
    ) -> ValueResult<T> {
        match &self.data {
            LobData::Inline(bytes) => {
                let mut cursor: &[u8] = bytes;
                f(&mut cursor).map_err(|e| ValueError::lob_io(operation, e))
            }
            LobData::External { source, .. } => {
                let mut cursor = source.open().map_err(|e| ValueError::lob_io(operation, e))?;
                f(&mut *cursor).map_err(|e| ValueError::lob_io(operation, e))
            }
        }
    }

    pub fn read_bytes(&self, operation: &'static str) -> ValueResult<Vec<u8>> {
        if let LobData::Inline(bytes) = &self.data {
            return Ok(bytes.to_vec());
        }
        self.with_cursor(operation, |r| {
            let mut out = Vec::new();
            r.read_to_end(&mut out)?;
            Ok(out)
        })
    }

    pub fn read_string(&self, operation: &'static str) -> ValueResult<String> {
        let bytes = self.read_bytes(operation)?;
        String::from_utf8(bytes).map_err(|e| {
            ValueError::conversion(operation, self.kind.value_kind(), ValueKind::Varchar, e.to_string())
        })
    }

    /// Known length, or the length found by reading the whole stream
    pub fn resolve_length(&self, operation: &'static str) -> ValueResult<u64> {
        if let Some(n) = self.length().known() {
            return Ok(n);
        }
        let kind = self.kind;
        self.with_cursor(operation, |r| {
            let mut buf = [0u8; 8192];
            let mut total = 0u64;
            loop {
                let n = match r.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                };
                total += match kind {
                    LobKind::Blob => n as u64,
                    LobKind::Clob => count_chars(&buf[..n]),
                };
            }
            Ok(total)
        })
    }

    /// Keeps the first `units` bytes or characters, dropping the rest
    pub fn truncate(&self, units: u64, operation: &'static str) -> ValueResult<Lob> {
        if self.length().known().is_some_and(|n| n <= units) {
            return Ok(self.clone());
        }
        let kind = self.kind;
        let (prefix, truncated) = self.with_cursor(operation, |r| read_prefix(r, kind, units))?;
        if !truncated {
            return Ok(self.clone());
        }
        tracing::debug!(kind = ?kind, units, "lob_truncated");
        Ok(Lob {
            kind,
            data: LobData::Inline(Arc::from(prefix)),
        })
    }
}

/// Content equality, whatever the storage form. A stream that fails to
/// read compares unequal.
impl PartialEq for Lob {
    fn eq(&self, other: &Self) -> bool {
        if self.kind != other.kind {
            return false;
        }
        if let (Some(a), Some(b)) = (self.length().known(), other.length().known()) {
            if a != b {
                return false;
            }
        }
        if let (LobData::External { source: a, .. }, LobData::External { source: b, .. }) =
            (&self.data, &other.data)
        {
            if std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)) {
                return true;
            }
        }
        matches!(compare_lobs(self, other, DEFAULT_LOB_CHUNK_SIZE), Ok(Ordering::Equal))
    }
}

impl Eq for Lob {}

/// Hashes the kind only, so equal content hashes alike in any storage form
impl Hash for Lob {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

/// Compares two LOBs unit by unit, reading at most `chunk_size` bytes of each
/// operand at a time.
pub fn compare_lobs(a: &Lob, b: &Lob, chunk_size: usize) -> ValueResult<Ordering> {
    if let (Some(x), Some(y)) = (a.inline_bytes(), b.inline_bytes()) {
        return Ok(x.cmp(y));
    }
    a.with_cursor("compare", |ra| {
        b.with_cursor("compare", |rb| compare_streams(ra, rb, chunk_size))
            .map_err(|e| match e {
                ValueError::LobIo { source, .. } => source,
                other => io::Error::other(other.to_string()),
            })
    })
}

/// Lexicographic comparison of two streams in matched chunks. The shorter
/// stream sorts first when one is a prefix of the other. UTF-8 byte order is
/// code point order, so CLOBs use the same routine.
pub fn compare_streams(a: &mut dyn Read, b: &mut dyn Read, chunk_size: usize) -> io::Result<Ordering> {
    let chunk_size = chunk_size.max(1);
    let mut buf_a = vec![0u8; chunk_size];
    let mut buf_b = vec![0u8; chunk_size];
    let mut chunks = 0u64;
    loop {
        let la = read_full(a, &mut buf_a)?;
        let lb = read_full(b, &mut buf_b)?;
        chunks += 1;
        let common = la.min(lb);
        if let Some(pos) = (0..common).find(|&i| buf_a[i] != buf_b[i]) {
            tracing::trace!(chunks, "lob_compare_differs");
            return Ok(buf_a[pos].cmp(&buf_b[pos]));
        }
        if la != lb {
            return Ok(la.cmp(&lb));
        }
        if la < chunk_size {
            tracing::trace!(chunks, "lob_compare_equal");
            return Ok(Ordering::Equal);
        }
    }
}

/// Fills `buf` unless the stream ends first; returns the bytes read
fn read_full(r: &mut dyn Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

const PREFIX_CHUNK: usize = 8192;

/// Reads up to `units` bytes or characters. The flag reports whether content
/// remained after the prefix.
fn read_prefix(r: &mut dyn Read, kind: LobKind, units: u64) -> io::Result<(Vec<u8>, bool)> {
    let mut out = Vec::new();
    match kind {
        LobKind::Blob => {
            r.take(units).read_to_end(&mut out)?;
            let mut next = [0u8; 1];
            let more = read_full(r, &mut next)? > 0;
            Ok((out, more))
        }
        LobKind::Clob => {
            // a sequence split across chunks is counted at its lead byte
            let mut chars = 0u64;
            let mut buf = vec![0u8; PREFIX_CHUNK];
            loop {
                let n = read_full(r, &mut buf)?;
                if n == 0 {
                    return Ok((out, false));
                }
                for (i, &b) in buf[..n].iter().enumerate() {
                    if is_continuation(b) {
                        continue;
                    }
                    if chars == units {
                        out.extend_from_slice(&buf[..i]);
                        return Ok((out, true));
                    }
                    chars += 1;
                }
                out.extend_from_slice(&buf[..n]);
            }
        }
    }
}

fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

fn count_chars(bytes: &[u8]) -> u64 {
    bytes.iter().filter(|b| !is_continuation(**b)).count() as u64
}
