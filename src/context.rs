//! Explicit execution context threaded through zone, collation and LOB
//! dependent operations.

use std::cmp::Ordering;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::temporal::ZoneSpec;

pub const DEFAULT_LOB_CHUNK_SIZE: usize = 4096;
pub const DEFAULT_LOB_INLINE_THRESHOLD: usize = 256;

/// Character comparison mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collation {
    /// Code point order
    #[default]
    Binary,
    /// Code point order of the lowercased text
    CaseInsensitive,
}

impl Collation {
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            Collation::Binary => a.cmp(b),
            Collation::CaseInsensitive => a
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValueContext {
    /// Zone for zone-less temporal values
    pub time_zone: ZoneSpec,
    pub collation: Collation,
    /// Bytes read per operand in one step of a streamed LOB comparison
    pub lob_chunk_size: usize,
    /// Deadline set by a caller; operations here always run to completion
    pub deadline: Option<Instant>,
}

impl ValueContext {
    pub fn new() -> Self {
        ValueContext {
            time_zone: ZoneSpec::utc(),
            collation: Collation::Binary,
            lob_chunk_size: DEFAULT_LOB_CHUNK_SIZE,
            deadline: None,
        }
    }

    pub fn with_time_zone(mut self, zone: ZoneSpec) -> Self {
        self.time_zone = zone;
        self
    }

    pub fn with_collation(mut self, collation: Collation) -> Self {
        self.collation = collation;
        self
    }

    pub fn with_lob_chunk_size(mut self, chunk_size: usize) -> Self {
        self.lob_chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

impl Default for ValueContext {
    fn default() -> Self {
        ValueContext::new()
    }
}
