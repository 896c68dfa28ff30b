//! # TypeLayer
//!
//! Value representation and type system for a SQL engine: the closed family
//! of typed values, their type descriptors, casts between kinds, a total
//! comparison order, truncated modulus, and large objects that live inline or
//! in a spool directory.
//!
//! ## Pipeline
//!
//! ```text
//! literal / canonical form / stream
//!     ↓
//! [Value constructors, LobStore]  → Value
//!     ↓
//! [cast]                          → Value fitted to a TypeDescriptor
//!     ↓
//! [compare, arithmetic]           → Ordering, Value
//!     ↓
//! [to_canonical, Display]         → foreign representation, SQL literal
//! ```
//!
//! Zone, collation and LOB chunking come from an explicit [`ValueContext`].
//!
//! ## Usage
//!
//! ```rust
//! use typelayer::{TypeDescriptor, Value, ValueContext, ValueKind};
//!
//! let ctx = ValueContext::default();
//! let target = TypeDescriptor::with(ValueKind::Char, Some(5), None)?;
//! let padded = Value::varchar("ab").cast_to(&target, &ctx)?;
//! assert_eq!(padded.render()?, "ab   ");
//! assert!(Value::Integer(2).compare(&Value::BigInt(10), &ctx)?.is_lt());
//! # Ok::<(), typelayer::ValueError>(())
//! ```
//!
//! ## Module Organization
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `value` | `Value`, kinds, intervals, LOBs, composite values |
//! | `types` | `TypeDescriptor` and per-kind defaults |
//! | `cast` | Conversion and fitting to a descriptor |
//! | `compare` | Total order within a type family |
//! | `arithmetic` | Modulus, remainder, signum |
//! | `temporal` | Zones, gap/overlap resolution, literal parsing |
//! | `ids` | UUID generation and conversions |
//! | `storage` | `LobStore` implementations |
//! | `config` | figment configuration loading |
//! | `logging` | tracing subscriber setup |

pub mod arithmetic;
pub mod cast;
pub mod compare;
pub mod config;
pub mod context;
pub mod error;
pub mod ids;
pub mod logging;
pub mod storage;
pub mod temporal;
pub mod types;
pub mod value;

pub use arithmetic::{modulus, remainder};
pub use cast::cast;
pub use compare::compare;
pub use config::Config;
pub use context::{Collation, ValueContext};
pub use error::{ValueError, ValueResult};
pub use ids::UuidFactory;
pub use storage::{FileLobStore, LobStore, MemoryLobStore};
pub use temporal::ZoneSpec;
pub use types::TypeDescriptor;
pub use value::{
    ArrayValue, Canonical, Interval, IntervalQualifier, Lob, LobKind, LobLength, ResultSetValue,
    Value, ValueFamily, ValueKind,
};
