//! ARRAY, ROW and RESULT_SET payloads

use std::sync::Arc;

use crate::error::{ValueError, ValueResult};
use crate::types::TypeDescriptor;
use crate::value::{Value, ValueKind};

/// Ordered sequence of values with a declared component type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayValue {
    component: TypeDescriptor,
    elements: Arc<[Value]>,
}

impl ArrayValue {
    pub fn new(component: TypeDescriptor, elements: impl Into<Arc<[Value]>>) -> Self {
        ArrayValue {
            component,
            elements: elements.into(),
        }
    }

    pub fn component(&self) -> TypeDescriptor {
        self.component
    }

    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Keeps at most `cardinality` leading elements
    pub fn truncated(&self, cardinality: usize) -> ArrayValue {
        if self.elements.len() <= cardinality {
            return self.clone();
        }
        ArrayValue {
            component: self.component,
            elements: Arc::from(&self.elements[..cardinality]),
        }
    }
}

/// Column metadata of a result set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultColumn {
    pub name: String,
    pub descriptor: TypeDescriptor,
}

impl ResultColumn {
    pub fn new(name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        ResultColumn {
            name: name.into(),
            descriptor,
        }
    }
}

/// Small in-memory tabular result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultSetValue {
    columns: Arc<[ResultColumn]>,
    rows: Arc<[Vec<Value>]>,
}

impl ResultSetValue {
    /// Every row must have exactly one value per column
    pub fn new(columns: Vec<ResultColumn>, rows: Vec<Vec<Value>>) -> ValueResult<Self> {
        if let Some(bad) = rows.iter().find(|r| r.len() != columns.len()) {
            return Err(ValueError::conversion(
                "result_set",
                ValueKind::Row,
                ValueKind::ResultSet,
                format!("row of degree {} in a result of {} columns", bad.len(), columns.len()),
            ));
        }
        Ok(ResultSetValue {
            columns: columns.into(),
            rows: rows.into(),
        })
    }

    pub fn columns(&self) -> &[ResultColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }
}
