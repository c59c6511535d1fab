//! Registry of the lookup modes offered in the mode selector.
//!
//! Each mode declares what kind of input it expects, which columns its
//! results carry, and which store operation (if any) answers it. Adding a
//! mode only touches [`CATALOG`].

use crate::error::{Result, ShelfError};
use serde::Serialize;

/// Index of a mode in the selector.
pub type ModeId = usize;

/// Ordered column names of a mode's result table.
pub type ColumnSchema = &'static [&'static str];

/// How the operator's raw text is interpreted for a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Base-10 signed integer.
    Integer,
    /// Free text, passed through verbatim.
    Text,
}

impl InputKind {
    /// Short hint shown next to the input field.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Integer => "number",
            Self::Text => "text",
        }
    }
}

/// Store operation a mode is answered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lookup {
    ProductById,
    ProductsByCategory,
}

/// A selectable lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryMode {
    pub id: ModeId,
    pub label: &'static str,
    pub input_kind: InputKind,
    pub columns: ColumnSchema,
    /// `None` for modes listed in the selector that no store operation answers yet.
    pub lookup: Option<Lookup>,
}

/// The registered modes, indexed by position.
pub static CATALOG: QueryCatalog = QueryCatalog {
    modes: &[
        QueryMode {
            id: 0,
            label: "Product by ID",
            input_kind: InputKind::Integer,
            columns: &["ID", "Name", "Category", "Price", "Quantity"],
            lookup: Some(Lookup::ProductById),
        },
        QueryMode {
            id: 1,
            label: "Products by category",
            input_kind: InputKind::Text,
            columns: &["ID", "Name", "Price", "Quantity"],
            lookup: Some(Lookup::ProductsByCategory),
        },
        QueryMode {
            id: 2,
            label: "Suppliers for product",
            input_kind: InputKind::Integer,
            columns: &["Supplier ID", "Supplier", "Phone", "Unit Cost"],
            lookup: None,
        },
        QueryMode {
            id: 3,
            label: "Warehouse pickups",
            input_kind: InputKind::Integer,
            columns: &["Pickup ID", "Warehouse", "Product", "Quantity", "Picked Up"],
            lookup: None,
        },
    ],
};

/// Read-only mode registry.
#[derive(Debug)]
pub struct QueryCatalog {
    modes: &'static [QueryMode],
}

impl QueryCatalog {
    /// Returns the mode registered at `mode_id`.
    pub fn mode(&self, mode_id: ModeId) -> Result<&QueryMode> {
        self.modes
            .get(mode_id)
            .ok_or_else(|| ShelfError::unknown_mode(mode_id))
    }

    /// Returns the result columns for `mode_id`.
    pub fn schema_for(&self, mode_id: ModeId) -> Result<ColumnSchema> {
        self.mode(mode_id).map(|mode| mode.columns)
    }

    /// Returns the input kind for `mode_id`.
    pub fn input_kind_for(&self, mode_id: ModeId) -> Result<InputKind> {
        self.mode(mode_id).map(|mode| mode.input_kind)
    }

    /// All registered modes in selector order.
    pub fn modes(&self) -> &'static [QueryMode] {
        self.modes
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Mode after `mode_id`, wrapping to the first.
    pub fn next_mode(&self, mode_id: ModeId) -> ModeId {
        if self.modes.is_empty() {
            return 0;
        }
        (mode_id + 1) % self.modes.len()
    }

    /// Mode before `mode_id`, wrapping to the last.
    pub fn previous_mode(&self, mode_id: ModeId) -> ModeId {
        if self.modes.is_empty() {
            return 0;
        }
        if mode_id == 0 || mode_id >= self.modes.len() {
            self.modes.len() - 1
        } else {
            mode_id - 1
        }
    }
}
