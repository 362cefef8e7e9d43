//! Hover tooltip construction.

use serde::{Deserialize, Serialize};

/// One hover line: a label and the row field it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipEntry {
    pub label: String,
    pub field: String,
}

impl TooltipEntry {
    /// Template placeholder bound to the row field at render time.
    ///
    /// Braces keep field names with whitespace intact.
    pub fn placeholder(&self) -> String {
        format!("@{{{}}}", self.field)
    }
}

/// Ordered hover lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipSpec {
    entries: Vec<TooltipEntry>,
}

impl TooltipSpec {
    pub fn entries(&self) -> &[TooltipEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(label, placeholder)` pairs in display order.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|e| (e.label.clone(), e.placeholder()))
            .collect()
    }
}

/// Build a tooltip from a base field list followed by `extra` fields.
///
/// `base` is only read; every call produces a fresh list.
pub fn tooltip_from_fields<B, E>(base: &[B], extra: &[E]) -> TooltipSpec
where
    B: AsRef<str>,
    E: AsRef<str>,
{
    let entries = base
        .iter()
        .map(|f| f.as_ref())
        .chain(extra.iter().map(|f| f.as_ref()))
        .map(|field| TooltipEntry {
            label: field.to_string(),
            field: field.to_string(),
        })
        .collect();
    TooltipSpec { entries }
}
