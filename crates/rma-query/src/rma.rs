//! RMA query grammar.
//!
//! A query is a sequence of stages joined by `,`:
//!
//! ```text
//! model::<Model>,rma::criteria,<clause>,<clause>,rma::include,<inc>,rma::options[k$eqv][k$eqv]
//! ```
//!
//! Stages with no clauses are left out entirely. Clauses are rendered verbatim;
//! the service does its own parsing and nothing is escaped here.

use std::fmt::Display;

/// Render a `[key$eqvalue]` filter.
pub fn filter_eq(key: &str, value: impl Display) -> String {
    format!("[{}$eq{}]", key, value)
}

/// Render a `[key$inv1,v2,...]` filter.
pub fn filter_in<T: Display>(key: &str, values: &[T]) -> String {
    format!("[{}$in{}]", key, join(values))
}

/// Comma-join values without spaces, in input order.
pub fn join<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Builder for an RMA model query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RmaQuery {
    model: String,
    criteria: Vec<String>,
    include: Vec<String>,
    options: Vec<String>,
}

impl RmaQuery {
    /// Start a query against `model` (e.g. `SectionDataSet`).
    pub fn model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            criteria: Vec::new(),
            include: Vec::new(),
            options: Vec::new(),
        }
    }

    /// Append a criteria clause.
    pub fn criteria(mut self, clause: impl Into<String>) -> Self {
        self.criteria.push(clause.into());
        self
    }

    /// Append an include clause.
    pub fn include(mut self, clause: impl Into<String>) -> Self {
        self.include.push(clause.into());
        self
    }

    /// Append an `[key$eqvalue]` option.
    pub fn option(mut self, key: &str, value: impl Display) -> Self {
        self.options.push(filter_eq(key, value));
        self
    }

    /// Render the `q=` value.
    pub fn to_query(&self) -> String {
        let mut stages = vec![format!("model::{}", self.model)];

        if !self.criteria.is_empty() {
            stages.push(format!("rma::criteria,{}", self.criteria.join(",")));
        }

        if !self.include.is_empty() {
            stages.push(format!("rma::include,{}", self.include.join(",")));
        }

        if !self.options.is_empty() {
            stages.push(format!("rma::options{}", self.options.concat()));
        }

        stages.join(",")
    }
}
