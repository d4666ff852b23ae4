//! SQL text with embedded parameter slots.
//!
//! A [`Fragment`] keeps raw SQL pieces and parameter slots apart, so that `$n`
//! placeholders are only numbered when the final SQL is rendered. This is what lets a
//! [`ConditionGroup`](crate::ConditionGroup) built on its own be appended into a larger
//! query without rewriting any placeholder text.

use crate::param::{IndexedParams, Param, ParamList};
use std::fmt::Write;

#[derive(Debug, Clone)]
enum Part {
    Raw(String),
    Param,
}

/// SQL pieces plus the values bound to their slots, in order.
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    parts: Vec<Part>,
    params: ParamList,
}

impl Fragment {
    /// Create a fragment starting with raw SQL.
    pub fn new(initial_sql: impl Into<String>) -> Self {
        let mut fragment = Self::empty();
        fragment.push(&initial_sql.into());
        fragment
    }

    /// Create an empty fragment.
    pub fn empty() -> Self {
        Self {
            parts: Vec::new(),
            params: ParamList::new(),
        }
    }

    /// Append raw SQL (no parameters).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.parts.last_mut() {
            Some(Part::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(Part::Raw(sql.to_string())),
        }
        self
    }

    /// Append a parameter slot and bind its value.
    pub fn push_bind(&mut self, value: Param) -> &mut Self {
        self.parts.push(Part::Param);
        self.params.push(value);
        self
    }

    /// Append another fragment, consuming it. Its slots continue this fragment's numbering.
    pub fn push_fragment(&mut self, mut other: Fragment) -> &mut Self {
        for part in other.parts.drain(..) {
            match part {
                Part::Raw(s) => {
                    self.push(&s);
                }
                Part::Param => self.parts.push(Part::Param),
            }
        }
        self.params.append(&mut other.params);
        self
    }

    /// Number of bound parameters.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Bound parameters keyed by their 1-based placeholder index.
    pub fn index_parameters(&self) -> IndexedParams {
        self.params.indexed()
    }

    /// Render SQL with `$1, $2, ...` placeholders.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        let mut idx: usize = 0;

        for part in &self.parts {
            match part {
                Part::Raw(s) => out.push_str(s),
                Part::Param => {
                    idx += 1;
                    let _ = write!(&mut out, "${}", idx);
                }
            }
        }
        out
    }

    /// Split into rendered SQL and its parameters.
    pub fn into_parts(self) -> (String, ParamList) {
        let sql = self.to_sql();
        (sql, self.params)
    }
}
