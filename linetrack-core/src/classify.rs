//! Grouping loss labels into named categories.
//!
//! A category matches a label when the label contains every `contains`
//! fragment, none of the `excludes` fragments, and (if any are given) at
//! least one of the `any_of` fragments. Categories are tried in order and the
//! last matching one wins, so broad categories go first and specific ones
//! after them.

use crate::particle::{LossStatus, Particle};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LossCategory {
    pub name: String,
    pub contains: Vec<String>,
    pub excludes: Vec<String>,
    pub any_of: Vec<String>,
}

impl LossCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contains: Vec::new(),
            excludes: Vec::new(),
            any_of: Vec::new(),
        }
    }

    pub fn containing(mut self, fragments: &[&str]) -> Self {
        self.contains.extend(fragments.iter().map(|f| f.to_string()));
        self
    }

    pub fn excluding(mut self, fragments: &[&str]) -> Self {
        self.excludes.extend(fragments.iter().map(|f| f.to_string()));
        self
    }

    pub fn any_of(mut self, fragments: &[&str]) -> Self {
        self.any_of.extend(fragments.iter().map(|f| f.to_string()));
        self
    }

    pub fn matches(&self, label: &str) -> bool {
        self.contains.iter().all(|f| label.contains(f.as_str()))
            && self.excludes.iter().all(|f| !label.contains(f.as_str()))
            && (self.any_of.is_empty() || self.any_of.iter().any(|f| label.contains(f.as_str())))
    }
}

/// Ordered list of categories with an optional catch-all
#[derive(Debug, Clone, Default, Serialize)]
pub struct LossClassifier {
    categories: Vec<LossCategory>,
    other: Option<String>,
}

impl LossClassifier {
    pub fn new(categories: Vec<LossCategory>) -> Self {
        Self {
            categories,
            other: None,
        }
    }

    /// Name of the category assigned to labels nothing else matches.
    pub fn with_other(mut self, name: impl Into<String>) -> Self {
        self.other = Some(name.into());
        self
    }

    pub fn categories(&self) -> &[LossCategory] {
        &self.categories
    }

    /// Index of the category for `status`; the catch-all, when present, has
    /// index `categories().len()`.
    pub fn classify(&self, status: &LossStatus) -> Option<usize> {
        let label = status.to_string();
        self.categories
            .iter()
            .rposition(|c| c.matches(&label))
            .or_else(|| self.other.as_ref().map(|_| self.categories.len()))
    }

    pub fn category_name(&self, index: usize) -> Option<&str> {
        if index < self.categories.len() {
            Some(&self.categories[index].name)
        } else if index == self.categories.len() {
            self.other.as_deref()
        } else {
            None
        }
    }

    /// Per-category particle counts, in category order (catch-all last).
    /// Particles that match nothing are not counted.
    pub fn tally<'a>(&self, particles: impl IntoIterator<Item = &'a Particle>) -> Vec<(String, usize)> {
        let slots = self.categories.len() + usize::from(self.other.is_some());
        let mut counts = vec![0usize; slots];
        for particle in particles {
            if let Some(idx) = self.classify(&particle.status) {
                counts[idx] += 1;
            }
        }
        counts
            .into_iter()
            .enumerate()
            .filter_map(|(idx, n)| self.category_name(idx).map(|name| (name.to_string(), n)))
            .collect()
    }
}
