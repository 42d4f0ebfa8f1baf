//! Ordered degradation chains.
//!
//! A chain is a list of named strategies tried in sequence. The first one that
//! yields a value wins; every strategy that failed before it is recorded as a
//! [`Skipped`] entry and logged, so callers can see exactly which fallbacks were
//! taken without any error escaping.

use crate::error::{AnalysisError, Result};

/// A strategy that could not be used, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub strategy: String,
    pub reason: String,
}

/// The value produced by the first usable strategy.
#[derive(Debug)]
pub struct Resolved<T> {
    pub value: T,
    pub strategy: String,
    pub skipped: Vec<Skipped>,
}

impl<T> Resolved<T> {
    pub fn degraded(&self) -> bool {
        !self.skipped.is_empty()
    }
}

type Attempt<'a, T> = Box<dyn FnOnce() -> std::result::Result<T, String> + 'a>;

pub struct FallbackChain<'a, T> {
    resource: &'static str,
    steps: Vec<(String, Attempt<'a, T>)>,
}

impl<'a, T> FallbackChain<'a, T> {
    pub fn new(resource: &'static str) -> Self {
        Self { resource, steps: Vec::new() }
    }

    pub fn then<F>(mut self, strategy: impl Into<String>, attempt: F) -> Self
    where
        F: FnOnce() -> std::result::Result<T, String> + 'a,
    {
        self.steps.push((strategy.into(), Box::new(attempt)));
        self
    }

    /// Add a strategy only when `condition` holds.
    pub fn then_if<F>(self, condition: bool, strategy: impl Into<String>, attempt: F) -> Self
    where
        F: FnOnce() -> std::result::Result<T, String> + 'a,
    {
        if condition {
            self.then(strategy, attempt)
        } else {
            self
        }
    }

    pub fn resolve(self) -> Result<Resolved<T>> {
        let resource = self.resource;
        let mut skipped = Vec::new();
        for (strategy, attempt) in self.steps {
            match attempt() {
                Ok(value) => {
                    if !skipped.is_empty() {
                        tracing::warn!(resource, strategy = %strategy, "using fallback");
                    }
                    return Ok(Resolved { value, strategy, skipped });
                }
                Err(reason) => {
                    tracing::warn!(resource, strategy = %strategy, %reason, "strategy unavailable");
                    skipped.push(Skipped { strategy, reason });
                }
            }
        }

        let reasons = skipped
            .iter()
            .map(|s| format!("{}: {}", s.strategy, s.reason))
            .collect::<Vec<_>>()
            .join("; ");
        Err(AnalysisError::Exhausted { resource: resource.to_string(), reasons })
    }
}
