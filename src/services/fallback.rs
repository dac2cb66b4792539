// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ordered fallback over alternative operations.
//!
//! Candidates run one at a time in the order they were added. The first
//! success wins and later candidates never run. If every candidate fails the
//! last failure is returned.

use crate::error::{AppError, Result};
use std::future::Future;
use std::pin::Pin;

type CandidateFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

struct Candidate<'a, T> {
    label: &'static str,
    run: Box<dyn FnOnce() -> CandidateFuture<'a, T> + Send + 'a>,
}

/// Sequential first-success combinator.
pub struct Fallback<'a, T> {
    name: &'static str,
    candidates: Vec<Candidate<'a, T>>,
}

impl<'a, T> Fallback<'a, T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            candidates: Vec::new(),
        }
    }

    /// Append a candidate; it runs only if every earlier one failed.
    pub fn or_try<F, Fut>(mut self, label: &'static str, f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Result<T>> + Send + 'a,
    {
        self.candidates.push(Candidate {
            label,
            run: Box::new(move || Box::pin(f())),
        });
        self
    }

    pub async fn run(self) -> Result<T> {
        let mut last_error = None;

        for candidate in self.candidates {
            match (candidate.run)().await {
                Ok(value) => {
                    tracing::debug!(
                        operation = self.name,
                        candidate = candidate.label,
                        "Fallback candidate succeeded"
                    );
                    return Ok(value);
                }
                Err(err) => {
                    tracing::warn!(
                        operation = self.name,
                        candidate = candidate.label,
                        error = %err,
                        "Fallback candidate failed"
                    );
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AppError::Internal(anyhow::anyhow!("no candidates for {}", self.name))
        }))
    }
}
