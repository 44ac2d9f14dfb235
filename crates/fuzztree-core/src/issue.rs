//! Issues and the shared issue sink.
//!
//! Configuration generation and every analysis task report problems as
//! [`Issue`] records. Tasks run on a worker pool, so the sink serializes
//! appends behind a mutex; each record remembers whether it concerns the whole
//! tree or one positional configuration slot.

use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARN"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// A single reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub message: String,
    /// Id of the tree element the issue refers to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    pub severity: Severity,
}

impl Issue {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            element_id: None,
            severity: Severity::Warning,
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            element_id: None,
            severity: Severity::Fatal,
        }
    }

    /// Attach the element id the issue refers to.
    pub fn at(mut self, element_id: impl Into<String>) -> Self {
        self.element_id = Some(element_id.into());
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.element_id {
            Some(id) => write!(f, "[{}] {} ({id})", self.severity, self.message),
            None => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}

/// What an issue record is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueScope {
    /// The template tree as a whole (e.g. configuration generation).
    Tree,
    /// The configuration at this position of the generated sequence.
    Configuration(usize),
}

/// Thread-safe accumulator of issues.
#[derive(Debug, Default)]
pub struct IssueSink {
    records: Mutex<Vec<(IssueScope, Issue)>>,
}

impl IssueSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one issue.
    pub fn record(&self, scope: IssueScope, issue: Issue) {
        self.records.lock().push((scope, issue));
    }

    /// Append several issues under one lock acquisition.
    pub fn extend(&self, scope: IssueScope, issues: impl IntoIterator<Item = Issue>) {
        let mut records = self.records.lock();
        records.extend(issues.into_iter().map(|i| (scope, i)));
    }

    /// Issues recorded for `scope`, in recording order.
    pub fn for_scope(&self, scope: IssueScope) -> Vec<Issue> {
        self.records
            .lock()
            .iter()
            .filter(|(s, _)| *s == scope)
            .map(|(_, i)| i.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Whether any fatal issue was recorded for `scope`.
    pub fn has_fatal(&self, scope: IssueScope) -> bool {
        self.records
            .lock()
            .iter()
            .any(|(s, i)| *s == scope && i.is_fatal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn scoped_records() {
        let sink = IssueSink::new();
        sink.record(IssueScope::Tree, Issue::warning("dropped branch").at("r1"));
        sink.record(IssueScope::Configuration(2), Issue::fatal("undeveloped"));

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.for_scope(IssueScope::Tree).len(), 1);
        assert!(sink.has_fatal(IssueScope::Configuration(2)));
        assert!(!sink.has_fatal(IssueScope::Tree));
        assert!(sink.for_scope(IssueScope::Configuration(0)).is_empty());
    }

    #[test]
    fn concurrent_appends_are_all_kept() {
        let sink = Arc::new(IssueSink::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for i in 0..100 {
                        sink.record(
                            IssueScope::Configuration(t),
                            Issue::warning(format!("w{i}")),
                        );
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(sink.len(), 800);
        for t in 0..8 {
            let issues = sink.for_scope(IssueScope::Configuration(t));
            assert_eq!(issues.len(), 100);
            assert_eq!(issues[0].message, "w0");
            assert_eq!(issues[99].message, "w99");
        }
    }

    #[test]
    fn issue_display() {
        let issue = Issue::fatal("unknown node type").at("x");
        assert_eq!(issue.to_string(), "[FATAL] unknown node type (x)");
    }
}
