use std::fmt;

use thiserror::Error;

use crate::persist::PersistError;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    EntityNotFound,
    ValidationFailed,
    CycleDetected,
    AmbiguousId,
    ImportFormatRejected,
    SaveFailed,
    LockContention,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::EntityNotFound => "E2001",
            Self::ValidationFailed => "E2002",
            Self::CycleDetected => "E2003",
            Self::AmbiguousId => "E2004",
            Self::ImportFormatRejected => "E4001",
            Self::SaveFailed => "E5001",
            Self::LockContention => "E5002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Workspace not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::EntityNotFound => "Entity not found",
            Self::ValidationFailed => "Validation failed",
            Self::CycleDetected => "Cycle would be created",
            Self::AmbiguousId => "Ambiguous id prefix",
            Self::ImportFormatRejected => "Import payload rejected",
            Self::SaveFailed => "Save failed",
            Self::LockContention => "Lock contention",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `focal init` to initialize this directory."),
            Self::ConfigParseError => Some("Fix syntax in .focal/config.toml and retry."),
            Self::EntityNotFound => None,
            Self::ValidationFailed => None,
            Self::CycleDetected => {
                Some("A task cannot be moved under itself or one of its descendants.")
            }
            Self::AmbiguousId => Some("Use a longer id prefix to disambiguate."),
            Self::ImportFormatRejected => {
                Some("Expected a focal export: a JSON object with tasks/projects/categories keys.")
            }
            Self::SaveFailed => Some("Check disk space and write permissions, then retry."),
            Self::LockContention => {
                Some("Retry after the other `focal` process releases its lock.")
            }
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The entity kind an operation referenced, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Task,
    Project,
    Category,
    DailyPlan,
    TimeBlock,
    WorkShift,
    JournalEntry,
}

impl EntityKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Project => "project",
            Self::Category => "category",
            Self::DailyPlan => "daily plan",
            Self::TimeBlock => "time block",
            Self::WorkShift => "work shift",
            Self::JournalEntry => "journal entry",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by the mutation engine and its surrounding layers.
///
/// Missing-id conditions are ordinary recoverable failures; callers decide
/// whether to surface or ignore them. Only conditions that would corrupt
/// linkage invariants (and persistence failures) abort whole operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An operation referenced an id that does not exist where existence was
    /// a precondition.
    #[error("{kind} not found: '{id}'")]
    NotFound { kind: EntityKind, id: String },

    /// A required field was absent or malformed (e.g. an empty title).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A reparent would make a task its own ancestor.
    #[error("moving '{id}' under '{proposed_parent}' would create a cycle")]
    CycleDetected { id: String, proposed_parent: String },

    /// The storage backend rejected or timed out a read/write.
    #[error(transparent)]
    Persistence(#[from] PersistError),

    /// An import payload does not resemble the export schema.
    #[error("import rejected: {0}")]
    ImportFormat(String),
}

impl CoreError {
    /// Convenience constructor for the common not-found case.
    #[must_use]
    pub fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Machine-readable code associated with this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::EntityNotFound,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::CycleDetected { .. } => ErrorCode::CycleDetected,
            Self::Persistence(e) => e.code(),
            Self::ImportFormat(_) => ErrorCode::ImportFormatRejected,
        }
    }

    /// Optional remediation hint for operators and agents.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::NotInitialized,
            ErrorCode::ConfigParseError,
            ErrorCode::EntityNotFound,
            ErrorCode::ValidationFailed,
            ErrorCode::CycleDetected,
            ErrorCode::AmbiguousId,
            ErrorCode::ImportFormatRejected,
            ErrorCode::SaveFailed,
            ErrorCode::LockContention,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = std::collections::HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::CycleDetected.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn not_found_formats_kind_and_id() {
        let err = CoreError::not_found(EntityKind::Task, "abc-123");
        assert_eq!(err.to_string(), "task not found: 'abc-123'");
        assert_eq!(err.code(), ErrorCode::EntityNotFound);
    }
}
