use std::fmt;

/// Machine-readable error codes shared by the server, the client, and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InvalidQuery,
    InvalidPatch,
    ItemOutOfRange,
    BodyTooLarge,
    VersionConflict,
    NetworkFailure,
    UnexpectedResponse,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::InvalidQuery => "E2001",
            Self::InvalidPatch => "E2002",
            Self::ItemOutOfRange => "E2003",
            Self::BodyTooLarge => "E2004",
            Self::VersionConflict => "E3001",
            Self::NetworkFailure => "E4001",
            Self::UnexpectedResponse => "E4002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidQuery => "Invalid query parameter",
            Self::InvalidPatch => "Invalid state patch",
            Self::ItemOutOfRange => "Item id outside the universe",
            Self::BodyTooLarge => "Request body too large",
            Self::VersionConflict => "State version conflict",
            Self::NetworkFailure => "Server unreachable",
            Self::UnexpectedResponse => "Unexpected server response",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and clients.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in longlist/config.toml and retry."),
            Self::InvalidQuery => Some("`offset` and `limit` must be non-negative integers."),
            Self::InvalidPatch => {
                Some("Send any subset of selectedItems, customOrder, itemEdits as JSON.")
            }
            Self::ItemOutOfRange => None,
            Self::BodyTooLarge => Some("Raise server.max_body_bytes in longlist/config.toml."),
            Self::VersionConflict => Some("Re-read /api/state and retry with the new version."),
            Self::NetworkFailure => Some("Start the server with `longlist serve` or check --server."),
            Self::UnexpectedResponse => Some("Check that client and server versions match."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ConfigParseError,
            ErrorCode::InvalidQuery,
            ErrorCode::InvalidPatch,
            ErrorCode::ItemOutOfRange,
            ErrorCode::BodyTooLarge,
            ErrorCode::VersionConflict,
            ErrorCode::NetworkFailure,
            ErrorCode::UnexpectedResponse,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::VersionConflict.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }
}
