use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::join_ids;

/// Everything that can go wrong between a typed query term and a result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("invalid {kind} id(s): {}", .tokens.join(", "))]
    InvalidIdentifier { kind: IdKind, tokens: Vec<String> },
    #[error("no stop ids supplied")]
    EmptyQuery,
    #[error("transport error: {message}")]
    Transport { message: String },
    #[error("upstream error: {message}")]
    Upstream { message: String },
    #[error("no arrivals found for stop(s): {}", join_ids(.stops, ", "))]
    NoMatch { stops: Vec<u64> },
}

/// What a list of ids names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Stop,
    Route,
}

impl IdKind {
    fn title(self) -> &'static str {
        match self {
            IdKind::Stop => "Stop",
            IdKind::Route => "Route",
        }
    }
}

impl Display for IdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            IdKind::Stop => "stop",
            IdKind::Route => "route",
        })
    }
}

/// The title/explanation/detail triple shown to a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub title: String,
    pub explanation: String,
    pub detail: Option<String>,
}

impl From<reqwest::Error> for QueryError {
    fn from(value: reqwest::Error) -> Self {
        QueryError::Transport {
            message: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(value: serde_json::Error) -> Self {
        QueryError::Transport {
            message: format!("malformed response: {value}"),
        }
    }
}

impl QueryError {
    pub fn title(&self) -> String {
        match self {
            QueryError::InvalidIdentifier { kind, tokens } if tokens.len() == 1 => {
                format!("Bad {} ID", kind.title())
            }
            QueryError::InvalidIdentifier { kind, .. } => format!("Bad {} IDs", kind.title()),
            QueryError::EmptyQuery => "Missing Query Parameter".into(),
            QueryError::Transport { .. } => "Error".into(),
            QueryError::Upstream { .. } if self.missing_stop_id().is_some() => {
                "Stop Not Found".into()
            }
            QueryError::Upstream { .. } => "TriMet API Error".into(),
            QueryError::NoMatch { .. } => "No Arrivals Found".into(),
        }
    }

    pub fn explanation(&self) -> String {
        match self {
            QueryError::InvalidIdentifier { kind, tokens } => {
                let (ess, verb) = if tokens.len() == 1 {
                    ("", "is")
                } else {
                    ("s", "are")
                };
                let tokens: Vec<_> = tokens
                    .iter()
                    .map(|token| if token.is_empty() { "\"\"" } else { token.as_str() })
                    .collect();
                format!(
                    "The following {kind} ID{ess} {verb} not valid: {}",
                    tokens.join(", ")
                )
            }
            QueryError::EmptyQuery => "One or more stop IDs are required".into(),
            QueryError::Transport { .. } => "Unable to get arrivals at this time".into(),
            QueryError::Upstream { message } => match self.missing_stop_id() {
                Some(id) => format!("Stop ID {id} does not exist"),
                None => message.clone(),
            },
            QueryError::NoMatch { stops } => {
                let ess = if stops.len() == 1 { "" } else { "s" };
                format!("No arrivals found for stop{ess}: {}", join_ids(stops, ", "))
            }
        }
    }

    /// Technical detail, only meant for debugging.
    pub fn detail(&self) -> Option<String> {
        match self {
            QueryError::InvalidIdentifier { kind, .. } => {
                Some(format!("TriMet {kind} IDs should be numbers"))
            }
            QueryError::Transport { message } => Some(message.clone()),
            QueryError::Upstream { message } if self.missing_stop_id().is_some() => {
                Some(message.clone())
            }
            _ => None,
        }
    }

    /// Builds the user-facing triple; `detail` is dropped unless `debug` is set.
    pub fn problem(&self, debug: bool) -> Problem {
        Problem {
            title: self.title(),
            explanation: self.explanation(),
            detail: if debug { self.detail() } else { None },
        }
    }

    /// TriMet reports unknown stops as `Location id not found <id>`.
    pub fn missing_stop_id(&self) -> Option<u64> {
        match self {
            QueryError::Upstream { message } => {
                let lower = message.trim().to_lowercase();
                if !lower.starts_with("location id not found") {
                    return None;
                }
                lower.rsplit(char::is_whitespace).next()?.parse().ok()
            }
            _ => None,
        }
    }

    /// Failures that end the live refresh loop.
    pub fn stops_refresh(&self) -> bool {
        matches!(
            self,
            QueryError::Transport { .. } | QueryError::Upstream { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_identifier_lists_every_token() {
        let error = QueryError::InvalidIdentifier {
            kind: IdKind::Stop,
            tokens: vec!["abc".into(), "x1".into()],
        };
        assert_eq!(error.title(), "Bad Stop IDs");
        assert_eq!(
            error.explanation(),
            "The following stop IDs are not valid: abc, x1"
        );
    }

    #[test]
    fn invalid_route_names_routes() {
        let error = QueryError::InvalidIdentifier {
            kind: IdKind::Route,
            tokens: vec!["blue".into()],
        };
        assert_eq!(error.title(), "Bad Route ID");
        assert_eq!(
            error.explanation(),
            "The following route ID is not valid: blue"
        );
        assert_eq!(
            error.detail().as_deref(),
            Some("TriMet route IDs should be numbers")
        );
    }

    #[test]
    fn empty_token_is_shown_quoted() {
        let error = QueryError::InvalidIdentifier {
            kind: IdKind::Stop,
            tokens: vec!["".into()],
        };
        assert_eq!(
            error.explanation(),
            "The following stop ID is not valid: \"\""
        );
    }

    #[test]
    fn detail_is_hidden_without_debug() {
        let error = QueryError::Transport {
            message: "connection refused".into(),
        };
        assert_eq!(error.problem(false).detail, None);
        assert_eq!(
            error.problem(true).detail.as_deref(),
            Some("connection refused")
        );
    }

    #[test]
    fn missing_stop_is_recognized() {
        let error = QueryError::Upstream {
            message: "Location id not found 99999".into(),
        };
        assert_eq!(error.missing_stop_id(), Some(99999));
        assert_eq!(error.title(), "Stop Not Found");
        assert_eq!(error.explanation(), "Stop ID 99999 does not exist");
    }

    #[test]
    fn no_match_pluralizes() {
        let one = QueryError::NoMatch { stops: vec![7] };
        let many = QueryError::NoMatch { stops: vec![2, 4] };
        assert_eq!(one.explanation(), "No arrivals found for stop: 7");
        assert_eq!(many.explanation(), "No arrivals found for stops: 2, 4");
    }

    #[test]
    fn only_remote_failures_stop_refresh() {
        assert!(QueryError::Upstream { message: "x".into() }.stops_refresh());
        assert!(!QueryError::NoMatch { stops: vec![1] }.stops_refresh());
    }
}
