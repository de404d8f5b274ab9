use std::{collections::BTreeSet, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{IdKind, QueryError};

/// Longest id the upstream accepts.
pub const MAX_ID_DIGITS: usize = 10;

/// A de-duplicated, ascending set of stop ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StopQuery {
    ids: BTreeSet<u64>,
}

/// Route ids an arrivals query is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteFilter {
    ids: BTreeSet<u64>,
}

impl StopQuery {
    /// Parses free-form text such as `"4, 4, 2"`.
    ///
    /// Blank input is an empty query. Every token that is not a stop id is
    /// collected so the error can report all of them at once.
    pub fn parse(term: &str) -> Result<Self, QueryError> {
        Ok(Self {
            ids: parse_ids(term, IdKind::Stop)?,
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.ids.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<u64> {
        self.ids.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    /// Folds the ids of `current` into this query.
    ///
    /// With `remove_if_present`, an id found in both is dropped instead, so
    /// selecting an already selected stop toggles it off.
    pub fn merge(&self, current: &StopQuery, remove_if_present: bool) -> StopQuery {
        let mut ids = self.ids.clone();
        for id in current.ids() {
            if !ids.insert(id) && remove_if_present {
                ids.remove(&id);
            }
        }
        StopQuery { ids }
    }
}

impl RouteFilter {
    pub fn parse(term: &str) -> Result<Self, QueryError> {
        Ok(Self {
            ids: parse_ids(term, IdKind::Route)?,
        })
    }

    pub fn allows(&self, route: u64) -> bool {
        self.ids.is_empty() || self.ids.contains(&route)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromStr for StopQuery {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromIterator<u64> for StopQuery {
    fn from_iter<T: IntoIterator<Item = u64>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<u64> for RouteFilter {
    fn from_iter<T: IntoIterator<Item = u64>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl Display for StopQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&join_ids(self.ids.iter(), ","))
    }
}

/// Whether `token` has the shape of a TriMet id: one to ten ascii digits.
pub fn is_valid_id(token: &str) -> bool {
    !token.is_empty() && token.len() <= MAX_ID_DIGITS && token.bytes().all(|b| b.is_ascii_digit())
}

/// Leading and trailing separators are ignored; an empty token between two
/// commas is a bad id like any other.
pub(crate) fn parse_ids(term: &str, kind: IdKind) -> Result<BTreeSet<u64>, QueryError> {
    let trimmed = term.trim_matches(|c: char| c == ',' || c.is_whitespace());
    let mut ids = BTreeSet::new();
    if trimmed.is_empty() {
        return Ok(ids);
    }
    let mut bad = Vec::new();
    for token in trimmed.split(',').map(str::trim) {
        match token.parse::<u64>() {
            Ok(id) if is_valid_id(token) => {
                ids.insert(id);
            }
            _ => bad.push(token.to_string()),
        }
    }
    if bad.is_empty() {
        Ok(ids)
    } else {
        Err(QueryError::InvalidIdentifier { kind, tokens: bad })
    }
}

pub(crate) fn join_ids<'a, I>(ids: I, separator: &str) -> String
where
    I: IntoIterator<Item = &'a u64>,
{
    ids.into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}
