//! Collection filters — list and search criteria scoped by the actor
//!
//! A filter is an OR-of-ANDs over owner id, access tier, and title
//! substring. The store executes it; the policy only builds it. For listing,
//! `None` means the whole request is denied — it is not an empty result set,
//! which would mean "authorized, nothing matched".

use crate::types::{AccessTier, Actor, Document, RoleType};

/// One disjunct of a document query. Every set field must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocClause {
    pub owner_id: Option<i64>,
    pub access: Option<AccessTier>,
    pub title_contains: Option<String>,
}

impl DocClause {
    pub fn matches(&self, doc: &Document) -> bool {
        if let Some(owner_id) = self.owner_id {
            if doc.owner_id != owner_id {
                return false;
            }
        }
        if let Some(access) = self.access {
            if doc.access != access {
                return false;
            }
        }
        if let Some(needle) = &self.title_contains {
            if !doc.title.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// OR-of-ANDs document filter handed to the criteria executor
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCriteria {
    pub any_of: Vec<DocClause>,
}

impl QueryCriteria {
    /// A criteria matching every document
    pub fn unrestricted() -> Self {
        Self {
            any_of: vec![DocClause::default()],
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.any_of.iter().any(|clause| clause.matches(doc))
    }
}

/// Requested scope of a listing operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    Public,
    Tier(RoleType),
    All,
    Unspecified,
}

impl ListScope {
    /// Parse the requested access parameter; absence and unknown values both
    /// land in `Unspecified`.
    pub fn parse(requested: &str) -> Self {
        match requested {
            "Public" => Self::Public,
            "All" => Self::All,
            other => RoleType::parse(other)
                .map(Self::Tier)
                .unwrap_or(Self::Unspecified),
        }
    }
}

/// Build the filter for a list operation, or `None` for a hard denial.
pub fn build_list_filter(actor: &Actor, scope: ListScope) -> Option<QueryCriteria> {
    match scope {
        ListScope::Public => Some(QueryCriteria {
            any_of: vec![DocClause {
                access: Some(AccessTier::Public),
                ..Default::default()
            }],
        }),
        ListScope::Tier(tier) => {
            if actor.role == tier {
                Some(QueryCriteria {
                    any_of: vec![DocClause {
                        access: Some(AccessTier::Role(tier)),
                        ..Default::default()
                    }],
                })
            } else {
                None
            }
        }
        ListScope::All => {
            if actor.role == RoleType::Admin {
                Some(QueryCriteria::unrestricted())
            } else {
                Some(visible_union(actor, None))
            }
        }
        ListScope::Unspecified => {
            if actor.role == RoleType::Admin {
                Some(QueryCriteria::unrestricted())
            } else {
                None
            }
        }
    }
}

/// Build the filter for a title search.
///
/// An empty query drops the title predicate and falls back to the
/// ownership/role/public union (Admin: unrestricted).
pub fn build_search_filter(actor: &Actor, query_text: &str) -> QueryCriteria {
    let title = if query_text.is_empty() {
        None
    } else {
        Some(query_text.to_string())
    };

    if actor.role == RoleType::Admin {
        match title {
            Some(needle) => QueryCriteria {
                any_of: vec![DocClause {
                    title_contains: Some(needle),
                    ..Default::default()
                }],
            },
            None => QueryCriteria::unrestricted(),
        }
    } else {
        visible_union(actor, title)
    }
}

/// {owned by actor} ∪ {access = actor's role} ∪ {access = Public},
/// each clause optionally narrowed by a title substring.
fn visible_union(actor: &Actor, title_contains: Option<String>) -> QueryCriteria {
    QueryCriteria {
        any_of: vec![
            DocClause {
                owner_id: Some(actor.user_id),
                title_contains: title_contains.clone(),
                ..Default::default()
            },
            DocClause {
                access: Some(AccessTier::Role(actor.role)),
                title_contains: title_contains.clone(),
                ..Default::default()
            },
            DocClause {
                access: Some(AccessTier::Public),
                title_contains,
                ..Default::default()
            },
        ],
    }
}
