use serde::{Deserialize, Serialize};

/// Caller-facing filter for listing stored requests.
///
/// Each scope field supports an intersection (record must hold every listed
/// scope) and a union (record must hold at least one). When both are given
/// for the same field the union is used, as it is the wider selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequestsFilter {
    pub client_id: Option<String>,
    pub user_id: Option<String>,
    pub scopes_intersection: Vec<String>,
    pub scopes_union: Vec<String>,
    pub granted_scopes_intersection: Vec<String>,
    pub granted_scopes_union: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeMatch {
    All(Vec<String>),
    Any(Vec<String>),
}

impl ScopeMatch {
    fn pick(intersection: &[String], union: &[String]) -> Option<Self> {
        if !union.is_empty() {
            Some(ScopeMatch::Any(union.to_vec()))
        } else if !intersection.is_empty() {
            Some(ScopeMatch::All(intersection.to_vec()))
        } else {
            None
        }
    }

    pub fn matches(&self, scopes: &[String]) -> bool {
        match self {
            ScopeMatch::All(wanted) => wanted.iter().all(|s| scopes.contains(s)),
            ScopeMatch::Any(wanted) => wanted.iter().any(|s| scopes.contains(s)),
        }
    }
}

/// Normalized form of [`ListRequestsFilter`] handed to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestQuery {
    pub client_id: Option<String>,
    pub user_id: Option<String>,
    pub requested_scope: Option<ScopeMatch>,
    pub granted_scope: Option<ScopeMatch>,
}

impl RequestQuery {
    pub fn matches(&self, request: &super::Request) -> bool {
        if let Some(client_id) = &self.client_id {
            if &request.client_id != client_id {
                return false;
            }
        }
        if let Some(user_id) = &self.user_id {
            if &request.user_id != user_id {
                return false;
            }
        }
        if let Some(m) = &self.requested_scope {
            if !m.matches(&request.requested_scope) {
                return false;
            }
        }
        if let Some(m) = &self.granted_scope {
            if !m.matches(&request.granted_scope) {
                return false;
            }
        }
        true
    }
}

impl From<&ListRequestsFilter> for RequestQuery {
    fn from(filter: &ListRequestsFilter) -> Self {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        RequestQuery {
            client_id: non_empty(&filter.client_id),
            user_id: non_empty(&filter.user_id),
            requested_scope: ScopeMatch::pick(&filter.scopes_intersection, &filter.scopes_union),
            granted_scope: ScopeMatch::pick(
                &filter.granted_scopes_intersection,
                &filter.granted_scopes_union,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn union_wins_over_intersection() {
        let filter = ListRequestsFilter {
            scopes_intersection: strings(&["a", "b"]),
            scopes_union: strings(&["c"]),
            ..Default::default()
        };
        let query = RequestQuery::from(&filter);
        assert_eq!(query.requested_scope, Some(ScopeMatch::Any(strings(&["c"]))));
        assert_eq!(query.granted_scope, None);
    }

    #[test]
    fn empty_ids_are_ignored() {
        let filter = ListRequestsFilter {
            client_id: Some(String::new()),
            user_id: Some("alice".into()),
            ..Default::default()
        };
        let query = RequestQuery::from(&filter);
        assert_eq!(query.client_id, None);
        assert_eq!(query.user_id.as_deref(), Some("alice"));
    }

    #[test]
    fn scope_match_semantics() {
        let held = strings(&["a", "b"]);
        assert!(ScopeMatch::All(strings(&["a", "b"])).matches(&held));
        assert!(!ScopeMatch::All(strings(&["a", "c"])).matches(&held));
        assert!(ScopeMatch::Any(strings(&["c", "b"])).matches(&held));
        assert!(!ScopeMatch::Any(strings(&["c"])).matches(&held));
    }
}
