use crate::matcher::MatchStatus;
use crate::summary::RowSnapshot;
use serde::{Deserialize, Serialize};

/// Messages the control side sends to a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PageRequest {
    /// Search the page, optionally restoring a cursor position
    SearchCases {
        cases: Vec<String>,
        #[serde(rename = "currentMatchIndex", default, skip_serializing_if = "Option::is_none")]
        current_match_index: Option<usize>,
    },

    /// The case list changed: reset and search again
    UpdateCases { cases: Vec<String> },

    /// Jump to the next match of one case number
    NavigateToCase {
        #[serde(rename = "caseNumber")]
        case_number: String,
    },

    /// Move to the next match
    NextMatch,

    /// Move to the previous match
    PreviousMatch,

    /// Deliver a key press
    KeyDown {
        key: String,
        #[serde(default)]
        shift: bool,
    },

    /// Apply input the page queued since the last poll
    PollInput,

    /// Collect snapshots of matching rows
    Summarize { cases: Vec<String> },
}

impl PageRequest {
    /// Whether a newer request of the same kind makes this one pointless
    pub fn is_superseded_by_newer(&self) -> bool {
        matches!(self, PageRequest::UpdateCases { .. })
    }

    /// Action name as it appears on the wire
    pub fn action(&self) -> &'static str {
        match self {
            PageRequest::SearchCases { .. } => "searchCases",
            PageRequest::UpdateCases { .. } => "updateCases",
            PageRequest::NavigateToCase { .. } => "navigateToCase",
            PageRequest::NextMatch => "nextMatch",
            PageRequest::PreviousMatch => "previousMatch",
            PageRequest::KeyDown { .. } => "keyDown",
            PageRequest::PollInput => "pollInput",
            PageRequest::Summarize { .. } => "summarize",
        }
    }
}

/// Replies from the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PageResponse {
    /// Navigator state after the request
    Matches(MatchStatus),

    /// Snapshots of matching rows
    Summary { rows: Vec<RowSnapshot> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_cases_wire_format() {
        let request: PageRequest = serde_json::from_value(json!({
            "action": "searchCases",
            "cases": ["A-1", "B-2"],
            "currentMatchIndex": 3
        }))
        .unwrap();

        assert_eq!(
            request,
            PageRequest::SearchCases {
                cases: vec!["A-1".to_string(), "B-2".to_string()],
                current_match_index: Some(3),
            }
        );
    }

    #[test]
    fn test_optional_index_omitted() {
        let request = PageRequest::SearchCases {
            cases: vec!["A-1".to_string()],
            current_match_index: None,
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value, json!({"action": "searchCases", "cases": ["A-1"]}));
    }

    #[test]
    fn test_other_actions() {
        let update: PageRequest =
            serde_json::from_value(json!({"action": "updateCases", "cases": []})).unwrap();
        assert_eq!(update, PageRequest::UpdateCases { cases: vec![] });
        assert!(update.is_superseded_by_newer());

        let nav: PageRequest =
            serde_json::from_value(json!({"action": "navigateToCase", "caseNumber": "A-1"})).unwrap();
        assert_eq!(nav.action(), "navigateToCase");
        assert!(!nav.is_superseded_by_newer());

        let next: PageRequest = serde_json::from_value(json!({"action": "nextMatch"})).unwrap();
        assert_eq!(next, PageRequest::NextMatch);
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result: Result<PageRequest, _> = serde_json::from_value(json!({"action": "clearAll"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_matches_response_wire_format() {
        let response = PageResponse::Matches(MatchStatus {
            total: 2,
            current_match_index: 0,
            counter: Some("1/2".to_string()),
        });

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"kind": "matches", "total": 2, "currentMatchIndex": 0, "counter": "1/2"})
        );
    }
}
