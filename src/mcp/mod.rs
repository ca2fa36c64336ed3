//! MCP (Model Context Protocol) server for managing and searching case numbers
//!
//! This module exposes the list manager's operations as rmcp tools, so an MCP
//! client can play the role of the extension popup.

pub mod handler;
pub use handler::CaseFinderServer;

use crate::error::CaseFinderError;
use crate::matcher::{Direction, MatchStatus};
use rmcp::{
    tool_router, tool,
    ErrorData as McpError,
    model::{CallToolResult, Content},
    handler::server::wrapper::Parameters,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters naming one case number
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CaseParams {
    /// Case number, e.g. "A-100-2024"
    pub case_number: String,
}

/// Search parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Restore the cursor position saved by the page (default: false)
    #[serde(default)]
    pub resume: bool,
}

fn json_result(value: serde_json::Value) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Convert a page status into a tool result; no status means the page was unreachable
fn status_result(status: Option<MatchStatus>) -> Result<CallToolResult, McpError> {
    match status {
        Some(status) => json_result(serde_json::json!(status)),
        None => Err(McpError::internal_error(
            CaseFinderError::ChannelUnavailable("page did not answer".to_string()).to_string(),
            None,
        )),
    }
}

#[tool_router]
impl CaseFinderServer {
    /// List case numbers
    #[tool(description = "List the tracked case numbers, newest first")]
    async fn case_list(&self) -> Result<CallToolResult, McpError> {
        let manager = self.manager().lock().await;
        json_result(serde_json::json!({ "cases": manager.cases() }))
    }

    /// Add a case number
    #[tool(description = "Add a case number to the front of the list and re-search the page")]
    async fn case_add(&self, params: Parameters<CaseParams>) -> Result<CallToolResult, McpError> {
        let mut manager = self.manager().lock().await;

        match manager.add(&params.0.case_number).await {
            Ok(()) => json_result(serde_json::json!({ "cases": manager.cases() })),
            Err(CaseFinderError::AlreadyExists(case_number)) => json_result(serde_json::json!({
                "cases": manager.cases(),
                "already_exists": case_number
            })),
            Err(e) => Err(McpError::internal_error(e.to_string(), None)),
        }
    }

    /// Delete a case number
    #[tool(description = "Remove a case number from the list and re-search the page")]
    async fn case_delete(&self, params: Parameters<CaseParams>) -> Result<CallToolResult, McpError> {
        let mut manager = self.manager().lock().await;

        manager
            .delete(&params.0.case_number)
            .await
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        json_result(serde_json::json!({ "cases": manager.cases() }))
    }

    /// Search the page
    #[tool(description = "Highlight every table row containing a tracked case number")]
    async fn case_search(&self, params: Parameters<SearchParams>) -> Result<CallToolResult, McpError> {
        let manager = self.manager().lock().await;

        let status = if params.0.resume {
            manager.resume().await
        } else {
            manager.request_search(None).await
        };

        status_result(status)
    }

    /// Next match
    #[tool(description = "Select and scroll to the next matching row")]
    async fn match_next(&self) -> Result<CallToolResult, McpError> {
        let manager = self.manager().lock().await;
        status_result(manager.step(Direction::Next).await)
    }

    /// Previous match
    #[tool(description = "Select and scroll to the previous matching row")]
    async fn match_previous(&self) -> Result<CallToolResult, McpError> {
        let manager = self.manager().lock().await;
        status_result(manager.step(Direction::Previous).await)
    }

    /// Apply page input
    #[tool(description = "Apply Enter / Shift+Enter presses and Next/Previous clicks made on the page since the last poll")]
    async fn match_poll_input(&self) -> Result<CallToolResult, McpError> {
        let manager = self.manager().lock().await;
        status_result(manager.poll_input().await)
    }

    /// Jump to one case number
    #[tool(description = "Select the next row matching one specific case number")]
    async fn case_navigate(&self, params: Parameters<CaseParams>) -> Result<CallToolResult, McpError> {
        let manager = self.manager().lock().await;
        status_result(manager.navigate_to_case(&params.0.case_number).await)
    }

    /// Summarize matching rows
    #[tool(description = "Collect the last two cells of every matching row and open them as a new document")]
    async fn case_summary(&self) -> Result<CallToolResult, McpError> {
        let manager = self.manager().lock().await;
        let rows = manager.summarize().await;

        json_result(serde_json::json!({
            "count": rows.len(),
            "rows": rows
        }))
    }
}
