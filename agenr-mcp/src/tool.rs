//! The `agenr_recall` tool descriptor and argument parsing.

use serde::Deserialize;
use serde_json::Value;

use agenr_core::errors::AgenrError;
use agenr_retrieval::RecallQuery;

pub const TOOL_NAME: &str = "agenr_recall";

pub fn description() -> Value {
    serde_json::json!({
        "name": TOOL_NAME,
        "description": "Recall knowledge entries relevant to a query, a session start, or new entries since a watermark.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "text": { "type": "string", "description": "Free-text recall query" },
                "context": { "type": "string", "description": "Pass \"session-start\" for the two-tier session-start recall" },
                "limit": { "type": "integer", "description": "Maximum entries to return", "default": 10, "minimum": 1 },
                "project": { "type": "string", "description": "Restrict to this project, or \"*\" for all projects" },
                "since_seq": { "type": "integer", "description": "Return only entries with rowid greater than this watermark" },
                "noUpdate": { "type": "boolean", "description": "Skip recall-stat bookkeeping for this call", "default": false }
            }
        }
    })
}

#[derive(Debug, Deserialize)]
struct RecallArgs {
    text: Option<String>,
    context: Option<String>,
    limit: Option<usize>,
    project: Option<String>,
    since_seq: Option<i64>,
    #[serde(rename = "noUpdate")]
    no_update: Option<bool>,
}

const DEFAULT_LIMIT: usize = 10;

pub fn parse_args(args: Option<Value>) -> Result<RecallQuery, AgenrError> {
    let parsed: RecallArgs = match args {
        Some(v) => serde_json::from_value(v).map_err(|e| AgenrError::Config(e.to_string()))?,
        None => RecallArgs { text: None, context: None, limit: None, project: None, since_seq: None, no_update: None },
    };

    Ok(RecallQuery {
        text: parsed.text,
        context: parsed.context,
        limit: parsed.limit.unwrap_or(DEFAULT_LIMIT).max(1),
        no_update: parsed.no_update.unwrap_or(false),
        since_seq: parsed.since_seq,
        project: parsed.project,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_args_default_to_a_bare_query() {
        let query = parse_args(None).unwrap();
        assert_eq!(query.limit, DEFAULT_LIMIT);
        assert!(query.text.is_none());
    }

    #[test]
    fn camel_case_no_update_is_accepted() {
        let query = parse_args(Some(serde_json::json!({"text": "duke", "noUpdate": true}))).unwrap();
        assert_eq!(query.text.as_deref(), Some("duke"));
        assert!(query.no_update);
    }
}
