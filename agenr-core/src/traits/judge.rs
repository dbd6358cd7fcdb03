use crate::errors::AgenrResult;
use crate::models::{Entry, RelationType};

/// Verdict returned by an injected LLM judge when consolidation asks
/// whether two candidate entries should be related or merged.
#[derive(Debug, Clone)]
pub struct JudgeVerdict {
    pub relation: Option<RelationType>,
    pub confidence: f64,
}

pub trait RelationJudge: Send + Sync {
    fn judge(&self, new_entry: &Entry, existing: &Entry) -> AgenrResult<JudgeVerdict>;
}
