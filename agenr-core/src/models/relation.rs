use serde::{Deserialize, Serialize};

/// Directed typed edge between two entries, stored as a flat edge table
/// rather than an ownership graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Elaborates,
    Contradicts,
    Supersedes,
    Coexists,
    Related,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::Elaborates => "elaborates",
            RelationType::Contradicts => "contradicts",
            RelationType::Supersedes => "supersedes",
            RelationType::Coexists => "coexists",
            RelationType::Related => "related",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "elaborates" => Some(RelationType::Elaborates),
            "contradicts" => Some(RelationType::Contradicts),
            "supersedes" => Some(RelationType::Supersedes),
            "coexists" => Some(RelationType::Coexists),
            "related" => Some(RelationType::Related),
            _ => None,
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relation {
    pub source_id: String,
    pub target_id: String,
    pub relation_type: RelationType,
}
