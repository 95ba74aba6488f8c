//! Reaction queries and the candidate records the graph traversal returns

use serde::{Deserialize, Serialize};

/// Vertex collection prefix for reactions in the knowledge graph
pub const REACTION_VERTEX_PREFIX: &str = "rxn_reaction/";

/// One traversal request: a reaction plus the similarity floors used to widen it.
///
/// Fields are private so a query cannot change after it has been handed to a
/// retriever; use the `with_*` builders to derive a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionQuery {
    reaction_id: String,
    structural_similarity_floor: f64,
    difference_similarity_floor: f64,
    exclude_self: bool,
}

impl ReactionQuery {
    /// Query with the default floors (1.0 / 1.0), the query reaction included.
    pub fn new(reaction_id: impl Into<String>) -> Self {
        Self {
            reaction_id: reaction_id.into(),
            structural_similarity_floor: 1.0,
            difference_similarity_floor: 1.0,
            exclude_self: false,
        }
    }

    /// Exact-match search: only reactions identical on both fingerprints.
    pub fn exact(reaction_id: impl Into<String>) -> Self {
        Self::new(reaction_id)
    }

    pub fn with_floors(mut self, structural: f64, difference: f64) -> Self {
        self.structural_similarity_floor = structural;
        self.difference_similarity_floor = difference;
        self
    }

    pub fn excluding_self(mut self, exclude_self: bool) -> Self {
        self.exclude_self = exclude_self;
        self
    }

    pub fn reaction_id(&self) -> &str {
        &self.reaction_id
    }

    pub fn structural_similarity_floor(&self) -> f64 {
        self.structural_similarity_floor
    }

    pub fn difference_similarity_floor(&self) -> f64 {
        self.difference_similarity_floor
    }

    pub fn exclude_self(&self) -> bool {
        self.exclude_self
    }

    /// Fully-qualified vertex id (`rxn_reaction/<id>`)
    pub fn canonical_id(&self) -> String {
        if self.reaction_id.starts_with(REACTION_VERTEX_PREFIX) {
            self.reaction_id.clone()
        } else {
            format!("{}{}", REACTION_VERTEX_PREFIX, self.reaction_id)
        }
    }
}

/// A reaction reached by the similarity traversal (the query reaction itself at depth 0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateReaction {
    #[serde(alias = "_key")]
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "sf_similarity")]
    pub structural_similarity: Option<f64>,
    #[serde(default, alias = "df_similarity")]
    pub difference_similarity: Option<f64>,
}

/// Genes reached from one reaction through one reaction-complex grouping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RxnGeneLink {
    #[serde(alias = "rxn")]
    pub rxn_id: String,
    #[serde(default, alias = "complex")]
    pub complex_id: Option<String>,
    #[serde(default, alias = "genes")]
    pub gene_ids: Vec<String>,
}

/// A subject gene linked to the query reaction or one of its similar reactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateGene {
    #[serde(alias = "_key")]
    pub key: String,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default, alias = "seq", alias = "protein_translation")]
    pub sequence: Option<String>,
}

impl CandidateGene {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            product: None,
            function: None,
            sequence: None,
        }
    }

    pub fn with_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.sequence = Some(sequence.into());
        self
    }

    /// Whether the gene can be used as an alignment query
    pub fn has_sequence(&self) -> bool {
        self.sequence
            .as_deref()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }
}
