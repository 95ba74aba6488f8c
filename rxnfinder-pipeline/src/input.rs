//! Reaction-set input normalization

use rxnfinder_core::{RxnFinderError, RxnFinderResult};
use serde::{Deserialize, Serialize};

/// Reaction ids as a caller supplies them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReactionInput {
    Single(String),
    List(Vec<String>),
}

impl From<&str> for ReactionInput {
    fn from(id: &str) -> Self {
        ReactionInput::Single(id.to_string())
    }
}

impl From<String> for ReactionInput {
    fn from(id: String) -> Self {
        ReactionInput::Single(id)
    }
}

impl From<Vec<String>> for ReactionInput {
    fn from(ids: Vec<String>) -> Self {
        ReactionInput::List(ids)
    }
}

impl ReactionInput {
    fn into_ids(self) -> Vec<String> {
        match self {
            ReactionInput::Single(id) => vec![id],
            ReactionInput::List(ids) => ids,
        }
    }
}

/// Flatten the explicit reaction set and the newline-delimited bulk text into
/// one ordered list: explicit ids first, then bulk tokens.
///
/// Whitespace around ids and blank lines are dropped. Duplicates are kept.
pub fn normalize_reactions(
    input: Option<ReactionInput>,
    bulk: Option<&str>,
) -> RxnFinderResult<Vec<String>> {
    let mut reactions: Vec<String> = input
        .map(ReactionInput::into_ids)
        .unwrap_or_default()
        .into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();

    if let Some(text) = bulk {
        reactions.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    if reactions.is_empty() {
        return Err(RxnFinderError::InvalidBatchInput(
            "no reaction ids supplied".to_string(),
        ));
    }
    Ok(reactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_id() {
        let ids = normalize_reactions(Some("rxn00001".into()), None).unwrap();
        assert_eq!(ids, vec!["rxn00001"]);
    }

    #[test]
    fn test_list_then_bulk() {
        let list = vec!["rxn1".to_string(), "rxn2".to_string()];
        let bulk = "rxn3\n\n  rxn4 \r\nrxn1\n";
        let ids = normalize_reactions(Some(list.into()), Some(bulk)).unwrap();
        assert_eq!(ids, vec!["rxn1", "rxn2", "rxn3", "rxn4", "rxn1"]);
    }

    #[test]
    fn test_bulk_only() {
        let ids = normalize_reactions(None, Some("rxn7\nrxn8")).unwrap();
        assert_eq!(ids, vec!["rxn7", "rxn8"]);
    }

    #[test]
    fn test_empty_is_rejected() {
        for (input, bulk) in [
            (None, None),
            (Some(ReactionInput::List(vec![])), Some("\n  \n")),
            (Some(ReactionInput::Single("   ".to_string())), None),
        ] {
            let err = normalize_reactions(input, bulk).unwrap_err();
            assert!(matches!(err, RxnFinderError::InvalidBatchInput(_)));
        }
    }

    #[test]
    fn test_untagged_deserialization() {
        let single: ReactionInput = serde_json::from_str(r#""rxn1""#).unwrap();
        assert_eq!(single, ReactionInput::Single("rxn1".to_string()));
        let list: ReactionInput = serde_json::from_str(r#"["rxn1", "rxn2"]"#).unwrap();
        assert_eq!(list, ReactionInput::List(vec!["rxn1".to_string(), "rxn2".to_string()]));
    }
}
