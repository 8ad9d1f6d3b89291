//! Target specs and their extraction from loosely structured node data.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Post-match gifting behavior for one target.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum GiftOption {
    /// Pick from any gift, re-picking until the flow reports success.
    All,
    /// Only pick gifts from the favorite set.
    FavoriteOnly,
    /// Skip gifting and decline.
    #[default]
    None,
}

impl GiftOption {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "favorite_only" => Some(Self::FavoriteOnly),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// One item to search for in the scrollable list. Consumed once per batch,
/// discarded after processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TargetSpec {
    pub name: String,
    #[serde(default)]
    pub gift_option: GiftOption,
}

/// A named node payload handed over by the integration layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// Node label, used only for logging.
    pub label: String,
    pub data: Value,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MissingField {
    #[error("node data carries no recognition parameters")]
    RecognitionParams,
    #[error("expected-text list is missing or empty")]
    ExpectedText,
    #[error("gift option is missing")]
    GiftOption,
    #[error("gift option '{0}' is not recognized")]
    UnknownGiftOption(String),
}

impl TargetSpec {
    pub fn new(name: impl Into<String>, gift_option: GiftOption) -> Self {
        Self {
            name: name.into(),
            gift_option,
        }
    }

    /// Extract a target from node data of the shape
    /// `{"recognition": {"param": {"expected": ["name"]}}, "gift_option": "all"}`.
    ///
    /// The name is taken from the first expected-text entry and trimmed. An
    /// empty name is not an error here; the batch loop skips empty-name
    /// targets on its own.
    pub fn from_node(node: &Value) -> Result<Self, MissingField> {
        let param = node
            .get("recognition")
            .and_then(|r| r.get("param"))
            .ok_or(MissingField::RecognitionParams)?;
        let name = param
            .get("expected")
            .and_then(|e| e.get(0))
            .and_then(Value::as_str)
            .ok_or(MissingField::ExpectedText)?;

        let gift = node
            .get("gift_option")
            .and_then(Value::as_str)
            .ok_or(MissingField::GiftOption)?;
        let gift_option =
            GiftOption::parse(gift).ok_or_else(|| MissingField::UnknownGiftOption(gift.to_string()))?;

        Ok(Self {
            name: name.trim().to_string(),
            gift_option,
        })
    }
}
