//! Authoring workflow vocabulary: the linear step sequence and the buckets
//! an ingredient can be placed into.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::recipe::ContainerId;

/// The five authoring steps, in the only order they can be visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthoringStep {
    BasicDetails,
    IngredientSelection,
    PreparationActions,
    ServingBreakdown,
    CookingInstructions,
}

impl AuthoringStep {
    pub const ALL: [AuthoringStep; 5] = [
        AuthoringStep::BasicDetails,
        AuthoringStep::IngredientSelection,
        AuthoringStep::PreparationActions,
        AuthoringStep::ServingBreakdown,
        AuthoringStep::CookingInstructions,
    ];

    pub fn first() -> Self {
        Self::ALL[0]
    }

    pub fn last() -> Self {
        Self::ALL[Self::ALL.len() - 1]
    }

    /// Zero-based position in the sequence.
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|s| *s == self)
            .unwrap_or_default()
    }

    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn is_last(self) -> bool {
        self == Self::last()
    }

    /// Human-readable title for wizard headings.
    pub fn label(self) -> &'static str {
        match self {
            AuthoringStep::BasicDetails => "Basic details",
            AuthoringStep::IngredientSelection => "Ingredient selection",
            AuthoringStep::PreparationActions => "Preparation actions",
            AuthoringStep::ServingBreakdown => "Serving breakdown",
            AuthoringStep::CookingInstructions => "Cooking instructions",
        }
    }
}

impl Default for AuthoringStep {
    fn default() -> Self {
        Self::first()
    }
}

impl fmt::Display for AuthoringStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthoringStep::BasicDetails => write!(f, "basic_details"),
            AuthoringStep::IngredientSelection => write!(f, "ingredient_selection"),
            AuthoringStep::PreparationActions => write!(f, "preparation_actions"),
            AuthoringStep::ServingBreakdown => write!(f, "serving_breakdown"),
            AuthoringStep::CookingInstructions => write!(f, "cooking_instructions"),
        }
    }
}

impl FromStr for AuthoringStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|step| step.to_string() == s.to_lowercase())
            .copied()
            .ok_or_else(|| format!("invalid authoring step: '{s}'"))
    }
}

/// Destination of an ingredient placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "container")]
pub enum Bucket {
    Container(ContainerId),
    Seasonings,
    WaterOil,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Container(id) => write!(f, "container #{id}"),
            Bucket::Seasonings => write!(f, "seasonings"),
            Bucket::WaterOil => write!(f, "water/oil"),
        }
    }
}
