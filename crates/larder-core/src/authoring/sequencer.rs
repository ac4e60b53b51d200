//! Step sequencer: linear navigation through the authoring steps with a
//! validation gate guarding every forward move.
//!
//! The sequencer itself never talks to the gateway. It reports whether a
//! move is allowed; the session performs any persistence the move requires
//! and only then calls [`StepSequencer::move_to`].

use larder_types::authoring::AuthoringStep;
use larder_types::error::{AuthoringError, ValidationError, Violation};
use larder_types::recipe::RecipeDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepSequencer {
    current: AuthoringStep,
}

impl StepSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at an arbitrary step (used when restoring a saved session).
    pub fn at(step: AuthoringStep) -> Self {
        Self { current: step }
    }

    pub fn current(&self) -> AuthoringStep {
        self.current
    }

    /// Run the current step's gate and return the step a forward move would
    /// land on. Does not move.
    pub fn check_advance(&self, draft: &RecipeDraft) -> Result<AuthoringStep, AuthoringError> {
        let next = self.current.next().ok_or(AuthoringError::InvalidTransition {
            action: "advance",
            step: self.current,
        })?;
        check_gate(self.current, draft)?;
        Ok(next)
    }

    /// Whether leaving `from` forward must persist the draft first.
    pub fn persists_on_advance(from: AuthoringStep) -> bool {
        from == AuthoringStep::BasicDetails
    }

    /// Commit a forward move previously approved by [`check_advance`].
    ///
    /// [`check_advance`]: StepSequencer::check_advance
    pub(crate) fn move_to(&mut self, step: AuthoringStep) {
        self.current = step;
    }

    /// Go back one step without validating. Returns `None` on the first
    /// step, where leaving means exiting the session instead.
    pub fn prev(&mut self) -> Option<AuthoringStep> {
        let previous = self.current.prev()?;
        self.current = previous;
        Some(previous)
    }
}

/// Unmet requirements for leaving `step`, in a stable order.
pub fn gate_requirements(step: AuthoringStep, draft: &RecipeDraft) -> Vec<Violation> {
    let mut unmet = Vec::new();
    match step {
        AuthoringStep::BasicDetails => {
            if draft.name.trim().is_empty() {
                unmet.push(Violation::new("name", "is required"));
            }
            if is_blank(&draft.author) {
                unmet.push(Violation::new("author", "is required"));
            }
            if is_blank(&draft.cuisine) {
                unmet.push(Violation::new("cuisine", "is required"));
            }
        }
        AuthoringStep::IngredientSelection => {
            if !draft.containers.iter().any(|c| !c.ingredients.is_empty()) {
                unmet.push(Violation::new(
                    "containers",
                    "add at least one ingredient to a container",
                ));
            }
        }
        AuthoringStep::PreparationActions => {
            if draft.preparation_required == Some(true) && draft.preparation_items.is_empty() {
                unmet.push(Violation::new(
                    "preparationItems",
                    "preparation is marked as required but no action was chosen",
                ));
            }
        }
        AuthoringStep::ServingBreakdown => {
            if !matches!(draft.serving_size, Some(n) if n > 0) {
                unmet.push(Violation::new("servingSize", "is required"));
            }
            if !matches!(draft.cooking_time, Some(n) if n > 0) {
                unmet.push(Violation::new("cookingTime", "is required"));
            }
        }
        AuthoringStep::CookingInstructions => {
            if draft.instructions.is_empty() {
                unmet.push(Violation::new("instructions", "add at least one instruction"));
            }
        }
    }
    unmet
}

/// [`gate_requirements`] as a `Result`.
pub fn check_gate(step: AuthoringStep, draft: &RecipeDraft) -> Result<(), ValidationError> {
    let violations = gate_requirements(step, draft);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|s| s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_types::quantity::Quantity;
    use larder_types::recipe::{Container, ContainerId, IngredientAddition};

    fn basics() -> RecipeDraft {
        RecipeDraft {
            name: "Tomato Soup".to_string(),
            author: Some("Ana".to_string()),
            cuisine: Some("Italian".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_basic_details_gate_lists_missing_fields_in_order() {
        let unmet = gate_requirements(AuthoringStep::BasicDetails, &RecipeDraft::default());
        let fields: Vec<&str> = unmet.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "author", "cuisine"]);
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let draft = RecipeDraft {
            author: Some("   ".to_string()),
            ..basics()
        };
        let err = check_gate(AuthoringStep::BasicDetails, &draft).unwrap_err();
        assert_eq!(err.fields(), vec!["author"]);
    }

    #[test]
    fn test_check_advance_does_not_move() {
        let seq = StepSequencer::new();
        assert_eq!(
            seq.check_advance(&basics()).unwrap(),
            AuthoringStep::IngredientSelection
        );
        assert_eq!(seq.current(), AuthoringStep::BasicDetails);
    }

    #[test]
    fn test_check_advance_reports_validation() {
        let seq = StepSequencer::at(AuthoringStep::IngredientSelection);
        let err = seq.check_advance(&basics()).unwrap_err();
        match err {
            AuthoringError::Validation(v) => assert_eq!(v.fields(), vec!["containers"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ingredient_gate_passes_with_filled_container() {
        let draft = RecipeDraft {
            containers: vec![Container {
                id: ContainerId(1),
                name: "Pot".to_string(),
                ingredients: vec![IngredientAddition {
                    id: "onion".to_string(),
                    name: "Onion".to_string(),
                    image: None,
                    quantity: Quantity::new(50.0).unwrap(),
                    units: None,
                }],
            }],
            ..basics()
        };
        assert!(check_gate(AuthoringStep::IngredientSelection, &draft).is_ok());
    }

    #[test]
    fn test_preparation_gate_only_when_required() {
        let mut draft = basics();
        assert!(check_gate(AuthoringStep::PreparationActions, &draft).is_ok());
        draft.preparation_required = Some(true);
        let err = check_gate(AuthoringStep::PreparationActions, &draft).unwrap_err();
        assert!(err.names("preparationItems"));
    }

    #[test]
    fn test_serving_gate() {
        let mut draft = basics();
        let err = check_gate(AuthoringStep::ServingBreakdown, &draft).unwrap_err();
        assert_eq!(err.fields(), vec!["servingSize", "cookingTime"]);
        draft.serving_size = Some(4);
        draft.cooking_time = Some(30);
        assert!(check_gate(AuthoringStep::ServingBreakdown, &draft).is_ok());
    }

    #[test]
    fn test_cannot_advance_past_last_step() {
        let seq = StepSequencer::at(AuthoringStep::CookingInstructions);
        let err = seq.check_advance(&basics()).unwrap_err();
        assert!(matches!(err, AuthoringError::InvalidTransition { action: "advance", .. }));
    }

    #[test]
    fn test_prev_is_unconditional_except_first() {
        let mut seq = StepSequencer::at(AuthoringStep::PreparationActions);
        assert_eq!(seq.prev(), Some(AuthoringStep::IngredientSelection));
        assert_eq!(seq.prev(), Some(AuthoringStep::BasicDetails));
        assert_eq!(seq.prev(), None);
        assert_eq!(seq.current(), AuthoringStep::BasicDetails);
    }

    #[test]
    fn test_only_basic_details_persists() {
        assert!(StepSequencer::persists_on_advance(AuthoringStep::BasicDetails));
        for step in &AuthoringStep::ALL[1..] {
            assert!(!StepSequencer::persists_on_advance(*step));
        }
    }
}
