//! Instruction compiler.
//!
//! Keeps two representations of the cooking instructions in step:
//! a free-text narrative (one line per instruction) and a list of structured
//! [`InstructionStep`] records. Work happens inside ordered step contexts,
//! each numbering its own steps from 1. [`flatten`] is the only place that
//! assigns the global 1..N numbering used in the persisted draft.

use serde::{Deserialize, Serialize};

use larder_types::catalog::CatalogItem;
use larder_types::error::AuthoringError;
use larder_types::quantity::Quantity;
use larder_types::recipe::{InstructionStep, RecipeDraft};

/// One group of instructions being authored together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StepContext {
    pub narrative: String,
    pub steps: Vec<InstructionStep>,
}

impl StepContext {
    fn push(&mut self, mut step: InstructionStep) -> InstructionStep {
        step.step = self.steps.len() as u32 + 1;
        self.steps.push(step.clone());
        append_line(&mut self.narrative, &step.instruction);
        step
    }

    fn renumber(&mut self) {
        for (i, step) in self.steps.iter_mut().enumerate() {
            step.step = i as u32 + 1;
        }
    }
}

#[derive(Debug, Clone)]
pub struct InstructionCompiler {
    contexts: Vec<StepContext>,
    default_unit: String,
}

impl InstructionCompiler {
    /// A compiler with a single empty context.
    pub fn new(default_unit: impl Into<String>) -> Self {
        Self::with_contexts(Vec::new(), default_unit)
    }

    /// Restore saved contexts. An empty list still yields one context so
    /// appends always have somewhere to go.
    pub fn with_contexts(contexts: Vec<StepContext>, default_unit: impl Into<String>) -> Self {
        let mut contexts = contexts;
        if contexts.is_empty() {
            contexts.push(StepContext::default());
        }
        for context in &mut contexts {
            context.renumber();
        }
        Self {
            contexts,
            default_unit: default_unit.into(),
        }
    }

    /// Seed from a persisted draft: its narrative and flat instruction list
    /// become a single context.
    pub fn seed_from_draft(draft: &RecipeDraft, default_unit: impl Into<String>) -> Self {
        let context = StepContext {
            narrative: draft.narrative.clone(),
            steps: draft.instructions.clone(),
        };
        Self::with_contexts(vec![context], default_unit)
    }

    pub fn contexts(&self) -> &[StepContext] {
        &self.contexts
    }

    pub fn default_unit(&self) -> &str {
        &self.default_unit
    }

    /// Open a new context at the end and return its index.
    pub fn add_context(&mut self) -> usize {
        self.contexts.push(StepContext::default());
        self.contexts.len() - 1
    }

    /// Drop a context along with its steps. The last remaining context is
    /// cleared instead of removed.
    pub fn remove_context(&mut self, index: usize) -> Result<StepContext, AuthoringError> {
        self.context_mut(index)?;
        if self.contexts.len() == 1 {
            return Ok(std::mem::take(&mut self.contexts[0]));
        }
        Ok(self.contexts.remove(index))
    }

    /// Replace a context's free text. Structured steps are left alone.
    pub fn set_narrative(&mut self, index: usize, text: &str) -> Result<(), AuthoringError> {
        self.context_mut(index)?.narrative = text.trim_end().to_string();
        Ok(())
    }

    pub fn append_from_catalog_instruction(
        &mut self,
        index: usize,
        instruction: &CatalogItem,
    ) -> Result<InstructionStep, AuthoringError> {
        let context = self.context_mut(index)?;
        let step = context.push(InstructionStep {
            step: 0,
            instruction: instruction.name.clone(),
            raw: instruction.name.clone(),
            quantity: None,
            units: None,
            image_url: instruction.image.clone(),
        });
        tracing::debug!(context = index, step = step.step, "catalog instruction appended");
        Ok(step)
    }

    /// Append an "Add {ingredient}" step. Units fall back to the configured
    /// default unit when omitted or blank.
    pub fn append_from_ingredient(
        &mut self,
        index: usize,
        ingredient: &CatalogItem,
        quantity: &str,
        units: Option<&str>,
    ) -> Result<InstructionStep, AuthoringError> {
        let quantity = Quantity::parse(quantity).map_err(|e| AuthoringError::InvalidQuantity {
            bucket: "instructions".to_string(),
            input: e.0,
        })?;
        let units = units
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(&self.default_unit)
            .to_string();

        let context = self.context_mut(index)?;
        let step = context.push(InstructionStep {
            step: 0,
            instruction: format!("Add {quantity} {units} {}", ingredient.name),
            raw: format!("Add {}", ingredient.name),
            quantity: Some(quantity),
            units: Some(units),
            image_url: ingredient.image.clone(),
        });
        tracing::debug!(context = index, step = step.step, "ingredient instruction appended");
        Ok(step)
    }

    /// Remove the first structured step whose rendered text is exactly
    /// `text`, together with the first narrative line holding the same text.
    /// Returns `false` (and changes nothing) when no step matches.
    pub fn remove_by_text(&mut self, index: usize, text: &str) -> Result<bool, AuthoringError> {
        let context = self.context_mut(index)?;
        let Some(position) = context.steps.iter().position(|s| s.instruction == text) else {
            return Ok(false);
        };

        let mut lines: Vec<&str> = context.narrative.lines().collect();
        if let Some(line) = lines.iter().position(|line| line.trim_end() == text) {
            lines.remove(line);
        }
        let narrative = lines.join("\n");

        context.steps.remove(position);
        context.narrative = narrative;
        context.renumber();
        Ok(true)
    }

    /// All structured steps, numbered 1..N across every context.
    pub fn flatten(&self) -> Vec<InstructionStep> {
        flatten(&self.contexts)
    }

    /// Every non-empty context narrative, one per line.
    pub fn narrative(&self) -> String {
        self.contexts
            .iter()
            .map(|c| c.narrative.as_str())
            .filter(|n| !n.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn context_mut(&mut self, index: usize) -> Result<&mut StepContext, AuthoringError> {
        self.contexts
            .get_mut(index)
            .ok_or(AuthoringError::UnknownContext(index))
    }
}

/// Walk the contexts in order and number every step 1..N.
pub fn flatten(contexts: &[StepContext]) -> Vec<InstructionStep> {
    contexts
        .iter()
        .flat_map(|c| c.steps.iter().cloned())
        .enumerate()
        .map(|(i, mut step)| {
            step.step = i as u32 + 1;
            step
        })
        .collect()
}

fn append_line(narrative: &mut String, line: &str) {
    if !narrative.is_empty() {
        narrative.push('\n');
    }
    narrative.push_str(line);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn onion() -> CatalogItem {
        CatalogItem::new("onion", "Onion").with_image("onion.png")
    }

    fn boil() -> CatalogItem {
        CatalogItem::new("boil", "Bring to a boil")
    }

    #[test]
    fn test_catalog_instruction_appends_both_representations() {
        let mut compiler = InstructionCompiler::new("gm");
        compiler.append_from_catalog_instruction(0, &boil()).unwrap();
        compiler
            .append_from_catalog_instruction(0, &CatalogItem::new("stir", "Stir"))
            .unwrap();

        let ctx = &compiler.contexts()[0];
        assert_eq!(ctx.narrative, "Bring to a boil\nStir");
        assert_eq!(ctx.steps[1].step, 2);
        assert_eq!(ctx.steps[1].raw, "Stir");
        assert!(ctx.steps[0].quantity.is_none());
    }

    #[test]
    fn test_ingredient_instruction_renders_quantity_and_units() {
        let mut compiler = InstructionCompiler::new("gm");
        let step = compiler
            .append_from_ingredient(0, &onion(), "50", Some("ml"))
            .unwrap();
        assert_eq!(step.instruction, "Add 50 ml Onion");
        assert_eq!(step.raw, "Add Onion");
        assert_eq!(step.units.as_deref(), Some("ml"));
        assert_eq!(step.image_url.as_deref(), Some("onion.png"));

        let step = compiler.append_from_ingredient(0, &onion(), "2,5", None).unwrap();
        assert_eq!(step.instruction, "Add 2.5 gm Onion");
        assert_eq!(compiler.contexts()[0].narrative, "Add 50 ml Onion\nAdd 2.5 gm Onion");
    }

    #[test]
    fn test_ingredient_instruction_rejects_bad_quantity() {
        let mut compiler = InstructionCompiler::new("gm");
        let err = compiler
            .append_from_ingredient(0, &onion(), "-1", None)
            .unwrap_err();
        assert!(matches!(err, AuthoringError::InvalidQuantity { .. }));
        assert!(compiler.flatten().is_empty());
    }

    #[test]
    fn test_remove_by_text_updates_both_and_renumbers() {
        let mut compiler = InstructionCompiler::new("gm");
        compiler.append_from_catalog_instruction(0, &boil()).unwrap();
        compiler.append_from_ingredient(0, &onion(), "50", None).unwrap();
        compiler
            .append_from_catalog_instruction(0, &CatalogItem::new("serve", "Serve"))
            .unwrap();

        assert!(compiler.remove_by_text(0, "Add 50 gm Onion").unwrap());

        let ctx = &compiler.contexts()[0];
        assert_eq!(ctx.narrative, "Bring to a boil\nServe");
        let numbers: Vec<u32> = ctx.steps.iter().map(|s| s.step).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_remove_by_text_requires_exact_match() {
        let mut compiler = InstructionCompiler::new("gm");
        compiler.append_from_catalog_instruction(0, &boil()).unwrap();
        let before = compiler.contexts().to_vec();

        assert!(!compiler.remove_by_text(0, "Bring to").unwrap());
        assert!(!compiler.remove_by_text(0, "bring to a boil").unwrap());
        assert_eq!(compiler.contexts(), &before[..]);
    }

    #[test]
    fn test_remove_by_text_only_first_match() {
        let mut compiler = InstructionCompiler::new("gm");
        compiler.append_from_catalog_instruction(0, &boil()).unwrap();
        compiler.append_from_catalog_instruction(0, &boil()).unwrap();
        assert!(compiler.remove_by_text(0, "Bring to a boil").unwrap());
        let ctx = &compiler.contexts()[0];
        assert_eq!(ctx.steps.len(), 1);
        assert_eq!(ctx.narrative, "Bring to a boil");
    }

    #[test]
    fn test_flatten_is_contiguous_across_contexts() {
        let mut compiler = InstructionCompiler::new("gm");
        compiler.append_from_catalog_instruction(0, &boil()).unwrap();
        let second = compiler.add_context();
        compiler.append_from_ingredient(second, &onion(), "1", None).unwrap();
        compiler
            .append_from_catalog_instruction(second, &CatalogItem::new("stir", "Stir"))
            .unwrap();
        compiler.remove_by_text(0, "Bring to a boil").unwrap();
        let third = compiler.add_context();
        compiler
            .append_from_catalog_instruction(third, &CatalogItem::new("serve", "Serve"))
            .unwrap();

        let flat = compiler.flatten();
        let numbers: Vec<u32> = flat.iter().map(|s| s.step).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(flat[0].instruction, "Add 1 gm Onion");
        assert_eq!(flat[2].instruction, "Serve");
        assert_eq!(compiler.narrative(), "Add 1 gm Onion\nStir\nServe");
    }

    #[test]
    fn test_unknown_context() {
        let mut compiler = InstructionCompiler::new("gm");
        assert_eq!(
            compiler.append_from_catalog_instruction(3, &boil()).unwrap_err(),
            AuthoringError::UnknownContext(3)
        );
        assert!(compiler.set_narrative(1, "x").is_err());
    }

    #[test]
    fn test_remove_last_context_clears_it() {
        let mut compiler = InstructionCompiler::new("gm");
        compiler.append_from_catalog_instruction(0, &boil()).unwrap();
        let removed = compiler.remove_context(0).unwrap();
        assert_eq!(removed.steps.len(), 1);
        assert_eq!(compiler.contexts().len(), 1);
        assert!(compiler.flatten().is_empty());
    }

    #[test]
    fn test_seed_from_draft_round_trips() {
        let mut compiler = InstructionCompiler::new("gm");
        compiler.append_from_catalog_instruction(0, &boil()).unwrap();
        compiler.append_from_ingredient(0, &onion(), "50", None).unwrap();
        let draft = RecipeDraft {
            instructions: compiler.flatten(),
            narrative: compiler.narrative(),
            ..Default::default()
        };

        let seeded = InstructionCompiler::seed_from_draft(&draft, "gm");
        assert_eq!(seeded.flatten(), draft.instructions);
        assert_eq!(seeded.narrative(), draft.narrative);
    }
}
