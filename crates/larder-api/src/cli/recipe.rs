//! Recipe display: `larder show <id>` and the draft summary used by the wizard.

use comfy_table::{Cell, Color};
use console::style;

use larder_core::repository::gateway::RecipeGateway;
use larder_types::recipe::{RecipeDraft, RecipeId};

use super::output::{format_addition, spinner, table};
use crate::state::AppState;

/// Fetch a saved recipe from the backend and print it.
pub async fn show_recipe(state: &AppState, id: &str, json: bool) -> anyhow::Result<()> {
    let id = RecipeId::new(id);
    let spin = spinner(&format!("Loading recipe {id}..."));
    let fetched = state.gateway.fetch_draft(&id).await;
    spin.finish_and_clear();

    let draft = match fetched {
        Ok(draft) => draft,
        Err(e) => {
            tracing::debug!(error = %e, "fetch failed");
            anyhow::bail!("{} ({})", e.user_message(), e.reason);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&draft)?);
        return Ok(());
    }

    print_draft(&draft);
    Ok(())
}

/// Header line plus one table per populated section.
pub fn print_draft(draft: &RecipeDraft) {
    let title = if draft.name.is_empty() {
        "(untitled)".to_string()
    } else {
        draft.name.clone()
    };

    println!();
    match &draft.draft_id {
        Some(id) => println!("  {} {}", style(&title).cyan().bold(), style(format!("[{id}]")).dim()),
        None => println!("  {} {}", style(&title).cyan().bold(), style("[not saved]").dim()),
    }
    println!();

    for (label, value) in detail_rows(draft) {
        println!("  {:<14} {}", style(label).bold(), value);
    }

    if !draft.containers.is_empty() {
        let mut t = table(&["Container", "Ingredients"]);
        for container in &draft.containers {
            let contents = container
                .ingredients
                .iter()
                .map(format_addition)
                .collect::<Vec<_>>()
                .join("\n");
            t.add_row(vec![
                Cell::new(format!("#{} {}", container.id, container.name)),
                Cell::new(if contents.is_empty() { "(empty)".to_string() } else { contents }),
            ]);
        }
        println!();
        println!("{t}");
    }

    if !draft.seasonings.is_empty() || !draft.water_oil.is_empty() {
        let mut t = table(&["Bucket", "Addition"]);
        for addition in &draft.seasonings {
            t.add_row(vec![Cell::new("seasonings"), Cell::new(format_addition(addition))]);
        }
        for addition in &draft.water_oil {
            t.add_row(vec![Cell::new("water/oil"), Cell::new(format_addition(addition))]);
        }
        println!();
        println!("{t}");
    }

    if !draft.instructions.is_empty() {
        let mut t = table(&["#", "Instruction"]);
        for step in &draft.instructions {
            t.add_row(vec![
                Cell::new(step.step).fg(Color::DarkGrey),
                Cell::new(&step.instruction),
            ]);
        }
        println!();
        println!("{t}");
    }

    if !draft.narrative.is_empty() {
        println!();
        println!("  {}", style("Notes").bold());
        for line in draft.narrative.lines() {
            println!("    {line}");
        }
    }
    println!();
}

fn detail_rows(draft: &RecipeDraft) -> Vec<(&'static str, String)> {
    let mut rows = Vec::new();
    let mut push = |label: &'static str, value: Option<String>| {
        if let Some(value) = value {
            rows.push((label, value));
        }
    };
    push("Author", draft.author.clone());
    push("Cuisine", draft.cuisine.clone());
    push("Category", draft.category.clone());
    push("Difficulty", draft.difficulty.clone());
    push("Price", draft.price.map(|p| format!("{p:.2}")));
    push("Cooking time", draft.cooking_time.map(|m| format!("{m} min")));
    push("Serves", draft.serving_size.map(|s| s.to_string()));
    push(
        "Preparation",
        draft.preparation_required.map(|required| {
            if required {
                let names = draft
                    .preparation_items
                    .iter()
                    .map(|i| i.name.as_str())
                    .collect::<Vec<_>>();
                format!("required ({})", names.join(", "))
            } else {
                "none".to_string()
            }
        }),
    );
    if !draft.utensils.is_empty() {
        push(
            "Utensils",
            Some(
                draft
                    .utensils
                    .iter()
                    .map(|u| u.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
        );
    }
    push("Image", draft.image.clone());
    rows
}
