//! `larder sessions`: list or discard autosaved authoring sessions.

use comfy_table::{Cell, Color};
use console::style;
use uuid::Uuid;

use larder_core::repository::session_draft::SessionDraftStore;

use super::output::{format_relative_time, success, table, truncate};
use crate::state::AppState;

pub async fn list_sessions(state: &AppState, json: bool) -> anyhow::Result<()> {
    let drafts = state.session_store.list_drafts().await?;

    if json {
        let value: Vec<_> = drafts
            .iter()
            .map(|d| {
                serde_json::json!({
                    "session_id": d.session_id,
                    "recipe_name": d.recipe_name,
                    "step": d.step,
                    "updated_at": d.updated_at,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if drafts.is_empty() {
        println!();
        println!("  {}", style("No autosaved sessions.").dim());
        println!();
        return Ok(());
    }

    let mut t = table(&["Session", "Recipe", "Step", "Updated"]);
    for d in &drafts {
        let name = if d.recipe_name.is_empty() {
            "(untitled)".to_string()
        } else {
            truncate(&d.recipe_name, 40)
        };
        t.add_row(vec![
            Cell::new(d.session_id).fg(Color::DarkGrey),
            Cell::new(name),
            Cell::new(&d.step),
            Cell::new(format_relative_time(&d.updated_at)),
        ]);
    }
    println!();
    println!("{t}");
    println!();
    println!(
        "  Resume with {}",
        style("larder resume <session>").cyan()
    );
    println!();
    Ok(())
}

pub async fn delete_session(state: &AppState, session_id: &str, json: bool) -> anyhow::Result<()> {
    let session_id = parse_session_id(session_id)?;
    state.session_store.delete_draft(&session_id).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "deleted": session_id }))?
        );
    } else {
        println!();
        success(&format!("Discarded session {session_id}"));
        println!();
    }
    Ok(())
}

pub fn parse_session_id(raw: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| anyhow::anyhow!("'{raw}' is not a valid session ID"))
}
