//! Interactive authoring wizard (`larder author`, `larder resume`, `larder edit`).
//!
//! Walks the author through the five steps with dialoguer menus. Every step
//! ends with the same navigation entries (continue, back, save and quit).
//! After each navigation the session is autosaved to the local session store
//! so an interrupted run can be picked up with `larder resume`.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use console::style;
use dialoguer::{Confirm, Input, Select};

use larder_core::authoring::sequencer::StepSequencer;
use larder_core::authoring::session::{AuthoringSession, SessionSnapshot};
use larder_core::repository::session_draft::SessionDraftStore;
use larder_infra::gateway::AnyGateway;
use larder_types::authoring::{AuthoringStep, Bucket};
use larder_types::catalog::{CatalogItem, CatalogKind};
use larder_types::error::AuthoringError;
use larder_types::recipe::{ContainerId, DraftPatch, RecipeDraft, RecipeId};

use super::output::{format_addition, report_error, spinner, success, warn};
use super::recipe::print_draft;
use super::sessions::parse_session_id;
use crate::state::AppState;

type Session<'a> = AuthoringSession<&'a AnyGateway>;

const BACK: &str = "< Back";
const SAVE_AND_QUIT: &str = "Save and quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nav {
    Next,
    Back,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Action(usize),
    Nav(Nav),
}

/// Start a new recipe from an empty draft.
pub async fn run_author(state: &AppState) -> Result<()> {
    let session = AuthoringSession::start(&state.gateway, state.catalog.clone(), state.default_unit());

    println!();
    println!(
        "  {} New recipe {}",
        style("*").cyan().bold(),
        style(format!("(saving to {})", state.gateway.describe())).dim()
    );

    run_wizard(state, session, Utc::now()).await
}

/// Pick up an autosaved session, by ID or from a list.
pub async fn run_resume(state: &AppState, session: Option<String>) -> Result<()> {
    let session_id = match session {
        Some(raw) => parse_session_id(&raw)?,
        None => {
            let drafts = state.session_store.list_drafts().await?;
            if drafts.is_empty() {
                println!();
                println!("  {}", style("No autosaved sessions to resume.").dim());
                println!();
                return Ok(());
            }

            let items: Vec<String> = drafts
                .iter()
                .map(|d| {
                    let name = if d.recipe_name.is_empty() {
                        "(untitled)"
                    } else {
                        d.recipe_name.as_str()
                    };
                    format!(
                        "{name} -- {} step, updated {}",
                        d.step,
                        d.updated_at.format("%Y-%m-%d %H:%M")
                    )
                })
                .collect();

            let selection = Select::new()
                .with_prompt("Resume which session?")
                .items(&items)
                .default(0)
                .interact()?;
            drafts[selection].session_id
        }
    };

    let saved = state
        .session_store
        .load_draft(&session_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("No autosaved session {session_id}"))?;
    let snapshot = SessionSnapshot::from_session_draft(&saved)?;
    let session = AuthoringSession::from_snapshot(
        &state.gateway,
        state.catalog.clone(),
        state.default_unit(),
        snapshot,
    )?;

    println!();
    println!(
        "  {} Resuming at {}",
        style("*").cyan().bold(),
        style(session.step().label()).bold()
    );

    run_wizard(state, session, saved.created_at).await
}

/// Load a recipe that already exists on the backend and edit it.
pub async fn run_edit(state: &AppState, id: &str) -> Result<()> {
    let id = RecipeId::new(id);
    let spin = spinner(&format!("Loading recipe {id}..."));
    let resumed = AuthoringSession::resume(
        &state.gateway,
        state.catalog.clone(),
        state.default_unit(),
        &id,
    )
    .await;
    spin.finish_and_clear();

    let session = match resumed {
        Ok(session) => session,
        Err(AuthoringError::Persistence(e)) => {
            anyhow::bail!("{} ({})", e.user_message(), e.reason)
        }
        Err(e) => return Err(e.into()),
    };

    println!();
    println!(
        "  {} Editing {}",
        style("*").cyan().bold(),
        style(&session.draft().name).bold()
    );

    run_wizard(state, session, Utc::now()).await
}

async fn run_wizard(state: &AppState, mut session: Session<'_>, created_at: DateTime<Utc>) -> Result<()> {
    loop {
        print_step_header(session.step());

        let nav = match session.step() {
            AuthoringStep::BasicDetails => basic_details(state, &mut session).await?,
            AuthoringStep::IngredientSelection => ingredient_selection(&mut session)?,
            AuthoringStep::PreparationActions => preparation_actions(&mut session)?,
            AuthoringStep::ServingBreakdown => serving_breakdown(&mut session)?,
            AuthoringStep::CookingInstructions => cooking_instructions(&mut session)?,
        };

        match nav {
            Nav::Next if session.step().is_last() => {
                let spin = spinner("Saving recipe...");
                let result = session.finish().await;
                spin.finish_and_clear();

                match result {
                    Ok(id) => {
                        if let Err(e) = state.session_store.delete_draft(&session.session_id()).await {
                            tracing::warn!(error = %e, "failed to discard autosave after finish");
                        }
                        println!();
                        success(&format!("Recipe saved as {}", style(&id).cyan().bold()));
                        print_draft(session.draft());
                        return Ok(());
                    }
                    Err(e) => report_error(&e),
                }
            }
            Nav::Next => {
                let spin = StepSequencer::persists_on_advance(session.step())
                    .then(|| spinner("Saving draft..."));
                let result = session.next().await;
                if let Some(spin) = spin {
                    spin.finish_and_clear();
                }
                if let Err(e) = result {
                    report_error(&e);
                }
            }
            Nav::Back => {
                if session.prev()?.is_none() {
                    let leave = Confirm::new()
                        .with_prompt("Leave the wizard? Progress is kept as an autosave")
                        .default(false)
                        .interact()?;
                    if leave {
                        let saved = autosave(state, &session, created_at).await;
                        print_resume_hint(&session, saved);
                        return Ok(());
                    }
                }
            }
            Nav::Quit => {
                let saved = autosave(state, &session, created_at).await;
                print_resume_hint(&session, saved);
                return Ok(());
            }
        }

        autosave(state, &session, created_at).await;
    }
}

/// Persist the session snapshot. Returns whether the save went through.
async fn autosave(state: &AppState, session: &Session<'_>, created_at: DateTime<Utc>) -> bool {
    let saved = match session.snapshot().to_session_draft(created_at) {
        Ok(saved) => saved,
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize session snapshot");
            return false;
        }
    };
    match state.session_store.save_draft(saved).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(session_id = %session.session_id(), error = %e, "autosave failed");
            false
        }
    }
}

fn print_resume_hint(session: &Session<'_>, saved: bool) {
    println!();
    println!("  {}", leave_message(saved, &session.session_id().to_string()));
    println!();
}

fn leave_message(saved: bool, session_id: &str) -> String {
    if saved {
        format!(
            "Progress saved. Continue with {}",
            style(format!("larder resume {session_id}")).cyan()
        )
    } else {
        style("Progress could not be saved; this session cannot be resumed.")
            .yellow()
            .to_string()
    }
}

fn print_step_header(step: AuthoringStep) {
    println!();
    println!(
        "  {} {}",
        style(format!("Step {}/{}", step.index() + 1, AuthoringStep::ALL.len())).dim(),
        style(step.label()).cyan().bold()
    );
    println!();
}

/// Show `actions` followed by the navigation entries.
fn menu(prompt: &str, actions: &[&str], next_label: &str) -> Result<Choice> {
    let mut items: Vec<&str> = actions.to_vec();
    items.extend([next_label, BACK, SAVE_AND_QUIT]);

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()?;
    Ok(choice_for(selection, actions.len()))
}

fn choice_for(selection: usize, action_count: usize) -> Choice {
    if selection < action_count {
        return Choice::Action(selection);
    }
    match selection - action_count {
        0 => Choice::Nav(Nav::Next),
        1 => Choice::Nav(Nav::Back),
        _ => Choice::Nav(Nav::Quit),
    }
}

fn text_input(prompt: &str, initial: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?;
    Ok(value.trim().to_string())
}

fn optional_input(prompt: &str, initial: Option<&str>) -> Result<Option<String>> {
    let value = text_input(prompt, initial.unwrap_or_default())?;
    Ok((!value.is_empty()).then_some(value))
}

/// Pick one catalog entry of `kind`. `None` when the catalog has none or
/// the author backs out.
fn pick_catalog_item(session: &Session<'_>, kind: CatalogKind) -> Result<Option<CatalogItem>> {
    let items = session.catalog().items(kind);
    if items.is_empty() {
        warn(&format!("The catalog has no {kind} entries"));
        return Ok(None);
    }

    let mut labels: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    labels.push(BACK);
    let selection = Select::new()
        .with_prompt(format!("Choose {kind}"))
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(items.get(selection).cloned())
}

fn pick_container(draft: &RecipeDraft, prompt: &str) -> Result<Option<ContainerId>> {
    if draft.containers.is_empty() {
        warn("Add a container first");
        return Ok(None);
    }

    let mut labels: Vec<String> = draft
        .containers
        .iter()
        .map(|c| format!("#{} {}", c.id, c.name))
        .collect();
    labels.push(BACK.to_string());
    let selection = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(draft.containers.get(selection).map(|c| c.id))
}

// ---------------------------------------------------------------------------
// Step 1: basic details
// ---------------------------------------------------------------------------

async fn basic_details(state: &AppState, session: &mut Session<'_>) -> Result<Nav> {
    loop {
        print_basic_details(session.draft());

        match menu("Basic details", &["Edit details", "Attach image"], "Continue")? {
            Choice::Nav(nav) => return Ok(nav),
            Choice::Action(0) => edit_basic_details(session)?,
            Choice::Action(_) => attach_image(state, session).await?,
        }
    }
}

fn print_basic_details(draft: &RecipeDraft) {
    let show = |value: Option<&str>| match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => style("-").dim().to_string(),
    };
    println!("  {:<12} {}", "Name", show(Some(draft.name.as_str())));
    println!("  {:<12} {}", "Author", show(draft.author.as_deref()));
    println!("  {:<12} {}", "Cuisine", show(draft.cuisine.as_deref()));
    println!("  {:<12} {}", "Category", show(draft.category.as_deref()));
    println!("  {:<12} {}", "Difficulty", show(draft.difficulty.as_deref()));
    println!(
        "  {:<12} {}",
        "Price",
        show(draft.price.map(|p| format!("{p:.2}")).as_deref())
    );
    println!("  {:<12} {}", "Image", show(draft.image.as_deref()));
    println!();
}

fn edit_basic_details(session: &mut Session<'_>) -> Result<()> {
    let draft = session.draft().clone();

    let name = text_input("Recipe name", &draft.name)?;
    let author = optional_input("Author", draft.author.as_deref())?;
    let cuisine = optional_input("Cuisine", draft.cuisine.as_deref())?;
    let category = optional_input("Category", draft.category.as_deref())?;
    let difficulty = optional_input("Difficulty", draft.difficulty.as_deref())?;

    let current_price = draft.price.map(|p| p.to_string());
    let price = loop {
        let raw = optional_input("Price", current_price.as_deref())?;
        match parse_price(raw.as_deref()) {
            Ok(price) => break price,
            Err(message) => warn(&message),
        }
    };

    let device_support = Confirm::new()
        .with_prompt("Can it be cooked on a smart cooking device?")
        .default(draft.device_support.unwrap_or(false))
        .interact()?;

    let patch = DraftPatch {
        name: Some(name),
        author,
        cuisine,
        category,
        difficulty,
        price,
        device_support: Some(device_support),
        ..Default::default()
    };
    if let Err(e) = session.update(patch) {
        report_error(&e);
    }
    Ok(())
}

fn parse_price(raw: Option<&str>) -> Result<Option<f64>, String> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let normalized = raw.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(Some(price)),
        _ => Err(format!("'{raw}' is not a valid price")),
    }
}

async fn attach_image(state: &AppState, session: &mut Session<'_>) -> Result<()> {
    if !state.uploader.is_configured() {
        warn("Image upload is not configured (set media.upload_url in config.toml)");
        return Ok(());
    }

    let raw: String = Input::new().with_prompt("Image file path").interact_text()?;
    let path = PathBuf::from(raw.trim());
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn(&format!("Cannot read {}: {e}", path.display()));
            return Ok(());
        }
    };
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    let spin = spinner("Uploading image...");
    let result = session.attach_image(&state.uploader, bytes, &file_name).await;
    spin.finish_and_clear();

    match result {
        Ok(url) => success(&format!("Image attached: {url}")),
        Err(e) => report_error(&e),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Step 2: ingredients
// ---------------------------------------------------------------------------

const INGREDIENT_ACTIONS: [&str; 8] = [
    "Add container",
    "Put an ingredient in a container",
    "Add seasoning",
    "Add water/oil",
    "Remove an addition",
    "Move an ingredient between containers",
    "Rename container",
    "Remove container",
];

fn ingredient_selection(session: &mut Session<'_>) -> Result<Nav> {
    loop {
        print_ingredients(session.draft());

        match menu("Ingredients", &INGREDIENT_ACTIONS, "Continue")? {
            Choice::Nav(nav) => return Ok(nav),
            Choice::Action(0) => {
                let suggested = session
                    .draft()
                    .next_container_id()
                    .map(|id| format!("Container {id}"))
                    .unwrap_or_default();
                let name = text_input("Container name", &suggested)?;
                match session.add_container(&name) {
                    Ok(id) => success(&format!("Added container #{id}")),
                    Err(e) => report_error(&e),
                }
            }
            Choice::Action(1) => {
                if let Some(id) = pick_container(session.draft(), "Into which container?")? {
                    place(session, CatalogKind::Ingredient, Bucket::Container(id))?;
                }
            }
            Choice::Action(2) => place(session, CatalogKind::Seasoning, Bucket::Seasonings)?,
            Choice::Action(3) => place(session, CatalogKind::Ingredient, Bucket::WaterOil)?,
            Choice::Action(4) => remove_addition(session)?,
            Choice::Action(5) => move_addition(session)?,
            Choice::Action(6) => {
                if let Some(id) = pick_container(session.draft(), "Rename which container?")? {
                    let current = session
                        .draft()
                        .container(id)
                        .map(|c| c.name.clone())
                        .unwrap_or_default();
                    let name = text_input("New name", &current)?;
                    if let Err(e) = session.rename_container(id, &name) {
                        report_error(&e);
                    }
                }
            }
            Choice::Action(_) => {
                if let Some(id) = pick_container(session.draft(), "Remove which container?")? {
                    let confirmed = Confirm::new()
                        .with_prompt(format!("Remove container #{id} and everything in it?"))
                        .default(false)
                        .interact()?;
                    if confirmed {
                        if let Err(e) = session.remove_container(id) {
                            report_error(&e);
                        }
                    }
                }
            }
        }
    }
}

fn print_ingredients(draft: &RecipeDraft) {
    if draft.containers.is_empty() {
        println!("  {}", style("No containers yet.").dim());
    }
    for container in &draft.containers {
        println!("  {} {}", style(format!("#{}", container.id)).dim(), style(&container.name).bold());
        for addition in &container.ingredients {
            println!("      {}", format_addition(addition));
        }
    }
    for (label, additions) in [("Seasonings", &draft.seasonings), ("Water/oil", &draft.water_oil)] {
        if !additions.is_empty() {
            println!("  {}", style(label).bold());
            for addition in additions {
                println!("      {}", format_addition(addition));
            }
        }
    }
    println!();
}

/// Choose an item, then ask for its quantity until it is valid or the
/// author leaves the quantity empty to cancel.
fn place(session: &mut Session<'_>, kind: CatalogKind, bucket: Bucket) -> Result<()> {
    let Some(item) = pick_catalog_item(session, kind)? else {
        return Ok(());
    };
    let name = item.name.clone();
    if let Err(e) = session.begin_placement(item, bucket) {
        report_error(&e);
        return Ok(());
    }

    let default_unit = session.default_unit().to_string();
    loop {
        let quantity = text_input(&format!("Quantity of {name} (empty to cancel)"), "")?;
        if quantity.is_empty() {
            session.cancel_placement();
            return Ok(());
        }
        let units = optional_input("Units", Some(default_unit.as_str()))?;

        match session.confirm_placement(&quantity, units.as_deref()) {
            Ok(addition) => {
                success(&format!("{} added to {bucket}", format_addition(&addition)));
                return Ok(());
            }
            Err(e @ AuthoringError::InvalidQuantity { .. }) => report_error(&e),
            Err(e) => {
                report_error(&e);
                return Ok(());
            }
        }
    }
}

/// Every addition in the draft with the bucket it sits in.
fn all_additions(draft: &RecipeDraft) -> Vec<(Bucket, String, String)> {
    let mut entries = Vec::new();
    for container in &draft.containers {
        for a in &container.ingredients {
            entries.push((Bucket::Container(container.id), a.id.clone(), a.name.clone()));
        }
    }
    for a in &draft.seasonings {
        entries.push((Bucket::Seasonings, a.id.clone(), a.name.clone()));
    }
    for a in &draft.water_oil {
        entries.push((Bucket::WaterOil, a.id.clone(), a.name.clone()));
    }
    entries
}

fn remove_addition(session: &mut Session<'_>) -> Result<()> {
    let entries = all_additions(session.draft());
    if entries.is_empty() {
        warn("Nothing to remove");
        return Ok(());
    }

    let mut labels: Vec<String> = entries
        .iter()
        .map(|(bucket, _, name)| format!("{name} ({bucket})"))
        .collect();
    labels.push(BACK.to_string());
    let selection = Select::new()
        .with_prompt("Remove which addition?")
        .items(&labels)
        .default(0)
        .interact()?;

    if let Some((bucket, id, name)) = entries.get(selection) {
        match session.remove_addition(*bucket, id) {
            Ok(true) => success(&format!("Removed {name} from {bucket}")),
            Ok(false) => {}
            Err(e) => report_error(&e),
        }
    }
    Ok(())
}

fn move_addition(session: &mut Session<'_>) -> Result<()> {
    let entries: Vec<(ContainerId, String, String)> = all_additions(session.draft())
        .into_iter()
        .filter_map(|(bucket, id, name)| match bucket {
            Bucket::Container(container) => Some((container, id, name)),
            _ => None,
        })
        .collect();
    if entries.is_empty() {
        warn("No container ingredients to move");
        return Ok(());
    }

    let mut labels: Vec<String> = entries
        .iter()
        .map(|(container, _, name)| format!("{name} (container #{container})"))
        .collect();
    labels.push(BACK.to_string());
    let selection = Select::new()
        .with_prompt("Move which ingredient?")
        .items(&labels)
        .default(0)
        .interact()?;
    let Some((from, id, _)) = entries.get(selection) else {
        return Ok(());
    };

    if let Some(to) = pick_container(session.draft(), "Move it to which container?")? {
        match session.move_addition(id, *from, to) {
            Ok(()) => success(&format!("Moved to container #{to}")),
            Err(e) => report_error(&e),
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Step 3: preparation
// ---------------------------------------------------------------------------

const PREPARATION_ACTIONS: [&str; 5] = [
    "Set whether preparation is required",
    "Add preparation action",
    "Remove preparation action",
    "Add utensil",
    "Remove utensil",
];

fn preparation_actions(session: &mut Session<'_>) -> Result<Nav> {
    loop {
        let draft = session.draft();
        let required = match draft.preparation_required {
            Some(true) => "yes",
            Some(false) => "no",
            None => "not set",
        };
        println!("  {:<22} {}", "Preparation required", required);
        println!("  {:<22} {}", "Preparation actions", names(&draft.preparation_items));
        println!("  {:<22} {}", "Utensils", names(&draft.utensils));
        println!();

        match menu("Preparation", &PREPARATION_ACTIONS, "Continue")? {
            Choice::Nav(nav) => return Ok(nav),
            Choice::Action(0) => {
                let required = Confirm::new()
                    .with_prompt("Does this recipe need preparation before cooking?")
                    .default(session.draft().preparation_required.unwrap_or(false))
                    .interact()?;
                let patch = DraftPatch {
                    preparation_required: Some(required),
                    ..Default::default()
                };
                if let Err(e) = session.update(patch) {
                    report_error(&e);
                }
            }
            Choice::Action(1) => {
                if let Some(item) = pick_catalog_item(session, CatalogKind::PreparationAction)? {
                    if let Err(e) = session.add_preparation_item(item) {
                        report_error(&e);
                    }
                }
            }
            Choice::Action(2) => {
                let items = session.draft().preparation_items.clone();
                if let Some(id) = pick_existing(&items, "Remove which action?")? {
                    if let Err(e) = session.remove_preparation_item(&id) {
                        report_error(&e);
                    }
                }
            }
            Choice::Action(3) => {
                if let Some(item) = pick_catalog_item(session, CatalogKind::Utensil)? {
                    if let Err(e) = session.add_utensil(item) {
                        report_error(&e);
                    }
                }
            }
            Choice::Action(_) => {
                let items = session.draft().utensils.clone();
                if let Some(id) = pick_existing(&items, "Remove which utensil?")? {
                    if let Err(e) = session.remove_utensil(&id) {
                        report_error(&e);
                    }
                }
            }
        }
    }
}

fn names(items: &[CatalogItem]) -> String {
    if items.is_empty() {
        return style("-").dim().to_string();
    }
    items.iter().map(|i| i.name.as_str()).collect::<Vec<_>>().join(", ")
}

fn pick_existing(items: &[CatalogItem], prompt: &str) -> Result<Option<String>> {
    if items.is_empty() {
        warn("Nothing to remove");
        return Ok(None);
    }
    let mut labels: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    labels.push(BACK);
    let selection = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(items.get(selection).map(|i| i.id.clone()))
}

// ---------------------------------------------------------------------------
// Step 4: serving
// ---------------------------------------------------------------------------

fn serving_breakdown(session: &mut Session<'_>) -> Result<Nav> {
    loop {
        let draft = session.draft();
        println!(
            "  {:<14} {}",
            "Serves",
            draft.serving_size.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string())
        );
        println!(
            "  {:<14} {}",
            "Cooking time",
            draft
                .cooking_time
                .map(|m| format!("{m} min"))
                .unwrap_or_else(|| "-".to_string())
        );
        println!();

        match menu("Serving", &["Set serving size and cooking time"], "Continue")? {
            Choice::Nav(nav) => return Ok(nav),
            Choice::Action(_) => {
                let draft = session.draft();
                let serving_size: u32 = Input::new()
                    .with_prompt("Number of servings")
                    .default(draft.serving_size.unwrap_or(2))
                    .interact_text()?;
                let cooking_time: u32 = Input::new()
                    .with_prompt("Cooking time (minutes)")
                    .default(draft.cooking_time.unwrap_or(30))
                    .interact_text()?;

                let patch = DraftPatch {
                    serving_size: Some(serving_size),
                    cooking_time: Some(cooking_time),
                    ..Default::default()
                };
                if let Err(e) = session.update(patch) {
                    report_error(&e);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Step 5: instructions
// ---------------------------------------------------------------------------

const INSTRUCTION_ACTIONS: [&str; 6] = [
    "Add instruction from catalog",
    "Add ingredient instruction",
    "Write notes",
    "Remove an instruction",
    "Start a new instruction group",
    "Remove an instruction group",
];

fn cooking_instructions(session: &mut Session<'_>) -> Result<Nav> {
    loop {
        print_contexts(session);

        match menu("Instructions", &INSTRUCTION_ACTIONS, "Finish and save")? {
            Choice::Nav(nav) => return Ok(nav),
            Choice::Action(0) => {
                let index = pick_context(session)?;
                if let Some(item) = pick_catalog_item(session, CatalogKind::Instruction)? {
                    if let Err(e) = session.append_catalog_instruction(index, &item) {
                        report_error(&e);
                    }
                }
            }
            Choice::Action(1) => {
                let index = pick_context(session)?;
                if let Some(item) = pick_catalog_item(session, CatalogKind::Ingredient)? {
                    add_ingredient_instruction(session, index, &item)?;
                }
            }
            Choice::Action(2) => {
                let index = pick_context(session)?;
                let current = session
                    .contexts()
                    .get(index)
                    .map(|c| c.narrative.clone())
                    .unwrap_or_default();
                let text = text_input("Notes", &current)?;
                if let Err(e) = session.set_narrative(index, &text) {
                    report_error(&e);
                }
            }
            Choice::Action(3) => remove_instruction(session)?,
            Choice::Action(4) => match session.add_context() {
                Ok(index) => success(&format!("Started group {}", index + 1)),
                Err(e) => report_error(&e),
            },
            Choice::Action(_) => {
                let index = pick_context(session)?;
                if let Err(e) = session.remove_context(index) {
                    report_error(&e);
                }
            }
        }
    }
}

fn print_contexts(session: &Session<'_>) {
    for (i, context) in session.contexts().iter().enumerate() {
        println!("  {}", style(format!("Group {}", i + 1)).bold());
        if context.steps.is_empty() && context.narrative.is_empty() {
            println!("      {}", style("(empty)").dim());
        }
        for step in &context.steps {
            println!("      {}. {}", step.step, step.instruction);
        }
        for line in context.narrative.lines() {
            println!("      {}", style(line).italic());
        }
    }
    println!();
}

/// Which instruction group to act on. Skips the prompt when there is only one.
fn pick_context(session: &Session<'_>) -> Result<usize> {
    let count = session.contexts().len();
    if count <= 1 {
        return Ok(0);
    }
    let labels: Vec<String> = (1..=count).map(|i| format!("Group {i}")).collect();
    let selection = Select::new()
        .with_prompt("Which group?")
        .items(&labels)
        .default(count - 1)
        .interact()?;
    Ok(selection)
}

fn add_ingredient_instruction(session: &mut Session<'_>, index: usize, item: &CatalogItem) -> Result<()> {
    let default_unit = session.default_unit().to_string();
    loop {
        let quantity = text_input(&format!("Quantity of {} (empty to cancel)", item.name), "")?;
        if quantity.is_empty() {
            return Ok(());
        }
        let units = optional_input("Units", Some(default_unit.as_str()))?;

        match session.append_ingredient_instruction(index, item, &quantity, units.as_deref()) {
            Ok(step) => {
                success(&format!("Added: {}", step.instruction));
                return Ok(());
            }
            Err(e @ AuthoringError::InvalidQuantity { .. }) => report_error(&e),
            Err(e) => {
                report_error(&e);
                return Ok(());
            }
        }
    }
}

fn remove_instruction(session: &mut Session<'_>) -> Result<()> {
    let entries: Vec<(usize, String)> = session
        .contexts()
        .iter()
        .enumerate()
        .flat_map(|(i, c)| c.steps.iter().map(move |s| (i, s.instruction.clone())))
        .collect();
    if entries.is_empty() {
        warn("No instructions to remove");
        return Ok(());
    }

    let mut labels: Vec<String> = entries
        .iter()
        .map(|(i, text)| format!("{text} (group {})", i + 1))
        .collect();
    labels.push(BACK.to_string());
    let selection = Select::new()
        .with_prompt("Remove which instruction?")
        .items(&labels)
        .default(0)
        .interact()?;

    if let Some((index, text)) = entries.get(selection) {
        match session.remove_instruction(*index, text) {
            Ok(true) => success("Instruction removed"),
            Ok(false) => {}
            Err(e) => report_error(&e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leave_message_only_offers_resume_after_a_save() {
        let saved = leave_message(true, "0192");
        assert!(saved.contains("Progress saved"));
        assert!(saved.contains("larder resume 0192"));

        let failed = leave_message(false, "0192");
        assert!(!failed.contains("Progress saved"));
        assert!(!failed.contains("larder resume"));
    }

    #[test]
    fn test_choice_for_maps_navigation_entries() {
        assert_eq!(choice_for(0, 2), Choice::Action(0));
        assert_eq!(choice_for(1, 2), Choice::Action(1));
        assert_eq!(choice_for(2, 2), Choice::Nav(Nav::Next));
        assert_eq!(choice_for(3, 2), Choice::Nav(Nav::Back));
        assert_eq!(choice_for(4, 2), Choice::Nav(Nav::Quit));
        assert_eq!(choice_for(0, 0), Choice::Nav(Nav::Next));
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(None), Ok(None));
        assert_eq!(parse_price(Some("4.5")), Ok(Some(4.5)));
        assert_eq!(parse_price(Some(" 3,25 ")), Ok(Some(3.25)));
        assert_eq!(parse_price(Some("0")), Ok(Some(0.0)));
        assert!(parse_price(Some("-1")).is_err());
        assert!(parse_price(Some("cheap")).is_err());
        assert!(parse_price(Some("inf")).is_err());
    }

    #[test]
    fn test_all_additions_lists_every_bucket() {
        use larder_types::quantity::Quantity;
        use larder_types::recipe::{Container, IngredientAddition};

        let addition = |id: &str| {
            IngredientAddition::from_catalog(
                &CatalogItem::new(id, id.to_uppercase()),
                Quantity::new(1.0).unwrap(),
                None,
            )
        };
        let draft = RecipeDraft {
            containers: vec![Container {
                id: ContainerId(2),
                name: "Pot".to_string(),
                ingredients: vec![addition("onion")],
            }],
            seasonings: vec![addition("salt")],
            water_oil: vec![addition("oil")],
            ..Default::default()
        };

        let entries = all_additions(&draft);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].0, Bucket::Container(ContainerId(2)));
        assert_eq!(entries[1], (Bucket::Seasonings, "salt".to_string(), "SALT".to_string()));
        assert_eq!(entries[2].0, Bucket::WaterOil);
    }
}
