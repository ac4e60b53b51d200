//! `larder catalog`: list what the author can pick from.

use comfy_table::{Cell, Color};
use console::style;

use larder_types::catalog::{CatalogItem, CatalogKind};

use super::output::table;
use crate::state::AppState;

pub fn list_catalog(state: &AppState, kind: Option<&str>, json: bool) -> anyhow::Result<()> {
    let kinds: Vec<CatalogKind> = match kind {
        Some(raw) => vec![raw.parse::<CatalogKind>().map_err(anyhow::Error::msg)?],
        None => CatalogKind::ALL.to_vec(),
    };

    let entries: Vec<(CatalogKind, &CatalogItem)> = kinds
        .iter()
        .flat_map(|k| state.catalog.items(*k).iter().map(move |item| (*k, item)))
        .collect();

    if json {
        let value: Vec<_> = entries
            .iter()
            .map(|(k, item)| {
                serde_json::json!({
                    "kind": k.to_string(),
                    "id": item.id,
                    "name": item.name,
                    "image": item.image,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        println!("  {}", style("The catalog is empty.").dim());
        println!();
        return Ok(());
    }

    let mut t = table(&["Kind", "ID", "Name", "Image"]);
    for (k, item) in &entries {
        t.add_row(vec![
            Cell::new(k.to_string()).fg(Color::DarkGrey),
            Cell::new(&item.id),
            Cell::new(&item.name),
            Cell::new(item.image.as_deref().unwrap_or("-")),
        ]);
    }
    println!();
    println!("{t}");
    println!();
    Ok(())
}
