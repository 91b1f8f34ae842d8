//! Paste recipe text on stdin and save it as a recipe
//!
//! This example demonstrates the whole editing flow:
//! 1. Segment pasted text into steps
//! 2. Tidy the steps (drop blank ones, merge a dangling fragment)
//! 3. Save into an in-memory store and print the draft as JSON
//!
//! Run with: `printf '1. Boil water\n2. Add pasta' | cargo run --example paste_to_steps -- "Pasta"`

use std::io::Read;

use paste_recipe::{Draft, InMemoryRecipeStore, RecipeStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let title = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Pasted recipe".to_string());

    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;

    let segmenter = paste_recipe::load_segmenter()?;
    let mut draft = Draft::with_segmenter(segmenter.into());
    draft.set_title(title);
    draft.set_source_text(text);
    draft.run_segmentation();

    println!("=== Parsed {} steps ===", draft.steps().len());
    for (i, step) in draft.steps().iter().enumerate() {
        println!("{:>2}. {}", i + 1, step.instruction());
    }

    // A lowercase start usually means the step was cut mid-sentence
    let fragments: Vec<_> = draft
        .steps()
        .iter()
        .skip(1)
        .filter(|step| step.instruction().starts_with(char::is_lowercase))
        .map(|step| step.id())
        .collect();
    for id in fragments {
        draft.merge_steps(id, false);
    }

    if !draft.can_save() {
        println!("\nNothing to save: the draft needs a title and at least one step.");
        return Ok(());
    }

    let store = InMemoryRecipeStore::new();
    let id = draft.save(&store).await?;

    println!("\n=== Saved as recipe {} ===", id);
    println!("{}", serde_json::to_string_pretty(&draft.snapshot())?);

    if let Some(details) = store.get_recipe_with_details(id).await? {
        println!("\nStored {} steps", details.steps.len());
    }

    Ok(())
}
