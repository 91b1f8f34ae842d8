//! Segment pasted text off the interactive task
//!
//! Shows how a UI keeps typing responsive: segmentation runs on a blocking
//! worker and its result is discarded if the user edited the text meanwhile.

use paste_recipe::Draft;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut draft = Draft::new();
    draft.set_source_text("Step 1: Soak the beans overnight\nStep 2: Simmer for an hour");

    // The user keeps typing while the first run is in progress
    let job = draft.begin_segmentation();
    let stale = tokio::task::spawn_blocking(move || job.run());
    draft.set_source_text(
        "Step 1: Soak the beans overnight\nStep 2: Simmer for an hour\nStep 3: Salt to taste",
    );

    let applied = draft.apply_segmentation(stale.await?);
    println!("First run applied: {} (parsed: {})", applied, draft.parsed());

    let job = draft.begin_segmentation();
    let fresh = tokio::task::spawn_blocking(move || job.run()).await?;
    let applied = draft.apply_segmentation(fresh);
    println!("Second run applied: {} (parsed: {})", applied, draft.parsed());

    for step in draft.steps().iter() {
        println!("[{}] {}", step.id(), step.instruction());
    }

    Ok(())
}
