use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use wg_core::{ContentPack, validate_pack};

pub fn run(path: &Path) -> Result<(), String> {
    let pack = ContentPack::from_file(path).map_err(|e| e.to_string())?;
    let issues = validate_pack(&pack);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Snippet", "Title", "Options", "Locations", "Biomes"]);
    for snippet in &pack.snippets {
        let or_any = |list: &[String]| {
            if list.is_empty() {
                "any".to_string()
            } else {
                list.join(", ")
            }
        };
        table.add_row(vec![
            snippet.id.clone(),
            snippet.title.clone(),
            snippet.choice_options.len().to_string(),
            or_any(&snippet.allowed_locations),
            or_any(&snippet.allowed_biomes),
        ]);
    }
    println!("{table}");
    println!();
    println!(
        "  {} snippets, {} chapters",
        pack.snippets.len(),
        pack.chapters.len()
    );

    for issue in &issues {
        if issue.is_error {
            println!("  {}", issue.to_string().red());
        } else {
            println!("  {}", issue.to_string().yellow());
        }
    }

    let errors = issues.iter().filter(|i| i.is_error).count();
    let warnings = issues.len() - errors;
    if errors > 0 {
        return Err(format!(
            "{errors} error{}, {warnings} warning{}",
            if errors == 1 { "" } else { "s" },
            if warnings == 1 { "" } else { "s" },
        ));
    }

    if warnings > 0 {
        println!(
            "  Checks passed with {warnings} warning{}.",
            if warnings == 1 { "" } else { "s" }
        );
    } else {
        println!("  All checks passed.");
    }
    Ok(())
}
