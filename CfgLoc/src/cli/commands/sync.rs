//! CLI command for refreshing tag comments

use std::path::Path;

use crate::batch::{find_cfg_files, parse_files_with_progress};
use crate::cli::progress::{BOOKS, DISK, file_bar, print_step};
use crate::formats::cfg::{CfgParser, write_cfg};
use crate::localization::{LocalizationTable, refresh_tag_comments};

pub fn execute(
    dir: &Path,
    catalog: &Path,
    config: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    let settings = super::load_config(dir, config)?;

    if !quiet {
        print_step(1, 2, BOOKS, "Loading localization strings...");
    }
    let mut table = LocalizationTable::new(&settings.export.language);
    let count = table.load_path(catalog)?;
    if table.is_empty() {
        let seen = table.languages_seen().collect::<Vec<_>>();
        anyhow::bail!(
            "no {} strings found in {} (languages present: {})",
            table.language(),
            catalog.display(),
            if seen.is_empty() { "none".to_string() } else { seen.join(", ") }
        );
    }
    tracing::info!("Loaded {} strings", count);

    let files = find_cfg_files(dir);
    if !quiet {
        print_step(2, 2, DISK, &format!("Updating {} files...", files.len()));
    }

    let pb = file_bar(files.len(), quiet);
    let result = parse_files_with_progress(&files, Some(dir), &CfgParser::new(), |progress| {
        pb.set_position(progress.current as u64);
        pb.set_message(progress.file.clone());
    });
    pb.finish_and_clear();

    let mut updated_files = 0;
    let mut updated_comments = 0;
    for (path, parsed) in result.parsed {
        let mut root = parsed.root;
        let changed = refresh_tag_comments(&mut root, &table);
        if changed > 0 {
            write_cfg(&root, &path)?;
            updated_files += 1;
            updated_comments += changed;
        }
    }

    println!();
    println!("Sync complete:");
    println!("  Updated comments: {updated_comments}");
    println!("  Updated files: {updated_files}");
    println!("  Skipped files: {}", result.fail_count);
    for msg in result.results.iter().filter(|m| m.starts_with("cannot parse")) {
        println!("    {msg}");
    }

    Ok(())
}
