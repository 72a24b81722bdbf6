//! CLI command for checking a directory of config files

use std::path::Path;
use std::time::Instant;

use crate::batch::{find_cfg_files, parse_files_with_progress};
use crate::cli::progress::{LOOKING_GLASS, file_bar, print_done, print_step};
use crate::formats::cfg::CfgParser;

pub fn execute(dir: &Path, quiet: bool) -> anyhow::Result<()> {
    let started = Instant::now();
    let files = find_cfg_files(dir);

    if files.is_empty() {
        println!("No .cfg files found in: {}", dir.display());
        return Ok(());
    }

    if !quiet {
        print_step(1, 1, LOOKING_GLASS, &format!("Parsing {} files...", files.len()));
    }

    let pb = file_bar(files.len(), quiet);
    let result = parse_files_with_progress(&files, Some(dir), &CfgParser::new(), |progress| {
        pb.set_position(progress.current as u64);
        pb.set_message(progress.file.clone());
    });
    pb.finish_and_clear();

    for (_, parsed) in &result.parsed {
        for warning in &parsed.warnings {
            println!("  warning: {warning}");
        }
    }
    for msg in result.results.iter().filter(|m| m.starts_with("cannot parse")) {
        println!("  error: {msg}");
    }

    println!();
    println!("Check complete:");
    println!("  Parsed: {}", result.success_count);
    println!("  Failed: {}", result.fail_count);
    println!("  Warnings: {}", result.warning_count());

    if !quiet {
        print_done(started.elapsed());
    }

    if result.fail_count > 0 {
        anyhow::bail!("{} of {} files failed to parse", result.fail_count, files.len());
    }
    Ok(())
}
