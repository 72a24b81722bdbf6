//! CLI command for exporting a localization catalog

use std::path::Path;
use std::time::Instant;

use crate::batch::{find_cfg_files, parse_files_with_progress};
use crate::cli::progress::{BOOKS, DISK, GEAR, LOOKING_GLASS, file_bar, print_done, print_step};
use crate::formats::cfg::{CfgParser, write_cfg};
use crate::localization::{
    LocalizationTable, TagResolver, build_catalog, extract_part_strings, localize_parts,
};

pub fn execute(
    dir: &Path,
    output: &Path,
    config: Option<&Path>,
    catalog: Option<&Path>,
    localize: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let settings = super::load_config(dir, config)?;
    let total_steps = if catalog.is_some() { 4 } else { 3 };
    let mut step = 0;

    let mut table = LocalizationTable::new(&settings.export.language);
    if let Some(catalog) = catalog {
        step += 1;
        if !quiet {
            print_step(step, total_steps, BOOKS, "Loading localization strings...");
        }
        let count = table.load_path(catalog)?;
        tracing::info!("Loaded {} strings from {}", count, catalog.display());
    }
    let resolver: Option<&dyn TagResolver> = catalog.map(|_| &table as &dyn TagResolver);

    step += 1;
    let files = find_cfg_files(dir);
    if !quiet {
        print_step(step, total_steps, LOOKING_GLASS, &format!("Parsing {} files...", files.len()));
    }
    let mut parser = CfgParser::new();
    if let Some(resolver) = resolver.filter(|_| localize && settings.parse.resolve_tags) {
        parser = parser.with_resolver(resolver);
    }

    let pb = file_bar(files.len(), quiet);
    let result = parse_files_with_progress(&files, Some(dir), &parser, |progress| {
        pb.set_position(progress.current as u64);
        pb.set_message(progress.file.clone());
    });
    pb.finish_and_clear();
    for msg in result.results.iter().filter(|m| m.starts_with("cannot parse")) {
        println!("  {msg}");
    }

    step += 1;
    if !quiet {
        print_step(step, total_steps, GEAR, "Extracting part strings...");
    }
    let mut items = Vec::new();
    let mut localized_files = 0;
    for (path, parsed) in result.parsed {
        let source = path.strip_prefix(dir).unwrap_or(&path).to_string_lossy().to_string();
        items.extend(extract_part_strings(&parsed.root, &source, &settings.parts, resolver));

        if localize {
            let mut root = parsed.root;
            if localize_parts(&mut root, &settings.parts) > 0 {
                write_cfg(&root, &path)?;
                localized_files += 1;
            }
        }
    }

    step += 1;
    if !quiet {
        print_step(step, total_steps, DISK, "Writing catalog...");
    }
    let catalog = build_catalog(items, &settings.export);
    catalog.write(output)?;

    println!();
    println!("Export complete:");
    println!("  Strings: {}", catalog.len());
    println!("  Duplicate tags: {}", catalog.duplicates.len());
    println!("  Skipped files: {}", result.fail_count);
    if localize {
        println!("  Localized files: {localized_files}");
    }
    println!("  Catalog: {}", output.display());

    if !quiet {
        print_done(started.elapsed());
    }
    Ok(())
}
