//! CLI command for dumping a parsed tree as JSON

use std::path::Path;

use crate::batch::parse_file;
use crate::formats::cfg::CfgParser;

pub fn execute(file: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let parsed = parse_file(file, &CfgParser::new())?;
    let json = parsed.root.to_json()?;

    match output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
