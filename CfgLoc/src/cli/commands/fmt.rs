//! CLI command for formatting a config file

use std::path::Path;

use crate::batch::parse_file;
use crate::formats::cfg::{CfgParser, serialize_cfg};

pub fn execute(file: &Path, output: Option<&Path>, check: bool) -> anyhow::Result<()> {
    let original = std::fs::read_to_string(file)?;
    let parsed = parse_file(file, &CfgParser::new())?;
    let formatted = serialize_cfg(&parsed.root);

    if check {
        if formatted != original.replace("\r\n", "\n") {
            anyhow::bail!("{} is not formatted", file.display());
        }
        println!("{} is formatted", file.display());
        return Ok(());
    }

    match output {
        Some(path) => {
            std::fs::write(path, &formatted)?;
            println!("Formatted {} -> {}", file.display(), path.display());
        }
        None => print!("{formatted}"),
    }

    Ok(())
}
