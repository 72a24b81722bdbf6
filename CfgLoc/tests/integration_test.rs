use cfgloc::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const TANK: &str = "\
// Stock-alike fuel tank
PART
{
\tname = acme.tank
\tcategory = FuelTank
\ttitle = Fuel Tank
\tdescription = #acme_tank_desc // #acme_tank_desc = Holds fuel.
\tcost = 100

\tRESOURCE
\t{
\t\tname = LiquidFuel
\t\tamount = 90
\t}
}
";

const ENGINE_PATCH: &str = "\
@PART[acme.engine]:NEEDS[AcmeCore]:FOR[AcmeEngines]
{
\t@title = Big Engine
\t@cost *= 1.5
\t!MODULE[ModuleFoo] {}
\t%MODULE[ModuleEngines]
\t{
\t\t@maxThrust = 200 // tuned
\t}
}
";

fn write(dir: &Path, name: &str, text: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

#[test]
fn test_round_trip_of_real_files() {
    for text in [TANK, ENGINE_PATCH] {
        let root = parse_cfg(text).unwrap();
        let once = serialize_cfg(&root);
        let twice = serialize_cfg(&parse_cfg(&once).unwrap());
        assert_eq!(once, twice);
        assert_eq!(parse_cfg(&once).unwrap(), root);
    }
    assert_eq!(serialize_cfg(&parse_cfg(TANK).unwrap()), TANK);
}

#[test]
fn test_patch_syntax_is_kept() {
    let root = parse_cfg(ENGINE_PATCH).unwrap();
    let part = &root.nodes[0];
    assert_eq!(part.name, "PART");
    assert_eq!(part.meta.patch_command, Some('@'));
    assert_eq!(
        part.meta.patch_arguments.as_deref(),
        Some("[acme.engine]:NEEDS[AcmeCore]:FOR[AcmeEngines]")
    );
    assert_eq!(part.values[1].meta.patch_operator, Some('*'));

    let deleted = &part.nodes[0];
    assert_eq!(deleted.meta.patch_command, Some('!'));
    assert!(deleted.is_empty());

    let engines = &part.nodes[1];
    assert_eq!(engines.meta.patch_command, Some('%'));
    assert_eq!(engines.values[0].meta.inline_comment.as_deref(), Some("tuned"));
}

#[test]
fn test_meta_codec_on_parsed_entries() {
    let root = parse_cfg(ENGINE_PATCH).unwrap();
    let part = &root.nodes[0];
    for meta in [&part.meta, &part.values[1].meta, &part.nodes[1].values[0].meta] {
        let encoded = encode_meta(meta);
        assert_eq!(&decode_meta(encoded.as_deref()).unwrap(), meta);
    }
}

#[test]
fn test_unparsable_line_fails_whole_file() {
    let err = CfgParser::new()
        .with_file_name("bad.cfg")
        .parse_text("foo bar\n")
        .unwrap_err();
    match err {
        Error::UnparsableLine {
            file, line_number, ..
        } => {
            assert_eq!(file, "bad.cfg");
            assert_eq!(line_number, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_export_and_sync_workflow() {
    let dir = tempdir().unwrap();
    let mod_dir = dir.path().join("AcmeMod");
    write(&mod_dir, "Parts/tank.cfg", TANK);
    write(&mod_dir, "Patches/engine.cfg", ENGINE_PATCH);
    write(&mod_dir, "Broken/broken.cfg", "}\n");

    let config = ToolConfig::from_toml("[parts]\ntag_prefix = \"acme_\"\n").unwrap();
    let files = find_cfg_files(&mod_dir);
    assert_eq!(files.len(), 3);

    let result = parse_files(&files, &CfgParser::new());
    assert_eq!(result.success_count, 2);
    assert_eq!(result.fail_count, 1);

    // Extract and localize.
    let mut items = Vec::new();
    for (path, parsed) in &result.parsed {
        let source = path.strip_prefix(&mod_dir).unwrap().to_string_lossy().to_string();
        items.extend(extract_part_strings(&parsed.root, &source, &config.parts, None));

        let mut root = parsed.root.clone();
        if localize_parts(&mut root, &config.parts) > 0 {
            write_cfg(&root, path).unwrap();
        }
    }

    let catalog = build_catalog(items, &config.export);
    let catalog_path = dir.path().join("en-us.cfg");
    catalog.write(&catalog_path).unwrap();
    assert!(catalog.duplicates.is_empty());

    let tags: Vec<_> = catalog
        .groups
        .iter()
        .flat_map(|g| g.items.iter().map(|i| i.tag.as_str()))
        .collect();
    // The engine patch has no category, so its group sorts first.
    assert_eq!(
        tags,
        vec![
            "#acme_acme_engine_Part_title",
            "#acme_acme_tank_Part_title",
            "#acme_tank_desc",
        ]
    );

    let tank = fs::read_to_string(mod_dir.join("Parts/tank.cfg")).unwrap();
    assert!(tank.contains("\ttitle = #acme_acme_tank_Part_title // #acme_acme_tank_Part_title = Fuel Tank\n"));

    // Translate the catalog and sync the comments back.
    let translated = fs::read_to_string(&catalog_path)
        .unwrap()
        .replace("= Fuel Tank", "= Fuel Tank Mk2");
    fs::write(&catalog_path, translated).unwrap();

    let mut table = LocalizationTable::new("en-us");
    assert_eq!(table.load_file(&catalog_path).unwrap(), 3);
    assert_eq!(table.get("#acme_tank_desc"), Some("Holds fuel."));

    let tank_path = mod_dir.join("Parts/tank.cfg");
    let mut root = read_cfg(&tank_path).unwrap();
    assert_eq!(refresh_tag_comments(&mut root, &table), 1);
    let title = root.nodes[0].value_mut("title").unwrap();
    assert_eq!(
        title.meta.inline_comment.as_deref(),
        Some("#acme_acme_tank_Part_title = Fuel Tank Mk2")
    );
}

#[test]
fn test_parser_annotates_tags_from_table() {
    let mut table = LocalizationTable::new("en-us");
    table.insert("#abc_title", "Rocket");

    let parsed = CfgParser::new()
        .with_resolver(&table)
        .parse_text("PART\n{\n\ttitle = #abc_title\n\tcolor = #FFAA00\n}\n")
        .unwrap();
    assert_eq!(
        serialize_cfg(&parsed.root),
        "PART\n{\n\ttitle = #abc_title // #abc_title = Rocket\n\tcolor = #FFAA00\n}\n"
    );
}

#[test]
fn test_tag_classification() {
    assert!(looks_like_tag(Some("#abc_Part_title"), false));
    assert!(!looks_like_tag(Some("#FFAA00"), false));
    assert!(!looks_like_tag(Some("#ABC"), false));
    assert!(!looks_like_tag(None, false));
}
