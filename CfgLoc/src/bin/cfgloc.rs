//! cfgloc command-line binary

fn main() -> anyhow::Result<()> {
    cfgloc::cli::run_cli()
}
