//! Fixture import command
//!
//! Usage: portal seed <PATH>

use super::GlobalOpts;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Seed YAML file, or a directory of them
    pub path: PathBuf,
}

pub fn execute(global: &GlobalOpts, args: SeedArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = global.load_config()?;
    let spec = config.index_spec();
    let mut conn = global.open_db()?;

    let seed_files = if args.path.is_dir() {
        // Sorted for determinism
        let mut files: Vec<PathBuf> = std::fs::read_dir(&args.path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        files
    } else {
        vec![args.path]
    };

    for seed_file in seed_files {
        println!("Importing {}...", seed_file.display());
        let written = portal_store::seed::import_seed(&seed_file, &mut conn, &spec)?;
        println!("✓ Imported {} works", written);
    }

    Ok(())
}
