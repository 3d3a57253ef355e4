//! Usage: portal migrate

use super::GlobalOpts;

pub fn execute(global: &GlobalOpts) -> Result<(), Box<dyn std::error::Error>> {
    global.open_db()?;
    println!("✓ Schema up to date ({})", global.db.display());
    Ok(())
}
