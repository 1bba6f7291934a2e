use anyhow::{Result, bail};
use std::path::Path;
use widgetdesk_core::widget::validate_all;

use super::{print_errors, read_widget_file};

pub fn run(file: &Path) -> Result<()> {
    let config = read_widget_file(file)?;
    let errors = validate_all(&config);

    if errors.is_empty() {
        println!("✅ {} is valid", file.display());
        return Ok(());
    }

    eprintln!("❌ {} has {} invalid field(s):", file.display(), errors.len());
    print_errors(&errors);
    bail!("validation failed");
}
