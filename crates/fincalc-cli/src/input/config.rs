use fincalc_core::tax::regime::TaxRegime;
use log::debug;

use super::file::read_file;

/// Load a tax regime from YAML (`.yaml`/`.yml`) or JSON.
pub fn read_regime(path: &str) -> Result<TaxRegime, Box<dyn std::error::Error>> {
    let (resolved, contents) = read_file(path)?;

    let is_yaml = matches!(
        resolved.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let regime: TaxRegime = if is_yaml {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", resolved.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", resolved.display(), e))?
    };

    debug!(
        "loaded tax regime '{}' ({} brackets) from {}",
        regime.name,
        regime.brackets.len(),
        resolved.display()
    );
    Ok(regime)
}
