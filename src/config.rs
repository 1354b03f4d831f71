//! Application configuration.
//!
//! Handles loading, validating, and merging `config.toml`. User values are
//! merged on top of stock defaults, so a config file only needs the keys it
//! wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! default_preset = "top10-base90"
//!
//! [canvas]
//! width = 1108              # Output width in pixels
//! height = 1528             # Output height in pixels
//!
//! [output]
//! quality = 100             # JPEG quality: 1-100, or a fraction such as 0.9
//! progressive = false
//!
//! [alignment]
//! enabled = true
//! fill = "#ffffff"          # Padding color, #rrggbb or #rrggbbaa
//! background = "#ffffff"    # Reference color for content detection
//! tolerance = 300           # Squared RGB distance separating content from background
//! debug = false             # Draw edge markers, pad with light gray
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto)
//!
//! [[presets]]
//! name = "top0-base70"
//! top_line = 0              # % of canvas height kept free above the product
//! base_line = 70            # % from the top where the product rests
//! left_right_margin = 9     # % of canvas width kept free left + right
//! vertical_align = "bottom" # or "middle"
//! ```
//!
//! Defining `[[presets]]` replaces the whole stock preset list.
//! Unknown keys are rejected to catch typos early.

use crate::imaging::color::{ColorThreshold, parse_hex_color};
use crate::imaging::{AlignOptions, CanvasSpec, EncodeParams, Preset, ProcessJob, Quality};
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Preset used when none is named on the command line.
    pub default_preset: String,
    pub canvas: CanvasSpec,
    pub output: OutputConfig,
    pub alignment: AlignmentConfig,
    pub processing: ProcessingConfig,
    pub presets: Vec<Preset>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_preset: "top10-base90".to_string(),
            canvas: CanvasSpec::default(),
            output: OutputConfig::default(),
            alignment: AlignmentConfig::default(),
            processing: ProcessingConfig::default(),
            presets: Preset::stock(),
        }
    }
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ConfigError::Validation(
                "canvas width and height must be non-zero".into(),
            ));
        }
        if !self.output.quality.is_valid() {
            return Err(ConfigError::Validation(format!(
                "output.quality must be 1-100 or a fraction 0.0-1.0, got {}",
                self.output.quality
            )));
        }
        self.alignment.fill_color()?;
        self.alignment.background_color()?;
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }

        if self.presets.is_empty() {
            return Err(ConfigError::Validation(
                "at least one preset must be defined".into(),
            ));
        }
        let mut seen = HashSet::new();
        for preset in &self.presets {
            if !seen.insert(preset.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate preset name '{}'",
                    preset.name
                )));
            }
            preset
                .validate()
                .and_then(|()| preset.margin_percents().validate())
                .map_err(|e| ConfigError::Validation(format!("preset '{}': {e}", preset.name)))?;
        }
        self.find_preset(&self.default_preset)?;
        Ok(())
    }

    /// Look up a preset by name.
    pub fn find_preset(&self, name: &str) -> Result<&Preset, ConfigError> {
        self.presets.iter().find(|p| p.name == name).ok_or_else(|| {
            let names: Vec<&str> = self.presets.iter().map(|p| p.name.as_str()).collect();
            ConfigError::Validation(format!(
                "unknown preset '{name}'. Available: {}",
                names.join(", ")
            ))
        })
    }

    /// Alignment settings, or `None` when alignment is switched off.
    pub fn align_options(&self) -> Result<Option<AlignOptions>, ConfigError> {
        if !self.alignment.enabled {
            return Ok(None);
        }
        Ok(Some(AlignOptions {
            threshold: ColorThreshold::new(
                self.alignment.background_color()?,
                self.alignment.tolerance,
            ),
            fill: self.alignment.fill_color()?,
            debug: self.alignment.debug,
        }))
    }

    pub fn encode_params(&self) -> EncodeParams {
        EncodeParams {
            quality: self.output.quality.quality(),
            progressive: self.output.progressive,
        }
    }

    /// Apply command-line overrides, then re-validate.
    pub fn apply_overrides(&mut self, overrides: &Overrides) -> Result<(), ConfigError> {
        if let Some(preset) = &overrides.preset {
            self.default_preset = preset.clone();
        }
        if let Some(fill) = &overrides.fill {
            self.alignment.fill = fill.clone();
        }
        if overrides.no_align {
            self.alignment.enabled = false;
        }
        if overrides.debug {
            self.alignment.debug = true;
        }
        self.validate()
    }

    /// The per-image job for the default preset.
    pub fn job(&self) -> Result<ProcessJob, ConfigError> {
        Ok(ProcessJob {
            preset: self.find_preset(&self.default_preset)?.clone(),
            canvas: self.canvas,
            align: self.align_options()?,
            encode: self.encode_params(),
        })
    }
}

/// Settings given on the command line, layered over the loaded config.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub preset: Option<String>,
    pub fill: Option<String>,
    pub no_align: bool,
    pub debug: bool,
}

/// JPEG quality as written in the config file.
///
/// Integers are percentages (`quality = 90`); floats are fractions of the
/// best quality (`quality = 0.9`), so `1` and `1.0` differ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QualitySetting {
    Percent(u32),
    Fraction(f64),
}

impl QualitySetting {
    pub fn is_valid(&self) -> bool {
        match *self {
            QualitySetting::Percent(p) => (1..=100).contains(&p),
            QualitySetting::Fraction(f) => (0.0..=1.0).contains(&f),
        }
    }

    pub fn quality(&self) -> Quality {
        match *self {
            QualitySetting::Percent(p) => Quality::new(p),
            QualitySetting::Fraction(f) => Quality::from_fraction(f),
        }
    }
}

impl std::fmt::Display for QualitySetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualitySetting::Percent(p) => write!(f, "{p}"),
            QualitySetting::Fraction(v) => write!(f, "{v}"),
        }
    }
}

/// JPEG output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG encoding quality, see [`QualitySetting`].
    pub quality: QualitySetting,
    pub progressive: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quality: QualitySetting::Percent(Quality::default().value()),
            progressive: false,
        }
    }
}

/// Content detection and padding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlignmentConfig {
    pub enabled: bool,
    /// Padding color as `#rrggbb` or `#rrggbbaa`.
    pub fill: String,
    /// Background reference color for content detection.
    pub background: String,
    /// Squared RGB distance above which a pixel counts as content.
    pub tolerance: u32,
    pub debug: bool,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        let threshold = ColorThreshold::default();
        Self {
            enabled: true,
            fill: "#ffffff".to_string(),
            background: "#ffffff".to_string(),
            tolerance: threshold.tolerance,
            debug: false,
        }
    }
}

impl AlignmentConfig {
    pub fn fill_color(&self) -> Result<Rgba<u8>, ConfigError> {
        parse_color("alignment.fill", &self.fill)
    }

    pub fn background_color(&self) -> Result<Rgba<u8>, ConfigError> {
        parse_color("alignment.background", &self.background)
    }
}

fn parse_color(key: &str, value: &str) -> Result<Rgba<u8>, ConfigError> {
    parse_hex_color(value).ok_or_else(|| {
        ConfigError::Validation(format!(
            "{key} must be #rrggbb or #rrggbbaa, got '{value}'"
        ))
    })
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent, derived from the core count.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → `max(2, 2 × cores − 1)`
/// - `Some(n)` → `n`
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    threads_for(cores, config.max_processes)
}

fn threads_for(cores: usize, max_processes: Option<usize>) -> usize {
    match max_processes {
        Some(n) => n.max(1),
        None => (2 * cores).saturating_sub(1).max(2),
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AppConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
pub fn load_raw_file(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    load_raw_file(&config_path).map(Some)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the stock defaults.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// Load config from an explicit file path. The file must exist.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    resolve_config(stock_defaults_value(), Some(load_raw_file(path)?))
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# product-align configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Preset used when `--preset` is not given.
default_preset = "top10-base90"

# ---------------------------------------------------------------------------
# Output canvas
# ---------------------------------------------------------------------------
[canvas]
# Every output image is resampled to exactly this size. Its aspect ratio
# drives the margin calculation.
width = 1108
height = 1528

# ---------------------------------------------------------------------------
# JPEG output
# ---------------------------------------------------------------------------
[output]
# Encoding quality (1 = worst, 100 = best). A float is read as a fraction
# of the best quality: 0.9 is the same as 90.
quality = 100
progressive = false

# ---------------------------------------------------------------------------
# Content-aware alignment
# ---------------------------------------------------------------------------
[alignment]
# When false, images are only resized to the canvas.
enabled = true

# Padding color, as #rrggbb or #rrggbbaa.
fill = "#ffffff"

# Reference background color for content detection.
background = "#ffffff"

# Squared RGB distance above which a pixel counts as content.
tolerance = 300

# Draw colored edge markers and pad with light gray.
debug = false

# ---------------------------------------------------------------------------
# Parallel processing
# ---------------------------------------------------------------------------
[processing]
# Maximum number of parallel workers.
# Omit to use max(2, 2 x CPU cores - 1).
# max_processes = 4

# ---------------------------------------------------------------------------
# Presets
# ---------------------------------------------------------------------------
# All values are percent of the output canvas.
#   top_line          free space kept above the product (minimum)
#   base_line         where the product's bottom edge rests, from the top
#   left_right_margin free space kept left + right combined (minimum)
#   vertical_align    "bottom" rests the product on the base line,
#                     "middle" centers it
# Defining any [[presets]] replaces this whole list.

[[presets]]
name = "top0-base70"
top_line = 0
base_line = 70
left_right_margin = 9
vertical_align = "bottom"

[[presets]]
name = "top10-base70"
top_line = 10
base_line = 70
left_right_margin = 9
vertical_align = "bottom"

[[presets]]
name = "top0-base80"
top_line = 0
base_line = 80
left_right_margin = 9
vertical_align = "bottom"

[[presets]]
name = "top10-base80"
top_line = 10
base_line = 80
left_right_margin = 9
vertical_align = "bottom"

[[presets]]
name = "top0-base90"
top_line = 0
base_line = 90
left_right_margin = 9
vertical_align = "bottom"

[[presets]]
name = "top10-base90"
top_line = 10
base_line = 90
left_right_margin = 9
vertical_align = "bottom"

[[presets]]
name = "lister"
top_line = 15
base_line = 85
left_right_margin = 9
vertical_align = "bottom"

[[presets]]
name = "detail"
top_line = 5
base_line = 95
left_right_margin = 9
vertical_align = "middle"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::VerticalAlign;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = AppConfig::default();
        assert_eq!(config.default_preset, "top10-base90");
        assert_eq!((config.canvas.width, config.canvas.height), (1108, 1528));
        assert_eq!(config.output.quality, QualitySetting::Percent(100));
        assert!(!config.output.progressive);
        assert!(config.alignment.enabled);
        assert_eq!(config.alignment.tolerance, 300);
        assert_eq!(config.presets.len(), 8);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[output]
quality = 85

[alignment]
fill = "#f0f0f0"
"##;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.output.quality, QualitySetting::Percent(85));
        assert_eq!(config.alignment.fill, "#f0f0f0");
        // Unspecified defaults preserved
        assert_eq!(config.alignment.background, "#ffffff");
        assert_eq!(config.canvas, CanvasSpec::default());
    }

    #[test]
    fn align_options_from_config() {
        let mut config = AppConfig::default();
        config.alignment.fill = "#102030".into();
        config.alignment.background = "#fafafa".into();
        config.alignment.tolerance = 50;
        config.alignment.debug = true;

        let options = config.align_options().unwrap().unwrap();
        assert_eq!(options.fill, Rgba([16, 32, 48, 255]));
        assert_eq!(options.threshold.background, Rgba([250, 250, 250, 255]));
        assert_eq!(options.threshold.tolerance, 50);
        assert!(options.debug);
    }

    #[test]
    fn disabled_alignment_has_no_options() {
        let mut config = AppConfig::default();
        config.alignment.enabled = false;
        assert!(config.align_options().unwrap().is_none());
    }

    #[test]
    fn encode_params_from_config() {
        let mut config = AppConfig::default();
        config.output.quality = QualitySetting::Percent(80);
        config.output.progressive = true;
        let params = config.encode_params();
        assert_eq!(params.quality.value(), 80);
        assert!(params.progressive);
    }

    #[test]
    fn overrides_layer_over_config() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(&Overrides {
                preset: Some("detail".into()),
                fill: Some("#000000".into()),
                no_align: false,
                debug: true,
            })
            .unwrap();
        let job = config.job().unwrap();
        assert_eq!(job.preset.name, "detail");
        assert_eq!(job.preset.vertical_align, VerticalAlign::Middle);
        let options = job.align.unwrap();
        assert_eq!(options.fill, Rgba([0, 0, 0, 255]));
        assert!(options.debug);
        assert_eq!(job.canvas, CanvasSpec::default());
        assert_eq!(job.encode.quality.value(), 100);
    }

    #[test]
    fn no_align_override_disables_alignment() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(&Overrides {
                no_align: true,
                ..Overrides::default()
            })
            .unwrap();
        assert!(config.job().unwrap().align.is_none());
    }

    #[test]
    fn bad_overrides_are_rejected() {
        let mut config = AppConfig::default();
        let unknown = Overrides {
            preset: Some("nope".into()),
            ..Overrides::default()
        };
        assert!(config.apply_overrides(&unknown).is_err());

        let mut config = AppConfig::default();
        let bad_fill = Overrides {
            fill: Some("red".into()),
            ..Overrides::default()
        };
        assert!(config.apply_overrides(&bad_fill).is_err());
    }

    #[test]
    fn find_preset_lists_available_on_miss() {
        let config = AppConfig::default();
        assert_eq!(config.find_preset("lister").unwrap().top_line, 15.0);
        let err = config.find_preset("nope").unwrap_err().to_string();
        assert!(err.contains("nope"));
        assert!(err.contains("top0-base70"));
    }

    // =========================================================================
    // Thread count
    // =========================================================================

    #[test]
    fn threads_auto_from_cores() {
        assert_eq!(threads_for(1, None), 2);
        assert_eq!(threads_for(2, None), 3);
        assert_eq!(threads_for(8, None), 15);
    }

    #[test]
    fn threads_override_wins() {
        assert_eq!(threads_for(8, Some(4)), 4);
        assert_eq!(threads_for(2, Some(16)), 16);
        assert_eq!(threads_for(2, Some(0)), 1);
    }

    #[test]
    fn effective_threads_is_at_least_two_by_default() {
        assert!(effective_threads(&ProcessingConfig::default()) >= 2);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r##"
default_preset = "lister"

[canvas]
width = 800
height = 800
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.default_preset, "lister");
        assert_eq!(config.canvas.aspect_ratio(), 1.0);
        // Unspecified values should be defaults
        assert_eq!(config.output.quality, QualitySetting::Percent(100));
        assert_eq!(config.presets.len(), 8);
    }

    #[test]
    fn user_presets_replace_stock_list() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
default_preset = "shoes"

[[presets]]
name = "shoes"
top_line = 20
base_line = 85
left_right_margin = 12
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.presets.len(), 1);
        let shoes = config.find_preset("shoes").unwrap();
        assert_eq!(shoes.left_right_margin, 12.0);
        assert_eq!(shoes.vertical_align, VerticalAlign::Bottom);
    }

    #[test]
    fn user_presets_without_matching_default_are_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[[presets]]
name = "shoes"
top_line = 20
base_line = 85
left_right_margin = 12
"#,
        )
        .unwrap();

        let err = load_config(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("top10-base90")));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_file_requires_existing_file() {
        let tmp = TempDir::new().unwrap();
        let result = load_config_file(&tmp.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_file_reads_any_name() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("shop.toml");
        fs::write(&path, "[output]\nprogressive = true\n").unwrap();
        assert!(load_config_file(&path).unwrap().output.progressive);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"quality = 90"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"quality = 70"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("quality").unwrap().as_integer(), Some(70));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[output]
quality = 100
progressive = false
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[output]
quality = 70
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let output = merged.get("output").unwrap();
        assert_eq!(output.get("quality").unwrap().as_integer(), Some(70));
        // progressive preserved from base
        assert_eq!(output.get("progressive").unwrap().as_bool(), Some(false));
    }

    #[test]
    fn merge_toml_replaces_arrays() {
        let base: toml::Value = toml::from_str("sizes = [1, 2, 3]").unwrap();
        let overlay: toml::Value = toml::from_str("sizes = [9]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("sizes").unwrap().as_array().unwrap().len(), 1);
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[output]
qualty = 90
"#;
        let result: Result<AppConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[outptu]\nquality = 90\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_preset_key_rejected() {
        let toml_str = r#"
[[presets]]
name = "x"
top_line = 0
base_line = 90
left_right_margin = 9
baseline = 90
"#;
        let result: Result<AppConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[alignment]\ntolerence = 10\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_quality_range() {
        let mut config = AppConfig::default();
        config.output.quality = QualitySetting::Percent(1);
        assert!(config.validate().is_ok());

        config.output.quality = QualitySetting::Percent(0);
        assert!(config.validate().is_err());

        config.output.quality = QualitySetting::Percent(101);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("quality"));

        config.output.quality = QualitySetting::Fraction(1.5);
        assert!(config.validate().is_err());
        config.output.quality = QualitySetting::Fraction(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn fractional_quality_maps_to_percent() {
        let config: AppConfig = toml::from_str("[output]\nquality = 0.9\n").unwrap();
        assert_eq!(config.output.quality, QualitySetting::Fraction(0.9));
        assert!(config.validate().is_ok());
        assert_eq!(config.encode_params().quality.value(), 90);

        let config: AppConfig = toml::from_str("[output]\nquality = 1.0\n").unwrap();
        assert_eq!(config.encode_params().quality.value(), 100);
        // Integer 1 is a percentage, not a fraction
        let config: AppConfig = toml::from_str("[output]\nquality = 1\n").unwrap();
        assert_eq!(config.encode_params().quality.value(), 1);
    }

    #[test]
    fn validate_canvas_zero() {
        let mut config = AppConfig::default();
        config.canvas.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_bad_colors() {
        let mut config = AppConfig::default();
        config.alignment.fill = "white".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("alignment.fill"));

        let mut config = AppConfig::default();
        config.alignment.background = "#12345".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_duplicate_preset_names() {
        let mut config = AppConfig::default();
        config.presets.push(config.presets[0].clone());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn validate_invalid_preset() {
        let mut config = AppConfig::default();
        config
            .presets
            .push(Preset::new("broken", 0.0, 40.0, 9.0, VerticalAlign::Middle));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn validate_zero_workers() {
        let mut config = AppConfig::default();
        config.processing.max_processes = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[output]\nquality = 200\n").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_is_valid_toml() {
        let content = stock_config_toml();
        let _: toml::Value = toml::from_str(content).expect("stock config must be valid TOML");
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: AppConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in ["[canvas]", "[output]", "[alignment]", "[processing]", "[[presets]]"] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.is_table());
        for key in ["canvas", "output", "alignment", "processing", "presets"] {
            assert!(val.get(key).is_some(), "missing {key}");
        }
    }
}
