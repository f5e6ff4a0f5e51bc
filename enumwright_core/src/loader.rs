//! Reads generator configuration and enum definition files.
//!
//! Both files are TOML unless their extension is `.json`.

use crate::config::{DefaultStyle, GeneratorConfig, is_identifier};
use crate::error::{EnumwrightError, Result};
use crate::types::{EnumDefinition, EnumEntry, EnumKind};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, trace};

pub const CONFIG_FILE_NAME: &str = "enumwright.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Json,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => FileFormat::Json,
            _ => FileFormat::Toml,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EnumFile {
    #[serde(default)]
    value_enums: Vec<RawEnum>,
    #[serde(default)]
    flags_enums: Vec<RawEnum>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEnum {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    size_type: Option<String>,
    #[serde(default)]
    default_value: Option<String>,
    #[serde(default)]
    default_style: Option<DefaultStyle>,
    #[serde(default)]
    entries: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    name: String,
    #[serde(default)]
    value: Option<RawValue>,
    #[serde(default)]
    description: String,
}

/// Numbers past the native integer range are written as strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Int(i64),
    UInt(u64),
    Text(String),
}

/// Parses a decimal, `0x`, `0b` or `0o` literal with an optional sign and
/// `_` separators.
pub fn parse_value(text: &str) -> Option<i128> {
    let cleaned: String = text.trim().chars().filter(|c| *c != '_').collect();
    let (negative, unsigned) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };

    let lower = unsigned.to_ascii_lowercase();
    let (radix, digits) = if let Some(d) = lower.strip_prefix("0x") {
        (16, d)
    } else if let Some(d) = lower.strip_prefix("0b") {
        (2, d)
    } else if let Some(d) = lower.strip_prefix("0o") {
        (8, d)
    } else {
        (10, lower.as_str())
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }

    let magnitude = u128::from_str_radix(digits, radix).ok()?;
    if negative {
        if magnitude == i128::MIN.unsigned_abs() {
            Some(i128::MIN)
        } else {
            i128::try_from(magnitude).ok().map(|m| -m)
        }
    } else {
        i128::try_from(magnitude).ok()
    }
}

fn raw_value(enum_name: &str, entry: &str, raw: &RawValue) -> Result<i128> {
    match raw {
        RawValue::Int(v) => Ok(i128::from(*v)),
        RawValue::UInt(v) => Ok(i128::from(*v)),
        RawValue::Text(text) => parse_value(text).ok_or_else(|| {
            EnumwrightError::invalid_config_value(format!("{}.{}.value", enum_name, entry), text)
        }),
    }
}

/// Value an entry without an explicit `value` receives.
fn next_auto_value(kind: EnumKind, enum_name: &str, previous: Option<i128>, used_bits: u128) -> Result<i128> {
    match kind {
        EnumKind::Value => match previous {
            None => Ok(0),
            Some(prev) => prev.checked_add(1).ok_or_else(|| {
                EnumwrightError::config(format!(
                    "enum `{}` cannot auto-assign past {}",
                    enum_name, prev
                ))
            }),
        },
        EnumKind::Flags => {
            if used_bits == 0 {
                return Ok(1);
            }
            let next_bit = 128 - used_bits.leading_zeros();
            // Bit 127 is the sign bit of the value type
            if next_bit >= 127 {
                return Err(EnumwrightError::config(format!(
                    "flags enum `{}` has no free bit left to auto-assign",
                    enum_name
                )));
            }
            Ok(1i128 << next_bit)
        }
    }
}

fn convert_enum(raw: RawEnum, kind: EnumKind, config: &GeneratorConfig) -> Result<EnumDefinition> {
    if !is_identifier(&raw.name) {
        error!(enum_name = %raw.name, "Enum name is not a valid identifier");
        return Err(EnumwrightError::invalid_config_value("enum name", &raw.name));
    }

    let size_type_index = match &raw.size_type {
        Some(name) => config.size_type_index(name)?,
        None => config.default_size_type_index(kind)?,
    };

    let mut entries = Vec::with_capacity(raw.entries.len());
    let mut previous = None;
    let mut used_bits = 0u128;
    for raw_entry in raw.entries {
        if !is_identifier(&raw_entry.name) {
            error!(enum_name = %raw.name, entry = %raw_entry.name, "Entry name is not a valid identifier");
            return Err(EnumwrightError::invalid_config_value(
                format!("{}.entries.name", raw.name),
                &raw_entry.name,
            ));
        }
        let value = match &raw_entry.value {
            Some(v) => raw_value(&raw.name, &raw_entry.name, v)?,
            None => {
                let value = next_auto_value(kind, &raw.name, previous, used_bits)?;
                trace!(enum_name = %raw.name, entry = %raw_entry.name, value = %value, "Auto-assigned entry value");
                value
            }
        };
        previous = Some(value);
        if value > 0 {
            used_bits |= value as u128;
        }
        entries.push(EnumEntry::new(raw_entry.name, value).with_description(raw_entry.description));
    }

    debug!(
        enum_name = %raw.name,
        kind = kind.as_str(),
        entries = entries.len(),
        size_type = %config.size_types[size_type_index].name,
        "Loaded enum definition"
    );

    Ok(EnumDefinition {
        name: raw.name,
        description: raw.description,
        kind,
        entries,
        default_value_name: raw.default_value,
        default_style: raw.default_style,
        size_type_index,
    })
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        error!(path = %path.display(), "Failed to read file: {}", e);
        EnumwrightError::file_read(path, e)
    })
}

pub fn parse_config(text: &str, format: FileFormat) -> Result<GeneratorConfig> {
    let config: GeneratorConfig = match format {
        FileFormat::Toml => toml::from_str(text)?,
        FileFormat::Json => serde_json::from_str(text)?,
    };
    config.check()?;
    Ok(config)
}

/// Loads and checks a generator configuration file.
pub fn load_config(path: &Path) -> Result<GeneratorConfig> {
    info!(path = %path.display(), "Loading generator configuration");
    let contents = read_file(path)?;
    debug!("Configuration file size: {} bytes", contents.len());
    parse_config(&contents, FileFormat::from_path(path)).map_err(|e| {
        error!(path = %path.display(), "Failed to load configuration: {}", e);
        e
    })
}

/// Converts an enum file into definitions: value enums first, then flags
/// enums, each in file order.
pub fn parse_definitions(text: &str, format: FileFormat, config: &GeneratorConfig) -> Result<Vec<EnumDefinition>> {
    let file: EnumFile = match format {
        FileFormat::Toml => toml::from_str(text)?,
        FileFormat::Json => serde_json::from_str(text)?,
    };

    let EnumFile {
        value_enums,
        flags_enums,
    } = file;
    let mut definitions = Vec::with_capacity(value_enums.len() + flags_enums.len());
    for raw in value_enums {
        definitions.push(convert_enum(raw, EnumKind::Value, config)?);
    }
    for raw in flags_enums {
        definitions.push(convert_enum(raw, EnumKind::Flags, config)?);
    }
    Ok(definitions)
}

pub fn load_definitions(path: &Path, config: &GeneratorConfig) -> Result<Vec<EnumDefinition>> {
    info!(path = %path.display(), "Loading enum definitions");
    let contents = read_file(path)?;
    let definitions = parse_definitions(&contents, FileFormat::from_path(path), config).map_err(|e| {
        error!(path = %path.display(), "Failed to load enum definitions: {}", e);
        e
    })?;
    info!(count = definitions.len(), "Enum definitions loaded");
    Ok(definitions)
}

/// Searches `start` and its ancestors for `enumwright.toml`.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    debug!("Starting config file search from: {:?}", start);
    for dir in start.ancestors() {
        let candidate = dir.join(CONFIG_FILE_NAME);
        trace!("Checking for config at: {:?}", candidate);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_value_forms() {
        assert_eq!(parse_value("42"), Some(42));
        assert_eq!(parse_value("-7"), Some(-7));
        assert_eq!(parse_value("+7"), Some(7));
        assert_eq!(parse_value("0xFF"), Some(255));
        assert_eq!(parse_value("0b1010"), Some(10));
        assert_eq!(parse_value("0o17"), Some(15));
        assert_eq!(parse_value("1_000_000"), Some(1_000_000));
        assert_eq!(parse_value("-0x8000_0000_0000_0000_0000_0000_0000_0000"), Some(i128::MIN));
        assert_eq!(
            parse_value("170141183460469231731687303715884105727"),
            Some(i128::MAX)
        );
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("0x"), None);
        assert_eq!(parse_value("--1"), None);
        assert_eq!(parse_value("-+1"), None);
        assert_eq!(parse_value("12ab"), None);
        assert_eq!(parse_value("170141183460469231731687303715884105728"), None);
    }

    #[test]
    fn test_auto_assignment() {
        let config = GeneratorConfig::default();
        let text = r#"
            [[value_enums]]
            name = "Level"
            entries = [{ name = "Low" }, { name = "Mid" }, { name = "High", value = 10 }, { name = "Max" }]

            [[flags_enums]]
            name = "Perms"
            entries = [{ name = "None", value = 0 }, { name = "Read" }, { name = "Write" }, { name = "Both", value = "0b11" }, { name = "Exec" }]
        "#;
        let defs = parse_definitions(text, FileFormat::Toml, &config).unwrap();
        let values = |d: &EnumDefinition| d.entries.iter().map(|e| e.value).collect::<Vec<_>>();
        assert_eq!(values(&defs[0]), vec![0, 1, 10, 11]);
        assert_eq!(values(&defs[1]), vec![0, 1, 2, 3, 4]);
        assert_eq!(defs[1].kind, EnumKind::Flags);
    }

    #[test]
    fn test_flags_auto_assignment_exhausts_bits() {
        let err = next_auto_value(EnumKind::Flags, "Big", None, 1u128 << 126).unwrap_err();
        assert!(matches!(err, EnumwrightError::Config(_)));
        assert_eq!(
            next_auto_value(EnumKind::Flags, "Big", None, 1u128 << 125).unwrap(),
            1i128 << 126
        );
    }

    #[test]
    fn test_size_type_and_defaults() {
        let config = GeneratorConfig::default();
        let text = r#"
            [[value_enums]]
            name = "Color"
            description = "Primary colors"
            size_type = "uint8"
            default_value = "Green"
            default_style = "max"
            entries = [{ name = "Red", description = "Warm" }, { name = "Green" }]
        "#;
        let defs = parse_definitions(text, FileFormat::Toml, &config).unwrap();
        let color = &defs[0];
        assert_eq!(color.size_type_index, config.size_type_index("uint8").unwrap());
        assert_eq!(color.default_value_name.as_deref(), Some("Green"));
        assert_eq!(color.default_style, Some(DefaultStyle::Max));
        assert_eq!(color.entries[0].description, "Warm");
        assert_eq!(color.description, "Primary colors");
    }

    #[test]
    fn test_unknown_size_type_is_config_error() {
        let config = GeneratorConfig::default();
        let text = r#"
            [[value_enums]]
            name = "Color"
            size_type = "uint7"
            entries = [{ name = "Red" }]
        "#;
        let err = parse_definitions(text, FileFormat::Toml, &config).unwrap_err();
        assert!(matches!(err, EnumwrightError::Config(msg) if msg.contains("uint7")));
    }

    #[test]
    fn test_bad_identifiers_rejected() {
        let config = GeneratorConfig::default();
        let text = r#"
            [[value_enums]]
            name = "Color"
            entries = [{ name = "not-valid" }]
        "#;
        assert!(matches!(
            parse_definitions(text, FileFormat::Toml, &config),
            Err(EnumwrightError::InvalidConfigValue { .. })
        ));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let config = GeneratorConfig::default();
        let text = r#"
            [[value_enums]]
            name = "Color"
            colour = "oops"
            entries = [{ name = "Red" }]
        "#;
        assert!(matches!(
            parse_definitions(text, FileFormat::Toml, &config),
            Err(EnumwrightError::Toml(_))
        ));
    }

    #[test]
    fn test_json_definitions() {
        let config = GeneratorConfig::default();
        let text = r#"{
            "flags_enums": [
                { "name": "Wide", "size_type": "uint64",
                  "entries": [{ "name": "Top", "value": 9223372036854775808 }, { "name": "Low", "value": 1 }] }
            ]
        }"#;
        let defs = parse_definitions(text, FileFormat::Json, &config).unwrap();
        assert_eq!(defs[0].entries[0].value, 1i128 << 63);
    }

    #[test]
    fn test_load_files_by_extension() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("gen.json");
        fs::write(&config_path, r#"{ "namespace": ["acme"], "string_table": "none" }"#).unwrap();
        let config = load_config(&config_path).unwrap();
        assert_eq!(config.namespace, vec!["acme".to_string()]);

        let enums_path = dir.path().join("enums.toml");
        fs::write(
            &enums_path,
            "[[value_enums]]\nname = \"Color\"\nentries = [{ name = \"Red\" }]\n",
        )
        .unwrap();
        let defs = load_definitions(&enums_path, &config).unwrap();
        assert_eq!(defs.len(), 1);
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("enumwright.toml");
        fs::write(&path, "namespace = [\"has space\"]\n").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(EnumwrightError::InvalidConfigValue { .. })
        ));
    }

    #[test]
    fn test_missing_file_error_names_path() {
        let dir = TempDir::new().unwrap();
        let absent = dir.path().join("absent.toml");
        let err = load_config(&absent).unwrap_err();
        assert!(matches!(&err, EnumwrightError::FileRead { path, .. } if path == &absent));
        assert!(err.to_string().contains("absent.toml"));

        let err = load_definitions(&dir.path().join("enums.json"), &GeneratorConfig::default()).unwrap_err();
        assert!(err.to_string().contains("enums.json"));
    }

    #[test]
    fn test_find_config_file_in_ancestor() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();
        assert_eq!(
            find_config_file(&nested),
            Some(dir.path().join(CONFIG_FILE_NAME))
        );
    }
}
