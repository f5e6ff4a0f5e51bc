//! Default-value resolution.

use crate::config::{DefaultStyle, GeneratorConfig};
use crate::error::{EnumwrightError, Result, ValidationError};
use crate::types::{EnumDefinition, EnumEntry, EnumKind};
use serde::Serialize;

/// The value a default-constructed instance holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    /// A declared entry, by index
    Entry(usize),
    /// A raw mask that need not match any single entry (flags only)
    Raw(i128),
}

impl DefaultValue {
    pub fn value(&self, entries: &[EnumEntry]) -> i128 {
        match self {
            DefaultValue::Entry(index) => entries[*index].value,
            DefaultValue::Raw(value) => *value,
        }
    }
}

fn ensure_non_empty(entries: &[EnumEntry]) -> Result<()> {
    if entries.is_empty() {
        return Err(EnumwrightError::config(
            "cannot resolve a default value without entries",
        ));
    }
    Ok(())
}

/// Index of the first entry whose value is smallest.
fn min_index(entries: &[EnumEntry]) -> usize {
    let mut best = 0;
    for (index, entry) in entries.iter().enumerate().skip(1) {
        if entry.value < entries[best].value {
            best = index;
        }
    }
    best
}

/// Index of the first entry whose value is largest.
fn max_index(entries: &[EnumEntry]) -> usize {
    let mut best = 0;
    for (index, entry) in entries.iter().enumerate().skip(1) {
        if entry.value > entries[best].value {
            best = index;
        }
    }
    best
}

/// Picks the default entry of a value enum.
pub fn resolve_value_default(style: DefaultStyle, entries: &[EnumEntry]) -> Result<usize> {
    ensure_non_empty(entries)?;
    match style {
        DefaultStyle::Min => Ok(min_index(entries)),
        DefaultStyle::Max => Ok(max_index(entries)),
        DefaultStyle::First => Ok(0),
        DefaultStyle::Last => Ok(entries.len() - 1),
        DefaultStyle::Zero | DefaultStyle::UsedBitsSet => Err(EnumwrightError::config(format!(
            "default style `{}` only applies to flags enums",
            style.as_str()
        ))),
    }
}

/// Picks the default mask of a flags enum.
pub fn resolve_flags_default(style: DefaultStyle, entries: &[EnumEntry]) -> Result<i128> {
    ensure_non_empty(entries)?;
    let value = match style {
        DefaultStyle::Zero => 0,
        DefaultStyle::Min => entries[min_index(entries)].value,
        DefaultStyle::Max => entries[max_index(entries)].value,
        DefaultStyle::First => entries[0].value,
        DefaultStyle::Last => entries[entries.len() - 1].value,
        DefaultStyle::UsedBitsSet => entries.iter().fold(0, |mask, e| mask | e.value),
    };
    Ok(value)
}

/// Resolves the default for a definition: explicit entry name, then the
/// per-enum style, then the configured style for its kind.
pub fn resolve_default(definition: &EnumDefinition, config: &GeneratorConfig) -> Result<DefaultValue> {
    if let Some(name) = &definition.default_value_name {
        let index = definition
            .entries
            .iter()
            .position(|e| &e.name == name)
            .ok_or_else(|| ValidationError::UnknownDefault {
                enum_name: definition.name.clone(),
                entry: name.clone(),
            })?;
        return Ok(DefaultValue::Entry(index));
    }

    let style = definition
        .default_style
        .unwrap_or_else(|| config.default_style(definition.kind));

    match definition.kind {
        EnumKind::Value => resolve_value_default(style, &definition.entries).map(DefaultValue::Entry),
        EnumKind::Flags => {
            let value = resolve_flags_default(style, &definition.entries)?;
            // Prefer naming the entry when the mask is exactly one of them.
            match definition.entries.iter().position(|e| e.value == value) {
                Some(index) => Ok(DefaultValue::Entry(index)),
                None => Ok(DefaultValue::Raw(value)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(values: &[(&str, i128)]) -> Vec<EnumEntry> {
        values.iter().map(|(n, v)| EnumEntry::new(*n, *v)).collect()
    }

    #[test]
    fn test_value_styles() {
        let e = entries(&[("A", 5), ("B", 1), ("C", 9)]);
        assert_eq!(resolve_value_default(DefaultStyle::Min, &e).unwrap(), 1);
        assert_eq!(resolve_value_default(DefaultStyle::Max, &e).unwrap(), 2);
        assert_eq!(resolve_value_default(DefaultStyle::First, &e).unwrap(), 0);
        assert_eq!(resolve_value_default(DefaultStyle::Last, &e).unwrap(), 2);
    }

    #[test]
    fn test_ties_pick_first_occurrence() {
        let e = entries(&[("A", 3), ("B", 1), ("Alias", 1), ("C", 3)]);
        assert_eq!(resolve_value_default(DefaultStyle::Min, &e).unwrap(), 1);
        assert_eq!(resolve_value_default(DefaultStyle::Max, &e).unwrap(), 0);
    }

    #[test]
    fn test_value_rejects_flags_styles() {
        let e = entries(&[("A", 0)]);
        assert!(resolve_value_default(DefaultStyle::Zero, &e).is_err());
        assert!(resolve_value_default(DefaultStyle::UsedBitsSet, &e).is_err());
    }

    #[test]
    fn test_empty_entries_fail() {
        assert!(matches!(
            resolve_value_default(DefaultStyle::First, &[]),
            Err(EnumwrightError::Config(_))
        ));
        assert!(matches!(
            resolve_flags_default(DefaultStyle::Zero, &[]),
            Err(EnumwrightError::Config(_))
        ));
    }

    #[test]
    fn test_flags_styles() {
        let e = entries(&[("Read", 4), ("Write", 1), ("Exec", 16)]);
        assert_eq!(resolve_flags_default(DefaultStyle::Zero, &e).unwrap(), 0);
        assert_eq!(resolve_flags_default(DefaultStyle::Min, &e).unwrap(), 1);
        assert_eq!(resolve_flags_default(DefaultStyle::Max, &e).unwrap(), 16);
        assert_eq!(resolve_flags_default(DefaultStyle::First, &e).unwrap(), 4);
        assert_eq!(resolve_flags_default(DefaultStyle::Last, &e).unwrap(), 16);
        assert_eq!(resolve_flags_default(DefaultStyle::UsedBitsSet, &e).unwrap(), 21);
    }

    #[test]
    fn test_resolve_default_precedence() {
        let config = GeneratorConfig::default();
        let def = EnumDefinition::new("Level", EnumKind::Value, 0)
            .with_entries([("Low", 5), ("Mid", 1), ("High", 9)]);
        assert_eq!(resolve_default(&def, &config).unwrap(), DefaultValue::Entry(0));

        let def = def.with_default_style(DefaultStyle::Min);
        assert_eq!(resolve_default(&def, &config).unwrap(), DefaultValue::Entry(1));

        let def = def.with_default_value("High");
        assert_eq!(resolve_default(&def, &config).unwrap(), DefaultValue::Entry(2));
    }

    #[test]
    fn test_resolve_default_unknown_name() {
        let config = GeneratorConfig::default();
        let def = EnumDefinition::new("Level", EnumKind::Value, 0)
            .with_entry("Low", 0)
            .with_default_value("Missing");
        let err = resolve_default(&def, &config).unwrap_err();
        assert!(matches!(
            err.as_validation(),
            Some(ValidationError::UnknownDefault { entry, .. }) if entry == "Missing"
        ));
    }

    #[test]
    fn test_flags_default_raw_mask() {
        let config = GeneratorConfig::default();
        let def = EnumDefinition::new("Perms", EnumKind::Flags, 6)
            .with_entries([("Read", 1), ("Write", 2)]);
        assert_eq!(resolve_default(&def, &config).unwrap(), DefaultValue::Raw(0));

        let def = def.with_default_style(DefaultStyle::UsedBitsSet);
        assert_eq!(resolve_default(&def, &config).unwrap(), DefaultValue::Raw(3));

        let def = def.with_default_style(DefaultStyle::Last);
        assert_eq!(resolve_default(&def, &config).unwrap(), DefaultValue::Entry(1));
    }
}
