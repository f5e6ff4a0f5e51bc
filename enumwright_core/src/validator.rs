//! Structural checks over a definition set. Fail-fast: the first violation
//! aborts the pass before anything is emitted.

use crate::bits::size_type_range;
use crate::config::GeneratorConfig;
use crate::error::{Result, UnsupportedConfigurationError, ValidationError};
use crate::types::EnumDefinition;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, trace, warn};

/// Members every generated wrapper declares; an entry with one of these names
/// would shadow or collide with them.
pub const RESERVED_MEMBER_NAMES: &[&str] = &[
    "Value",
    "underlying_type",
    "value",
    "value_",
    "to_underlying",
    "reset_to_default",
    "reset_zero",
    "default_value",
    "min",
    "max",
    "count",
    "values",
    "is_contiguous",
    "bits_required_storage",
    "bits_required_transmission",
    "is_valid",
    "from_integer",
    "from_underlying_unsafe",
    "from_string",
    "to_string",
    "description",
    "NameEntry",
    "names",
    "test",
    "set",
    "unset",
    "flip",
    "flip_all",
    "all",
    "any",
    "none",
    "is_single",
    "all_flags_mask",
];

pub fn validate_definitions(config: &GeneratorConfig, definitions: &[EnumDefinition]) -> Result<()> {
    info!(definition_count = definitions.len(), "Validating enum definitions");

    check_unique_enum_names(definitions)?;
    for definition in definitions {
        validate_definition(config, definition)?;
    }

    debug!("All enum definitions passed validation");
    Ok(())
}

fn check_unique_enum_names(definitions: &[EnumDefinition]) -> Result<()> {
    let mut seen = HashSet::new();
    for definition in definitions {
        if !seen.insert(definition.name.as_str()) {
            warn!(enum_name = %definition.name, "Duplicate enum name");
            return Err(ValidationError::DuplicateEnumName {
                enum_name: definition.name.clone(),
            }
            .into());
        }
    }
    Ok(())
}

fn validate_definition(config: &GeneratorConfig, definition: &EnumDefinition) -> Result<()> {
    trace!(
        enum_name = %definition.name,
        kind = definition.kind.as_str(),
        entries = definition.entries.len(),
        "Validating enum"
    );
    let enum_name = || definition.name.clone();

    let mut names = HashSet::new();
    for entry in &definition.entries {
        if !names.insert(entry.name.as_str()) {
            return Err(ValidationError::DuplicateEntryName {
                enum_name: enum_name(),
                entry: entry.name.clone(),
            }
            .into());
        }
    }

    if definition.entries.is_empty() {
        return Err(ValidationError::EmptyEnum {
            enum_name: enum_name(),
        }
        .into());
    }

    let size_type = config.size_types.get(definition.size_type_index);

    if definition.is_flags() {
        for entry in &definition.entries {
            if entry.value < 0 {
                return Err(ValidationError::NegativeFlagValue {
                    enum_name: enum_name(),
                    entry: entry.name.clone(),
                    value: entry.value,
                }
                .into());
            }
        }

        let mut first_by_value: HashMap<i128, &str> = HashMap::new();
        for entry in &definition.entries {
            if let Some(first) = first_by_value.insert(entry.value, entry.name.as_str()) {
                return Err(ValidationError::DuplicateFlagValue {
                    enum_name: enum_name(),
                    entry: entry.name.clone(),
                    first: first.to_string(),
                    value: entry.value,
                }
                .into());
            }
        }

        if let Some(size_type) = size_type {
            if size_type.is_signed {
                return Err(UnsupportedConfigurationError::SignedFlagsStorage {
                    enum_name: enum_name(),
                    size_type: size_type.name.clone(),
                }
                .into());
            }
        }
    }

    let Some(size_type) = size_type else {
        return Err(UnsupportedConfigurationError::UnknownSizeType {
            enum_name: enum_name(),
            index: definition.size_type_index,
            registry_len: config.size_types.len(),
        }
        .into());
    };

    let (lowest, highest) = size_type_range(size_type);
    for entry in &definition.entries {
        if entry.value < lowest || entry.value > highest {
            return Err(ValidationError::ValueOutOfRange {
                enum_name: enum_name(),
                entry: entry.name.clone(),
                value: entry.value,
                size_type: size_type.name.clone(),
            }
            .into());
        }
    }

    for entry in &definition.entries {
        if entry.name == definition.name || RESERVED_MEMBER_NAMES.contains(&entry.name.as_str()) {
            return Err(ValidationError::ReservedEntryName {
                enum_name: enum_name(),
                entry: entry.name.clone(),
            }
            .into());
        }
    }

    if definition.is_flags() && config.strict_single_bit_flags {
        for entry in &definition.entries {
            if entry.value.count_ones() != 1 {
                return Err(ValidationError::MultiBitFlagValue {
                    enum_name: enum_name(),
                    entry: entry.name.clone(),
                    value: entry.value,
                }
                .into());
            }
        }
    }

    if let Some(name) = &definition.default_value_name {
        if definition.entry(name).is_none() {
            return Err(ValidationError::UnknownDefault {
                enum_name: enum_name(),
                entry: name.clone(),
            }
            .into());
        }
    }

    Ok(())
}
