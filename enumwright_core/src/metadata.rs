//! Per-definition metadata derived fresh on every generation pass.

use crate::bits::{
    size_type_range, transmission_bits_required, value_storage_bits_required,
};
use crate::config::{GeneratorConfig, SizeType};
use crate::contiguity::{is_contiguous_flags, is_contiguous_values, used_bits_mask};
use crate::default::{DefaultValue, resolve_default};
use crate::error::{Result, UnsupportedConfigurationError};
use crate::types::{EnumDefinition, EnumEntry, EnumKind};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// Shape of the emitted `is_valid` body, cheapest applicable form first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidityCheck {
    /// Exactly one distinct value
    SingleValue(i128),
    /// Every value of the storage type is a member
    Always,
    /// Contiguous run starting at the storage type minimum
    UpperBound(i128),
    /// Contiguous run ending at the storage type maximum
    LowerBound(i128),
    /// Contiguous run inside the storage range
    Range { min: i128, max: i128 },
    /// Gaps present; linear scan of the values table
    Scan(Vec<i128>),
    /// Flags occupying a solid block from bit zero: `v <= mask`
    FlagsLowMask(u128),
    /// Any other flag layout: no bits outside `mask`
    FlagsMask(u128),
}

impl ValidityCheck {
    /// Evaluates the predicate the emitted code implements, for a value
    /// already inside the storage range.
    pub fn accepts(&self, v: i128) -> bool {
        match self {
            ValidityCheck::SingleValue(x) => v == *x,
            ValidityCheck::Always => true,
            ValidityCheck::UpperBound(max) => v <= *max,
            ValidityCheck::LowerBound(min) => v >= *min,
            ValidityCheck::Range { min, max } => *min <= v && v <= *max,
            ValidityCheck::Scan(values) => values.binary_search(&v).is_ok(),
            ValidityCheck::FlagsLowMask(mask) => v >= 0 && (v as u128) <= *mask,
            ValidityCheck::FlagsMask(mask) => v >= 0 && (v as u128) & !*mask == 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedMetadata {
    /// First entry holding the smallest value
    pub min_entry: usize,
    /// First entry holding the largest value
    pub max_entry: usize,
    pub default: DefaultValue,
    /// Distinct values, ascending
    pub unique_values: Vec<i128>,
    /// Distinct values; aliases sharing a value count once
    pub unique_value_count: usize,
    pub is_contiguous: bool,
    pub bits_required_storage: u32,
    pub bits_required_transmission: u32,
    /// OR of every value; zero for value enums
    pub used_bits_mask: u128,
    pub validity: ValidityCheck,
}

pub fn derive_metadata(definition: &EnumDefinition, config: &GeneratorConfig) -> Result<DerivedMetadata> {
    let size_type = config
        .size_types
        .get(definition.size_type_index)
        .ok_or_else(|| UnsupportedConfigurationError::UnknownSizeType {
            enum_name: definition.name.clone(),
            index: definition.size_type_index,
            registry_len: config.size_types.len(),
        })?;

    let default = resolve_default(definition, config)?;
    let entries = &definition.entries;

    let mut min_entry = 0;
    let mut max_entry = 0;
    for (index, entry) in entries.iter().enumerate() {
        if entry.value < entries[min_entry].value {
            min_entry = index;
        }
        if entry.value > entries[max_entry].value {
            max_entry = index;
        }
    }
    let min = entries[min_entry].value;
    let max = entries[max_entry].value;

    let unique: BTreeSet<i128> = entries.iter().map(|e| e.value).collect();

    let (is_contiguous, bits_required_storage, used_bits_mask) = match definition.kind {
        EnumKind::Value => (
            is_contiguous_values(&unique),
            value_storage_bits_required(min, max, size_type.is_signed),
            0,
        ),
        EnumKind::Flags => (
            is_contiguous_flags(&unique),
            value_storage_bits_required(0, max, false),
            used_bits_mask(&unique),
        ),
    };

    let unique_values: Vec<i128> = unique.into_iter().collect();
    let validity = match definition.kind {
        EnumKind::Value => value_validity(&unique_values, is_contiguous, size_type),
        EnumKind::Flags => flags_validity(used_bits_mask, is_contiguous, size_type),
    };

    let metadata = DerivedMetadata {
        min_entry,
        max_entry,
        default,
        unique_value_count: unique_values.len(),
        unique_values,
        is_contiguous,
        bits_required_storage,
        bits_required_transmission: transmission_bits_required(definition.kind, min, max),
        used_bits_mask,
        validity,
    };

    debug!(
        enum_name = %definition.name,
        min = %min,
        max = %max,
        count = metadata.unique_value_count,
        contiguous = metadata.is_contiguous,
        storage_bits = metadata.bits_required_storage,
        transmission_bits = metadata.bits_required_transmission,
        "Derived enum metadata"
    );

    Ok(metadata)
}

fn value_validity(unique: &[i128], is_contiguous: bool, size_type: &SizeType) -> ValidityCheck {
    let min = unique[0];
    let max = unique[unique.len() - 1];
    if unique.len() == 1 {
        return ValidityCheck::SingleValue(min);
    }
    if !is_contiguous {
        return ValidityCheck::Scan(unique.to_vec());
    }
    let (lowest, highest) = size_type_range(size_type);
    match (min == lowest, max == highest) {
        (true, true) => ValidityCheck::Always,
        (true, false) => ValidityCheck::UpperBound(max),
        (false, true) => ValidityCheck::LowerBound(min),
        (false, false) => ValidityCheck::Range { min, max },
    }
}

fn flags_validity(mask: u128, is_contiguous: bool, size_type: &SizeType) -> ValidityCheck {
    let (_, highest) = size_type_range(size_type);
    if mask == highest as u128 {
        ValidityCheck::Always
    } else if is_contiguous && mask & 1 == 1 {
        ValidityCheck::FlagsLowMask(mask)
    } else {
        ValidityCheck::FlagsMask(mask)
    }
}

/// A validated definition bundled with its storage type and metadata; the
/// unit the emitters render.
#[derive(Debug, Clone)]
pub struct EnumModel<'a> {
    pub definition: &'a EnumDefinition,
    pub size_type: &'a SizeType,
    pub metadata: DerivedMetadata,
}

impl<'a> EnumModel<'a> {
    pub fn build(definition: &'a EnumDefinition, config: &'a GeneratorConfig) -> Result<Self> {
        let metadata = derive_metadata(definition, config)?;
        // derive_metadata already rejected an out-of-range index
        let size_type = &config.size_types[definition.size_type_index];
        Ok(Self {
            definition,
            size_type,
            metadata,
        })
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn kind(&self) -> EnumKind {
        self.definition.kind
    }

    pub fn min(&self) -> &EnumEntry {
        &self.definition.entries[self.metadata.min_entry]
    }

    pub fn max(&self) -> &EnumEntry {
        &self.definition.entries[self.metadata.max_entry]
    }

    pub fn default_value(&self) -> i128 {
        self.metadata.default.value(&self.definition.entries)
    }

    /// Entry the default resolves to, if it names one.
    pub fn default_entry(&self) -> Option<&EnumEntry> {
        match self.metadata.default {
            DefaultValue::Entry(index) => Some(&self.definition.entries[index]),
            DefaultValue::Raw(_) => None,
        }
    }

    /// First entry declared for each distinct value, in ascending value order.
    /// These are the names `to_string` returns.
    pub fn canonical_entries(&self) -> Vec<&EnumEntry> {
        self.metadata
            .unique_values
            .iter()
            .filter_map(|v| self.definition.entries.iter().find(|e| e.value == *v))
            .collect()
    }
}
