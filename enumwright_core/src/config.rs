use crate::error::{EnumwrightError, Result};
use crate::types::EnumKind;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex is valid"));

const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "compl", "concept",
    "const", "consteval", "constexpr", "constinit", "const_cast", "continue", "co_await",
    "co_return", "co_yield", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "thread_local",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// True when `name` can be used verbatim as a C++ identifier.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name) && !CPP_KEYWORDS.contains(&name)
}

/// Rule used to pick the value a default-constructed instance holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultStyle {
    /// Entry with the smallest value, first occurrence wins ties
    Min,
    /// Entry with the largest value, first occurrence wins ties
    Max,
    /// First entry in declaration order
    First,
    /// Last entry in declaration order
    Last,
    /// No bits set (flags only)
    Zero,
    /// Every defined bit set (flags only)
    UsedBitsSet,
}

impl DefaultStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultStyle::Min => "min",
            DefaultStyle::Max => "max",
            DefaultStyle::First => "first",
            DefaultStyle::Last => "last",
            DefaultStyle::Zero => "zero",
            DefaultStyle::UsedBitsSet => "used_bits_set",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeGuard {
    None,
    #[default]
    PragmaOnce,
    CStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Which string conversion helpers get emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StringTableMode {
    None,
    #[default]
    Names,
    NamesAndDescriptions,
}

impl StringTableMode {
    pub fn has_names(&self) -> bool {
        !matches!(self, StringTableMode::None)
    }

    pub fn has_descriptions(&self) -> bool {
        matches!(self, StringTableMode::NamesAndDescriptions)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StringType {
    #[default]
    Narrow,
    Wide,
}

impl StringType {
    pub fn view_type(&self) -> &'static str {
        match self {
            StringType::Narrow => "std::string_view",
            StringType::Wide => "std::wstring_view",
        }
    }

    pub fn literal_prefix(&self) -> &'static str {
        match self {
            StringType::Narrow => "",
            StringType::Wide => "L",
        }
    }
}

/// Underlying storage the emitted type uses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SizeType {
    pub name: String,
    pub bits: u32,
    #[serde(default)]
    pub is_signed: bool,
    #[serde(rename = "type_name")]
    pub generated_type_name: String,
}

impl SizeType {
    pub fn new(name: &str, bits: u32, is_signed: bool, generated_type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            bits,
            is_signed,
            generated_type_name: generated_type_name.to_string(),
        }
    }
}

pub fn builtin_size_types() -> Vec<SizeType> {
    vec![
        SizeType::new("int8", 8, true, "std::int8_t"),
        SizeType::new("int16", 16, true, "std::int16_t"),
        SizeType::new("int32", 32, true, "std::int32_t"),
        SizeType::new("int64", 64, true, "std::int64_t"),
        SizeType::new("uint8", 8, false, "std::uint8_t"),
        SizeType::new("uint16", 16, false, "std::uint16_t"),
        SizeType::new("uint32", 32, false, "std::uint32_t"),
        SizeType::new("uint64", 64, false, "std::uint64_t"),
    ]
}

fn default_indent() -> String {
    "    ".to_string()
}

fn default_runtime_namespace() -> String {
    "enumwright".to_string()
}

fn default_true() -> bool {
    true
}

fn default_value_style() -> DefaultStyle {
    DefaultStyle::First
}

fn default_flags_style() -> DefaultStyle {
    DefaultStyle::Zero
}

fn default_size_type_name() -> String {
    "uint32".to_string()
}

/// Formatting policy and feature toggles for one generation pass.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneratorConfig {
    /// Namespace path the generated types live in, outermost first
    #[serde(default)]
    pub namespace: Vec<String>,
    #[serde(default)]
    pub include_guard: IncludeGuard,
    /// Macro used by the `c_style` guard; derived from the namespace when unset
    #[serde(default)]
    pub include_guard_macro: Option<String>,
    #[serde(default)]
    pub line_ending: LineEnding,
    #[serde(default = "default_indent")]
    pub indent: String,
    /// Lines copied verbatim to the top of the output
    #[serde(default)]
    pub preamble: Vec<String>,
    /// Extra headers; bare names get `<>`, `"local.h"` and `<name>` are kept
    #[serde(default)]
    pub additional_includes: Vec<String>,
    #[serde(default)]
    pub string_table: StringTableMode,
    #[serde(default)]
    pub string_type: StringType,
    #[serde(default = "default_true")]
    pub emit_bitfield_macros: bool,
    #[serde(default = "default_true")]
    pub emit_type_trait_extensions: bool,
    #[serde(default)]
    pub embed_timestamp: bool,
    /// Namespace of the shared runtime templates; also the macro prefix
    #[serde(default = "default_runtime_namespace")]
    pub runtime_namespace: String,
    /// Reject flags values with more than one bit set
    #[serde(default)]
    pub strict_single_bit_flags: bool,
    #[serde(default = "default_value_style")]
    pub value_enum_default_style: DefaultStyle,
    #[serde(default = "default_flags_style")]
    pub flags_enum_default_style: DefaultStyle,
    #[serde(default = "default_size_type_name")]
    pub default_value_enum_size_type: String,
    #[serde(default = "default_size_type_name")]
    pub default_flags_enum_size_type: String,
    #[serde(default = "builtin_size_types")]
    pub size_types: Vec<SizeType>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            namespace: Vec::new(),
            include_guard: IncludeGuard::default(),
            include_guard_macro: None,
            line_ending: LineEnding::default(),
            indent: default_indent(),
            preamble: Vec::new(),
            additional_includes: Vec::new(),
            string_table: StringTableMode::default(),
            string_type: StringType::default(),
            emit_bitfield_macros: true,
            emit_type_trait_extensions: true,
            embed_timestamp: false,
            runtime_namespace: default_runtime_namespace(),
            strict_single_bit_flags: false,
            value_enum_default_style: default_value_style(),
            flags_enum_default_style: default_flags_style(),
            default_value_enum_size_type: default_size_type_name(),
            default_flags_enum_size_type: default_size_type_name(),
            size_types: builtin_size_types(),
        }
    }
}

impl GeneratorConfig {
    /// Looks up a size type by its registry name.
    pub fn size_type_index(&self, name: &str) -> Result<usize> {
        self.size_types
            .iter()
            .position(|st| st.name == name)
            .ok_or_else(|| {
                EnumwrightError::config(format!("unknown size type `{}`", name))
            })
    }

    pub fn default_size_type_index(&self, kind: EnumKind) -> Result<usize> {
        match kind {
            EnumKind::Value => self.size_type_index(&self.default_value_enum_size_type),
            EnumKind::Flags => self.size_type_index(&self.default_flags_enum_size_type),
        }
    }

    pub fn default_style(&self, kind: EnumKind) -> DefaultStyle {
        match kind {
            EnumKind::Value => self.value_enum_default_style,
            EnumKind::Flags => self.flags_enum_default_style,
        }
    }

    /// Checks the fields serde cannot: identifiers, registry shape, policy applicability.
    pub fn check(&self) -> Result<()> {
        debug!(
            size_types = self.size_types.len(),
            namespace_depth = self.namespace.len(),
            "Checking generator configuration"
        );

        for segment in &self.namespace {
            if !is_identifier(segment) {
                return Err(EnumwrightError::invalid_config_value("namespace", segment));
            }
        }
        if !is_identifier(&self.runtime_namespace) {
            return Err(EnumwrightError::invalid_config_value(
                "runtime_namespace",
                &self.runtime_namespace,
            ));
        }
        if let Some(guard) = &self.include_guard_macro {
            if !is_identifier(guard) {
                return Err(EnumwrightError::invalid_config_value(
                    "include_guard_macro",
                    guard,
                ));
            }
        }
        if self.indent.chars().any(|c| c != ' ' && c != '\t') {
            return Err(EnumwrightError::invalid_config_value(
                "indent",
                format!("{:?}", self.indent),
            ));
        }

        if self.size_types.is_empty() {
            return Err(EnumwrightError::config("size type registry is empty"));
        }
        let mut seen = HashSet::new();
        for size_type in &self.size_types {
            trace!(name = %size_type.name, bits = size_type.bits, "Checking size type");
            if !seen.insert(size_type.name.as_str()) {
                return Err(EnumwrightError::config(format!(
                    "size type `{}` is declared twice",
                    size_type.name
                )));
            }
            if size_type.bits == 0 || size_type.bits > 128 {
                return Err(EnumwrightError::invalid_config_value(
                    format!("size_types.{}.bits", size_type.name),
                    size_type.bits.to_string(),
                ));
            }
            if size_type.generated_type_name.trim().is_empty() {
                return Err(EnumwrightError::invalid_config_value(
                    format!("size_types.{}.type_name", size_type.name),
                    "",
                ));
            }
        }
        self.default_size_type_index(EnumKind::Value)?;
        self.default_size_type_index(EnumKind::Flags)?;

        if matches!(
            self.value_enum_default_style,
            DefaultStyle::Zero | DefaultStyle::UsedBitsSet
        ) {
            return Err(EnumwrightError::invalid_config_value(
                "value_enum_default_style",
                self.value_enum_default_style.as_str(),
            ));
        }

        Ok(())
    }

    /// Prefix for every emitted macro, e.g. `ENUMWRIGHT`.
    pub fn macro_prefix(&self) -> String {
        self.runtime_namespace.to_uppercase()
    }
}
