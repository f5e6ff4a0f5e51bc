use crate::config::DefaultStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumKind {
    /// Mutually exclusive states
    Value,
    /// Independent bits combined into a mask
    Flags,
}

impl EnumKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnumKind::Value => "value",
            EnumKind::Flags => "flags",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntry {
    pub name: String,
    pub description: String,
    pub value: i128,
}

impl EnumEntry {
    pub fn new(name: impl Into<String>, value: i128) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            value,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDefinition {
    pub name: String,
    pub description: String,
    pub kind: EnumKind,
    pub entries: Vec<EnumEntry>,
    /// Entry the default-constructed instance holds; overrides any style
    pub default_value_name: Option<String>,
    /// Per-enum override of the global default style
    pub default_style: Option<DefaultStyle>,
    /// Index into `GeneratorConfig::size_types`
    pub size_type_index: usize,
}

impl EnumDefinition {
    pub fn new(name: impl Into<String>, kind: EnumKind, size_type_index: usize) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind,
            entries: Vec::new(),
            default_value_name: None,
            default_style: None,
            size_type_index,
        }
    }

    pub fn with_entry(mut self, name: impl Into<String>, value: i128) -> Self {
        self.entries.push(EnumEntry::new(name, value));
        self
    }

    pub fn with_entries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, i128)>,
        S: Into<String>,
    {
        self.entries
            .extend(entries.into_iter().map(|(name, value)| EnumEntry::new(name, value)));
        self
    }

    pub fn with_default_style(mut self, style: DefaultStyle) -> Self {
        self.default_style = Some(style);
        self
    }

    pub fn with_default_value(mut self, name: impl Into<String>) -> Self {
        self.default_value_name = Some(name.into());
        self
    }

    pub fn is_flags(&self) -> bool {
        self.kind == EnumKind::Flags
    }

    pub fn entry(&self, name: &str) -> Option<&EnumEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}
