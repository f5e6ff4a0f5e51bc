//! C++ header emission.
//!
//! `generate` is the single entry point: it checks the configuration,
//! validates every definition, derives metadata and only then renders. Each
//! definition renders independently on the rayon pool; results are merged in
//! input order so the output is byte-stable.

pub mod boilerplate;
pub mod flags_enum;
pub mod literal;
pub mod members;
pub mod value_enum;
pub mod writer;

use crate::config::{GeneratorConfig, IncludeGuard, LineEnding};
use crate::error::Result;
use crate::metadata::EnumModel;
use crate::types::{EnumDefinition, EnumKind};
use crate::validator::validate_definitions;
use chrono::{DateTime, Local};
use convert_case::{Case, Casing};
use rayon::prelude::*;
use tracing::{debug, info};
use writer::CodeWriter;

const STANDARD_INCLUDES: [&str; 6] = [
    "array",
    "cassert",
    "cstddef",
    "cstdint",
    "optional",
    "string_view",
];

/// Everything a renderer needs besides the model it renders.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub config: &'a GeneratorConfig,
    /// Macro prefix, the upper-cased runtime namespace
    pub prefix: String,
}

impl<'a> RenderContext<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self {
            config,
            prefix: config.macro_prefix(),
        }
    }

    pub fn runtime(&self) -> &str {
        &self.config.runtime_namespace
    }

    pub fn nodiscard(&self) -> String {
        format!("{}_NODISCARD", self.prefix)
    }

    pub fn view_type(&self) -> &'static str {
        self.config.string_type.view_type()
    }

    pub fn string_literal(&self, text: &str) -> String {
        literal::string_literal(text, self.config.string_type)
    }
}

/// Macro name for a `c_style` include guard.
pub fn include_guard_macro(config: &GeneratorConfig) -> String {
    if let Some(name) = &config.include_guard_macro {
        return name.clone();
    }
    let mut parts: Vec<String> = if config.namespace.is_empty() {
        vec![config.runtime_namespace.to_case(Case::UpperSnake)]
    } else {
        config
            .namespace
            .iter()
            .map(|segment| segment.to_case(Case::UpperSnake))
            .collect()
    };
    parts.push("GENERATED_ENUMS_H".to_string());
    parts.join("_")
}

/// `#include` line for a configured header. Names already wrapped in `<>`
/// or quotes are kept as written; bare names get angle brackets.
fn include_line(header: &str) -> String {
    let header = header.trim();
    let wrapped = (header.starts_with('<') && header.ends_with('>'))
        || (header.len() >= 2 && header.starts_with('"') && header.ends_with('"'));
    if wrapped {
        format!("#include {}", header)
    } else {
        format!("#include <{}>", header)
    }
}

fn write_prologue(w: &mut CodeWriter, config: &GeneratorConfig, timestamp: Option<&DateTime<Local>>) {
    for line in &config.preamble {
        w.line(line);
    }
    w.line(format!(
        "// Generated by enumwright {}. Do not edit by hand.",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(timestamp) = timestamp {
        w.line(format!(
            "// Generated at {}",
            timestamp.format("%Y-%m-%d %H:%M:%S %:z")
        ));
    }

    match config.include_guard {
        IncludeGuard::None => {}
        IncludeGuard::PragmaOnce => {
            w.line("#pragma once");
        }
        IncludeGuard::CStyle => {
            let guard = include_guard_macro(config);
            w.line(format!("#ifndef {}", guard));
            w.line(format!("#define {}", guard));
        }
    }
    w.blank();

    for header in STANDARD_INCLUDES {
        w.line(format!("#include <{}>", header));
    }
    for header in &config.additional_includes {
        w.line(include_line(header));
    }
    w.blank();
}

fn write_epilogue(w: &mut CodeWriter, config: &GeneratorConfig) {
    if config.include_guard == IncludeGuard::CStyle {
        w.line(format!("#endif // {}", include_guard_macro(config)));
    }
}

/// Renders the header, embedding the current local time when
/// `embed_timestamp` is set.
pub fn generate(config: &GeneratorConfig, definitions: &[EnumDefinition]) -> Result<String> {
    let timestamp = config.embed_timestamp.then(Local::now);
    generate_at(config, definitions, timestamp)
}

/// Renders the header with an explicit timestamp line, or none.
pub fn generate_at(
    config: &GeneratorConfig,
    definitions: &[EnumDefinition],
    timestamp: Option<DateTime<Local>>,
) -> Result<String> {
    info!(definitions = definitions.len(), "Generating enum header");
    config.check()?;
    validate_definitions(config, definitions)?;

    let models = definitions
        .iter()
        .map(|definition| EnumModel::build(definition, config))
        .collect::<Result<Vec<_>>>()?;

    let ctx = RenderContext::new(config);
    let rendered: Vec<(String, String)> = models
        .par_iter()
        .map(|model| {
            let body = match model.kind() {
                EnumKind::Value => value_enum::render_value_enum(&ctx, model),
                EnumKind::Flags => flags_enum::render_flags_enum(&ctx, model),
            };
            let mut info_writer = CodeWriter::new(&config.indent);
            members::write_enum_info(&mut info_writer, &ctx, model);
            (body, info_writer.into_string())
        })
        .collect();
    debug!(rendered = rendered.len(), "Rendered enum bodies");

    let mut w = CodeWriter::new(&config.indent);
    write_prologue(&mut w, config, timestamp.as_ref());
    boilerplate::render_boilerplate(&mut w, &ctx);
    w.blank();

    let namespace = config.namespace.join("::");
    if !namespace.is_empty() {
        w.line(format!("namespace {}", namespace));
        w.line("{");
        w.blank();
    }
    for (body, _) in &rendered {
        w.raw(body);
        w.blank();
    }
    if !namespace.is_empty() {
        w.line(format!("}} // namespace {}", namespace));
        w.blank();
    }

    if !rendered.is_empty() {
        w.line(format!("namespace {}", ctx.runtime()));
        w.line("{");
        for (index, (_, info)) in rendered.iter().enumerate() {
            if index > 0 {
                w.blank();
            }
            w.raw(info);
        }
        w.line(format!("}} // namespace {}", ctx.runtime()));
        w.blank();
    }
    write_epilogue(&mut w, config);

    let text = w.into_string();
    let text = match config.line_ending {
        LineEnding::Lf => text,
        LineEnding::Crlf => text.replace('\n', LineEnding::Crlf.as_str()),
    };
    info!(bytes = text.len(), "Generated enum header");
    Ok(text)
}
