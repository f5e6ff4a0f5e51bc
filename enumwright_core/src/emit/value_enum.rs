//! Wrapper struct for plain value enums.

use super::RenderContext;
use super::members::{
    open_struct, write_equality, write_introspection, write_string_table, write_validity,
    write_value_declarations,
};
use super::writer::CodeWriter;
use crate::metadata::EnumModel;
use tracing::trace;

pub fn render_value_enum(ctx: &RenderContext<'_>, model: &EnumModel<'_>) -> String {
    trace!(enum_name = %model.name(), "Rendering value enum");
    let nd = ctx.nodiscard();
    let p = &ctx.prefix;
    let name = model.name();
    let default_name = model
        .default_entry()
        .map(|e| e.name.as_str())
        .unwrap_or_else(|| model.min().name.as_str());

    let mut w = CodeWriter::new(&ctx.config.indent);
    open_struct(&mut w, model);
    write_value_declarations(&mut w, model);
    w.blank();

    w.line(format!(
        "constexpr {name}() noexcept : value_(Value::{default_name}) {{}}"
    ));
    w.line(format!("constexpr {name}(Value v) noexcept : value_(v) {{}}"));
    w.blank();

    w.open(format!(
        "{nd} static constexpr {name} from_underlying_unsafe(underlying_type v) noexcept"
    ));
    w.line(format!("{p}_ASSERT(is_valid(v));"));
    w.line(format!("return {name}(static_cast<Value>(v));"));
    w.close("}");
    w.open(format!(
        "{nd} static constexpr std::optional<{name}> from_integer(underlying_type v) noexcept"
    ));
    w.open("if (!is_valid(v))");
    w.line("return std::nullopt;");
    w.close("}");
    w.line(format!("return {name}(static_cast<Value>(v));"));
    w.close("}");
    w.blank();

    w.function(format!("{nd} constexpr Value value() const noexcept"), "return value_;");
    w.function("constexpr operator Value() const noexcept", "return value_;");
    w.function(
        format!("{nd} constexpr underlying_type to_underlying() const noexcept"),
        "return static_cast<underlying_type>(value_);",
    );
    w.function(
        "constexpr void reset_to_default() noexcept",
        "value_ = default_value();",
    );
    w.blank();

    w.function(
        format!("{nd} static constexpr Value default_value() noexcept"),
        format!("return Value::{default_name};"),
    );
    write_introspection(&mut w, ctx, model);
    w.blank();
    write_validity(&mut w, ctx, model);
    write_string_table(&mut w, ctx, model, "value_", |entry| format!("Value::{}", entry));
    w.blank();
    write_equality(&mut w, model);
    w.blank();

    w.dedent();
    w.line("private:");
    w.indent();
    w.line("Value value_;");
    w.close("};");
    w.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeneratorConfig, StringTableMode, StringType};
    use crate::types::{EnumDefinition, EnumKind};

    fn render(config: &GeneratorConfig, def: &EnumDefinition) -> String {
        let model = EnumModel::build(def, config).unwrap();
        render_value_enum(&RenderContext::new(config), &model)
    }

    fn color(config: &GeneratorConfig) -> EnumDefinition {
        EnumDefinition::new("Color", EnumKind::Value, config.size_type_index("uint8").unwrap())
            .with_entries([("Red", 0), ("Green", 1), ("Blue", 2)])
    }

    #[test]
    fn test_color_members() {
        let config = GeneratorConfig::default();
        let out = render(&config, &color(&config));
        assert!(out.starts_with("struct Color\n{\n    using underlying_type = std::uint8_t;\n"));
        assert!(out.contains("        Red = 0,\n        Green = 1,\n        Blue = 2,\n"));
        assert!(out.contains("static constexpr Value Green = Value::Green;"));
        assert!(out.contains("constexpr Color() noexcept : value_(Value::Red) {}"));
        assert!(out.contains("static constexpr std::size_t count() noexcept\n    {\n        return 3;"));
        assert!(out.contains("static constexpr int bits_required_storage() noexcept\n    {\n        return 2;"));
        assert!(out.contains("return v <= 2;"));
        assert!(out.contains("case Value::Blue:\n                return \"Blue\";"));
        assert!(out.contains("{ \"Green\", Value::Green },"));
        assert!(out.contains("ENUMWRIGHT_ASSERT(is_valid(v));"));
        assert!(out.ends_with("private:\n    Value value_;\n};\n"));
        assert!(!out.contains("description()"));
    }

    #[test]
    fn test_single_entry_avoids_switch_and_loop() {
        let config = GeneratorConfig::default();
        let def = EnumDefinition::new("Only", EnumKind::Value, 0).with_entry("One", 5);
        let out = render(&config, &def);
        assert!(!out.contains("switch"));
        assert!(!out.contains("for (const NameEntry& entry : names)"));
        assert!(out.contains("if (value_ == Value::One)"));
        assert!(out.contains("if (s == \"One\")"));
        assert!(out.contains("return v == 5;"));
    }

    #[test]
    fn test_aliases_share_a_case() {
        let config = GeneratorConfig::default();
        let def = EnumDefinition::new("Mode", EnumKind::Value, 0)
            .with_entries([("Fast", 0), ("Quick", 0), ("Slow", 1)]);
        let out = render(&config, &def);
        assert!(out.contains("case Value::Fast:"));
        assert!(!out.contains("case Value::Quick:"));
        assert!(out.contains("{ \"Quick\", Value::Quick },"));
        assert!(out.contains("std::array<Value, 2> values"));
        assert!(out.contains("std::array<NameEntry, 3> names"));
    }

    #[test]
    fn test_gaps_use_scan() {
        let config = GeneratorConfig::default();
        let def = EnumDefinition::new("Sparse", EnumKind::Value, 0)
            .with_entries([("A", -3), ("B", 0), ("C", 7)]);
        let out = render(&config, &def);
        assert!(out.contains("for (const Value candidate : values)"));
        assert!(out.contains("A = -3,"));
    }

    #[test]
    fn test_string_table_modes() {
        let mut config = GeneratorConfig {
            string_table: StringTableMode::None,
            ..Default::default()
        };
        let def = color(&config).with_entry("Black", 3);
        let out = render(&config, &def);
        assert!(!out.contains("to_string"));
        assert!(!out.contains("NameEntry"));

        config.string_table = StringTableMode::NamesAndDescriptions;
        let mut def = color(&config);
        def.entries[0].description = "Warm".to_string();
        let out = render(&config, &def);
        assert!(out.contains("description() const noexcept"));
        assert!(out.contains("case Value::Red:\n                return \"Warm\";"));
    }

    #[test]
    fn test_wide_strings() {
        let config = GeneratorConfig {
            string_type: StringType::Wide,
            ..Default::default()
        };
        let out = render(&config, &color(&config));
        assert!(out.contains("std::wstring_view name;"));
        assert!(out.contains("return L\"Red\";"));
        assert!(out.contains("from_string(std::wstring_view s)"));
    }

    #[test]
    fn test_descriptions_become_comments() {
        let config = GeneratorConfig::default();
        let mut def = color(&config);
        def.description = "Primary colors\nof light".to_string();
        def.entries[1].description = "Grass".to_string();
        let out = render(&config, &def);
        assert!(out.starts_with("// Primary colors\n// of light\nstruct Color\n"));
        assert!(out.contains("        // Grass\n        Green = 1,\n"));
    }

    #[test]
    fn test_backslash_description_keeps_next_line() {
        let config = GeneratorConfig::default();
        let mut def = EnumDefinition::new("Dir", EnumKind::Value, 0).with_entry("Root", 0);
        def.description = "Drive C:\\".to_string();
        def.entries[0].description = "Windows root C:\\".to_string();
        let out = render(&config, &def);
        assert!(out.starts_with("// Drive C:\\ //\nstruct Dir\n"));
        assert!(out.contains("        // Windows root C:\\ //\n        Root = 0,\n"));
        assert!(!out.contains("\\\n"));
    }
}
