//! Wrapper struct for bitmask flags enums.

use super::RenderContext;
use super::literal::hex_literal;
use super::members::{
    open_struct, write_equality, write_introspection, write_string_table, write_validity,
    write_value_declarations,
};
use super::writer::CodeWriter;
use crate::metadata::EnumModel;
use tracing::trace;

const BINARY_OPERATORS: [&str; 3] = ["|", "&", "^"];

fn write_flag_operations(w: &mut CodeWriter, ctx: &RenderContext<'_>) {
    let nd = ctx.nodiscard();
    w.function(
        format!("{nd} constexpr bool test(Value flag) const noexcept"),
        "return (value_ & static_cast<underlying_type>(flag)) == static_cast<underlying_type>(flag);",
    );
    w.function(
        "constexpr void set(Value flag) noexcept",
        "value_ = static_cast<underlying_type>(value_ | static_cast<underlying_type>(flag));",
    );
    w.function(
        "constexpr void unset(Value flag) noexcept",
        "value_ = static_cast<underlying_type>(value_ & ~static_cast<underlying_type>(flag));",
    );
    w.function(
        "constexpr void flip(Value flag) noexcept",
        "value_ = static_cast<underlying_type>(value_ ^ static_cast<underlying_type>(flag));",
    );
    w.function(
        "constexpr void flip_all() noexcept",
        "value_ = static_cast<underlying_type>(value_ ^ all_flags_mask());",
    );
    w.blank();
    w.function(
        format!("{nd} constexpr bool all() const noexcept"),
        "return (value_ & all_flags_mask()) == all_flags_mask();",
    );
    w.function(
        format!("{nd} constexpr bool any() const noexcept"),
        "return (value_ & all_flags_mask()) != 0;",
    );
    w.function(
        format!("{nd} constexpr bool none() const noexcept"),
        "return (value_ & all_flags_mask()) == 0;",
    );
    w.function(
        format!("{nd} constexpr bool is_single() const noexcept"),
        "return value_ != 0 && (value_ & (value_ - 1)) == 0;",
    );
}

fn write_operators(w: &mut CodeWriter, name: &str) {
    w.function(
        "friend constexpr Value operator~(Value a) noexcept",
        "return static_cast<Value>(static_cast<underlying_type>(~static_cast<underlying_type>(a)));",
    );
    w.function(
        format!("friend constexpr {name} operator~({name} a) noexcept"),
        format!("return {name}::from_underlying_unsafe(static_cast<underlying_type>(~a.value_));"),
    );

    for op in BINARY_OPERATORS {
        w.blank();
        w.function(
            format!("friend constexpr Value operator{op}(Value a, Value b) noexcept"),
            format!(
                "return static_cast<Value>(static_cast<underlying_type>(static_cast<underlying_type>(a) {op} static_cast<underlying_type>(b)));"
            ),
        );
        w.function(
            format!("friend constexpr {name} operator{op}({name} a, {name} b) noexcept"),
            format!(
                "return {name}::from_underlying_unsafe(static_cast<underlying_type>(a.value_ {op} b.value_));"
            ),
        );
        w.function(
            format!("friend constexpr {name} operator{op}({name} a, Value b) noexcept"),
            format!("return a {op} {name}(b);"),
        );
        w.function(
            format!("friend constexpr {name} operator{op}(Value a, {name} b) noexcept"),
            format!("return {name}(a) {op} b;"),
        );

        w.open(format!("friend constexpr Value& operator{op}=(Value& a, Value b) noexcept"));
        w.line(format!(
            "a = static_cast<Value>(static_cast<underlying_type>(static_cast<underlying_type>(a) {op} static_cast<underlying_type>(b)));"
        ));
        w.line("return a;");
        w.close("}");
        w.open(format!("friend constexpr {name}& operator{op}=({name}& a, {name} b) noexcept"));
        w.line(format!("a.value_ = static_cast<underlying_type>(a.value_ {op} b.value_);"));
        w.line("return a;");
        w.close("}");
        w.function(
            format!("friend constexpr {name}& operator{op}=({name}& a, Value b) noexcept"),
            format!("return a {op}= {name}(b);"),
        );
    }
}

pub fn render_flags_enum(ctx: &RenderContext<'_>, model: &EnumModel<'_>) -> String {
    trace!(enum_name = %model.name(), "Rendering flags enum");
    let nd = ctx.nodiscard();
    let name = model.name();
    let default_literal = hex_literal(model.default_value() as u128, "underlying_type");
    let all_flags = hex_literal(model.metadata.used_bits_mask, "underlying_type");

    let mut w = CodeWriter::new(&ctx.config.indent);
    open_struct(&mut w, model);
    write_value_declarations(&mut w, model);
    w.blank();

    w.line(format!("constexpr {name}() noexcept : value_({default_literal}) {{}}"));
    w.line(format!(
        "constexpr {name}(Value v) noexcept : value_(static_cast<underlying_type>(v)) {{}}"
    ));
    w.blank();

    w.open(format!(
        "{nd} static constexpr {name} from_underlying_unsafe(underlying_type v) noexcept"
    ));
    w.line(format!("{name} result;"));
    w.line("result.value_ = v;");
    w.line("return result;");
    w.close("}");
    w.open(format!(
        "{nd} static constexpr std::optional<{name}> from_integer(underlying_type v) noexcept"
    ));
    w.open("if (!is_valid(v))");
    w.line("return std::nullopt;");
    w.close("}");
    w.line("return from_underlying_unsafe(v);");
    w.close("}");
    w.blank();

    w.function(
        format!("{nd} constexpr underlying_type to_underlying() const noexcept"),
        "return value_;",
    );
    w.function(
        "constexpr void reset_to_default() noexcept",
        "value_ = default_value();",
    );
    w.function("constexpr void reset_zero() noexcept", "value_ = 0;");
    w.blank();

    w.function(
        format!("{nd} static constexpr underlying_type default_value() noexcept"),
        format!("return {default_literal};"),
    );
    w.function(
        format!("{nd} static constexpr underlying_type all_flags_mask() noexcept"),
        format!("return {all_flags};"),
    );
    write_introspection(&mut w, ctx, model);
    w.blank();
    write_validity(&mut w, ctx, model);
    w.blank();
    write_flag_operations(&mut w, ctx);
    write_string_table(&mut w, ctx, model, "value_", |entry| {
        format!("static_cast<underlying_type>(Value::{})", entry)
    });
    w.blank();
    write_equality(&mut w, model);
    w.blank();
    write_operators(&mut w, name);
    w.blank();

    w.dedent();
    w.line("private:");
    w.indent();
    w.line("underlying_type value_;");
    w.close("};");
    w.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DefaultStyle, GeneratorConfig};
    use crate::types::{EnumDefinition, EnumKind};

    fn perms(config: &GeneratorConfig) -> EnumDefinition {
        EnumDefinition::new("Perms", EnumKind::Flags, config.size_type_index("uint8").unwrap())
            .with_entries([("Read", 1), ("Write", 2), ("Exec", 4)])
    }

    fn render(config: &GeneratorConfig, def: &EnumDefinition) -> String {
        let model = EnumModel::build(def, config).unwrap();
        render_flags_enum(&RenderContext::new(config), &model)
    }

    #[test]
    fn test_flags_use_hex_literals() {
        let config = GeneratorConfig::default();
        let out = render(&config, &perms(&config));
        assert!(out.contains("        Read = 0x1,\n        Write = 0x2,\n        Exec = 0x4,\n"));
        assert!(out.contains("constexpr Perms() noexcept : value_(0x0) {}"));
        assert!(out.contains("static constexpr underlying_type all_flags_mask() noexcept\n    {\n        return 0x7;"));
        assert!(out.contains("return v <= 0x7;"));
    }

    #[test]
    fn test_flags_members_and_operators() {
        let config = GeneratorConfig::default();
        let out = render(&config, &perms(&config));
        for member in ["test(Value flag)", "set(Value flag)", "unset(Value flag)", "flip(Value flag)", "flip_all()", "all()", "any()", "none()", "is_single()"] {
            assert!(out.contains(member), "missing {}", member);
        }
        for op in ["~", "|", "&", "^", "|=", "&=", "^="] {
            assert!(out.contains(&format!("operator{}(", op)), "missing operator{}", op);
        }
        assert!(out.contains("friend constexpr Perms operator|(Value a, Perms b) noexcept"));
        assert!(out.contains("friend constexpr Perms& operator&=(Perms& a, Value b) noexcept"));
        assert!(out.contains("case static_cast<underlying_type>(Value::Exec):"));
        assert!(out.ends_with("private:\n    underlying_type value_;\n};\n"));
    }

    #[test]
    fn test_used_bits_default_and_sparse_mask() {
        let config = GeneratorConfig::default();
        let def = EnumDefinition::new("Opts", EnumKind::Flags, config.size_type_index("uint64").unwrap())
            .with_entries([("Low", 1), ("High", 1 << 40)])
            .with_default_style(DefaultStyle::UsedBitsSet);
        let out = render(&config, &def);
        assert!(out.contains("value_(0x10000000001ULL)"));
        assert!(out.contains("return (v | 0x10000000001ULL) == 0x10000000001ULL;"));
        assert!(out.contains("High = 0x10000000000ULL,"));
    }
}
