//! Struct members shared by value and flags wrappers.

use super::RenderContext;
use super::literal::{comment_lines, hex_literal, int_literal};
use super::writer::CodeWriter;
use crate::metadata::{EnumModel, ValidityCheck};
use crate::types::{EnumEntry, EnumKind};

const UNDERLYING: &str = "underlying_type";

/// Integer literal in the radix the enum kind uses.
pub fn value_literal(kind: EnumKind, value: i128) -> String {
    match kind {
        EnumKind::Value => int_literal(value, UNDERLYING),
        EnumKind::Flags => hex_literal(value as u128, UNDERLYING),
    }
}

/// Description comment and the opening of the wrapper struct.
pub fn open_struct(w: &mut CodeWriter, model: &EnumModel<'_>) {
    w.lines(comment_lines(&model.definition.description));
    w.open(format!("struct {}", model.name()));
}

/// Underlying alias, the nested `Value` enum and one named constant per entry.
pub fn write_value_declarations(w: &mut CodeWriter, model: &EnumModel<'_>) {
    let kind = model.kind();
    w.line(format!(
        "using underlying_type = {};",
        model.size_type.generated_type_name
    ));
    w.blank();
    w.open("enum class Value : underlying_type");
    for entry in &model.definition.entries {
        w.lines(comment_lines(&entry.description));
        w.line(format!("{} = {},", entry.name, value_literal(kind, entry.value)));
    }
    w.close("};");
    w.blank();
    for entry in &model.definition.entries {
        w.line(format!(
            "static constexpr Value {0} = Value::{0};",
            entry.name
        ));
    }
}

/// `min`, `max`, `count`, contiguity, bit widths and the `values` table.
pub fn write_introspection(w: &mut CodeWriter, ctx: &RenderContext<'_>, model: &EnumModel<'_>) {
    let nd = ctx.nodiscard();
    let meta = &model.metadata;
    w.function(
        format!("{nd} static constexpr Value min() noexcept"),
        format!("return Value::{};", model.min().name),
    );
    w.function(
        format!("{nd} static constexpr Value max() noexcept"),
        format!("return Value::{};", model.max().name),
    );
    w.function(
        format!("{nd} static constexpr std::size_t count() noexcept"),
        format!("return {};", meta.unique_value_count),
    );
    w.function(
        format!("{nd} static constexpr bool is_contiguous() noexcept"),
        format!("return {};", meta.is_contiguous),
    );
    w.function(
        format!("{nd} static constexpr int bits_required_storage() noexcept"),
        format!("return {};", meta.bits_required_storage),
    );
    w.function(
        format!("{nd} static constexpr int bits_required_transmission() noexcept"),
        format!("return {};", meta.bits_required_transmission),
    );
    w.blank();

    let canonical = model.canonical_entries();
    w.line(format!(
        "static constexpr std::array<Value, {}> values = {{{{",
        canonical.len()
    ));
    w.indent();
    for entry in canonical {
        w.line(format!("Value::{},", entry.name));
    }
    w.dedent();
    w.line("}};");
}

/// Both `is_valid` overloads, with the body the validity check selects.
pub fn write_validity(w: &mut CodeWriter, ctx: &RenderContext<'_>, model: &EnumModel<'_>) {
    let nd = ctx.nodiscard();
    let kind = model.kind();
    let param = match model.metadata.validity {
        ValidityCheck::Always => "underlying_type",
        _ => "underlying_type v",
    };
    w.open(format!("{nd} static constexpr bool is_valid({param}) noexcept"));
    match &model.metadata.validity {
        ValidityCheck::SingleValue(value) => {
            w.line(format!("return v == {};", value_literal(kind, *value)));
        }
        ValidityCheck::Always => {
            w.line("return true;");
        }
        ValidityCheck::UpperBound(max) => {
            w.line(format!("return v <= {};", value_literal(kind, *max)));
        }
        ValidityCheck::LowerBound(min) => {
            w.line(format!("return v >= {};", value_literal(kind, *min)));
        }
        ValidityCheck::Range { min, max } => {
            w.line(format!(
                "return v >= {} && v <= {};",
                value_literal(kind, *min),
                value_literal(kind, *max)
            ));
        }
        ValidityCheck::Scan(_) => {
            w.open("for (const Value candidate : values)");
            w.open("if (static_cast<underlying_type>(candidate) == v)");
            w.line("return true;");
            w.close("}");
            w.close("}");
            w.line("return false;");
        }
        ValidityCheck::FlagsLowMask(mask) => {
            w.line(format!("return v <= {};", hex_literal(*mask, UNDERLYING)));
        }
        ValidityCheck::FlagsMask(mask) => {
            let mask = hex_literal(*mask, UNDERLYING);
            w.line(format!("return (v | {mask}) == {mask};"));
        }
    }
    w.close("}");
    w.function(
        format!("{nd} static constexpr bool is_valid(Value v) noexcept"),
        "return is_valid(static_cast<underlying_type>(v));",
    );
}

/// Name table, `to_string`, `from_string` and `description`, as the string
/// table mode allows. `subject` is the expression `to_string` switches on
/// and `case_label` maps an entry name to its case label.
pub fn write_string_table<F>(
    w: &mut CodeWriter,
    ctx: &RenderContext<'_>,
    model: &EnumModel<'_>,
    subject: &str,
    case_label: F,
) where
    F: Fn(&str) -> String,
{
    let mode = ctx.config.string_table;
    if !mode.has_names() {
        return;
    }
    let nd = ctx.nodiscard();
    let view = ctx.view_type();
    let wrapper = model.name();
    let entries = &model.definition.entries;
    let canonical = model.canonical_entries();

    w.blank();
    w.open("struct NameEntry");
    w.line(format!("{} name;", view));
    w.line("Value value;");
    w.close("};");
    w.blank();
    w.line(format!(
        "static constexpr std::array<NameEntry, {}> names = {{{{",
        entries.len()
    ));
    w.indent();
    for entry in entries {
        w.line(format!(
            "{{ {}, Value::{} }},",
            ctx.string_literal(&entry.name),
            entry.name
        ));
    }
    w.dedent();
    w.line("}};");
    w.blank();

    let lookup = |w: &mut CodeWriter, signature: String, text_of: &dyn Fn(&EnumEntry) -> String| {
        w.open(signature);
        if canonical.len() == 1 {
            let entry = canonical[0];
            w.open(format!("if ({} == {})", subject, case_label(&entry.name)));
            w.line(format!("return {};", text_of(entry)));
            w.close("}");
        } else {
            w.open(format!("switch ({})", subject));
            for entry in &canonical {
                w.line(format!("case {}:", case_label(&entry.name)));
                w.indent();
                w.line(format!("return {};", text_of(entry)));
                w.dedent();
            }
            w.close("}");
        }
        w.line(format!("return {}();", view));
        w.close("}");
    };

    lookup(
        w,
        format!("{nd} constexpr {view} to_string() const noexcept"),
        &|entry: &EnumEntry| ctx.string_literal(&entry.name),
    );

    w.open(format!(
        "{nd} static constexpr std::optional<{wrapper}> from_string({view} s) noexcept"
    ));
    if entries.len() == 1 {
        let entry = &entries[0];
        w.open(format!("if (s == {})", ctx.string_literal(&entry.name)));
        w.line(format!("return {}(Value::{});", wrapper, entry.name));
        w.close("}");
    } else {
        w.open("for (const NameEntry& entry : names)");
        w.open("if (entry.name == s)");
        w.line(format!("return {}(entry.value);", wrapper));
        w.close("}");
        w.close("}");
    }
    w.line("return std::nullopt;");
    w.close("}");

    if mode.has_descriptions() {
        lookup(
            w,
            format!("{nd} constexpr {view} description() const noexcept"),
            &|entry: &EnumEntry| ctx.string_literal(&entry.description),
        );
    }
}

/// Hidden-friend equality for every wrapper/`Value` pairing, so comparisons
/// never have to choose between a conversion and a friend.
pub fn write_equality(w: &mut CodeWriter, model: &EnumModel<'_>) {
    let wrapper = model.name();
    for op in ["==", "!="] {
        w.function(
            format!("friend constexpr bool operator{op}({wrapper} a, {wrapper} b) noexcept"),
            format!("return a.value_ {op} b.value_;"),
        );
        w.function(
            format!("friend constexpr bool operator{op}({wrapper} a, Value b) noexcept"),
            format!("return a {op} {wrapper}(b);"),
        );
        w.function(
            format!("friend constexpr bool operator{op}(Value a, {wrapper} b) noexcept"),
            format!("return {wrapper}(a) {op} b;"),
        );
    }
}

fn qualified_name(ctx: &RenderContext<'_>, model: &EnumModel<'_>) -> String {
    let mut name = String::from("::");
    for segment in &ctx.config.namespace {
        name.push_str(segment);
        name.push_str("::");
    }
    name.push_str(model.name());
    name
}

/// `enum_info` specializations for the wrapper and its nested `Value`.
pub fn write_enum_info(w: &mut CodeWriter, ctx: &RenderContext<'_>, model: &EnumModel<'_>) {
    let qualified = qualified_name(ctx, model);
    let meta = &model.metadata;
    let is_flags = model.kind() == EnumKind::Flags;

    w.line("template <>");
    w.open(format!("struct enum_info<{}>", qualified));
    w.line("static constexpr bool is_generated_enum = true;");
    w.line(format!("static constexpr bool is_value_enum = {};", !is_flags));
    w.line(format!("static constexpr bool is_flags_enum = {};", is_flags));
    w.line(format!("using enum_type = {};", qualified));
    w.line(format!("using value_type = {}::Value;", qualified));
    w.line(format!("using underlying_type = {}::underlying_type;", qualified));
    w.line(format!("static constexpr std::size_t count = {};", meta.unique_value_count));
    w.line(format!("static constexpr bool is_contiguous = {};", meta.is_contiguous));
    w.line(format!(
        "static constexpr int bits_required_storage = {};",
        meta.bits_required_storage
    ));
    w.line(format!(
        "static constexpr int bits_required_transmission = {};",
        meta.bits_required_transmission
    ));
    // Named bitfields cannot be zero bits wide
    w.line(format!(
        "static constexpr int packed_bits = {};",
        meta.bits_required_storage.max(1)
    ));
    w.line(format!(
        "static constexpr underlying_type default_underlying = {}().to_underlying();",
        qualified
    ));
    w.close("};");
    w.blank();
    w.line("template <>");
    w.line(format!(
        "struct enum_info<{0}::Value> : enum_info<{0}>",
        qualified
    ));
    w.line("{");
    w.line("};");
}
