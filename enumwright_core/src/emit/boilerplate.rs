//! Shared runtime blocks every generated header carries.
//!
//! Each block sits behind its own version macro so several generated headers
//! can be included into one translation unit; a header built against a
//! different block version stops the build with `#error`.

use super::RenderContext;
use super::writer::CodeWriter;

pub const REQUIRED_MACROS_VERSION: u32 = 1;
pub const OPTIONAL_MACROS_VERSION: u32 = 1;
pub const BASE_TEMPLATES_VERSION: u32 = 1;
pub const TEMPLATE_EXTENSIONS_VERSION: u32 = 1;
/// Exported as `runtime_version` and checked by a `static_assert`.
pub const RUNTIME_VERSION: u32 = 1;

fn versioned_block<F>(w: &mut CodeWriter, ctx: &RenderContext<'_>, block: &str, version: u32, body: F)
where
    F: FnOnce(&mut CodeWriter),
{
    let guard = format!("{}_{}_VERSION", ctx.prefix, block);
    w.line(format!("#if !defined({})", guard));
    w.line(format!("#define {} {}", guard, version));
    body(w);
    w.line(format!("#elif {} != {}", guard, version));
    w.line(format!(
        "#error \"{} mismatch: this header was generated for version {}\"",
        guard, version
    ));
    w.line("#endif");
}

fn required_macros(w: &mut CodeWriter, ctx: &RenderContext<'_>) {
    let p = &ctx.prefix;
    versioned_block(w, ctx, "REQUIRED_MACROS", REQUIRED_MACROS_VERSION, |w| {
        w.line("#if defined(__has_cpp_attribute)");
        w.line("#if __has_cpp_attribute(nodiscard)");
        w.line(format!("#define {}_NODISCARD [[nodiscard]]", p));
        w.line("#endif");
        w.line("#endif");
        w.line(format!("#if !defined({}_NODISCARD)", p));
        w.line(format!("#define {}_NODISCARD", p));
        w.line("#endif");
        w.line(format!("#if !defined({}_ASSERT)", p));
        w.line(format!("#define {}_ASSERT(expr) assert(expr)", p));
        w.line("#endif");
    });
}

fn optional_macros(w: &mut CodeWriter, ctx: &RenderContext<'_>) {
    let p = &ctx.prefix;
    let info = format!("::{}::enum_info<Enum>", ctx.runtime());
    versioned_block(w, ctx, "OPTIONAL_MACROS", OPTIONAL_MACROS_VERSION, |w| {
        w.line("// Bitfield member sized to the bits an enum needs");
        w.line(format!(
            "#define {}_PACK(Enum, Name) typename {info}::underlying_type Name : {info}::packed_bits",
            p
        ));
        w.line(format!(
            "#define {p}_PACK_INIT(Enum, Name) {p}_PACK(Enum, Name) = {info}::default_underlying"
        ));
    });
}

fn base_templates(w: &mut CodeWriter, ctx: &RenderContext<'_>) {
    versioned_block(w, ctx, "BASE_TEMPLATES", BASE_TEMPLATES_VERSION, |w| {
        w.line(format!("namespace {}", ctx.runtime()));
        w.line("{");
        w.line(format!("inline constexpr int runtime_version = {};", RUNTIME_VERSION));
        w.blank();
        w.line("template <class T>");
        w.open("struct enum_info");
        w.line("static constexpr bool is_generated_enum = false;");
        w.line("static constexpr bool is_value_enum = false;");
        w.line("static constexpr bool is_flags_enum = false;");
        w.close("};");
        w.blank();
        w.line("template <class T>");
        w.line("inline constexpr bool is_generated_enum_v = enum_info<T>::is_generated_enum;");
        w.line(format!("}} // namespace {}", ctx.runtime()));
    });
}

fn template_extensions(w: &mut CodeWriter, ctx: &RenderContext<'_>) {
    versioned_block(w, ctx, "TEMPLATE_EXTENSIONS", TEMPLATE_EXTENSIONS_VERSION, |w| {
        w.line(format!("namespace {}", ctx.runtime()));
        w.line("{");
        w.line("template <class T>");
        w.line("inline constexpr bool is_value_enum_v = enum_info<T>::is_value_enum;");
        w.line("template <class T>");
        w.line("inline constexpr bool is_flags_enum_v = enum_info<T>::is_flags_enum;");

        let constants = [
            ("int", "bits_required_storage"),
            ("int", "bits_required_transmission"),
            ("std::size_t", "count"),
            ("bool", "is_contiguous"),
        ];
        for (ty, name) in constants {
            w.blank();
            w.line("template <class T>");
            w.function(
                format!("constexpr {} {}() noexcept", ty, name),
                format!("return enum_info<T>::{};", name),
            );
        }

        w.blank();
        w.line("template <class T>");
        w.function(
            "constexpr auto to_underlying(T v) noexcept",
            "return typename enum_info<T>::enum_type(v).to_underlying();",
        );
        w.blank();
        w.line("template <class T>");
        w.function(
            "constexpr bool is_valid(typename enum_info<T>::underlying_type v) noexcept",
            "return enum_info<T>::enum_type::is_valid(v);",
        );
        w.blank();
        w.line("template <class T>");
        w.function(
            "constexpr auto from_integer(typename enum_info<T>::underlying_type v) noexcept",
            "return enum_info<T>::enum_type::from_integer(v);",
        );
        w.blank();
        w.line("template <class T>");
        w.function(
            "constexpr auto to_string(T v) noexcept",
            "return typename enum_info<T>::enum_type(v).to_string();",
        );
        w.blank();
        w.line("template <class T, class S>");
        w.function(
            "constexpr auto from_string(S s) noexcept",
            "return enum_info<T>::enum_type::from_string(s);",
        );
        w.line(format!("}} // namespace {}", ctx.runtime()));
    });
}

/// Writes every enabled block followed by the runtime version assertion.
pub fn render_boilerplate(w: &mut CodeWriter, ctx: &RenderContext<'_>) {
    required_macros(w, ctx);
    w.blank();
    if ctx.config.emit_bitfield_macros {
        optional_macros(w, ctx);
        w.blank();
    }
    base_templates(w, ctx);
    w.blank();
    if ctx.config.emit_type_trait_extensions {
        template_extensions(w, ctx);
        w.blank();
    }
    w.line(format!(
        "static_assert(::{}::runtime_version == {}, \"generated header and runtime blocks disagree\");",
        ctx.runtime(),
        RUNTIME_VERSION
    ));
}
