//! Parameter documentation generated from a spec table

use super::spec::SpecTable;
use super::value::ValueType;
use std::fmt::Write;

impl SpecTable {
    /// Render a parameter section, one entry per spec:
    ///
    /// ```text
    ///     name : str
    ///         help for name (default: "World")
    /// ```
    pub fn render_doc(&self) -> String {
        let mut doc = String::new();
        for (name, spec) in self.iter() {
            let type_name = spec
                .value_type
                .or_else(|| spec.default.as_ref().and_then(ValueType::of))
                .map(|t| t.name())
                .unwrap_or("any");
            let help = spec
                .marker
                .as_ref()
                .and_then(|m| m.help_text())
                .unwrap_or_default();
            let default = spec
                .default
                .as_ref()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "None".to_string());

            // Writing to a String cannot fail
            let _ = writeln!(doc, "    {} : {}", name, type_name);
            let _ = writeln!(doc, "        {} (default: {})", help, default);
        }
        doc
    }
}
