//! Injection-safe value formatting for generated patch text (`spec.md`
//! §4.6 step 4, testable property #12).

/// HCL strings escape `\`, `"`, newline, `${`, and `%{`.
#[must_use]
pub fn escape_hcl(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => {
                out.push_str("\\\\");
                i += 1;
            }
            '"' => {
                out.push_str("\\\"");
                i += 1;
            }
            '\n' => {
                out.push_str("\\n");
                i += 1;
            }
            '$' if chars.get(i + 1) == Some(&'{') => {
                out.push_str("$${");
                i += 2;
            }
            '%' if chars.get(i + 1) == Some(&'{') => {
                out.push_str("%%{");
                i += 2;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// YAML strings escape `\`, `"`, newline.
#[must_use]
pub fn escape_yaml(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// TypeScript strings escape `\`, `"`, newline.
#[must_use]
pub fn escape_ts(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

#[must_use]
pub fn is_numeric_literal(value: &str) -> bool {
    value.parse::<f64>().is_ok()
}

#[must_use]
pub fn is_boolean_literal(value: &str) -> bool {
    value == "true" || value == "false"
}

/// A quoted, escaped HCL string, or the literal unquoted text if it is a
/// number or boolean.
#[must_use]
pub fn hcl_value(value: &str) -> String {
    if is_numeric_literal(value) || is_boolean_literal(value) {
        value.to_string()
    } else {
        format!("\"{}\"", escape_hcl(value))
    }
}

#[must_use]
pub fn yaml_value(value: &str) -> String {
    if is_numeric_literal(value) || is_boolean_literal(value) {
        value.to_string()
    } else {
        format!("\"{}\"", escape_yaml(value))
    }
}

#[must_use]
pub fn ts_value(value: &str) -> String {
    if is_numeric_literal(value) || is_boolean_literal(value) {
        value.to_string()
    } else {
        format!("\"{}\"", escape_ts(value))
    }
}
