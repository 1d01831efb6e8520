//! Name mangling and literal formatting for the command backend.

/// Score name of a pack global: `_<ns>.<var>`.
pub(crate) fn global_score(ns: &str, var: &str) -> String {
    format!("_{}.{}", ns, var)
}

/// Score name of a function-body local: `__<fn>_<var>`.
pub(crate) fn local_score(fn_name: &str, var: &str) -> String {
    format!("__{}_{}", fn_name, var)
}

/// Score name of a for-loop init local: `__<fn>_for<idx>_<var>`.
pub(crate) fn for_local_score(fn_name: &str, idx: usize, var: &str) -> String {
    format!("__{}_for{}_{}", fn_name, idx, var)
}

/// If-chain done flag: `__ifdone_<ns>_<N>`.
pub(crate) fn ifdone_flag(ns: &str, idx: usize) -> String {
    format!("__ifdone_{}_{}", ns, idx)
}

/// Storage reference of a pack: `<ns>:variables`.
pub(crate) fn storage_ref(ns: &str) -> String {
    format!("{}:variables", ns)
}

/// Command-file path: `data/<ns>/function/<name>.mcfunction`.
pub(crate) fn function_path(ns: &str, name: &str) -> String {
    format!("data/{}/function/{}.mcfunction", ns, name)
}

/// Escape a string for inclusion in a double-quoted command literal.
pub(crate) fn escape_quoted(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Format a number literal the way command output wants it: integral
/// values without a fractional part.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mangles() {
        assert_eq!(global_score("n", "x"), "_n.x");
        assert_eq!(local_score("f", "v"), "__f_v");
        assert_eq!(for_local_score("f", 0, "i"), "__f_for0_i");
        assert_eq!(ifdone_flag("n", 2), "__ifdone_n_2");
        assert_eq!(storage_ref("n"), "n:variables");
        assert_eq!(function_path("n", "__for_0"), "data/n/function/__for_0.mcfunction");
    }

    #[test]
    fn test_escape_quoted() {
        assert_eq!(escape_quoted("a\"b\\c\nd"), "a\\\"b\\\\c\\nd");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(2.5), "2.5");
    }
}
