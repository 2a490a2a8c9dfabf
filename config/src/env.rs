use std::env;

/// Replace `${VAR}` with the value of `VAR`.
///
/// Unset variables become empty. `${}` and an unclosed `${` are kept as-is.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) if end > 0 => {
                out.push_str(&env::var(&after[..end]).unwrap_or_default());
                rest = &after[end + 1..];
            }
            Some(_) => {
                out.push_str("${}");
                rest = &after[1..];
            }
            None => {
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::expand_env_vars;

    #[test]
    fn expand_env_vars_no_vars() {
        assert_eq!(expand_env_vars("hello world"), "hello world");
    }

    #[test]
    fn expand_env_vars_single_var() {
        unsafe {
            std::env::set_var("BEACON_TEST_CONFIG_VAR", "replaced");
        }
        assert_eq!(
            expand_env_vars("prefix ${BEACON_TEST_CONFIG_VAR} suffix"),
            "prefix replaced suffix"
        );
        unsafe {
            std::env::remove_var("BEACON_TEST_CONFIG_VAR");
        }
    }

    #[test]
    fn expand_env_vars_missing_var_becomes_empty() {
        unsafe {
            std::env::remove_var("BEACON_MISSING_VAR_FOR_TEST");
        }
        assert_eq!(
            expand_env_vars("before ${BEACON_MISSING_VAR_FOR_TEST} after"),
            "before  after"
        );
    }

    #[test]
    fn expand_env_vars_adjacent_vars() {
        unsafe {
            std::env::set_var("BEACON_VAR_X", "x");
            std::env::set_var("BEACON_VAR_Y", "y");
        }
        assert_eq!(expand_env_vars("${BEACON_VAR_X}${BEACON_VAR_Y}"), "xy");
        unsafe {
            std::env::remove_var("BEACON_VAR_X");
            std::env::remove_var("BEACON_VAR_Y");
        }
    }

    #[test]
    fn expand_env_vars_unclosed_brace_preserved() {
        assert_eq!(expand_env_vars("value ${UNCLOSED"), "value ${UNCLOSED");
    }

    #[test]
    fn expand_env_vars_empty_var_name_preserved() {
        assert_eq!(expand_env_vars("a ${} b"), "a ${} b");
    }

    #[test]
    fn expand_env_vars_unicode_content() {
        assert_eq!(expand_env_vars("café ☕ ${}"), "café ☕ ${}");
    }
}
