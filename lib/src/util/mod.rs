mod path_ext;

pub use path_ext::*;

/// Lowercase `string`, turn each whitespace run into a hyphen, and drop every
/// character that isn't an ASCII alphanumeric, an underscore, or a hyphen.
/// Leading and trailing whitespace is stripped first.
///
/// Identical inputs yield identical slugs; nothing is deduplicated.
///
/// ```
/// use quire::util::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  Step 2: profit  "), "step-2-profit");
/// ```
pub fn slugify(string: &str) -> String {
    let mut output = String::with_capacity(string.len());

    let mut in_space = false;
    for ch in string.trim().chars() {
        if ch.is_whitespace() {
            if !in_space {
                output.push('-');
                in_space = true;
            }

            continue;
        }

        in_space = false;
        for lower in ch.to_lowercase() {
            if lower.is_ascii_alphanumeric() || lower == '_' || lower == '-' {
                output.push(lower);
            }
        }
    }

    output
}

#[cfg(test)]
mod slug_tests {
    use crate::util::slugify;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("Hello, World!"), slugify("Hello, World!"));
        assert_eq!(slugify("test\nit   now!"), "test-it-now");
        assert_eq!(slugify("  --test_-_cool- -  "), "--test_-_cool---");
        assert_eq!(slugify("You & Me"), "you--me");
        assert_eq!(slugify("Æúű cool?"), "-cool");
        assert_eq!(slugify("`Option<T>` and you"), "optiont-and-you");
        assert_eq!(slugify(""), "");
    }
}
