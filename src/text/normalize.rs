/// Punctuation that takes one trailing space and no leading space.
fn is_spaced_punct(c: char) -> bool {
    matches!(c, '.' | ',' | '!' | '?' | ';' | ':')
}

/// Normalize text for segmentation and tokenization.
///
/// Collapses every whitespace run to a single space, gives each of
/// `. , ! ? ; :` exactly one trailing space and no leading space, and trims
/// the ends. Idempotent: normalizing an already-normalized string returns it
/// unchanged.
pub fn normalize(text: &str) -> String {
    // Collapse whitespace runs first so the punctuation pass only ever sees
    // single spaces.
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut out = String::with_capacity(collapsed.len() + 8);
    let mut chars = collapsed.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ' ' {
            // A space immediately before punctuation belongs to the
            // punctuation mark and is dropped.
            if chars.peek().copied().is_some_and(is_spaced_punct) {
                continue;
            }
            out.push(' ');
        } else if is_spaced_punct(c) {
            out.push(c);
            out.push(' ');
            // The following space is consumed by the one we just inserted.
            if chars.peek() == Some(&' ') {
                chars.next();
            }
        } else {
            out.push(c);
        }
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(normalize("Hello   world\n\ttest"), "Hello world test");
    }

    #[test]
    fn spaces_punctuation() {
        assert_eq!(normalize("Hello ,world"), "Hello, world");
        assert_eq!(normalize("one;two"), "one; two");
        assert_eq!(normalize("wait !"), "wait!");
    }

    #[test]
    fn trims_ends() {
        assert_eq!(normalize("  padded  "), "padded");
        assert_eq!(normalize("end. "), "end.");
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "Hello world. This is a test!",
            "a , b ;c",
            "  messy\t\ttext , with ?  punctuation  ",
            "a.. b",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }
}
