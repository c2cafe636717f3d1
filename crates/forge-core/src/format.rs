//! Naive bracket-counting indenter for component source

const INDENT: &str = "  ";
const OPENERS: [char; 3] = ['(', '{', '['];
const CLOSERS: [char; 3] = [')', '}', ']'];

/// Re-indent source text by counting brackets line by line
///
/// A line with a closer and no opener is dedented before it is written; a
/// line with an opener and no closer indents the lines that follow. Lines
/// holding both leave the level unchanged. Only trailing whitespace is
/// removed, so existing indentation ends up after the computed one.
pub fn prettify(content: &str) -> String {
    let mut out = Vec::new();
    let mut level: usize = 0;

    for line in content.split('\n') {
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            out.push(String::new());
            continue;
        }

        let opens = trimmed.contains(OPENERS);
        let closes = trimmed.contains(CLOSERS);

        if closes && !opens {
            level = level.saturating_sub(1);
        }

        out.push(format!("{}{}", INDENT.repeat(level), trimmed));

        if opens && !closes {
            level += 1;
        }
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prettify_nested_blocks() {
        let input = "const Foo = () => {\nreturn (\n<div>\n<span />\n</div>\n);\n};";
        let expected = "const Foo = () => {\nreturn (\n  <div>\n  <span />\n  </div>\n);\n};";
        assert_eq!(prettify(input), expected);
    }

    #[test]
    fn test_prettify_keeps_blank_lines_and_strips_trailing_space() {
        let input = "const a = 1;   \n\n   \nconst b = 2;";
        assert_eq!(prettify(input), "const a = 1;\n\n\nconst b = 2;");
    }

    #[test]
    fn test_prettify_keeps_leading_whitespace() {
        let input = "list = [\n    one,  \n];";
        assert_eq!(prettify(input), "list = [\n      one,\n];");
    }

    #[test]
    fn test_prettify_never_goes_negative() {
        assert_eq!(prettify("}\n}\nx"), "}\n}\nx");
    }

    #[test]
    fn test_prettify_balanced_line_keeps_level() {
        let input = "items = [\nfoo(bar),\n];";
        assert_eq!(prettify(input), "items = [\n  foo(bar),\n];");
    }
}
