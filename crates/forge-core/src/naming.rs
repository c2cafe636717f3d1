//! Identifier case conversion for file names, export names and route slugs
//!
//! Words are split on any non-alphanumeric character and on camel humps
//! (`fooBar`, `foo2Bar`, `XMLParser`), so converting an already converted
//! name yields the same name again. Only ASCII letters change case.

/// Split an identifier into its words
fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() && c.is_ascii_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let hump = prev.is_ascii_lowercase() || prev.is_ascii_digit();
            let acronym_end = prev.is_ascii_uppercase() && next_is_lower;
            if hump || acronym_end {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(word.len());
            out.push(first.to_ascii_uppercase());
            out.extend(chars.map(|c| c.to_ascii_lowercase()));
            out
        }
        None => String::new(),
    }
}

/// `domain-structure-diagram` -> `domainStructureDiagram`
pub fn to_camel_case(name: &str) -> String {
    let words = split_words(name);
    let mut iter = words.iter();
    let Some(first) = iter.next() else {
        return String::new();
    };

    let mut out = first.to_ascii_lowercase();
    for word in iter {
        out.push_str(&capitalize(word));
    }
    out
}

/// `domain-structure-diagram` -> `DomainStructureDiagram`
pub fn to_pascal_case(name: &str) -> String {
    split_words(name).iter().map(|w| capitalize(w)).collect()
}

/// Words that cannot name a binding in an ES module
const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Whether `name` can be used as an import/export binding
pub fn is_valid_binding(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let ident_char = |c: char| c.is_alphanumeric() || c == '_' || c == '$';
    !first.is_ascii_digit()
        && ident_char(first)
        && chars.all(ident_char)
        && !RESERVED_WORDS.contains(&name)
}

/// `DomainStructureDiagram` -> `domain-structure-diagram`
pub fn to_kebab_case(name: &str) -> String {
    split_words(name)
        .iter()
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
