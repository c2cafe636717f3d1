//! Rename and duplicate, with declaration identifier substitution

use super::record::ComponentRecord;
use crate::error::{ForgeError, Result};
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};

/// Replace `old` with `new` wherever it is the target of a declaration
///
/// Recognised shapes: `const X`, `let X`, `var X`, `function X`, `class X`
/// and `export default X`. Matches are word-bounded, so `FooBar` is left
/// alone when renaming `Foo`. Other references (JSX usage, separate
/// `export { X }` lists) are not rewritten.
pub fn substitute_declarations(content: &str, old: &str, new: &str) -> String {
    if old.is_empty() || old == new {
        return content.to_string();
    }
    let pattern = format!(
        r"\b(const|let|var|function|class|export\s+default)(\s+){}\b",
        regex::escape(old)
    );
    // Escaped identifiers always compile
    let Ok(re) = Regex::new(&pattern) else {
        return content.to_string();
    };
    re.replace_all(content, |caps: &Captures| format!("{}{}{}", &caps[1], &caps[2], new))
        .into_owned()
}

/// Reject names that cannot become a sibling file name
pub(crate) fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed != name
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
    {
        return Err(ForgeError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Both paths name one file on disk (also across case-insensitive names)
fn same_file(a: &Path, b: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        if let (Ok(a), Ok(b)) = (fs::metadata(a), fs::metadata(b)) {
            return a.dev() == b.dev() && a.ino() == b.ino();
        }
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl ComponentRecord {
    /// `<dir>/<new_name><extension>` next to the current file
    pub fn sibling_path(&self, new_name: &str) -> PathBuf {
        let file = format!("{}{}", new_name, self.extension());
        match self.path.parent() {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        }
    }

    /// Rename in place, writing the rewritten content to the sibling path
    ///
    /// The previous file is left on disk and its path is returned so the
    /// caller can offer to delete it. `None` means the rename rewrote the
    /// same file, so there is nothing left over. On failure the record is
    /// unchanged.
    pub(crate) fn rename(&mut self, new_name: &str) -> Result<Option<PathBuf>> {
        validate_name(new_name)?;
        let target = self.sibling_path(new_name);

        let in_place = target.exists() && same_file(&target, &self.path);
        if target.exists() && !in_place {
            return Err(ForgeError::NameCollision { path: target });
        }

        let rewritten = substitute_declarations(self.content()?, &self.name, new_name);
        fs::write(&target, &rewritten).map_err(|e| ForgeError::io(&target, e))?;
        tracing::debug!(from = %self.path.display(), to = %target.display(), "renamed component");

        let old_path = std::mem::replace(&mut self.path, target);
        self.name = new_name.to_string();
        self.set_content(rewritten);
        Ok((!in_place).then_some(old_path))
    }

    /// Write a renamed copy to the sibling path and return it as a new record
    pub(crate) fn duplicate(&self, new_name: &str) -> Result<ComponentRecord> {
        validate_name(new_name)?;
        let target = self.sibling_path(new_name);

        if target.exists() {
            return Err(ForgeError::NameCollision { path: target });
        }

        let copy = substitute_declarations(self.content()?, &self.name, new_name);
        fs::write(&target, &copy).map_err(|e| ForgeError::io(&target, e))?;
        tracing::debug!(from = %self.path.display(), to = %target.display(), "duplicated component");

        Ok(ComponentRecord::with_content(target, copy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_declaration_shapes() {
        let content = "const Foo = () => null;\nlet Foo = 1;\nvar Foo = 2;\nfunction Foo() {}\nclass Foo {}\nexport default Foo;\n";
        let expected = "const Bar = () => null;\nlet Bar = 1;\nvar Bar = 2;\nfunction Bar() {}\nclass Bar {}\nexport default Bar;\n";
        assert_eq!(substitute_declarations(content, "Foo", "Bar"), expected);
    }

    #[test]
    fn test_substitute_is_word_bounded() {
        let content = "const FooBar = 1;\nconst Foo = 2;\nfunction MyFoo() {}\n";
        assert_eq!(
            substitute_declarations(content, "Foo", "Baz"),
            "const FooBar = 1;\nconst Baz = 2;\nfunction MyFoo() {}\n"
        );
    }

    #[test]
    fn test_substitute_leaves_usages_alone() {
        let content = "export default function Foo() {}\nconst x = <Foo />;\n";
        assert_eq!(
            substitute_declarations(content, "Foo", "Bar"),
            "export default function Bar() {}\nconst x = <Foo />;\n"
        );
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Card").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(" Card").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("..").is_err());
    }

    #[test]
    fn test_rename_collision_leaves_record_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let foo = dir.path().join("Foo.tsx");
        let bar = dir.path().join("Bar.tsx");
        fs::write(&foo, "export default function Foo() {}").unwrap();
        fs::write(&bar, "export default function Bar() {}").unwrap();

        let mut record = ComponentRecord::open(&foo);
        let err = record.rename("Bar").unwrap_err();

        assert!(matches!(err, ForgeError::NameCollision { .. }));
        assert_eq!(record.path(), foo.as_path());
        assert_eq!(record.name(), "Foo");
        assert_eq!(fs::read_to_string(&bar).unwrap(), "export default function Bar() {}");
    }

    #[test]
    fn test_rename_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let foo = dir.path().join("Foo.tsx");
        let original = "import x from 'y';\n\nconst Foo = () => <div />;\nexport default Foo;\n";
        fs::write(&foo, original).unwrap();

        let mut record = ComponentRecord::open(&foo);
        let old = record.rename("Bar").unwrap();
        assert_eq!(old.as_deref(), Some(foo.as_path()));
        assert!(foo.exists(), "old file is left for the caller");
        assert_eq!(record.name(), "Bar");
        assert_eq!(record.path(), dir.path().join("Bar.tsx").as_path());
        assert!(record.content().unwrap().contains("const Bar = "));

        fs::remove_file(&foo).unwrap();
        record.rename("Foo").unwrap();
        assert_eq!(record.content().unwrap(), original);
        assert_eq!(fs::read_to_string(&foo).unwrap(), original);
    }

    #[test]
    fn test_rename_to_same_name_rewrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let foo = dir.path().join("Foo.tsx");
        fs::write(&foo, "const Foo = 1;").unwrap();

        let mut record = ComponentRecord::open(&foo);
        let old = record.rename("Foo").unwrap();
        assert_eq!(old, None, "no separate previous file to hand back");
        assert_eq!(fs::read_to_string(&foo).unwrap(), "const Foo = 1;");
    }

    #[test]
    fn test_duplicate_creates_new_record() {
        let dir = tempfile::tempdir().unwrap();
        let foo = dir.path().join("Foo.jsx");
        fs::write(&foo, "function Foo() {}\nexport default Foo;").unwrap();

        let record = ComponentRecord::open(&foo);
        let copy = record.duplicate("FooCopy").unwrap();

        assert_eq!(copy.name(), "FooCopy");
        assert_eq!(copy.extension(), ".jsx");
        assert_eq!(
            fs::read_to_string(copy.path()).unwrap(),
            "function FooCopy() {}\nexport default FooCopy;"
        );
        assert_eq!(record.name(), "Foo");
        assert_eq!(record.content().unwrap(), "function Foo() {}\nexport default Foo;");

        let err = record.duplicate("FooCopy").unwrap_err();
        assert!(matches!(err, ForgeError::NameCollision { .. }));
    }
}
