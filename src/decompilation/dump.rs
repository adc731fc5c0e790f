//! Dumping reconstructed units to disk.

use std::{fs, path::PathBuf};

use crate::{
    decompilation::{Decompilation, Decompiler},
    Result,
};

/// Turns a unit name into a file name: angle brackets become parentheses and characters
/// that are not allowed in paths become `_`.
///
/// # Examples
///
/// ```rust
/// use peeker::decompilation::sanitize_unit_name;
///
/// assert_eq!(sanitize_unit_name("<Module>.cs"), "(Module).cs");
/// assert_eq!(sanitize_unit_name("a|b\".cs"), "a_b_.cs");
/// ```
#[must_use]
pub fn sanitize_unit_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' => '(',
            '>' => ')',
            '"' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

impl<D: Decompiler> Decompilation<D> {
    /// Path `unit` is (or would be) dumped to, if dumping is enabled.
    pub fn unit_dump_path(&self, unit: usize) -> Option<PathBuf> {
        let dump = self.dump_source.as_ref()?;
        let unit = self.decompiler.units().get(unit)?;
        Some(self.dump_directory(dump).join(sanitize_unit_name(&unit.name)))
    }

    fn dump_directory(&self, dump: &std::path::Path) -> PathBuf {
        match self.file_name.file_name() {
            Some(name) => dump.join(name),
            None => dump.join(&self.file_name),
        }
    }

    /// Writes every reconstructed unit below `<dump>/<binary file name>/`.
    ///
    /// Does nothing if dumping is disabled. If the dump path is an existing file, an error
    /// is logged and dumping is disabled for the rest of the session, which also disables
    /// the dumped-file fallback of location resolution.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if a directory or file cannot be written.
    pub fn dump_units(&mut self) -> Result<()> {
        let Some(dump) = self.dump_source.clone() else {
            return Ok(());
        };

        if dump.is_file() {
            log::error!(
                "Decompiled source will not be dumped to {} because a file exists with that name",
                dump.display()
            );
            self.dump_source = None;
            return Ok(());
        }

        fs::create_dir_all(self.dump_directory(&dump))?;

        for index in 0..self.decompiler.units().len() {
            let Some(path) = self.unit_dump_path(index) else {
                continue;
            };
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &self.decompiler.units()[index].text)?;
        }

        log::debug!(
            "Dumped {} unit(s) of {} to {}",
            self.decompiler.units().len(),
            self.file_name.display(),
            dump.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::FakeDecompiler;

    #[test]
    fn sanitize() {
        assert_eq!(sanitize_unit_name("Foo.cs"), "Foo.cs");
        assert_eq!(
            sanitize_unit_name("<PrivateImplementationDetails>.cs"),
            "(PrivateImplementationDetails).cs"
        );
        assert_eq!(sanitize_unit_name("a\tb\0.cs"), "a_b_.cs");
    }

    #[test]
    fn dumps_units() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("dump");
        let decompiler = FakeDecompiler::new("<Module>.cs", "class A {}\n")
            .with_unit("Sub/B.cs", "class B {}\n");
        let mut session =
            Decompilation::new("some/Lib.dll", decompiler, None, Some(dump.clone()));

        session.dump_units().unwrap();

        let module = dump.join("Lib.dll").join("(Module).cs");
        assert_eq!(fs::read_to_string(&module).unwrap(), "class A {}\n");
        assert_eq!(
            fs::read_to_string(dump.join("Lib.dll").join("Sub").join("B.cs")).unwrap(),
            "class B {}\n"
        );
        assert_eq!(session.unit_dump_path(0), Some(module));
        assert_eq!(session.unit_dump_path(5), None);
    }

    #[test]
    fn dump_path_is_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let decompiler = FakeDecompiler::new("A.cs", "class A {}\n");
        let mut session =
            Decompilation::new("Lib.dll", decompiler, None, Some(file.path().to_path_buf()));

        session.dump_units().unwrap();
        assert!(session.dump_source().is_none());
        assert!(session.unit_dump_path(0).is_none());
    }

    #[test]
    fn dump_disabled() {
        let decompiler = FakeDecompiler::new("A.cs", "class A {}\n");
        let mut session = Decompilation::new("Lib.dll", decompiler, None, None);
        session.dump_units().unwrap();
        assert!(session.unit_dump_path(0).is_none());
    }
}
