//! vmspath: translate OpenVMS file specifications into POSIX paths.
//!
//! Handles ODS-2 and ODS-5 filespecs of the form
//! `device:[dir.subdir]name.ext;version`, including caret escapes (`^20`,
//! `^_`, `^Uc2bc`, `^.`), relative directories (`[.sub]`), parent markers
//! (`[-]`) and the version-versus-numeric-extension ambiguity.
//!
//! Relative translations are anchored on the canonical current directory.
//! A device replaces its first segment and a non-relative directory hangs
//! off that first segment, so with `/home/user` as the current directory:
//!
//! | filespec                     | path                        |
//! |------------------------------|-----------------------------|
//! | `[.SUB]FILE.TXT`             | `/home/user/SUB/FILE.TXT`   |
//! | `[DIR]FILE.TXT`              | `/home/DIR/FILE.TXT`        |
//! | `DISK:[DIR1.DIR2]FILE.TXT;1` | `/DISK/DIR1/DIR2/FILE.TXT`  |
//! | `[]foo.1.2.3`                | `/home/user/foo.1.2`        |
//!
//! Case is preserved and versions are validated, then dropped.
//!
//! # Examples
//!
//! ```
//! use vmspath::{FixedCurrentDir, Translator};
//!
//! let translator = Translator::new(FixedCurrentDir::new("/home/user"));
//!
//! assert_eq!(
//!     translator.translate("[.SUB]FOO^20BAR.TXT;3").unwrap(),
//!     "/home/user/SUB/FOO BAR.TXT"
//! );
//!
//! // Anything that is not a valid filespec passes through unchanged
//! assert_eq!(translator.unix_path("plain.txt"), "plain.txt");
//! assert_eq!(translator.unix_path("[DIR]FILE.TXT;40000"), "[DIR]FILE.TXT;40000");
//! ```

mod assemble;
pub mod charset;
mod cwd;
mod directory;
mod error;
mod escape;
pub mod grammar;
mod version;

pub use cwd::{CurrentDir, FixedCurrentDir, ProcessCurrentDir};
pub use directory::{is_relative, translate_directory};
pub use error::TranslateError;
pub use escape::{decode_name, Decoded};
pub use grammar::{match_filespec, ParsedComponents};
pub use version::{parse_version, MAX_VERSION};

/// Translates filespecs against a current directory provider.
#[derive(Debug, Clone, Default)]
pub struct Translator<D = ProcessCurrentDir> {
    cwd: D,
}

impl<D: CurrentDir> Translator<D> {
    pub fn new(cwd: D) -> Self {
        Self { cwd }
    }

    /// Translate `filespec` into a POSIX path.
    ///
    /// The current directory is read once per call. Any failure, including
    /// failing to read it, means there is no translation.
    pub fn translate(&self, filespec: &str) -> Result<String, TranslateError> {
        let result = self.try_translate(filespec);
        match &result {
            Ok(path) => log::trace!("translated {:?} to {:?}", filespec, path),
            Err(e) => log::debug!("no translation for {:?}: {}", filespec, e),
        }
        result
    }

    fn try_translate(&self, filespec: &str) -> Result<String, TranslateError> {
        let parsed = match_filespec(filespec)?;
        let dir = self.cwd.canonical_path()?;
        let anchor = dir
            .to_str()
            .ok_or_else(|| TranslateError::NonUtf8CurrentDir(dir.clone()))?;
        assemble::assemble(&parsed, anchor)
    }

    /// Translate `filespec`, or hand it back unchanged if it has no
    /// translation.
    pub fn unix_path(&self, filespec: &str) -> String {
        self.translate(filespec)
            .unwrap_or_else(|_| filespec.to_string())
    }

    pub fn current_dir(&self) -> &D {
        &self.cwd
    }
}

/// Translate `filespec` relative to the process working directory.
pub fn translate(filespec: &str) -> Result<String, TranslateError> {
    Translator::new(ProcessCurrentDir).translate(filespec)
}

/// Translate `filespec` relative to the process working directory, returning
/// it unchanged if it is not a translatable filespec.
pub fn unix_path(filespec: &str) -> String {
    Translator::new(ProcessCurrentDir).unix_path(filespec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator() -> Translator<FixedCurrentDir> {
        Translator::new(FixedCurrentDir::new("/home/user"))
    }

    #[test]
    fn translate_reads_the_provider() {
        assert_eq!(translator().translate("[]X.Y").unwrap(), "/home/user/X.Y");
        assert_eq!(
            translator().current_dir().path(),
            std::path::Path::new("/home/user")
        );
    }

    #[test]
    fn unix_path_passes_failures_through() {
        let t = translator();
        assert_eq!(t.unix_path("plain.txt"), "plain.txt");
        assert_eq!(t.unix_path("[DIR>FILE.TXT"), "[DIR>FILE.TXT");
        assert_eq!(t.unix_path("[DIR]FILE.TXT;0"), "[DIR]FILE.TXT;0");
        assert_eq!(t.unix_path("[DIR]FILE.TXT"), "/home/DIR/FILE.TXT");
    }

    struct Unreadable;

    impl CurrentDir for Unreadable {
        fn canonical_path(&self) -> std::io::Result<std::path::PathBuf> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "deleted"))
        }
    }

    #[test]
    fn unreadable_current_dir_is_a_failure() {
        let t = Translator::new(Unreadable);
        assert!(matches!(
            t.translate("[A]B.C"),
            Err(TranslateError::CurrentDir(_))
        ));
        assert_eq!(t.unix_path("[A]B.C"), "[A]B.C");
    }

    #[test]
    fn grammar_is_checked_before_the_current_dir() {
        let t = Translator::new(Unreadable);
        assert!(t.translate("plain.txt").unwrap_err().is_not_filespec());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_current_dir_is_a_failure() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let t = Translator::new(FixedCurrentDir::new(OsStr::from_bytes(b"/bad\xff")));
        assert!(matches!(
            t.translate("[A]B.C"),
            Err(TranslateError::NonUtf8CurrentDir(_))
        ));
    }

    #[test]
    fn free_functions_use_process_dir() {
        let cwd = std::env::current_dir().unwrap().canonicalize().unwrap();
        let expected = format!("{}/SUB/F.T", cwd.to_str().unwrap().trim_end_matches('/'));
        assert_eq!(translate("[.SUB]F.T").unwrap(), expected);
        assert_eq!(unix_path("not/a/filespec"), "not/a/filespec");
    }
}
