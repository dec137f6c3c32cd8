//! Template identity and path computation

use std::path::{Component, Path, PathBuf};

use crate::error::LoadError;

/// Identity of one template within a repository
///
/// Also the cache key: two ids compare equal exactly when they resolve to
/// the same file through the same repository configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateId {
    directory: PathBuf,
    name: String,
    extension: String,
}

impl TemplateId {
    /// Build an id, validating the name
    ///
    /// Names are relative to the repository directory and may carry
    /// sub-directories (`shared/header`). Empty names, absolute paths, and
    /// `..` traversal are rejected.
    pub fn new(
        directory: impl Into<PathBuf>,
        name: impl Into<String>,
        extension: impl Into<String>,
    ) -> Result<Self, LoadError> {
        let name = name.into();
        if name.is_empty() || name.ends_with(std::path::is_separator) {
            return Err(LoadError::InvalidName { name });
        }
        let relative = Path::new(&name);
        if relative.is_absolute() {
            return Err(LoadError::InvalidName { name });
        }
        for component in relative.components() {
            match component {
                Component::ParentDir | Component::Prefix(_) | Component::RootDir => {
                    return Err(LoadError::InvalidName { name });
                }
                Component::Normal(_) | Component::CurDir => {}
            }
        }
        Ok(Self {
            directory: directory.into(),
            name,
            extension: extension.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The file this id resolves to; pure computation, no filesystem access
    pub fn path(&self) -> PathBuf {
        // Appended by hand: Path::set_extension would clobber anything after
        // a dot already in the name.
        let mut file = self.name.clone();
        if !self.extension.is_empty() {
            file.push('.');
            file.push_str(&self.extension);
        }
        self.directory.join(file)
    }
}
