use super::{FileSystem, FileType};
use crate::error::{Result, WorkflowError};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct MockEntry {
    pub content: Option<Vec<u8>>,
    pub file_type: FileType,
}

/// In-memory source tree. Relative paths are rooted at `/mock`.
pub struct MockFileSystem {
    files: HashMap<PathBuf, MockEntry>,
    unreadable: HashSet<PathBuf>,
    root: PathBuf,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self {
            files: HashMap::new(),
            unreadable: HashSet::new(),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn add_file(&mut self, path: impl AsRef<Path>, content: &str) {
        self.add_bytes(path, content.as_bytes());
    }

    /// File with raw contents, which need not be valid UTF-8
    pub fn add_bytes(&mut self, path: impl AsRef<Path>, content: &[u8]) {
        let path = self.normalize_path(path.as_ref());

        if let Some(parent) = path.parent() {
            self.ensure_parents(parent);
        }

        self.files.insert(
            path,
            MockEntry {
                content: Some(content.to_vec()),
                file_type: FileType::File,
            },
        );
    }

    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        self.ensure_parents(&path);
    }

    /// Any access to this path fails with `PermissionDenied`
    pub fn add_unreadable(&mut self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        self.unreadable.insert(path);
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn ensure_parents(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.files
                .entry(current.clone())
                .or_insert_with(|| MockEntry {
                    content: None,
                    file_type: FileType::Directory,
                });
        }
    }

    fn check_readable(&self, path: &Path) -> Result<()> {
        if self.unreadable.contains(path) {
            return Err(WorkflowError::io(
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
            ));
        }
        Ok(())
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> Result<bool> {
        let path = self.normalize_path(path);
        self.check_readable(&path)?;
        Ok(self.files.contains_key(&path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        let path = self.normalize_path(path);
        self.files
            .get(&path)
            .map(|e| e.file_type == FileType::Directory)
            .unwrap_or(false)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = self.read_bytes(path)?;
        String::from_utf8(bytes).map_err(|e| {
            WorkflowError::io(
                self.normalize_path(path),
                io::Error::new(io::ErrorKind::InvalidData, e),
            )
        })
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        let path = self.normalize_path(path);
        self.check_readable(&path)?;

        match self.files.get(&path) {
            Some(MockEntry {
                content: Some(content),
                ..
            }) => Ok(content.clone()),
            Some(_) => Err(WorkflowError::io(
                path,
                io::Error::new(io::ErrorKind::Other, "is a directory"),
            )),
            None => Err(WorkflowError::io(
                path,
                io::Error::new(io::ErrorKind::NotFound, "file not found"),
            )),
        }
    }

    fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let root = self.normalize_path(root);
        self.check_readable(&root)?;

        if let Some(denied) = self.unreadable.iter().find(|p| p.starts_with(&root)) {
            self.check_readable(denied)?;
        }

        let mut files: Vec<PathBuf> = self
            .files
            .iter()
            .filter(|(path, entry)| entry.file_type == FileType::File && path.starts_with(&root))
            .map(|(path, _)| path.clone())
            .collect();
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_file() {
        let mut fs = MockFileSystem::new();
        fs.add_file("src/main.py", "print('hi')");

        assert!(fs.exists(Path::new("src/main.py")).unwrap());
        assert!(fs.exists(Path::new("/mock/src/main.py")).unwrap());
        assert!(fs.is_dir(Path::new("src")));
        assert_eq!(
            fs.read_to_string(Path::new("src/main.py")).unwrap(),
            "print('hi')"
        );
    }

    #[test]
    fn test_missing_file() {
        let fs = MockFileSystem::new();

        assert!(!fs.exists(Path::new("nope")).unwrap());
        assert!(fs.read_to_string(Path::new("nope")).is_err());
    }

    #[test]
    fn test_non_utf8_file() {
        let mut fs = MockFileSystem::new();
        fs.add_bytes("legacy.txt", b"caf\xe9");

        assert_eq!(fs.read_bytes(Path::new("legacy.txt")).unwrap(), b"caf\xe9");
        assert!(matches!(
            fs.read_to_string(Path::new("legacy.txt")),
            Err(WorkflowError::Io { .. })
        ));
    }

    #[test]
    fn test_walk_files_only_returns_files_below_root() {
        let mut fs = MockFileSystem::new();
        fs.add_file("a.py", "");
        fs.add_file("tests/test_a.py", "");
        fs.add_file("tests/deep/test_b.py", "");
        fs.add_dir("empty");

        let files = fs.walk_files(Path::new("tests")).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("/mock/tests/deep/test_b.py"),
                PathBuf::from("/mock/tests/test_a.py"),
            ]
        );

        assert!(fs.walk_files(Path::new("missing")).unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_path() {
        let mut fs = MockFileSystem::new();
        fs.add_file("go.mod", "module x");
        fs.add_unreadable("go.mod");

        assert!(matches!(
            fs.exists(Path::new("go.mod")),
            Err(WorkflowError::Io { .. })
        ));
        assert!(fs.walk_files(Path::new("")).is_err());
    }
}
