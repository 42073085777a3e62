use std::collections::{BTreeMap, BTreeSet};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

use crate::mutants::Mutant;

/// Host-side identity of a scanned file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub component: String,
}

impl FileHandle {
    pub fn new(component: impl Into<String>) -> Self {
        FileHandle { component: component.into() }
    }
}

/// Resolves a report's `source_file` to a file the host knows about.
pub trait FileResolver {
    fn resolve(&self, source_file: &str) -> Option<FileHandle>;
}

impl<F> FileResolver for F
where
    F: Fn(&str) -> Option<FileHandle>,
{
    fn resolve(&self, source_file: &str) -> Option<FileHandle> {
        self(source_file)
    }
}

/// Resolves every path to itself.
pub struct AcceptAll;

impl FileResolver for AcceptAll {
    fn resolve(&self, source_file: &str) -> Option<FileHandle> {
        Some(FileHandle::new(source_file))
    }
}

/// Resolves only the paths in a fixed set.
#[derive(Debug, Default)]
pub struct KnownFiles {
    files: BTreeSet<String>,
}

impl KnownFiles {
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KnownFiles {
            files: files.into_iter().map(Into::into).collect(),
        }
    }
}

impl FileResolver for KnownFiles {
    fn resolve(&self, source_file: &str) -> Option<FileHandle> {
        self.files
            .contains(source_file)
            .then(|| FileHandle::new(source_file))
    }
}

/// Resolves paths that exist as regular files under a project root.
///
/// Absolute paths and paths with `..` segments never resolve.
pub struct SourceRoot {
    root: Utf8PathBuf,
}

impl SourceRoot {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        SourceRoot { root: root.into() }
    }
}

impl FileResolver for SourceRoot {
    fn resolve(&self, source_file: &str) -> Option<FileHandle> {
        let relative = Utf8Path::new(source_file);
        let confined = relative
            .components()
            .all(|c| matches!(c, Utf8Component::Normal(_) | Utf8Component::CurDir));
        if !confined {
            tracing::debug!(file = %source_file, "source file escapes the source root");
            return None;
        }
        let path = self.root.join(relative);
        path.is_file().then(|| FileHandle::new(path.as_str()))
    }
}

/// One file's share of the batch. Never empty.
#[derive(Debug, Clone)]
pub struct FileGroup {
    pub handle: FileHandle,
    pub mutants: Vec<Mutant>,
}

/// Group mutants by `source_file`, exactly as supplied.
///
/// Records with an empty path or a path the resolver rejects are dropped.
pub fn group_by_file<R>(mutants: &[Mutant], resolver: &R) -> BTreeMap<String, FileGroup>
where
    R: FileResolver + ?Sized,
{
    let mut groups: BTreeMap<String, FileGroup> = BTreeMap::new();
    let mut dropped = 0usize;

    for mutant in mutants {
        if mutant.source_file.trim().is_empty() {
            tracing::debug!(status = mutant.status.as_str(), "mutant has no source file");
            dropped += 1;
            continue;
        }

        if let Some(group) = groups.get_mut(&mutant.source_file) {
            group.mutants.push(mutant.clone());
            continue;
        }

        match resolver.resolve(&mutant.source_file) {
            Some(handle) => {
                groups.insert(
                    mutant.source_file.clone(),
                    FileGroup {
                        handle,
                        mutants: vec![mutant.clone()],
                    },
                );
            }
            None => {
                tracing::debug!(file = %mutant.source_file, "source file not resolved");
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        tracing::warn!(dropped, "mutants skipped: source file could not be resolved");
    }

    groups
}
