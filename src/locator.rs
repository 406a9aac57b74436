//! Discovery of repositories in a `<root>/<owner>/<repo>.git` tree.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::LocateError;
use crate::remote::RemoteStore;

/// Directory-name suffix that marks a repository.
pub const REPO_SUFFIX: &str = ".git";

/// A repository found under the root, with its current origin URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRecord {
    /// `<owner>/<repo>` with the `.git` suffix removed.
    pub id: String,
    pub directory: PathBuf,
    pub remote_url: String,
}

/// Lazily yields every repository two levels below a root.
///
/// Created by [`locate`]. Owners and repositories are visited in lexical
/// order. Entries that are not directories, repositories without a readable
/// origin URL, and owner directories that cannot be listed are skipped.
pub struct Repositories<'s, S: RemoteStore + ?Sized> {
    store: &'s S,
    owners: std::vec::IntoIter<(String, PathBuf)>,
    current: Option<(String, std::vec::IntoIter<(String, PathBuf)>)>,
}

/// Starts a walk of `root` that reads each repository's URL through `store`.
///
/// # Errors
///
/// Returns [`LocateError`] only if `root` itself cannot be listed. Nothing
/// below the root can fail the walk.
pub fn locate<'s, S: RemoteStore + ?Sized>(
    root: &Path,
    store: &'s S,
) -> Result<Repositories<'s, S>, LocateError> {
    let owners = sorted_subdirs(root).map_err(|e| LocateError {
        path: root.to_path_buf(),
        source: e,
    })?;

    Ok(Repositories {
        store,
        owners: owners.into_iter(),
        current: None,
    })
}

impl<S: RemoteStore + ?Sized> Iterator for Repositories<'_, S> {
    type Item = RepositoryRecord;

    fn next(&mut self) -> Option<RepositoryRecord> {
        let store = self.store;
        loop {
            if let Some((owner, repos)) = &mut self.current {
                for (name, directory) in repos.by_ref() {
                    let Some(repo) = name.strip_suffix(REPO_SUFFIX) else {
                        continue;
                    };
                    if repo.is_empty() {
                        continue;
                    }
                    match store.read_url(&directory) {
                        Ok(remote_url) => {
                            return Some(RepositoryRecord {
                                id: format!("{}/{}", owner, repo),
                                directory,
                                remote_url,
                            });
                        }
                        Err(e) => {
                            debug!(path = %directory.display(), error = %e, "skipping repository");
                        }
                    }
                }
                self.current = None;
            }

            let (owner, path) = self.owners.next()?;
            match sorted_subdirs(&path) {
                Ok(repos) => self.current = Some((owner, repos.into_iter())),
                Err(e) => warn!(path = %path.display(), error = %e, "cannot list owner directory"),
            }
        }
    }
}

/// Lists the subdirectories of `dir` as `(name, path)` sorted by name.
/// Names that are not valid UTF-8 are skipped.
fn sorted_subdirs(dir: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => out.push((name, path)),
            Err(name) => debug!(name = ?name, "skipping non UTF-8 directory name"),
        }
    }
    out.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::locate;
    use crate::remote::ConfigFileStore;
    use std::fs;
    use std::path::Path;

    fn make_repo(root: &Path, owner: &str, repo: &str, url: Option<&str>) {
        let dir = root.join(owner).join(repo);
        fs::create_dir_all(&dir).expect("failed to create repo dir");
        let mut config = String::from("[core]\n\tbare = true\n");
        if let Some(u) = url {
            config.push_str(&format!("[remote \"origin\"]\n\turl = {}\n", u));
        }
        fs::write(dir.join("config"), config).expect("failed to write config");
    }

    #[test]
    fn finds_repositories_two_levels_deep() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let root = tmp.path();
        make_repo(root, "bob", "tools.git", Some("https://b:t2@h.example/bob/tools.git"));
        make_repo(root, "alice", "proj.git", Some("https://a:t1@h.example/alice/proj.git"));
        make_repo(root, "alice", "nogit", Some("https://a:t1@h.example/alice/x.git"));
        make_repo(root, "alice", "local.git", None);
        fs::write(root.join("README"), "not an owner").expect("failed to write file");
        fs::write(root.join("alice").join("stray.git"), "a file").expect("failed to write file");

        let store = ConfigFileStore;
        let found: Vec<_> = locate(root, &store).expect("locate failed").collect();

        let ids: Vec<&str> = found.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["alice/proj", "bob/tools"]);
        assert_eq!(found[0].remote_url, "https://a:t1@h.example/alice/proj.git");
        assert_eq!(found[0].directory, root.join("alice").join("proj.git"));
    }

    #[test]
    fn strips_only_the_suffix() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        make_repo(tmp.path(), "org", "digit.git", Some("https://u:p@h/org/digit.git"));

        let store = ConfigFileStore;
        let found: Vec<_> = locate(tmp.path(), &store).expect("locate failed").collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "org/digit");
    }

    #[test]
    fn empty_root_yields_nothing() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        fs::create_dir_all(tmp.path().join("owner").join("plain-dir")).expect("failed to create dir");

        let store = ConfigFileStore;
        assert_eq!(locate(tmp.path(), &store).expect("locate failed").count(), 0);
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let store = ConfigFileStore;
        assert!(locate(&tmp.path().join("absent"), &store).is_err());
    }
}
