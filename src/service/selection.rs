use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// 待轉換檔案集合：不重複，依加入順序迭代
#[derive(Debug, Default, Clone)]
pub struct PendingSet {
    files: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl PendingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入尚未存在的路徑，返回新增數量
    pub fn add_files<I>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let before = self.files.len();
        for path in paths {
            if self.seen.insert(path.clone()) {
                self.files.push(path);
            }
        }
        self.files.len() - before
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.seen.contains(path)
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn snapshot(&self) -> Vec<PathBuf> {
        self.files.clone()
    }

    pub fn clear(&mut self) {
        self.files.clear();
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn keeps_first_seen_order_without_duplicates() {
        let mut set = PendingSet::new();
        assert_eq!(set.add_files(paths(&["b.heic", "a.heic", "b.heic"])), 2);
        assert_eq!(set.add_files(paths(&["c.heic", "a.heic"])), 1);
        assert_eq!(set.add_files(paths(&["a.heic"])), 0);
        assert_eq!(set.files(), paths(&["b.heic", "a.heic", "c.heic"]).as_slice());
        assert!(set.contains(Path::new("c.heic")));
    }

    #[test]
    fn clear_empties_both_views() {
        let mut set = PendingSet::new();
        set.add_files(paths(&["a.heic"]));
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(Path::new("a.heic")));
        assert_eq!(set.add_files(paths(&["a.heic"])), 1);
    }
}
