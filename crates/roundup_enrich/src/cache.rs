use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

/// Durable link → preview-image-URL mapping, persisted as one JSON object
/// at a well-known path. Entries never expire. Persistence is best-effort:
/// a full or unavailable store leaves the entry memory-only for the
/// session, and an unreadable blob on load yields an empty cache.
pub struct ImageCache {
    path: Option<PathBuf>,
    entries: Mutex<HashMap<String, String>>,
}

impl ImageCache {
    /// Session-only cache, nothing touches disk. Used in tests and as the
    /// fallback when no cache path is configured.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(blob) => serde_json::from_str(&blob).unwrap_or_else(|err| {
                debug!(error = %err, path = %path.display(), "cache blob unreadable, starting empty");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Self {
            path: Some(path),
            entries: Mutex::new(entries),
        }
    }

    pub fn get(&self, link: &str) -> Option<String> {
        self.entries.lock().unwrap().get(link).cloned()
    }

    pub fn has(&self, link: &str) -> bool {
        self.entries.lock().unwrap().contains_key(link)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert and persist. The entries lock is held across the disk write
    /// so concurrent workers cannot clobber a newer blob with an older
    /// one, and the write goes through a temp file + rename so a torn
    /// blob can never reach the well-known path.
    pub fn put(&self, link: impl Into<String>, url: impl Into<String>) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(link.into(), url.into());
        self.persist(&entries);
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        let Some(path) = &self.path else { return };
        let blob = match serde_json::to_string(entries) {
            Ok(blob) => blob,
            Err(_) => return,
        };
        let staging = path.with_extension("tmp");
        let written = std::fs::write(&staging, blob).and_then(|_| std::fs::rename(&staging, path));
        if let Err(err) = written {
            debug!(error = %err, path = %path.display(), "cache persist failed, entry stays memory-only");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("roundup_cache_{}_{}.json", std::process::id(), name))
    }

    #[test]
    fn put_then_get_round_trips() {
        let cache = ImageCache::in_memory();
        assert!(!cache.has("https://e.com/a"));
        cache.put("https://e.com/a", "https://img.e.com/a.jpg");
        assert_eq!(
            cache.get("https://e.com/a").as_deref(),
            Some("https://img.e.com/a.jpg")
        );
        assert!(cache.has("https://e.com/a"));
    }

    #[test]
    fn persists_across_reload() {
        let path = temp_path("reload");
        let _ = std::fs::remove_file(&path);

        let cache = ImageCache::load(&path);
        assert!(cache.is_empty());
        cache.put("https://e.com/a", "https://img.e.com/a.jpg");
        drop(cache);

        let reloaded = ImageCache::load(&path);
        assert_eq!(
            reloaded.get("https://e.com/a").as_deref(),
            Some("https://img.e.com/a.jpg")
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn corrupt_blob_yields_empty_cache() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{not json at all").unwrap();

        let cache = ImageCache::load(&path);
        assert!(cache.is_empty());
        // and it is usable afterwards
        cache.put("https://e.com/a", "https://img.e.com/a.jpg");
        assert_eq!(cache.len(), 1);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unwritable_store_keeps_entry_in_memory() {
        // a path inside a directory that does not exist can never be written
        let path = temp_path("missing_dir/nested");
        let cache = ImageCache::load(&path);
        cache.put("https://e.com/a", "https://img.e.com/a.jpg");
        assert_eq!(
            cache.get("https://e.com/a").as_deref(),
            Some("https://img.e.com/a.jpg")
        );
    }

    #[test]
    fn concurrent_puts_keep_every_entry_durable() {
        let path = temp_path("concurrent");
        let _ = std::fs::remove_file(&path);

        let cache = std::sync::Arc::new(ImageCache::load(&path));
        let workers: Vec<_> = (0..8)
            .map(|i| {
                let cache = std::sync::Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache.put(
                        format!("https://e.com/{i}"),
                        format!("https://img.e.com/{i}.jpg"),
                    );
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let reloaded = ImageCache::load(&path);
        assert_eq!(reloaded.len(), 8);
        for i in 0..8 {
            assert!(reloaded.has(&format!("https://e.com/{i}")));
        }
        let _ = std::fs::remove_file(&path);
    }
}
