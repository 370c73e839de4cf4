use std::{
    fs::{self, File},
    num::NonZeroUsize,
    path::PathBuf,
    time::SystemTime,
};

use lru::LruCache;
use parking_lot::Mutex;

use crate::{
    cache::{mkdir_if_not_exists, Cached},
    movie::{Movie, MovieId},
};

const RECOMMENDATIONS_BUCKET: &str = "recommendations";

pub struct WebApiCache {
    base: Option<PathBuf>,
    recommendations: Mutex<LruCache<(MovieId, usize), Cached<Vec<Movie>>>>,
}

impl WebApiCache {
    pub fn new(base: Option<PathBuf>) -> Self {
        const RECOMMENDATIONS_CACHE_SIZE: usize = 64;
        let capacity = NonZeroUsize::new(RECOMMENDATIONS_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
        Self {
            base,
            recommendations: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get_recommendations(&self, id: MovieId, count: usize) -> Option<Cached<Vec<Movie>>> {
        self.recommendations.lock().get(&(id, count)).cloned()
    }

    pub fn set_recommendations(&self, id: MovieId, count: usize, movies: Vec<Movie>) {
        self.recommendations
            .lock()
            .put((id, count), Cached::new(movies, SystemTime::now()));
    }

    pub fn recommendations_key(id: MovieId, count: usize) -> String {
        format!("{id}-{count}.json")
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<File> {
        self.key(bucket, key).and_then(|path| File::open(path).ok())
    }

    pub fn set(&self, bucket: &str, key: &str, value: &[u8]) {
        if let Some(path) = self.bucket(bucket) {
            if let Err(err) = mkdir_if_not_exists(&path) {
                log::error!("failed to create WebAPI cache bucket: {:?}", err);
            }
        }
        if let Some(path) = self.key(bucket, key) {
            if let Err(err) = fs::write(path, value) {
                log::error!("failed to save to WebAPI cache: {:?}", err);
            }
        }
    }

    pub fn recommendations_bucket() -> &'static str {
        RECOMMENDATIONS_BUCKET
    }

    fn bucket(&self, bucket: &str) -> Option<PathBuf> {
        self.base.as_ref().map(|path| path.join(bucket))
    }

    fn key(&self, bucket: &str, key: &str) -> Option<PathBuf> {
        self.bucket(bucket).map(|path| path.join(key))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    #[test]
    fn memory_entries_are_keyed_by_id_and_count() {
        let cache = WebApiCache::new(None);
        cache.set_recommendations(MovieId(1), 7, vec![Movie::new(2, "Two")]);

        let hit = cache.get_recommendations(MovieId(1), 7).unwrap();
        assert!(hit.is_cached());
        assert_eq!(hit.data[0].id, MovieId(2));
        assert!(cache.get_recommendations(MovieId(1), 8).is_none());
        assert!(cache.get_recommendations(MovieId(2), 7).is_none());
    }

    #[test]
    fn disk_buckets_round_trip_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let cache = WebApiCache::new(Some(dir.path().to_path_buf()));
        let key = WebApiCache::recommendations_key(MovieId(10), 7);
        assert_eq!(key, "10-7.json");

        assert!(cache.get(RECOMMENDATIONS_BUCKET, &key).is_none());
        cache.set(RECOMMENDATIONS_BUCKET, &key, b"{}");

        let mut body = String::new();
        cache
            .get(RECOMMENDATIONS_BUCKET, &key)
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "{}");
    }

    #[test]
    fn without_base_nothing_hits_disk() {
        let cache = WebApiCache::new(None);
        cache.set(RECOMMENDATIONS_BUCKET, "1-1.json", b"{}");
        assert!(cache.get(RECOMMENDATIONS_BUCKET, "1-1.json").is_none());
    }
}
