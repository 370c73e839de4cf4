use std::{fs, io, path::Path, time::SystemTime};

/// Value that is either freshly loaded or read back from the cache.
#[derive(Clone, Debug)]
pub struct Cached<T> {
    pub data: T,
    pub cached_at: Option<SystemTime>,
}

impl<T> Cached<T> {
    pub fn new(data: T, at: SystemTime) -> Self {
        Self {
            data,
            cached_at: Some(at),
        }
    }

    pub fn fresh(data: T) -> Self {
        Self {
            data,
            cached_at: None,
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cached_at.is_some()
    }
}

pub fn mkdir_if_not_exists(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path).or_else(|err| {
        if err.kind() == io::ErrorKind::AlreadyExists {
            Ok(())
        } else {
            Err(err)
        }
    })
}
