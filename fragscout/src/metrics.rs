use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Counters for one search, shared by the compile, discovery and scan stages
#[derive(Debug, Clone)]
pub struct SearchMetrics {
    // Discovery
    files_discovered: Arc<AtomicU64>,
    directories_listed: Arc<AtomicU64>,

    // Loading
    files_loaded: Arc<AtomicU64>,
    bytes_loaded: Arc<AtomicU64>,

    // Matching
    lines_scanned: Arc<AtomicU64>,
    matches_found: Arc<AtomicU64>,

    // Pattern cache
    cache_hits: Arc<AtomicU64>,
    cache_misses: Arc<AtomicU64>,
}

impl SearchMetrics {
    /// Creates a new SearchMetrics instance
    pub fn new() -> Self {
        Self {
            files_discovered: Arc::new(AtomicU64::new(0)),
            directories_listed: Arc::new(AtomicU64::new(0)),
            files_loaded: Arc::new(AtomicU64::new(0)),
            bytes_loaded: Arc::new(AtomicU64::new(0)),
            lines_scanned: Arc::new(AtomicU64::new(0)),
            matches_found: Arc::new(AtomicU64::new(0)),
            cache_hits: Arc::new(AtomicU64::new(0)),
            cache_misses: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn record_directory_listed(&self) {
        self.directories_listed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_file_discovered(&self) {
        self.files_discovered.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a completed document load of `bytes` bytes
    pub fn record_load(&self, bytes: u64) {
        self.files_loaded.fetch_add(1, Ordering::Relaxed);
        self.bytes_loaded.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Records matching over one document
    pub fn record_matching(&self, lines: u64, matches: u64) {
        self.lines_scanned.fetch_add(lines, Ordering::Relaxed);
        self.matches_found.fetch_add(matches, Ordering::Relaxed);
    }

    /// Records a pattern cache lookup
    pub fn record_cache_lookup(&self, hit: bool) {
        if hit {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cache_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> u64 {
        self.cache_misses.load(Ordering::Relaxed)
    }

    /// Snapshot of all counters
    pub fn get_stats(&self) -> SearchStats {
        SearchStats {
            files_discovered: self.files_discovered.load(Ordering::Relaxed),
            directories_listed: self.directories_listed.load(Ordering::Relaxed),
            files_loaded: self.files_loaded.load(Ordering::Relaxed),
            bytes_loaded: self.bytes_loaded.load(Ordering::Relaxed),
            lines_scanned: self.lines_scanned.load(Ordering::Relaxed),
            matches_found: self.matches_found.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
        }
    }

    /// Logs current statistics
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Search stats:\n\
             Directories listed: {}\n\
             Files discovered/loaded: {}/{}\n\
             Bytes loaded: {}\n\
             Lines scanned: {}\n\
             Matches: {}\n\
             Pattern cache hits/misses: {}/{}",
            stats.directories_listed,
            stats.files_discovered,
            stats.files_loaded,
            stats.bytes_loaded,
            stats.lines_scanned,
            stats.matches_found,
            stats.cache_hits,
            stats.cache_misses
        );
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`SearchMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub files_discovered: u64,
    pub directories_listed: u64,
    pub files_loaded: u64,
    pub bytes_loaded: u64,
    pub lines_scanned: u64,
    pub matches_found: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}
