use crate::suggestions::{AnalysisReport, AnalyzerConfig, ScriptAnalyzer};
use parking_lot::Mutex;
use scenekit_core::content_hash;
use std::sync::Arc;

/// Analysis entry point with a single-slot report cache
///
/// Reports are keyed by the content hash of the analyzed snapshot. Asking
/// again for the same text returns the cached report; any other text
/// replaces the slot. The engine is `Sync`, so one instance can serve
/// several threads.
pub struct AnalysisEngine {
    analyzer: ScriptAnalyzer,

    /// Last report, tagged with the hash of the text it was computed for
    slot: Mutex<Option<(u64, Arc<AnalysisReport>)>>,

    stats: Mutex<CacheStats>,
}

impl AnalysisEngine {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            analyzer: ScriptAnalyzer::with_config(config),
            slot: Mutex::new(None),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// Analyze `source`, reusing the cached report when the text is unchanged
    pub fn analyze(&self, source: &str) -> Arc<AnalysisReport> {
        let hash = content_hash(source);

        // Held while computing, so a concurrent request for the same text
        // waits and then reuses the result.
        let mut slot = self.slot.lock();
        if let Some((cached_hash, report)) = slot.as_ref() {
            if *cached_hash == hash {
                self.stats.lock().hits += 1;
                tracing::trace!(hash, "analysis cache hit");
                return Arc::clone(report);
            }
        }

        self.stats.lock().misses += 1;
        let report = Arc::new(self.analyzer.analyze(source));
        *slot = Some((hash, Arc::clone(&report)));
        report
    }

    /// The cached report, if it was computed for exactly `source`
    pub fn cached(&self, source: &str) -> Option<Arc<AnalysisReport>> {
        let hash = content_hash(source);
        self.slot
            .lock()
            .as_ref()
            .filter(|(cached_hash, _)| *cached_hash == hash)
            .map(|(_, report)| Arc::clone(report))
    }

    /// Drop the cached report
    pub fn invalidate(&self) {
        *self.slot.lock() = None;
    }

    pub fn config(&self) -> &AnalyzerConfig {
        self.analyzer.config()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        *self.stats.lock()
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}
