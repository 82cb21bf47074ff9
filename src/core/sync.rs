use crate::domain::model::{LottoResult, SyncResult};
use crate::domain::ports::{DrawSource, Storage};
use crate::utils::error::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;

pub const RESULTS_FILE: &str = "draw_results.json";
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// 本地保存的開獎結果，以期數為 key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultArchive {
    results: BTreeMap<i32, LottoResult>,
}

impl ResultArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the archive from `path`; a missing file is an empty archive.
    pub async fn load<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        if !storage.exists(path).await {
            tracing::debug!("No result archive at {}, starting empty", path);
            return Ok(Self::new());
        }

        let data = storage.read_file(path).await?;
        let results: Vec<LottoResult> = serde_json::from_slice(&data)?;
        let mut archive = Self::new();
        archive.insert_all(results);
        tracing::debug!("Loaded {} draw results from {}", archive.count(), path);
        Ok(archive)
    }

    pub async fn save<S: Storage>(&self, storage: &S, path: &str) -> Result<()> {
        let data = serde_json::to_vec_pretty(&self.all())?;
        storage.write_file(path, &data).await
    }

    pub fn count(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn latest_round(&self) -> Option<i32> {
        self.results.keys().next_back().copied()
    }

    pub fn get(&self, round: i32) -> Option<&LottoResult> {
        self.results.get(&round)
    }

    pub fn insert(&mut self, result: LottoResult) {
        self.results.insert(result.round, result);
    }

    pub fn insert_all(&mut self, results: impl IntoIterator<Item = LottoResult>) {
        for result in results {
            self.insert(result);
        }
    }

    /// 依期數由小到大
    pub fn all(&self) -> Vec<LottoResult> {
        self.results.values().cloned().collect()
    }
}

pub struct ResultSyncer<S: Storage, D: DrawSource> {
    storage: S,
    source: Arc<D>,
    archive: ResultArchive,
    path: String,
    batch_size: usize,
}

impl<S: Storage, D: DrawSource + 'static> ResultSyncer<S, D> {
    pub async fn open(storage: S, source: Arc<D>, batch_size: usize) -> Result<Self> {
        let archive = ResultArchive::load(&storage, RESULTS_FILE).await?;
        Ok(Self {
            storage,
            source,
            archive,
            path: RESULTS_FILE.to_string(),
            batch_size: batch_size.max(1),
        })
    }

    pub fn archive(&self) -> &ResultArchive {
        &self.archive
    }

    /// Returns the draw for `round`, asking the source only when the
    /// archive does not already hold it.
    pub async fn get_result(&mut self, round: i32) -> Result<LottoResult> {
        if let Some(result) = self.archive.get(round) {
            return Ok(result.clone());
        }

        tracing::debug!("Round {} not archived, fetching", round);
        let result = self.source.fetch_draw(round).await?;
        self.archive.insert(result.clone());
        self.archive.save(&self.storage, &self.path).await?;
        Ok(result)
    }

    /// Brings the archive up to `current_round`.
    ///
    /// An empty archive is filled from round 1; otherwise only the rounds
    /// after the latest archived one are requested. Each batch is fetched
    /// concurrently and persisted before the next one starts.
    pub async fn sync_all(&mut self, current_round: i32) -> Result<SyncResult> {
        let from_round = match self.archive.latest_round() {
            Some(latest) => latest.saturating_add(1),
            None => 1,
        };

        if from_round > current_round {
            tracing::info!("✅ Draw results already up to date (round {})", current_round);
            return Ok(SyncResult::default());
        }

        tracing::info!("🔄 Syncing rounds {} to {}", from_round, current_round);

        let mut summary = SyncResult {
            total_count: (i64::from(current_round) - i64::from(from_round) + 1) as usize,
            ..SyncResult::default()
        };

        let step = i32::try_from(self.batch_size).unwrap_or(i32::MAX);
        let mut batch_start = from_round;
        loop {
            let batch_end = batch_start.saturating_add(step - 1).min(current_round);
            tracing::debug!("Batch: {}..={}", batch_start, batch_end);

            let mut tasks = JoinSet::new();
            for round in batch_start..=batch_end {
                let source = Arc::clone(&self.source);
                tasks.spawn(async move { (round, source.fetch_draw(round).await) });
            }

            let mut fetched = Vec::new();
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((_, Ok(result))) => fetched.push(result),
                    Ok((round, Err(e))) => {
                        tracing::warn!("⚠️ Failed to fetch round {}: {}", round, e);
                        summary.failed_count += 1;
                    }
                    Err(e) => {
                        tracing::warn!("⚠️ Fetch task aborted: {}", e);
                        summary.failed_count += 1;
                    }
                }
            }

            if fetched.is_empty() {
                tracing::warn!("No successful results in batch");
            } else {
                summary.success_count += fetched.len();
                tracing::debug!("Inserting {} results", fetched.len());
                self.archive.insert_all(fetched);
                self.archive.save(&self.storage, &self.path).await?;
            }

            if batch_end >= current_round {
                break;
            }
            batch_start = batch_end + 1;
        }

        tracing::info!(
            "Sync complete: {} ok, {} failed, {} archived",
            summary.success_count,
            summary.failed_count,
            self.archive.count()
        );

        Ok(summary)
    }
}
