use crate::domain::model::{LottoResult, TicketSortType};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn data_path(&self) -> &str;
    fn current_round(&self) -> Option<i32>;
    fn sync_enabled(&self) -> bool;
    fn batch_size(&self) -> usize;
    fn request_timeout_seconds(&self) -> u64;
    fn sort_type(&self) -> TicketSortType;
}

/// 開獎結果來源 (遠端 API 或測試替身)
#[async_trait]
pub trait DrawSource: Send + Sync {
    async fn fetch_draw(&self, round: i32) -> Result<LottoResult>;
}
