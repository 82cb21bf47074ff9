use crate::domain::model::{FirstPrizeInfo, LottoResult};
use crate::domain::ports::DrawSource;
use crate::utils::error::{LottoError, Result};
use crate::utils::validation::{validate_game_numbers, MAX_NUMBER, MIN_NUMBER};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_ENDPOINT: &str = "https://www.dhlottery.co.kr/common.do";

/// 開獎 API 的回應格式。尚未開獎時只有 `returnValue: "fail"`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawPayload {
    #[serde(rename = "returnValue")]
    pub return_value: String,
    #[serde(rename = "drwNo")]
    pub round: i32,
    #[serde(rename = "drwNoDate")]
    pub draw_date: String,
    #[serde(rename = "drwtNo1")]
    pub number1: i32,
    #[serde(rename = "drwtNo2")]
    pub number2: i32,
    #[serde(rename = "drwtNo3")]
    pub number3: i32,
    #[serde(rename = "drwtNo4")]
    pub number4: i32,
    #[serde(rename = "drwtNo5")]
    pub number5: i32,
    #[serde(rename = "drwtNo6")]
    pub number6: i32,
    #[serde(rename = "bnusNo")]
    pub bonus_number: i32,
    #[serde(rename = "firstWinamnt")]
    pub first_prize_amount: i64,
    #[serde(rename = "firstPrzwnerCo")]
    pub first_prize_winners: i32,
    #[serde(rename = "firstAccumamnt")]
    pub first_prize_accumulated: i64,
    #[serde(rename = "totSellamnt")]
    pub total_sales_amount: i64,
}

impl DrawPayload {
    pub fn into_result(self, requested_round: i32) -> Result<LottoResult> {
        if self.return_value != "success" {
            return Err(LottoError::DrawNotAvailable {
                round: requested_round,
            });
        }

        // 欄位缺漏時 serde 會補 0，下面的檢查會擋掉
        if self.round != requested_round {
            return Err(LottoError::InvalidInput {
                field: "drwNo".to_string(),
                reason: format!("requested round {}, got {}", requested_round, self.round),
            });
        }

        let draw_date = NaiveDate::parse_from_str(&self.draw_date, "%Y-%m-%d").map_err(|e| {
            LottoError::InvalidInput {
                field: "drwNoDate".to_string(),
                reason: format!("'{}' is not a date: {}", self.draw_date, e),
            }
        })?;

        let numbers = vec![
            self.number1,
            self.number2,
            self.number3,
            self.number4,
            self.number5,
            self.number6,
        ];
        validate_game_numbers("drwtNo", &numbers)?;

        if !(MIN_NUMBER..=MAX_NUMBER).contains(&self.bonus_number)
            || numbers.contains(&self.bonus_number)
        {
            return Err(LottoError::InvalidInput {
                field: "bnusNo".to_string(),
                reason: format!("{} is not a valid bonus number", self.bonus_number),
            });
        }

        Ok(LottoResult::new(
            requested_round,
            draw_date,
            numbers,
            self.bonus_number,
            FirstPrizeInfo {
                win_amount: self.first_prize_amount,
                winner_count: self.first_prize_winners,
                total_sales_amount: self.total_sales_amount,
            },
        ))
    }
}

pub struct HttpDrawSource {
    client: Client,
    endpoint: String,
}

impl HttpDrawSource {
    pub fn new(endpoint: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl DrawSource for HttpDrawSource {
    async fn fetch_draw(&self, round: i32) -> Result<LottoResult> {
        tracing::debug!("Requesting draw {} from: {}", round, self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("method", "getLottoNumber".to_string()), ("drwNo", round.to_string())])
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!("API response status: {}", response.status());

        let payload: DrawPayload = response.json().await?;
        payload.into_result(round)
    }
}
