use crate::core::draw_calendar::{kst_now, upcoming_draw_round};
use crate::utils::error::{LottoError, Result};
use std::collections::HashSet;
use url::Url;

/// 一注的號碼數量
pub const NUMBERS_PER_GAME: usize = 6;
/// 號碼範圍 1..=45
pub const MIN_NUMBER: i32 = 1;
pub const MAX_NUMBER: i32 = 45;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(LottoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(LottoError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(LottoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(LottoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(LottoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(LottoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(LottoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 期數必須在 1 到尚未開獎的下一期之間
pub fn validate_draw_round(field_name: &str, round: i32) -> Result<()> {
    validate_range(field_name, round, 1, upcoming_draw_round(kst_now()))
}

/// 檢查一注號碼: 6 個、不重複、都在 1..=45
pub fn validate_game_numbers(field_name: &str, numbers: &[i32]) -> Result<()> {
    if numbers.len() != NUMBERS_PER_GAME {
        return Err(LottoError::InvalidInput {
            field: field_name.to_string(),
            reason: format!(
                "expected {} numbers, got {}",
                NUMBERS_PER_GAME,
                numbers.len()
            ),
        });
    }

    let mut seen = HashSet::with_capacity(NUMBERS_PER_GAME);
    for &number in numbers {
        if !(MIN_NUMBER..=MAX_NUMBER).contains(&number) {
            return Err(LottoError::InvalidInput {
                field: field_name.to_string(),
                reason: format!(
                    "number {} is outside {}..={}",
                    number, MIN_NUMBER, MAX_NUMBER
                ),
            });
        }
        if !seen.insert(number) {
            return Err(LottoError::InvalidInput {
                field: field_name.to_string(),
                reason: format!("number {} appears more than once", number),
            });
        }
    }

    Ok(())
}
