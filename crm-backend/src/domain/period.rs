// src/domain/period.rs

use crate::error::{AppError, AppResult};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

/// 日付文字列の入力フォーマット
const DATE_FORMAT: &str = "%Y-%m-%d";

/// 集計クエリの範囲を区切る閉区間 [start, end]
///
/// 不変条件: `end >= start`（コンストラクタで強制）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Period {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if end < start {
            return Err(AppError::InvalidRange(format!(
                "end date {} is before start date {}",
                end.format(DATE_FORMAT),
                start.format(DATE_FORMAT)
            )));
        }
        Ok(Self { start, end })
    }

    /// クエリパラメータの日付文字列から期間を構築する
    ///
    /// - `start` 省略時は `now` の30日前
    /// - `end` 省略時は `now`
    /// - `end` を指定した場合はその日の 23:59:59 まで進め、終了日を丸ごと含める
    pub fn from_bounds(
        start: Option<&str>,
        end: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<Self> {
        let start = match start {
            Some(s) => start_of_day(parse_date(s)?),
            None => now - Duration::days(30),
        };
        let end = match end {
            Some(s) => end_of_day(parse_date(s)?),
            None => now,
        };
        Self::new(start, end)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// 直前の同じ長さの期間（成長率の比較対象）
    pub fn previous(&self) -> Self {
        let duration = self.end - self.start;
        Self {
            start: self.start - duration,
            end: self.start,
        }
    }

    /// 期間の日数（1日未満の期間は1日として扱う）
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days().max(1)
    }
}

fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| AppError::InvalidDateFormat(format!("'{}' does not match YYYY-MM-DD", s)))
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    // 23:59:59 は常に有効な時刻なので unwrap_or は到達しない
    let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&date.and_time(last_second))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_end_is_advanced_to_last_second_of_day() {
        let period = Period::from_bounds(Some("2024-01-01"), Some("2024-01-01"), now()).unwrap();
        assert_eq!(
            period.end(),
            Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 59).unwrap()
        );
        // 同日指定でも丸一日を含む有効な範囲になる
        assert!(period.end() > period.start());
    }

    #[test]
    fn test_defaults_to_trailing_30_days() {
        let period = Period::from_bounds(None, None, now()).unwrap();
        assert_eq!(period.end(), now());
        assert_eq!(period.start(), now() - Duration::days(30));
    }

    #[test]
    fn test_invalid_date_format_is_rejected() {
        let result = Period::from_bounds(Some("01/01/2024"), None, now());
        assert!(matches!(result, Err(AppError::InvalidDateFormat(_))));

        let result = Period::from_bounds(None, Some("2024-13-40"), now());
        assert!(matches!(result, Err(AppError::InvalidDateFormat(_))));
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let result = Period::from_bounds(Some("2024-02-01"), Some("2024-01-01"), now());
        assert!(matches!(result, Err(AppError::InvalidRange(_))));
    }

    #[test]
    fn test_previous_period_has_equal_duration() {
        let period = Period::from_bounds(Some("2024-01-11"), Some("2024-01-20"), now()).unwrap();
        let previous = period.previous();
        assert_eq!(previous.end(), period.start());
        assert_eq!(
            previous.end() - previous.start(),
            period.end() - period.start()
        );
    }

    #[test]
    fn test_duration_days_rounds_up_to_one() {
        let start = now();
        let period = Period::new(start, start + Duration::hours(2)).unwrap();
        assert_eq!(period.duration_days(), 1);

        let period = Period::from_bounds(Some("2024-01-01"), Some("2024-01-31"), now()).unwrap();
        assert_eq!(period.duration_days(), 30);
        assert_eq!(period.end().second(), 59);
    }
}
