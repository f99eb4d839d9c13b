use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use kurabe_core::common::Timeframe;
use kurabe_core::compare::entity::{CustomRange, DateRange};
use tracing::warn;

/// # Summary
/// 将时间窗口标签解析为具体区间。
///
/// # Logic
/// 1. `end` 优先取自定义区间的结束日期，否则取参考时刻 `now`。
/// 2. 1D/1W 按固定天数回溯；1M/3M/1Y 按日历月回溯 (月末自动收敛到目标月最后一天)。
/// 3. YTD/MTD 取 `end` 所在年/月的第一天零点 (UTC)。
/// 4. CUSTOM 且提供了开始日期时原样使用；未提供开始日期或标签无法识别时，按 1 个月回溯。
///
/// # Arguments
/// * `timeframe`: 时间窗口标签，None 表示缺省或无法识别。
/// * `custom`: 可选的自定义区间。
/// * `now`: 注入的参考时刻。
///
/// # Returns
/// 总是返回一个区间，不会失败。
pub fn resolve_range(
    timeframe: Option<Timeframe>,
    custom: Option<&CustomRange>,
    now: DateTime<Utc>,
) -> DateRange {
    let end = custom
        .and_then(|c| c.end.as_deref())
        .and_then(parse_date_input)
        .unwrap_or(now);

    let start = match timeframe {
        Some(Timeframe::OneDay) => days_back(end, 1),
        Some(Timeframe::OneWeek) => days_back(end, 7),
        Some(Timeframe::OneMonth) => months_back(end, 1),
        Some(Timeframe::ThreeMonths) => months_back(end, 3),
        Some(Timeframe::OneYear) => months_back(end, 12),
        Some(Timeframe::YearToDate) => start_of_day(end.date_naive().with_ordinal(1), end),
        Some(Timeframe::MonthToDate) => start_of_day(end.date_naive().with_day(1), end),
        Some(Timeframe::Custom) => {
            match custom.and_then(|c| c.start.as_deref()).and_then(parse_date_input) {
                Some(start) => return DateRange { start, end },
                None => months_back(end, 1),
            }
        }
        None => months_back(end, 1),
    };

    DateRange { start, end }
}

/// # Summary
/// 解析用户提供的日期字符串。
///
/// # Logic
/// 1. 优先按 RFC 3339 解析并换算到 UTC。
/// 2. 其次按 `YYYY-MM-DD` 解析为当天零点 (UTC)。
/// 3. 均失败时记录警告并返回 None。
pub fn parse_date_input(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d.and_time(NaiveTime::MIN).and_utc());
    }
    warn!("Ignoring unparseable custom date: {}", raw);
    None
}

fn days_back(end: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    end.checked_sub_signed(Duration::days(days))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn months_back(end: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    end.checked_sub_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn start_of_day(date: Option<NaiveDate>, fallback: DateTime<Utc>) -> DateTime<Utc> {
    date.map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .unwrap_or(fallback)
}
