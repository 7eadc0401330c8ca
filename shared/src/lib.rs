use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Generic message shown for any transport-level failure
pub const CONNECTION_ERROR_MESSAGE: &str = "연결 오류가 발생했습니다.";

/// Message used when no backend URL has been configured yet
pub const NOT_CONFIGURED_MESSAGE: &str = "백엔드 URL이 설정되지 않았습니다.";

/// Enrollment status of a student as stored in the backing sheet
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StudentStatus {
    /// 재원 - currently attending
    #[default]
    Enrolled,
    /// 휴원 - on a break
    Paused,
    /// 퇴원 - left the academy
    Withdrawn,
    /// Any label the sheet uses that we do not know about
    Other(String),
}

impl StudentStatus {
    /// Parse the sheet label; an empty label counts as enrolled
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "" | "재원" => StudentStatus::Enrolled,
            "휴원" => StudentStatus::Paused,
            "퇴원" => StudentStatus::Withdrawn,
            other => StudentStatus::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            StudentStatus::Enrolled => "재원",
            StudentStatus::Paused => "휴원",
            StudentStatus::Withdrawn => "퇴원",
            StudentStatus::Other(label) => label,
        }
    }
}

impl From<String> for StudentStatus {
    fn from(label: String) -> Self {
        StudentStatus::from_label(&label)
    }
}

impl From<StudentStatus> for String {
    fn from(status: StudentStatus) -> Self {
        status.label().to_string()
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a Korean weekday initial (일, 월, ...) to a chrono weekday
pub fn weekday_from_korean(initial: char) -> Option<Weekday> {
    match initial {
        '일' => Some(Weekday::Sun),
        '월' => Some(Weekday::Mon),
        '화' => Some(Weekday::Tue),
        '수' => Some(Weekday::Wed),
        '목' => Some(Weekday::Thu),
        '금' => Some(Weekday::Fri),
        '토' => Some(Weekday::Sat),
        _ => None,
    }
}

/// Korean weekday initial used in schedules and calendar headers
pub fn korean_weekday(weekday: Weekday) -> char {
    match weekday {
        Weekday::Sun => '일',
        Weekday::Mon => '월',
        Weekday::Tue => '화',
        Weekday::Wed => '수',
        Weekday::Thu => '목',
        Weekday::Fri => '금',
        Weekday::Sat => '토',
    }
}

/// One weekly class slot, e.g. "월16:00"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub weekday: Weekday,
    /// Free-form time label following the weekday initial
    pub time: String,
}

/// Weekly class schedule, kept alongside the raw sheet text it came from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ClassSchedule {
    raw: String,
    entries: Vec<ScheduleEntry>,
}

impl ClassSchedule {
    /// Parse "월16:00, 수 17:30" style text. Parts that do not start with a
    /// weekday initial are dropped from `entries` but kept in the raw text.
    pub fn parse(raw: &str) -> Self {
        let entries = raw
            .split(',')
            .map(str::trim)
            .filter_map(|part| {
                let mut chars = part.chars();
                let weekday = weekday_from_korean(chars.next()?)?;
                Some(ScheduleEntry {
                    weekday,
                    time: chars.as_str().trim().to_string(),
                })
            })
            .collect();

        Self {
            raw: raw.trim().to_string(),
            entries,
        }
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn as_text(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Time label of the first class on `weekday`, if any
    pub fn class_time_on(&self, weekday: Weekday) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.weekday == weekday)
            .map(|entry| entry.time.as_str())
    }
}

impl From<String> for ClassSchedule {
    fn from(raw: String) -> Self {
        ClassSchedule::parse(&raw)
    }
}

impl From<ClassSchedule> for String {
    fn from(schedule: ClassSchedule) -> Self {
        schedule.raw
    }
}

/// One enrolled student as held in the roster cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Card identifier, also the cache key
    pub id: String,
    pub name: String,
    pub last_attendance: Option<NaiveDate>,
    pub points: u64,
    pub status: StudentStatus,
    pub phone: String,
    pub birth_date: String,
    pub schedule: ClassSchedule,
    /// Row index in the backing sheet, echoed back on writes
    pub row: Option<u32>,
}

impl StudentRecord {
    /// Minimal record for a student we only know by card and name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            last_attendance: None,
            points: 0,
            status: StudentStatus::Enrolled,
            phone: String::new(),
            birth_date: String::new(),
            schedule: ClassSchedule::default(),
            row: None,
        }
    }

    pub fn checked_in_on(&self, date: NaiveDate) -> bool {
        self.last_attendance == Some(date)
    }
}

/// Wire form of a single quick map entry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickMapEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_date: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub point: u64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub birth: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub schedule: String,
    #[serde(default, deserialize_with = "lenient_row")]
    pub row: Option<u32>,
}

impl QuickMapEntry {
    pub fn into_record(self, id: impl Into<String>) -> StudentRecord {
        StudentRecord {
            id: id.into(),
            name: self.name.trim().to_string(),
            last_attendance: parse_sheet_date(&self.last_date),
            points: self.point,
            status: StudentStatus::from_label(&self.status),
            phone: self.phone,
            birth_date: self.birth,
            schedule: ClassSchedule::parse(&self.schedule),
            row: self.row,
        }
    }
}

/// Roster payload returned by `getQuickMap`, keyed by card id
pub type QuickMap = BTreeMap<String, QuickMapEntry>;

/// One hit of a remote `searchName` call when the backend answers with a list
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchHit {
    #[serde(alias = "ID", deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(flatten)]
    pub entry: QuickMapEntry,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchPayload {
    List(Vec<SearchHit>),
    Map(QuickMap),
}

/// Sheet cells come back as numbers, numeric strings, empty strings or null
pub fn value_to_u64(value: &Value) -> Option<u64> {
    let number = match value {
        Value::Number(n) => {
            if let Some(whole) = n.as_u64() {
                return Some(whole);
            }
            n.as_f64()?
        }
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if number.is_finite() && number >= 0.0 {
        Some(number.round() as u64)
    } else {
        None
    }
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_u64(&value).unwrap_or(0))
}

fn lenient_row<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_u64(&value).and_then(|row| u32::try_from(row).ok()))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Format a date the way the sheet stores it (yyyy-MM-dd)
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Trim a sheet date cell down to its yyyy-MM-dd part
pub fn normalize_date_key(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.get(..10) {
        Some(head) if trimmed.len() > 10 && matches!(trimmed.as_bytes()[10], b'T' | b' ') => {
            head.to_string()
        }
        _ => trimmed.to_string(),
    }
}

pub fn parse_sheet_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&normalize_date_key(raw), "%Y-%m-%d").ok()
}

/// Attendance status of a single day in a student's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceMark {
    /// 출석
    Present,
    /// 조퇴
    EarlyLeave,
    /// 결석
    Absent,
}

impl AttendanceMark {
    /// Higher wins when one day carries several events
    pub fn priority(self) -> u8 {
        match self {
            AttendanceMark::Present => 1,
            AttendanceMark::EarlyLeave => 2,
            AttendanceMark::Absent => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AttendanceMark::Present => "출석",
            AttendanceMark::EarlyLeave => "조퇴",
            AttendanceMark::Absent => "결석",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        match label {
            "출석" => return Some(AttendanceMark::Present),
            "조퇴" => return Some(AttendanceMark::EarlyLeave),
            "결석" => return Some(AttendanceMark::Absent),
            _ => {}
        }
        match label.to_ascii_lowercase().as_str() {
            "present" => Some(AttendanceMark::Present),
            "early" | "early_leave" | "earlyleave" => Some(AttendanceMark::EarlyLeave),
            "absent" => Some(AttendanceMark::Absent),
            _ => None,
        }
    }
}

/// History item as sent by the backend: a bare date means "present"
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum HistoryItem {
    Date(String),
    Entry {
        date: String,
        #[serde(default)]
        status: Option<String>,
    },
}

impl HistoryItem {
    /// Normalize into an entry; unknown statuses and empty dates are dropped
    pub fn into_entry(self) -> Option<HistoryEntry> {
        let (date, mark) = match self {
            HistoryItem::Date(date) => (date, AttendanceMark::Present),
            HistoryItem::Entry { date, status: None } => (date, AttendanceMark::Present),
            HistoryItem::Entry {
                date,
                status: Some(status),
            } => (date, AttendanceMark::parse(&status)?),
        };

        let date = normalize_date_key(&date);
        if date.is_empty() {
            return None;
        }
        Some(HistoryEntry { date, mark })
    }
}

/// One attendance event for a student on a given day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// yyyy-MM-dd, compared as an exact string
    pub date: String,
    pub mark: AttendanceMark,
}

/// Action envelope posted to the backend endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ApiRequest {
    GetQuickMap,
    Checkin {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        row: Option<u32>,
    },
    UpdatePoint {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        row: Option<u32>,
        amount: u64,
    },
    Add {
        fields: BTreeMap<String, String>,
    },
    UpdateId {
        #[serde(rename = "oldId")]
        old_id: String,
        #[serde(rename = "newId")]
        new_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        row: Option<u32>,
    },
    GetSchema,
    GetHistory {
        id: String,
        year: i32,
    },
    GetAttendanceHistory {
        id: String,
        year: i32,
    },
    SearchName {
        name: String,
    },
    VerifyPw {
        password: String,
    },
    InitSheet,
}

impl ApiRequest {
    /// The `action` discriminator sent on the wire
    pub fn action(&self) -> &'static str {
        match self {
            ApiRequest::GetQuickMap => "getQuickMap",
            ApiRequest::Checkin { .. } => "checkin",
            ApiRequest::UpdatePoint { .. } => "updatePoint",
            ApiRequest::Add { .. } => "add",
            ApiRequest::UpdateId { .. } => "updateId",
            ApiRequest::GetSchema => "getSchema",
            ApiRequest::GetHistory { .. } => "getHistory",
            ApiRequest::GetAttendanceHistory { .. } => "getAttendanceHistory",
            ApiRequest::SearchName { .. } => "searchName",
            ApiRequest::VerifyPw { .. } => "verifyPw",
            ApiRequest::InitSheet => "initSheet",
        }
    }
}

/// Why a call did not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never produced a readable reply; the write may or may not have landed
    Transport,
    /// The backend replied with `success: false`
    Rejected,
    /// No backend URL is configured; nothing was sent
    NotConfigured,
}

/// Response envelope returned by the backend: `{success, message?, data?, ...}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Action specific top-level fields (name, point, newTotal, headers, history, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    pub failure: Option<FailureKind>,
}

impl ApiResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            failure: Some(FailureKind::Rejected),
            ..Default::default()
        }
    }

    pub fn transport_failure() -> Self {
        Self {
            success: false,
            message: Some(CONNECTION_ERROR_MESSAGE.to_string()),
            failure: Some(FailureKind::Transport),
            ..Default::default()
        }
    }

    pub fn not_configured() -> Self {
        Self {
            success: false,
            message: Some(NOT_CONFIGURED_MESSAGE.to_string()),
            failure: Some(FailureKind::NotConfigured),
            ..Default::default()
        }
    }

    /// Builder used to attach top-level fields
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Mark a decoded `success: false` reply as a confirmed rejection
    pub fn classify(mut self) -> Self {
        if !self.success && self.failure.is_none() {
            self.failure = Some(FailureKind::Rejected);
        }
        self
    }

    pub fn is_rejected(&self) -> bool {
        self.failure == Some(FailureKind::Rejected)
    }

    pub fn is_transport_failure(&self) -> bool {
        self.failure == Some(FailureKind::Transport)
    }

    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    /// Look a field up at the top level first, then inside `data`
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra
            .get(key)
            .or_else(|| self.data.as_ref().and_then(|data| data.get(key)))
    }

    pub fn name(&self) -> Option<String> {
        match self.field("name")? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }

    pub fn point(&self) -> Option<u64> {
        self.field("point").and_then(value_to_u64)
    }

    pub fn new_total(&self) -> Option<u64> {
        self.field("newTotal").and_then(value_to_u64)
    }

    pub fn headers(&self) -> Option<Vec<String>> {
        let headers = self.field("headers")?.as_array()?;
        Some(
            headers
                .iter()
                .filter_map(|h| h.as_str())
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
                .collect(),
        )
    }

    /// History entries from `history` (or an array `data`)
    pub fn history(&self) -> Option<Vec<HistoryEntry>> {
        let raw = self
            .extra
            .get("history")
            .or_else(|| self.data.as_ref().filter(|d| d.is_array()))?;
        let items: Vec<HistoryItem> = serde_json::from_value(raw.clone()).ok()?;
        Some(items.into_iter().filter_map(HistoryItem::into_entry).collect())
    }

    pub fn quick_map(&self) -> Result<QuickMap, serde_json::Error> {
        match &self.data {
            Some(data) => serde_json::from_value(data.clone()),
            None => Ok(QuickMap::new()),
        }
    }

    /// Records from a `searchName` reply, which may be a list or a quick map
    pub fn search_hits(&self) -> Result<Vec<StudentRecord>, serde_json::Error> {
        let Some(data) = &self.data else {
            return Ok(Vec::new());
        };
        let records = match serde_json::from_value::<SearchPayload>(data.clone())? {
            SearchPayload::List(hits) => hits
                .into_iter()
                .map(|hit| hit.entry.into_record(hit.id))
                .collect(),
            SearchPayload::Map(map) => map
                .into_iter()
                .map(|(id, entry)| entry.into_record(id))
                .collect(),
        };
        Ok(records)
    }
}

/// Type of calendar day for explicit rendering logic
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CalendarDayType {
    /// Empty padding day before the start of the month
    PaddingBefore,
    /// Actual day within the month
    MonthDay,
}

/// A single cell of the attendance calendar
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarDay {
    /// Day of month, 0 for padding
    pub day: u32,
    pub mark: Option<AttendanceMark>,
    pub is_today: bool,
    pub day_type: CalendarDayType,
}

/// Represents a calendar month with its attendance marks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
    pub first_day_of_week: u32, // 0 = Sunday, 1 = Monday, etc.
}

impl CalendarMonth {
    pub fn month_days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.days
            .iter()
            .filter(|d| d.day_type == CalendarDayType::MonthDay)
    }

    pub fn count(&self, mark: AttendanceMark) -> usize {
        self.month_days().filter(|d| d.mark == Some(mark)).count()
    }
}
