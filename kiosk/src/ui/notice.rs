//! Short messages shown after an action, with the point balance when one
//! is relevant.

use crate::domain::{CardSwapPlan, CheckinOutcome, PointOutcome};
use crate::error::KioskError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Info,
    Warning,
    Error,
}

impl Tone {
    pub fn icon(self) -> &'static str {
        match self {
            Tone::Success => "✅",
            Tone::Info => "ℹ️",
            Tone::Warning => "⚠️",
            Tone::Error => "❌",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub tone: Tone,
    pub title: String,
    pub message: String,
    pub points: Option<u64>,
}

impl Notice {
    pub fn new(tone: Tone, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tone,
            title: title.into(),
            message: message.into(),
            points: None,
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Tone::Success, title, message)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Tone::Info, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Tone::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Tone::Error, title, message)
    }

    pub fn with_points(mut self, points: u64) -> Self {
        self.points = Some(points);
        self
    }

    /// Background write that did not land
    /// Reader input arriving while a blocking call is in flight
    pub fn busy() -> Self {
        Self::warning(
            "처리 중",
            "이전 요청을 처리하고 있습니다. 잠시 후 다시 태그하세요.",
        )
    }

    pub fn save_failed(name: &str, detail: &str) -> Self {
        Self::warning(name, format!("⚠️ 서버 저장 실패 ({})", detail))
    }
}

impl From<&KioskError> for Notice {
    fn from(error: &KioskError) -> Self {
        let title = match error {
            KioskError::Backend(_) | KioskError::UrlCheckFailed => "서버 오류",
            KioskError::NotConfigured => "설정 필요",
            _ => "확인 필요",
        };
        Notice::error(title, error.to_string())
    }
}

impl From<&CheckinOutcome> for Notice {
    fn from(outcome: &CheckinOutcome) -> Self {
        match outcome {
            CheckinOutcome::AlreadyCheckedIn { name, points } => {
                Notice::info(name.as_str(), "이미 오늘 출석했습니다.").with_points(*points)
            }
            CheckinOutcome::CheckedIn { name, points } => {
                Notice::success(name.as_str(), "출석 성공! ✅").with_points(*points)
            }
            CheckinOutcome::NewCheckIn { name, points } => {
                Notice::success(name.as_str(), "신규 출석 성공! ✅").with_points(*points)
            }
            CheckinOutcome::Unregistered { id, message } => Notice::error(
                "미등록",
                message
                    .clone()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| format!("등록되지 않은 카드입니다. ({})", id)),
            ),
        }
    }
}

impl From<&PointOutcome> for Notice {
    fn from(outcome: &PointOutcome) -> Self {
        Notice::success(
            outcome.name.as_str(),
            format!("+{} 포인트 지급", outcome.amount),
        )
        .with_points(outcome.points)
    }
}

impl From<&CardSwapPlan> for Notice {
    fn from(plan: &CardSwapPlan) -> Self {
        Notice::success(
            plan.name.as_str(),
            format!("교체 완료 ({} → {})", plan.old_id, plan.new_id),
        )
    }
}
