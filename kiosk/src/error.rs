use shared::{ApiResponse, FailureKind, CONNECTION_ERROR_MESSAGE};
use thiserror::Error;

/// Input problems caught locally, before anything is sent to the backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KioskError {
    #[error("카드 ID가 비어 있습니다.")]
    EmptyId,

    #[error("포인트를 숫자로 입력하세요: '{0}'")]
    InvalidAmount(String),

    #[error("등록되지 않은 카드입니다: {0}")]
    UnknownStudent(String),

    #[error("관리자 모드에서만 사용할 수 있습니다.")]
    AdminRequired,

    #[error("{0}은(는) 필수입니다.")]
    MissingField(String),

    #[error("이미 다른 학생이 사용 중인 카드입니다: {0}")]
    CardInUse(String),

    #[error("카드를 교체할 학생을 먼저 선택하세요.")]
    NoCardTarget,

    #[error("새 카드를 태그하세요.")]
    NoReplacementCard,

    #[error("학생 카드를 먼저 태그하세요.")]
    NoStudentSelected,

    #[error("입력할 수 없는 항목입니다: {0}")]
    UnknownField(String),

    #[error("백엔드 URL을 입력하세요.")]
    EmptyUrl,

    #[error("백엔드 URL이 설정되지 않았습니다.")]
    NotConfigured,

    #[error("URL을 확인해주세요.")]
    UrlCheckFailed,

    #[error("비밀번호가 올바르지 않습니다.")]
    WrongPassword,

    /// Business failure or transport problem reported for a blocking call
    #[error("{0}")]
    Backend(String),
}

impl KioskError {
    /// Error for a blocking call that did not succeed
    pub fn from_response(response: &ApiResponse) -> Self {
        match response.failure {
            Some(FailureKind::NotConfigured) => KioskError::NotConfigured,
            _ => KioskError::Backend(response.message_or(CONNECTION_ERROR_MESSAGE)),
        }
    }
}

pub type KioskResult<T> = Result<T, KioskError>;
