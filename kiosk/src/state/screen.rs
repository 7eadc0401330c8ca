use std::fmt;

/// Screens the kiosk can show; exactly one is visible at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    CheckIn,
    Search,
    Point,
    Card,
    Register,
    Schedule,
    Settings,
}

impl Screen {
    pub const ALL: [Screen; 7] = [
        Screen::CheckIn,
        Screen::Search,
        Screen::Point,
        Screen::Card,
        Screen::Register,
        Screen::Schedule,
        Screen::Settings,
    ];

    /// Staff-only screens. Settings is still reachable while no backend is configured.
    pub fn requires_admin(self) -> bool {
        matches!(
            self,
            Screen::Point | Screen::Card | Screen::Register | Screen::Settings
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Screen::CheckIn => "checkin",
            Screen::Search => "search",
            Screen::Point => "point",
            Screen::Card => "card",
            Screen::Register => "register",
            Screen::Schedule => "schedule",
            Screen::Settings => "settings",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Screen::CheckIn => "출석 체크",
            Screen::Search => "학생 조회",
            Screen::Point => "포인트 지급",
            Screen::Card => "카드 교체",
            Screen::Register => "신규 등록",
            Screen::Schedule => "오늘 수업 현황",
            Screen::Settings => "설정",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "checkin" | "check-in" => Some(Screen::CheckIn),
            "search" => Some(Screen::Search),
            "point" | "points" => Some(Screen::Point),
            "card" => Some(Screen::Card),
            "register" | "add" => Some(Screen::Register),
            "schedule" => Some(Screen::Schedule),
            "settings" => Some(Screen::Settings),
            _ => None,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
