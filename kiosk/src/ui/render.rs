use shared::{AttendanceMark, CalendarDayType, StudentRecord};

use super::notice::Notice;
use super::Update;
use crate::domain::{CalendarView, ScheduleBoard};
use crate::services::date_utils::format_date_for_display;
use crate::state::Screen;

const WEEKDAY_HEADER: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];

pub const HELP_TEXT: &str = "\
카드를 태그하거나 아래 명령을 입력하세요.
  /page <checkin|search|point|card|register|schedule|settings>
  /search <이름 또는 ID>     /remote <이름>
  /calendar <ID>  /prev  /next
  /checkin <ID>              /award [ID] <포인트>   /preset <번호>
  /focus <필드|point>        /set <필드> <값>
  /submit (등록)             /confirm (카드 교체)
  /admin <비밀번호>          /admin off
  /url <주소>                /initsheet
  /refresh  /status  /help  /quit";

/// Thousands-separated point balance, e.g. "1,250 pt"
pub fn format_points(points: u64) -> String {
    let digits = points.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{} pt", grouped)
}

pub fn render_notice(notice: &Notice) -> String {
    let mut line = format!("{} {} · {}", notice.tone.icon(), notice.title, notice.message);
    if let Some(points) = notice.points {
        line.push_str(&format!(" [{}]", format_points(points)));
    }
    line
}

pub fn render_student(student: &StudentRecord) -> String {
    let mut line = format!(
        "{} ({}) · {} · 마지막 출석 {} · {}",
        student.name,
        student.id,
        format_points(student.points),
        format_date_for_display(student.last_attendance),
        student.status
    );
    if !student.schedule.as_text().is_empty() {
        line.push_str(&format!(" · {}", student.schedule.as_text()));
    }
    line
}

pub fn render_students(students: &[StudentRecord]) -> String {
    if students.is_empty() {
        return "결과가 없습니다.".to_string();
    }
    students
        .iter()
        .map(render_student)
        .collect::<Vec<_>>()
        .join("\n")
}

fn mark_symbol(mark: Option<AttendanceMark>) -> &'static str {
    match mark {
        Some(AttendanceMark::Present) => "○",
        Some(AttendanceMark::EarlyLeave) => "△",
        Some(AttendanceMark::Absent) => "×",
        None => " ",
    }
}

pub fn render_calendar(view: &CalendarView) -> String {
    let mut lines = vec![
        format!("📅 {} · {}", view.student_name, view.label),
        WEEKDAY_HEADER
            .iter()
            .map(|d| format!("{:^5}", d))
            .collect::<String>()
            .trim_end()
            .to_string(),
    ];

    let cells: Vec<String> = view
        .month
        .days
        .iter()
        .map(|day| match day.day_type {
            CalendarDayType::PaddingBefore => "     ".to_string(),
            CalendarDayType::MonthDay => {
                let (open, close) = if day.is_today { ('[', ']') } else { (' ', ' ') };
                format!("{}{:>2}{}{}", open, day.day, mark_symbol(day.mark), close)
            }
        })
        .collect();

    for week in cells.chunks(7) {
        lines.push(week.concat().trim_end().to_string());
    }

    lines.push(format!(
        "출석 {} · 조퇴 {} · 결석 {}",
        view.month.count(AttendanceMark::Present),
        view.month.count(AttendanceMark::EarlyLeave),
        view.month.count(AttendanceMark::Absent)
    ));
    lines.join("\n")
}

pub fn render_schedule(board: &ScheduleBoard) -> String {
    let mut lines = vec![format!(
        "🗓️ {} ({}) · 전체 {} · 출석 {} · 미출석 {}",
        shared::date_key(board.date),
        board.weekday,
        board.total(),
        board.present(),
        board.absent()
    )];

    if board.slots.is_empty() {
        lines.push("오늘 예정된 수업이 없습니다.".to_string());
        return lines.join("\n");
    }

    for (time, entries) in &board.slots {
        lines.push(format!("[{}]", time));
        for entry in entries {
            let mark = if entry.checked_in { "✅" } else { "⬜" };
            lines.push(format!("  {} {}", mark, entry.name));
        }
    }
    lines.join("\n")
}

pub fn render_register_form(fields: &[(String, String)]) -> String {
    fields
        .iter()
        .map(|(field, value)| {
            let shown = if value.is_empty() { "-" } else { value.as_str() };
            format!("  {}: {}", field, shown)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct StatusLine<'a> {
    pub screen: Screen,
    pub admin: bool,
    pub indicator: &'a str,
    pub students: usize,
    pub pending_tasks: usize,
    pub backend: Option<&'a str>,
}

pub fn render_status_bar(status: &StatusLine<'_>) -> String {
    format!(
        "[{}] {} · 학생 {}명 · 작업 {} · {} · {}",
        status.screen.title(),
        status.indicator,
        status.students,
        status.pending_tasks,
        if status.admin { "관리자" } else { "일반" },
        status.backend.unwrap_or("URL 미설정")
    )
}

pub fn render_update(update: &Update) -> String {
    match update {
        Update::Notice(notice) => render_notice(notice),
        Update::Results(students) => render_students(students),
        Update::Calendar(view) => render_calendar(view),
        Update::CalendarLoading {
            student_name,
            label,
        } => format!("📅 {} · {} 불러오는 중...", student_name, label),
        Update::Schedule(board) => render_schedule(board),
        Update::Screen(screen) => format!("── {} ──", screen.title()),
        Update::RegisterForm(fields) => render_register_form(fields),
    }
}
