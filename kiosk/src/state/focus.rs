/// A visible input a staff member is typing into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldFocus {
    /// One of the registration form fields, by sheet header
    RegisterField(String),
    /// Manual point amount for the given student
    PointAmount(String),
}

/// Decides whether an input line belongs to the card reader or to a focused field.
///
/// The reader owns input by default. Focusing a field hands the next line to
/// that field; once it is filled the reader takes over again.
#[derive(Debug, Default)]
pub struct FocusGuard {
    focused: Option<FieldFocus>,
}

impl FocusGuard {
    pub fn focus(&mut self, field: FieldFocus) {
        self.focused = Some(field);
    }

    /// Hand input back to the reader, returning the field that had focus
    pub fn release(&mut self) -> Option<FieldFocus> {
        self.focused.take()
    }

    pub fn focused(&self) -> Option<&FieldFocus> {
        self.focused.as_ref()
    }

    pub fn is_typing(&self) -> bool {
        self.focused.is_some()
    }

    pub fn indicator(&self, loading: bool) -> &'static str {
        if self.is_typing() {
            "⌨️ 입력 중"
        } else if loading {
            "⏳ 처리 중"
        } else {
            "📡 리더기 대기"
        }
    }
}
