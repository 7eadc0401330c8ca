use std::collections::BTreeMap;

/// Values typed (or scanned) into the registration form, keyed by sheet header
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RegisterDraft {
    fields: BTreeMap<String, String>,
}

impl RegisterDraft {
    pub fn set(&mut self, field: &str, value: &str) {
        self.fields
            .insert(field.trim().to_string(), value.trim().to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

/// Card replacement in progress: whose card, and the newly scanned one
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CardSwapDraft {
    pub target: Option<String>,
    pub replacement: Option<String>,
}

impl CardSwapDraft {
    pub fn select_target(&mut self, id: &str) {
        self.target = Some(id.to_string());
        self.replacement = None;
    }

    pub fn set_replacement(&mut self, id: &str) {
        self.replacement = Some(id.to_string());
    }

    pub fn clear(&mut self) {
        self.target = None;
        self.replacement = None;
    }
}
