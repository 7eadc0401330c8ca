use log::info;
use shared::ApiRequest;

use super::KioskController;
use crate::domain::{form_fields, validate_registration, ID_HEADER, NAME_HEADER};
use crate::error::{KioskError, KioskResult};
use crate::state::Screen;

impl KioskController {
    /// Fill one registration field by its header name
    pub fn set_register_field(&mut self, field: &str, value: &str) -> KioskResult<()> {
        let field = field.trim();
        let known = form_fields(&self.state.schema_headers)
            .iter()
            .any(|f| f == field)
            || field == ID_HEADER
            || field == NAME_HEADER;
        if !known {
            return Err(KioskError::UnknownField(field.to_string()));
        }

        self.state.register.set(field, value);
        Ok(())
    }

    /// Submit the registration form. Returns the new student's name.
    pub async fn register_student(&mut self) -> KioskResult<String> {
        if !self.state.admin {
            return Err(KioskError::AdminRequired);
        }

        let fields = validate_registration(
            &self.state.schema_headers,
            &self.state.register,
            &self.state.roster,
        )?;
        let name = fields.get(NAME_HEADER).cloned().unwrap_or_default();

        let response = self.api.call(ApiRequest::Add { fields }, true).await;
        if !response.success {
            return Err(self.fail(&response));
        }
        info!("📝 Registered {}", name);

        self.refresh().await?;
        self.switch_to(Screen::CheckIn);
        Ok(name)
    }
}
