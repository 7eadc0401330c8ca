use log::{info, warn};
use shared::ApiRequest;

use super::KioskController;
use crate::error::{KioskError, KioskResult};
use crate::state::Screen;

impl KioskController {
    /// Enter admin mode once the backend accepts the password
    pub async fn enable_admin(&mut self, password: &str) -> KioskResult<()> {
        let request = ApiRequest::VerifyPw {
            password: password.trim().to_string(),
        };
        let response = self.api.call(request, true).await;

        if !response.success {
            let error = self.fail(&response);
            return Err(if response.is_rejected() {
                KioskError::WrongPassword
            } else {
                error
            });
        }

        self.state.admin = true;
        self.settings.admin_mode = true;
        self.persist_settings();
        info!("🔑 Admin mode enabled");
        Ok(())
    }

    /// Leave admin mode and return to check-in
    pub fn disable_admin(&mut self) {
        self.state.admin = false;
        self.settings.admin_mode = false;
        self.persist_settings();
        self.switch_to(Screen::CheckIn);
        info!("🔒 Admin mode disabled");
    }

    /// Store a new backend URL and check it by loading the sheet headers
    pub async fn save_backend_url(&mut self, url: &str) -> KioskResult<usize> {
        if !self.can_show(Screen::Settings) {
            warn!("🔒 Backend URL change refused outside admin mode");
            return Err(KioskError::AdminRequired);
        }
        let url = url.trim();
        if url.is_empty() {
            return Err(KioskError::EmptyUrl);
        }

        self.settings.backend_url = Some(url.to_string());
        self.persist_settings();
        self.api.set_endpoint(Some(url.to_string()));
        self.state.schema_headers.clear();

        let response = self.api.call(ApiRequest::GetSchema, true).await;
        let Some(headers) = response.headers().filter(|_| response.success) else {
            warn!("Backend URL check failed: {}", response.message_or("no headers"));
            return Err(KioskError::UrlCheckFailed);
        };

        info!("🔗 Connected to {}", url);
        self.state.schema_headers = headers;
        let count = self.refresh().await?;
        self.switch_to(Screen::CheckIn);
        Ok(count)
    }

    /// Create the sheet structure on the backend, then reload everything
    pub async fn init_sheet(&mut self) -> KioskResult<usize> {
        if !self.state.admin {
            return Err(KioskError::AdminRequired);
        }

        let response = self.api.call(ApiRequest::InitSheet, true).await;
        if !response.success {
            return Err(self.fail(&response));
        }
        info!("🧾 Sheet initialized");

        self.state.schema_headers.clear();
        self.ensure_schema().await?;
        self.refresh().await
    }
}
