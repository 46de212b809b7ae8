use async_trait::async_trait;
use secureauth_common::{AuthMode, AuthPhase, SessionState, UserRecord};

use crate::error::AppError;

/// Fields collected by the login/register form
#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    fn initialize(&self) -> Result<AuthPhase, AppError>;
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, AppError>;
    async fn login(&self, email: &str, password: &str) -> Result<UserRecord, AppError>;
    fn logout(&self);
    fn session(&self) -> SessionState;
    fn last_error(&self) -> Option<String>;

    /// Route a form submission to login or register
    async fn submit(&self, mode: AuthMode, form: &AuthForm) -> Result<UserRecord, AppError> {
        match mode {
            AuthMode::Login => self.login(&form.email, &form.password).await,
            AuthMode::Register => self.register(&form.name, &form.email, &form.password).await,
        }
    }
}
