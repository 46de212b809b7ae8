use crate::auth::{AuthService, SessionController};
use crate::error::AppError;
use crate::storage::CredentialStore;
use async_trait::async_trait;
use secureauth_common::{AuthPhase, SessionState, UserRecord};

#[async_trait]
impl<S: CredentialStore> AuthService for SessionController<S> {
    fn initialize(&self) -> Result<AuthPhase, AppError> {
        SessionController::initialize(self)
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, AppError> {
        SessionController::register(self, name, email, password).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<UserRecord, AppError> {
        SessionController::login(self, email, password).await
    }

    fn logout(&self) {
        SessionController::logout(self)
    }

    fn session(&self) -> SessionState {
        self.state()
    }

    fn last_error(&self) -> Option<String> {
        SessionController::last_error(self)
    }
}
