use async_trait::async_trait;
use latchkey_core::{AccountProfile, EmailClient, NotificationError, Notifier, ResetCode};

use crate::config::constants::email::{
    FORGOT_PASSWORD_SUBJECT, PASSWORD_CHANGED_SUBJECT, SIGNUP_SUCCESSFUL_SUBJECT,
};

/// Renders welcome, reset and password-change messages and hands them to an
/// [`EmailClient`].
#[derive(Debug, Clone)]
pub struct EmailNotifier<E> {
    client: E,
}

impl<E> EmailNotifier<E> {
    pub fn new(client: E) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &E {
        &self.client
    }
}

fn greeting(account: &AccountProfile) -> String {
    let name = format!("{} {}", account.first_name, account.last_name);
    match name.trim() {
        "" => "Hello,".to_owned(),
        name => format!("Hello {name},"),
    }
}

#[async_trait]
impl<E> Notifier for EmailNotifier<E>
where
    E: EmailClient,
{
    #[tracing::instrument(name = "Sending welcome email", skip_all, fields(account_id = %account.id))]
    async fn send_signup_successful(
        &self,
        account: &AccountProfile,
    ) -> Result<(), NotificationError> {
        let content = format!(
            "{}\n\nYour account is ready. Sign in with {} and the password you chose.",
            greeting(account),
            account.email
        );

        self.client
            .send_email(&account.email, SIGNUP_SUCCESSFUL_SUBJECT, &content)
            .await
            .map_err(NotificationError::DeliveryFailed)
    }

    #[tracing::instrument(name = "Sending forgot password code", skip_all, fields(account_id = %account.id))]
    async fn send_forgot_password_code(
        &self,
        account: &AccountProfile,
        code: &ResetCode,
    ) -> Result<(), NotificationError> {
        let content = format!(
            "{}\n\nUse the following code to reset your password:\n\n{}\n\n\
             If you did not ask for a password reset you can ignore this message.",
            greeting(account),
            code.expose()
        );

        self.client
            .send_email(&account.email, FORGOT_PASSWORD_SUBJECT, &content)
            .await
            .map_err(NotificationError::DeliveryFailed)
    }

    #[tracing::instrument(name = "Sending password changed notice", skip_all, fields(account_id = %account.id))]
    async fn send_password_changed(
        &self,
        account: &AccountProfile,
    ) -> Result<(), NotificationError> {
        let content = format!(
            "{}\n\nThe password of your account was just changed. \
             If this was not you, reset your password immediately.",
            greeting(account)
        );

        self.client
            .send_email(&account.email, PASSWORD_CHANGED_SUBJECT, &content)
            .await
            .map_err(NotificationError::DeliveryFailed)
    }
}
