use std::sync::Arc;

use crate::database::models::ContactForm;
use crate::mail::{MailMessage, Mailer};
use crate::services::ServiceResult;

pub struct ContactService {
    mailer: Arc<dyn Mailer>,
    admin_email: String,
}

impl ContactService {
    pub fn new(mailer: Arc<dyn Mailer>, admin_email: impl Into<String>) -> Self {
        Self {
            mailer,
            admin_email: admin_email.into(),
        }
    }

    /// Forwards a contact form to the site administrator.
    pub async fn submit(&self, form: ContactForm) -> ServiceResult<()> {
        form.validate()?;
        let message = compose(&form, &self.admin_email);
        self.mailer.send(&message).await?;
        tracing::info!(from = %form.email.trim(), "contact form forwarded");
        Ok(())
    }
}

fn compose(form: &ContactForm, admin_email: &str) -> MailMessage {
    let name = form.name.trim();
    let email = form.email.trim();
    MailMessage {
        to: vec![admin_email.to_string()],
        reply_to: Some(email.to_string()),
        subject: format!("[Contact] {}", form.subject.trim()),
        text_body: format!(
            "New contact form submission\n\nName: {}\nEmail: {}\nSubject: {}\n\n{}\n",
            name,
            email,
            form.subject.trim(),
            form.message.trim()
        ),
    }
}
