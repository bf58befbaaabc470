use serde::Deserialize;

use crate::services::ServiceResult;
use crate::validation::Violations;

#[derive(Debug, Clone, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> ServiceResult<()> {
        let mut v = Violations::new();
        v.text("name", &self.name, 1, 100);
        v.email("email", self.email.trim());
        v.text("subject", &self.subject, 1, 255);
        v.text("message", &self.message, 10, 10_000);
        v.finish()
    }
}
