use anyhow::ensure;
use clap::Subcommand;
use portfolio_config::Config;
use portfolio_form::{ContactForm, ContactFormConfig, FormStatus, RestContactService};
use portfolio_models::contact::ContactField;
use url::Url;

#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    /// Submit a message through the contact form of a running server
    Send {
        /// Base url of the server
        #[arg(long, default_value = "http://127.0.0.1:8000/")]
        url: Url,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        message: String,
    },
}

impl ContactCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            ContactCommand::Send {
                url,
                name,
                email,
                subject,
                message,
            } => {
                let form = ContactForm::new(
                    RestContactService::new(&url)?,
                    ContactFormConfig {
                        error_display: *config.form.error_display,
                    },
                );
                form.set_field(ContactField::Name, name);
                form.set_field(ContactField::Email, email);
                form.set_field(ContactField::Subject, subject);
                form.set_field(ContactField::Message, message);

                form.submit().await;

                let status = form.status();
                if let Some(message) = status.message() {
                    println!("{message}");
                }
                ensure!(
                    matches!(status, FormStatus::Sent { .. }),
                    "Contact form submission failed"
                );
                Ok(())
            }
        }
    }
}
