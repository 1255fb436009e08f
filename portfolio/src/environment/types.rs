use portfolio_core_contact_impl::ContactServiceImpl;
use portfolio_core_health_impl::HealthServiceImpl;
use portfolio_email_impl::EmailServiceImpl;
use portfolio_templates_impl::TemplateServiceImpl;

pub type Email = EmailServiceImpl;
pub type Template = TemplateServiceImpl;

pub type Contact = ContactServiceImpl<Email, Template>;
pub type Health = HealthServiceImpl<Email>;

pub type RestServer = portfolio_api_rest::RestServer<Health, Contact>;
