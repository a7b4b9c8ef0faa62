pub mod import;
pub mod mailer;
