// Infrastructure layer modules
pub mod config;
pub mod enquiry_repository;
pub mod logging;
pub mod maileroo;

// Re-exports
pub use config::{DynamoDbConfig, DynamoDbConfigError};
pub use enquiry_repository::{DynamoEnquiryRepository, EnquiryRepository, EnquiryRepositoryError};
pub use logging::init_logging;
pub use maileroo::{
    EnquiryNotifier, MailerooConfig, MailerooConfigError, MailerooNotifier, NotifierError,
};
