// Domain layer modules
pub mod cors_policy;
pub mod enquiry;
pub mod enquiry_validator;

// Re-exports
pub use cors_policy::{ALLOWED_ORIGINS, is_allowed_origin};
pub use enquiry::{Enquiry, EnquiryMeta, STATUS_NEW};
pub use enquiry_validator::{EnquiryValidator, ValidationError};
