// アプリケーション層モジュール
pub mod submission_parser;
pub mod submit_handler;

// 再エクスポート
pub use submission_parser::{SubmissionForm, client_ip, parse_body};
pub use submit_handler::SubmitEnquiryHandler;
