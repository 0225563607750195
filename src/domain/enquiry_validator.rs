// 問い合わせフォーム入力のバリデーション
//
// 必須フィールド、本文長、メールアドレス形式の3種類のチェックを行う。
// エラーメッセージはそのままHTTP 400レスポンスのボディに使用されるため、
// 文言を変更する場合はフロントエンドの表示と合わせること。
use thiserror::Error;

/// 本文の最大文字数
pub const MAX_MESSAGE_LENGTH: usize = 5000;

/// フォーム入力のバリデーションエラー
///
/// 各バリアントはHTTP 400の個別メッセージに対応する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 必須フィールド（名・姓・メール・本文）のいずれかがトリム後に空
    #[error("Missing required fields.")]
    MissingFields,
    /// 本文が最大文字数を超過
    #[error("Message too long.")]
    MessageTooLong,
    /// メールアドレスが最小パターンに不適合
    #[error("Invalid email.")]
    InvalidEmail,
}

/// 問い合わせフォームのバリデータ
pub struct EnquiryValidator;

impl EnquiryValidator {
    /// トリム済みフィールド一式をバリデーションする
    ///
    /// チェック順序は固定:
    /// 1. 必須フィールドの非空チェック
    /// 2. 本文長チェック（5000文字まで許容、境界値含む）
    /// 3. メールアドレス形式チェック
    ///
    /// # 引数
    /// * `first_name` - 名（トリム済み）
    /// * `last_name` - 姓（トリム済み）
    /// * `email` - メールアドレス（トリム済み、小文字化済み）
    /// * `message` - 本文（トリム済み）
    ///
    /// # 戻り値
    /// * `Ok(())` - すべてのチェックを通過
    /// * `Err(ValidationError)` - 最初に失敗したチェックのエラー
    pub fn validate(
        first_name: &str,
        last_name: &str,
        email: &str,
        message: &str,
    ) -> Result<(), ValidationError> {
        if first_name.is_empty() || last_name.is_empty() || email.is_empty() || message.is_empty()
        {
            return Err(ValidationError::MissingFields);
        }

        if message.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(ValidationError::MessageTooLong);
        }

        if !Self::is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(())
    }

    /// メールアドレスの最小パターンチェック
    ///
    /// パターン: 空白・"@"以外の文字1個以上、"@"、空白・"@"以外の文字1個以上、
    /// "."、空白・"@"以外の文字1個以上。
    ///
    /// RFC準拠の完全な文法チェックは意図的に行わない。ドメイン部は
    /// 先頭・末尾以外の位置に"."を1個以上含めばよい（"a@b.co"は許容、
    /// "a@b"や"a@.b"は拒否）。
    pub fn is_valid_email(email: &str) -> bool {
        // 空白文字はどこにあっても不可
        if email.chars().any(char::is_whitespace) {
            return false;
        }

        // "@"はちょうど1個
        let mut parts = email.splitn(3, '@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return false;
        };

        if local.is_empty() || domain.is_empty() {
            return false;
        }

        // ドメイン部に先頭・末尾以外の"."が必要
        domain
            .bytes()
            .enumerate()
            .any(|(i, b)| b == b'.' && i > 0 && i + 1 < domain.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== 必須フィールドのテスト ====================

    /// すべてのフィールドが揃っていれば成功する
    #[test]
    fn test_validate_success() {
        let result = EnquiryValidator::validate("Taro", "Yamada", "taro@example.com", "Hello");
        assert_eq!(result, Ok(()));
    }

    /// いずれかのフィールドが空ならMissingFields
    #[test]
    fn test_validate_missing_fields() {
        let cases = [
            ("", "Yamada", "taro@example.com", "Hello"),
            ("Taro", "", "taro@example.com", "Hello"),
            ("Taro", "Yamada", "", "Hello"),
            ("Taro", "Yamada", "taro@example.com", ""),
        ];

        for (first, last, email, message) in cases {
            let result = EnquiryValidator::validate(first, last, email, message);
            assert_eq!(result, Err(ValidationError::MissingFields));
        }
    }

    /// 必須チェックは本文長・メール形式チェックより優先される
    #[test]
    fn test_missing_fields_takes_precedence() {
        // メールが不正かつ名が空の場合はMissingFieldsを返す
        let result = EnquiryValidator::validate("", "Yamada", "not-an-email", "Hello");
        assert_eq!(result, Err(ValidationError::MissingFields));
    }

    // ==================== 本文長のテスト ====================

    /// ちょうど5000文字は許容される（境界値含む）
    #[test]
    fn test_message_length_5000_accepted() {
        let message = "a".repeat(MAX_MESSAGE_LENGTH);
        let result = EnquiryValidator::validate("Taro", "Yamada", "taro@example.com", &message);
        assert_eq!(result, Ok(()));
    }

    /// 5001文字はMessageTooLong
    #[test]
    fn test_message_length_5001_rejected() {
        let message = "a".repeat(MAX_MESSAGE_LENGTH + 1);
        let result = EnquiryValidator::validate("Taro", "Yamada", "taro@example.com", &message);
        assert_eq!(result, Err(ValidationError::MessageTooLong));
    }

    /// 文字数はバイト数ではなく文字単位で数える
    #[test]
    fn test_message_length_counts_chars_not_bytes() {
        // マルチバイト文字5000個（バイト数では15000）
        let message = "あ".repeat(MAX_MESSAGE_LENGTH);
        let result = EnquiryValidator::validate("Taro", "Yamada", "taro@example.com", &message);
        assert_eq!(result, Ok(()));
    }

    // ==================== メールアドレス形式のテスト ====================

    /// 最小パターンに適合するアドレスは許容される
    #[test]
    fn test_valid_emails() {
        let valid = [
            "a@b.co",
            "taro@example.com",
            "user+tag@sub.example.co.jp",
            "a@b..c",
            "x@y.z.",
        ];
        for email in valid {
            assert!(
                EnquiryValidator::is_valid_email(email),
                "{email} should be valid"
            );
        }
    }

    /// "@"がない、ドメインに"."がない、空白を含むアドレスは拒否される
    #[test]
    fn test_invalid_emails() {
        let invalid = [
            "plainaddress",
            "a@b",
            "a@b.",
            "a@.b",
            "@b.co",
            "a@",
            "a b@c.de",
            "a@b c.de",
            "a@@b.co",
            "a@b@c.de",
        ];
        for email in invalid {
            assert!(
                !EnquiryValidator::is_valid_email(email),
                "{email} should be invalid"
            );
        }
    }

    /// 形式不正のアドレスはInvalidEmailを返す
    #[test]
    fn test_validate_invalid_email() {
        let result = EnquiryValidator::validate("Taro", "Yamada", "a@b", "Hello");
        assert_eq!(result, Err(ValidationError::InvalidEmail));
    }

    // ==================== エラーメッセージのテスト ====================

    /// 各エラーがHTTP 400用の固定文言を持つ
    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::MissingFields.to_string(),
            "Missing required fields."
        );
        assert_eq!(
            ValidationError::MessageTooLong.to_string(),
            "Message too long."
        );
        assert_eq!(ValidationError::InvalidEmail.to_string(), "Invalid email.");
    }
}
