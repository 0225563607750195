/// フォーム送信ボディのパーサー
///
/// JSONボディから期待フィールドを寛容に取り出す。
/// フィールドは文字列に強制変換し、欠落・nullは空文字列、
/// 前後の空白はトリムする。バリデーションは行わない
/// （それはEnquiryValidatorの責務）。
use serde_json::Value;

/// パース済みのフォーム送信内容
///
/// すべてトリム済みの文字列。`email`は小文字化済み。
/// `website`はハニーポットフィールドで、人間の送信者では常に空になる。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub message: String,
    /// ハニーポット（非空ならスパムとして黙って破棄する）
    pub website: String,
    pub page_url: String,
    pub user_agent: String,
    pub tz: String,
}

impl SubmissionForm {
    /// ハニーポットに値が入っているか
    pub fn is_honeypot_triggered(&self) -> bool {
        !self.website.is_empty()
    }
}

/// JSONボディをパースしてSubmissionFormに変換
///
/// ボディがJSONとして不正、またはオブジェクトでない場合も
/// エラーにはせず、全フィールド空のフォームを返す
/// （後段の必須フィールドチェックで400になる）。
pub fn parse_body(body: &str) -> SubmissionForm {
    let value: Value = serde_json::from_str(body).unwrap_or(Value::Null);

    SubmissionForm {
        first_name: clean(value.get("firstName")),
        last_name: clean(value.get("lastName")),
        email: clean(value.get("email")).to_lowercase(),
        message: clean(value.get("message")),
        website: clean(value.get("website")),
        page_url: clean(value.get("pageUrl")),
        user_agent: clean(value.get("userAgent")),
        tz: clean(value.get("tz")),
    }
}

/// フィールド値を文字列に強制変換してトリムする
///
/// - 文字列: トリムして返す
/// - 数値・真偽値: 文字列化して返す
/// - null・欠落・その他の型: 空文字列
fn clean(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// クライアントIPをベストエフォートで導出する
///
/// 優先順位:
/// 1. x-forwarded-forヘッダーのカンマ区切り先頭エントリ（非空の場合）
/// 2. トランスポート層のリモートアドレス（非空の場合）
/// 3. リテラル"unknown"
pub fn client_ip(forwarded_for: Option<&str>, remote_addr: Option<&str>) -> String {
    if let Some(xff) = forwarded_for {
        if let Some(first) = xff.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(addr) = remote_addr {
        let addr = addr.trim();
        if !addr.is_empty() {
            return addr.to_string();
        }
    }

    "unknown".to_string()
}
