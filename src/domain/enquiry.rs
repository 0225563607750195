// 問い合わせレコードのドメインモデル
//
// フォーム送信1件につき作成される唯一の永続化エンティティ。
// 本サービスはレコードを作成するのみで、更新・削除は行わない。

/// 新規作成時のステータス固定値
///
/// 作成後のトリアージは本サービスのスコープ外のため、
/// ここで書き込まれるステータスは常に"new"となる。
pub const STATUS_NEW: &str = "new";

/// 送信元メタデータ
///
/// クライアント申告値をトリム済みの不透明な文字列として保持する。
/// `origin`は保存目的では許可リストと照合しない（CORS判定とは独立）。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnquiryMeta {
    /// リクエストのOriginヘッダー値
    pub origin: String,
    /// ベストエフォートで導出したクライアントIP
    pub ip: String,
    /// 送信元ページURL
    pub page_url: String,
    /// User-Agent
    pub user_agent: String,
    /// クライアントのタイムゾーン
    pub tz: String,
}

/// 問い合わせレコード
///
/// バリデーション済みのフィールドのみを保持する。
/// ドキュメントIDと作成タイムスタンプは永続化時にストア側で割り当てるため、
/// このモデルには含まれない（クライアント申告の送信時刻を受け付けない）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enquiry {
    /// 名（トリム済み、非空）
    pub first_name: String,
    /// 姓（トリム済み、非空）
    pub last_name: String,
    /// メールアドレス（トリム済み、小文字化済み、最小パターン適合）
    pub email: String,
    /// 本文（トリム済み、非空、5000文字以内）
    pub message: String,
    /// 送信元メタデータ
    pub meta: EnquiryMeta,
}

impl Enquiry {
    /// 送信者のフルネームを取得
    ///
    /// 通知メールの件名とReply-To表示名に使用する。
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
