// Maileroo通知メール送信
//
// 永続化成功後にスタッフ宛ての通知メールを1通送信する。
// 送信はベストエフォートであり、失敗してもリクエストの成否には影響しない
// （呼び出し側がログに記録して握りつぶす）。
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::Enquiry;

/// MailerooメールAPIのデフォルトエンドポイント
const DEFAULT_ENDPOINT: &str = "https://smtp.maileroo.com/api/v2/emails";

/// 送信元メールアドレス（サービス固定のアイデンティティ）
const SENDER_ADDRESS: &str = "anita@realcalm.com.au";

/// 送信元表示名
const SENDER_NAME: &str = "Real Calm Website";

/// 通知先スタッフメールアドレス
const RECIPIENT_ADDRESS: &str = "anita@realcalm.com.au";

/// 通知先表示名
const RECIPIENT_NAME: &str = "Anita Hamersley";

/// メールプロバイダー分析用のタグ: 送信元システム
const TAG_SOURCE: &str = "realcalm-website";

/// メールプロバイダー分析用のタグ: メッセージ種別
const TAG_TYPE: &str = "contact-enquiry";

/// Maileroo設定エラー
#[derive(Debug, Error)]
pub enum MailerooConfigError {
    /// 必須の環境変数が設定されていない
    #[error("必須の環境変数が設定されていません: {0}")]
    MissingEnvVar(String),

    /// SSM Parameter Storeからの取得に失敗
    #[error("SSMパラメータ取得エラー: {0}")]
    SsmError(String),

    /// SSMパラメータに値が存在しない
    #[error("SSMパラメータに値がありません: {0}")]
    EmptyParameter(String),
}

/// Maileroo接続設定
///
/// # フィールド
/// - `endpoint`: メールAPIのエンドポイントURL（テストで差し替え可能）
/// - `api_key`: 送信キー（X-Api-Keyヘッダーに使用、ログには出力しない）
#[derive(Clone)]
pub struct MailerooConfig {
    endpoint: String,
    api_key: String,
}

impl std::fmt::Debug for MailerooConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailerooConfig")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl MailerooConfig {
    /// 新しい設定を作成
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// 環境変数から設定を読み込み（ローカル実行・テスト用）
    ///
    /// # 環境変数
    /// - `MAILEROO_SENDING_KEY`: 送信キー（必須）
    /// - `MAILEROO_ENDPOINT`: エンドポイントURL（任意、省略時はデフォルト）
    pub fn from_env() -> Result<Self, MailerooConfigError> {
        let api_key = std::env::var("MAILEROO_SENDING_KEY").map_err(|_| {
            MailerooConfigError::MissingEnvVar("MAILEROO_SENDING_KEY".to_string())
        })?;

        let endpoint =
            std::env::var("MAILEROO_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        Ok(Self { endpoint, api_key })
    }

    /// SSM Parameter Storeから送信キーを取得して設定を読み込み（Lambda環境用）
    ///
    /// キーはSecureStringパラメータとして保管されており、
    /// 復号付きで取得する。コールドスタート時に1回だけ呼ばれる。
    ///
    /// # 環境変数
    /// - `MAILEROO_SENDING_KEY_PARAM`: SSMパラメータ名（必須）
    /// - `MAILEROO_ENDPOINT`: エンドポイントURL（任意、省略時はデフォルト）
    pub async fn from_env_with_ssm() -> Result<Self, MailerooConfigError> {
        let param_name = std::env::var("MAILEROO_SENDING_KEY_PARAM").map_err(|_| {
            MailerooConfigError::MissingEnvVar("MAILEROO_SENDING_KEY_PARAM".to_string())
        })?;

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let ssm_client = aws_sdk_ssm::Client::new(&aws_config);

        let response = ssm_client
            .get_parameter()
            .name(&param_name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| MailerooConfigError::SsmError(e.to_string()))?;

        let api_key = response
            .parameter()
            .and_then(|p| p.value())
            .ok_or_else(|| MailerooConfigError::EmptyParameter(param_name.clone()))?
            .to_string();

        info!(parameter = %param_name, "Maileroo送信キーをSSMから取得");

        let endpoint =
            std::env::var("MAILEROO_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        Ok(Self { endpoint, api_key })
    }

    /// エンドポイントURLを取得
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 送信キーを取得
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

/// 通知送信のエラー型
#[derive(Debug, Error)]
pub enum NotifierError {
    /// HTTPリクエスト自体が失敗（接続エラー等）
    #[error("通知リクエストエラー: {0}")]
    RequestError(String),

    /// プロバイダーが失敗を報告（非成功ステータスまたはsuccess=false）
    #[error("通知送信失敗: status={status}, message={message}")]
    SendFailed { status: u16, message: String },
}

/// 通知送信用トレイト
///
/// 異なる実装を可能にします（実際のMaileroo API、テスト用モック）。
#[async_trait]
pub trait EnquiryNotifier: Send + Sync {
    /// 問い合わせの通知メールを1通送信する
    ///
    /// # 引数
    /// * `enquiry` - 永続化済みの問い合わせ
    /// * `enquiry_id` - 永続化で生成されたドキュメントID（本文に記載）
    async fn notify(&self, enquiry: &Enquiry, enquiry_id: &str) -> Result<(), NotifierError>;
}

/// メール送信先・送信元
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailParty {
    pub address: String,
    pub display_name: String,
}

/// メールプロバイダー分析用タグ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailTags {
    pub source: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Maileroo送信APIのリクエストペイロード
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailPayload {
    pub from: EmailParty,
    pub to: Vec<EmailParty>,
    pub reply_to: EmailParty,
    pub subject: String,
    pub plain: String,
    pub tags: EmailTags,
}

/// Maileroo送信APIのレスポンス
///
/// 失敗判定に使用する最小限のフィールドのみ読み取る。
#[derive(Debug, Default, Deserialize)]
struct MailerooResponse {
    success: Option<bool>,
    message: Option<String>,
}

/// Maileroo APIを使用した通知実装
#[derive(Clone)]
pub struct MailerooNotifier {
    /// HTTPクライアント
    client: Client,
    /// 設定
    config: MailerooConfig,
}

impl std::fmt::Debug for MailerooNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailerooNotifier")
            .field("endpoint", &self.config.endpoint())
            .finish_non_exhaustive()
    }
}

impl MailerooNotifier {
    /// 設定からMailerooNotifierを作成
    pub fn new(config: MailerooConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("HTTPクライアントの構築に失敗");

        Self { client, config }
    }

    /// 通知メールのペイロードを構築する
    ///
    /// - 送信元: サービス固定のアイデンティティ
    /// - 宛先: スタッフメールボックス固定
    /// - Reply-To: 送信者本人（スタッフが直接返信できるように）
    /// - 件名: 送信者のフルネームを含む
    /// - 本文: 全フィールドのプレーンテキスト + ページURL + ドキュメントID
    pub fn build_payload(enquiry: &Enquiry, enquiry_id: &str) -> EmailPayload {
        let plain = format!(
            "New contact form enquiry\n\n\
             Name: {full_name}\n\
             Email: {email}\n\n\
             Message:\n{message}\n\n\
             Submitted from: {page_url}\n\
             Enquiry ID: {enquiry_id}\n",
            full_name = enquiry.full_name(),
            email = enquiry.email,
            message = enquiry.message,
            page_url = enquiry.meta.page_url,
        );

        EmailPayload {
            from: EmailParty {
                address: SENDER_ADDRESS.to_string(),
                display_name: SENDER_NAME.to_string(),
            },
            to: vec![EmailParty {
                address: RECIPIENT_ADDRESS.to_string(),
                display_name: RECIPIENT_NAME.to_string(),
            }],
            reply_to: EmailParty {
                address: enquiry.email.clone(),
                display_name: enquiry.full_name(),
            },
            subject: format!("New website enquiry: {}", enquiry.full_name()),
            plain,
            tags: EmailTags {
                source: TAG_SOURCE.to_string(),
                kind: TAG_TYPE.to_string(),
            },
        }
    }
}

#[async_trait]
impl EnquiryNotifier for MailerooNotifier {
    async fn notify(&self, enquiry: &Enquiry, enquiry_id: &str) -> Result<(), NotifierError> {
        let payload = Self::build_payload(enquiry, enquiry_id);

        debug!(
            endpoint = %self.config.endpoint(),
            enquiry_id = %enquiry_id,
            "通知メールを送信"
        );

        let response = self
            .client
            .post(self.config.endpoint())
            .header("X-Api-Key", self.config.api_key())
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifierError::RequestError(e.to_string()))?;

        let status = response.status();

        // ボディがJSONでない場合も失敗判定は継続する
        let body: MailerooResponse = response.json().await.unwrap_or_default();

        if !status.is_success() || body.success == Some(false) {
            return Err(NotifierError::SendFailed {
                status: status.as_u16(),
                message: body.message.unwrap_or_default(),
            });
        }

        info!(enquiry_id = %enquiry_id, "通知メール送信完了");

        Ok(())
    }
}
