// DynamoDBで問い合わせレコードを管理するリポジトリ
//
// 本サービスは1回のput_itemでレコードを作成するのみ。
// ドキュメントIDと作成タイムスタンプはここで割り当てる
// （クライアント申告の送信時刻を受け付けないため）。
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;
use std::collections::HashMap;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::domain::{Enquiry, STATUS_NEW};
use crate::infrastructure::DynamoDbConfig;

/// リポジトリ操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EnquiryRepositoryError {
    /// DynamoDBへの書き込みに失敗
    #[error("Write error: {0}")]
    WriteError(String),
}

/// 問い合わせ永続化用トレイト
///
/// 異なる実装を可能にします（実際のDynamoDB、テスト用モック）。
#[async_trait]
pub trait EnquiryRepository: Send + Sync {
    /// 問い合わせレコードを作成する
    ///
    /// ドキュメントID（UUID v4）と作成タイムスタンプ（サーバー時刻）を
    /// 割り当てたうえで1件書き込む。書き込み失敗はリクエスト全体の
    /// 失敗として扱われる（呼び出し側で500に変換）。
    ///
    /// # 引数
    /// * `enquiry` - バリデーション済みの問い合わせ
    ///
    /// # 戻り値
    /// * `Ok(String)` - 生成されたドキュメントID（通知メールに記載）
    /// * `Err(EnquiryRepositoryError)` - 書き込みエラー
    async fn create(&self, enquiry: &Enquiry) -> Result<String, EnquiryRepositoryError>;
}

/// 実際のDynamoDBを使用したリポジトリ実装
#[derive(Debug, Clone)]
pub struct DynamoEnquiryRepository {
    config: DynamoDbConfig,
}

impl DynamoEnquiryRepository {
    /// 設定からリポジトリを作成
    pub fn new(config: DynamoDbConfig) -> Self {
        Self { config }
    }

    /// DynamoDBアイテムを構築する
    ///
    /// メタデータはネストしたMap属性として格納する。
    /// createdAtはエポック秒のNumber属性。
    fn build_item(
        enquiry: &Enquiry,
        enquiry_id: &str,
        created_at_epoch: i64,
    ) -> HashMap<String, AttributeValue> {
        let mut meta = HashMap::new();
        meta.insert(
            "origin".to_string(),
            AttributeValue::S(enquiry.meta.origin.clone()),
        );
        meta.insert("ip".to_string(), AttributeValue::S(enquiry.meta.ip.clone()));
        meta.insert(
            "pageUrl".to_string(),
            AttributeValue::S(enquiry.meta.page_url.clone()),
        );
        meta.insert(
            "userAgent".to_string(),
            AttributeValue::S(enquiry.meta.user_agent.clone()),
        );
        meta.insert("tz".to_string(), AttributeValue::S(enquiry.meta.tz.clone()));

        let mut item = HashMap::new();
        item.insert("id".to_string(), AttributeValue::S(enquiry_id.to_string()));
        item.insert(
            "firstName".to_string(),
            AttributeValue::S(enquiry.first_name.clone()),
        );
        item.insert(
            "lastName".to_string(),
            AttributeValue::S(enquiry.last_name.clone()),
        );
        item.insert("email".to_string(), AttributeValue::S(enquiry.email.clone()));
        item.insert(
            "message".to_string(),
            AttributeValue::S(enquiry.message.clone()),
        );
        item.insert(
            "status".to_string(),
            AttributeValue::S(STATUS_NEW.to_string()),
        );
        item.insert(
            "createdAt".to_string(),
            AttributeValue::N(created_at_epoch.to_string()),
        );
        item.insert("meta".to_string(), AttributeValue::M(meta));

        item
    }
}

#[async_trait]
impl EnquiryRepository for DynamoEnquiryRepository {
    async fn create(&self, enquiry: &Enquiry) -> Result<String, EnquiryRepositoryError> {
        let enquiry_id = Uuid::new_v4().to_string();
        let created_at = Utc::now().timestamp();

        let item = Self::build_item(enquiry, &enquiry_id, created_at);

        self.config
            .client()
            .put_item()
            .table_name(self.config.enquiries_table())
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| EnquiryRepositoryError::WriteError(e.to_string()))?;

        info!(
            enquiry_id = %enquiry_id,
            created_at = created_at,
            "問い合わせレコードを保存"
        );

        Ok(enquiry_id)
    }
}
