/// DynamoDB接続設定
use aws_sdk_dynamodb::Client as DynamoDbClient;
use thiserror::Error;

/// DynamoDB設定のエラー型
#[derive(Debug, Error)]
pub enum DynamoDbConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// テーブル名とクライアントを持つDynamoDB設定
///
/// テーブル名は以下の環境変数で設定:
/// - ENQUIRIES_TABLE: 問い合わせレコード保存用テーブル
#[derive(Debug, Clone)]
pub struct DynamoDbConfig {
    /// DynamoDBクライアントインスタンス
    client: DynamoDbClient,
    /// 問い合わせテーブル名
    enquiries_table: String,
}

impl DynamoDbConfig {
    /// 環境からAWS設定を読み込み、環境変数からテーブル名を読み取って新しいDynamoDbConfigを作成
    ///
    /// 環境変数:
    /// - AWS認証情報: aws-configにより自動読み込み
    /// - ENQUIRIES_TABLE: 問い合わせ用DynamoDBテーブル名
    pub async fn from_env() -> Result<Self, DynamoDbConfigError> {
        // 環境からAWS設定を読み込み（認証情報、リージョンなど）
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        // AWS設定からDynamoDBクライアントを作成
        let client = DynamoDbClient::new(&aws_config);

        // 環境変数からテーブル名を読み込み
        let enquiries_table = std::env::var("ENQUIRIES_TABLE")
            .map_err(|_| DynamoDbConfigError::MissingEnvVar("ENQUIRIES_TABLE".to_string()))?;

        Ok(Self {
            client,
            enquiries_table,
        })
    }

    /// 明示的な値で新しいDynamoDbConfigを作成（テスト用）
    pub fn new(client: DynamoDbClient, enquiries_table: String) -> Self {
        Self {
            client,
            enquiries_table,
        }
    }

    /// DynamoDBクライアントへの参照を取得
    pub fn client(&self) -> &DynamoDbClient {
        &self.client
    }

    /// 問い合わせテーブル名を取得
    pub fn enquiries_table(&self) -> &str {
        &self.enquiries_table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// エラー表示に環境変数名が含まれる
    #[test]
    fn test_missing_env_var_error_display() {
        let error = DynamoDbConfigError::MissingEnvVar("TEST_VAR".to_string());
        assert_eq!(error.to_string(), "Missing environment variable: TEST_VAR");
    }

    /// 明示的な値でDynamoDbConfigを構築できる
    #[tokio::test]
    async fn test_dynamodb_config_new() {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = DynamoDbClient::new(&aws_config);

        let config = DynamoDbConfig::new(client, "test-enquiries".to_string());

        assert_eq!(config.enquiries_table(), "test-enquiries");
        let _client_ref = config.client();
    }

    /// ENQUIRIES_TABLEが未設定ならエラーになる
    #[tokio::test]
    #[serial(enquiries_env)]
    async fn test_from_env_missing_table() {
        // 安全性: シングルスレッドで実行される環境変数テスト
        unsafe { std::env::remove_var("ENQUIRIES_TABLE") };

        let result = DynamoDbConfig::from_env().await;

        assert!(result.is_err());
        match result.unwrap_err() {
            DynamoDbConfigError::MissingEnvVar(var) => {
                assert_eq!(var, "ENQUIRIES_TABLE");
            }
        }
    }

    /// ENQUIRIES_TABLEが設定されていれば読み込みに成功する
    #[tokio::test]
    #[serial(enquiries_env)]
    async fn test_from_env_success() {
        // 安全性: シングルスレッドで実行される環境変数テスト
        unsafe { std::env::set_var("ENQUIRIES_TABLE", "my-enquiries-table") };

        let result = DynamoDbConfig::from_env().await;

        assert!(result.is_ok());
        assert_eq!(result.unwrap().enquiries_table(), "my-enquiries-table");

        // クリーンアップ
        unsafe { std::env::remove_var("ENQUIRIES_TABLE") };
    }
}
