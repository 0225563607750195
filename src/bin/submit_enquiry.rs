/// 問い合わせ受付HTTP Lambdaエントリポイント
///
/// Lambda Function URL経由のHTTPリクエストを処理し、
/// フォーム送信の受付・永続化・通知メール送信を行う。
use contact_intake::application::SubmitEnquiryHandler;
use contact_intake::infrastructure::{
    DynamoDbConfig, DynamoEnquiryRepository, MailerooConfig, MailerooNotifier, init_logging,
};
use lambda_http::{Body, Error, Request, Response, run, service_fn};
use tokio::sync::OnceCell;
use tracing::{error, info};

/// ハンドラーの静的インスタンス
///
/// Lambda warm start時にDynamoDBクライアント・HTTPクライアント・
/// SSMから取得した送信キーを再利用するため、一度初期化した
/// ハンドラーを静的に保持する。
static HANDLER: OnceCell<SubmitEnquiryHandler<DynamoEnquiryRepository, MailerooNotifier>> =
    OnceCell::const_new();

/// ハンドラーを取得（初期化されていなければ初期化）
async fn get_handler()
-> Result<&'static SubmitEnquiryHandler<DynamoEnquiryRepository, MailerooNotifier>, Error> {
    HANDLER
        .get_or_try_init(|| async {
            let dynamodb_config = DynamoDbConfig::from_env().await.map_err(|e| {
                error!(error = %e, "DynamoDB設定読み込み失敗");
                Error::from(e.to_string())
            })?;

            // Maileroo送信キーの取得
            // Lambda環境ではSSMから、ローカルではMAILEROO_SENDING_KEY環境変数から取得
            let maileroo_config = if std::env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok() {
                MailerooConfig::from_env_with_ssm().await.map_err(|e| {
                    error!(error = %e, "Maileroo設定読み込み失敗（SSM）");
                    Error::from(e.to_string())
                })?
            } else {
                MailerooConfig::from_env().map_err(|e| {
                    error!(error = %e, "Maileroo設定読み込み失敗");
                    Error::from(e.to_string())
                })?
            };

            Ok(SubmitEnquiryHandler::new(
                DynamoEnquiryRepository::new(dynamodb_config),
                MailerooNotifier::new(maileroo_config),
            ))
        })
        .await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    info!("問い合わせ受付Lambda関数を初期化");

    // Lambda関数を実行
    run(service_fn(handler)).await
}

/// HTTPリクエストハンドラー
///
/// # 引数
/// * `request` - Function URL経由で受信したHTTPリクエスト
///
/// # 戻り値
/// 受付結果のHTTPレスポンス（CORSヘッダー付き）
async fn handler(request: Request) -> Result<Response<Body>, Error> {
    info!(
        method = %request.method(),
        "問い合わせリクエスト受信"
    );

    let submit_handler = get_handler().await?;
    let response = submit_handler.handle(&request).await;

    info!(status = response.status().as_u16(), "レスポンス送信");

    Ok(response)
}
