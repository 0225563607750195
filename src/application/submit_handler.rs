// 問い合わせ受付ハンドラー
//
// HTTPリクエスト1件を受け取り、CORS判定、メソッドゲート、
// ハニーポット、バリデーション、永続化、通知メール送信を
// 直列に実行してレスポンスを1つ返す。
//
// 永続化の失敗はリクエストの失敗（500）。通知メールの失敗は
// ログに記録するのみで、レスポンスには影響しない
// （正本の書き込みが既に成功しているため）。
use lambda_http::http::Method;
use lambda_http::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE, HeaderMap, HeaderValue, ORIGIN, VARY,
};
use lambda_http::request::RequestContext;
use lambda_http::{Body, Request, RequestExt, Response};
use tracing::{error, info};

use crate::application::submission_parser::{client_ip, parse_body};
use crate::domain::{Enquiry, EnquiryMeta, EnquiryValidator, is_allowed_origin};
use crate::infrastructure::{EnquiryNotifier, EnquiryRepository};

/// 問い合わせ受付ハンドラー
///
/// リポジトリと通知をトレイト経由で注入する
/// （実際のDynamoDB/Maileroo、テスト用モック）。
pub struct SubmitEnquiryHandler<R, N> {
    /// 問い合わせリポジトリ
    repository: R,
    /// 通知メール送信
    notifier: N,
}

impl<R, N> SubmitEnquiryHandler<R, N>
where
    R: EnquiryRepository,
    N: EnquiryNotifier,
{
    /// 新しいハンドラーを作成
    pub fn new(repository: R, notifier: N) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// HTTPリクエストを処理してレスポンスを生成
    ///
    /// # 処理フロー
    /// 1. CORS判定（許可リスト一致時のみOriginをエコーバック）
    /// 2. メソッドゲート（OPTIONS → 204、POST以外 → 405）
    /// 3. ハニーポット判定（非空なら成功レスポンスで黙って破棄）
    /// 4. フィールド抽出・バリデーション（失敗 → 400）
    /// 5. 永続化（失敗 → 500）
    /// 6. 通知メール送信（ベストエフォート、失敗はログのみ）
    /// 7. 200 {"ok": true}
    pub async fn handle(&self, request: &Request) -> Response<Body> {
        let origin = request
            .headers()
            .get(ORIGIN)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        let cors_headers = Self::build_cors_headers(origin);

        // プリフライトは空の204
        if request.method() == Method::OPTIONS {
            return Self::respond(204, Body::Empty, cors_headers);
        }

        // 受付メソッドはPOSTのみ
        if request.method() != Method::POST {
            return Self::json_response(
                405,
                serde_json::json!({"error": "Method not allowed"}),
                cors_headers,
            );
        }

        let body_str = match request.body() {
            Body::Text(text) => text.as_str(),
            Body::Binary(bytes) => std::str::from_utf8(bytes).unwrap_or(""),
            _ => "",
        };

        let form = parse_body(body_str);

        // ハニーポット: スパム送信者に検出を悟らせないため、
        // 正常時と同じ成功レスポンスを返して何も記録しない
        if form.is_honeypot_triggered() {
            info!(origin = %origin, "ハニーポット検出、送信を破棄");
            return Self::json_response(200, serde_json::json!({"ok": true}), cors_headers);
        }

        if let Err(validation_error) = EnquiryValidator::validate(
            &form.first_name,
            &form.last_name,
            &form.email,
            &form.message,
        ) {
            info!(origin = %origin, error = %validation_error, "バリデーション失敗");
            return Self::json_response(
                400,
                serde_json::json!({"error": validation_error.to_string()}),
                cors_headers,
            );
        }

        // メタデータ導出
        let forwarded_for = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok());
        let ip = client_ip(forwarded_for, Self::remote_addr(request).as_deref());

        let enquiry = Enquiry {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            message: form.message,
            meta: EnquiryMeta {
                origin: origin.to_string(),
                ip,
                page_url: form.page_url,
                user_agent: form.user_agent,
                tz: form.tz,
            },
        };

        // 永続化（正本）。失敗はリクエスト全体の失敗
        let enquiry_id = match self.repository.create(&enquiry).await {
            Ok(id) => id,
            Err(e) => {
                error!(error = %e, "問い合わせレコードの保存に失敗");
                return Self::json_response(
                    500,
                    serde_json::json!({"error": "Internal error."}),
                    cors_headers,
                );
            }
        };

        // 通知メール（ベストエフォート）。失敗してもレスポンスは変えない
        if let Err(e) = self.notifier.notify(&enquiry, &enquiry_id).await {
            error!(enquiry_id = %enquiry_id, error = %e, "通知メール送信失敗");
        }

        Self::json_response(200, serde_json::json!({"ok": true}), cors_headers)
    }

    /// CORSヘッダーを生成
    ///
    /// Originが許可リストに一致する場合のみ同じ文字列をエコーバックし、
    /// キャッシュ正当性のためVary: Originを付与する。
    /// Allow-Methods / Allow-Headersは常に固定値。
    fn build_cors_headers(origin: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if is_allowed_origin(origin) {
            if let Ok(value) = HeaderValue::from_str(origin) {
                headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
                headers.insert(VARY, HeaderValue::from_static("Origin"));
            }
        }

        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        );

        headers
    }

    /// トランスポート層のリモートアドレスを取得
    ///
    /// Lambdaのリクエストコンテキストからソースを取得する。
    /// コンテキストがない場合（ローカルテスト等）はNone。
    fn remote_addr(request: &Request) -> Option<String> {
        match request.request_context_ref() {
            Some(RequestContext::ApiGatewayV2(ctx)) => ctx.http.source_ip.clone(),
            Some(RequestContext::ApiGatewayV1(ctx)) => ctx.identity.source_ip.clone(),
            _ => None,
        }
    }

    /// JSONボディ付きレスポンスを生成
    fn json_response(
        status: u16,
        body: serde_json::Value,
        mut headers: HeaderMap,
    ) -> Response<Body> {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self::respond(status, Body::Text(body.to_string()), headers)
    }

    /// レスポンスを生成してヘッダーを設定
    fn respond(status: u16, body: Body, headers: HeaderMap) -> Response<Body> {
        let mut response = Response::builder()
            .status(status)
            .body(body)
            .expect("レスポンスの構築に失敗");

        *response.headers_mut() = headers;

        response
    }
}
