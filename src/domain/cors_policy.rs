// クロスオリジン許可ポリシー
//
// 既知のフロントエンドOriginの固定リストと照合する。
// ブラウザ側の防御の一層にすぎず、認可境界ではない
// （ブラウザ以外のクライアントは直接呼び出せる）。

/// 許可するフロントエンドOriginの固定リスト
///
/// 本番ドメイン、ホスティングプラットフォームのドメイン、
/// ローカル開発用ポートを含む。設定ファイルには外出しせず、
/// 現行フロントエンドの構成に合わせてここで管理する。
pub const ALLOWED_ORIGINS: [&str; 7] = [
    "https://realcalm.com.au",
    "https://www.realcalm.com.au",
    "https://realcalm-website.web.app",
    "https://realcalm-website.firebaseapp.com",
    "http://localhost:5500",
    "http://localhost:5173",
    "http://localhost:5000",
];

/// Originが許可リストに含まれるか判定する
///
/// 完全一致のみ。一致した場合のみレスポンスで同じ文字列を
/// Access-Control-Allow-Originとしてエコーバックする。
pub fn is_allowed_origin(origin: &str) -> bool {
    ALLOWED_ORIGINS.contains(&origin)
}
