/*
 * Responsibility
 * - 認証済みの呼び出し元 (identity) を表す型
 * - middleware が検証して request extensions に格納し、services は所有者判定にこの型だけを使う
 *
 * Notes
 * - トークン検証ロジックは middleware/services 側の責務
 * - 「誰が呼んでいるか」を下流に伝える経路はこの型だけ
 */

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` は users.id
/// - `email` はトークンの `sub`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: i64,
    pub email: String,
}

impl AuthCtx {
    pub fn new(user_id: i64, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }
}
