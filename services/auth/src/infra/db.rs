use std::time::Duration;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectOptions, Database, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};

use coursemart_auth_schema::{users, verification_tokens};
use coursemart_domain::id::{OneTimeCodeId, UserId};

use crate::domain::repository::{OneTimeCodeRepository, UserRepository};
use crate::domain::types::{OneTimeCode, UserRecord};
use crate::error::AuthServiceError;

/// Open the connection pool with bounded connect/acquire waits.
pub async fn connect(url: &str, timeout: Duration) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(url.to_owned());
    opts.connect_timeout(timeout)
        .acquire_timeout(timeout)
        .sqlx_logging(false);
    Database::connect(opts).await
}

fn store_err<E>(context: &'static str) -> impl FnOnce(E) -> AuthServiceError
where
    E: std::error::Error + Send + Sync + 'static,
{
    move |e| AuthServiceError::StoreUnavailable(anyhow::Error::new(e).context(context))
}

// ── User repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(store_err("find user by email"))?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, AuthServiceError> {
        let model = users::Entity::find_by_id(id.as_str())
            .one(&self.db)
            .await
            .map_err(store_err("find user by id"))?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &UserRecord) -> Result<(), AuthServiceError> {
        let result = users::ActiveModel {
            id: Set(user.id.0.clone()),
            email: Set(user.email.clone()),
            hashed_password: Set(user.hashed_password.clone()),
            name: Set(user.name.clone()),
            image: Set(None),
            is_admin: Set(user.is_admin),
            mfa_enabled: Set(user.mfa_enabled),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await;

        result.map(|_| ()).map_err(|e| {
            let sql_err = e.sql_err();
            create_user_err(sql_err, e)
        })
    }

    async fn set_flags(
        &self,
        id: &UserId,
        is_admin: Option<bool>,
        mfa_enabled: Option<bool>,
    ) -> Result<bool, AuthServiceError> {
        let mut update = users::Entity::update_many()
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id.as_str()));
        if let Some(is_admin) = is_admin {
            update = update.col_expr(users::Column::IsAdmin, Expr::value(is_admin));
        }
        if let Some(mfa_enabled) = mfa_enabled {
            update = update.col_expr(users::Column::MfaEnabled, Expr::value(mfa_enabled));
        }
        let result = update
            .exec(&self.db)
            .await
            .map_err(store_err("update user flags"))?;
        Ok(result.rows_affected > 0)
    }

    async fn set_password_hash(&self, id: &UserId, hash: &str) -> Result<bool, AuthServiceError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::HashedPassword, Expr::value(hash))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id.as_str()))
            .exec(&self.db)
            .await
            .map_err(store_err("update password hash"))?;
        Ok(result.rows_affected > 0)
    }
}

fn create_user_err(sql_err: Option<SqlErr>, e: DbErr) -> AuthServiceError {
    match sql_err {
        Some(SqlErr::UniqueConstraintViolation(_)) => AuthServiceError::EmailTaken,
        _ => store_err("create user")(e),
    }
}

fn user_from_model(model: users::Model) -> UserRecord {
    UserRecord {
        id: UserId(model.id),
        email: model.email,
        hashed_password: model.hashed_password,
        name: model.name,
        is_admin: model.is_admin,
        mfa_enabled: model.mfa_enabled,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── One-time code repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOneTimeCodeRepository {
    pub db: DatabaseConnection,
}

impl OneTimeCodeRepository for DbOneTimeCodeRepository {
    async fn replace_unconsumed(&self, code: &OneTimeCode) -> Result<u64, AuthServiceError> {
        let code = code.clone();
        self.db
            .transaction::<_, u64, DbErr>(|txn| {
                Box::pin(async move {
                    let invalidated = consume_all_for_user(txn, &code.user_id).await?;
                    insert_code(txn, &code).await?;
                    Ok(invalidated)
                })
            })
            .await
            .map_err(store_err("replace one-time codes"))
    }

    async fn find_latest_unconsumed(
        &self,
        user_id: &UserId,
    ) -> Result<Option<OneTimeCode>, AuthServiceError> {
        let model = verification_tokens::Entity::find()
            .filter(verification_tokens::Column::UserId.eq(user_id.as_str()))
            .filter(verification_tokens::Column::Used.eq(false))
            .order_by_desc(verification_tokens::Column::CreatedAt)
            .order_by_desc(verification_tokens::Column::Id)
            .one(&self.db)
            .await
            .map_err(store_err("find latest one-time code"))?;
        Ok(model.map(code_from_model))
    }

    async fn mark_consumed(&self, id: OneTimeCodeId) -> Result<bool, AuthServiceError> {
        let result = verification_tokens::Entity::update_many()
            .col_expr(verification_tokens::Column::Used, Expr::value(true))
            .filter(verification_tokens::Column::Id.eq(id.0))
            .filter(verification_tokens::Column::Used.eq(false))
            .exec(&self.db)
            .await
            .map_err(store_err("mark one-time code consumed"))?;
        Ok(result.rows_affected == 1)
    }
}

async fn consume_all_for_user(txn: &DatabaseTransaction, user_id: &UserId) -> Result<u64, DbErr> {
    let result = verification_tokens::Entity::update_many()
        .col_expr(verification_tokens::Column::Used, Expr::value(true))
        .filter(verification_tokens::Column::UserId.eq(user_id.as_str()))
        .filter(verification_tokens::Column::Used.eq(false))
        .exec(txn)
        .await?;
    Ok(result.rows_affected)
}

async fn insert_code(txn: &DatabaseTransaction, code: &OneTimeCode) -> Result<(), DbErr> {
    verification_tokens::ActiveModel {
        id: Set(code.id.0),
        user_id: Set(code.user_id.0.clone()),
        token: Set(code.code.clone()),
        used: Set(code.consumed),
        expires_at: Set(code.expires_at),
        created_at: Set(code.created_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn code_from_model(model: verification_tokens::Model) -> OneTimeCode {
    OneTimeCode {
        id: OneTimeCodeId(model.id),
        user_id: UserId(model.user_id),
        code: model.token,
        expires_at: model.expires_at,
        consumed: model.used,
        created_at: model.created_at,
    }
}
