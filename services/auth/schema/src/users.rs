use sea_orm::entity::prelude::*;

/// Provisioned account. E-mail is stored normalised (trimmed, lower-case).
/// `hashed_password` is an Argon2 PHC string, or NULL when no password was ever set.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub email: String,
    pub hashed_password: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub is_admin: bool,
    pub mfa_enabled: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::verification_tokens::Entity")]
    VerificationTokens,
}

impl Related<super::verification_tokens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VerificationTokens.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
