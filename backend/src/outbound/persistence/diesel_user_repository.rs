//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Account creation runs the user insert and the whole welcome-content seed
//! inside one transaction, so a failure partway leaves no partial account.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{NewAccount, UserPersistenceError, UserRepository};
use crate::domain::user::{PasswordHash, User, UserId, Username};
use crate::domain::welcome::WelcomeSeed;

use super::models::{NewDocumentRow, NewGalleryRow, NewImageRow, NewPageRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{galleries, images, markdown_documents, pages, users};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error, username: &Username) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserPersistenceError::duplicate_username(username.as_ref())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        _ => UserPersistenceError::query("database error"),
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let username = Username::new(row.username)
        .map_err(|err| UserPersistenceError::query(format!("stored username invalid: {err}")))?;
    let password_hash = PasswordHash::new(row.password_hash).map_err(|err| {
        UserPersistenceError::query(format!("stored password hash invalid: {err}"))
    })?;
    Ok(User {
        id: UserId::from_uuid(row.id),
        username,
        password_hash,
    })
}

/// Insert the welcome document, pages, gallery, and images for `owner`.
///
/// Runs on the caller's connection; intended for use inside the
/// account-creation transaction.
async fn seed_welcome_content(
    conn: &mut diesel_async::AsyncPgConnection,
    owner: Uuid,
    welcome: &WelcomeSeed,
) -> Result<(), diesel::result::Error> {
    let document_id = Uuid::new_v4();
    diesel::insert_into(markdown_documents::table)
        .values(NewDocumentRow {
            id: document_id,
            title: welcome.document_title.as_ref(),
            owner_id: owner,
        })
        .execute(conn)
        .await?;

    for (index, content) in welcome.page_contents.iter().enumerate() {
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_possible_wrap,
            reason = "welcome seeds hold a handful of pages"
        )]
        let position = index as i32;
        diesel::insert_into(pages::table)
            .values(NewPageRow {
                id: Uuid::new_v4(),
                content,
                markdown_document_id: document_id,
                position,
            })
            .execute(conn)
            .await?;
    }

    let gallery_id = Uuid::new_v4();
    diesel::insert_into(galleries::table)
        .values(NewGalleryRow {
            id: gallery_id,
            name: welcome.gallery_name.as_ref(),
            markdown_document_id: document_id,
        })
        .execute(conn)
        .await?;

    for path in &welcome.image_paths {
        diesel::insert_into(images::table)
            .values(NewImageRow {
                id: Uuid::new_v4(),
                filename: path,
                gallery_id,
            })
            .execute(conn)
            .await?;
    }

    Ok(())
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create_account(
        &self,
        account: NewAccount,
        welcome: &WelcomeSeed,
    ) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = Uuid::new_v4();
        let username = account.username.clone();

        conn.transaction(|conn| {
            let account = &account;
            async move {
                diesel::insert_into(users::table)
                    .values(NewUserRow {
                        id: user_id,
                        username: account.username.as_ref(),
                        password_hash: account.password_hash.as_str(),
                    })
                    .execute(conn)
                    .await?;
                seed_welcome_content(conn, user_id, welcome).await
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(err, &username))?;
        drop(conn);

        Ok(User {
            id: UserId::from_uuid(user_id),
            username: account.username,
            password_hash: account.password_hash,
        })
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, username))?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(UserPersistenceError::from)?;

        row.map(row_to_user).transpose()
    }
}

impl From<diesel::result::Error> for UserPersistenceError {
    fn from(error: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};
        match error {
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
                Self::connection("database connection error")
            }
            _ => Self::query("database error"),
        }
    }
}
