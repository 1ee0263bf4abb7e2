// ============================================================================
// Profile Infrastructure - PostgreSQL Member Repository
// File: crates/profile-infrastructure/src/database/postgres/member_repo_impl.rs
// ============================================================================

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::{debug, error};

use profile_core::domain::{AppUser, Member, MemberOrder, MemberParams, MemberRecord, Photo};
use profile_core::error::DomainError;
use profile_core::repositories::{MemberChanges, MemberRepository, Tracked};
use profile_shared::PaginatedResult;

pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const MEMBER_COLUMNS: &str = r#"
    m.id, m.date_of_birth, m.image_url, m.display_name, m.created, m.last_active,
    m.gender, m.description, m.city, m.country,
    u.display_name AS user_display_name, u.email AS user_email, u.image_url AS user_image_url
"#;

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct MemberRow {
    pub id: String,
    pub date_of_birth: NaiveDate,
    pub image_url: Option<String>,
    pub display_name: String,
    pub created: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub gender: String,
    pub description: Option<String>,
    pub city: String,
    pub country: String,
    pub user_display_name: String,
    pub user_email: String,
    pub user_image_url: Option<String>,
}

#[derive(Debug, FromRow)]
struct PhotoRow {
    pub id: i32,
    pub url: String,
    pub public_id: Option<String>,
    pub member_id: String,
}

impl From<PhotoRow> for Photo {
    fn from(row: PhotoRow) -> Self {
        Photo {
            id: row.id,
            url: row.url,
            public_id: row.public_id,
            member_id: row.member_id,
        }
    }
}

impl MemberRow {
    fn into_member(self, photos: Vec<Photo>) -> Member {
        let user = AppUser {
            id: self.id.clone(),
            display_name: self.user_display_name,
            email: self.user_email,
            image_url: self.user_image_url,
        };
        let record = MemberRecord {
            id: self.id,
            display_name: self.display_name,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            created: self.created,
            last_active: self.last_active,
            description: self.description,
            city: self.city,
            country: self.country,
            image_url: self.image_url,
        };
        Member::restore(record, user, photos)
    }
}

fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e: sqlx::Error| {
        error!("Database error {}: {}", context, e);
        DomainError::DatabaseError(e.to_string())
    }
}

fn order_column(order: MemberOrder) -> &'static str {
    match order {
        MemberOrder::LastActive => "m.last_active",
        MemberOrder::Created => "m.created",
    }
}

/// Profile and user rows are written together whenever either changed, so the
/// image URL pair stays in lockstep.
fn profile_rows_dirty(changes: &MemberChanges) -> bool {
    changes.member_changed || changes.user_changed
}

impl PgMemberRepository {
    async fn find_member(&self, id: &str) -> Result<Option<Member>, DomainError> {
        let row: Option<MemberRow> = sqlx::query_as(&format!(
            "SELECT {} FROM members m JOIN app_users u ON u.id = m.id WHERE m.id = $1",
            MEMBER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding member by id"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let photos = self.get_photos_for_member(&row.id).await?;
        Ok(Some(row.into_member(photos)))
    }

    /// Photos for many members in one round-trip, grouped by member id.
    async fn photos_for_members(&self, member_ids: &[String]) -> Result<HashMap<String, Vec<Photo>>, DomainError> {
        if member_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<PhotoRow> = sqlx::query_as(
            r#"
            SELECT id, url, public_id, member_id
            FROM photos
            WHERE member_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(member_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("loading photos for members"))?;

        let mut grouped: HashMap<String, Vec<Photo>> = HashMap::new();
        for row in rows {
            grouped.entry(row.member_id.clone()).or_default().push(row.into());
        }
        Ok(grouped)
    }

    async fn write_changes(
        tx: &mut Transaction<'_, Postgres>,
        member: &Tracked<Member>,
    ) -> Result<Option<Vec<i32>>, sqlx::Error> {
        let changes = member.changes();
        let record = member.record();

        if profile_rows_dirty(&changes) {
            let updated = sqlx::query(
                r#"
                UPDATE members
                SET
                    display_name = $2,
                    description = $3,
                    city = $4,
                    country = $5,
                    image_url = $6,
                    last_active = $7
                WHERE id = $1
                "#,
            )
            .bind(&record.id)
            .bind(&record.display_name)
            .bind(&record.description)
            .bind(&record.city)
            .bind(&record.country)
            .bind(&record.image_url)
            .bind(record.last_active)
            .execute(&mut **tx)
            .await?;

            if updated.rows_affected() == 0 {
                return Ok(None);
            }

            let user = member.user();
            let updated = sqlx::query(
                r#"
                UPDATE app_users
                SET display_name = $2, image_url = $3
                WHERE id = $1
                "#,
            )
            .bind(&user.id)
            .bind(&user.display_name)
            .bind(&user.image_url)
            .execute(&mut **tx)
            .await?;

            if updated.rows_affected() == 0 {
                return Ok(None);
            }
        }

        if !changes.removed_photo_ids.is_empty() {
            sqlx::query("DELETE FROM photos WHERE member_id = $1 AND id = ANY($2)")
                .bind(&record.id)
                .bind(&changes.removed_photo_ids)
                .execute(&mut **tx)
                .await?;
        }

        let mut new_ids = Vec::with_capacity(changes.added_photos.len());
        for photo in &changes.added_photos {
            let id: i32 = sqlx::query_scalar(
                r#"
                INSERT INTO photos (url, public_id, member_id)
                VALUES ($1, $2, $3)
                RETURNING id
                "#,
            )
            .bind(&photo.url)
            .bind(&photo.public_id)
            .bind(&record.id)
            .fetch_one(&mut **tx)
            .await?;
            new_ids.push(id);
        }

        Ok(Some(new_ids))
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    async fn list_members(&self, params: &MemberParams) -> Result<PaginatedResult<Member>, DomainError> {
        let (oldest, youngest) = params.date_of_birth_range(Utc::now().date_naive());
        let pagination = params.pagination;

        let filter = r#"
            WHERE ($1::text IS NULL OR m.id <> $1)
              AND ($2::text IS NULL OR m.gender = $2)
              AND m.date_of_birth BETWEEN $3 AND $4
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM members m {}", filter))
            .bind(&params.current_member_id)
            .bind(&params.gender)
            .bind(oldest)
            .bind(youngest)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("counting members"))?;

        let rows: Vec<MemberRow> = sqlx::query_as(&format!(
            "SELECT {} FROM members m JOIN app_users u ON u.id = m.id {} ORDER BY {} DESC, m.id ASC LIMIT $5 OFFSET $6",
            MEMBER_COLUMNS,
            filter,
            order_column(params.order_by)
        ))
        .bind(&params.current_member_id)
        .bind(&params.gender)
        .bind(oldest)
        .bind(youngest)
        .bind(i64::from(pagination.page_size))
        .bind(i64::try_from(pagination.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing members"))?;

        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let mut photos = self.photos_for_members(&ids).await?;

        let items = rows
            .into_iter()
            .map(|row| {
                let member_photos = photos.remove(&row.id).unwrap_or_default();
                row.into_member(member_photos)
            })
            .collect();

        Ok(PaginatedResult::new(items, pagination, total.max(0) as u64))
    }

    async fn get_member_by_id(&self, id: &str) -> Result<Option<Member>, DomainError> {
        self.find_member(id).await
    }

    async fn get_member_for_update(&self, id: &str) -> Result<Option<Tracked<Member>>, DomainError> {
        Ok(self.find_member(id).await?.map(Tracked::new))
    }

    async fn get_photos_for_member(&self, member_id: &str) -> Result<Vec<Photo>, DomainError> {
        let rows: Vec<PhotoRow> = sqlx::query_as(
            r#"
            SELECT id, url, public_id, member_id
            FROM photos
            WHERE member_id = $1
            ORDER BY id
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("loading photos for member"))?;

        Ok(rows.into_iter().map(Photo::from).collect())
    }

    async fn save_all(&self, member: &mut Tracked<Member>) -> Result<bool, DomainError> {
        if member.changes().is_empty() {
            debug!("No pending changes for member {}", member.id());
            return Ok(false);
        }

        let mut tx = self.pool.begin().await.map_err(db_error("starting transaction"))?;

        let new_ids = match Self::write_changes(&mut tx, member).await {
            Ok(Some(ids)) => ids,
            Ok(None) => {
                debug!("Member {} no longer exists, rolling back", member.id());
                tx.rollback().await.map_err(db_error("rolling back"))?;
                return Ok(false);
            }
            Err(e) => return Err(db_error("saving member")(e)),
        };

        tx.commit().await.map_err(db_error("committing member"))?;
        member.accept_changes(&new_ids);
        Ok(true)
    }

    async fn touch_last_active(&self, member_id: &str, at: DateTime<Utc>) -> Result<bool, DomainError> {
        let updated = sqlx::query("UPDATE members SET last_active = $2 WHERE id = $1")
            .bind(member_id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(db_error("stamping last active"))?;

        Ok(updated.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_column_is_whitelisted() {
        assert_eq!(order_column(MemberOrder::LastActive), "m.last_active");
        assert_eq!(order_column(MemberOrder::Created), "m.created");
    }

    #[test]
    fn test_user_row_written_with_profile_row() {
        let only_member = MemberChanges {
            member_changed: true,
            ..Default::default()
        };
        let only_user = MemberChanges {
            user_changed: true,
            ..Default::default()
        };
        assert!(profile_rows_dirty(&only_member));
        assert!(profile_rows_dirty(&only_user));
        assert!(!profile_rows_dirty(&MemberChanges::default()));
    }

    #[test]
    fn test_row_maps_user_and_photos() {
        let now = Utc::now();
        let row = MemberRow {
            id: "lisa-id".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1995, 4, 12).unwrap(),
            image_url: Some("a".to_string()),
            display_name: "Lisa".to_string(),
            created: now,
            last_active: now,
            gender: "female".to_string(),
            description: None,
            city: "Paris".to_string(),
            country: "France".to_string(),
            user_display_name: "Lisa".to_string(),
            user_email: "lisa@test.com".to_string(),
            user_image_url: Some("a".to_string()),
        };
        let photo = Photo {
            id: 7,
            url: "a".to_string(),
            public_id: Some("pub-a".to_string()),
            member_id: "lisa-id".to_string(),
        };

        let member = row.into_member(vec![photo]);
        assert_eq!(member.id(), "lisa-id");
        assert_eq!(member.user().email, "lisa@test.com");
        assert_eq!(member.main_photo().map(|p| p.id), Some(7));
    }
}
