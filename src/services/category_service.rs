use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Find-or-create a two-level (root, child) category pair and return the
/// child id — the only id ever attached to products. Names are normalized to
/// lowercase. Both steps are insert-on-conflict-do-nothing followed by a
/// fetch, so concurrent identical requests converge on a single winner and
/// the resolver is idempotent.
pub async fn resolve_leaf_category(
    conn: &mut PgConnection,
    category_name: &str,
    sub_category_name: &str,
) -> AppResult<Uuid> {
    let root_name = category_name.trim().to_lowercase();
    let leaf_name = sub_category_name.trim().to_lowercase();

    if root_name.is_empty() || leaf_name.is_empty() {
        return Err(AppError::BadRequest(
            "categoryName and subCategoryName are required".into(),
        ));
    }

    sqlx::query(
        r#"
        INSERT INTO categories (id, name, parent_id)
        VALUES ($1, $2, NULL)
        ON CONFLICT (name) WHERE parent_id IS NULL DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&root_name)
    .execute(&mut *conn)
    .await?;

    let (root_id,): (Uuid,) =
        sqlx::query_as("SELECT id FROM categories WHERE name = $1 AND parent_id IS NULL")
            .bind(&root_name)
            .fetch_one(&mut *conn)
            .await?;

    sqlx::query(
        r#"
        INSERT INTO categories (id, name, parent_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (parent_id, name) WHERE parent_id IS NOT NULL DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&leaf_name)
    .bind(root_id)
    .execute(&mut *conn)
    .await?;

    let (leaf_id,): (Uuid,) =
        sqlx::query_as("SELECT id FROM categories WHERE name = $1 AND parent_id = $2")
            .bind(&leaf_name)
            .bind(root_id)
            .fetch_one(&mut *conn)
            .await?;

    Ok(leaf_id)
}
