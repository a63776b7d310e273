use sqlx::PgPool;
use uuid::Uuid;

pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(pool)
        .await
}

pub async fn insert_user(
    pool: &PgPool,
    email: &str,
    first_name: &str,
    last_name: &str,
    resume_url: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (id, email, first_name, last_name, resume_url)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(first_name)
    .bind(last_name)
    .bind(resume_url)
    .execute(pool)
    .await?;

    Ok(())
}
