use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

/// Usernames known to be TAKEN. Availability is never cached, only
/// taken-ness, so a stale entry can at worst force a DB round trip.
static USERNAME_CACHE: Lazy<Cache<String, bool>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(100_000) // tune based on memory
        .time_to_live(Duration::from_secs(43200)) // 12h TTL
        .build()
});

/// Mark a single username as taken
pub async fn mark_taken(username: &str) {
    USERNAME_CACHE.insert(username.to_lowercase(), true).await;
}

/// Check if username is taken
pub async fn is_taken(username: &str) -> bool {
    USERNAME_CACHE
        .get(&username.to_lowercase())
        .await
        .unwrap_or(false)
}

/// Load only RECENT usernames into the in-memory cache (batched)
pub async fn warmup_username_cache(pool: &MySqlPool, days: u32, batch_size: usize) -> Result<()> {
    let mut chunks = sqlx::query_as::<_, (String,)>(
        r#"
        SELECT username
        FROM users
        WHERE last_login_at >= NOW() - INTERVAL ? DAY
        ORDER BY last_login_at DESC
        "#,
    )
    .bind(days)
    .fetch(pool)
    .chunks(batch_size);

    let mut total_count = 0usize;

    while let Some(chunk) = chunks.next().await {
        let inserts = chunk
            .into_iter()
            .collect::<Result<Vec<(String,)>, sqlx::Error>>()?
            .into_iter()
            .map(|(username,)| USERNAME_CACHE.insert(username.to_lowercase(), true));

        // Await the whole batch concurrently
        total_count += futures::future::join_all(inserts).await.len();
    }

    log::info!(
        "Username cache warmup complete: {} recent users (last {} days)",
        total_count,
        days
    );

    Ok(())
}
