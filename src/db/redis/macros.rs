/// Serves a value from the cache, computing and storing it on a miss.
///
/// A failed cache read is logged and treated as a miss, so Redis trouble
/// never fails the request. The computed value is written in the background.
///
/// # Arguments
/// * `$cache`: a [`Cache`](crate::db::Cache).
/// * `$key`: the [`CacheKey`](crate::db::CacheKey) to read and write.
/// * `$ttl`: time-to-live in seconds for a freshly computed value.
/// * `$block`: a future resolving to `AppResult<T>`.
///
/// # Example
/// ```rust,ignore
/// let trending: AppResult<Vec<TrendingTrack>> =
///     cached!(cache, key, ttl, compute_trending(catalog, engine, limit));
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache.get_from_cache(&$key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %$key, "Cache hit");
                Ok(cached)
            }
            lookup => {
                match lookup {
                    Err(e) => tracing::warn!(error = %e, key = %$key, "Cache read failed"),
                    _ => tracing::debug!(key = %$key, "Cache miss"),
                }
                let value = $block.await?;
                $cache.set_in_background(&$key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
