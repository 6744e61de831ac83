/// GET / - Liveness check for the hosting platform.
pub async fn health() -> &'static str {
    "OK"
}
