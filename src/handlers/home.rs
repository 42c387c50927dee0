//! Liveness route

pub const HOME_MESSAGE: &str = "Wine Quality Prediction API is running!";

pub async fn index() -> &'static str {
    HOME_MESSAGE
}
