use {
	crate::{
		api_types::{ApiErrorCode, ApiResponse, HealthStatus},
		router::AppState,
	},
	axum::{Json, extract::State},
	mongodb::bson::doc,
	tracing::warn,
};

pub async fn handle_ping() -> &'static str {
	"pong"
}

/// 逐个探测依赖 任一不可用时返回错误码 http 状态仍是 200
pub async fn handle_health(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
	let cache = match state.cache.ping().await {
		Ok(()) => true,
		Err(e) => {
			warn!("Health check: cache unavailable: {}", e);
			false
		}
	};
	let mysql = match sqlx::query("SELECT 1").execute(&state.mysql).await {
		Ok(_) => true,
		Err(e) => {
			warn!("Health check: mysql unavailable: {}", e);
			false
		}
	};
	let mongodb = match state.mongo.database().run_command(doc! { "ping": 1 }).await {
		Ok(_) => true,
		Err(e) => {
			warn!("Health check: mongodb unavailable: {}", e);
			false
		}
	};

	let status = HealthStatus { cache, mysql, mongodb, timestamp: chrono::Utc::now().timestamp_millis() };
	if status.is_healthy() { Json(ApiResponse::success(status)) } else { Json(ApiResponse::error_with_data(ApiErrorCode::DependencyUnavailable, status)) }
}
