use {
	crate::{
		cache::CachePool,
		db::MongoStore,
		handlers::{handle_health, handle_ping},
		init::AppResources,
		wx::WxClient,
	},
	axum::{
		Router,
		http::{HeaderName, StatusCode},
		routing::get,
	},
	common::mq::MqProducer,
	sqlx::MySqlPool,
	std::time::Duration,
	tower::ServiceBuilder,
	tower_http::{
		request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
		timeout::TimeoutLayer,
		trace::TraceLayer,
	},
};

/// handler 共享的依赖句柄 全部是廉价 clone
#[derive(Clone)]
pub struct AppState {
	pub cache: CachePool,
	pub mysql: MySqlPool,
	pub mongo: MongoStore,
	pub mq: MqProducer,
	pub wx: WxClient,
}

impl AppState {
	pub fn new(resources: &AppResources) -> Self {
		Self { cache: resources.cache.clone(), mysql: resources.mysql.clone(), mongo: resources.mongo.clone(), mq: resources.mq.clone(), wx: resources.wx.clone() }
	}
}

/// 在 engine 上注册路由和中间件
///
/// `request_timeout` 约束单个请求从读到写完的总时长 超时返回 408
pub fn inject(engine: Router, state: AppState, request_timeout: Duration) -> Router {
	let x_request_id = HeaderName::from_static("x-request-id");
	let routes = Router::new().route("/ping", get(handle_ping)).route("/health", get(handle_health)).with_state(state);

	engine.merge(routes).layer(
		ServiceBuilder::new()
			.layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid)) //生成请求id 并放到请求头中
			.layer(TraceLayer::new_for_http())
			.layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
			.layer(PropagateRequestIdLayer::new(x_request_id)), //将请求id从请求头中传递到响应头中
	)
}
