//! Request Client - 请求编排核心
//!
//! 对外提供 `get/post/put/remove` 等函数式接口：
//! 1. 解析配置得到请求描述符
//! 2. `cancel_previous` 时先取消同 id 的在途请求和缓存
//! 3. `clear_cache` 时清除缓存，否则读取缓存候选
//! 4. `from_cache` 且存在候选时直接返回，不发起调用
//! 5. 否则登记队列、发起调用、写入缓存；结算后清理队列

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::application::endpoint::Endpoint;
use crate::application::error::RequestError;
use crate::application::normalizer::ResponseNormalizer;
use crate::application::pending::{PendingRequest, RequestResult};
use crate::application::ports::{
    CacheSelector, NotifierPort, RequestCachePort, RequestQueuePort, TransportError,
    TransportPort,
};
use crate::application::resolver::{ConfigResolver, RequestDescriptor};
use crate::domain::{interpolate, Method, RequestFlags, RequestOptions};

/// 客户端设置
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    /// 调用方未指定时使用的开关
    pub defaults: RequestFlags,
    /// 不自动提示的业务码
    pub suppressed_codes: Vec<i64>,
}

/// 请求客户端
///
/// 每个实例拥有独立的缓存和队列
pub struct RequestClient {
    resolver: ConfigResolver,
    normalizer: Arc<ResponseNormalizer>,
    transport: Arc<dyn TransportPort>,
    cache: Arc<dyn RequestCachePort>,
    queue: Arc<dyn RequestQueuePort>,
}

impl RequestClient {
    pub fn new(
        settings: ClientSettings,
        transport: Arc<dyn TransportPort>,
        notifier: Arc<dyn NotifierPort>,
        cache: Arc<dyn RequestCachePort>,
        queue: Arc<dyn RequestQueuePort>,
    ) -> Self {
        Self {
            resolver: ConfigResolver::new(settings.defaults),
            normalizer: Arc::new(ResponseNormalizer::new(notifier, settings.suppressed_codes)),
            transport,
            cache,
            queue,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn cache(&self) -> &Arc<dyn RequestCachePort> {
        &self.cache
    }

    pub fn queue(&self) -> &Arc<dyn RequestQueuePort> {
        &self.queue
    }

    pub async fn get(&self, url: &str, params: Value, options: RequestOptions) -> RequestResult {
        self.request(Method::Get, url, params, options).await
    }

    pub async fn head(&self, url: &str, params: Value, options: RequestOptions) -> RequestResult {
        self.request(Method::Head, url, params, options).await
    }

    pub async fn options(&self, url: &str, params: Value, options: RequestOptions) -> RequestResult {
        self.request(Method::Options, url, params, options).await
    }

    pub async fn post(&self, url: &str, params: Value, options: RequestOptions) -> RequestResult {
        self.request(Method::Post, url, params, options).await
    }

    pub async fn put(&self, url: &str, params: Value, options: RequestOptions) -> RequestResult {
        self.request(Method::Put, url, params, options).await
    }

    pub async fn patch(&self, url: &str, params: Value, options: RequestOptions) -> RequestResult {
        self.request(Method::Patch, url, params, options).await
    }

    /// DELETE
    pub async fn remove(&self, url: &str, params: Value, options: RequestOptions) -> RequestResult {
        self.request(Method::Delete, url, params, options).await
    }

    /// 发起请求并等待结算
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        params: Value,
        options: RequestOptions,
    ) -> RequestResult {
        self.dispatch(method, url, params, &options).await.await
    }

    /// 绑定方法和地址，得到可重复调用的 endpoint
    pub fn endpoint(self: &Arc<Self>, method: Method, url: impl Into<String>) -> Endpoint {
        Endpoint::new(Arc::clone(self), method, url)
    }

    /// 发起请求，返回其 promise（可能是缓存命中的旧 promise）
    ///
    /// 返回时请求已在途，队列和缓存都已登记
    pub async fn dispatch(
        &self,
        method: Method,
        url: &str,
        params: Value,
        options: &RequestOptions,
    ) -> PendingRequest {
        let descriptor = match self.prepare(method, url, params, options) {
            Ok(d) => d,
            Err(e) => return PendingRequest::ready(Err(e)),
        };
        let request_id = descriptor.request_id.clone();

        if descriptor.flags.cancel_previous {
            self.cancel(&request_id).await;
        }

        let candidate = if descriptor.flags.clear_cache {
            self.cache.delete(CacheSelector::One(request_id.clone())).await;
            None
        } else {
            self.cache.get(&request_id)
        };

        if descriptor.flags.from_cache {
            if let Some(cached) = candidate {
                tracing::debug!(request_id = %request_id, "Request served from cache");
                return cached;
            }
        }

        tracing::debug!(
            request_id = %request_id,
            method = %descriptor.method,
            url = %descriptor.url,
            "Dispatching request"
        );

        // 先登记队列，保证结算清理一定发生在登记之后
        self.queue.set(&descriptor);
        let pending = PendingRequest::spawn(Self::execute(
            descriptor,
            self.transport.clone(),
            self.normalizer.clone(),
            self.queue.clone(),
        ));
        self.cache.set(&request_id, pending.clone());

        pending
    }

    /// 取消在途请求并清除缓存，两者都完成后返回
    pub async fn cancel(&self, request_id: &str) {
        let (cancelled, _) = tokio::join!(
            self.cancel_request(request_id),
            self.cancel_cache(request_id)
        );
        tracing::debug!(request_id = %request_id, cancelled = cancelled, "Request cancelled");
    }

    /// 仅取消在途请求
    pub async fn cancel_request(&self, request_id: &str) -> bool {
        self.queue.cancel(request_id).await
    }

    /// 仅清除缓存
    pub async fn cancel_cache(&self, request_id: &str) -> CacheSelector {
        self.cache.delete(CacheSelector::One(request_id.to_string())).await
    }

    /// 路由变更：取消所有标记了 `cancel_when_route_change` 的在途请求
    ///
    /// 返回被取消的 request id
    pub async fn cancel_route_scoped(&self) -> Vec<String> {
        let ids: Vec<String> = self
            .queue
            .in_flight()
            .into_iter()
            .filter(|entry| entry.descriptor.flags.cancel_when_route_change)
            .map(|entry| entry.descriptor.request_id)
            .collect();

        for id in &ids {
            self.cancel(id).await;
        }

        if !ids.is_empty() {
            tracing::info!(count = ids.len(), "Route-scoped requests cancelled");
        }
        ids
    }

    /// 路径变量替换后解析出描述符
    fn prepare(
        &self,
        method: Method,
        url: &str,
        params: Value,
        options: &RequestOptions,
    ) -> Result<RequestDescriptor, RequestError> {
        let mut data = into_params(params)?;
        let url = interpolate(url, &mut data);
        Ok(self.resolver.resolve(method, &url, data, options))
    }

    async fn execute(
        descriptor: RequestDescriptor,
        transport: Arc<dyn TransportPort>,
        normalizer: Arc<ResponseNormalizer>,
        queue: Arc<dyn RequestQueuePort>,
    ) -> RequestResult {
        let request = descriptor.to_transport_request();
        let outcome = transport.send(request, descriptor.cancel.clone()).await;

        let result = match outcome {
            Ok(response) => normalizer.resolve(&descriptor, response),
            Err(TransportError::Cancelled) => {
                // 取消不是业务错误：不提示，只记录
                tracing::warn!(
                    request_id = %descriptor.request_id,
                    url = %descriptor.url,
                    "Request cancelled"
                );
                Err(RequestError::Cancelled {
                    request_id: descriptor.request_id.clone(),
                })
            }
            Err(e) => Err(normalizer.reject(&descriptor, e)),
        };

        queue.release(&descriptor.request_id, descriptor.dispatch_id);
        result
    }
}

/// 参数必须是 JSON 对象，`null` 视为空
fn into_params(params: Value) -> Result<Map<String, Value>, RequestError> {
    match params {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(RequestError::invalid_params(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{Notification, TransportResponse};
    use crate::application::{ErrorKind, ResponseValue};
    use crate::infrastructure::{build_client, BroadcastNotifier, FakeTransport};
    use serde_json::json;
    use std::time::Duration;

    const SLOW: Duration = Duration::from_secs(10);

    fn setup() -> (Arc<RequestClient>, Arc<FakeTransport>, Arc<BroadcastNotifier>) {
        let transport = Arc::new(FakeTransport::new());
        let notifier = Arc::new(BroadcastNotifier::new());
        let client = build_client(ClientSettings::default(), transport.clone(), notifier.clone());
        (client, transport, notifier)
    }

    #[tokio::test]
    async fn test_get_encodes_params_into_query() {
        let (client, transport, _) = setup();
        transport.respond_json("/users?page=1&tags[0]=a", 200, json!({"code": 0, "data": [1]}));

        let result = client
            .get("/users", json!({"page": 1, "tags": ["a"]}), RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(result, ResponseValue::Data(json!({"code": 0, "data": [1]})));
        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, None);
        assert_eq!(sent[0].request_id, r#"get_/users{"page":1,"tags":["a"]}"#);
    }

    #[tokio::test]
    async fn test_post_interpolates_path_and_sends_body() {
        let (client, transport, _) = setup();
        transport.respond_json("/svc/prod/items", 200, json!({"code": 0}));

        client
            .post("/svc/$ns/items", json!({"$ns": "prod", "name": "x"}), RequestOptions::new())
            .await
            .unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].url, "/svc/prod/items");
        assert_eq!(sent[0].body, Some(json!({"name": "x"})));
    }

    #[tokio::test]
    async fn test_empty_path_variable_drops_segment() {
        let (client, transport, _) = setup();
        transport.respond_json("/svc/list", 200, json!({"code": 0}));

        client
            .get("/svc/$ns/list", json!({"$ns": ""}), RequestOptions::new())
            .await
            .unwrap();
        assert_eq!(transport.calls_to("/svc/list"), 1);
    }

    #[tokio::test]
    async fn test_from_cache_reuses_in_flight_promise() {
        let (client, transport, _) = setup();
        transport.respond_json_after("/a", 200, json!({"code": 0}), Duration::from_millis(50));

        let first = client
            .dispatch(Method::Get, "/a", Value::Null, &RequestOptions::new())
            .await;
        let second = client
            .dispatch(Method::Get, "/a", Value::Null, &RequestOptions::new().from_cache(true))
            .await;

        assert!(first.ptr_eq(&second));
        assert!(first.clone().await.is_ok());
        assert!(second.await.is_ok());
        assert_eq!(transport.call_count(), 1);

        // 结算后仍保留在缓存中
        let third = client
            .dispatch(Method::Get, "/a", Value::Null, &RequestOptions::new().from_cache(true))
            .await;
        assert!(third.ptr_eq(&first));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_get_key_order_does_not_split_requests() {
        let (client, transport, _) = setup();
        transport.respond_json_after("/u?a=1&b=2", 200, json!({"code": 0}), Duration::from_millis(20));
        transport.respond_json("/u?b=2&a=1", 200, json!({"code": 0}));

        let first = client
            .dispatch(Method::Get, "/u", json!({"a": 1, "b": 2}), &RequestOptions::new())
            .await;
        let second = client
            .dispatch(
                Method::Get,
                "/u",
                json!({"b": 2, "a": 1}),
                &RequestOptions::new().from_cache(true),
            )
            .await;

        assert!(first.ptr_eq(&second));
        assert!(second.await.is_ok());
        assert_eq!(transport.call_count(), 1);
        assert_eq!(client.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_get_cancel_previous_matches_reordered_params() {
        let (client, transport, _) = setup();
        transport.respond_json_after("/u?a=1&b=2", 200, json!({"code": 0}), SLOW);
        transport.respond_json("/u?b=2&a=1", 200, json!({"code": 0}));

        let first = client
            .dispatch(Method::Get, "/u", json!({"a": 1, "b": 2}), &RequestOptions::new())
            .await;
        let second = client
            .dispatch(
                Method::Get,
                "/u",
                json!({"b": 2, "a": 1}),
                &RequestOptions::new().cancel_previous(true),
            )
            .await;

        assert!(first.await.unwrap_err().is_cancelled());
        assert!(second.await.is_ok());
        assert_eq!(transport.cancelled_count(), 1);
        assert!(client.queue().is_empty());
    }

    #[tokio::test]
    async fn test_distinct_bodies_are_not_shared_from_cache() {
        let (client, transport, _) = setup();
        transport.respond_json("/p", 200, json!({"code": 0}));

        let with_null = client
            .dispatch(Method::Post, "/p", json!({"a": null}), &RequestOptions::new())
            .await;
        let empty = client
            .dispatch(Method::Post, "/p", json!({}), &RequestOptions::new().from_cache(true))
            .await;

        assert!(!with_null.ptr_eq(&empty));
        assert!(with_null.await.is_ok());
        assert!(empty.await.is_ok());
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_without_from_cache_issues_new_call() {
        let (client, transport, _) = setup();
        transport.respond_json("/a", 200, json!({"code": 0}));

        let first = client
            .dispatch(Method::Get, "/a", Value::Null, &RequestOptions::new())
            .await;
        first.clone().await.unwrap();
        let second = client
            .dispatch(Method::Get, "/a", Value::Null, &RequestOptions::new())
            .await;
        second.clone().await.unwrap();

        assert!(!first.ptr_eq(&second));
        assert_eq!(transport.call_count(), 2);
        assert!(client.cache().get("get_/a").unwrap().ptr_eq(&second));
    }

    #[tokio::test]
    async fn test_clear_cache_forces_new_call() {
        let (client, transport, _) = setup();
        transport.respond_json("/a", 200, json!({"code": 0}));

        client.get("/a", Value::Null, RequestOptions::new()).await.unwrap();
        client
            .get("/a", Value::Null, RequestOptions::new().from_cache(true).clear_cache(true))
            .await
            .unwrap();

        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_dispatch_registers_queue_and_cache_before_settlement() {
        let (client, transport, _) = setup();
        transport.respond_json_after("/slow", 200, json!({"code": 0}), SLOW);

        let pending = client
            .dispatch(Method::Get, "/slow", Value::Null, &RequestOptions::new())
            .await;

        assert!(!pending.is_settled());
        assert!(client.queue().get("get_/slow").is_some());
        assert!(client.cache().get("get_/slow").unwrap().ptr_eq(&pending));

        client.cancel("get_/slow").await;
    }

    #[tokio::test]
    async fn test_cancel_previous_cancels_in_flight_call() {
        let (client, transport, notifier) = setup();
        let mut notifications = notifier.subscribe();
        transport.respond_json_after("/slow", 200, json!({"code": 0}), SLOW);

        let first = client
            .dispatch(Method::Get, "/slow", Value::Null, &RequestOptions::new())
            .await;
        let entry = client.queue().get("get_/slow").unwrap();

        transport.respond_json("/slow", 200, json!({"code": 0, "n": 2}));
        let second = client
            .dispatch(Method::Get, "/slow", Value::Null, &RequestOptions::new().cancel_previous(true))
            .await;

        let first_result = first.await;
        assert!(matches!(first_result, Err(RequestError::Cancelled { .. })));
        // 取消句柄已被触发过一次
        assert!(entry.descriptor.cancel.is_cancelled());
        assert!(!entry.descriptor.cancel.cancel());

        let second_result = second.await.unwrap();
        assert_eq!(second_result, ResponseValue::Data(json!({"code": 0, "n": 2})));
        assert!(client.queue().is_empty());
        assert!(notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_superseded_call_cleanup_keeps_successor_entry() {
        let (client, transport, _) = setup();
        transport.respond_json_after("/slow", 200, json!({"code": 0}), SLOW);

        let first = client
            .dispatch(Method::Get, "/slow", Value::Null, &RequestOptions::new())
            .await;
        let second = client
            .dispatch(Method::Get, "/slow", Value::Null, &RequestOptions::new().cancel_previous(true))
            .await;

        assert!(first.await.is_err());
        let entry = client.queue().get("get_/slow");
        assert!(entry.is_some());
        assert!(!second.is_settled());

        client.cancel("get_/slow").await;
        assert!(second.await.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn test_explicit_cancel_clears_queue_and_cache() {
        let (client, transport, notifier) = setup();
        let mut notifications = notifier.subscribe();
        transport.respond_json_after("/slow", 200, json!({"code": 0}), SLOW);

        let pending = client
            .dispatch(Method::Get, "/slow", Value::Null, &RequestOptions::new())
            .await;
        client.cancel("get_/slow").await;

        let result = pending.await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Cancelled);
        assert!(client.queue().is_empty());
        assert!(client.cache().is_empty());
        assert_eq!(transport.cancelled_count(), 1);
        assert!(notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cancel_unknown_id_is_noop() {
        let (client, _, _) = setup();
        assert!(!client.cancel_request("missing").await);
        assert_eq!(
            client.cancel_cache("missing").await,
            CacheSelector::One("missing".to_string())
        );
    }

    #[tokio::test]
    async fn test_cancel_route_scoped_respects_flag() {
        let (client, transport, _) = setup();
        transport.respond_json_after("/a", 200, json!({"code": 0}), SLOW);
        transport.respond_json_after("/b", 200, json!({"code": 0}), SLOW);

        let scoped = client
            .dispatch(Method::Get, "/a", Value::Null, &RequestOptions::new())
            .await;
        let pinned = client
            .dispatch(
                Method::Get,
                "/b",
                Value::Null,
                &RequestOptions::new().cancel_when_route_change(false),
            )
            .await;

        let cancelled = client.cancel_route_scoped().await;
        assert_eq!(cancelled, vec!["get_/a".to_string()]);
        assert!(scoped.await.unwrap_err().is_cancelled());
        assert!(client.queue().get("get_/b").is_some());

        client.cancel("get_/b").await;
        assert!(pinned.await.is_err());
    }

    #[tokio::test]
    async fn test_application_code_rejects_and_notifies() {
        let (client, transport, notifier) = setup();
        let mut notifications = notifier.subscribe();
        transport.respond_json("/a", 200, json!({"code": 7, "message": "quota exceeded"}));

        let result = client.get("/a", Value::Null, RequestOptions::new()).await;
        match result {
            Err(RequestError::HttpStatus(e)) => {
                assert!(e.is_application_code());
                assert_eq!(e.code, Some(7));
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let notification = notifications.recv().await.unwrap();
        assert_eq!(notification, Notification::new("get_/a", "quota exceeded"));
        assert!(client.queue().is_empty());
    }

    #[tokio::test]
    async fn test_suppressed_code_rejects_without_notification() {
        let transport = Arc::new(FakeTransport::new());
        let notifier = Arc::new(BroadcastNotifier::new());
        let settings = ClientSettings {
            suppressed_codes: vec![7],
            ..ClientSettings::default()
        };
        let client = build_client(settings, transport.clone(), notifier.clone());
        let mut notifications = notifier.subscribe();
        transport.respond_json("/a", 200, json!({"code": 7, "message": "quiet"}));

        let result = client.get("/a", Value::Null, RequestOptions::new()).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::ApplicationCode);
        assert!(notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_http_status_error_is_classified() {
        let (client, transport, notifier) = setup();
        let mut notifications = notifier.subscribe();
        transport.respond_json("/secret", 403, json!({"code": 403}));

        let error = client
            .get("/secret", Value::Null, RequestOptions::new())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::HttpStatus);
        assert_eq!(error.to_string(), "forbidden");
        assert_eq!(notifications.recv().await.unwrap().message, "forbidden");
    }

    #[tokio::test]
    async fn test_network_error_rejects_and_notifies() {
        let (client, _, notifier) = setup();
        let mut notifications = notifier.subscribe();

        let error = client
            .get("/unrouted", Value::Null, RequestOptions::new().global_error(false))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Transport);
        assert_eq!(notifications.recv().await.unwrap().message, "network error");
        assert!(client.queue().is_empty());
    }

    #[tokio::test]
    async fn test_original_response_and_text_payloads() {
        let (client, transport, _) = setup();
        transport.respond_json("/env", 200, json!({"code": 0}));
        transport.respond_text("/readme", "# Title");

        let envelope = client
            .get("/env", Value::Null, RequestOptions::new().original_response(true))
            .await
            .unwrap();
        match envelope {
            ResponseValue::Original(TransportResponse { status, url, .. }) => {
                assert_eq!(status, 200);
                assert_eq!(url, "/env");
            }
            other => panic!("unexpected value: {:?}", other),
        }

        let readme = client.get("/readme", Value::Null, RequestOptions::new()).await.unwrap();
        assert_eq!(readme.as_text(), Some("# Title"));
    }

    #[tokio::test]
    async fn test_remove_uses_delete_with_body() {
        let (client, transport, _) = setup();
        transport.respond_json("/items/3", 200, json!({"code": 0}));

        client
            .remove("/items/$id", json!({"$id": 3, "force": true}), RequestOptions::new())
            .await
            .unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].method, Method::Delete);
        assert_eq!(sent[0].body, Some(json!({"force": true})));
    }

    #[tokio::test]
    async fn test_invalid_params_never_reach_transport() {
        let (client, transport, _) = setup();

        let error = client
            .post("/a", json!([1, 2]), RequestOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(error, RequestError::InvalidParams(_)));
        assert_eq!(transport.call_count(), 0);
        assert!(client.cache().is_empty());
    }

    #[tokio::test]
    async fn test_endpoint_binds_method_and_url() {
        let (client, transport, _) = setup();
        transport.respond_json("/api/user/login", 200, json!({"code": 0, "token": "t"}));

        let login = client.endpoint(Method::Post, "/api/user/login");
        let value = login.call(json!({"user": "a"})).await.unwrap();

        assert_eq!(login.method(), Method::Post);
        assert_eq!(value.as_data().unwrap()["token"], "t");
        assert_eq!(transport.requests()[0].body, Some(json!({"user": "a"})));
    }

    #[tokio::test]
    async fn test_custom_request_id_shares_cache_across_urls() {
        let (client, transport, _) = setup();
        transport.respond_json_after("/a", 200, json!({"code": 0}), Duration::from_millis(20));
        transport.respond_json("/b", 200, json!({"code": 0}));

        let options = RequestOptions::new().with_request_id("shared");
        let first = client.dispatch(Method::Get, "/a", Value::Null, &options).await;
        let second = client
            .dispatch(Method::Get, "/b", Value::Null, &options.clone().from_cache(true))
            .await;

        assert!(first.ptr_eq(&second));
        assert_eq!(transport.call_count(), 1);
        assert!(second.await.is_ok());
    }
}
