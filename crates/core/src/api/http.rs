use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use super::{ApiError, TodoApi};
use crate::config::ClientConfig;
use crate::model::{
    CompletionUpdate, NewTaskRequest, SearchHit, SearchRequest, SearchResponse,
    SuggestionRequest, SuggestionResponse, Task, TaskId, UpdateAck,
};

/// [`TodoApi`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    base_url: Url,
    client: Client,
}

impl HttpTodoApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base_url: config.api_url().clone(),
            client: builder.build()?,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn list(&self) -> Result<Vec<Task>, ApiError> {
        let url = self.endpoint(&["todos", ""]);
        tracing::debug!(%url, "listing tasks");
        let response = self.client.get(url).send().await?;
        decode(response).await
    }

    async fn create(&self, text: &str) -> Result<Task, ApiError> {
        let url = self.endpoint(&["todos", ""]);
        let body = NewTaskRequest {
            text,
            completed: false,
        };
        let response = self.client.post(url).json(&body).send().await?;
        decode(response).await
    }

    async fn update_completed(
        &self,
        id: &TaskId,
        completed: bool,
    ) -> Result<Option<bool>, ApiError> {
        let url = self.endpoint(&["todos", id.as_str()]);
        let response = self
            .client
            .put(url)
            .json(&CompletionUpdate { completed })
            .send()
            .await?;
        let bytes = checked(response).await?.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }
        // Anything beyond the status is advisory; an unreadable body is not a failure.
        Ok(serde_json::from_slice::<UpdateAck>(&bytes)
            .ok()
            .and_then(|ack| ack.completed))
    }

    async fn delete(&self, id: &TaskId) -> Result<(), ApiError> {
        let url = self.endpoint(&["todos", id.as_str()]);
        let response = self.client.delete(url).send().await?;
        checked(response).await?;
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ApiError> {
        let url = self.endpoint(&["todos", "search"]);
        let response = self
            .client
            .post(url)
            .json(&SearchRequest { query })
            .send()
            .await?;
        let parsed: SearchResponse = decode(response).await?;
        Ok(parsed.results)
    }

    async fn suggest(&self, tasks: &[String]) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(&["todos", "suggest"]);
        let response = self
            .client
            .post(url)
            .json(&SuggestionRequest { tasks })
            .send()
            .await?;
        let parsed: SuggestionResponse = decode(response).await?;
        Ok(parsed.suggestions)
    }

    async fn health(&self) -> Result<(), ApiError> {
        let response = self.client.get(self.base_url.clone()).send().await?;
        checked(response).await?;
        Ok(())
    }
}

async fn checked(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), "task service returned an error status");
    Err(ApiError::status(status.as_u16(), body))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = checked(response).await?.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api(base: &str) -> HttpTodoApi {
        HttpTodoApi::new(&ClientConfig::from_api_url(base).unwrap()).unwrap()
    }

    #[test]
    fn collection_endpoint_keeps_trailing_slash() {
        let api = api("http://127.0.0.1:8000");
        assert_eq!(
            api.endpoint(&["todos", ""]).as_str(),
            "http://127.0.0.1:8000/todos/"
        );
    }

    #[test]
    fn item_endpoint_escapes_ids() {
        let api = api("https://example.com/api/");
        let id = TaskId::from("a/b");
        assert_eq!(
            api.endpoint(&["todos", id.as_str()]).as_str(),
            "https://example.com/api/todos/a%2Fb"
        );
    }

    #[test]
    fn extra_slashes_on_base_never_reach_the_path() {
        let api = api("https://example.com/api///");
        assert_eq!(
            api.endpoint(&["todos", ""]).as_str(),
            "https://example.com/api/todos/"
        );
        assert_eq!(
            api.endpoint(&["todos", "7"]).as_str(),
            "https://example.com/api/todos/7"
        );
    }

    #[test]
    fn action_endpoints_live_under_todos() {
        let api = api("http://localhost:8081");
        assert_eq!(
            api.endpoint(&["todos", "search"]).as_str(),
            "http://localhost:8081/todos/search"
        );
        assert_eq!(
            api.endpoint(&["todos", "suggest"]).as_str(),
            "http://localhost:8081/todos/suggest"
        );
    }

    async fn served() -> (MockServer, HttpTodoApi) {
        let server = MockServer::start().await;
        let api = api(&server.uri());
        (server, api)
    }

    #[tokio::test]
    async fn list_decodes_numeric_ids() {
        let (server, api) = served().await;
        Mock::given(method("GET"))
            .and(path("/todos/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "text": "buy milk", "completed": false},
                {"id": 2, "text": "call mom", "completed": true}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(
            api.list().await.unwrap(),
            vec![
                Task::new("1", "buy milk", false),
                Task::new("2", "call mom", true)
            ]
        );
    }

    #[tokio::test]
    async fn create_posts_text_with_completed_false() {
        let (server, api) = served().await;
        Mock::given(method("POST"))
            .and(path("/todos/"))
            .and(body_json(json!({"text": "write tests", "completed": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 2, "text": "write tests", "completed": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let created = api.create("write tests").await.unwrap();
        assert_eq!(created, Task::new("2", "write tests", false));
    }

    #[tokio::test]
    async fn update_puts_completed_and_reads_echo() {
        let (server, api) = served().await;
        Mock::given(method("PUT"))
            .and(path("/todos/3"))
            .and(body_json(json!({"completed": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 3, "text": "ship release", "completed": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let echoed = api.update_completed(&TaskId::from("3"), true).await.unwrap();
        assert_eq!(echoed, Some(true));
    }

    #[tokio::test]
    async fn update_with_empty_body_has_no_echo() {
        let (server, api) = served().await;
        Mock::given(method("PUT"))
            .and(path("/todos/3"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let echoed = api.update_completed(&TaskId::from("3"), false).await.unwrap();
        assert_eq!(echoed, None);
    }

    #[tokio::test]
    async fn missing_task_surfaces_status_and_body() {
        let (server, api) = served().await;
        Mock::given(method("DELETE"))
            .and(path("/todos/9"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Todo not found"))
            .expect(1)
            .mount(&server)
            .await;

        let err = api.delete(&TaskId::from("9")).await.unwrap_err();
        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "Todo not found");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_succeeds_on_2xx() {
        let (server, api) = served().await;
        Mock::given(method("DELETE"))
            .and(path("/todos/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        api.delete(&TaskId::from("1")).await.unwrap();
    }

    #[tokio::test]
    async fn search_unwraps_results_envelope() {
        let (server, api) = served().await;
        Mock::given(method("POST"))
            .and(path("/todos/search"))
            .and(body_json(json!({"query": "groceries"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": 1, "text": "buy milk", "score": 0.92}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let hits = api.search("groceries").await.unwrap();
        assert_eq!(
            hits,
            vec![SearchHit {
                id: TaskId::from("1"),
                text: "buy milk".into(),
                score: 0.92,
            }]
        );
    }

    #[tokio::test]
    async fn suggest_sends_task_texts_and_unwraps_envelope() {
        let (server, api) = served().await;
        Mock::given(method("POST"))
            .and(path("/todos/suggest"))
            .and(body_json(json!({"tasks": ["buy milk", "call mom"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "suggestions": ["water plants", "book dentist"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let texts = vec!["buy milk".to_string(), "call mom".to_string()];
        assert_eq!(
            api.suggest(&texts).await.unwrap(),
            vec!["water plants".to_string(), "book dentist".to_string()]
        );
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let (server, api) = served().await;
        Mock::given(method("GET"))
            .and(path("/todos/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        assert!(matches!(api.list().await, Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn health_probes_the_root() {
        let (server, api) = served().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        api.health().await.unwrap();

        server.reset().await;
        assert!(matches!(
            api.health().await,
            Err(ApiError::Status { status: 404, .. })
        ));
    }
}
