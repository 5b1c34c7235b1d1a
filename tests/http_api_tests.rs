//! End-to-end tests for the HTTP task API.
//!
//! Each test binds a server on an ephemeral port and drives it with either
//! [`HttpTaskClient`] or raw `reqwest` requests.

use std::sync::Arc;

use serde_json::{json, Value};
use weekboard::client::{HttpTaskClient, TaskApi, TaskBoard};
use weekboard::config::{ClientConfig, ServerConfig};
use weekboard::server::TaskServer;
use weekboard::ClientError;
use weekboard_tasks::{DayOfWeek, InMemoryTaskStore, UpdateTaskParams};

const TOKEN: &str = "test-token";

async fn spawn(mut config: ServerConfig) -> String {
    config.bind = "127.0.0.1:0".parse().unwrap();
    let base_path = config.base_path.clone();
    let server = TaskServer::new(config, Arc::new(InMemoryTaskStore::new()));
    let (addr, _handle) = server.start().await.unwrap();
    format!("http://{addr}{base_path}")
}

async fn spawn_default() -> String {
    spawn(ServerConfig::default()).await
}

fn client(base_url: &str) -> HttpTaskClient {
    HttpTaskClient::new(ClientConfig::new(base_url)).unwrap()
}

async fn raw_json(response: reqwest::Response) -> (u16, Value) {
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

mod crud_tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn health_reports_ok() {
        let url = spawn_default().await;
        assert_eq!(client(&url).health().await.unwrap().status, "ok");
    }

    #[tokio::test]
    async fn week_scenario_through_the_board() {
        let url = spawn_default().await;
        let board = TaskBoard::new(client(&url));
        board.load().await.unwrap();
        assert!(!board.is_loading());
        assert!(board.tasks().is_empty());

        let milk = board
            .save("  Buy milk  ", DayOfWeek::Monday, None)
            .await
            .unwrap();
        assert_eq!(milk.title, "Buy milk");
        assert_eq!(milk.day_of_week, "monday");
        assert!(!milk.completed);
        assert_eq!(milk.version, 1);

        board.toggle(&milk.id, true).await.unwrap();
        let monday = board.day_stats()[DayOfWeek::Monday.index()];
        assert_eq!((monday.completed, monday.total), (1, 1));
        assert_eq!(monday.completion_rate(), 100);
        assert_eq!(board.week_stats().completion_rate, 100);

        let gym = board.save("Gym", DayOfWeek::Friday, None).await.unwrap();
        assert_eq!(board.week_stats().completion_rate, 50);

        board.delete(&milk.id).await.unwrap();
        assert_eq!(board.tasks(), vec![gym.clone()]);
        assert_eq!(board.week_stats().completion_rate, 0);

        // A fresh board sees the same server state.
        let other = TaskBoard::new(client(&url));
        other.load().await.unwrap();
        assert_eq!(other.tasks(), vec![gym]);
    }

    #[tokio::test]
    async fn list_is_in_creation_order() {
        let url = spawn_default().await;
        let api = client(&url);
        let mut ids = Vec::new();
        for (i, day) in DayOfWeek::ALL.iter().enumerate() {
            let task = api
                .create_task(weekboard_tasks::CreateTaskParams::new(format!("t{i}"), *day))
                .await
                .unwrap();
            ids.push(task.id);
        }
        let listed: Vec<String> = api
            .list_tasks()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn edit_changes_title_and_day_only() {
        let url = spawn_default().await;
        let board = TaskBoard::new(client(&url));
        board.load().await.unwrap();
        let task = board.save("Draft", DayOfWeek::Tuesday, None).await.unwrap();
        board.toggle(&task.id, true).await.unwrap();
        let cached = board.read(|s| s.find(&task.id).cloned()).unwrap();

        let edited = board
            .save("Final", DayOfWeek::Sunday, Some(&cached))
            .await
            .unwrap();
        assert_eq!(edited.id, task.id);
        assert_eq!(edited.created_at, task.created_at);
        assert_eq!(edited.title, "Final");
        assert_eq!(edited.day_of_week, "sunday");
        assert!(edited.completed);
        assert_eq!(edited.version, 3);
    }

    #[tokio::test]
    async fn delete_unknown_id_succeeds() {
        let url = spawn_default().await;
        let response = reqwest::Client::new()
            .delete(format!("{url}/tasks/no-such-task"))
            .send()
            .await
            .unwrap();
        let (status, body) = raw_json(response).await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({ "success": true }));
    }

    #[tokio::test]
    async fn wire_shape_is_camel_case() {
        let url = spawn_default().await;
        let response = reqwest::Client::new()
            .post(format!("{url}/tasks"))
            .json(&json!({ "title": "Run", "dayOfWeek": "saturday", "id": "ignored" }))
            .send()
            .await
            .unwrap();
        let (status, body) = raw_json(response).await;
        assert_eq!(status, 200);
        let task = &body["task"];
        assert_ne!(task["id"], "ignored");
        assert_eq!(task["dayOfWeek"], "saturday");
        assert_eq!(task["completed"], false);
        assert!(task["createdAt"].as_str().unwrap().ends_with('Z'));
        assert_eq!(task["version"], 1);
    }
}

mod id_encoding_tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn id_with_query_characters_does_not_touch_other_records() {
        let url = spawn_default().await;
        let api = client(&url);
        let task = api
            .create_task(weekboard_tasks::CreateTaskParams::new("Keep", DayOfWeek::Monday))
            .await
            .unwrap();

        api.delete_task(&format!("{}?x", task.id)).await.unwrap();
        api.delete_task(&format!("{}#frag", task.id)).await.unwrap();
        assert_eq!(api.list_tasks().await.unwrap(), vec![task.clone()]);

        let err = api
            .update_task(&format!("{}?x", task.id), UpdateTaskParams::completion(true))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(!api.list_tasks().await.unwrap()[0].completed);
    }

    #[tokio::test]
    async fn id_with_slash_is_one_path_segment() {
        let url = spawn_default().await;
        let api = client(&url);
        api.delete_task("a/b").await.unwrap();

        let err = api
            .update_task("a/b", UpdateTaskParams::completion(true))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn encoded_ids_work_under_base_path() {
        let url = spawn(ServerConfig {
            base_path: "/board".to_string(),
            ..ServerConfig::default()
        })
        .await;
        let api = client(&url);
        let task = api
            .create_task(weekboard_tasks::CreateTaskParams::new("Nested", DayOfWeek::Friday))
            .await
            .unwrap();
        api.delete_task(&format!("{}/extra", task.id)).await.unwrap();
        assert_eq!(api.list_tasks().await.unwrap().len(), 1);
        api.delete_task(&task.id).await.unwrap();
        assert!(api.list_tasks().await.unwrap().is_empty());
    }
}

mod error_tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn missing_title_is_400() {
        let url = spawn_default().await;
        let response = reqwest::Client::new()
            .post(format!("{url}/tasks"))
            .json(&json!({ "title": "   ", "dayOfWeek": "monday" }))
            .send()
            .await
            .unwrap();
        let (status, body) = raw_json(response).await;
        assert_eq!(status, 400);
        assert!(body["error"].is_string());
        assert!(body["details"].as_str().unwrap().contains("title"));
    }

    #[tokio::test]
    async fn unknown_day_is_400() {
        let url = spawn_default().await;
        let response = reqwest::Client::new()
            .post(format!("{url}/tasks"))
            .json(&json!({ "title": "Nap", "dayOfWeek": "funday" }))
            .send()
            .await
            .unwrap();
        let (status, body) = raw_json(response).await;
        assert_eq!(status, 400);
        assert!(body["details"].as_str().unwrap().contains("dayOfWeek"));
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let url = spawn_default().await;
        let response = reqwest::Client::new()
            .post(format!("{url}/tasks"))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        let (status, body) = raw_json(response).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Invalid request body");
    }

    #[tokio::test]
    async fn update_unknown_id_is_404() {
        let url = spawn_default().await;
        let err = client(&url)
            .update_task("missing", UpdateTaskParams::completion(true))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn stale_expected_version_is_409_and_record_unchanged() {
        let url = spawn_default().await;
        let api = client(&url);
        let task = api
            .create_task(weekboard_tasks::CreateTaskParams::new("Read", DayOfWeek::Monday))
            .await
            .unwrap();
        api.update_task(&task.id, UpdateTaskParams::completion(true))
            .await
            .unwrap();

        let err = api
            .update_task(
                &task.id,
                UpdateTaskParams::edit("Stale", DayOfWeek::Monday).with_expected_version(1),
            )
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let stored = api.list_tasks().await.unwrap().remove(0);
        assert_eq!(stored.title, "Read");
        assert!(stored.completed);
        assert_eq!(stored.version, 2);
    }

    #[tokio::test]
    async fn board_with_version_checks_rejects_stale_toggle() {
        let url = spawn_default().await;
        let stale = TaskBoard::new(client(&url)).with_version_checks(true);
        let fresh = TaskBoard::new(client(&url)).with_version_checks(true);

        stale.load().await.unwrap();
        let task = stale.save("Plan", DayOfWeek::Wednesday, None).await.unwrap();
        fresh.load().await.unwrap();
        fresh.toggle(&task.id, true).await.unwrap();

        let err = stale.toggle(&task.id, true).await.unwrap_err();
        assert!(err.source.is_conflict());
        assert_eq!(err.user_message(), "Could not update task status");
        // The stale cache still holds what it had.
        assert_eq!(stale.tasks(), vec![task]);
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let api = client("http://127.0.0.1:1");
        let err = api.list_tasks().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(err.status(), None);
    }
}

mod auth_tests {
    use pretty_assertions::assert_eq;

    use super::*;

    async fn spawn_secured() -> String {
        spawn(ServerConfig {
            auth_token: Some(TOKEN.to_string()),
            ..ServerConfig::default()
        })
        .await
    }

    #[tokio::test]
    async fn missing_token_is_401() {
        let url = spawn_secured().await;
        let err = client(&url).list_tasks().await.unwrap_err();
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn wrong_token_is_401() {
        let url = spawn_secured().await;
        let api = HttpTaskClient::new(ClientConfig::new(&url).with_token("nope")).unwrap();
        let err = api
            .create_task(weekboard_tasks::CreateTaskParams::new("x", DayOfWeek::Monday))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn correct_token_is_accepted() {
        let url = spawn_secured().await;
        let api = HttpTaskClient::new(ClientConfig::new(&url).with_token(TOKEN)).unwrap();
        let task = api
            .create_task(weekboard_tasks::CreateTaskParams::new("x", DayOfWeek::Monday))
            .await
            .unwrap();
        assert_eq!(api.list_tasks().await.unwrap(), vec![task]);
    }

    #[tokio::test]
    async fn health_is_open() {
        let url = spawn_secured().await;
        assert_eq!(client(&url).health().await.unwrap().status, "ok");
    }
}

mod routing_tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn base_path_prefixes_every_route() {
        let url = spawn(ServerConfig {
            base_path: "/make-server-e1ba9efb".to_string(),
            ..ServerConfig::default()
        })
        .await;
        assert!(url.ends_with("/make-server-e1ba9efb"));

        let api = client(&url);
        assert_eq!(api.health().await.unwrap().status, "ok");
        assert!(api.list_tasks().await.unwrap().is_empty());

        let root = url.trim_end_matches("/make-server-e1ba9efb");
        let response = reqwest::get(format!("{root}/tasks")).await.unwrap();
        assert_eq!(response.status().as_u16(), 404);
    }

    #[tokio::test]
    async fn cors_preflight_is_answered() {
        let url = spawn(ServerConfig {
            auth_token: Some(TOKEN.to_string()),
            ..ServerConfig::default()
        })
        .await;
        let response = reqwest::Client::new()
            .request(reqwest::Method::OPTIONS, format!("{url}/tasks/abc"))
            .header("origin", "http://example.test")
            .header("access-control-request-method", "PUT")
            .header("access-control-request-headers", "authorization,content-type")
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        let methods = headers["access-control-allow-methods"].to_str().unwrap();
        assert!(methods.contains("PUT"));
        assert!(methods.contains("DELETE"));
        assert_eq!(headers["access-control-max-age"], "600");
    }

    #[tokio::test]
    async fn concurrent_toggles_all_apply() {
        let url = spawn_default().await;
        let api = client(&url);
        let task = api
            .create_task(weekboard_tasks::CreateTaskParams::new("Busy", DayOfWeek::Thursday))
            .await
            .unwrap();

        let updates = (0..8).map(|i| {
            let api = api.clone();
            let id = task.id.clone();
            async move {
                api.update_task(&id, UpdateTaskParams::completion(i % 2 == 0))
                    .await
            }
        });
        for result in futures::future::join_all(updates).await {
            result.unwrap();
        }

        let stored = api.list_tasks().await.unwrap().remove(0);
        assert_eq!(stored.version, 9);
    }
}
