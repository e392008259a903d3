//! # Integration Tests
//!
//! Cross-crate and end-to-end tests.
//!
//! Covers:
//! - Contract snapshot checks
//! - Full batch over HTTP against a local mock API (no network)
//! - Precondition aborts before any request

#[cfg(test)]
mod contract_tests {
    use contracts::{BroadcastBlueprint, BroadcastResult, DeliveryState, Recipient};

    #[test]
    fn test_default_blueprint_passes_validation() {
        let blueprint = BroadcastBlueprint::default();
        config_loader::ConfigLoader::validate(&blueprint).unwrap();
        assert_eq!(blueprint.api.base_url, "https://api.mekari.com");
        assert_eq!(blueprint.run.log_delay().as_secs(), 10);
    }

    #[test]
    fn test_result_columns_match_fields() {
        let result = BroadcastResult::pending(&Recipient::new("1", "a"));
        let value = serde_json::to_value(&result).unwrap();

        let mut fields: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        let mut columns = batch_runner::COLUMNS.to_vec();
        fields.sort_unstable();
        columns.sort_unstable();
        assert_eq!(fields, columns);
    }

    #[test]
    fn test_summary_counts_every_accepted_state() {
        let mut aggregator = observability::BatchMetricsAggregator::new();
        for state in [
            DeliveryState::Logged,
            DeliveryState::SentNoId,
            DeliveryState::LogFailed,
            DeliveryState::SendFailed,
        ] {
            aggregator.update(state, None);
        }

        let summary = aggregator.summary();
        assert_eq!(summary.accepted, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.log_fetches, 2);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::sync::Arc;
    use std::time::Duration;

    use batch_runner::{to_table, BatchRunner, DeliveryState};
    use chrono::{DateTime, Utc};
    use contracts::{Credentials, HttpMethod, Media, SourceConfig, TemplateConfig};
    use dispatcher::{ReqwestTransport, Signer, BROADCAST_DIRECT_PATH};
    use ingestion::{IngestionError, RecipientReader};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
    use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

    const CLIENT_ID: &str = "client-e2e";
    const CLIENT_SECRET: &str = "secret-e2e";

    /// Accepts only requests whose Authorization matches a signature
    /// recomputed from the request's own Date header
    struct ValidSignature;

    impl Match for ValidSignature {
        fn matches(&self, request: &Request) -> bool {
            let header_value = |name: &str| {
                request
                    .headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            let (Some(date), Some(authorization)) =
                (header_value("date"), header_value("authorization"))
            else {
                return false;
            };
            let Ok(at) = DateTime::parse_from_rfc2822(&date) else {
                return false;
            };
            let method = match request.method.as_str() {
                "GET" => HttpMethod::Get,
                "POST" => HttpMethod::Post,
                _ => return false,
            };

            let expected = Signer::new(Credentials::new(CLIENT_ID, CLIENT_SECRET)).sign_at(
                method,
                request.url.path(),
                at.with_timezone(&Utc),
            );
            expected.date == date && expected.authorization == authorization
        }
    }

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn runner(base_url: &str, delay: Duration) -> BatchRunner<ReqwestTransport> {
        let transport = ReqwestTransport::new(base_url, Duration::from_secs(5)).unwrap();
        BatchRunner::new(
            Arc::new(transport),
            Credentials::new(CLIENT_ID, CLIENT_SECRET),
            TemplateConfig::new("tpl-e2e", "chan-e2e"),
            delay,
        )
        .unwrap()
    }

    async fn mount_send(server: &MockServer, to_number: &str, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(BROADCAST_DIRECT_PATH))
            .and(body_partial_json(json!({ "to_number": to_number })))
            .respond_with(response)
            .expect(1)
            .mount(server)
            .await;
    }

    async fn mount_log(server: &MockServer, broadcast_id: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/qontak/chat/v1/broadcasts/{broadcast_id}/whatsapp/log")))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(server)
            .await;
    }

    /// CSV → BatchRunner → mock API → results CSV, with #2 rejected
    #[tokio::test]
    async fn test_e2e_batch_with_rejected_recipient() {
        let server = MockServer::start().await;
        mount_send(
            &server,
            "62811001",
            ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "bc_1"}})),
        )
        .await;
        mount_send(
            &server,
            "62811002",
            ResponseTemplate::new(422).set_body_json(json!({"error": "invalid number"})),
        )
        .await;
        mount_send(
            &server,
            "62811003",
            ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "bc_3"}})),
        )
        .await;
        mount_log(&server, "bc_1", r#"{"data":[{"status":"delivered"}]}"#).await;
        mount_log(&server, "bc_3", r#"{"data":[{"status":"read"}]}"#).await;

        let csv = write_csv("to_name,to_number,city\nAni,62811001,Bandung\nBudi,62811002,Medan\nCitra,62811003,Depok\n");
        let source = SourceConfig::Csv {
            path: csv.path().to_path_buf(),
        };
        let recipients = ingestion::load_recipients(&source).await.unwrap();

        let run = runner(&server.uri(), Duration::ZERO).run(&recipients).await;

        assert!(run.completed);
        assert_eq!(run.results.len(), 3);
        assert_eq!(
            run.states,
            vec![DeliveryState::Logged, DeliveryState::SendFailed, DeliveryState::Logged]
        );

        let rejected = &run.results[1];
        assert_eq!(rejected.to_name, "Budi");
        assert_eq!(rejected.status_code, Some(422));
        assert_eq!(rejected.broadcast_id, None);
        assert!(rejected.error.as_deref().unwrap().contains("invalid number"));
        assert_eq!(rejected.log_status_code, None);

        assert_eq!(run.results[0].broadcast_id.as_deref(), Some("bc_1"));
        assert!(run.results[2].log_response.as_deref().unwrap().contains("read"));

        let table = to_table(&run.results).to_csv_string().unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("62811002,Budi,422,,"));
        assert!(lines[1].starts_with("62811001,Ani,201,bc_1,"));
    }

    #[tokio::test]
    async fn test_e2e_requests_are_signed_and_typed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(BROADCAST_DIRECT_PATH))
            .and(header("content-type", "application/json"))
            .and(header_exists("date"))
            .and(ValidSignature)
            .and(body_partial_json(json!({
                "message_template_id": "tpl-media",
                "channel_integration_id": "chan-media",
                "language": {"code": "id"},
                "parameters": {"header": {"format": "IMAGE"}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "bc_123"}})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/qontak/chat/v1/broadcasts/bc_123/whatsapp/log"))
            .and(ValidSignature)
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(server.uri(), Duration::from_secs(5)).unwrap();
        let template = TemplateConfig::new("tpl-media", "chan-media")
            .with_media(Media::from_parts(Some("https://cdn.example.test/p.jpg"), None));
        let runner = BatchRunner::new(
            Arc::new(transport),
            Credentials::new(CLIENT_ID, CLIENT_SECRET),
            template,
            Duration::ZERO,
        )
        .unwrap();

        let recipients = RecipientReader::from_reader("to_number,to_name\n62899,Dewi\n".as_bytes()).unwrap();
        let run = runner.run(&recipients).await;

        assert_eq!(run.states, vec![DeliveryState::Logged]);
        assert_eq!(run.results[0].log_status_code, Some(200));

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 2);
        assert!(received[1].url.path().contains("bc_123"));
    }

    #[tokio::test]
    async fn test_e2e_missing_column_aborts_before_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let csv = write_csv("phone,to_name\n62811,Ani\n");
        let source = SourceConfig::Csv {
            path: csv.path().to_path_buf(),
        };
        let err = ingestion::load_recipients(&source).await.unwrap_err();

        match err {
            IngestionError::MissingColumns { missing } => assert_eq!(missing, vec!["to_number"]),
            other => panic!("unexpected {other:?}"),
        }
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_e2e_missing_credentials_abort() {
        let transport = ReqwestTransport::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let result = BatchRunner::new(
            Arc::new(transport),
            Credentials::new(CLIENT_ID, ""),
            TemplateConfig::new("tpl", "chan"),
            Duration::ZERO,
        );

        let err = result.err().unwrap();
        assert!(err.to_string().contains("client_secret"));
    }

    #[tokio::test]
    async fn test_e2e_unreachable_api_isolates_every_recipient() {
        let recipients =
            RecipientReader::from_reader("to_number,to_name\n1,a\n2,b\n".as_bytes()).unwrap();
        let run = runner("http://127.0.0.1:9", Duration::ZERO).run(&recipients).await;

        assert!(run.completed);
        assert_eq!(run.results.len(), 2);
        for result in &run.results {
            assert_eq!(result.status_code, None);
            assert!(result.error.is_some());
        }
        assert_eq!(run.count(DeliveryState::SendFailed), 2);
    }

    #[tokio::test]
    async fn test_e2e_config_drives_run() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({"status": "queued"})))
            .expect(2)
            .mount(&server)
            .await;

        let csv = write_csv("to_number,to_name\n1,a\n2,b\n3,c\n");
        let config = format!(
            r#"
[api]
base_url = "{}"
timeout_secs = 5

[credentials]
client_id = "{CLIENT_ID}"
client_secret = "{CLIENT_SECRET}"

[template]
template_id = "tpl"
channel_id = "chan"

[run]
log_delay_secs = 0
max_rows = 2

[source]
kind = "csv"
path = "{}"
"#,
            server.uri(),
            csv.path().display()
        );
        let blueprint =
            config_loader::ConfigLoader::load_from_str(&config, config_loader::ConfigFormat::Toml)
                .unwrap();

        let recipients = ingestion::load_recipients(blueprint.source.as_ref().unwrap())
            .await
            .unwrap();
        let recipients = ingestion::apply_row_limit(recipients, blueprint.run.row_limit());

        let transport =
            ReqwestTransport::new(&blueprint.api.base_url, blueprint.api.timeout()).unwrap();
        let run = BatchRunner::new(
            Arc::new(transport),
            blueprint.credentials(),
            blueprint.template_config(),
            blueprint.run.log_delay(),
        )
        .unwrap()
        .run(&recipients)
        .await;

        assert_eq!(run.results.len(), 2);
        assert_eq!(run.count(DeliveryState::SentNoId), 2);

        let mut aggregator = observability::BatchMetricsAggregator::new();
        for state in &run.states {
            aggregator.update(*state, None);
        }
        assert_eq!(aggregator.summary().accepted, 2);
    }
}
