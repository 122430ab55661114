use infrastructure::config::Config;
use infrastructure::openrouter_client::{build_prompt, MISSING_KEY_ANSWER};
use presentation::http::LIVENESS_MESSAGE;
use serde_json::json;
use tests::{get_root, post_question, router, Upstreams};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn answers_from_retrieved_context() {
    let upstreams = Upstreams::start().await;
    upstreams.mount_embedding(&[0.1, 0.2]).await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(header("Api-Key", tests::PINECONE_KEY))
        .and(body_json(json!({"vector": [0.1, 0.2], "topK": 3, "includeMetadata": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"matches": [{"metadata": {"texto": "X is a thing."}}]})),
        )
        .expect(1)
        .mount(&upstreams.pinecone)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_json(json!({
            "model": "mistralai/mistral-7b-instruct",
            "messages": [{"role": "user", "content": build_prompt("X is a thing.", "What is X?")}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"choices": [{"message": {"content": "X is a thing, confirmed."}}]}),
        ))
        .expect(1)
        .mount(&upstreams.openrouter)
        .await;

    let (status, body) =
        post_question(router(&upstreams.config()), r#"{"pergunta":"What is X?"}"#).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"resposta": "X is a thing, confirmed."}));
}

#[tokio::test]
async fn context_keeps_order_and_blanks() {
    let upstreams = Upstreams::start().await;
    upstreams.mount_embedding(&[1.0]).await;
    upstreams
        .mount_search(json!({"matches": [
            {"score": 0.9, "metadata": {"texto": "A"}},
            {"score": 0.8, "metadata": {}},
            {"score": 0.7, "metadata": {"texto": "C"}}
        ]}))
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_json(json!({
            "model": "mistralai/mistral-7b-instruct",
            "messages": [{"role": "user", "content": build_prompt("A\n\nC", "q")}]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": [{"message": {"content": "ok"}}]})),
        )
        .expect(1)
        .mount(&upstreams.openrouter)
        .await;

    let (status, body) = post_question(router(&upstreams.config()), r#"{"pergunta":"q"}"#).await;

    assert_eq!(status, 200);
    assert_eq!(body["resposta"], "ok");
}

#[tokio::test]
async fn search_without_matches_is_generic_500() {
    let upstreams = Upstreams::start().await;
    upstreams.mount_embedding(&[0.1, 0.2]).await;
    upstreams
        .mount_search(json!({"code": 5, "message": "Index not found"}))
        .await;
    upstreams.mount_chat("never used").await;

    let (status, body) = post_question(router(&upstreams.config()), r#"{"pergunta":"q"}"#).await;

    assert_eq!(status, 500);
    assert_eq!(body, json!({"erro": "Erro ao processar a solicitação"}));
    let chat_calls = upstreams
        .openrouter
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/chat/completions")
        .count();
    assert_eq!(chat_calls, 0);
}

#[tokio::test]
async fn non_json_upstream_is_generic_500() {
    let upstreams = Upstreams::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&upstreams.openrouter)
        .await;

    let (status, body) = post_question(router(&upstreams.config()), r#"{"pergunta":"q"}"#).await;

    assert_eq!(status, 500);
    assert_eq!(body["erro"], "Erro ao processar a solicitação");
}

#[tokio::test]
async fn missing_question_never_reaches_upstreams() {
    let upstreams = Upstreams::start().await;

    for payload in ["{}", r#"{"pergunta":null}"#, r#"{"pergunta":""}"#] {
        let (status, body) = post_question(router(&upstreams.config()), payload).await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({"erro": "Pergunta não enviada."}));
    }
    assert_eq!(upstreams.request_count().await, 0);
}

#[tokio::test]
async fn unconfigured_service_answers_with_placeholder() {
    let (status, body) =
        post_question(router(&Config::from_lookup(|_| None)), r#"{"pergunta":"q"}"#).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"resposta": MISSING_KEY_ANSWER}));
}

#[tokio::test]
async fn missing_vector_store_settings_skip_search() {
    let upstreams = Upstreams::start().await;
    upstreams.mount_embedding(&[0.3]).await;
    upstreams.mount_chat("from empty context").await;
    let mut config = upstreams.config();
    config.pinecone_environment = None;

    let (status, body) = post_question(router(&config), r#"{"pergunta":"q"}"#).await;

    assert_eq!(status, 200);
    assert_eq!(body["resposta"], "from empty context");
    assert!(upstreams.pinecone.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_chat_choices_yield_placeholder() {
    let upstreams = Upstreams::start().await;
    upstreams.mount_embedding(&[0.3]).await;
    upstreams.mount_search(json!({"matches": []})).await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&upstreams.openrouter)
        .await;

    let (status, body) = post_question(router(&upstreams.config()), r#"{"pergunta":"q"}"#).await;

    assert_eq!(status, 200);
    assert_eq!(body["resposta"], "Sem resposta");
}

#[tokio::test]
async fn root_is_live_regardless_of_config() {
    let upstreams = Upstreams::start().await;

    for config in [Config::from_lookup(|_| None), upstreams.config()] {
        let (status, text) = get_root(router(&config)).await;
        assert_eq!(status, 200);
        assert_eq!(text, LIVENESS_MESSAGE);
    }
    assert_eq!(upstreams.request_count().await, 0);
}

#[tokio::test]
async fn loosely_typed_matches_are_answered() {
    let upstreams = Upstreams::start().await;
    upstreams.mount_embedding(&[0.4]).await;
    upstreams
        .mount_search(json!({"matches": [
            {"id": 7, "score": "0.9", "metadata": {"texto": "A"}},
            {"metadata": "x"}
        ]}))
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_json(json!({
            "model": "mistralai/mistral-7b-instruct",
            "messages": [{"role": "user", "content": build_prompt("A\n", "q")}]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": [{"message": {"content": "fine"}}]})),
        )
        .expect(1)
        .mount(&upstreams.openrouter)
        .await;

    let (status, body) = post_question(router(&upstreams.config()), r#"{"pergunta":"q"}"#).await;

    assert_eq!(status, 200);
    assert_eq!(body["resposta"], "fine");
}
