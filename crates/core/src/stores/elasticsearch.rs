use crate::models::{
    IndexLayout, PageChunk, RetrievalMode, SearchHit, SearchQuery, SparseEmbedding,
    TabularRecord,
};
use crate::tabular::{DEFAULT_TEXT_COLUMN, TIMESTAMP_FIELD};
use crate::traits::DocumentIndex;
use crate::SearchError;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const BACKEND: &str = "elasticsearch";
const BM25_BOOST: f64 = 0.6;
const BULK_ERROR_PREVIEW: usize = 3;
/// Input field name the ELSER model reads from.
const MODEL_INPUT_FIELD: &str = "text_field";

#[derive(Debug, Clone)]
pub struct ElasticConfig {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub index_name: String,
    pub pipeline_id: String,
    pub model_id: String,
    pub text_field: String,
    pub tokens_field: String,
    pub request_timeout: Duration,
    pub verify_certs: bool,
    pub use_ml: bool,
    pub bulk_batch_size: usize,
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9200".to_string(),
            username: "elastic".to_string(),
            password: "changeme".to_string(),
            index_name: "chat_elser_description_only".to_string(),
            pipeline_id: "elser_v2_description_only".to_string(),
            model_id: ".elser_model_2_linux-x86_64".to_string(),
            text_field: DEFAULT_TEXT_COLUMN.to_string(),
            tokens_field: "ml.description_tokens".to_string(),
            request_timeout: Duration::from_secs(120),
            verify_certs: false,
            use_ml: true,
            bulk_batch_size: 500,
        }
    }
}

/// Bounds for waiting on a trained model download.
#[derive(Debug, Clone, Copy)]
pub struct ModelWaitOptions {
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for ModelWaitOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            max_attempts: 120,
        }
    }
}

pub struct ElasticsearchStore {
    client: Arc<Client>,
    base: Url,
    config: ElasticConfig,
}

impl ElasticsearchStore {
    pub fn new(config: ElasticConfig) -> Result<Self, SearchError> {
        let mut endpoint = config.endpoint.trim().to_string();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let base = Url::parse(&endpoint)?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(!config.verify_certs)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base,
            config,
        })
    }

    fn url(&self, path: &str) -> Result<Url, SearchError> {
        Ok(self.base.join(path)?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth(&self.config.username, Some(&self.config.password))
    }

    fn index_path(&self, suffix: &str) -> String {
        if suffix.is_empty() {
            self.config.index_name.clone()
        } else {
            format!("{}/{}", self.config.index_name, suffix)
        }
    }

    fn model_path(&self, suffix: &str) -> String {
        if suffix.is_empty() {
            format!("_ml/trained_models/{}", self.config.model_id)
        } else {
            format!("_ml/trained_models/{}/{}", self.config.model_id, suffix)
        }
    }

    /// Creates the index, or updates the mapping when it already exists.
    pub async fn ensure_index(&self, layout: IndexLayout) -> Result<(), SearchError> {
        let properties = index_properties(&self.config, layout);

        let response = if self.index_exists().await? {
            self.request(Method::PUT, self.url(&self.index_path("_mapping"))?)
                .json(&json!({ "properties": properties }))
                .send()
                .await?
        } else {
            self.request(Method::PUT, self.url(&self.index_path(""))?)
                .json(&json!({ "mappings": { "properties": properties } }))
                .send()
                .await?
        };

        read_json(response, "index setup").await?;
        info!(index = %self.config.index_name, ?layout, "index mapping ready");
        Ok(())
    }

    pub async fn ensure_pipeline(&self) -> Result<(), SearchError> {
        if !self.config.use_ml {
            return Ok(());
        }

        let response = self
            .request(
                Method::PUT,
                self.url(&format!("_ingest/pipeline/{}", self.config.pipeline_id))?,
            )
            .json(&pipeline_body(&self.config))
            .send()
            .await?;

        read_json(response, "pipeline setup").await?;
        info!(pipeline = %self.config.pipeline_id, "ingest pipeline ready");
        Ok(())
    }

    /// Downloads the trained model if needed and starts a deployment.
    pub async fn ensure_model(&self, wait: ModelWaitOptions) -> Result<(), SearchError> {
        let response = self
            .request(Method::GET, self.url(&self.model_path(""))?)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            info!(model = %self.config.model_id, "creating trained model");
            let response = self
                .request(Method::PUT, self.url(&self.model_path(""))?)
                .json(&json!({ "input": { "field_names": [MODEL_INPUT_FIELD] } }))
                .send()
                .await?;
            read_json(response, "model creation").await?;
        } else {
            read_json(response, "model lookup").await?;
        }

        self.wait_for_model_definition(wait).await?;

        let mut url = self.url(&self.model_path("deployment/_start"))?;
        url.query_pairs_mut().append_pair("wait_for", "started");
        let response = self.request(Method::POST, url).send().await?;

        if response.status() == StatusCode::CONFLICT {
            debug!(model = %self.config.model_id, "deployment already started");
            return Ok(());
        }

        read_json(response, "model deployment").await?;
        info!(model = %self.config.model_id, "model deployment started");
        Ok(())
    }

    async fn wait_for_model_definition(&self, wait: ModelWaitOptions) -> Result<(), SearchError> {
        let mut url = self.url(&self.model_path(""))?;
        url.query_pairs_mut().append_pair("include", "definition_status");

        for attempt in 1..=wait.max_attempts.max(1) {
            let response = self.request(Method::GET, url.clone()).send().await?;
            let body = read_json(response, "model status").await?;

            if model_fully_defined(&body) {
                return Ok(());
            }

            debug!(attempt, model = %self.config.model_id, "waiting for model download");
            tokio::time::sleep(wait.poll_interval).await;
        }

        Err(SearchError::NotReady(format!(
            "model {} was not fully defined after {} checks",
            self.config.model_id, wait.max_attempts
        )))
    }

    pub async fn delete_index(&self) -> Result<(), SearchError> {
        let response = self
            .request(Method::DELETE, self.url(&self.index_path(""))?)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }

        read_json(response, "index deletion").await?;
        Ok(())
    }

    pub async fn infer_sparse(&self, text: &str) -> Result<SparseEmbedding, SearchError> {
        let mut doc = Map::new();
        doc.insert(MODEL_INPUT_FIELD.to_string(), Value::String(text.to_string()));

        let response = self
            .request(Method::POST, self.url(&self.model_path("_infer"))?)
            .json(&json!({ "docs": [doc] }))
            .send()
            .await?;

        let body = read_json(response, "inference").await?;
        parse_inference(&body)
    }

    async fn bulk_index(&self, documents: Vec<(Option<String>, Value)>) -> Result<usize, SearchError> {
        if documents.is_empty() {
            return Ok(0);
        }

        let pipeline = self
            .config
            .use_ml
            .then_some(self.config.pipeline_id.as_str());
        let mut url = self.url("_bulk")?;
        url.query_pairs_mut().append_pair("refresh", "wait_for");

        let mut indexed = 0;
        for batch in documents.chunks(self.config.bulk_batch_size.max(1)) {
            let payload = bulk_payload(&self.config.index_name, pipeline, batch)?;

            let response = self
                .request(Method::POST, url.clone())
                .header("Content-Type", "application/x-ndjson")
                .body(payload)
                .send()
                .await?;

            let body = read_json(response, "bulk").await?;
            indexed += check_bulk_response(&body)?;
            debug!(indexed, total = documents.len(), "bulk batch accepted");
        }

        Ok(indexed)
    }
}

#[async_trait]
impl DocumentIndex for ElasticsearchStore {
    async fn index_exists(&self) -> Result<bool, SearchError> {
        let response = self
            .request(Method::HEAD, self.url(&self.index_path(""))?)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(SearchError::BackendResponse {
                backend: BACKEND.to_string(),
                details: format!("index lookup returned {status}"),
            }),
        }
    }

    async fn count(&self) -> Result<u64, SearchError> {
        let response = self
            .request(Method::GET, self.url(&self.index_path("_count"))?)
            .send()
            .await?;

        let body = read_json(response, "count").await?;
        body.get("count")
            .and_then(Value::as_u64)
            .ok_or_else(|| SearchError::BackendResponse {
                backend: BACKEND.to_string(),
                details: "count response had no count".to_string(),
            })
    }

    async fn reset(&self, layout: IndexLayout) -> Result<(), SearchError> {
        self.delete_index().await?;
        self.ensure_index(layout).await?;
        self.ensure_pipeline().await
    }

    async fn index_records(&self, records: &[TabularRecord]) -> Result<usize, SearchError> {
        let documents = records
            .iter()
            .map(|record| (record.id.clone(), Value::Object(record.source.clone())))
            .collect();
        self.bulk_index(documents).await
    }

    async fn index_page_chunks(&self, chunks: &[PageChunk]) -> Result<usize, SearchError> {
        let documents = chunks
            .iter()
            .map(|chunk| {
                (
                    Some(chunk.chunk_id.clone()),
                    page_chunk_source(&self.config.text_field, chunk),
                )
            })
            .collect();
        self.bulk_index(documents).await
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, SearchError> {
        let response = self
            .request(Method::POST, self.url(&self.index_path("_search"))?)
            .json(&search_body(&self.config, query))
            .send()
            .await?;

        let body = read_json(response, "search").await?;
        Ok(parse_hits(&body))
    }
}

async fn read_json(response: Response, context: &str) -> Result<Value, SearchError> {
    let status = response.status();
    if !status.is_success() {
        let details = response.text().await.unwrap_or_default();
        return Err(SearchError::BackendResponse {
            backend: BACKEND.to_string(),
            details: format!("{context} returned {status}: {details}"),
        });
    }

    Ok(response.json().await?)
}

/// Wraps `leaf` in `properties` objects for every dotted parent in `path`.
fn nested_property(path: &str, leaf: Value) -> (String, Value) {
    let mut segments = path.rsplit('.');
    let mut name = segments.next().unwrap_or(path).to_string();
    let mut value = leaf;

    for parent in segments {
        let mut properties = Map::new();
        properties.insert(name, value);
        value = json!({ "properties": properties });
        name = parent.to_string();
    }

    (name, value)
}

pub fn index_properties(config: &ElasticConfig, layout: IndexLayout) -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(config.text_field.clone(), json!({ "type": "text" }));
    properties.insert(
        TIMESTAMP_FIELD.to_string(),
        json!({ "type": "date", "ignore_malformed": true }),
    );

    if layout == IndexLayout::PageChunks {
        for keyword in ["chunk_id", "document_id", "source_path", "title"] {
            properties.insert(keyword.to_string(), json!({ "type": "keyword" }));
        }
        properties.insert("page".to_string(), json!({ "type": "integer" }));
        properties.insert("chunk_seq".to_string(), json!({ "type": "integer" }));
        properties.insert("chunk_index".to_string(), json!({ "type": "long" }));
    }

    let (name, value) = nested_property(&config.tokens_field, json!({ "type": "rank_features" }));
    properties.insert(name, value);
    properties
}

pub fn pipeline_body(config: &ElasticConfig) -> Value {
    let mut field_map = Map::new();
    field_map.insert(
        config.text_field.clone(),
        Value::String(MODEL_INPUT_FIELD.to_string()),
    );

    json!({
        "description": format!("ELSER text expansion of {}", config.text_field),
        "processors": [
            {
                "inference": {
                    "model_id": config.model_id,
                    "inference_config": {
                        "text_expansion": { "results_field": config.tokens_field }
                    },
                    "field_map": field_map,
                }
            }
        ]
    })
}

pub fn search_body(config: &ElasticConfig, query: &SearchQuery) -> Value {
    let mut text_match = Map::new();
    text_match.insert(
        config.text_field.clone(),
        json!({ "query": query.text, "boost": BM25_BOOST }),
    );
    let mut should = vec![json!({ "match": text_match })];

    if query.mode == RetrievalMode::Hybrid && config.use_ml {
        let mut expansion = Map::new();
        expansion.insert(
            config.tokens_field.clone(),
            json!({ "model_id": config.model_id, "model_text": query.text }),
        );
        should.push(json!({ "text_expansion": expansion }));
    }

    let mut body = json!({
        "size": query.size,
        "query": { "bool": { "should": should, "minimum_should_match": 1 } }
    });

    if let Some(fields) = query.fields.as_ref().filter(|fields| !fields.is_empty()) {
        body["_source"] = json!(fields);
    }

    body
}

pub fn bulk_payload(
    index_name: &str,
    pipeline: Option<&str>,
    documents: &[(Option<String>, Value)],
) -> Result<String, serde_json::Error> {
    let mut payload = String::new();

    for (id, source) in documents {
        let mut action = Map::new();
        action.insert("_index".to_string(), Value::String(index_name.to_string()));
        if let Some(id) = id {
            action.insert("_id".to_string(), Value::String(id.clone()));
        }
        if let Some(pipeline) = pipeline {
            action.insert("pipeline".to_string(), Value::String(pipeline.to_string()));
        }

        payload.push_str(&serde_json::to_string(&json!({ "index": action }))?);
        payload.push('\n');
        payload.push_str(&serde_json::to_string(source)?);
        payload.push('\n');
    }

    Ok(payload)
}

/// Returns the number of accepted items, or the rejected ones as an error.
pub fn check_bulk_response(body: &Value) -> Result<usize, SearchError> {
    let items = body
        .get("items")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    if !body.get("errors").and_then(Value::as_bool).unwrap_or(false) {
        return Ok(items.len());
    }

    let failures: Vec<String> = items
        .iter()
        .filter_map(|item| item.as_object().and_then(|item| item.values().next()))
        .filter_map(|outcome| outcome.get("error"))
        .map(Value::to_string)
        .collect();

    Err(SearchError::BulkRejected {
        failed: failures.len(),
        preview: failures.into_iter().take(BULK_ERROR_PREVIEW).collect(),
    })
}

pub fn parse_hits(body: &Value) -> Vec<SearchHit> {
    body.pointer("/hits/hits")
        .and_then(Value::as_array)
        .map(|hits| {
            hits.iter()
                .map(|raw| SearchHit {
                    id: raw
                        .get("_id")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    score: raw.get("_score").and_then(Value::as_f64).unwrap_or(0.0),
                    source: raw
                        .get("_source")
                        .and_then(Value::as_object)
                        .cloned()
                        .unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn parse_inference(body: &Value) -> Result<SparseEmbedding, SearchError> {
    let predicted = body
        .pointer("/inference_results/0/predicted_value")
        .and_then(Value::as_object)
        .ok_or_else(|| SearchError::BackendResponse {
            backend: BACKEND.to_string(),
            details: "inference response had no predicted_value".to_string(),
        })?;

    Ok(SparseEmbedding::from_weights(predicted.iter().filter_map(
        |(token, weight)| weight.as_f64().map(|weight| (token.clone(), weight as f32)),
    )))
}

fn model_fully_defined(body: &Value) -> bool {
    body.pointer("/trained_model_configs/0/fully_defined")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn page_chunk_source(text_field: &str, chunk: &PageChunk) -> Value {
    let mut source = Map::new();
    source.insert(text_field.to_string(), Value::String(chunk.text.clone()));
    source.insert("chunk_id".to_string(), json!(chunk.chunk_id));
    source.insert("document_id".to_string(), json!(chunk.document_id));
    source.insert("source_path".to_string(), json!(chunk.source_path));
    source.insert("title".to_string(), json!(chunk.title));
    source.insert("page".to_string(), json!(chunk.page));
    source.insert("chunk_seq".to_string(), json!(chunk.chunk_seq));
    source.insert("chunk_index".to_string(), json!(chunk.chunk_index));
    Value::Object(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_field_is_nested_by_path() {
        let properties = index_properties(&ElasticConfig::default(), IndexLayout::Records);

        assert_eq!(
            properties.get("ml"),
            Some(&json!({
                "properties": { "description_tokens": { "type": "rank_features" } }
            }))
        );
        assert_eq!(properties.get("Description"), Some(&json!({ "type": "text" })));
        assert_eq!(
            properties.get("timestamp"),
            Some(&json!({ "type": "date", "ignore_malformed": true }))
        );
        assert!(properties.get("page").is_none());
    }

    #[test]
    fn flat_tokens_field_stays_flat() {
        let config = ElasticConfig {
            tokens_field: "tokens".to_string(),
            ..ElasticConfig::default()
        };
        let properties = index_properties(&config, IndexLayout::PageChunks);

        assert_eq!(properties.get("tokens"), Some(&json!({ "type": "rank_features" })));
        assert_eq!(properties.get("page"), Some(&json!({ "type": "integer" })));
        assert_eq!(
            properties.get("source_path"),
            Some(&json!({ "type": "keyword" }))
        );
    }

    #[test]
    fn pipeline_maps_text_field_to_model_input() {
        let body = pipeline_body(&ElasticConfig::default());
        let inference = &body["processors"][0]["inference"];

        assert_eq!(inference["model_id"], ".elser_model_2_linux-x86_64");
        assert_eq!(
            inference["inference_config"]["text_expansion"]["results_field"],
            "ml.description_tokens"
        );
        assert_eq!(inference["field_map"]["Description"], "text_field");
    }

    #[test]
    fn hybrid_search_adds_text_expansion() {
        let config = ElasticConfig::default();
        let body = search_body(&config, &SearchQuery::new("seal leak", 7));
        let should = body["query"]["bool"]["should"].as_array().cloned().unwrap_or_default();

        assert_eq!(body["size"], 7);
        assert_eq!(body["query"]["bool"]["minimum_should_match"], 1);
        assert_eq!(should.len(), 2);
        assert_eq!(should[0]["match"]["Description"]["boost"], 0.6);
        assert_eq!(
            should[1]["text_expansion"]["ml.description_tokens"]["model_text"],
            "seal leak"
        );
        assert!(body.get("_source").is_none());
    }

    #[test]
    fn bm25_search_skips_text_expansion() {
        let config = ElasticConfig::default();
        let query = SearchQuery::new("seal leak", 3).with_mode(RetrievalMode::Bm25Only);
        let body = search_body(&config, &query);

        assert_eq!(body["query"]["bool"]["should"].as_array().map(Vec::len), Some(1));

        let disabled = ElasticConfig {
            use_ml: false,
            ..ElasticConfig::default()
        };
        let body = search_body(&disabled, &SearchQuery::new("seal leak", 3));
        assert_eq!(body["query"]["bool"]["should"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn source_projection_is_applied() {
        let mut query = SearchQuery::new("pump", 5);
        query.fields = Some(vec!["Description".to_string(), "timestamp".to_string()]);

        let body = search_body(&ElasticConfig::default(), &query);
        assert_eq!(body["_source"], json!(["Description", "timestamp"]));
    }

    #[test]
    fn bulk_payload_is_newline_terminated_ndjson() {
        let documents = vec![
            (Some("a-1".to_string()), json!({ "Description": "first" })),
            (None, json!({ "Description": "second" })),
        ];

        let payload = bulk_payload("idx", Some("pipe"), &documents).unwrap();
        let lines: Vec<&str> = payload.lines().collect();

        assert!(payload.ends_with('\n'));
        assert_eq!(lines.len(), 4);
        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["index"]["_id"], "a-1");
        assert_eq!(first["index"]["pipeline"], "pipe");
        let third: Value = serde_json::from_str(lines[2]).unwrap();
        assert!(third["index"].get("_id").is_none());
        assert_eq!(lines[3], r#"{"Description":"second"}"#);
    }

    #[test]
    fn bulk_payload_without_pipeline_omits_it() {
        let documents = vec![(None, json!({ "Description": "only" }))];
        let payload = bulk_payload("idx", None, &documents).unwrap();
        assert!(!payload.contains("pipeline"));
    }

    #[test]
    fn bulk_errors_are_reported_with_preview() {
        let item_error = |reason: &str| {
            json!({ "index": { "status": 400, "error": { "type": "mapper_parsing_exception", "reason": reason } } })
        };
        let body = json!({
            "errors": true,
            "items": [
                item_error("one"),
                { "index": { "status": 201 } },
                item_error("two"),
                item_error("three"),
                item_error("four"),
            ]
        });

        match check_bulk_response(&body) {
            Err(SearchError::BulkRejected { failed, preview }) => {
                assert_eq!(failed, 4);
                assert_eq!(preview.len(), 3);
                assert!(preview[0].contains("one"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn clean_bulk_response_counts_items() {
        let body = json!({
            "errors": false,
            "items": [{ "index": { "status": 201 } }, { "index": { "status": 201 } }]
        });
        assert_eq!(check_bulk_response(&body).unwrap(), 2);
    }

    #[test]
    fn hits_are_parsed_with_scores_and_sources() {
        let body = json!({
            "hits": { "hits": [
                { "_id": "1", "_score": 3.5, "_source": { "Description": "pump" } },
                { "_id": "2", "_source": {} }
            ] }
        });

        let hits = parse_hits(&body);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].score, 3.5);
        assert_eq!(hits[0].field_str("Description"), Some("pump"));
        assert_eq!(hits[1].score, 0.0);
        assert!(parse_hits(&json!({})).is_empty());
    }

    #[test]
    fn inference_response_becomes_sparse_embedding() {
        let body = json!({
            "inference_results": [
                { "predicted_value": { "pump": 1.25, "valve": 0.5, "seal": 2.0 } }
            ]
        });

        let embedding = parse_inference(&body).unwrap();
        assert_eq!(embedding.tokens[0].0, "seal");
        assert_eq!(embedding.tokens.len(), 3);
        assert!(parse_inference(&json!({ "inference_results": [] })).is_err());
    }

    #[test]
    fn model_status_reads_fully_defined() {
        assert!(model_fully_defined(&json!({
            "trained_model_configs": [{ "fully_defined": true }]
        })));
        assert!(!model_fully_defined(&json!({ "trained_model_configs": [] })));
    }

    #[test]
    fn page_chunks_write_text_into_the_configured_field() {
        let chunk = PageChunk {
            chunk_id: "c1".to_string(),
            document_id: "d1".to_string(),
            source_path: "/tmp/a.pdf".to_string(),
            title: "a.pdf".to_string(),
            page: 4,
            chunk_seq: 2,
            chunk_index: 9,
            text: "Bleed the line.".to_string(),
        };

        let source = page_chunk_source("Description", &chunk);
        assert_eq!(source["Description"], "Bleed the line.");
        assert_eq!(source["page"], 4);
        assert_eq!(source["chunk_seq"], 2);
    }

    #[test]
    fn store_rejects_malformed_endpoint() {
        let config = ElasticConfig {
            endpoint: "not a url".to_string(),
            ..ElasticConfig::default()
        };
        assert!(matches!(
            ElasticsearchStore::new(config),
            Err(SearchError::Url(_))
        ));
    }

    #[test]
    fn urls_join_onto_the_endpoint() {
        let config = ElasticConfig {
            endpoint: "http://es.internal:9200".to_string(),
            ..ElasticConfig::default()
        };
        let store = ElasticsearchStore::new(config).unwrap();

        let url = store.url(&store.model_path("_infer")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://es.internal:9200/_ml/trained_models/.elser_model_2_linux-x86_64/_infer"
        );
        let url = store.url(&store.index_path("_search")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://es.internal:9200/chat_elser_description_only/_search"
        );
    }
}
