use chrono::{DateTime, Utc};
use log::info;
use thiserror::Error;
use crate::config::{Readiness, RetryPolicy};
use crate::initialization::Mgr;
use crate::manager_storage::{ObjectStore, StorageError};
use crate::models::{NormalizedWeatherRow, RawWeatherRecord};
use crate::transform::{storage_key, TransformError, CSV_CONTENT_TYPE};
use crate::{retry, wrapper};

/// Runs one daily load: readiness check, fetch, then transform and store.
/// Each step is retried according to the retry policy and no step starts before its
/// predecessor has succeeded. Returns the key of the stored object.
///
/// # Arguments
///
/// * 'mgr' - struct with configured managers
/// * 'readiness' - readiness check polling parameters
/// * 'policy' - retry policy applied to every step
/// * 'debug_run_time' - a run time to be used instead of Utc now when building the storage key
pub fn run(mgr: &Mgr, readiness: &Readiness, policy: &RetryPolicy, debug_run_time: Option<DateTime<Utc>>) -> Result<String, WorkerError> {
    info!("Run start, retries: {}, retry delay: {}s", policy.retries, policy.delay_secs);

    retry!(policy, "is_api_ready", || mgr.weather.wait_until_ready(readiness))
        .map_err(|e| WorkerError::ReadinessError(e.to_string()))?;

    let record = retry!(policy, "extract_weather_data", || mgr.weather.fetch())
        .map_err(|e| WorkerError::FetchError(e.to_string()))?;

    let key = retry!(policy, "transform_load", || {
        let now = debug_run_time.unwrap_or_else(Utc::now);
        transform_and_store(mgr.store.as_ref(), &record, now)
    })?;

    info!("Run done, weather stored at {}", mgr.store.location(&key));

    Ok(key)
}

/// Normalizes a raw weather record and writes it as CSV to the object store.
/// Nothing is written unless the whole row could be built.
///
/// # Arguments
///
/// * 'store' - object store to write to
/// * 'record' - raw weather record as fetched
/// * 'now' - wall clock time of this step, used for the storage key
fn transform_and_store(store: &dyn ObjectStore, record: &RawWeatherRecord, now: DateTime<Utc>) -> Result<String, WorkerError> {
    let row = NormalizedWeatherRow::from_raw(record)?;
    info!("{} {}: {:.2}F (feels like {:.2}F), observed {}", row.city, row.description, row.temp_f, row.feels_like_f, row.time);

    let content = row.to_csv()?;
    let key = storage_key(now);

    store.put(&key, content.as_bytes(), CSV_CONTENT_TYPE)?;

    Ok(key)
}

/// Error depicting errors that occur while running the weather load
///
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("error while waiting for weather API: {0:?}")]
    ReadinessError(String),
    #[error("error while fetching weather: {0:?}")]
    FetchError(String),
    #[error("error while transforming weather: {0}")]
    TransformError(#[from] TransformError),
    #[error("error while storing weather: {0}")]
    StorageError(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use chrono::TimeZone;
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use super::*;
    use crate::config::WeatherApi;
    use crate::manager_weather::Weather;

    type Objects = Rc<RefCell<HashMap<String, Vec<u8>>>>;

    struct MemoryStore {
        objects: Objects,
        fail: bool,
        puts: Rc<RefCell<u32>>,
    }

    impl ObjectStore for MemoryStore {
        fn put(&self, key: &str, content: &[u8], content_type: &str) -> Result<(), StorageError> {
            assert_eq!(content_type, CSV_CONTENT_TYPE);
            *self.puts.borrow_mut() += 1;
            if self.fail {
                return Err(StorageError::StatusError(403, key.to_string()));
            }
            self.objects.borrow_mut().insert(key.to_string(), content.to_vec());
            Ok(())
        }

        fn location(&self, key: &str) -> String {
            format!("memory://{}", key)
        }
    }

    struct Outcome {
        result: Result<String, WorkerError>,
        objects: HashMap<String, Vec<u8>>,
        puts: u32,
    }

    fn portland() -> Value {
        json!({
            "name": "Portland",
            "weather": [{"description": "clear sky"}],
            "main": {"temp": 283.15, "feels_like": 282.00, "temp_min": 281.00, "temp_max": 285.00, "pressure": 1012, "humidity": 60},
            "wind": {"speed": 3.5},
            "dt": 1700000000
        })
    }

    fn run_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 22).unwrap()
    }

    async fn mock_api(status: u16, body: Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    async fn run_against(server: &MockServer, fail_store: bool) -> Outcome {
        let base_url = server.uri();
        tokio::task::spawn_blocking(move || {
            let weather = Weather::new(&WeatherApi {
                base_url,
                endpoint: "/data/2.5/weather".to_string(),
                city: "Portland".to_string(),
                api_key: "test-key".to_string(),
                timeout_secs: 5,
                log_response: false,
            }).unwrap();
            let objects: Objects = Rc::new(RefCell::new(HashMap::new()));
            let puts = Rc::new(RefCell::new(0));
            let store = MemoryStore { objects: objects.clone(), fail: fail_store, puts: puts.clone() };
            let mgr = Mgr { weather, store: Box::new(store) };

            let readiness = Readiness { poke_interval_secs: 0, timeout_secs: 0 };
            let policy = RetryPolicy { retries: 2, delay_secs: 0 };
            let result = run(&mgr, &readiness, &policy, Some(run_time()));

            let objects = objects.borrow().clone();
            let puts = *puts.borrow();
            Outcome { result, objects, puts }
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn stores_one_csv_row() {
        let server = mock_api(200, portland()).await;

        let outcome = run_against(&server, false).await;

        let key = outcome.result.unwrap();
        assert_eq!(key, "weather/weather_20240305_140722.csv");
        assert_eq!(outcome.objects.len(), 1);
        let content = String::from_utf8(outcome.objects[&key].clone()).unwrap();
        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let rows: Vec<NormalizedWeatherRow> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].city, "Portland");
        assert_eq!(rows[0].temp_f, 50.0);
        // one readiness poke and one fetch
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn malformed_record_writes_nothing() {
        let mut body = portland();
        body["main"].as_object_mut().unwrap().remove("temp");
        let server = mock_api(200, body).await;

        let outcome = run_against(&server, false).await;

        assert!(matches!(outcome.result, Err(WorkerError::TransformError(TransformError::MalformedData(_)))));
        assert!(outcome.objects.is_empty());
        assert_eq!(outcome.puts, 0);
    }

    #[tokio::test]
    async fn storage_failure_fails_run_after_retries() {
        let server = mock_api(200, portland()).await;

        let outcome = run_against(&server, true).await;

        assert!(matches!(outcome.result, Err(WorkerError::StorageError(StorageError::StatusError(403, _)))));
        assert_eq!(outcome.puts, 3);
        assert!(outcome.objects.is_empty());
    }

    #[tokio::test]
    async fn unavailable_api_stops_before_fetch() {
        let server = mock_api(503, json!({"message": "down"})).await;

        let outcome = run_against(&server, false).await;

        assert!(matches!(outcome.result, Err(WorkerError::ReadinessError(_))));
        assert_eq!(outcome.puts, 0);
        // one poke per readiness attempt, no fetch
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }
}
