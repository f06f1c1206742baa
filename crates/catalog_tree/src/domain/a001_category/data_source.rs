use super::error::DataSourceError;
use crate::shared::config::ApiConfig;
use async_trait::async_trait;
use contracts::domain::a001_category::aggregate::CategoryRecord;
use serde_json::Value;

/// Result of one fetch: the usable records and how many were thrown away
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedCategories {
    pub records: Vec<CategoryRecord>,
    pub skipped: usize,
}

/// Where the flat category list comes from
#[async_trait]
pub trait CategoryDataSource: Send + Sync {
    async fn fetch_all(&self) -> Result<FetchedCategories, DataSourceError>;
}

/// HTTP-клиент для каталога категорий
pub struct HttpCategoryDataSource {
    client: reqwest::Client,
    url: String,
    page_size: u32,
}

impl HttpCategoryDataSource {
    pub fn new(config: &ApiConfig) -> Result<Self, DataSourceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            url: config.categories_url(),
            page_size: config.page_size,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CategoryDataSource for HttpCategoryDataSource {
    async fn fetch_all(&self) -> Result<FetchedCategories, DataSourceError> {
        tracing::info!("Fetching categories from: {} (per_page={})", self.url, self.page_size);
        let start_time = std::time::Instant::now();

        let response = self
            .client
            .get(&self.url)
            .query(&[("per_page", self.page_size)])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    tracing::error!("Category request timed out: {}", e);
                } else {
                    tracing::error!("Category request failed: {}", e);
                }
                DataSourceError::from(e)
            })?;

        let status = response.status();
        tracing::info!(
            "Request completed in {:.2}s with status {}",
            start_time.elapsed().as_secs_f64(),
            status
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Category request failed: {}", body);
            return Err(DataSourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)?;
        parse_records(value)
    }
}

/// Records handed over up front, e.g. a list the host already has
#[derive(Debug, Clone, Default)]
pub struct InMemoryCategoryDataSource {
    records: Vec<CategoryRecord>,
}

impl InMemoryCategoryDataSource {
    pub fn new(records: Vec<CategoryRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl CategoryDataSource for InMemoryCategoryDataSource {
    async fn fetch_all(&self) -> Result<FetchedCategories, DataSourceError> {
        Ok(FetchedCategories {
            records: self.records.clone(),
            skipped: 0,
        })
    }
}

/// Pull the record list out of a response body.
///
/// Accepted shapes: `[...]`, `{"data": [...]}` and the paginated
/// `{"data": {"data": [...]}}`. Records that fail to parse are skipped.
pub fn parse_records(body: Value) -> Result<FetchedCategories, DataSourceError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            Some(Value::Object(mut page)) => match page.remove("data") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(DataSourceError::UnexpectedShape(
                        "`data.data` is not an array".to_string(),
                    ))
                }
            },
            _ => {
                return Err(DataSourceError::UnexpectedShape(
                    "object without a `data` array".to_string(),
                ))
            }
        },
        other => {
            return Err(DataSourceError::UnexpectedShape(format!(
                "expected an array or an object, got `{}`",
                other
            )))
        }
    };

    let mut fetched = FetchedCategories::default();
    for (position, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<CategoryRecord>(item) {
            Ok(record) => fetched.records.push(record),
            Err(e) => {
                tracing::warn!("Skipping malformed category at position {}: {}", position, e);
                fetched.skipped += 1;
            }
        }
    }

    if fetched.skipped > 0 {
        tracing::warn!(
            "{} of {} categories skipped as malformed",
            fetched.skipped,
            fetched.skipped + fetched.records.len()
        );
    }

    Ok(fetched)
}
