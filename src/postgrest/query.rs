//! Query builders for PostgrestClient

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Error;
use crate::fetch::{Fetch, FetchBuilder};
use crate::postgrest::filter::FilterOperator;

/// Connection details shared by every builder
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The endpoint URL
    pub url: String,

    /// The anonymous API key
    pub key: String,

    /// The bearer token (user access token or anon key)
    pub token: String,

    /// Value of the `X-Client-Info` header
    pub client_info: String,

    /// HTTP client
    pub client: Client,
}

impl RequestContext {
    fn decorate<'a>(&self, fetch: FetchBuilder<'a>) -> FetchBuilder<'a> {
        fetch
            .header("apikey", &self.key)
            .header("X-Client-Info", &self.client_info)
            .bearer_auth(&self.token)
    }
}

/// Ordered query parameters
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    params: Vec<(String, String)>,
}

impl QueryBuilder {
    /// Create a new QueryBuilder
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter, replacing an earlier one with the same key
    pub fn add_param(&mut self, key: &str, value: &str) {
        match self.params.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.params.push((key.to_string(), value.to_string())),
        }
    }

    /// Add a filter on a column
    pub fn add_filter(&mut self, column: &str, op: FilterOperator, value: &str) {
        self.add_param(column, &op.render(value));
    }

    /// Get the query parameters
    pub fn get_params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Builder for SELECT queries
pub struct SelectBuilder {
    ctx: RequestContext,
    query: QueryBuilder,
}

impl SelectBuilder {
    /// Create a new SelectBuilder
    pub fn new(ctx: RequestContext, columns: &str) -> Self {
        let mut query = QueryBuilder::new();
        query.add_param("select", columns);
        Self { ctx, query }
    }

    /// Filter rows where column equals a value
    pub fn eq<T: ToString>(mut self, column: &str, value: T) -> Self {
        self.query
            .add_filter(column, FilterOperator::Eq, &value.to_string());
        self
    }

    /// Limit the number of rows returned
    pub fn limit(mut self, count: u32) -> Self {
        self.query.add_param("limit", &count.to_string());
        self
    }

    /// Order the results by a column
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.query
            .add_param("order", &format!("{}.{}", column, direction));
        self
    }

    /// The query parameters this builder will send
    pub fn params(&self) -> &[(String, String)] {
        self.query.get_params()
    }

    /// Execute the query and return the results
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<Vec<T>, Error> {
        let fetch = self
            .ctx
            .decorate(Fetch::get(&self.ctx.client, &self.ctx.url))
            .query(self.query.get_params().iter().cloned());

        fetch.execute::<Vec<T>>().await.map_err(into_database_error)
    }

    /// Execute the query and return the first row, if any
    pub async fn execute_one<T: DeserializeOwned>(self) -> Result<Option<T>, Error> {
        let results = self.limit(1).execute::<T>().await?;
        Ok(results.into_iter().next())
    }
}

/// Builder for INSERT queries
pub struct InsertBuilder<T: Serialize> {
    ctx: RequestContext,
    values: T,
}

impl<T: Serialize> InsertBuilder<T> {
    /// Create a new InsertBuilder
    pub fn new(ctx: RequestContext, values: T) -> Self {
        Self { ctx, values }
    }

    /// Execute the query without returning the inserted data
    pub async fn execute_no_return(&self) -> Result<(), Error> {
        let fetch = self
            .ctx
            .decorate(Fetch::post(&self.ctx.client, &self.ctx.url))
            .header("Prefer", "return=minimal")
            .json(&self.values)?;

        fetch.execute_checked().await.map_err(into_database_error)?;
        Ok(())
    }
}

/// Builder for UPDATE queries
pub struct UpdateBuilder<T: Serialize> {
    ctx: RequestContext,
    values: T,
    query: QueryBuilder,
}

impl<T: Serialize> UpdateBuilder<T> {
    /// Create a new UpdateBuilder
    pub fn new(ctx: RequestContext, values: T) -> Self {
        Self {
            ctx,
            values,
            query: QueryBuilder::new(),
        }
    }

    /// Filter rows where column equals a value
    pub fn eq<V: ToString>(mut self, column: &str, value: V) -> Self {
        self.query
            .add_filter(column, FilterOperator::Eq, &value.to_string());
        self
    }

    /// Execute the query without returning the updated data.
    ///
    /// An update with no filter is refused rather than sent, PostgREST
    /// would apply it to every row the caller can see.
    pub async fn execute_no_return(&self) -> Result<(), Error> {
        if self.query.get_params().is_empty() {
            return Err(Error::database("refusing to update without a filter"));
        }

        let fetch = self
            .ctx
            .decorate(Fetch::patch(&self.ctx.client, &self.ctx.url))
            .header("Prefer", "return=minimal")
            .query(self.query.get_params().iter().cloned())
            .json(&self.values)?;

        fetch.execute_checked().await.map_err(into_database_error)?;
        Ok(())
    }
}

/// Builder for RPC (stored procedure) calls
pub struct RpcBuilder<T: Serialize> {
    ctx: RequestContext,
    params: T,
}

impl<T: Serialize> RpcBuilder<T> {
    /// Create a new RpcBuilder
    pub fn new(ctx: RequestContext, params: T) -> Self {
        Self { ctx, params }
    }

    /// Execute the RPC call, discarding whatever the function returns
    pub async fn execute(&self) -> Result<(), Error> {
        let fetch = self
            .ctx
            .decorate(Fetch::post(&self.ctx.client, &self.ctx.url))
            .json(&self.params)?;

        fetch.execute_checked().await.map_err(into_database_error)?;
        Ok(())
    }
}

fn into_database_error(err: Error) -> Error {
    match err {
        Error::Request { message, .. } => Error::Database(message),
        other => other,
    }
}
