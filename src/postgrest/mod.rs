//! Database operations through the PostgREST API

mod filter;
mod query;

use reqwest::Client;
use serde::Serialize;

pub use filter::*;
pub use query::*;

/// Client for one table or view
pub struct PostgrestClient {
    /// The base URL for the Supabase project
    url: String,

    /// Shared request details
    ctx: RequestContext,
}

impl PostgrestClient {
    /// Create a new PostgrestClient
    pub(crate) fn new(
        url: &str,
        key: &str,
        token: &str,
        client_info: &str,
        table: &str,
        client: Client,
    ) -> Self {
        let url = url.trim_end_matches('/');
        Self {
            url: url.to_string(),
            ctx: RequestContext {
                url: format!("{}/rest/v1/{}", url, table),
                key: key.to_string(),
                token: token.to_string(),
                client_info: client_info.to_string(),
                client,
            },
        }
    }

    /// Select specific columns from the table
    pub fn select(&self, columns: &str) -> SelectBuilder {
        SelectBuilder::new(self.ctx.clone(), columns)
    }

    /// Insert data into the table
    pub fn insert<T: Serialize>(&self, values: T) -> InsertBuilder<T> {
        InsertBuilder::new(self.ctx.clone(), values)
    }

    /// Update data in the table
    pub fn update<T: Serialize>(&self, values: T) -> UpdateBuilder<T> {
        UpdateBuilder::new(self.ctx.clone(), values)
    }

    /// Call a stored procedure or function
    pub fn rpc<T: Serialize>(&self, function: &str, params: T) -> RpcBuilder<T> {
        let mut ctx = self.ctx.clone();
        ctx.url = format!("{}/rest/v1/rpc/{}", self.url, function);
        RpcBuilder::new(ctx, params)
    }
}
