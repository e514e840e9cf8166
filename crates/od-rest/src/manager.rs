//! The per-entity query and mutation manager.

use std::marker::PhantomData;

use odata1c_client::{Connection, ODataRequest, Response};
use odata1c_query::Q;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::error::{Error, ErrorKind, Result};
use crate::model::EntityModel;

/// Fixed path segment between the database name and the entity set.
pub const ODATA_PATH: &str = "odata/standard.odata";

/// Key of the entity array in list responses.
const LIST_JSON_KEY: &str = "value";

/// Manager for one entity set of one database.
///
/// Query directives (`filter`, `expand`, `top`, `skip`) are consuming
/// builder calls; the terminal operations issue the request and validate
/// the response into `M`.
#[derive(Debug)]
pub struct EntityManager<M: EntityModel> {
    connection: Connection,
    database: String,
    entity_name: String,
    filter: Option<Q>,
    expand: Option<Vec<String>>,
    top: Option<u64>,
    skip: Option<u64>,
    validation_errors: Vec<serde_json::Error>,
    _model: PhantomData<M>,
}

impl<M: EntityModel> EntityManager<M> {
    /// Create a manager for `entity_name` in `database`.
    pub fn new(
        connection: Connection,
        database: impl Into<String>,
        entity_name: impl Into<String>,
    ) -> Self {
        Self {
            connection,
            database: database.into(),
            entity_name: entity_name.into(),
            filter: None,
            expand: None,
            top: None,
            skip: None,
            validation_errors: Vec::new(),
            _model: PhantomData,
        }
    }

    /// Apply a filter. A second call AND-merges with the existing one.
    pub fn filter(mut self, q: Q) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(q),
            None => q,
        });
        self
    }

    /// Expand related fields. Every field must be declared in the model's
    /// alias table; the wire aliases go into `$expand`.
    pub fn expand(mut self, fields: &[&str]) -> Result<Self> {
        for field in fields {
            if M::wire_name(field).is_none() {
                return Err(Error::new(ErrorKind::UnknownExpandField(field.to_string())));
            }
        }
        self.expand = Some(fields.iter().map(|field| field.to_string()).collect());
        Ok(self)
    }

    /// Limit the result to `n` records (`$top`).
    pub fn top(mut self, n: u64) -> Self {
        self.top = Some(n);
        self
    }

    /// Skip the first `n` records (`$skip`).
    pub fn skip(mut self, n: u64) -> Self {
        self.skip = Some(n);
        self
    }

    /// Validation failures collected by the last `all(true)` call.
    pub fn validation_errors(&self) -> &[serde_json::Error] {
        &self.validation_errors
    }

    /// Relative URL of the entity set.
    pub fn entity_url(&self) -> String {
        format!("{}/{}/{}", self.database, ODATA_PATH, self.entity_name)
    }

    /// Canonical relative URL of one record.
    pub fn canonical_url(&self, guid: Uuid) -> String {
        format!("{}(guid'{}')", self.entity_url(), guid)
    }

    /// Fetch all records matching the current directives.
    ///
    /// With `ignore_invalid` set, records failing validation are skipped
    /// and their errors collected into [`EntityManager::validation_errors`];
    /// otherwise the first failure aborts the call.
    #[instrument(skip(self), fields(entity = %self.entity_name))]
    pub async fn all(&mut self, ignore_invalid: bool) -> Result<Vec<M>> {
        self.validation_errors.clear();
        let request = ODataRequest::get(self.entity_url()).query_params(self.query_params());
        let response = self.send_expecting(request, 200).await?;

        let document: serde_json::Value = response.json()?;
        let items = document
            .get(LIST_JSON_KEY)
            .and_then(serde_json::Value::as_array)
            .cloned()
            .ok_or_else(|| Error::new(ErrorKind::MissingListKey(LIST_JSON_KEY.to_string())))?;

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            match serde_json::from_value::<M>(item) {
                Ok(record) => records.push(record),
                Err(e) if ignore_invalid => {
                    warn!(entity = %self.entity_name, error = %e, "skipping invalid record");
                    self.validation_errors.push(e);
                }
                Err(e) => {
                    return Err(Error::with_source(ErrorKind::Validation(e.to_string()), e))
                }
            }
        }
        Ok(records)
    }

    /// Fetch a single record by GUID.
    #[instrument(skip(self), fields(entity = %self.entity_name, %guid))]
    pub async fn get(&self, guid: Uuid) -> Result<M> {
        let request =
            ODataRequest::get(self.canonical_url(guid)).query_params(self.detail_params());
        let response = self.send_expecting(request, 200).await?;
        Self::validate_one(&response)
    }

    /// Create a record (HTTP POST, expects 201).
    #[instrument(skip(self, data), fields(entity = %self.entity_name))]
    pub async fn create(&self, data: &M) -> Result<M> {
        let request = ODataRequest::post(self.entity_url()).json(data)?;
        let response = self.send_expecting(request, 201).await?;
        Self::validate_one(&response)
    }

    /// Update a record by GUID (HTTP PATCH, expects 200).
    #[instrument(skip(self, data), fields(entity = %self.entity_name, %guid))]
    pub async fn update(&self, guid: Uuid, data: &M) -> Result<M> {
        let request = ODataRequest::patch(self.canonical_url(guid))
            .json(data)?
            .query_params(self.detail_params());
        let response = self.send_expecting(request, 200).await?;
        Self::validate_one(&response)
    }

    /// Post (commit) a document.
    ///
    /// `operational_mode` maps to the `PostingModeOperational` switch of
    /// the 1C `Post` action.
    #[instrument(skip(self), fields(entity = %self.entity_name, %guid))]
    pub async fn post_document(&self, guid: Uuid, operational_mode: bool) -> Result<()> {
        let request = ODataRequest::post(format!("{}/Post", self.canonical_url(guid)))
            .query("PostingModeOperational", operational_mode.to_string());
        self.send_expecting(request, 200).await?;
        Ok(())
    }

    /// Unpost (revert) a document.
    #[instrument(skip(self), fields(entity = %self.entity_name, %guid))]
    pub async fn unpost_document(&self, guid: Uuid) -> Result<()> {
        let request = ODataRequest::post(format!("{}/Unpost", self.canonical_url(guid)));
        self.send_expecting(request, 200).await?;
        Ok(())
    }

    async fn send_expecting(&self, request: ODataRequest, expected: u16) -> Result<Response> {
        let response = self.connection.send(request).await?;
        response.expect_status(expected)?;
        Ok(response)
    }

    fn validate_one(response: &Response) -> Result<M> {
        let value: serde_json::Value = response.json()?;
        serde_json::from_value(value)
            .map_err(|e| Error::with_source(ErrorKind::Validation(e.to_string()), e))
    }

    fn query_params(&self) -> Vec<(String, String)> {
        let mut params = self.detail_params();
        if let Some(q) = &self.filter {
            params.push(("$filter".to_string(), q.render_with(&M::field_mapping())));
        }
        if let Some(top) = self.top {
            params.push(("$top".to_string(), top.to_string()));
        }
        if let Some(skip) = self.skip {
            params.push(("$skip".to_string(), skip.to_string()));
        }
        params
    }

    /// The parameters single-record operations also carry: `$select` from
    /// the alias table, plus any `$expand`.
    fn detail_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        let aliases = M::field_aliases();
        if !aliases.is_empty() {
            let select: Vec<&str> = aliases.iter().map(|(_, wire)| *wire).collect();
            params.push(("$select".to_string(), select.join(",")));
        }
        if let Some(expand) = &self.expand {
            let wire: Vec<&str> = expand
                .iter()
                .map(|field| M::wire_name(field).unwrap_or(field.as_str()))
                .collect();
            params.push(("$expand".to_string(), wire.join(",")));
        }
        params
    }
}
