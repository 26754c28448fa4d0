//! The table controller: state container and request sequencing.
//!
//! Every query mutator is synchronous. It changes [`QueryState`] and, if
//! anything changed, returns a [`PendingFetch`] carrying a fresh request
//! token. The host awaits [`PendingFetch::send`] however it likes and feeds
//! the outcome back through [`TableController::apply`]. Outcomes whose token
//! is not the latest issued are discarded, so responses arriving out of
//! order never overwrite newer results.

use std::fmt;
use std::sync::Arc;

use crudtable_dom::Element;
use crudtable_lib::api::FormData;
use crudtable_lib::api::ResourceApi;
use crudtable_lib::api::query::QueryState;
use crudtable_lib::api::query::last_page;
use crudtable_lib::error::Error;
use crudtable_lib::model::Created;
use crudtable_lib::model::ItemId;
use crudtable_lib::model::Permissions;
use crudtable_lib::model::ResourceInfo;
use crudtable_lib::model::ResultSet;
use log::debug;
use log::info;
use log::warn;

use crate::action::Action;
use crate::action::Handled;
use crate::config::LocaleConfig;
use crate::config::TableConfig;
use crate::error::TableError;
use crate::field::ADD_PREFIX;
use crate::field::FieldDescriptor;
use crate::mask::MaskAdapter;
use crate::mask::MaskRegistry;
use crate::render;
use crate::state::AddForm;
use crate::state::INVALID_MESSAGE;
use crate::state::REQUIRED_MESSAGE;
use crate::state::TableState;

/// Notice shown after a record is created.
pub const ADDED_MESSAGE: &str = "Added Row";

/// Notice shown after a record is deleted.
pub const DELETED_MESSAGE: &str = "Deleted Row";

// =============================================================================
// Pending requests
// =============================================================================

/// A list fetch that has been scheduled but not sent.
pub struct PendingFetch<A> {
    token: u64,
    resource: String,
    query: QueryState,
    api: Arc<A>,
}

impl<A: ResourceApi> PendingFetch<A> {
    pub fn token(&self) -> u64 {
        self.token
    }

    /// The query this fetch was scheduled with.
    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub async fn send(self) -> FetchOutcome {
        debug!("list {} #{}: {}", self.resource, self.token, self.query.to_query_param());
        let result = self.api.list(&self.resource, &self.query).await;
        FetchOutcome {
            token: self.token,
            result,
        }
    }
}

impl<A> fmt::Debug for PendingFetch<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingFetch")
            .field("token", &self.token)
            .field("resource", &self.resource)
            .field("query", &self.query)
            .finish()
    }
}

/// Response to a [`PendingFetch`].
#[derive(Debug)]
pub struct FetchOutcome {
    pub token: u64,
    pub result: Result<ResultSet, Error>,
}

/// A metadata fetch that has been scheduled but not sent.
pub struct PendingInfo<A> {
    token: u64,
    resource: String,
    api: Arc<A>,
}

impl<A: ResourceApi> PendingInfo<A> {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub async fn send(self) -> InfoOutcome {
        debug!("info {} #{}", self.resource, self.token);
        let result = self.api.info(&self.resource).await;
        InfoOutcome {
            token: self.token,
            result,
        }
    }
}

impl<A> fmt::Debug for PendingInfo<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingInfo")
            .field("token", &self.token)
            .field("resource", &self.resource)
            .finish()
    }
}

/// Response to a [`PendingInfo`].
#[derive(Debug)]
pub struct InfoOutcome {
    pub token: u64,
    pub result: Result<ResourceInfo, Error>,
}

/// What [`TableController::apply`] did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// State now reflects the response.
    Updated,
    /// The request failed; state is unchanged and an error notice was added.
    Failed,
    /// A newer request was issued after this one; the response was dropped.
    Stale,
    /// The response has fewer pages than the current page. The page was
    /// clamped and the list must be fetched again with
    /// [`TableController::refresh`].
    OutOfRange,
}

// =============================================================================
// Controller
// =============================================================================

/// One mounted CRUD table.
pub struct TableController<A> {
    api: Arc<A>,
    resource: String,
    config: TableConfig,
    locale: LocaleConfig,
    registry: MaskRegistry,
    masks: MaskAdapter,
    state: TableState,
    list_token: u64,
    info_token: u64,
}

impl<A> fmt::Debug for TableController<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableController")
            .field("resource", &self.resource)
            .field("query", &self.state.query)
            .field("list_token", &self.list_token)
            .field("info_token", &self.info_token)
            .finish_non_exhaustive()
    }
}

impl<A: ResourceApi> TableController<A> {
    pub fn new(api: Arc<A>, resource: impl Into<String>) -> Self {
        Self::with_config(api, resource, TableConfig::default(), LocaleConfig::default())
    }

    pub fn with_config(
        api: Arc<A>,
        resource: impl Into<String>,
        config: TableConfig,
        locale: LocaleConfig,
    ) -> Self {
        let query = QueryState::with_page_size(config.page_size);
        Self {
            api,
            resource: resource.into(),
            config,
            locale,
            registry: MaskRegistry::default(),
            masks: MaskAdapter::new(),
            state: TableState::new(query),
            list_token: 0,
            info_token: 0,
        }
    }

    /// Use a custom mask strategy table.
    pub fn with_registry(mut self, registry: MaskRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn query(&self) -> &QueryState {
        &self.state.query
    }

    pub fn result(&self) -> &ResultSet {
        &self.state.result
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn locale(&self) -> &LocaleConfig {
        &self.locale
    }

    pub fn masks(&self) -> &MaskAdapter {
        &self.masks
    }

    /// Build the view tree for the current state.
    pub fn render(&self) -> Element {
        render::table(&self.resource, &self.state, &self.config)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Schedule the initial metadata and list fetches.
    pub fn mount(&mut self) -> (PendingInfo<A>, PendingFetch<A>) {
        (self.reload_info(), self.refresh())
    }

    /// Mount and wait for both initial fetches.
    pub async fn load(&mut self) {
        let (info, list) = self.mount();
        let (info, list) = futures::join!(info.send(), list.send());
        self.apply_info(info);
        self.apply(list);
    }

    /// Drop all state and masks. Responses still in flight are discarded
    /// when applied.
    pub fn unmount(&mut self) {
        debug!("unmounting table {}", self.resource);
        self.masks.clear();
        self.state = TableState::new(QueryState::with_page_size(self.config.page_size));
        self.list_token += 1;
        self.info_token += 1;
    }

    // =========================================================================
    // Query mutators
    // =========================================================================

    /// Sort by a column, flipping the direction if it is already sorted.
    pub fn toggle_order(&mut self, column: &str) -> Option<PendingFetch<A>> {
        let changed = self.state.query.toggle_order(column);
        self.schedule_if(changed)
    }

    /// Move to a page, clamped into the valid range of the current result.
    pub fn change_page(&mut self, page: i64) -> Option<PendingFetch<A>> {
        let changed = self.state.query.change_page(page, self.state.result.count);
        self.schedule_if(changed)
    }

    pub fn change_page_size(&mut self, page_size: usize) -> Option<PendingFetch<A>> {
        let changed = self.state.query.change_page_size(page_size);
        self.schedule_if(changed)
    }

    pub fn add_filter(&mut self, column: &str, operator: &str, value: &str) -> Option<PendingFetch<A>> {
        let changed = self.state.query.add_filter(column, operator, value);
        self.schedule_if(changed)
    }

    /// Add an empty filter on a column using its first advertised operator.
    pub fn add_filter_column(&mut self, column: &str) -> Option<PendingFetch<A>> {
        let operator = self
            .state
            .info
            .as_ref()
            .and_then(|info| info.operators(column).first())
            .map(|op| op.operator.clone())?;
        self.add_filter(column, &operator, "")
    }

    pub fn remove_filter(&mut self, column: &str) -> Option<PendingFetch<A>> {
        let changed = self.state.query.remove_filter(column);
        self.schedule_if(changed)
    }

    /// Edit a filter value. Keeps the current page.
    ///
    /// Masked columns send their normalized value; text the mask cannot
    /// read yet is sent as typed.
    pub fn change_filter_value(&mut self, column: &str, value: &str) -> Option<PendingFetch<A>> {
        let normalized = self
            .state
            .filter_fields
            .get(column)
            .and_then(|field| field.mask.normalize(value));
        let value = normalized.as_deref().unwrap_or(value);
        let changed = self.state.query.change_filter_value(column, value);
        self.schedule_if(changed)
    }

    /// Edit a filter operator. Keeps the current page.
    pub fn change_filter_operator(&mut self, column: &str, operator: &str) -> Option<PendingFetch<A>> {
        let changed = self.state.query.change_filter_operator(column, operator);
        self.schedule_if(changed)
    }

    /// Re-fetch the current query.
    pub fn refresh(&mut self) -> PendingFetch<A> {
        self.list_token += 1;
        self.state.loading = true;
        PendingFetch {
            token: self.list_token,
            resource: self.resource.clone(),
            query: self.state.query.clone(),
            api: self.api.clone(),
        }
    }

    /// Re-fetch resource metadata.
    pub fn reload_info(&mut self) -> PendingInfo<A> {
        self.info_token += 1;
        PendingInfo {
            token: self.info_token,
            resource: self.resource.clone(),
            api: self.api.clone(),
        }
    }

    fn schedule_if(&mut self, changed: bool) -> Option<PendingFetch<A>> {
        if changed {
            Some(self.refresh())
        } else {
            None
        }
    }

    /// Merge a list response into state.
    ///
    /// If the result has fewer pages than the current page, the page is
    /// clamped and [`Applied::OutOfRange`] tells the caller to refresh.
    pub fn apply(&mut self, outcome: FetchOutcome) -> Applied {
        if outcome.token != self.list_token {
            warn!(
                "discarding stale list response #{} for {} (latest #{})",
                outcome.token, self.resource, self.list_token
            );
            return Applied::Stale;
        }

        match outcome.result {
            Ok(result) => {
                debug!("list {} #{}: {} of {}", self.resource, outcome.token, result.len(), result.count);
                let page = self.state.query.page();
                let last = last_page(result.count, self.state.query.page_size());
                self.state.result = result;
                if page > last {
                    debug!("page {page} of {} is past the last page {last}", self.resource);
                    self.state.query.change_page(last as i64, self.state.result.count);
                    return Applied::OutOfRange;
                }
                self.state.loading = false;
                Applied::Updated
            }
            Err(err) => {
                self.state.loading = false;
                warn!("listing {} failed: {err}", self.resource);
                self.state.notices.error(err.user_message());
                Applied::Failed
            }
        }
    }

    /// Merge a metadata response into state and rebuild filter fields.
    pub fn apply_info(&mut self, outcome: InfoOutcome) -> Applied {
        if outcome.token != self.info_token {
            warn!(
                "discarding stale info response #{} for {} (latest #{})",
                outcome.token, self.resource, self.info_token
            );
            return Applied::Stale;
        }

        match outcome.result {
            Ok(info) => {
                self.state.filter_fields = info
                    .filters
                    .keys()
                    .map(|column| {
                        let label = info
                            .add_column(column)
                            .map(|c| c.display_label())
                            .unwrap_or_else(|| self.state.result.label(column));
                        let field_type = info
                            .add_column(column)
                            .map(|c| c.field_type.as_str())
                            .unwrap_or("");
                        let field = FieldDescriptor::filter(
                            column,
                            label,
                            field_type,
                            &self.config,
                            &self.locale,
                            &self.registry,
                        );
                        (column.clone(), field)
                    })
                    .collect();
                self.state.info = Some(info);
                Applied::Updated
            }
            Err(err) => {
                warn!("loading info for {} failed: {err}", self.resource);
                self.state.notices.error(err.user_message());
                Applied::Failed
            }
        }
    }

    /// Send a scheduled fetch, if any, and apply its outcome.
    ///
    /// A response past the last page is followed by one fetch of the
    /// clamped page.
    pub async fn run(&mut self, fetch: Option<PendingFetch<A>>) -> Option<Applied> {
        let applied = self.apply(fetch?.send().await);
        if applied != Applied::OutOfRange {
            return Some(applied);
        }
        let fetch = self.refresh();
        Some(self.apply(fetch.send().await))
    }

    // =========================================================================
    // Show
    // =========================================================================

    pub async fn open_show(&mut self, id: &ItemId) -> Result<(), TableError> {
        self.require("show", |p| p.show)?;
        match self.api.get_item(&self.resource, id).await {
            Ok(item) => {
                self.state.shown = Some(item);
                Ok(())
            }
            Err(err) => Err(self.fail("loading item", err)),
        }
    }

    pub fn close_show(&mut self) -> bool {
        self.state.shown.take().is_some()
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Ask for confirmation before deleting a record.
    pub fn request_delete(&mut self, id: ItemId) -> Result<(), TableError> {
        self.require("delete", |p| p.delete)?;
        self.state.pending_delete = Some(id);
        Ok(())
    }

    pub fn cancel_delete(&mut self) -> bool {
        self.state.pending_delete.take().is_some()
    }

    /// Delete the record awaiting confirmation, then refresh the list.
    ///
    /// On failure the result set is left as it was.
    pub async fn confirm_delete(&mut self) -> Result<(), TableError> {
        self.require("delete", |p| p.delete)?;
        let id = self.state.pending_delete.take().ok_or(TableError::NoPendingDelete)?;

        match self.api.delete(&self.resource, &id).await {
            Ok(message) => {
                info!("deleted {} {id}: {message}", self.resource);
                self.state.notices.success(DELETED_MESSAGE);

                // The last row of a page is gone; step back so the page
                // still holds records.
                let page = self.state.query.page();
                if self.state.result.len() == 1 && page > 0 {
                    let count = self.state.result.count;
                    self.state.query.change_page(page as i64 - 1, count);
                }
                let fetch = self.refresh();
                self.run(Some(fetch)).await;
                Ok(())
            }
            Err(err) => Err(self.fail("deleting record", err)),
        }
    }

    // =========================================================================
    // Add
    // =========================================================================

    /// Open the add form with one field per add column.
    pub fn open_add(&mut self) -> Result<(), TableError> {
        let Some(info) = self.state.info.as_ref().filter(|info| info.permissions.add) else {
            return Err(TableError::PermissionDenied("add"));
        };

        let fields: Vec<FieldDescriptor> = info
            .add_columns
            .iter()
            .map(|c| FieldDescriptor::from_column(c, &self.config, &self.locale, &self.registry))
            .collect();
        self.masks.unmount_prefix(ADD_PREFIX);
        for field in &fields {
            self.masks.mount(field.input_id(ADD_PREFIX), field.mask.clone());
        }

        self.state.add_form = Some(AddForm::new(info.add_title.clone(), fields));
        Ok(())
    }

    pub fn close_add(&mut self) -> bool {
        self.masks.unmount_prefix(ADD_PREFIX);
        self.state.add_form.take().is_some()
    }

    /// Store typed text for a field, reformatted by its mask.
    ///
    /// Returns `false` for unknown fields.
    pub fn change_field(&mut self, field: &str, raw: &str) -> Result<bool, TableError> {
        let form = self.state.add_form.as_mut().ok_or(TableError::NoOpenForm)?;
        let Some(input_id) = form.field(field).map(|f| f.input_id(ADD_PREFIX)) else {
            return Ok(false);
        };

        let display = self
            .masks
            .input(&input_id, raw)
            .unwrap_or_else(|| raw.to_string());
        form.errors.remove(field);
        form.values.insert(field.to_string(), display);
        Ok(true)
    }

    /// Submit the add form.
    ///
    /// Empty required fields and unreadable masked values are reported on
    /// the form without contacting the server. On success the form closes
    /// and the list is refreshed; on failure server field errors are shown
    /// on the form and nothing else changes.
    pub async fn submit_add(&mut self) -> Result<Created, TableError> {
        self.require("add", |p| p.add)?;
        let form = self.state.add_form.as_mut().ok_or(TableError::NoOpenForm)?;
        form.errors.clear();

        let missing = form.missing_required();
        if !missing.is_empty() {
            for field in &missing {
                form.add_error(field, REQUIRED_MESSAGE);
            }
            return Err(TableError::MissingRequired { fields: missing });
        }

        let mut data = FormData::new();
        let mut invalid = Vec::new();
        for field in &form.fields {
            let display = form.value(&field.name);
            if display.trim().is_empty() {
                continue;
            }
            match field.wire_value(display) {
                Some(value) => {
                    data.insert(field.name.clone(), value);
                }
                None => invalid.push(field.name.clone()),
            }
        }
        if !invalid.is_empty() {
            for field in &invalid {
                form.add_error(field, INVALID_MESSAGE);
            }
            return Err(TableError::InvalidValue { fields: invalid });
        }

        match self.api.create(&self.resource, &data).await {
            Ok(created) => {
                info!("created {} record {:?}", self.resource, created.id);
                self.state.notices.success(ADDED_MESSAGE);
                self.close_add();
                let fetch = self.refresh();
                self.run(Some(fetch)).await;
                Ok(created)
            }
            Err(err) => {
                if let (Error::Validation(validation), Some(form)) = (&err, self.state.add_form.as_mut()) {
                    for field_error in &validation.fields {
                        form.add_error(&field_error.field, &field_error.message);
                    }
                }
                Err(self.fail("creating record", err))
            }
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Handle a user action decoded from a rendered control.
    ///
    /// `value` is the control's current value for actions that read one.
    /// Query actions send their fetch and apply it before returning.
    pub async fn handle(&mut self, action: Action, value: Option<&str>) -> Result<Handled, TableError> {
        let value = value.unwrap_or("");
        let fetch = match action {
            Action::ToggleOrder { column } => self.toggle_order(&column),
            Action::ChangePage { page } => self.change_page(page),
            Action::ChangePageSize { size } => self.change_page_size(size),
            Action::Refresh => Some(self.refresh()),
            Action::AddFilter { column } => self.add_filter_column(&column),
            Action::RemoveFilter { column } => self.remove_filter(&column),
            Action::ChangeFilterValue { column } => self.change_filter_value(&column, value),
            Action::ChangeFilterOperator { column } => self.change_filter_operator(&column, value),
            Action::Show { id } => {
                self.open_show(&id).await?;
                return Ok(Handled::Changed);
            }
            Action::CloseShow => return Ok(changed(self.close_show())),
            Action::Edit { id } => return Ok(Handled::Delegated(Action::Edit { id })),
            Action::RequestDelete { id } => {
                self.request_delete(id)?;
                return Ok(Handled::Changed);
            }
            Action::ConfirmDelete => {
                self.confirm_delete().await?;
                return Ok(Handled::Changed);
            }
            Action::CancelDelete => return Ok(changed(self.cancel_delete())),
            Action::OpenAdd => {
                self.open_add()?;
                return Ok(Handled::Changed);
            }
            Action::CloseAdd => return Ok(changed(self.close_add())),
            Action::ChangeField { field } => return Ok(changed(self.change_field(&field, value)?)),
            Action::SubmitAdd => {
                self.submit_add().await?;
                return Ok(Handled::Changed);
            }
            Action::DismissNotice { id } => return Ok(changed(self.state.notices.dismiss(id))),
        };

        match self.run(fetch).await {
            Some(_) => Ok(Handled::Changed),
            None => Ok(Handled::Unchanged),
        }
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn require(&self, action: &'static str, allowed: fn(&Permissions) -> bool) -> Result<(), TableError> {
        match &self.state.info {
            Some(info) if allowed(&info.permissions) => Ok(()),
            _ => Err(TableError::PermissionDenied(action)),
        }
    }

    /// Report a failed request as an error notice.
    fn fail(&mut self, context: &str, err: Error) -> TableError {
        warn!("{context} for {} failed: {err}", self.resource);
        self.state.notices.error(err.user_message());
        TableError::Api(err)
    }
}

fn changed(changed: bool) -> Handled {
    if changed {
        Handled::Changed
    } else {
        Handled::Unchanged
    }
}
