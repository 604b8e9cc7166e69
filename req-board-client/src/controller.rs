//! CRUD controller for one collection.
//!
//! The controller owns two containers: the form panel and the list panel.
//! Each transition replaces their contents wholesale. Failures are logged,
//! remembered as [`CrudController::last_error`], and leave the controller
//! idle with an empty form panel.

use crate::client::{ClientError, RecordApi};
use req_board_core::record::CollectionName;
use req_board_core::render::{self, FormAction, ADD_FORM_ID, EDIT_FORM_ID};
use req_board_core::schema::{FormValues, Schema};
use std::sync::Arc;
use tracing::{error, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    /// The add form is shown.
    Creating,
    /// The edit form for record `id` is shown.
    Editing { id: String },
}

pub struct CrudController<A> {
    api: Arc<A>,
    collection: CollectionName,
    schema: Schema,
    state: ControllerState,
    form_panel: String,
    form_values: FormValues,
    list_panel: String,
    last_error: Option<String>,
}

impl<A: RecordApi> CrudController<A> {
    pub fn new(api: Arc<A>, collection: CollectionName, schema: Schema) -> Self {
        Self {
            api,
            collection,
            schema,
            state: ControllerState::Idle,
            form_panel: String::new(),
            form_values: FormValues::new(),
            list_panel: String::new(),
            last_error: None,
        }
    }

    pub fn collection(&self) -> CollectionName {
        self.collection
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Markup currently shown in the form container.
    pub fn form_panel(&self) -> &str {
        &self.form_panel
    }

    /// Values the shown form's inputs start with: empty for the add form,
    /// the record's current values for the edit form.
    pub fn form_values(&self) -> &FormValues {
        &self.form_values
    }

    /// Markup currently shown in this collection's list container.
    pub fn list_panel(&self) -> &str {
        &self.list_panel
    }

    /// Message of the most recent failed operation, cleared when the next
    /// operation starts.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Show an empty add form.
    pub fn begin_create(&mut self) {
        self.last_error = None;
        self.form_panel = render::render_form(
            ADD_FORM_ID,
            self.collection,
            &self.schema,
            &FormAction::Create,
            None,
        );
        self.form_values = self
            .schema
            .fields()
            .iter()
            .map(|f| (f.name.clone(), String::new()))
            .collect();
        self.state = ControllerState::Creating;
    }

    /// Submit the shown form with `values`: create in the Creating state,
    /// update the edited record in the Editing state. On success the form
    /// is cleared and the list rebuilt.
    pub async fn submit(&mut self, values: &FormValues) {
        self.last_error = None;
        let fields = self.schema.collect(values);
        let result = match &self.state {
            ControllerState::Idle => {
                warn!("Submit on {} with no form shown, ignoring", self.collection);
                return;
            }
            ControllerState::Creating => self.api.create(self.collection, &fields).await,
            ControllerState::Editing { id } => {
                self.api.update(self.collection, id, &fields).await
            }
        };
        match result {
            Ok(_) => {
                self.close_form();
                self.refresh().await;
            }
            Err(err) => self.fail(err),
        }
    }

    /// Show the edit form for record `id`, pre-filled with its current
    /// values. The record is looked up in a fresh fetch of the collection.
    pub async fn edit(&mut self, id: &str) {
        self.last_error = None;
        let records = match self.api.fetch(self.collection).await {
            Ok(records) => records,
            Err(err) => return self.fail(err),
        };
        let Some(record) = records.iter().find(|r| r.id() == Some(id)) else {
            return self.fail(ClientError::NotFound {
                collection: self.collection,
                id: id.to_string(),
            });
        };

        let title = format!(
            "<h2>Edit {}</h2>\n",
            render::escape_html(&render::page_title(self.collection.as_str()))
        );
        let form = render::render_form(
            EDIT_FORM_ID,
            self.collection,
            &self.schema,
            &FormAction::Update { id: id.to_string() },
            Some(record),
        );
        self.form_panel = title + &form;
        self.form_values = self
            .schema
            .fields()
            .iter()
            .map(|f| (f.name.clone(), record.display_value(&f.name)))
            .collect();
        self.state = ControllerState::Editing { id: id.to_string() };
    }

    /// Close the shown form without changing anything.
    pub fn cancel(&mut self) {
        self.close_form();
    }

    pub async fn delete(&mut self, id: &str) {
        self.last_error = None;
        match self.api.delete(self.collection, id).await {
            Ok(_) => self.refresh().await,
            Err(err) => self.fail(err),
        }
    }

    /// Fetch the collection and rebuild the list panel.
    pub async fn refresh(&mut self) {
        match self.api.fetch(self.collection).await {
            Ok(records) => {
                self.list_panel = render::render_list(&records, self.collection);
            }
            Err(err) => {
                error!("Error: {}", err);
                self.last_error = Some(err.to_string());
            }
        }
    }

    fn close_form(&mut self) {
        self.form_panel.clear();
        self.form_values.clear();
        self.state = ControllerState::Idle;
    }

    fn fail(&mut self, err: ClientError) {
        error!("Error: {}", err);
        self.last_error = Some(err.to_string());
        self.close_form();
    }
}
