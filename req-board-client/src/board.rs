use crate::client::RecordApi;
use crate::controller::CrudController;
use req_board_core::record::CollectionName;
use req_board_core::render::{self, PageSection};
use req_board_core::schema::Schema;
use std::sync::Arc;

/// One controller per collection, sharing a client and a form container.
pub struct Board<A> {
    actors: CrudController<A>,
    requirements: CrudController<A>,
    acceptance_criteria: CrudController<A>,
}

impl<A: RecordApi> Board<A> {
    /// Controllers for every collection with their default schemas.
    pub fn new(api: Arc<A>) -> Self {
        let controller =
            |c: CollectionName| CrudController::new(api.clone(), c, Schema::for_collection(c));
        Self {
            actors: controller(CollectionName::Actors),
            requirements: controller(CollectionName::Requirements),
            acceptance_criteria: controller(CollectionName::AcceptanceCriteria),
        }
    }

    /// Build the board and fill every list from the server.
    pub async fn load(api: Arc<A>) -> Self {
        let mut board = Self::new(api);
        board.refresh_all().await;
        board
    }

    pub fn controller(&self, collection: CollectionName) -> &CrudController<A> {
        match collection {
            CollectionName::Actors => &self.actors,
            CollectionName::Requirements => &self.requirements,
            CollectionName::AcceptanceCriteria => &self.acceptance_criteria,
        }
    }

    pub fn controller_mut(&mut self, collection: CollectionName) -> &mut CrudController<A> {
        match collection {
            CollectionName::Actors => &mut self.actors,
            CollectionName::Requirements => &mut self.requirements,
            CollectionName::AcceptanceCriteria => &mut self.acceptance_criteria,
        }
    }

    pub async fn refresh_all(&mut self) {
        for collection in CollectionName::ALL {
            self.controller_mut(collection).refresh().await;
        }
    }

    /// Render the whole page. The form container shows the form of the
    /// first controller that has one open.
    pub fn render_page(&self) -> String {
        let controllers = CollectionName::ALL.map(|c| self.controller(c));
        let sections: Vec<PageSection<'_>> = controllers
            .iter()
            .map(|c| PageSection {
                collection: c.collection(),
                list_html: c.list_panel(),
            })
            .collect();
        let form = controllers
            .iter()
            .map(|c| c.form_panel())
            .find(|f| !f.is_empty())
            .unwrap_or_default();
        render::render_page(&sections, form)
    }
}
