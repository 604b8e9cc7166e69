//! Schema-driven HTML rendering for forms, record tables and the CRUD page.
//!
//! Every function returns the full contents of its container; callers
//! replace the previous contents wholesale rather than patching them.
//! Event wiring is expressed with `data-action`, `data-collection` and
//! `data-id` attributes for the host page to bind.

use crate::record::{CollectionName, Record};
use crate::schema::Schema;

pub const FORM_CONTAINER_ID: &str = "formContainer";
pub const ADD_FORM_ID: &str = "addForm";
pub const EDIT_FORM_ID: &str = "editForm";

/// What submitting a form does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormAction {
    Create,
    Update { id: String },
}

/// One collection's block on the CRUD page.
pub struct PageSection<'a> {
    pub collection: CollectionName,
    pub list_html: &'a str,
}

/// Display title for a collection: the name with its first letter upper-cased.
pub fn page_title(collection: &str) -> String {
    let mut chars = collection.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Id of the container holding the record table of `collection`.
pub fn list_container_id(collection: CollectionName) -> String {
    format!("{}List", collection.as_str())
}

/// Render a form with one required text input per schema field, optionally
/// pre-filled from `values`.
pub fn render_form(
    form_id: &str,
    collection: CollectionName,
    schema: &Schema,
    action: &FormAction,
    values: Option<&Record>,
) -> String {
    let mut html = String::new();
    let (action_name, id_attr, submit_label) = match action {
        FormAction::Create => ("create", String::new(), "Add"),
        FormAction::Update { id } => ("update", format!(" data-id=\"{}\"", escape_html(id)), "Update"),
    };
    html.push_str(&format!(
        "<form id=\"{}\" data-collection=\"{}\" data-action=\"{}\"{}>\n",
        escape_html(form_id),
        collection.as_str(),
        action_name,
        id_attr,
    ));

    for field in schema.fields() {
        let element_id = escape_html(&field.element_id);
        let value = values
            .map(|r| r.display_value(&field.name))
            .unwrap_or_default();
        html.push_str(&format!(
            "<label for=\"{}\">{}:</label>\n",
            element_id,
            escape_html(&page_title(&field.name)),
        ));
        html.push_str(&format!(
            "<input type=\"text\" id=\"{}\" name=\"{}\" value=\"{}\" required>\n<br>\n",
            element_id,
            escape_html(&field.name),
            escape_html(&value),
        ));
    }

    html.push_str(&format!("<button type=\"submit\">{submit_label}</button>\n"));
    html.push_str(
        "<button type=\"button\" class=\"button cancel-button\" data-action=\"cancel\">Cancel</button>\n",
    );
    html.push_str("</form>\n");
    html
}

/// Render records as a table. Columns come from the keys of the first
/// record; later records missing a column show an empty cell. No records
/// renders nothing.
pub fn render_list(records: &[Record], collection: CollectionName) -> String {
    let Some(first) = records.first() else {
        return String::new();
    };
    let headers: Vec<&str> = first.keys().collect();

    let mut html = String::from("<table class=\"data-table\">\n<thead>\n<tr>");
    for header in &headers {
        html.push_str(&format!("<th>{}</th>", escape_html(header)));
    }
    html.push_str("<th>Actions</th></tr>\n</thead>\n<tbody>\n");

    for record in records {
        html.push_str("<tr>");
        for header in &headers {
            html.push_str(&format!("<td>{}</td>", escape_html(&record.display_value(header))));
        }
        let id = escape_html(record.id().unwrap_or_default());
        html.push_str(&format!(
            "<td><button class=\"button delete-button\" data-action=\"delete\" data-collection=\"{c}\" data-id=\"{id}\">Delete</button>\
             <button class=\"button edit-button\" data-action=\"edit\" data-collection=\"{c}\" data-id=\"{id}\">Edit</button></td>",
            c = collection.as_str(),
        ));
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n");
    html
}

/// Render the full CRUD page: a titled list and an add button per
/// collection, then the shared form container.
pub fn render_page(sections: &[PageSection<'_>], form_html: &str) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Requirements Board</title>\n</head>\n<body>\n",
    );
    for section in sections {
        let name = section.collection.as_str();
        html.push_str(&format!("<h2>{}</h2>\n", escape_html(&page_title(name))));
        html.push_str(&format!(
            "<div id=\"{}\">\n{}</div>\n",
            list_container_id(section.collection),
            section.list_html,
        ));
        html.push_str(&format!(
            "<button class=\"button add-button\" data-action=\"new\" data-collection=\"{name}\">Add New Entry</button>\n",
        ));
    }
    html.push_str(&format!(
        "<div id=\"{FORM_CONTAINER_ID}\">\n{form_html}</div>\n</body>\n</html>\n"
    ));
    html
}

/// Escape HTML special characters for text and attribute values.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_page_title() {
        assert_eq!(page_title("actors"), "Actors");
        assert_eq!(page_title("acceptanceCriteria"), "AcceptanceCriteria");
        assert_eq!(page_title(""), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b"), "a &lt; b");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#"say "hi""#), "say &quot;hi&quot;");
    }

    #[test]
    fn empty_list_renders_no_table() {
        assert_eq!(render_list(&[], CollectionName::Actors), "");
    }

    #[test]
    fn list_has_row_per_record_and_columns_from_first() {
        let records = vec![
            record(json!({"id": "1", "name": "Alice", "type": "Hero"})),
            record(json!({"id": "2", "name": "Bob", "extra": "ignored"})),
            record(json!({"id": "3", "name": "Carol", "type": "Sidekick"})),
        ];
        let html = render_list(&records, CollectionName::Actors);

        assert_eq!(html.matches("<table").count(), 1);
        assert!(html.contains("<th>id</th><th>name</th><th>type</th><th>Actions</th>"));
        // header row plus one row per record
        assert_eq!(html.matches("<tr>").count(), 4);
        assert!(!html.contains("extra"));
        assert!(!html.contains("ignored"));
        assert!(html.contains("<td>2</td><td>Bob</td><td></td>"));
        assert_eq!(html.matches("data-action=\"delete\"").count(), 3);
        assert_eq!(html.matches("data-action=\"edit\"").count(), 3);
        assert!(html.contains("data-action=\"edit\" data-collection=\"actors\" data-id=\"3\""));
    }

    #[test]
    fn list_escapes_cell_values() {
        let records = vec![record(json!({"id": "1", "name": "<script>"}))];
        let html = render_list(&records, CollectionName::Requirements);
        assert!(html.contains("<td>&lt;script&gt;</td>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn form_has_one_required_input_per_field() {
        let schema = Schema::new([("name", "name"), ("type", "type")]);
        let html = render_form(ADD_FORM_ID, CollectionName::Actors, &schema, &FormAction::Create, None);

        assert_eq!(html.matches("<input").count(), 2);
        assert_eq!(html.matches(" required>").count(), 2);
        assert_eq!(html.matches("type=\"text\"").count(), 2);
        assert!(html.contains("id=\"name\" name=\"name\""));
        assert!(html.contains("id=\"type\" name=\"type\""));
        assert!(html.contains("<label for=\"name\">Name:</label>"));
        assert_eq!(html.matches("type=\"submit\"").count(), 1);
        assert!(html.contains("<form id=\"addForm\" data-collection=\"actors\" data-action=\"create\">"));
    }

    #[test]
    fn actor_inputs_use_schema_element_ids() {
        let html = render_form(
            ADD_FORM_ID,
            CollectionName::Actors,
            &Schema::actors(),
            &FormAction::Create,
            None,
        );
        assert!(html.contains("<label for=\"actorName\">Name:</label>"));
        assert!(html.contains("id=\"actorName\" name=\"name\" value=\"\""));
        assert!(html.contains("<label for=\"typeName\">Type:</label>"));
        assert!(html.contains("id=\"typeName\" name=\"type\" value=\"\""));
        assert!(!html.contains("id=\"name\""));
    }

    #[test]
    fn edit_form_is_prefilled_and_bound_to_id() {
        let existing = record(json!({"id": "abc", "name": "Login \"fast\"", "type": "Functional"}));
        let html = render_form(
            EDIT_FORM_ID,
            CollectionName::Requirements,
            &Schema::requirements(),
            &FormAction::Update { id: "abc".into() },
            Some(&existing),
        );
        assert!(html.contains("data-action=\"update\" data-id=\"abc\""));
        assert!(html.contains("id=\"requirementText\" name=\"name\" value=\"Login &quot;fast&quot;\""));
        assert!(html.contains("id=\"requirementType\" name=\"type\" value=\"Functional\""));
        assert!(html.contains(">Update</button>"));
        assert!(html.contains("data-action=\"cancel\""));
    }

    #[test]
    fn page_lists_every_section_then_form_container() {
        let sections: Vec<PageSection<'_>> = CollectionName::ALL
            .into_iter()
            .map(|collection| PageSection { collection, list_html: "" })
            .collect();
        let html = render_page(&sections, "<form></form>\n");

        assert!(html.contains("<h2>Actors</h2>"));
        assert!(html.contains("<h2>AcceptanceCriteria</h2>"));
        assert!(html.contains("<div id=\"requirementsList\">"));
        assert_eq!(html.matches("Add New Entry").count(), 3);
        let form_at = html.find("id=\"formContainer\"").unwrap();
        let last_list = html.find("id=\"acceptanceCriteriaList\"").unwrap();
        assert!(form_at > last_list);
        assert!(html.contains("<div id=\"formContainer\">\n<form></form>\n</div>"));
    }
}
