//! Static-source admin grid example.
//!
//! Run with: cargo run --example memory_admin
//!
//! Builds a controller over an in-memory collection, renders it through a
//! column list, and walks the create/update/delete surface the way an admin
//! screen would.

use crudgrid_lib::controller::CrudController;
use crudgrid_lib::controller::CrudEvent;
use crudgrid_lib::controller::EventSink;
use crudgrid_lib::model::Column;
use crudgrid_lib::model::EnumOption;
use crudgrid_lib::model::FieldType;
use crudgrid_lib::model::FormModel;
use crudgrid_lib::model::Record;
use crudgrid_lib::model::Value;
use crudgrid_lib::render::GridView;
use crudgrid_lib::source::OperationKind;
use crudgrid_lib::source::SourceConfig;

struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn on_success(&self, event: &CrudEvent) {
        println!("[ok] {}", event.kind());
    }

    fn on_error(&self, kind: OperationKind, message: &str) {
        println!("[error] {}: {}", kind, message);
    }
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("id", "ID").field_type(FieldType::Number).readonly(),
        Column::new("name", "Name").required().searchable(),
        Column::new("age", "Age").field_type(FieldType::Number),
        Column::new("created_at", "Created").field_type(FieldType::Date),
        Column::new("status", "Status").options(vec![
            EnumOption::new("active", "Active"),
            EnumOption::new("inactive", "Inactive"),
        ]),
        Column::new("is_admin", "Admin").field_type(FieldType::Boolean),
    ]
}

fn seed() -> Vec<Record> {
    (1..=7)
        .map(|n| {
            Record::new()
                .set("id", n)
                .set("name", format!("Jane Smith {}", n))
                .set("age", 24 + n)
                .set("created_at", "2023-01-01")
                .set("status", if n % 2 == 0 { "inactive" } else { "active" })
                .set("is_admin", n == 1)
        })
        .collect()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let columns = columns();
    let grid = GridView::new(columns.clone());

    let controller = CrudController::builder("id", SourceConfig::static_records(seed()))
        .page_size(5)
        .optimistic()
        .event_sink(ConsoleSink)
        .build()?;

    controller.refresh().await;
    println!("\n{}\n", grid.to_text(&controller.state().items));

    // Modal "New" form: validate, then submit through the controller.
    let mut form = FormModel::create(&columns);
    form.set("name", "Jane Smith 8");
    form.set("age", 31);
    form.set("created_at", "2024-06-01");
    form.set("status", "active");
    form.set("is_admin", false);

    match form.submit(&controller).await {
        Ok(Some(record)) => println!("Created record {:?}", record.get("id")),
        Ok(None) => println!("Create failed, see error above"),
        Err(errors) => {
            for error in errors {
                println!("[invalid] {}", error);
            }
        }
    }

    controller.update(&Value::Int(2), Record::new().set("status", "active")).await;
    controller.delete(&Value::Int(3)).await;

    println!("\n{}\n", grid.to_text(&controller.state().items));

    let state = controller.state();
    println!("page {} of {} records total", state.current_page, state.total);
    println!("\nCSV export:\n{}", grid.to_csv(&state.items));

    Ok(())
}
