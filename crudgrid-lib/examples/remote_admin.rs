//! Remote-source admin grid example.
//!
//! Run with: cargo run --example remote_admin
//!
//! Requires the demo server to be running first:
//!   cargo run -p crudgrid-server
//!
//! The demo server speaks plain REST (`GET /users` returns a bare array),
//! so the list response is remapped into a page through a transform.

use crudgrid_lib::controller::CrudController;
use crudgrid_lib::error::ApiError;
use crudgrid_lib::model::Column;
use crudgrid_lib::model::FieldType;
use crudgrid_lib::model::Record;
use crudgrid_lib::query::Page;
use crudgrid_lib::render::GridView;
use crudgrid_lib::source::ApiConfig;
use crudgrid_lib::source::Endpoints;
use crudgrid_lib::source::SourceConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ApiConfig::new("http://localhost:3000")
        .endpoints(Endpoints::resource("/users"))
        .response_transform(|body| {
            let users: Vec<Record> = serde_json::from_value(body)
                .map_err(|e| ApiError::parse(e.to_string()))?;
            let total = users.len() as u64;
            Ok(Page::new(users, total))
        });

    let controller = CrudController::builder("id", SourceConfig::api(config))
        .page_size(10)
        .build()?;

    controller.refresh().await;
    let state = controller.state();
    if let Some(error) = &state.last_error {
        println!("Could not reach the demo server: {}", error);
        println!("Start it with: cargo run -p crudgrid-server");
        return Ok(());
    }

    let grid = GridView::new(vec![
        Column::new("id", "ID").field_type(FieldType::Number),
        Column::new("name", "Name"),
        Column::new("age", "Age").field_type(FieldType::Number),
        Column::new("createdAt", "Created").field_type(FieldType::Date),
        Column::new("status", "Status"),
    ]);
    println!("\n{}\n", grid.to_text(&state.items));

    let created = controller
        .create(Record::new().set("name", "Jane Smith 2").set("age", 25))
        .await;
    match created {
        Some(record) => println!("Server assigned id {:?}", record.get("id")),
        None => println!("Create failed: {:?}", controller.state().last_error),
    }

    controller.refresh().await;
    println!("\n{}\n", grid.to_text(&controller.state().items));

    Ok(())
}
