pub mod catalog;
pub mod health;
pub mod input;
pub mod medications;
pub mod reports;
pub mod sales;

use actix_web::web;
use diesel::pg::PgConnection;

use crate::db::RequestConnection;
use crate::domain::errors::DomainError;
use crate::errors::AppError;

/// Run `work` on the blocking pool with the request's connection.
///
/// The connection is checked out inside the blocking task and released as
/// soon as `work` returns; an unavailable database surfaces as 503.
pub(crate) async fn blocking<T, F>(mut db: RequestConnection, work: F) -> Result<T, AppError>
where
    F: FnOnce(&mut PgConnection) -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    let result = web::block(move || {
        let outcome = work(db.get()?);
        db.release();
        outcome
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(result?)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/medicamentos")
                    .route("", web::get().to(medications::list_medications))
                    .route("", web::post().to(medications::create_medication))
                    .route("/{id}", web::get().to(medications::get_medication))
                    .route("/{id}", web::put().to(medications::update_medication))
                    .route("/{id}", web::delete().to(medications::delete_medication))
                    .route("/{id}/precio", web::put().to(medications::update_price))
                    .route("/{id}/stock", web::patch().to(medications::add_stock))
                    .route("/{id}/estado", web::patch().to(medications::change_status)),
            )
            .route("/categorias", web::get().to(catalog::list_categories))
            .route("/proveedores", web::get().to(catalog::list_suppliers))
            .route("/empleados", web::get().to(catalog::list_employees))
            .route("/clientes", web::get().to(catalog::list_clients))
            .service(
                web::scope("/ventas")
                    .route("", web::post().to(sales::create_sale))
                    .route("", web::get().to(sales::list_sales))
                    .route("/{id}", web::get().to(sales::get_sale)),
            )
            .service(
                web::scope("/reportes")
                    .route("", web::get().to(reports::list_reports))
                    .route("/{slug}", web::get().to(reports::run_report)),
            ),
    )
    .route("/test-db", web::get().to(health::test_db));
}
