use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{catalog, health, medications, reports, sales};
use crate::infrastructure::models::{CategoryRow, ClientRow, EmployeeRow, SupplierRow};

/// Every response is wrapped as `{"estado", "datos", "mensaje"}`; the schemas
/// below describe `datos`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pharmacy Service",
        description = "Inventory, sales and reporting endpoints over the pharmacy procedure packages."
    ),
    paths(
        medications::list_medications,
        medications::get_medication,
        medications::create_medication,
        medications::update_medication,
        medications::update_price,
        medications::add_stock,
        medications::change_status,
        medications::delete_medication,
        catalog::list_categories,
        catalog::list_suppliers,
        catalog::list_employees,
        catalog::list_clients,
        sales::create_sale,
        sales::list_sales,
        sales::get_sale,
        reports::list_reports,
        reports::run_report,
        health::test_db,
    ),
    components(schemas(
        medications::MedicationRequest,
        medications::PriceRequest,
        medications::StockRequest,
        medications::StatusRequest,
        medications::MedicationResponse,
        sales::CreateSaleRequest,
        sales::SaleLineRequest,
        sales::SaleCreatedResponse,
        sales::SaleSummaryResponse,
        sales::SaleDetailResponse,
        sales::SaleLineResponse,
        reports::ReportInfo,
        reports::ReportParamInfo,
        CategoryRow,
        SupplierRow,
        EmployeeRow,
        ClientRow,
    )),
    tags(
        (name = "medicamentos", description = "Medication inventory"),
        (name = "catalogo", description = "Reference listings"),
        (name = "ventas", description = "Sales"),
        (name = "reportes", description = "Read-only reports"),
        (name = "salud", description = "Database connectivity"),
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi())
}
