//! OpenAPI documentation for the panel API, served at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "kargoctl",
        description = "Courier cargo tracking panel: barcode batch intake, \
                       exchange cargos and problem-shipment follow-up."
    ),
    servers((url = "/api")),
    paths(
        crate::api::handlers::auth::login,
        crate::api::handlers::auth::check,
        crate::api::handlers::auth::logout,
        crate::api::handlers::barcodes::save_barcodes,
        crate::api::handlers::barcodes::check_barcode,
        crate::api::handlers::transactions::list_transactions,
        crate::api::handlers::transactions::get_transaction,
        crate::api::handlers::transactions::delete_transaction,
        crate::api::handlers::exchange_cargos::save_exchange_cargo,
        crate::api::handlers::exchange_cargos::list_exchange_cargos,
        crate::api::handlers::exchange_cargos::delete_exchange_cargo,
        crate::api::handlers::problem_cargos::save_problem_cargo,
        crate::api::handlers::problem_cargos::list_problem_cargos,
        crate::api::handlers::problem_cargos::get_problem_cargo,
        crate::api::handlers::problem_cargos::update_problem_cargo,
        crate::api::handlers::problem_cargos::delete_problem_cargo,
        crate::api::handlers::problem_cargos::update_status,
        crate::api::handlers::problem_cargos::update_depo_gorusu,
        crate::api::handlers::users::kurye_list,
    ),
    tags(
        (name = "auth", description = "Login, session check and logout"),
        (name = "barcodes", description = "Barcode batch intake"),
        (name = "transactions", description = "Batch review"),
        (name = "exchange-cargos", description = "Exchange cargo logging and review"),
        (name = "sorunlu-kargolar", description = "Problem-shipment follow-up"),
        (name = "users", description = "User lookups"),
    )
)]
pub struct ApiDoc;
