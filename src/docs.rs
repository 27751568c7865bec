// src/docs.rs

use crate::handlers;
use crate::models;
use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,

        // --- Events ---
        handlers::events::list,
        handlers::events::get_by_slug,
        handlers::events::create,
        handlers::events::update,
        handlers::events::delete,

        // --- Demands ---
        handlers::demands::create,
        handlers::demands::get_by_slug,
        handlers::demands::list_by_event,
        handlers::demands::stats_by_event,
        handlers::demands::update_status,
        handlers::demands::delete,

        // --- Payments ---
        handlers::payments::notify,

        // --- Guests ---
        handlers::guests::validate,
        handlers::guests::qr_code,

        // --- Users ---
        handlers::users::list,
        handlers::users::create,
        handlers::users::delete,

        // --- Files ---
        handlers::files::upload,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::LoginPayload,
            models::auth::CreateUserPayload,
            models::auth::LoginData,

            // --- Events ---
            models::event::Event,
            models::event::Price,
            models::event::EventTable,
            models::event::EventDto,
            models::event::PricePayload,
            models::event::TablePayload,
            models::event::SaveEventPayload,

            // --- Demands ---
            models::demand::DemandStatus,
            models::demand::DemandType,
            models::demand::Guest,
            models::demand::TableItemDto,
            models::demand::DemandDetail,
            models::demand::MainGuestDto,
            models::demand::DemandSummary,
            models::demand::DemandStatsEntry,
            models::demand::GuestPayload,
            models::demand::TableSelectionPayload,
            models::demand::CreateDemandPayload,
            models::demand::UpdateStatusPayload,

            // --- Payments ---
            models::payment::PaymentCanal,
            models::payment::PaymentDto,
            models::payment::PaymentNotifyPayload,

            // --- Guests ---
            handlers::guests::GuestValidationResponse,

            // --- Files ---
            handlers::files::UploadData,
        )
    ),
    tags(
        (name = "Auth", description = "Authentification de la console"),
        (name = "Events", description = "Gestion des évènements, tarifs et tables"),
        (name = "Demands", description = "Demandes de participation et statuts"),
        (name = "Payments", description = "Notifications de paiement"),
        (name = "Guests", description = "Tickets et contrôle d'accès"),
        (name = "Users", description = "Comptes de la console (ADMIN / SECURITY)"),
        (name = "Files", description = "Téléversement des visuels")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // O documento OpenAPI é o contrato de rede publicado; os paths abaixo
    // são exatamente os que o portal chama.
    #[test]
    fn paths_publicados_batem_com_o_contrato_do_portal() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(|p| p.as_str()).collect();

        // O scan de ticket posta direto no slug, sem segmento extra.
        assert!(paths.contains(&"/api/guest/{slug}"));
        assert!(!paths.iter().any(|p| p.starts_with("/api/guest/validate")));

        assert!(paths.contains(&"/api/auth/login"));
        assert!(paths.contains(&"/api/event"));
        assert!(paths.contains(&"/api/event/{slug}"));
        assert!(paths.contains(&"/api/demand"));
        assert!(paths.contains(&"/api/demand/{slug}"));
        assert!(paths.contains(&"/api/demand/by-event/{slug}"));
        assert!(paths.contains(&"/api/demand/stats/{slug}"));
        assert!(paths.contains(&"/api/demand/{slug}/status"));
        assert!(paths.contains(&"/api/payment/notify"));
        assert!(paths.contains(&"/api/user"));
        assert!(paths.contains(&"/api/file-upload"));
    }
}
