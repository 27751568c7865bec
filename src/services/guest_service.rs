// src/services/guest_service.rs

use std::io::Cursor;

use image::Luma;
use qrcode::QrCode;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::GuestRepository,
    models::demand::{DemandStatus, Guest},
};

// ---
// Resultado da validação de ticket (trivalente, nunca erro HTTP)
// ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketOutcome {
    Valid(Guest),
    AlreadyUsed(Guest),
    Invalid,
}

// ---
// Extração do slug a partir do conteúdo bruto do QR code
// ---
//
// O QR pode conter o slug puro ou a URL completa do ticket; na URL, o slug
// é o último segmento não vazio do caminho.
pub fn extract_slug(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        if let Some(seg) = trimmed
            .trim_end_matches('/')
            .rsplit('/')
            .find(|s| !s.is_empty())
        {
            return seg.to_string();
        }
    }
    trimmed.to_string()
}

// ---
// Sessão de scan contínuo (portaria)
// ---
//
// O leitor dispara decodificações em rajada; a sessão suprime as repetições
// do mesmo slug e qualquer leitura enquanto uma verificação está em voo.

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanStatus {
    #[default]
    Scanning,
    Loading,
    Valid,
    AlreadyUsed,
    Invalid,
}

#[derive(Debug, Default)]
pub struct ScanSession {
    pub status: ScanStatus,
    last_slug: Option<String>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    // Devolve o slug a verificar, ou None quando a leitura deve ser ignorada.
    pub fn on_decoded(&mut self, raw: &str) -> Option<String> {
        if self.status == ScanStatus::Loading {
            return None;
        }
        let slug = extract_slug(raw);
        if slug.is_empty() || self.last_slug.as_deref() == Some(slug.as_str()) {
            return None;
        }
        self.last_slug = Some(slug.clone());
        self.status = ScanStatus::Loading;
        Some(slug)
    }

    pub fn on_result(&mut self, outcome: &TicketOutcome) {
        self.status = match outcome {
            TicketOutcome::Valid(_) => ScanStatus::Valid,
            TicketOutcome::AlreadyUsed(_) => ScanStatus::AlreadyUsed,
            TicketOutcome::Invalid => ScanStatus::Invalid,
        };
    }

    // Volta a escanear e permite reler o mesmo ticket.
    pub fn reset(&mut self) {
        self.status = ScanStatus::Scanning;
        self.last_slug = None;
    }
}

#[derive(Clone)]
pub struct GuestService {
    repo: GuestRepository,
    pool: PgPool,
    public_base_url: String,
}

impl GuestService {
    pub fn new(repo: GuestRepository, pool: PgPool, public_base_url: String) -> Self {
        Self {
            repo,
            pool,
            public_base_url,
        }
    }

    // Trivalente: ticket desconhecido ou demande não quitada → Invalid;
    // a marcação de uso é atômica, então duas leituras simultâneas nunca
    // validam o mesmo ticket duas vezes.
    pub async fn validate_ticket(&self, raw: &str) -> Result<TicketOutcome, AppError> {
        let slug = extract_slug(raw);
        let Some(row) = self.repo.find_ticket(&slug).await? else {
            return Ok(TicketOutcome::Invalid);
        };

        if !matches!(
            row.demand_status,
            DemandStatus::Payee | DemandStatus::Offert
        ) {
            return Ok(TicketOutcome::Invalid);
        }

        let won = self.repo.mark_used(&self.pool, row.id).await?;
        let guest = row.into_guest();
        if won {
            tracing::info!("🎟️ Ticket {} validé ({} {})", slug, guest.first_name, guest.last_name);
            Ok(TicketOutcome::Valid(Guest {
                state: true,
                ..guest
            }))
        } else {
            tracing::info!("🔁 Ticket {} déjà utilisé", slug);
            Ok(TicketOutcome::AlreadyUsed(guest))
        }
    }

    // PNG do QR code apontando para a página pública do ticket.
    pub async fn qr_png(&self, slug: &str) -> Result<Vec<u8>, AppError> {
        let row = self
            .repo
            .find_ticket(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Ticket introuvable.".to_string()))?;

        let url = format!(
            "{}/guest/{}",
            self.public_base_url.trim_end_matches('/'),
            row.slug
        );
        let code = QrCode::new(url.as_bytes())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("QR code: {e}")))?;
        let img = code.render::<Luma<u8>>().min_dimensions(320, 320).build();

        let mut bytes = Vec::new();
        image::DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("PNG: {e}")))?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn slug_literal_passa_intacto() {
        assert_eq!(extract_slug("abc123"), "abc123");
        assert_eq!(extract_slug("  abc123  "), "abc123");
    }

    #[test]
    fn url_completa_rende_o_ultimo_segmento() {
        assert_eq!(extract_slug("https://example.com/t/abc123"), "abc123");
        assert_eq!(extract_slug("https://example.com/t/abc123/"), "abc123");
        assert_eq!(extract_slug("http://example.com/abc123"), "abc123");
    }

    #[test]
    fn url_sem_caminho_rende_o_host() {
        // Degenerado: sem segmento de caminho, sobra o host.
        assert_eq!(extract_slug("https://example.com"), "example.com");
    }

    fn guest() -> Guest {
        Guest {
            id: Uuid::new_v4(),
            demand_id: Uuid::new_v4(),
            slug: "g1".to_string(),
            first_name: "Awa".to_string(),
            last_name: "Diop".to_string(),
            email: "awa@example.com".to_string(),
            phone_number: "770000000".to_string(),
            age: 30,
            is_main_guest: true,
            state: false,
        }
    }

    #[test]
    fn sessao_suprime_releitura_do_mesmo_slug() {
        let mut session = ScanSession::new();
        assert_eq!(session.on_decoded("abc123"), Some("abc123".to_string()));
        session.on_result(&TicketOutcome::Valid(guest()));
        // Mesmo slug logo em seguida: ignorado
        assert_eq!(session.on_decoded("abc123"), None);
        // Slug diferente: aceito
        assert_eq!(session.on_decoded("xyz789"), Some("xyz789".to_string()));
    }

    #[test]
    fn sessao_ignora_leituras_durante_verificacao() {
        let mut session = ScanSession::new();
        assert!(session.on_decoded("abc123").is_some());
        assert_eq!(session.status, ScanStatus::Loading);
        // Rajada do leitor enquanto a verificação está em voo
        assert_eq!(session.on_decoded("outro"), None);
        session.on_result(&TicketOutcome::Invalid);
        assert_eq!(session.status, ScanStatus::Invalid);
    }

    #[test]
    fn reset_permite_reler_o_mesmo_ticket() {
        let mut session = ScanSession::new();
        assert!(session.on_decoded("abc123").is_some());
        session.on_result(&TicketOutcome::AlreadyUsed(guest()));
        assert_eq!(session.status, ScanStatus::AlreadyUsed);
        session.reset();
        assert_eq!(session.status, ScanStatus::Scanning);
        assert_eq!(session.on_decoded("abc123"), Some("abc123".to_string()));
    }

    #[test]
    fn url_no_qr_e_normalizada_antes_da_supressao() {
        let mut session = ScanSession::new();
        assert_eq!(
            session.on_decoded("https://example.com/t/abc123"),
            Some("abc123".to_string())
        );
        session.on_result(&TicketOutcome::Valid(guest()));
        // A forma literal do mesmo slug também é suprimida
        assert_eq!(session.on_decoded("abc123"), None);
    }
}
