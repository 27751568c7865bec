// src/services/event_service.rs

use chrono::NaiveDate;
use sqlx::PgPool;
use std::cmp::Ordering;
use uuid::Uuid;

use crate::{
    common::{dates, error::AppError},
    db::EventRepository,
    models::event::{Event, EventDto, Price, PricePayload, SaveEventPayload},
};

// ---
// Validador de tarifas (função pura sobre o estado do formulário)
// ---
//
// Regras, avaliadas em dia de calendário:
//   1. start <= end para cada palier;
//   2. end <= data do evento para cada palier;
//   3. start[i] estritamente depois de end[i-1] (i >= 1).
//
// Uma data ausente curto-circuita a regra para "válido": o erro de campo
// obrigatório pertence aos validadores de payload, não a este.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceRuleViolation {
    MissingEventDate,
    InvalidRange,
    CoverageOrOverlap,
}

impl PriceRuleViolation {
    // Mensagens na língua do portal, uma por categoria: só a primeira
    // categoria que falhar é exibida.
    pub fn message(&self) -> &'static str {
        match self {
            PriceRuleViolation::MissingEventDate => {
                "Veuillez renseigner la date de l'événement."
            }
            PriceRuleViolation::InvalidRange => {
                "Chaque prix doit avoir une date de fin supérieure ou égale à sa date de début."
            }
            PriceRuleViolation::CoverageOrOverlap => {
                "Vérifiez les dates des prix : respect de la date de l'événement et ordre strict entre les plages."
            }
        }
    }
}

pub fn validate_prices(
    event_date: Option<NaiveDate>,
    prices: &[PricePayload],
) -> Result<(), PriceRuleViolation> {
    // Prioridade 1: sem data do evento, nada mais é verificável.
    let Some(event_date) = event_date else {
        return Err(PriceRuleViolation::MissingEventDate);
    };

    // Prioridade 2: start <= end, palier por palier.
    for p in prices {
        if let (Some(_), Some(_)) = (p.start_date, p.end_date) {
            if dates::cmp_opt(p.start_date, p.end_date) == Ordering::Greater {
                return Err(PriceRuleViolation::InvalidRange);
            }
        }
    }

    // Prioridade 3: cobertura do evento + adjacência estrita, juntas.
    for p in prices {
        if p.end_date.is_some()
            && dates::cmp_opt(p.end_date, Some(event_date)) == Ordering::Greater
        {
            return Err(PriceRuleViolation::CoverageOrOverlap);
        }
    }
    for pair in prices.windows(2) {
        let prev_end = pair[0].end_date;
        let cur_start = pair[1].start_date;
        if prev_end.is_some()
            && cur_start.is_some()
            && dates::cmp_opt(cur_start, prev_end) != Ordering::Greater
        {
            return Err(PriceRuleViolation::CoverageOrOverlap);
        }
    }

    Ok(())
}

// Palier ativo: aquele (no máximo um, por construção das regras acima) cujo
// intervalo inclusivo contém o dia de hoje.
pub fn active_price(prices: &[Price], today: NaiveDate) -> Option<&Price> {
    prices
        .iter()
        .find(|p| dates::contains_day(p.start_date, p.end_date, today))
}

// Slug público: nome normalizado + sufixo aleatório curto.
pub fn slugify(name: &str) -> String {
    let base: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let base = base
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", base, &suffix[..6])
}

// ---
// Serviço
// ---

#[derive(Clone)]
pub struct EventService {
    repo: EventRepository,
    pool: PgPool,
}

impl EventService {
    pub fn new(repo: EventRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn create(&self, payload: &SaveEventPayload) -> Result<EventDto, AppError> {
        validate_prices(payload.date, &payload.prices)
            .map_err(|v| AppError::BusinessRule(v.message().to_string()))?;
        let date = payload
            .date
            .ok_or_else(|| AppError::BusinessRule(
                PriceRuleViolation::MissingEventDate.message().to_string(),
            ))?;

        let slug = slugify(&payload.name);

        let mut tx = self.pool.begin().await?;

        let event = self
            .repo
            .insert_event(
                &mut *tx,
                &slug,
                &payload.name,
                date,
                &payload.location,
                payload.description.as_deref(),
                payload.cover_image.as_deref(),
            )
            .await?;

        let (prices, tables) = self.insert_children(&mut tx, &event, payload).await?;

        tx.commit().await?;

        tracing::info!("🎫 Évènement créé: {} ({})", event.name, event.slug);
        Ok(EventDto::assemble(event, prices, tables))
    }

    pub async fn update(
        &self,
        slug: &str,
        payload: &SaveEventPayload,
    ) -> Result<EventDto, AppError> {
        validate_prices(payload.date, &payload.prices)
            .map_err(|v| AppError::BusinessRule(v.message().to_string()))?;
        let date = payload
            .date
            .ok_or_else(|| AppError::BusinessRule(
                PriceRuleViolation::MissingEventDate.message().to_string(),
            ))?;

        let existing = self
            .repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Évènement introuvable.".to_string()))?;

        let mut tx = self.pool.begin().await?;

        let event = self
            .repo
            .update_event(
                &mut *tx,
                existing.id,
                &payload.name,
                date,
                &payload.location,
                payload.description.as_deref(),
                payload.cover_image.as_deref(),
            )
            .await?;

        // Substituição integral dos filhos: mais simples e idempotente do que
        // reconciliar linha a linha.
        self.repo.delete_prices(&mut *tx, event.id).await?;
        self.repo.delete_tables(&mut *tx, event.id).await?;
        let (prices, tables) = self.insert_children(&mut tx, &event, payload).await?;

        tx.commit().await?;
        Ok(EventDto::assemble(event, prices, tables))
    }

    async fn insert_children(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        event: &Event,
        payload: &SaveEventPayload,
    ) -> Result<(Vec<Price>, Vec<crate::models::event::EventTable>), AppError> {
        let mut prices = Vec::with_capacity(payload.prices.len());
        for (i, p) in payload.prices.iter().enumerate() {
            let start = p.start_date.ok_or_else(|| {
                AppError::BusinessRule("La date de début du tarif est requise.".to_string())
            })?;
            let end = p.end_date.ok_or_else(|| {
                AppError::BusinessRule("La date de fin du tarif est requise.".to_string())
            })?;
            let price = self
                .repo
                .insert_price(&mut **tx, event.id, &p.name, p.amount, start, end, i as i32)
                .await?;
            prices.push(price);
        }

        let mut tables = Vec::with_capacity(payload.tables.len());
        for t in &payload.tables {
            let table = self
                .repo
                .insert_table(&mut **tx, event.id, &t.name, t.amount, t.capacity)
                .await?;
            tables.push(table);
        }

        Ok((prices, tables))
    }

    pub async fn list(&self) -> Result<Vec<EventDto>, AppError> {
        let events = self.repo.list().await?;
        let ids: Vec<Uuid> = events.iter().map(|e| e.id).collect();

        // Duas consultas em lote e agrupamento em memória (evita N+1).
        let mut prices_by_event: std::collections::HashMap<Uuid, Vec<Price>> =
            std::collections::HashMap::new();
        for p in self.repo.prices_for_events(&ids).await? {
            prices_by_event.entry(p.event_id).or_default().push(p);
        }
        let mut tables_by_event: std::collections::HashMap<
            Uuid,
            Vec<crate::models::event::EventTable>,
        > = std::collections::HashMap::new();
        for t in self.repo.tables_for_events(&ids).await? {
            tables_by_event.entry(t.event_id).or_default().push(t);
        }

        let dtos = events
            .into_iter()
            .map(|event| {
                let event_prices = prices_by_event.remove(&event.id).unwrap_or_default();
                let event_tables = tables_by_event.remove(&event.id).unwrap_or_default();
                EventDto::assemble(event, event_prices, event_tables)
            })
            .collect();
        Ok(dtos)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<EventDto, AppError> {
        let event = self
            .repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Évènement introuvable.".to_string()))?;
        let prices = self.repo.prices_for_event(event.id).await?;
        let tables = self.repo.tables_for_event(event.id).await?;
        Ok(EventDto::assemble(event, prices, tables))
    }

    pub async fn delete(&self, slug: &str) -> Result<(), AppError> {
        let deleted = self.repo.delete_by_slug(slug).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Évènement introuvable.".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn d(s: &str) -> NaiveDate {
        dates::parse_date_only(s).unwrap()
    }

    fn palier(start: &str, end: &str) -> PricePayload {
        PricePayload {
            name: "Tarif".to_string(),
            amount: Decimal::from(100),
            start_date: Some(d(start)),
            end_date: Some(d(end)),
        }
    }

    #[test]
    fn aceita_paliers_adjacentes_cobrindo_o_evento() {
        let prices = vec![
            palier("2025-01-01", "2025-06-30"),
            palier("2025-07-01", "2025-12-31"),
        ];
        assert_eq!(validate_prices(Some(d("2025-12-31")), &prices), Ok(()));
    }

    #[test]
    fn rejeita_inicio_igual_ao_fim_do_palier_anterior() {
        // start[1] == end[0]: a adjacência exige estritamente depois
        let prices = vec![
            palier("2025-01-01", "2025-06-30"),
            palier("2025-06-30", "2025-12-31"),
        ];
        assert_eq!(
            validate_prices(Some(d("2025-12-31")), &prices),
            Err(PriceRuleViolation::CoverageOrOverlap)
        );
    }

    #[test]
    fn rejeita_palier_terminando_depois_do_evento() {
        let prices = vec![palier("2025-01-01", "2026-01-05")];
        assert_eq!(
            validate_prices(Some(d("2025-12-31")), &prices),
            Err(PriceRuleViolation::CoverageOrOverlap)
        );
    }

    #[test]
    fn rejeita_intervalo_invertido_antes_das_outras_regras() {
        // O palier invertido também viola a cobertura, mas a categoria
        // "intervalo" tem prioridade na mensagem.
        let prices = vec![palier("2026-02-01", "2026-01-01")];
        assert_eq!(
            validate_prices(Some(d("2025-12-31")), &prices),
            Err(PriceRuleViolation::InvalidRange)
        );
    }

    #[test]
    fn data_do_evento_ausente_tem_prioridade_maxima() {
        let prices = vec![palier("2026-02-01", "2026-01-01")];
        assert_eq!(
            validate_prices(None, &prices),
            Err(PriceRuleViolation::MissingEventDate)
        );
    }

    #[test]
    fn data_ausente_num_palier_curto_circuita_as_regras() {
        let mut p = palier("2025-01-01", "2025-06-30");
        p.end_date = None;
        // O campo obrigatório pertence ao validador de payload; aqui passa.
        assert_eq!(validate_prices(Some(d("2025-12-31")), &[p]), Ok(()));
    }

    #[test]
    fn lista_vazia_de_paliers_e_aceita() {
        assert_eq!(validate_prices(Some(d("2025-12-31")), &[]), Ok(()));
    }

    fn price_row(start: &str, end: &str, amount: i64) -> Price {
        Price {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            name: "Tarif".to_string(),
            amount: Decimal::from(amount),
            start_date: d(start),
            end_date: d(end),
            position: 0,
        }
    }

    #[test]
    fn palier_ativo_e_inclusivo_nas_duas_pontas() {
        let prices = vec![
            price_row("2025-01-01", "2025-06-30", 100),
            price_row("2025-07-01", "2025-12-31", 150),
        ];
        assert_eq!(
            active_price(&prices, d("2025-06-30")).map(|p| p.amount),
            Some(Decimal::from(100))
        );
        assert_eq!(
            active_price(&prices, d("2025-07-01")).map(|p| p.amount),
            Some(Decimal::from(150))
        );
        assert!(active_price(&prices, d("2026-01-01")).is_none());
    }

    #[test]
    fn slugify_normaliza_e_sufixa() {
        let slug = slugify("Soirée Gala 2025!");
        assert!(slug.starts_with("soir-e-gala-2025-"));
        assert!(!slug.contains("--"));
        assert!(!slug.ends_with('-'));
    }
}
