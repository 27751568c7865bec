// src/services/payment_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{DemandRepository, EventRepository, PaymentRepository},
    models::{
        demand::DemandStatus,
        event::Price,
        payment::{PaymentCanal, PaymentDto, PaymentNotifyPayload},
    },
    services::event_service,
};

// ---
// Cálculo do montante devido
// ---
//
// montante = (tarifa ativa × nº de convidados) + Σ (montante da table × qtde).
// Sem palier ativo hoje, a parte dos convidados vale zero; as tables somam
// do mesmo jeito.

pub fn total_amount(
    active: Option<&Price>,
    guest_count: i64,
    table_items: &[(Decimal, i32)],
) -> Decimal {
    let participant_part = match active {
        Some(p) => p.amount * Decimal::from(guest_count),
        None => Decimal::ZERO,
    };
    let tables_part: Decimal = table_items
        .iter()
        .map(|(amount, qty)| *amount * Decimal::from(*qty))
        .sum();
    participant_part + tables_part
}

// A notificação exige um palier ativo hoje, sem exceção: um evento sem
// nenhum palier cadastrado também recusa.
fn require_active_tier(active: Option<&Price>) -> Result<&Price, AppError> {
    active.ok_or_else(|| {
        AppError::BusinessRule("Aucun tarif n'est actif à cette date.".to_string())
    })
}

// Coerência canal/coordenadas: telefone obrigatório fora do CASH, lieu
// d'encaissement obrigatório só no CASH.
fn check_canal_fields(payload: &PaymentNotifyPayload) -> Result<(), AppError> {
    let phone_ok = payload
        .phone_number
        .as_deref()
        .is_some_and(|p| !p.trim().is_empty());
    let place_ok = payload
        .payment_place
        .as_deref()
        .is_some_and(|p| !p.trim().is_empty());

    match payload.payment_canal {
        PaymentCanal::Cash => {
            if !place_ok {
                return Err(AppError::BusinessRule(
                    "Veuillez indiquer le lieu d'encaissement.".to_string(),
                ));
            }
        }
        PaymentCanal::Wave | PaymentCanal::OrangeMoney => {
            if !phone_ok {
                return Err(AppError::BusinessRule(
                    "Le numéro de téléphone est requis pour ce canal.".to_string(),
                ));
            }
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct PaymentService {
    repo: PaymentRepository,
    demand_repo: DemandRepository,
    event_repo: EventRepository,
    pool: PgPool,
}

impl PaymentService {
    pub fn new(
        repo: PaymentRepository,
        demand_repo: DemandRepository,
        event_repo: EventRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            demand_repo,
            event_repo,
            pool,
        }
    }

    // Registra a notificação e faz a demande avançar para PAIEMENT_NOTIFIE.
    // Único caminho de entrada nesse statut.
    pub async fn notify(&self, payload: &PaymentNotifyPayload) -> Result<PaymentDto, AppError> {
        check_canal_fields(payload)?;

        let demand = self
            .demand_repo
            .find_by_slug(&payload.demand_slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Demande introuvable.".to_string()))?;

        if demand.status != DemandStatus::Validee {
            return Err(AppError::BusinessRule(
                "Seule une demande validée peut notifier un paiement.".to_string(),
            ));
        }

        let prices = self.event_repo.prices_for_event(demand.event_id).await?;
        let today = Utc::now().date_naive();
        let active = require_active_tier(event_service::active_price(&prices, today))?;

        let guest_count = self.demand_repo.guests_for_demand(demand.id).await?.len() as i64;
        let table_items: Vec<(Decimal, i32)> = self
            .demand_repo
            .table_items_for_demand(demand.id)
            .await?
            .into_iter()
            .map(|row| (row.table_amount, row.quantity))
            .collect();

        // O servidor é a única autoridade sobre o montante.
        let amount = total_amount(Some(active), guest_count, &table_items);
        if payload.amount != Decimal::ZERO && payload.amount != amount {
            tracing::warn!(
                "⚠️ Montant client divergent pour la demande {} (reçu {}, calculé {})",
                demand.slug,
                payload.amount,
                amount
            );
        }

        let mut tx = self.pool.begin().await?;
        let payment = self
            .repo
            .insert(
                &mut *tx,
                demand.id,
                amount,
                payload.payment_canal,
                payload.phone_number.as_deref(),
                payload.payment_place.as_deref(),
            )
            .await?;
        self.demand_repo
            .update_status(&mut *tx, demand.id, DemandStatus::PaiementNotifie)
            .await?;
        tx.commit().await?;

        tracing::info!(
            "💰 Paiement notifié pour la demande {} ({} via {:?})",
            demand.slug,
            amount,
            payload.payment_canal
        );

        Ok(payment.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn price(amount: i64) -> Price {
        Price {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            name: "Standard".to_string(),
            amount: Decimal::from(amount),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            position: 0,
        }
    }

    #[test]
    fn montante_soma_tarifa_e_tables() {
        // tarifa 100 × 3 convidados + table 50 × 2 = 400
        let p = price(100);
        let total = total_amount(Some(&p), 3, &[(Decimal::from(50), 2)]);
        assert_eq!(total, Decimal::from(400));
    }

    #[test]
    fn sem_palier_ativo_so_as_tables_contam() {
        let total = total_amount(None, 3, &[(Decimal::from(50), 2)]);
        assert_eq!(total, Decimal::from(100));
    }

    #[test]
    fn sem_tables_so_a_tarifa_conta() {
        let p = price(250);
        let total = total_amount(Some(&p), 2, &[]);
        assert_eq!(total, Decimal::from(500));
    }

    #[test]
    fn evento_sem_palier_cadastrado_recusa_a_notificacao() {
        // Lista vazia de paliers = nenhum palier ativo = recusa, mesmo com
        // tables selecionadas que somariam um montante.
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let active = crate::services::event_service::active_price(&[], today);
        assert!(require_active_tier(active).is_err());
    }

    #[test]
    fn palier_ativo_passa_pelo_guarda() {
        let p = price(100);
        let prices = vec![p];
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let active = crate::services::event_service::active_price(&prices, today);
        assert!(require_active_tier(active).is_ok());
    }

    fn notify_payload(canal: PaymentCanal) -> PaymentNotifyPayload {
        PaymentNotifyPayload {
            demand_slug: "abc".to_string(),
            amount: Decimal::ZERO,
            payment_canal: canal,
            phone_number: None,
            payment_place: None,
        }
    }

    #[test]
    fn canal_movel_exige_telefone() {
        let mut payload = notify_payload(PaymentCanal::Wave);
        assert!(check_canal_fields(&payload).is_err());
        payload.phone_number = Some("770000000".to_string());
        assert!(check_canal_fields(&payload).is_ok());
    }

    #[test]
    fn cash_exige_lieu_de_encaissement() {
        let mut payload = notify_payload(PaymentCanal::Cash);
        assert!(check_canal_fields(&payload).is_err());
        payload.payment_place = Some("Guichet principal".to_string());
        assert!(check_canal_fields(&payload).is_ok());
        // Telefone em branco não conta
        let mut p2 = notify_payload(PaymentCanal::OrangeMoney);
        p2.phone_number = Some("   ".to_string());
        assert!(check_canal_fields(&p2).is_err());
    }
}
