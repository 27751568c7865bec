// src/services/demand_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DemandRepository, EventRepository, PaymentRepository},
    models::{
        demand::{
            CreateDemandPayload, Demand, DemandDetail, DemandStatsEntry, DemandStatus,
            DemandSummary, DemandType, Guest, MainGuestDto, TableItemDto,
        },
        event::EventDto,
    },
};

// ---
// Máquina de estados do statut de demande
// ---
//
// Tabela fechada: qualquer transição fora dela é recusada. PAIEMENT_NOTIFIE
// não aparece como destino aqui porque só é alcançável pelo efeito colateral
// da notificação de pagamento (ver payment_service).

pub fn allowed_next(from: DemandStatus) -> &'static [DemandStatus] {
    use DemandStatus::*;
    match from {
        Soumise => &[Validee, Refusee, Offert],
        Validee => &[Refusee],
        PaiementNotifie => &[Payee, Refusee],
        Refusee => &[Validee],
        Payee => &[Offert],
        Offert => &[],
    }
}

// Transição para o próprio estado atual conta como recusada (no-op).
pub fn can_transition(from: DemandStatus, to: DemandStatus) -> bool {
    from != to && allowed_next(from).contains(&to)
}

// ---
// Protocolo de mudança de statut com confirmação (console admin)
// ---
//
// 1. stage()    — registra a transição proposta (prev, next), sem efeito;
// 2. confirm()  — aplica otimisticamente na lista local e devolve o que
//                 enviar ao servidor;
// 3. on_success() / on_failure() — limpa o pendente; em caso de falha a
//                 entrada volta exatamente ao statut anterior.
//
// A lista nunca pode exibir um statut incompatível com o último estado
// confirmado pelo servidor por mais de um round-trip.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingStatusChange {
    pub slug: String,
    pub prev: DemandStatus,
    pub next: DemandStatus,
}

#[derive(Debug, Default)]
pub struct DemandBoard {
    pub demands: Vec<DemandSummary>,
    pending: Option<PendingStatusChange>,
}

impl DemandBoard {
    pub fn new(demands: Vec<DemandSummary>) -> Self {
        Self {
            demands,
            pending: None,
        }
    }

    pub fn pending(&self) -> Option<&PendingStatusChange> {
        self.pending.as_ref()
    }

    // Recusa silenciosa: statut idêntico ou transição fora da tabela não
    // geram requisição nenhuma.
    pub fn stage(&mut self, slug: &str, next: DemandStatus) -> bool {
        if self.pending.is_some() {
            return false; // no máximo uma mutação em voo por entidade
        }
        let Some(current) = self.demands.iter().find(|d| d.slug == slug) else {
            return false;
        };
        if !can_transition(current.status, next) {
            return false;
        }
        self.pending = Some(PendingStatusChange {
            slug: slug.to_string(),
            prev: current.status,
            next,
        });
        true
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    // Aplica otimisticamente e devolve a transição a enviar ao servidor.
    pub fn confirm(&mut self) -> Option<PendingStatusChange> {
        let pc = self.pending.clone()?;
        self.apply(&pc.slug, pc.next);
        Some(pc)
    }

    pub fn on_success(&mut self) {
        self.pending = None;
    }

    // Reverte a entrada ao statut anterior à transição.
    pub fn on_failure(&mut self) {
        if let Some(pc) = self.pending.take() {
            self.apply(&pc.slug, pc.prev);
        }
    }

    fn apply(&mut self, slug: &str, status: DemandStatus) {
        if let Some(d) = self.demands.iter_mut().find(|d| d.slug == slug) {
            d.status = status;
        }
    }
}

// ---
// Serviço
// ---

#[derive(Clone)]
pub struct DemandService {
    repo: DemandRepository,
    event_repo: EventRepository,
    payment_repo: PaymentRepository,
    pool: PgPool,
}

impl DemandService {
    pub fn new(
        repo: DemandRepository,
        event_repo: EventRepository,
        payment_repo: PaymentRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            event_repo,
            payment_repo,
            pool,
        }
    }

    pub async fn create(&self, payload: &CreateDemandPayload) -> Result<DemandDetail, AppError> {
        let event = self
            .event_repo
            .find_by_slug(&payload.event_slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Évènement introuvable.".to_string()))?;

        // Exatamente um convidado principal. Sem marcação explícita, o
        // primeiro da lista assume o papel.
        let main_count = payload.guests.iter().filter(|g| g.is_main_guest).count();
        if main_count > 1 {
            return Err(AppError::BusinessRule(
                "Une demande ne peut avoir qu'un seul invité principal.".to_string(),
            ));
        }

        // As tables selecionadas precisam pertencer ao evento.
        let event_tables = self.event_repo.tables_for_event(event.id).await?;
        for sel in &payload.table_selections {
            if !event_tables.iter().any(|t| t.id == sel.table_id) {
                return Err(AppError::BusinessRule(
                    "Une des tables sélectionnées n'appartient pas à cet évènement.".to_string(),
                ));
            }
        }

        let demand_type = if payload.guests.len() == 1 {
            DemandType::Unique
        } else {
            DemandType::Group
        };

        let mut tx = self.pool.begin().await?;

        let slug = Uuid::new_v4().simple().to_string();
        let demand = self
            .repo
            .insert_demand(&mut *tx, &slug, event.id, demand_type)
            .await?;

        let mut guests = Vec::with_capacity(payload.guests.len());
        for (i, g) in payload.guests.iter().enumerate() {
            let is_main = if main_count == 0 { i == 0 } else { g.is_main_guest };
            let guest_slug = Uuid::new_v4().simple().to_string();
            let guest = self
                .repo
                .insert_guest(
                    &mut *tx,
                    demand.id,
                    &guest_slug,
                    &g.first_name,
                    &g.last_name,
                    &g.email,
                    &g.phone_number,
                    g.age,
                    is_main,
                )
                .await?;
            guests.push(guest);
        }

        for sel in &payload.table_selections {
            self.repo
                .insert_table_item(&mut *tx, demand.id, sel.table_id, sel.quantity)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "📩 Demande {} soumise pour l'évènement {} ({} invité(s))",
            demand.slug,
            payload.event_slug,
            guests.len()
        );

        self.assemble_detail(demand, Some(guests)).await
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<DemandDetail, AppError> {
        let demand = self
            .repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Demande introuvable.".to_string()))?;
        self.assemble_detail(demand, None).await
    }

    async fn assemble_detail(
        &self,
        demand: Demand,
        guests: Option<Vec<Guest>>,
    ) -> Result<DemandDetail, AppError> {
        let guests = match guests {
            Some(g) => g,
            None => self.repo.guests_for_demand(demand.id).await?,
        };
        let table_items = self
            .repo
            .table_items_for_demand(demand.id)
            .await?
            .into_iter()
            .map(TableItemDto::from)
            .collect();
        let payment = self
            .payment_repo
            .find_by_demand(demand.id)
            .await?
            .map(Into::into);

        let event = self
            .event_repo
            .find_by_id(demand.event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Évènement introuvable.".to_string()))?;
        let prices = self.event_repo.prices_for_event(event.id).await?;
        let tables = self.event_repo.tables_for_event(event.id).await?;

        Ok(DemandDetail {
            id: demand.id,
            slug: demand.slug,
            status: demand.status,
            demand_type: demand.demand_type,
            created_at: demand.created_at,
            guests,
            table_items,
            payment,
            event: EventDto::assemble(event, prices, tables),
        })
    }

    pub async fn list_by_event(
        &self,
        event_slug: &str,
        status: Option<DemandStatus>,
        demand_type: Option<DemandType>,
    ) -> Result<Vec<DemandSummary>, AppError> {
        let event = self
            .event_repo
            .find_by_slug(event_slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Évènement introuvable.".to_string()))?;

        let demands = self.repo.list_by_event(event.id, status, demand_type).await?;
        let ids: Vec<Uuid> = demands.iter().map(|d| d.id).collect();

        let mut guests_by_demand: std::collections::HashMap<Uuid, Vec<Guest>> =
            std::collections::HashMap::new();
        for g in self.repo.guests_for_demands(&ids).await? {
            guests_by_demand.entry(g.demand_id).or_default().push(g);
        }

        let summaries = demands
            .into_iter()
            .map(|d| {
                let guests = guests_by_demand.remove(&d.id).unwrap_or_default();
                let main = guests
                    .iter()
                    .find(|g| g.is_main_guest)
                    .or_else(|| guests.first());
                let main_guest = match main {
                    Some(g) => MainGuestDto {
                        first_name: g.first_name.clone(),
                        last_name: g.last_name.clone(),
                        email: g.email.clone(),
                        phone_number: g.phone_number.clone(),
                        age: g.age,
                    },
                    // Demande sem convidado não deveria existir; devolvemos
                    // um principal vazio em vez de quebrar a listagem.
                    None => MainGuestDto {
                        first_name: String::new(),
                        last_name: String::new(),
                        email: String::new(),
                        phone_number: String::new(),
                        age: 0,
                    },
                };
                DemandSummary {
                    id: d.id,
                    slug: d.slug,
                    status: d.status,
                    demand_type: d.demand_type,
                    number_of_guests: guests.len() as i64,
                    created_at: d.created_at,
                    guests,
                    main_guest,
                }
            })
            .collect();
        Ok(summaries)
    }

    pub async fn stats_by_event(
        &self,
        event_slug: &str,
    ) -> Result<Vec<DemandStatsEntry>, AppError> {
        let event = self
            .event_repo
            .find_by_slug(event_slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Évènement introuvable.".to_string()))?;
        self.repo.stats_by_event(event.id).await
    }

    // O backend é a autoridade: mesmo um cliente bem comportado tem a
    // transição reverificada aqui.
    pub async fn update_status(
        &self,
        slug: &str,
        next: DemandStatus,
    ) -> Result<DemandStatus, AppError> {
        let demand = self
            .repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Demande introuvable.".to_string()))?;

        if demand.status == next {
            // No-op: nada a escrever.
            return Ok(demand.status);
        }
        if !can_transition(demand.status, next) {
            return Err(AppError::BusinessRule(format!(
                "Transition de statut non autorisée ({:?} → {:?}).",
                demand.status, next
            )));
        }

        self.repo.update_status(&self.pool, demand.id, next).await?;
        tracing::info!("🔁 Demande {} passe à {:?}", slug, next);
        Ok(next)
    }

    pub async fn delete(&self, slug: &str) -> Result<(), AppError> {
        let deleted = self.repo.delete_by_slug(slug).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Demande introuvable.".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn tabela_de_transicoes_respeitada() {
        use DemandStatus::*;
        assert!(can_transition(Soumise, Validee));
        assert!(can_transition(Soumise, Refusee));
        assert!(can_transition(Soumise, Offert));
        assert!(can_transition(Validee, Refusee));
        assert!(can_transition(PaiementNotifie, Payee));
        assert!(can_transition(PaiementNotifie, Refusee));
        assert!(can_transition(Refusee, Validee));
        assert!(can_transition(Payee, Offert));

        // Fora da tabela
        assert!(!can_transition(Payee, Validee));
        assert!(!can_transition(Validee, Payee));
        assert!(!can_transition(Offert, Soumise));
        assert!(!can_transition(Soumise, PaiementNotifie));

        // Mesmo statut = recusa silenciosa
        assert!(!can_transition(Soumise, Soumise));
        assert!(!can_transition(Payee, Payee));
    }

    fn summary(slug: &str, status: DemandStatus) -> DemandSummary {
        DemandSummary {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            status,
            demand_type: DemandType::Unique,
            number_of_guests: 1,
            created_at: Utc::now(),
            guests: vec![],
            main_guest: MainGuestDto {
                first_name: "Awa".to_string(),
                last_name: "Diop".to_string(),
                email: "awa@example.com".to_string(),
                phone_number: "770000000".to_string(),
                age: 30,
            },
        }
    }

    #[test]
    fn confirmacao_aplica_otimisticamente_e_sucesso_limpa_o_pendente() {
        let mut board = DemandBoard::new(vec![summary("d1", DemandStatus::Soumise)]);

        assert!(board.stage("d1", DemandStatus::Validee));
        // stage não muda nada ainda
        assert_eq!(board.demands[0].status, DemandStatus::Soumise);

        let sent = board.confirm().unwrap();
        assert_eq!(sent.prev, DemandStatus::Soumise);
        assert_eq!(sent.next, DemandStatus::Validee);
        assert_eq!(board.demands[0].status, DemandStatus::Validee);

        board.on_success();
        assert!(board.pending().is_none());
    }

    #[test]
    fn falha_do_servidor_restaura_o_statut_anterior() {
        let mut board = DemandBoard::new(vec![summary("d1", DemandStatus::Soumise)]);

        assert!(board.stage("d1", DemandStatus::Validee));
        board.confirm().unwrap();
        assert_eq!(board.demands[0].status, DemandStatus::Validee);

        // O servidor recusa: a entrada volta exatamente ao valor anterior
        // e nenhum pendente sobra.
        board.on_failure();
        assert_eq!(board.demands[0].status, DemandStatus::Soumise);
        assert!(board.pending().is_none());
    }

    #[test]
    fn cancelamento_descarta_sem_requisicao() {
        let mut board = DemandBoard::new(vec![summary("d1", DemandStatus::Soumise)]);
        assert!(board.stage("d1", DemandStatus::Refusee));
        board.cancel();
        assert!(board.pending().is_none());
        assert_eq!(board.demands[0].status, DemandStatus::Soumise);
        // Nada a confirmar depois do cancelamento
        assert!(board.confirm().is_none());
    }

    #[test]
    fn stage_recusa_mesmo_statut_e_transicao_ilegal() {
        let mut board = DemandBoard::new(vec![summary("d1", DemandStatus::Payee)]);
        assert!(!board.stage("d1", DemandStatus::Payee));
        assert!(!board.stage("d1", DemandStatus::Validee));
        assert!(board.stage("d1", DemandStatus::Offert));
    }

    #[test]
    fn no_maximo_uma_mutacao_em_voo() {
        let mut board = DemandBoard::new(vec![
            summary("d1", DemandStatus::Soumise),
            summary("d2", DemandStatus::Soumise),
        ]);
        assert!(board.stage("d1", DemandStatus::Validee));
        // Segunda tentativa enquanto a primeira está pendente
        assert!(!board.stage("d2", DemandStatus::Refusee));
    }
}
