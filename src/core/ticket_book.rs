use crate::domain::model::{GameType, LottoTicket, TicketSortType};
use crate::domain::ports::Storage;
use crate::domain::ticket::TicketInfo;
use crate::utils::error::{LottoError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const TICKETS_FILE: &str = "tickets.json";

/// 持久化格式
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct TicketBookFile {
    next_ticket_id: i64,
    next_game_id: i64,
    tickets: Vec<LottoTicket>,
}

/// Registered tickets, persisted as one JSON document.
#[derive(Debug, Clone)]
pub struct TicketBook {
    next_ticket_id: i64,
    next_game_id: i64,
    tickets: Vec<LottoTicket>,
}

impl TicketBook {
    pub fn new() -> Self {
        Self {
            next_ticket_id: 1,
            next_game_id: 1,
            tickets: Vec::new(),
        }
    }

    pub async fn load<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        if !storage.exists(path).await {
            tracing::debug!("No ticket book at {}, starting empty", path);
            return Ok(Self::new());
        }

        let data = storage.read_file(path).await?;
        let file: TicketBookFile = serde_json::from_slice(&data)?;

        // 舊檔可能沒有 id 計數器，從現有資料推回來
        let max_ticket_id = file.tickets.iter().map(|t| t.ticket_id).max().unwrap_or(0);
        let max_game_id = file
            .tickets
            .iter()
            .flat_map(|t| t.games.iter().map(|g| g.game_id))
            .max()
            .unwrap_or(0);

        Ok(Self {
            next_ticket_id: file.next_ticket_id.max(max_ticket_id + 1),
            next_game_id: file.next_game_id.max(max_game_id + 1),
            tickets: file.tickets,
        })
    }

    pub async fn save<S: Storage>(&self, storage: &S, path: &str) -> Result<()> {
        let file = TicketBookFile {
            next_ticket_id: self.next_ticket_id,
            next_game_id: self.next_game_id,
            tickets: self.tickets.clone(),
        };
        let data = serde_json::to_vec_pretty(&file)?;
        storage.write_file(path, &data).await
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Stores `ticket`, assigning fresh ticket and game ids. A ticket whose
    /// QR url is already in the book is rejected.
    pub fn save_ticket(&mut self, mut ticket: LottoTicket) -> Result<i64> {
        if let Some(qr_url) = &ticket.qr_url {
            if self.tickets.iter().any(|t| t.qr_url.as_ref() == Some(qr_url)) {
                return Err(LottoError::DuplicateTicket {
                    qr_url: qr_url.clone(),
                });
            }
        }

        let ticket_id = self.next_ticket_id;
        self.next_ticket_id += 1;
        ticket.ticket_id = ticket_id;

        for game in &mut ticket.games {
            game.game_id = self.next_game_id;
            self.next_game_id += 1;
        }

        tracing::debug!(
            "Saved ticket {} for round {} with {} games",
            ticket_id,
            ticket.round,
            ticket.games.len()
        );
        self.tickets.push(ticket);
        Ok(ticket_id)
    }

    pub fn register(
        &mut self,
        info: &TicketInfo,
        game_types: &[GameType],
        registered_at: NaiveDateTime,
        qr_url: Option<String>,
    ) -> Result<i64> {
        let mut ticket = LottoTicket::from_info_with_types(info, registered_at, game_types);
        ticket.qr_url = qr_url;
        self.save_ticket(ticket)
    }

    pub fn delete(&mut self, ticket_id: i64) -> Result<()> {
        let before = self.tickets.len();
        self.tickets.retain(|t| t.ticket_id != ticket_id);
        if self.tickets.len() == before {
            return Err(LottoError::NotFound {
                entity: "ticket".to_string(),
                id: ticket_id.to_string(),
            });
        }
        Ok(())
    }

    /// 沒有這張就什麼都不做
    pub fn delete_by_qr_url(&mut self, qr_url: &str) {
        self.tickets.retain(|t| t.qr_url.as_deref() != Some(qr_url));
    }

    pub fn get(&self, ticket_id: i64) -> Option<&LottoTicket> {
        self.tickets.iter().find(|t| t.ticket_id == ticket_id)
    }

    pub fn all(&self, sort: TicketSortType) -> Vec<LottoTicket> {
        let mut tickets = self.tickets.clone();
        sort.sort(&mut tickets);
        tickets
    }

    /// 同一期的彩券，登錄時間新到舊
    pub fn by_round(&self, round: i32) -> Vec<LottoTicket> {
        let mut tickets: Vec<LottoTicket> = self
            .tickets
            .iter()
            .filter(|t| t.round == round)
            .cloned()
            .collect();
        TicketSortType::RegisteredDateDesc.sort(&mut tickets);
        tickets
    }

    pub fn unchecked(&self) -> Vec<LottoTicket> {
        self.tickets.iter().filter(|t| !t.is_checked).cloned().collect()
    }

    pub fn update_game_rank(&mut self, game_id: i64, rank: i32) -> Result<()> {
        let game = self
            .tickets
            .iter_mut()
            .flat_map(|t| t.games.iter_mut())
            .find(|g| g.game_id == game_id)
            .ok_or_else(|| LottoError::NotFound {
                entity: "game".to_string(),
                id: game_id.to_string(),
            })?;
        game.winning_rank = rank;
        Ok(())
    }

    pub fn update_checked(&mut self, ticket_id: i64, is_checked: bool) -> Result<()> {
        let ticket = self.find_mut(ticket_id)?;
        ticket.is_checked = is_checked;
        Ok(())
    }

    /// Replaces the stored ticket that has the same id.
    pub fn replace(&mut self, ticket: LottoTicket) -> Result<()> {
        let slot = self.find_mut(ticket.ticket_id)?;
        *slot = ticket;
        Ok(())
    }

    fn find_mut(&mut self, ticket_id: i64) -> Result<&mut LottoTicket> {
        self.tickets
            .iter_mut()
            .find(|t| t.ticket_id == ticket_id)
            .ok_or_else(|| LottoError::NotFound {
                entity: "ticket".to_string(),
                id: ticket_id.to_string(),
            })
    }
}

impl Default for TicketBook {
    fn default() -> Self {
        Self::new()
    }
}
