pub mod checker;
pub mod draw_calendar;
pub mod engine;
pub mod statistics;
pub mod sync;
pub mod ticket_book;

pub use crate::domain::model::{
    LottoGame, LottoResult, LottoTicket, SyncResult, TicketSortType, WinningStatistics,
};
pub use crate::domain::ports::{ConfigProvider, DrawSource, Storage};
pub use crate::domain::ticket::TicketInfo;
pub use crate::utils::error::Result;
