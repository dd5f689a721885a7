pub mod agenda;
pub mod selection;

pub use agenda::AgendaService;
pub use selection::{Selection, SelectionController};
