pub mod comanda;
pub mod empresa;
pub mod mesa;
pub mod orden;
pub mod producto;
pub mod tasa;
pub mod usuario;

pub use comanda::*;
pub use empresa::*;
pub use mesa::*;
pub use orden::*;
pub use producto::*;
pub use tasa::*;
pub use usuario::*;
