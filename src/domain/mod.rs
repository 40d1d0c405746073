//! # Lógica del lado del cliente
//!
//! - [`seleccion`] - Selección acotada de asientos (FIFO)
//! - [`cartelera`] - Días de la semana y deduplicación de funciones
//! - [`validacion`] - Validación y saneamiento de formularios
//! - [`precio`] - Política de precio de los boletos
//! - [`boleto`] - Comprobante de compra y contenido del QR

pub mod boleto;
pub mod cartelera;
pub mod precio;
pub mod seleccion;
pub mod validacion;

pub use boleto::Boleto;
pub use cartelera::Dia;
pub use precio::PoliticaPrecio;
pub use seleccion::{Cambio, MapaAsientos, SeleccionAsientos};
