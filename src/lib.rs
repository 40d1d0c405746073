//! # CineFox
//!
//! Cliente del API de boletos de cine (`https://apiboletos.onrender.com`).
//!
//! Toda la lógica de negocio vive en el servidor; este crate consulta y
//! muestra sus datos, valida formularios antes de enviarlos, deduplica las
//! funciones de la cartelera y administra la selección de asientos.
//!
//! ## Arquitectura
//!
//! ```text
//! CLI (clap)
//!     ↓
//! compra / domain (selección, cartelera, validación, precio)
//!     ↓
//! ApiClient (reqwest) ── TokenStore (archivo / memoria)
//!     ↓ HTTP/JSON
//! API de boletos
//! ```

pub mod api;
pub mod compra;
pub mod config;
pub mod domain;
pub mod models;
pub mod store;

pub use api::{ApiClient, AppError, AppResult};
pub use config::ClientConfig;
