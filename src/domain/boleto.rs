use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Comprobante de una compra confirmada
#[derive(Debug, Clone, Serialize)]
pub struct Boleto {
    pub folio: Uuid,
    pub pelicula: String,
    pub sala: String,
    pub horario: String,
    pub asientos: Vec<String>,
    pub boletos: usize,
    pub total: f64,
    pub emitido: DateTime<Utc>,
}

impl Boleto {
    pub fn new(
        pelicula: &str,
        sala: &str,
        horario: &str,
        asientos: Vec<String>,
        total: f64,
    ) -> Self {
        Self {
            folio: Uuid::new_v4(),
            pelicula: pelicula.to_string(),
            sala: sala.to_string(),
            horario: horario.to_string(),
            boletos: asientos.len(),
            asientos,
            total,
            emitido: Utc::now(),
        }
    }

    /// Contenido del código QR: `{asiento, sala, total, fecha}`
    pub fn qr_payload(&self) -> String {
        serde_json::json!({
            "asiento": self.asientos.join(", "),
            "sala": self.sala,
            "total": self.total,
            "fecha": self.horario,
        })
        .to_string()
    }
}

impl fmt::Display for Boleto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Folio: {}", self.folio)?;
        writeln!(f, "Película: {}", self.pelicula)?;
        writeln!(f, "Sala: {}", self.sala)?;
        writeln!(f, "Horario: {}", self.horario)?;
        writeln!(f, "Número de boletos: {}", self.boletos)?;
        writeln!(f, "Asientos: {}", self.asientos.join(", "))?;
        write!(f, "Total pagado: ${:.2}", self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qr_payload_matches_ticket() {
        let boleto = Boleto::new(
            "Avatar",
            "Sala 1",
            "18:00",
            vec!["A-1".into(), "A-2".into()],
            160.0,
        );
        let payload: serde_json::Value = serde_json::from_str(&boleto.qr_payload()).unwrap();
        assert_eq!(payload["asiento"], "A-1, A-2");
        assert_eq!(payload["sala"], "Sala 1");
        assert_eq!(payload["total"], 160.0);
        assert_eq!(payload["fecha"], "18:00");
        assert_eq!(boleto.boletos, 2);
    }

    #[test]
    fn each_ticket_gets_its_own_folio() {
        let a = Boleto::new("Ted", "Sala 2", "12:00", vec!["B-1".into()], 80.0);
        let b = Boleto::new("Ted", "Sala 2", "12:00", vec!["B-1".into()], 80.0);
        assert_ne!(a.folio, b.folio);
        assert!(a.to_string().contains("Total pagado: $80.00"));
    }
}
