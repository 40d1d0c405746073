//! Copias transitorias de las entidades del servidor.
//!
//! Los nombres en el cable siguen la convención del API: camelCase con el
//! nombre de la entidad como sufijo (`nombrePelicula`, `idSala`, ...).

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::api::{AppError, AppResult};
use crate::domain::cartelera::Dia;

pub type Id = i64;

/// Deserializadores tolerantes: el API a veces envía números como texto
pub(crate) mod flexible {
    use serde::{de, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumeroOTexto {
        Numero(f64),
        Texto(String),
    }

    fn a_f64<E: de::Error>(valor: NumeroOTexto) -> Result<f64, E> {
        match valor {
            NumeroOTexto::Numero(n) => Ok(n),
            NumeroOTexto::Texto(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("número inválido: {s:?}"))),
        }
    }

    pub fn f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<NumeroOTexto>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumeroOTexto::Texto(s)) if s.trim().is_empty() => Ok(None),
            Some(valor) => a_f64(valor).map(Some),
        }
    }

    pub fn u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let n = a_f64(NumeroOTexto::deserialize(deserializer)?)?;
        if n < 0.0 || n.fract() != 0.0 || n > f64::from(u32::MAX) {
            return Err(de::Error::custom(format!("entero inválido: {n}")));
        }
        Ok(n as u32)
    }

    pub fn u32_opt<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match f64_opt(deserializer)? {
            None => Ok(None),
            Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) => {
                Ok(Some(n as u32))
            }
            Some(n) => Err(de::Error::custom(format!("entero inválido: {n}"))),
        }
    }

    /// Texto que puede llegar como número (`"fila": 1`)
    pub fn texto<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum TextoONumero {
            Texto(String),
            Entero(i64),
        }

        Ok(match TextoONumero::deserialize(deserializer)? {
            TextoONumero::Texto(s) => s,
            TextoONumero::Entero(n) => n.to_string(),
        })
    }

    /// Lista que puede llegar como arreglo o como texto separado por comas
    pub fn lista<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum ListaOTexto {
            Lista(Vec<String>),
            Texto(String),
        }

        Ok(match Option::<ListaOTexto>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(ListaOTexto::Lista(items)) => items,
            Some(ListaOTexto::Texto(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoUsuario {
    Admin,
    Cliente,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    #[serde(default)]
    pub id_usuario: Option<Id>,
    pub nombre_usuario: String,
    #[serde(default)]
    pub apellido_usuario: String,
    #[serde(default, deserialize_with = "flexible::u32_opt")]
    pub edad_usuario: Option<u32>,
    #[serde(default)]
    pub correo_usuario: String,
    #[serde(default)]
    pub telefono_usuario: Option<String>,
    #[serde(default)]
    pub tipo_usuario: Option<TipoUsuario>,
}

/// Datos de registro ya validados
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NuevoUsuario {
    pub nombre_usuario: String,
    pub apellido_usuario: String,
    pub edad_usuario: u32,
    pub correo_usuario: String,
    pub telefono_usuario: String,
    pub contrasena_usuario: String,
    pub tipo_usuario: TipoUsuario,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Credenciales<'a> {
    pub correo_usuario: &'a str,
    pub contrasena_usuario: &'a str,
}

/// Respuesta del login
#[derive(Debug, Clone, Deserialize)]
pub struct Sesion {
    #[serde(alias = "accessToken", alias = "access_token")]
    pub token: String,
    #[serde(default)]
    pub usuario: Option<Usuario>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pelicula {
    pub id_pelicula: Id,
    pub nombre_pelicula: String,
    #[serde(default)]
    pub director_pelicula: String,
    #[serde(default, deserialize_with = "flexible::f64_opt")]
    pub duracion_pelicula: Option<f64>,
    #[serde(default)]
    pub actores_pelicula: String,
    #[serde(default)]
    pub clasificacion_pelicula: String,
    #[serde(default)]
    pub descripcion_pelicula: String,
    #[serde(default)]
    pub imagen_pelicula: Option<String>,
    #[serde(default, deserialize_with = "flexible::f64_opt")]
    pub precio_boleto: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ImagenPelicula {
    pub nombre_archivo: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Formulario de película ya saneado; se envía como multipart
#[derive(Debug, Clone)]
pub struct PeliculaForm {
    pub nombre: String,
    pub director: String,
    pub duracion: f64,
    pub actores: String,
    pub clasificacion: String,
    pub descripcion: String,
    pub precio_boleto: f64,
    pub imagen: Option<ImagenPelicula>,
}

impl PeliculaForm {
    pub fn into_multipart(self) -> AppResult<Form> {
        let mut form = Form::new()
            .text("nombrePelicula", self.nombre)
            .text("directorPelicula", self.director)
            .text("duracionPelicula", self.duracion.to_string())
            .text("actoresPelicula", self.actores)
            .text("clasificacionPelicula", self.clasificacion)
            .text("descripcionPelicula", self.descripcion)
            .text("precioBoleto", format!("{:.2}", self.precio_boleto));

        if let Some(imagen) = self.imagen {
            let part = Part::bytes(imagen.bytes)
                .file_name(imagen.nombre_archivo)
                .mime_str(&imagen.mime)
                .map_err(|e| AppError::validation_field("imagenPelicula", &e.to_string()))?;
            form = form.part("imagenPelicula", part);
        }

        Ok(form)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Horario {
    pub id_horario: Id,
    pub hora_programada: String,
    #[serde(default)]
    pub turno: String,
    #[serde(default)]
    pub fecha_de_emision: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turno {
    Matutino,
    Vespertino,
    Nocturno,
}

impl std::str::FromStr for Turno {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "matutino" => Ok(Turno::Matutino),
            "vespertino" => Ok(Turno::Vespertino),
            "nocturno" => Ok(Turno::Nocturno),
            _ => Err(AppError::validation_field(
                "turno",
                "Turno inválido (matutino, vespertino o nocturno)",
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NuevoHorario {
    pub hora_programada: String,
    pub turno: Turno,
    pub fecha_de_emision: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sala {
    pub id_sala: Id,
    pub nombre_sala: String,
    #[serde(deserialize_with = "flexible::u32")]
    pub cantidad_asientos: u32,
    #[serde(deserialize_with = "flexible::u32")]
    pub cantidad_filas: u32,
    #[serde(deserialize_with = "flexible::u32")]
    pub max_asientos_por_fila: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NuevaSala {
    pub nombre_sala: String,
    pub cantidad_asientos: u32,
    pub cantidad_filas: u32,
    pub max_asientos_por_fila: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstadoAsiento {
    Libre,
    Ocupado,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asiento {
    pub id_asiento: Id,
    #[serde(deserialize_with = "flexible::texto")]
    pub fila: String,
    #[serde(deserialize_with = "flexible::u32")]
    pub numero: u32,
    pub id_sala_asiento: Id,
    pub estado: EstadoAsiento,
}

impl Asiento {
    /// Etiqueta visible del asiento, por ejemplo `A-1`
    pub fn etiqueta(&self) -> String {
        format!("{}-{}", self.fila, self.numero)
    }

    pub fn libre(&self) -> bool {
        self.estado == EstadoAsiento::Libre
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CambioAsiento {
    pub id_asiento: Id,
    pub estado: EstadoAsiento,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActualizacionAsientos {
    pub asientos: Vec<CambioAsiento>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cartelera {
    pub id_cartelera: Id,
    pub id_pelicula: Id,
    pub id_horario: Id,
    pub id_sala: Id,
    #[serde(default, deserialize_with = "flexible::lista")]
    pub dias: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NuevaCartelera {
    pub id_pelicula: Id,
    pub id_sala: Id,
    pub id_horario: Id,
    pub dias: Vec<Dia>,
}

/// Entrada de la cartelera de un día, con los datos de película, horario y sala
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FuncionDia {
    pub id_cartelera: Option<Id>,
    pub id_pelicula: Option<Id>,
    pub nombre_pelicula: String,
    pub descripcion_pelicula: Option<String>,
    pub imagen_pelicula: Option<String>,
    pub id_horario: Option<Id>,
    pub hora_programada: String,
    pub turno: Option<String>,
    pub id_sala: Option<Id>,
    pub nombre_sala: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MensajeContacto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistroLog {
    pub usuario: String,
    pub accion: String,
    pub fecha_hora: String,
    pub host: String,
}

/// Respuesta de las operaciones de escritura; el API no tiene un formato fijo
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Confirmacion {
    #[serde(default, alias = "message")]
    pub mensaje: Option<String>,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
}
