//! # Validación de formularios
//!
//! Todas las validaciones corren antes de cualquier llamada de red. Un error
//! bloquea el envío y se reporta como `AppError::ValidationWithField`.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime, Timelike};
use regex::Regex;

use crate::api::{AppError, AppResult};
use crate::domain::cartelera::Dia;
use crate::models::{
    Id, ImagenPelicula, MensajeContacto, NuevaCartelera, NuevaSala, NuevoHorario, NuevoUsuario,
    PeliculaForm, TipoUsuario, Turno,
};

pub const CLASIFICACIONES: [&str; 5] = ["G", "PG", "PG-13", "R", "NC-17"];
pub const IMAGENES_PERMITIDAS: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];

fn regex(celda: &'static OnceLock<Regex>, patron: &str) -> &'static Regex {
    celda.get_or_init(|| Regex::new(patron).expect("patrón de validación inválido"))
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    regex(&EMAIL_REGEX, r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
}

/// Campos obligatorios de login
pub fn validar_login(correo: &str, contrasena: &str) -> AppResult<()> {
    if correo.trim().is_empty() || contrasena.is_empty() {
        return Err(AppError::Validation(
            "Correo y contraseña son requeridos".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Contacto
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ContactoEntrada {
    pub nombre: String,
    pub correo: String,
    pub mensaje: String,
}

/// Recorta y elimina todo lo que no sea letra, dígito, `@`, `.` o espacio
pub fn sanear_contacto(texto: &str) -> String {
    static NO_PERMITIDOS: OnceLock<Regex> = OnceLock::new();
    regex(&NO_PERMITIDOS, r"[^a-zA-Z0-9@.\s]")
        .replace_all(texto.trim(), "")
        .into_owned()
}

pub fn validar_contacto(entrada: &ContactoEntrada) -> AppResult<MensajeContacto> {
    static NOMBRE_REGEX: OnceLock<Regex> = OnceLock::new();

    let nombre = sanear_contacto(&entrada.nombre);
    let correo = sanear_contacto(&entrada.correo);
    let mensaje = sanear_contacto(&entrada.mensaje);

    if !regex(&NOMBRE_REGEX, r"^[A-Za-z\s]+$").is_match(&nombre) || nombre.chars().count() < 15
    {
        return Err(AppError::validation_field(
            "nombre",
            "El nombre debe tener al menos 15 caracteres y no debe contener números o caracteres especiales.",
        ));
    }

    if !email_regex().is_match(&correo) {
        return Err(AppError::validation_field(
            "correo",
            "Por favor ingresa un correo electrónico válido.",
        ));
    }

    let largo = mensaje.chars().count();
    if !(20..=300).contains(&largo) {
        return Err(AppError::validation_field(
            "mensaje",
            "El mensaje debe tener entre 20 y 300 caracteres.",
        ));
    }

    Ok(MensajeContacto {
        id: None,
        name: nombre,
        email: correo,
        message: mensaje,
    })
}

// ---------------------------------------------------------------------------
// Registro de usuarios
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RegistroEntrada {
    pub nombre: String,
    pub apellido: String,
    pub edad: String,
    pub correo: String,
    pub telefono: String,
    pub contrasena: String,
}

fn validar_nombre_propio(campo: &str, valor: &str) -> AppResult<String> {
    static NOMBRE_REGEX: OnceLock<Regex> = OnceLock::new();
    let valor = valor.trim();
    let largo = valor.chars().count();

    if !(2..=50).contains(&largo) {
        return Err(AppError::validation_field(
            campo,
            "Debe tener entre 2 y 50 caracteres",
        ));
    }

    if !regex(&NOMBRE_REGEX, r"^[A-Za-zÁÉÍÓÚÜÑáéíóúüñ ]+$").is_match(valor) {
        return Err(AppError::validation_field(
            campo,
            "Solo puede contener letras y espacios",
        ));
    }

    Ok(valor.to_string())
}

/// Contraseña de 8 a 128 caracteres con mayúscula, minúscula, dígito y símbolo
pub fn validar_contrasena(contrasena: &str) -> AppResult<()> {
    let campo = "contrasena";
    let largo = contrasena.chars().count();

    if largo < 8 {
        return Err(AppError::validation_field(
            campo,
            "La contraseña debe tener al menos 8 caracteres",
        ));
    }

    if largo > 128 {
        return Err(AppError::validation_field(
            campo,
            "La contraseña debe tener como máximo 128 caracteres",
        ));
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_special = false;

    for c in contrasena.chars() {
        if c.is_uppercase() {
            has_upper = true;
        } else if c.is_lowercase() {
            has_lower = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else if !c.is_alphanumeric() {
            has_special = true;
        }
    }

    if !has_upper {
        return Err(AppError::validation_field(
            campo,
            "La contraseña debe contener al menos una mayúscula",
        ));
    }

    if !has_lower {
        return Err(AppError::validation_field(
            campo,
            "La contraseña debe contener al menos una minúscula",
        ));
    }

    if !has_digit {
        return Err(AppError::validation_field(
            campo,
            "La contraseña debe contener al menos un dígito",
        ));
    }

    if !has_special {
        return Err(AppError::validation_field(
            campo,
            "La contraseña debe contener al menos un carácter especial",
        ));
    }

    Ok(())
}

pub fn validar_registro(entrada: &RegistroEntrada, tipo: TipoUsuario) -> AppResult<NuevoUsuario> {
    static TELEFONO_REGEX: OnceLock<Regex> = OnceLock::new();

    let nombre = validar_nombre_propio("nombre", &entrada.nombre)?;
    let apellido = validar_nombre_propio("apellido", &entrada.apellido)?;

    let edad: u32 = entrada
        .edad
        .trim()
        .parse()
        .map_err(|_| AppError::validation_field("edad", "La edad debe ser un número entero"))?;
    if !(1..=120).contains(&edad) {
        return Err(AppError::validation_field(
            "edad",
            "La edad debe estar entre 1 y 120",
        ));
    }

    let correo = entrada.correo.trim().to_string();
    if !email_regex().is_match(&correo) {
        return Err(AppError::validation_field(
            "correo",
            "Por favor ingresa un correo electrónico válido.",
        ));
    }

    let telefono: String = entrada
        .telefono
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    if !regex(&TELEFONO_REGEX, r"^\d{10}$").is_match(&telefono) {
        return Err(AppError::validation_field(
            "telefono",
            "El teléfono debe tener 10 dígitos",
        ));
    }

    validar_contrasena(&entrada.contrasena)?;

    Ok(NuevoUsuario {
        nombre_usuario: nombre,
        apellido_usuario: apellido,
        edad_usuario: edad,
        correo_usuario: correo,
        telefono_usuario: telefono,
        contrasena_usuario: entrada.contrasena.clone(),
        tipo_usuario: tipo,
    })
}

// ---------------------------------------------------------------------------
// Películas
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct PeliculaEntrada {
    pub nombre: String,
    pub director: String,
    pub duracion: String,
    pub actores: String,
    pub clasificacion: String,
    pub descripcion: String,
    pub precio: String,
    pub imagen: Option<ImagenPelicula>,
}

/// Quita etiquetas HTML y espacios en los extremos
pub fn sanear_texto(texto: &str) -> String {
    static ETIQUETAS: OnceLock<Regex> = OnceLock::new();
    regex(&ETIQUETAS, r"<[^>]*>")
        .replace_all(texto, "")
        .trim()
        .to_string()
}

fn numero_positivo(campo: &str, texto: &str) -> AppResult<f64> {
    match texto.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => Ok(n),
        _ => Err(AppError::validation_field(
            campo,
            "Debe ser un número mayor a cero",
        )),
    }
}

/// Clasificación en mayúsculas si es una de las permitidas
pub fn validar_clasificacion(texto: &str) -> AppResult<String> {
    let clasificacion = sanear_texto(texto).to_uppercase();
    if CLASIFICACIONES.contains(&clasificacion.as_str()) {
        Ok(clasificacion)
    } else {
        Err(AppError::validation_field(
            "clasificacion",
            "Clasificación no válida. Las clasificaciones permitidas son: G, PG, PG-13, R, NC-17.",
        ))
    }
}

/// Tipo MIME según la extensión del archivo
pub fn mime_por_extension(nombre_archivo: &str) -> Option<&'static str> {
    let extension = nombre_archivo.rsplit_once('.')?.1.to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

pub fn validar_pelicula(entrada: PeliculaEntrada) -> AppResult<PeliculaForm> {
    let requerido = |campo: &str, valor: &str| -> AppResult<String> {
        let saneado = sanear_texto(valor);
        if saneado.is_empty() {
            return Err(AppError::validation_field(campo, "Este campo es requerido"));
        }
        Ok(saneado)
    };

    let nombre = requerido("nombre", &entrada.nombre)?;
    let director = requerido("director", &entrada.director)?;
    let actores = requerido("actores", &entrada.actores)?;
    let descripcion = requerido("descripcion", &entrada.descripcion)?;
    let clasificacion = validar_clasificacion(&entrada.clasificacion)?;
    let duracion = numero_positivo("duracion", &entrada.duracion)?;
    let precio = numero_positivo("precio", &entrada.precio)?;

    if let Some(imagen) = &entrada.imagen {
        if !IMAGENES_PERMITIDAS.contains(&imagen.mime.as_str()) {
            return Err(AppError::validation_field(
                "imagen",
                "Formato de imagen no soportado. Solo se permiten .jpeg, .jpg, .png y .gif",
            ));
        }
    }

    Ok(PeliculaForm {
        nombre,
        director,
        duracion,
        actores,
        clasificacion,
        descripcion,
        precio_boleto: (precio * 100.0).round() / 100.0,
        imagen: entrada.imagen,
    })
}

// ---------------------------------------------------------------------------
// Pago
// ---------------------------------------------------------------------------

/// Datos de tarjeta; solo se validan localmente, nunca se envían
#[derive(Debug, Clone, Default)]
pub struct DatosPago {
    pub numero_tarjeta: String,
    pub vencimiento: String,
    pub cvv: String,
    pub titular: String,
}

/// Deja solo dígitos, como máximo 16
pub fn formatear_tarjeta(texto: &str) -> String {
    texto.chars().filter(char::is_ascii_digit).take(16).collect()
}

/// Deja hasta 4 dígitos e inserta `/` tras el mes
pub fn formatear_vencimiento(texto: &str) -> String {
    let digitos: String = texto.chars().filter(char::is_ascii_digit).take(4).collect();
    if digitos.len() > 2 {
        format!("{}/{}", &digitos[..2], &digitos[2..])
    } else {
        digitos
    }
}

pub fn validar_pago(pago: &DatosPago) -> AppResult<()> {
    static TARJETA_REGEX: OnceLock<Regex> = OnceLock::new();
    static VENCIMIENTO_REGEX: OnceLock<Regex> = OnceLock::new();
    static CVV_REGEX: OnceLock<Regex> = OnceLock::new();

    if !regex(&TARJETA_REGEX, r"^\d{16}$").is_match(&pago.numero_tarjeta) {
        return Err(AppError::validation_field(
            "numero_tarjeta",
            "Por favor, ingrese un número de tarjeta válido (16 dígitos).",
        ));
    }

    if !regex(&VENCIMIENTO_REGEX, r"^(0[1-9]|1[0-2])/\d{2}$").is_match(&pago.vencimiento) {
        return Err(AppError::validation_field(
            "vencimiento",
            "Por favor, ingrese una fecha de expiración válida (MM/AA).",
        ));
    }

    if !regex(&CVV_REGEX, r"^\d{3}$").is_match(&pago.cvv) {
        return Err(AppError::validation_field(
            "cvv",
            "Por favor, ingrese un CVV válido (3 dígitos).",
        ));
    }

    if pago.titular.trim().is_empty() {
        return Err(AppError::validation_field(
            "titular",
            "Por favor, ingrese el nombre del titular de la tarjeta.",
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Salas, horarios y programación
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct SalaEntrada {
    pub nombre: String,
    pub asientos: String,
    pub filas: String,
    pub max_por_fila: String,
}

fn entero_positivo(campo: &str, texto: &str) -> AppResult<u32> {
    match texto.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::validation_field(
            campo,
            "Debe ser un número entero mayor a cero",
        )),
    }
}

pub fn validar_sala(entrada: &SalaEntrada) -> AppResult<NuevaSala> {
    let nombre = entrada.nombre.trim();
    if nombre.is_empty() {
        return Err(AppError::validation_field(
            "nombre",
            "El nombre de la sala es requerido",
        ));
    }

    Ok(NuevaSala {
        nombre_sala: nombre.to_string(),
        cantidad_asientos: entero_positivo("cantidad_asientos", &entrada.asientos)?,
        cantidad_filas: entero_positivo("cantidad_filas", &entrada.filas)?,
        max_asientos_por_fila: entero_positivo("max_asientos_por_fila", &entrada.max_por_fila)?,
    })
}

/// Valida y parsea una fecha en formato YYYY-MM-DD
fn validate_date(date_str: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::validation_field("fecha", "Formato de fecha inválido, use YYYY-MM-DD")
    })
}

/// Valida y parsea una hora en formato HH:MM
fn validate_time(time_str: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time_str.trim(), "%H:%M")
        .map_err(|_| AppError::validation_field("hora", "Formato de hora inválido, use HH:MM"))
}

/// Turno que corresponde a una hora del día
pub fn turno_para(hora: NaiveTime) -> Turno {
    match hora.hour() {
        0..=11 => Turno::Matutino,
        12..=18 => Turno::Vespertino,
        _ => Turno::Nocturno,
    }
}

pub fn validar_horario(hora: &str, fecha: &str, turno: Option<Turno>) -> AppResult<NuevoHorario> {
    let hora = validate_time(hora)?;
    let fecha = validate_date(fecha)?;

    Ok(NuevoHorario {
        hora_programada: hora.format("%H:%M").to_string(),
        turno: turno.unwrap_or_else(|| turno_para(hora)),
        fecha_de_emision: fecha.format("%Y-%m-%d").to_string(),
    })
}

/// Asignación de película a sala: se requiere horario y al menos un día
pub fn validar_programacion(
    id_pelicula: Id,
    id_sala: Id,
    id_horario: Option<Id>,
    dias: &[Dia],
) -> AppResult<NuevaCartelera> {
    let mut unicos: Vec<Dia> = Vec::with_capacity(dias.len());
    for dia in dias {
        if !unicos.contains(dia) {
            unicos.push(*dia);
        }
    }

    match id_horario {
        Some(id_horario) if !unicos.is_empty() => Ok(NuevaCartelera {
            id_pelicula,
            id_sala,
            id_horario,
            dias: unicos,
        }),
        _ => Err(AppError::Validation(
            "Debe seleccionar al menos un horario y un día".to_string(),
        )),
    }
}
