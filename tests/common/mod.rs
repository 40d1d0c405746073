//! API de boletos falsa en memoria, servida con actix-web en un puerto efímero.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use actix_web::dev::Service;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::{json, Value};
use uuid::Uuid;

use cinefox::config::ClientConfig;
use cinefox::store::MemoryStore;
use cinefox::ApiClient;

pub const ADMIN_CORREO: &str = "admin@cinefox.mx";
pub const ADMIN_CONTRASENA: &str = "Admin#2024x";

#[derive(Debug, Clone)]
pub struct Solicitud {
    pub metodo: String,
    pub ruta: String,
    pub autorizacion: Option<String>,
}

#[derive(Default)]
pub struct Estado {
    pub tokens: HashSet<String>,
    pub usuarios: Vec<Value>,
    pub peliculas: Vec<Value>,
    pub horarios: Vec<Value>,
    pub salas: Vec<Value>,
    pub asientos: Vec<Value>,
    pub carteleras: Vec<Value>,
    /// (día, función)
    pub funciones: Vec<(String, Value)>,
    pub contactos: Vec<Value>,
    pub logs: Vec<Value>,
    pub formularios: Vec<String>,
    pub solicitudes: Vec<Solicitud>,
}

#[derive(Default)]
pub struct FakeApi {
    estado: Mutex<Estado>,
}

impl FakeApi {
    fn estado(&self) -> MutexGuard<'_, Estado> {
        self.estado.lock().unwrap_or_else(|e| e.into_inner())
    }
}

pub struct FakeServer {
    pub url: String,
    api: web::Data<FakeApi>,
}

impl FakeServer {
    pub fn estado(&self) -> MutexGuard<'_, Estado> {
        self.api.estado()
    }

    pub fn solicitudes(&self) -> Vec<Solicitud> {
        self.estado().solicitudes.clone()
    }

    pub fn total_solicitudes(&self) -> usize {
        self.estado().solicitudes.len()
    }

    /// Simula otra compra concurrente
    pub fn ocupar(&self, id_asiento: i64) {
        for asiento in self.estado().asientos.iter_mut() {
            if asiento["idAsiento"] == id_asiento {
                asiento["estado"] = json!("ocupado");
            }
        }
    }

    pub fn estado_asiento(&self, id_asiento: i64) -> Option<String> {
        self.estado()
            .asientos
            .iter()
            .find(|a| a["idAsiento"] == id_asiento)
            .and_then(|a| a["estado"].as_str().map(str::to_string))
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.url.clone(),
            ..ClientConfig::default()
        }
    }

    pub fn cliente(&self) -> (ApiClient, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let client = ApiClient::new(&self.config(), store.clone()).unwrap();
        (client, store)
    }
}

fn sembrar() -> Estado {
    let mut estado = Estado {
        usuarios: vec![json!({
            "idUsuario": 1,
            "nombreUsuario": "Laura",
            "apellidoUsuario": "Méndez",
            "edadUsuario": "34",
            "correoUsuario": ADMIN_CORREO,
            "contrasenaUsuario": ADMIN_CONTRASENA,
            "telefonoUsuario": "5512345678",
            "tipoUsuario": "admin"
        })],
        peliculas: vec![
            json!({
                "idPelicula": 1,
                "nombrePelicula": "Avatar",
                "directorPelicula": "James Cameron",
                "duracionPelicula": 162,
                "actoresPelicula": "Sam Worthington, Zoe Saldaña",
                "clasificacionPelicula": "PG-13",
                "descripcionPelicula": "Un marine en Pandora.",
                "imagenPelicula": "avatar.jpg",
                "precioBoleto": "95.00"
            }),
            json!({
                "idPelicula": 2,
                "nombrePelicula": "Coco",
                "directorPelicula": "Lee Unkrich",
                "duracionPelicula": "105",
                "actoresPelicula": "Anthony Gonzalez",
                "clasificacionPelicula": "G",
                "descripcionPelicula": "Día de Muertos.",
                "precioBoleto": 80
            }),
        ],
        horarios: vec![
            json!({"idHorario": 1, "horaProgramada": "12:00", "turno": "Vespertino", "fechaDeEmision": "2024-05-01"}),
            json!({"idHorario": 2, "horaProgramada": "18:30", "turno": "Vespertino", "fechaDeEmision": "2024-05-01"}),
        ],
        salas: vec![json!({
            "idSala": 1,
            "nombreSala": "Sala 1",
            "cantidadAsientos": 6,
            "cantidadFilas": "2",
            "maxAsientosPorFila": 3
        })],
        carteleras: vec![
            json!({"idCartelera": 1, "idPelicula": 1, "idHorario": 2, "idSala": 1, "dias": ["Sábado"]}),
            json!({"idCartelera": 2, "idPelicula": 2, "idHorario": 1, "idSala": 1, "dias": "Lunes, Sábado"}),
        ],
        logs: vec![json!({
            "usuario": ADMIN_CORREO,
            "accion": "login",
            "fechaHora": "2024-05-01 10:00:00",
            "host": "127.0.0.1"
        })],
        ..Estado::default()
    };

    let mut id = 1;
    for fila in ["A", "B"] {
        for numero in 1..=3 {
            let ocupado = fila == "B" && numero == 3;
            estado.asientos.push(json!({
                "idAsiento": id,
                "fila": fila,
                "numero": numero,
                "idSalaAsiento": 1,
                "estado": if ocupado { "ocupado" } else { "libre" }
            }));
            id += 1;
        }
    }

    let funcion = |id_cartelera: i64, id_pelicula: i64, nombre: &str, hora: &str| {
        json!({
            "idCartelera": id_cartelera,
            "idPelicula": id_pelicula,
            "nombrePelicula": nombre,
            "idHorario": 1,
            "horaProgramada": hora,
            "idSala": 1,
            "nombreSala": "Sala 1"
        })
    };
    estado.funciones = vec![
        ("Sábado".into(), funcion(1, 1, "Avatar", "12:00")),
        ("Sábado".into(), funcion(2, 1, "Avatar", "12:00")),
        ("Sábado".into(), funcion(3, 2, "Coco", "16:00")),
        ("Sábado".into(), funcion(4, 1, "Avatar", "18:30")),
        ("Lunes".into(), funcion(5, 2, "Coco", "20:00")),
    ];

    estado
}

fn token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn autorizar(api: &FakeApi, req: &HttpRequest) -> Result<(), HttpResponse> {
    match token(req) {
        Some(t) if api.estado().tokens.contains(&t) => Ok(()),
        Some(_) => Err(HttpResponse::Unauthorized().json(json!({"message": "Token inválido"}))),
        None => Err(HttpResponse::Unauthorized().json(json!({"message": "Token requerido"}))),
    }
}

fn sin_contrasena(usuario: &Value) -> Value {
    let mut usuario = usuario.clone();
    if let Some(map) = usuario.as_object_mut() {
        map.remove("contrasenaUsuario");
    }
    usuario
}

async fn login(api: web::Data<FakeApi>, body: web::Json<Value>) -> HttpResponse {
    let mut estado = api.estado();
    let usuario = estado
        .usuarios
        .iter()
        .find(|u| {
            u["correoUsuario"] == body["correoUsuario"]
                && u["contrasenaUsuario"] == body["contrasenaUsuario"]
        })
        .map(sin_contrasena);

    match usuario {
        Some(usuario) => {
            let token = Uuid::new_v4().to_string();
            estado.tokens.insert(token.clone());
            HttpResponse::Ok().json(json!({"token": token, "usuario": usuario}))
        }
        None => HttpResponse::Unauthorized().json(json!({"message": "Credenciales incorrectas"})),
    }
}

async fn logout(api: web::Data<FakeApi>, req: HttpRequest) -> HttpResponse {
    if let Err(resp) = autorizar(&api, &req) {
        return resp;
    }
    if let Some(t) = token(&req) {
        api.estado().tokens.remove(&t);
    }
    HttpResponse::Ok().json(json!({"message": "Sesión cerrada"}))
}

async fn crear_usuario(
    api: web::Data<FakeApi>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> HttpResponse {
    if body["tipoUsuario"] == "admin" {
        if let Err(resp) = autorizar(&api, &req) {
            return resp;
        }
    }
    let mut estado = api.estado();
    if estado
        .usuarios
        .iter()
        .any(|u| u["correoUsuario"] == body["correoUsuario"])
    {
        return HttpResponse::BadRequest().json(json!({"error": "El correo ya está registrado"}));
    }
    let id = estado.usuarios.len() as i64 + 1;
    let mut usuario = body.into_inner();
    usuario["idUsuario"] = json!(id);
    estado.usuarios.push(usuario);
    HttpResponse::Created().json(json!({"message": "Usuario creado", "id": id}))
}

async fn peliculas(api: web::Data<FakeApi>) -> HttpResponse {
    HttpResponse::Ok().json(&api.estado().peliculas)
}

async fn pelicula(api: web::Data<FakeApi>, path: web::Path<i64>) -> HttpResponse {
    let id = path.into_inner();
    match api
        .estado()
        .peliculas
        .iter()
        .find(|p| p["idPelicula"] == id)
    {
        Some(p) => HttpResponse::Ok().json(p),
        None => HttpResponse::NotFound().json(json!({"message": "Película no encontrada"})),
    }
}

fn es_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false)
}

async fn crear_pelicula(api: web::Data<FakeApi>, req: HttpRequest, body: web::Bytes) -> HttpResponse {
    if let Err(resp) = autorizar(&api, &req) {
        return resp;
    }
    if !es_multipart(&req) {
        return HttpResponse::BadRequest().json(json!({"message": "Se esperaba multipart"}));
    }
    api.estado()
        .formularios
        .push(String::from_utf8_lossy(&body).into_owned());
    HttpResponse::Created().json(json!({"message": "Película agregada", "id": 3}))
}

async fn actualizar_pelicula(
    api: web::Data<FakeApi>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Bytes,
) -> HttpResponse {
    if let Err(resp) = autorizar(&api, &req) {
        return resp;
    }
    if !es_multipart(&req) {
        return HttpResponse::BadRequest().json(json!({"message": "Se esperaba multipart"}));
    }
    let id = path.into_inner();
    let mut estado = api.estado();
    if !estado.peliculas.iter().any(|p| p["idPelicula"] == id) {
        return HttpResponse::NotFound().json(json!({"message": "Película no encontrada"}));
    }
    estado
        .formularios
        .push(String::from_utf8_lossy(&body).into_owned());
    HttpResponse::Ok().json(json!({"message": "Película actualizada"}))
}

async fn eliminar_pelicula(
    api: web::Data<FakeApi>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> HttpResponse {
    if let Err(resp) = autorizar(&api, &req) {
        return resp;
    }
    let id = path.into_inner();
    let mut estado = api.estado();
    let antes = estado.peliculas.len();
    estado.peliculas.retain(|p| p["idPelicula"] != id);
    if estado.peliculas.len() == antes {
        return HttpResponse::NotFound().json(json!({"message": "Película no encontrada"}));
    }
    HttpResponse::NoContent().finish()
}

async fn horarios(api: web::Data<FakeApi>) -> HttpResponse {
    HttpResponse::Ok().json(&api.estado().horarios)
}

async fn crear_horario(
    api: web::Data<FakeApi>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> HttpResponse {
    if let Err(resp) = autorizar(&api, &req) {
        return resp;
    }
    let mut estado = api.estado();
    let id = estado.horarios.len() as i64 + 1;
    let mut horario = body.into_inner();
    horario["idHorario"] = json!(id);
    estado.horarios.push(horario);
    HttpResponse::Created().json(json!({"message": "Horario creado", "id": id}))
}

async fn actualizar_horario(
    api: web::Data<FakeApi>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> HttpResponse {
    if let Err(resp) = autorizar(&api, &req) {
        return resp;
    }
    let id = path.into_inner();
    let mut estado = api.estado();
    match estado.horarios.iter_mut().find(|h| h["idHorario"] == id) {
        Some(horario) => {
            let mut nuevo = body.into_inner();
            nuevo["idHorario"] = json!(id);
            *horario = nuevo;
            HttpResponse::Ok().json(json!({"message": "Horario actualizado"}))
        }
        None => HttpResponse::NotFound().json(json!({"message": "Horario no encontrado"})),
    }
}

async fn eliminar_horario(
    api: web::Data<FakeApi>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> HttpResponse {
    if let Err(resp) = autorizar(&api, &req) {
        return resp;
    }
    let id = path.into_inner();
    let mut estado = api.estado();
    let antes = estado.horarios.len();
    estado.horarios.retain(|h| h["idHorario"] != id);
    if estado.horarios.len() == antes {
        return HttpResponse::NotFound().json(json!({"message": "Horario no encontrado"}));
    }
    HttpResponse::Ok().json(json!({"message": "Horario eliminado"}))
}

async fn salas(api: web::Data<FakeApi>) -> HttpResponse {
    HttpResponse::Ok().json(&api.estado().salas)
}

async fn crear_sala(
    api: web::Data<FakeApi>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> HttpResponse {
    if let Err(resp) = autorizar(&api, &req) {
        return resp;
    }
    let mut estado = api.estado();
    if estado
        .salas
        .iter()
        .any(|s| s["nombreSala"] == body["nombreSala"])
    {
        return HttpResponse::BadRequest().json(json!({"error": "La sala ya existe"}));
    }
    let id = estado.salas.len() as i64 + 1;
    let mut sala = body.into_inner();
    sala["idSala"] = json!(id);
    estado.salas.push(sala);
    HttpResponse::Created().body("")
}

async fn eliminar_sala(
    api: web::Data<FakeApi>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> HttpResponse {
    if let Err(resp) = autorizar(&api, &req) {
        return resp;
    }
    let id = path.into_inner();
    let mut estado = api.estado();
    let antes = estado.salas.len();
    estado.salas.retain(|s| s["idSala"] != id);
    if estado.salas.len() == antes {
        return HttpResponse::NotFound().json(json!({"error": "Sala no encontrada"}));
    }
    HttpResponse::Ok().json(json!({"message": "Sala eliminada"}))
}

async fn carteleras(api: web::Data<FakeApi>) -> HttpResponse {
    HttpResponse::Ok().json(&api.estado().carteleras)
}

async fn crear_cartelera(
    api: web::Data<FakeApi>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> HttpResponse {
    if let Err(resp) = autorizar(&api, &req) {
        return resp;
    }
    let mut estado = api.estado();
    let id = estado.carteleras.len() as i64 + 1;
    let mut cartelera = body.into_inner();
    cartelera["idCartelera"] = json!(id);
    estado.carteleras.push(cartelera);
    HttpResponse::Created().json(json!({"message": "Cartelera creada", "id": id}))
}

async fn eliminar_cartelera(
    api: web::Data<FakeApi>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> HttpResponse {
    if let Err(resp) = autorizar(&api, &req) {
        return resp;
    }
    let id = path.into_inner();
    let mut estado = api.estado();
    let antes = estado.carteleras.len();
    estado.carteleras.retain(|c| c["idCartelera"] != id);
    if estado.carteleras.len() == antes {
        return HttpResponse::NotFound().json(json!({"message": "Cartelera no encontrada"}));
    }
    HttpResponse::Ok().json(json!({"message": "Cartelera eliminada"}))
}

async fn cartelera_dia(
    api: web::Data<FakeApi>,
    query: web::Query<HashMap<String, String>>,
) -> HttpResponse {
    let dia = query.get("dia").cloned().unwrap_or_default();
    let funciones: Vec<Value> = api
        .estado()
        .funciones
        .iter()
        .filter(|(d, _)| *d == dia)
        .map(|(_, f)| f.clone())
        .collect();
    HttpResponse::Ok().json(funciones)
}

async fn asientos(
    api: web::Data<FakeApi>,
    query: web::Query<HashMap<String, String>>,
) -> HttpResponse {
    let id_sala: i64 = match query.get("idSala").and_then(|s| s.parse().ok()) {
        Some(id) => id,
        None => return HttpResponse::BadRequest().json(json!({"message": "idSala requerido"})),
    };
    let asientos: Vec<Value> = api
        .estado()
        .asientos
        .iter()
        .filter(|a| a["idSalaAsiento"] == id_sala)
        .cloned()
        .collect();
    HttpResponse::Ok().json(asientos)
}

async fn actualizar_asientos(
    api: web::Data<FakeApi>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> HttpResponse {
    if let Err(resp) = autorizar(&api, &req) {
        return resp;
    }
    let cambios = body["asientos"].as_array().cloned().unwrap_or_default();
    let mut estado = api.estado();
    for cambio in &cambios {
        for asiento in estado.asientos.iter_mut() {
            if asiento["idAsiento"] == cambio["idAsiento"] {
                asiento["estado"] = cambio["estado"].clone();
            }
        }
    }
    HttpResponse::Ok().json(json!({"message": "Asientos actualizados correctamente"}))
}

async fn enviar_contacto(api: web::Data<FakeApi>, body: web::Json<Value>) -> HttpResponse {
    let mut estado = api.estado();
    let id = estado.contactos.len() as i64 + 1;
    let mut mensaje = body.into_inner();
    mensaje["id"] = json!(id);
    estado.contactos.push(mensaje);
    HttpResponse::Created().json(json!({"message": "Mensaje recibido"}))
}

async fn mensajes_contacto(api: web::Data<FakeApi>, req: HttpRequest) -> HttpResponse {
    if let Err(resp) = autorizar(&api, &req) {
        return resp;
    }
    HttpResponse::Ok().json(&api.estado().contactos)
}

async fn logs(api: web::Data<FakeApi>, req: HttpRequest) -> HttpResponse {
    if let Err(resp) = autorizar(&api, &req) {
        return resp;
    }
    HttpResponse::Ok().json(&api.estado().logs)
}

/// Levanta la API falsa y devuelve su URL base
pub async fn spawn() -> FakeServer {
    let api = web::Data::new(FakeApi {
        estado: Mutex::new(sembrar()),
    });

    let datos = api.clone();
    let server = HttpServer::new(move || {
        let registro = datos.clone();
        App::new()
            .app_data(datos.clone())
            .wrap_fn(move |req, srv| {
                let autorizacion = req
                    .headers()
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                registro.estado().solicitudes.push(Solicitud {
                    metodo: req.method().to_string(),
                    ruta: req.path().to_string(),
                    autorizacion,
                });
                srv.call(req)
            })
            .route("/usuarios/login", web::post().to(login))
            .route("/usuarios/logout", web::post().to(logout))
            .route("/usuarios", web::post().to(crear_usuario))
            .route("/peliculas", web::get().to(peliculas))
            .route("/peliculas", web::post().to(crear_pelicula))
            .route("/peliculas/{id}", web::get().to(pelicula))
            .route("/peliculas/{id}", web::put().to(actualizar_pelicula))
            .route("/peliculas/{id}", web::delete().to(eliminar_pelicula))
            .route("/horarios", web::get().to(horarios))
            .route("/horarios", web::post().to(crear_horario))
            .route("/horarios/{id}", web::put().to(actualizar_horario))
            .route("/horarios/{id}", web::delete().to(eliminar_horario))
            .route("/salas", web::get().to(salas))
            .route("/salas", web::post().to(crear_sala))
            .route("/salas/{id}", web::delete().to(eliminar_sala))
            .route("/cartelera", web::get().to(carteleras))
            .route("/cartelera", web::post().to(crear_cartelera))
            .route("/cartelera/carteleraDia", web::get().to(cartelera_dia))
            .route("/cartelera/{id}", web::delete().to(eliminar_cartelera))
            .route("/asientos", web::get().to(asientos))
            .route("/asientos", web::put().to(actualizar_asientos))
            .route("/contacto/contact", web::post().to(enviar_contacto))
            .route("/contacto/contact", web::get().to(mensajes_contacto))
            .route("/logs", web::get().to(logs))
            .default_service(web::to(|| async {
                HttpResponse::NotFound().json(json!({"message": "Ruta no encontrada"}))
            }))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("no se pudo abrir puerto");

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    FakeServer {
        url: format!("http://{}", addr),
        api,
    }
}
