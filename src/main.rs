//! # CineFox CLI
//!
//! Línea de comandos para el API de boletos de cine: cartelera, mapa de
//! asientos, compra, contacto y administración.
//!
//! ## Configuración
//!
//! Variables de entorno (archivo `.env` opcional):
//!
//! ```env
//! CINEFOX_API_URL=https://apiboletos.onrender.com
//! CINEFOX_STORE_PATH=/home/usuario/.cinefox/session.json
//! CINEFOX_TIMEOUT_SECS=30
//! CINEFOX_PRICING=fija
//! CINEFOX_TARIFA=80
//! RUST_LOG=cinefox=debug
//! ```
//!
//! ## Ejemplos
//!
//! ```bash
//! cinefox login --correo ana@correo.com --contrasena 'Secreta#2024'
//! cinefox cartelera dia --dia sabado
//! cinefox asientos --sala 2
//! cinefox comprar --pelicula 3 --sala 2 --horario 5 --boletos 2 \
//!     --asiento A-1 --asiento A-2 --tarjeta 4111111111111111 \
//!     --vencimiento 12/29 --cvv 123 --titular "Ana Pérez"
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use cinefox::api::{ApiClient, AppError, AppResult};
use cinefox::compra::{self, Funcion};
use cinefox::config::{validar_api_url, ClientConfig};
use cinefox::domain::cartelera::agrupar_por_pelicula;
use cinefox::domain::validacion::{
    formatear_tarjeta, formatear_vencimiento, mime_por_extension, validar_horario, validar_login,
    validar_pelicula, validar_programacion, validar_registro, validar_sala, ContactoEntrada,
    DatosPago, PeliculaEntrada, RegistroEntrada, SalaEntrada,
};
use cinefox::domain::{Dia, MapaAsientos, SeleccionAsientos};
use cinefox::models::{Id, ImagenPelicula, TipoUsuario, Turno};
use cinefox::store::FileStore;

/// Cliente de línea de comandos de CineFox
#[derive(Parser)]
#[command(name = "cinefox")]
#[command(about = "Cartelera, asientos y compra de boletos de CineFox")]
#[command(version)]
struct Cli {
    /// URL base del API (reemplaza CINEFOX_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Archivo de sesión (reemplaza CINEFOX_STORE_PATH)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Más detalle en el log (-v debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Comando,
}

#[derive(Subcommand)]
enum Comando {
    /// Iniciar sesión y guardar el token
    Login {
        #[arg(long)]
        correo: String,
        #[arg(long)]
        contrasena: String,
    },
    /// Cerrar la sesión
    Logout,
    /// Mostrar si hay una sesión guardada
    Sesion,
    /// Crear una cuenta de cliente
    Registro(RegistroArgs),
    /// Administración de usuarios
    Admin {
        #[command(subcommand)]
        accion: AdminAccion,
    },
    Peliculas {
        #[command(subcommand)]
        accion: PeliculasAccion,
    },
    Horarios {
        #[command(subcommand)]
        accion: HorariosAccion,
    },
    Salas {
        #[command(subcommand)]
        accion: SalasAccion,
    },
    Cartelera {
        #[command(subcommand)]
        accion: CarteleraAccion,
    },
    /// Mapa de asientos de una sala
    Asientos {
        #[arg(long)]
        sala: Id,
        /// Vista previa de una selección
        #[arg(long)]
        boletos: Option<usize>,
        #[arg(long = "asiento")]
        asientos: Vec<String>,
    },
    /// Comprar boletos
    Comprar(CompraArgs),
    Contacto {
        #[command(subcommand)]
        accion: ContactoAccion,
    },
    /// Bitácora del servidor
    Logs,
}

#[derive(Args)]
struct RegistroArgs {
    #[arg(long)]
    nombre: String,
    #[arg(long)]
    apellido: String,
    #[arg(long)]
    edad: String,
    #[arg(long)]
    correo: String,
    #[arg(long)]
    telefono: String,
    #[arg(long)]
    contrasena: String,
}

impl From<RegistroArgs> for RegistroEntrada {
    fn from(args: RegistroArgs) -> Self {
        Self {
            nombre: args.nombre,
            apellido: args.apellido,
            edad: args.edad,
            correo: args.correo,
            telefono: args.telefono,
            contrasena: args.contrasena,
        }
    }
}

#[derive(Subcommand)]
enum AdminAccion {
    /// Registrar un administrador (requiere sesión)
    Registro(RegistroArgs),
}

#[derive(Args)]
struct PeliculaArgs {
    #[arg(long)]
    nombre: String,
    #[arg(long)]
    director: String,
    /// Minutos
    #[arg(long)]
    duracion: String,
    #[arg(long)]
    actores: String,
    #[arg(long)]
    clasificacion: String,
    #[arg(long)]
    descripcion: String,
    #[arg(long)]
    precio: String,
    /// Póster (.jpg, .png o .gif)
    #[arg(long)]
    imagen: Option<PathBuf>,
}

#[derive(Subcommand)]
enum PeliculasAccion {
    Listar,
    Ver { id: Id },
    Crear(PeliculaArgs),
    Editar {
        id: Id,
        #[command(flatten)]
        datos: PeliculaArgs,
    },
    Eliminar { id: Id },
}

#[derive(Args)]
struct HorarioArgs {
    /// HH:MM
    #[arg(long)]
    hora: String,
    /// YYYY-MM-DD
    #[arg(long)]
    fecha: String,
    /// matutino, vespertino o nocturno; por defecto según la hora
    #[arg(long)]
    turno: Option<String>,
}

#[derive(Subcommand)]
enum HorariosAccion {
    Listar,
    Crear(HorarioArgs),
    Editar {
        id: Id,
        #[command(flatten)]
        datos: HorarioArgs,
    },
    Eliminar { id: Id },
}

#[derive(Subcommand)]
enum SalasAccion {
    Listar,
    Crear {
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        asientos: String,
        #[arg(long)]
        filas: String,
        #[arg(long)]
        max_por_fila: String,
    },
    Eliminar { id: Id },
}

#[derive(Subcommand)]
enum CarteleraAccion {
    Listar,
    /// Funciones de un día (por defecto hoy)
    Dia {
        #[arg(long)]
        dia: Option<String>,
    },
    /// Programar una película en una sala
    Crear {
        #[arg(long)]
        pelicula: Id,
        #[arg(long)]
        sala: Id,
        #[arg(long)]
        horario: Option<Id>,
        #[arg(long = "dia")]
        dias: Vec<String>,
    },
    Eliminar { id: Id },
}

#[derive(Args)]
struct CompraArgs {
    #[arg(long)]
    pelicula: Id,
    #[arg(long)]
    sala: Id,
    #[arg(long)]
    horario: Id,
    #[arg(long)]
    boletos: usize,
    /// Etiqueta FILA-NUMERO, repetible
    #[arg(long = "asiento", required = true)]
    asientos: Vec<String>,
    #[arg(long)]
    tarjeta: String,
    /// MM/AA
    #[arg(long)]
    vencimiento: String,
    #[arg(long)]
    cvv: String,
    #[arg(long)]
    titular: String,
}

#[derive(Subcommand)]
enum ContactoAccion {
    Enviar {
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        correo: String,
        #[arg(long)]
        mensaje: String,
    },
    /// Mensajes recibidos (requiere sesión)
    Listar,
}

fn init_tracing(verbose: u8) {
    let nivel = if verbose > 0 {
        "cinefox=debug"
    } else {
        "cinefox=info"
    };

    let filter = [nivel, "reqwest=warn"]
        .iter()
        .filter_map(|directive| directive.parse::<Directive>().ok())
        .fold(EnvFilter::from_default_env(), |filter, directive| {
            filter.add_directive(directive)
        });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Comando fallido");
            eprintln!("Error: {}", e.mensaje_usuario());
            ExitCode::FAILURE
        }
    }
}

/// Aplica `--api-url` y `--store` con las mismas reglas que el entorno
fn aplicar_opciones(
    mut config: ClientConfig,
    api_url: Option<String>,
    store: Option<PathBuf>,
) -> AppResult<ClientConfig> {
    if let Some(api_url) = api_url {
        config.api_url = validar_api_url(&api_url)?;
    }
    if let Some(store) = store {
        config.store_path = store;
    }
    Ok(config)
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = aplicar_opciones(ClientConfig::from_env()?, cli.api_url, cli.store)?;

    tracing::debug!(
        api_url = %config.api_url,
        store = %config.store_path.display(),
        precio = %config.politica_precio,
        "Configuración cargada"
    );

    let store = Arc::new(FileStore::new(config.store_path.clone()));
    let client = ApiClient::new(&config, store)?;

    match cli.command {
        Comando::Login { correo, contrasena } => {
            validar_login(&correo, &contrasena)?;
            let sesion = client.login(&correo, &contrasena).await?;
            match sesion.usuario {
                Some(usuario) => println!("Bienvenido, {}", usuario.nombre_usuario),
                None => println!("Sesión iniciada"),
            }
        }
        Comando::Logout => {
            client.logout().await?;
            println!("Sesión cerrada");
        }
        Comando::Sesion => {
            if client.sesion_activa().await? {
                match client.usuario_actual().await? {
                    Some(usuario) => println!(
                        "Sesión activa: {} {} <{}>",
                        usuario.nombre_usuario, usuario.apellido_usuario, usuario.correo_usuario
                    ),
                    None => println!("Sesión activa"),
                }
            } else {
                println!("No hay sesión activa");
            }
        }
        Comando::Registro(args) => {
            let nuevo = validar_registro(&args.into(), TipoUsuario::Cliente)?;
            imprimir_confirmacion(client.registrar_usuario(nuevo).await?.mensaje, "Usuario registrado");
        }
        Comando::Admin {
            accion: AdminAccion::Registro(args),
        } => {
            let nuevo = validar_registro(&args.into(), TipoUsuario::Admin)?;
            imprimir_confirmacion(
                client.registrar_admin(nuevo).await?.mensaje,
                "Administrador registrado",
            );
        }
        Comando::Peliculas { accion } => peliculas(&client, accion).await?,
        Comando::Horarios { accion } => horarios(&client, accion).await?,
        Comando::Salas { accion } => salas(&client, accion).await?,
        Comando::Cartelera { accion } => cartelera(&client, accion).await?,
        Comando::Asientos {
            sala,
            boletos,
            asientos,
        } => {
            let mapa = MapaAsientos::new(client.asientos(sala).await?);
            let seleccion = match boletos {
                Some(boletos) => compra::seleccionar(&mapa, boletos, &asientos)?,
                None => SeleccionAsientos::new(1)?,
            };
            print!("{}", mapa.render(&seleccion));
            println!("Libres: {} de {}", mapa.libres(), mapa.total());
        }
        Comando::Comprar(args) => comprar(&client, &config, args).await?,
        Comando::Contacto {
            accion:
                ContactoAccion::Enviar {
                    nombre,
                    correo,
                    mensaje,
                },
        } => {
            let entrada = ContactoEntrada {
                nombre,
                correo,
                mensaje,
            };
            client.enviar_contacto(&entrada).await?;
            println!("Mensaje enviado con éxito");
        }
        Comando::Contacto {
            accion: ContactoAccion::Listar,
        } => {
            for mensaje in client.mensajes_contacto().await? {
                println!("{} <{}>: {}", mensaje.name, mensaje.email, mensaje.message);
            }
        }
        Comando::Logs => {
            for registro in client.logs().await? {
                println!(
                    "{} | {} | {} | {}",
                    registro.fecha_hora, registro.usuario, registro.accion, registro.host
                );
            }
        }
    }

    Ok(())
}

fn imprimir_confirmacion(mensaje: Option<String>, por_defecto: &str) {
    println!("{}", mensaje.unwrap_or_else(|| por_defecto.to_string()));
}

async fn leer_imagen(ruta: &Path) -> AppResult<ImagenPelicula> {
    let nombre_archivo = ruta
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime = mime_por_extension(&nombre_archivo).ok_or_else(|| {
        AppError::validation_field(
            "imagen",
            "Formato de imagen no soportado. Solo se permiten .jpeg, .jpg, .png y .gif",
        )
    })?;
    let bytes = tokio::fs::read(ruta)
        .await
        .map_err(|e| AppError::store("leer_imagen", e))?;

    Ok(ImagenPelicula {
        nombre_archivo,
        mime: mime.to_string(),
        bytes,
    })
}

async fn entrada_pelicula(args: PeliculaArgs) -> AppResult<PeliculaEntrada> {
    let imagen = match &args.imagen {
        Some(ruta) => Some(leer_imagen(ruta).await?),
        None => None,
    };

    Ok(PeliculaEntrada {
        nombre: args.nombre,
        director: args.director,
        duracion: args.duracion,
        actores: args.actores,
        clasificacion: args.clasificacion,
        descripcion: args.descripcion,
        precio: args.precio,
        imagen,
    })
}

async fn peliculas(client: &ApiClient, accion: PeliculasAccion) -> AppResult<()> {
    match accion {
        PeliculasAccion::Listar => {
            for pelicula in client.peliculas().await? {
                println!(
                    "{:>4}  {}  [{}]",
                    pelicula.id_pelicula, pelicula.nombre_pelicula, pelicula.clasificacion_pelicula
                );
            }
        }
        PeliculasAccion::Ver { id } => {
            let pelicula = client.pelicula(id).await?;
            println!("{}", pelicula.nombre_pelicula);
            println!("Director: {}", pelicula.director_pelicula);
            if let Some(duracion) = pelicula.duracion_pelicula {
                println!("Duración: {} min", duracion);
            }
            println!("Actores: {}", pelicula.actores_pelicula);
            println!("Clasificación: {}", pelicula.clasificacion_pelicula);
            if let Some(precio) = pelicula.precio_boleto {
                println!("Precio: ${:.2}", precio);
            }
            println!();
            println!("{}", pelicula.descripcion_pelicula);
        }
        PeliculasAccion::Crear(args) => {
            let form = validar_pelicula(entrada_pelicula(args).await?)?;
            imprimir_confirmacion(client.crear_pelicula(form).await?.mensaje, "Película agregada");
        }
        PeliculasAccion::Editar { id, datos } => {
            let form = validar_pelicula(entrada_pelicula(datos).await?)?;
            imprimir_confirmacion(
                client.actualizar_pelicula(id, form).await?.mensaje,
                "Película actualizada",
            );
        }
        PeliculasAccion::Eliminar { id } => {
            imprimir_confirmacion(client.eliminar_pelicula(id).await?.mensaje, "Película eliminada");
        }
    }
    Ok(())
}

async fn horarios(client: &ApiClient, accion: HorariosAccion) -> AppResult<()> {
    let validar = |datos: &HorarioArgs| -> AppResult<_> {
        let turno = datos
            .turno
            .as_deref()
            .map(str::parse::<Turno>)
            .transpose()?;
        validar_horario(&datos.hora, &datos.fecha, turno)
    };

    match accion {
        HorariosAccion::Listar => {
            for horario in client.horarios().await? {
                println!(
                    "{:>4}  {}  {}  {}",
                    horario.id_horario,
                    horario.hora_programada,
                    horario.turno,
                    horario.fecha_de_emision.as_deref().unwrap_or("-")
                );
            }
        }
        HorariosAccion::Crear(datos) => {
            let nuevo = validar(&datos)?;
            imprimir_confirmacion(client.crear_horario(&nuevo).await?.mensaje, "Horario creado");
        }
        HorariosAccion::Editar { id, datos } => {
            let nuevo = validar(&datos)?;
            imprimir_confirmacion(
                client.actualizar_horario(id, &nuevo).await?.mensaje,
                "Horario actualizado",
            );
        }
        HorariosAccion::Eliminar { id } => {
            imprimir_confirmacion(client.eliminar_horario(id).await?.mensaje, "Horario eliminado");
        }
    }
    Ok(())
}

async fn salas(client: &ApiClient, accion: SalasAccion) -> AppResult<()> {
    match accion {
        SalasAccion::Listar => {
            for sala in client.salas().await? {
                println!(
                    "{:>4}  {}  {} asientos ({} filas, {} por fila)",
                    sala.id_sala,
                    sala.nombre_sala,
                    sala.cantidad_asientos,
                    sala.cantidad_filas,
                    sala.max_asientos_por_fila
                );
            }
        }
        SalasAccion::Crear {
            nombre,
            asientos,
            filas,
            max_por_fila,
        } => {
            let nueva = validar_sala(&SalaEntrada {
                nombre,
                asientos,
                filas,
                max_por_fila,
            })?;
            imprimir_confirmacion(client.crear_sala(&nueva).await?.mensaje, "Sala creada");
        }
        SalasAccion::Eliminar { id } => {
            imprimir_confirmacion(client.eliminar_sala(id).await?.mensaje, "Sala eliminada");
        }
    }
    Ok(())
}

async fn cartelera(client: &ApiClient, accion: CarteleraAccion) -> AppResult<()> {
    match accion {
        CarteleraAccion::Listar => {
            for cartelera in client.carteleras().await? {
                println!(
                    "{:>4}  película {}  sala {}  horario {}  {}",
                    cartelera.id_cartelera,
                    cartelera.id_pelicula,
                    cartelera.id_sala,
                    cartelera.id_horario,
                    cartelera.dias.join(", ")
                );
            }
        }
        CarteleraAccion::Dia { dia } => {
            let dia = match dia {
                Some(dia) => dia.parse::<Dia>()?,
                None => Dia::hoy(),
            };
            let funciones = client.cartelera_dia(dia).await?;
            println!("Cartelera del {}", dia);
            for pelicula in agrupar_por_pelicula(&funciones) {
                println!("  {}: {}", pelicula.nombre, pelicula.horarios.join("  "));
            }
        }
        CarteleraAccion::Crear {
            pelicula,
            sala,
            horario,
            dias,
        } => {
            let dias = dias
                .iter()
                .map(|d| d.parse::<Dia>())
                .collect::<AppResult<Vec<_>>>()?;
            let nueva = validar_programacion(pelicula, sala, horario, &dias)?;
            imprimir_confirmacion(
                client.crear_cartelera(&nueva).await?.mensaje,
                "Película asignada a la sala",
            );
        }
        CarteleraAccion::Eliminar { id } => {
            imprimir_confirmacion(
                client.eliminar_cartelera(id).await?.mensaje,
                "Programación eliminada",
            );
        }
    }
    Ok(())
}

async fn comprar(client: &ApiClient, config: &ClientConfig, args: CompraArgs) -> AppResult<()> {
    let pelicula = client.pelicula(args.pelicula).await?;
    let nombre_sala = client
        .salas()
        .await?
        .into_iter()
        .find(|s| s.id_sala == args.sala)
        .map(|s| s.nombre_sala)
        .ok_or_else(|| AppError::not_found_id("Sala", &args.sala.to_string()))?;
    let hora = client
        .horarios()
        .await?
        .into_iter()
        .find(|h| h.id_horario == args.horario)
        .map(|h| h.hora_programada)
        .ok_or_else(|| AppError::not_found_id("Horario", &args.horario.to_string()))?;

    let (_, seleccion) =
        compra::preparar_seleccion(client, args.sala, args.boletos, &args.asientos).await?;

    let pago = DatosPago {
        numero_tarjeta: formatear_tarjeta(&args.tarjeta),
        vencimiento: formatear_vencimiento(&args.vencimiento),
        cvv: args.cvv,
        titular: args.titular,
    };

    let funcion = Funcion {
        pelicula,
        id_sala: args.sala,
        nombre_sala,
        hora,
    };

    let boleto =
        compra::confirmar_compra(client, &funcion, &seleccion, &pago, &config.politica_precio)
            .await?;

    println!("¡Compra exitosa!");
    println!("{}", boleto);
    println!("QR: {}", boleto.qr_payload());
    Ok(())
}
